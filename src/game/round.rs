use super::deck::Deck;
use super::state::{RoundPhase, Tile, TileStatus};

/// Result of a single `Round::flip` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Nothing changed.
    Ignored,
    /// First tile of a pair is face up. `started` is set on the round's first flip.
    Revealed { index: usize, started: bool },
    /// Pair confirmed. `won` is set exactly once, on the last pair.
    Matched { pair: [usize; 2], won: bool },
    /// Pair differs. Input stays locked until `settle` runs.
    Mismatched { pair: [usize; 2] },
}

#[derive(Clone, Debug)]
pub struct Round<T> {
    tiles: Vec<Tile<T>>,
    turns: u32,
    pending: Vec<usize>,
    phase: RoundPhase,
}

impl<T> Default for Round<T> {
    fn default() -> Self {
        Round {
            tiles: Vec::new(),
            turns: 0,
            pending: Vec::with_capacity(2),
            phase: RoundPhase::NotStarted,
        }
    }
}

impl<T: PartialEq> Round<T> {
    pub fn new(deck: Deck<T>) -> Self {
        Round {
            tiles: deck.into_tiles(),
            ..Round::default()
        }
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.phase == RoundPhase::Won || self.pending.len() >= 2 {
            return FlipOutcome::Ignored;
        }
        match self.tiles.get(index) {
            Some(tile) if tile.status == TileStatus::Hidden => {}
            _ => return FlipOutcome::Ignored,
        }

        self.tiles[index].status = TileStatus::Flipped;
        self.pending.push(index);

        let started = self.phase == RoundPhase::NotStarted;
        if started {
            self.phase = RoundPhase::Running;
        }

        let [first, second] = match self.pending[..] {
            [first, second] => [first, second],
            _ => return FlipOutcome::Revealed { index, started },
        };

        self.turns = self.turns.saturating_add(1);
        let pair = [first, second];

        if self.tiles[first].token != self.tiles[second].token {
            return FlipOutcome::Mismatched { pair };
        }

        self.tiles[first].status = TileStatus::Matched;
        self.tiles[second].status = TileStatus::Matched;
        self.pending.clear();

        let won = self.is_won();
        if won {
            self.phase = RoundPhase::Won;
        }
        FlipOutcome::Matched { pair, won }
    }

    /// Turns a locked mismatched pair face down again.
    pub fn settle(&mut self) -> Option<[usize; 2]> {
        let pair = match self.pending[..] {
            [first, second] => [first, second],
            _ => return None,
        };
        for idx in pair {
            self.tiles[idx].status = TileStatus::Hidden;
        }
        self.pending.clear();
        Some(pair)
    }
}

impl<T> Round<T> {
    /// An empty deck is never won.
    pub fn is_won(&self) -> bool {
        !self.tiles.is_empty() && self.tiles.iter().all(|t| t.status == TileStatus::Matched)
    }

    pub fn tiles(&self) -> &[Tile<T>] {
        &self.tiles
    }

    pub fn status(&self, index: usize) -> Option<TileStatus> {
        self.tiles.get(index).map(|t| t.status)
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.pending.len() >= 2
    }

    pub fn matched_pairs(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.status == TileStatus::Matched)
            .count()
            / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn round() -> Round<&'static str> {
        let tokens = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut rng = StdRng::seed_from_u64(42);
        Round::new(deck::build(&tokens, 8, &mut rng).unwrap())
    }

    fn partner(round: &Round<&str>, index: usize) -> usize {
        let token = round.tiles()[index].token;
        (0..round.tiles().len())
            .find(|&i| i != index && round.tiles()[i].token == token)
            .unwrap()
    }

    fn non_partner(round: &Round<&str>, index: usize) -> usize {
        let token = round.tiles()[index].token;
        (0..round.tiles().len())
            .find(|&i| round.tiles()[i].token != token)
            .unwrap()
    }

    #[test]
    fn first_flip_starts_round() {
        let mut r = round();
        assert_eq!(r.phase(), RoundPhase::NotStarted);
        assert_eq!(r.flip(0), FlipOutcome::Revealed { index: 0, started: true });
        assert_eq!(r.phase(), RoundPhase::Running);
        assert_eq!(r.turns(), 0);
        assert_eq!(r.pending(), &[0]);
    }

    #[test]
    fn flipping_face_up_tile_is_ignored() {
        let mut r = round();
        r.flip(0);
        assert_eq!(r.flip(0), FlipOutcome::Ignored);
        assert_eq!(r.pending(), &[0]);

        let mate = partner(&r, 0);
        r.flip(mate);
        assert_eq!(r.status(0), Some(TileStatus::Matched));
        assert_eq!(r.flip(mate), FlipOutcome::Ignored);
        assert_eq!(r.turns(), 1);
    }

    #[test]
    fn out_of_range_flip_is_ignored() {
        let mut r = round();
        assert_eq!(r.flip(16), FlipOutcome::Ignored);
        assert_eq!(r.phase(), RoundPhase::NotStarted);
    }

    #[test]
    fn turns_count_comparisons_not_flips() {
        let mut r = round();
        let other = non_partner(&r, 0);
        r.flip(0);
        assert_eq!(r.turns(), 0);
        assert_eq!(r.flip(other), FlipOutcome::Mismatched { pair: [0, other] });
        assert_eq!(r.turns(), 1);
        r.settle();

        let third = (0..16).find(|&i| i != 0 && i != other).unwrap();
        r.flip(third);
        assert_eq!(r.turns(), 1);
    }

    #[test]
    fn mismatch_locks_until_settled() {
        let mut r = round();
        let other = non_partner(&r, 0);
        r.flip(0);
        r.flip(other);
        assert!(r.is_locked());

        let third = (0..16).find(|&i| i != 0 && i != other).unwrap();
        assert_eq!(r.flip(third), FlipOutcome::Ignored);
        assert_eq!(r.status(third), Some(TileStatus::Hidden));

        assert_eq!(r.settle(), Some([0, other]));
        assert_eq!(r.status(0), Some(TileStatus::Hidden));
        assert_eq!(r.status(other), Some(TileStatus::Hidden));
        assert!(r.pending().is_empty());
        assert_eq!(r.settle(), None);
    }

    #[test]
    fn match_clears_pending_immediately() {
        let mut r = round();
        let mate = partner(&r, 3);
        r.flip(3);
        assert!(matches!(r.flip(mate), FlipOutcome::Matched { won: false, .. }));
        assert!(r.pending().is_empty());
        assert_eq!(r.settle(), None);

        let next = (0..16).find(|&i| r.status(i) == Some(TileStatus::Hidden)).unwrap();
        assert!(matches!(r.flip(next), FlipOutcome::Revealed { started: false, .. }));
    }

    #[test]
    fn win_fires_once() {
        let mut r = round();
        let mut wins = 0;
        for i in 0..16 {
            if r.status(i) != Some(TileStatus::Hidden) {
                continue;
            }
            let mate = partner(&r, i);
            r.flip(i);
            if let FlipOutcome::Matched { won: true, .. } = r.flip(mate) {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert!(r.is_won());
        assert_eq!(r.phase(), RoundPhase::Won);
        assert_eq!(r.turns(), 8);
        assert_eq!(r.matched_pairs(), 8);
        for i in 0..16 {
            assert_eq!(r.flip(i), FlipOutcome::Ignored);
        }
        assert_eq!(r.turns(), 8);
    }

    #[test]
    fn empty_round_is_never_won() {
        let mut r: Round<&str> = Round::default();
        assert!(!r.is_won());
        assert_eq!(r.flip(0), FlipOutcome::Ignored);
        assert_eq!(r.phase(), RoundPhase::NotStarted);
    }
}
