use std::fmt;

use rand::Rng;

use super::error::InvalidThemeError;
use super::state::{Tile, TileStatus};

pub const PAIR_COUNT: usize = 8;
pub const BOARD_COLUMNS: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct Deck<T> {
    tiles: Vec<Tile<T>>,
}

impl<T> Deck<T> {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile<T>] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<Tile<T>> {
        self.tiles
    }
}

impl<T> Default for Deck<T> {
    fn default() -> Self {
        Deck { tiles: Vec::new() }
    }
}

/// Builds a shuffled deck holding each of the first `pair_count` tokens twice.
///
/// The catalog is truncated, never reordered, before pairing. Catalogs that are
/// too short or repeat a token inside the truncated prefix are rejected.
pub fn build<T, R>(tokens: &[T], pair_count: usize, rng: &mut R) -> Result<Deck<T>, InvalidThemeError>
where
    T: Clone + PartialEq + fmt::Display,
    R: Rng + ?Sized,
{
    if pair_count == 0 {
        return Err(InvalidThemeError::NoPairs);
    }
    if tokens.len() < pair_count {
        return Err(InvalidThemeError::TooFewTokens {
            needed: pair_count,
            found: tokens.len(),
        });
    }

    let base = &tokens[..pair_count];
    for (idx, token) in base.iter().enumerate() {
        if base[..idx].contains(token) {
            return Err(InvalidThemeError::DuplicateToken {
                token: token.to_string(),
            });
        }
    }

    let mut tiles: Vec<Tile<T>> = base
        .iter()
        .chain(base.iter())
        .enumerate()
        .map(|(position, token)| Tile {
            id: format!("{position}-{token}"),
            token: token.clone(),
            status: TileStatus::Hidden,
        })
        .collect();

    shuffle(&mut tiles, rng);
    Ok(Deck { tiles })
}

pub fn build_random<T>(tokens: &[T], pair_count: usize) -> Result<Deck<T>, InvalidThemeError>
where
    T: Clone + PartialEq + fmt::Display,
{
    build(tokens, pair_count, &mut rand::rng())
}

// Fisher-Yates, last index down to 1.
fn shuffle<V, R: Rng + ?Sized>(values: &mut [V], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ANIMALS: [&str; 8] = ["🐶", "🐱", "🐰", "🦊", "🐻", "🐼", "🐸", "🐵"];

    #[test]
    fn every_token_appears_exactly_twice() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = build(&ANIMALS, PAIR_COUNT, &mut rng).unwrap();
        assert_eq!(deck.len(), 16);
        for token in ANIMALS {
            let count = deck.tiles().iter().filter(|t| t.token == token).count();
            assert_eq!(count, 2, "token {token} should be paired");
        }
        assert!(deck.tiles().iter().all(|t| t.status == TileStatus::Hidden));
    }

    #[test]
    fn truncates_to_first_pairs_only() {
        let tokens = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
        let mut rng = StdRng::seed_from_u64(1);
        let deck = build(&tokens, PAIR_COUNT, &mut rng).unwrap();
        let mut seen: Vec<&str> = deck.tiles().iter().map(|t| t.token).collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = tokens[..8].iter().chain(tokens[..8].iter()).copied().collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn tile_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(99);
        let deck = build(&ANIMALS, PAIR_COUNT, &mut rng).unwrap();
        let mut ids: Vec<&str> = deck.tiles().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn short_catalog_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = build(&ANIMALS[..5], PAIR_COUNT, &mut rng).unwrap_err();
        assert_eq!(err, InvalidThemeError::TooFewTokens { needed: 8, found: 5 });
    }

    #[test]
    fn duplicate_in_prefix_is_rejected() {
        let tokens = ["a", "b", "c", "d", "e", "f", "g", "a", "z"];
        let mut rng = StdRng::seed_from_u64(3);
        let err = build(&tokens, PAIR_COUNT, &mut rng).unwrap_err();
        assert_eq!(err, InvalidThemeError::DuplicateToken { token: "a".to_string() });
    }

    #[test]
    fn zero_pairs_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(build(&ANIMALS, 0, &mut rng).unwrap_err(), InvalidThemeError::NoPairs);
    }

    #[test]
    fn shuffle_spreads_evenly_over_arrangements() {
        // Two pairs have 4!/2!2! = 6 distinct layouts; each should get about a sixth.
        const RUNS: u64 = 6_000;
        let mut counts: HashMap<String, u64> = HashMap::new();
        for seed in 0..RUNS {
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = build(&["a", "b"], 2, &mut rng).unwrap();
            let layout: String = deck.tiles().iter().map(|t| t.token).collect();
            *counts.entry(layout).or_default() += 1;
        }
        assert_eq!(counts.len(), 6, "layouts seen: {counts:?}");
        let expected = RUNS / 6;
        for (layout, count) in &counts {
            assert!(
                count.abs_diff(expected) < expected / 6,
                "{layout} came up {count} times, expected about {expected}"
            );
        }
    }
}
