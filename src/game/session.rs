use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::Settings;
use super::deck;
use super::error::SessionError;
use super::leaderboard::{LeaderboardEntry, LeaderboardSink};
use super::prefs::Preferences;
use super::records::{BestScore, BestScoreStore};
use super::round::{FlipOutcome, Round};
use super::scheduler::{Scheduler, TaskHandle};
use super::sound::{Silent, SoundBoard, SoundCue};
use super::state::{RoundPhase, Tile};
use super::storage::SharedStorage;
use super::themes::ThemeCatalog;
use super::timer::{Clock, Timer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinSummary {
    pub theme: String,
    pub time_ms: u64,
    pub turns: u32,
    pub is_new_best: bool,
    /// Record in effect after this round.
    pub best: BestScore,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted { theme: String },
    Revealed { index: usize },
    Matched { pair: [usize; 2], turns: u32 },
    Mismatched { pair: [usize; 2], turns: u32 },
    Settled { pair: [usize; 2] },
    Won(WinSummary),
}

/// Presentation hook. Called while the session is mutably borrowed, so
/// implementations must not borrow the session back.
pub trait SessionListener {
    fn on_event(&self, event: &SessionEvent);
}

impl<F: Fn(&SessionEvent)> SessionListener for F {
    fn on_event(&self, event: &SessionEvent) {
        self(event)
    }
}

/// Collaborators a session is assembled from.
pub struct SessionParts {
    pub catalog: ThemeCatalog,
    pub storage: SharedStorage,
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn Scheduler>,
    pub sounds: Box<dyn SoundBoard>,
    pub leaderboard: Option<Box<dyn LeaderboardSink>>,
    pub settings: Settings,
}

impl SessionParts {
    pub fn new(storage: SharedStorage, clock: Rc<dyn Clock>, scheduler: Rc<dyn Scheduler>) -> Self {
        SessionParts {
            catalog: ThemeCatalog::builtin(),
            storage,
            clock,
            scheduler,
            sounds: Box::new(Silent),
            leaderboard: None,
            settings: Settings::default(),
        }
    }
}

struct PendingSettle {
    generation: u64,
    handle: TaskHandle,
}

/// Owns the one live round and everything that reacts to it.
pub struct Session {
    this: Weak<RefCell<Session>>,
    catalog: ThemeCatalog,
    settings: Settings,
    theme: String,
    round: Round<String>,
    generation: u64,
    timer: Timer,
    scheduler: Rc<dyn Scheduler>,
    settle: Option<PendingSettle>,
    scores: BestScoreStore,
    prefs: Preferences,
    sounds: Box<dyn SoundBoard>,
    sound_on: bool,
    player_name: String,
    leaderboard: Option<Box<dyn LeaderboardSink>>,
    last_win: Option<WinSummary>,
    listener: Option<Rc<dyn SessionListener>>,
}

impl Session {
    /// Builds the session around the remembered theme, falling back to the
    /// catalog's first theme.
    pub fn shared(parts: SessionParts) -> Result<Rc<RefCell<Session>>, SessionError> {
        let SessionParts {
            catalog,
            storage,
            clock,
            scheduler,
            sounds,
            leaderboard,
            settings,
        } = parts;

        let prefs = Preferences::new(storage.clone());
        let theme = match prefs.theme() {
            Some(saved) if catalog.contains(&saved) => saved,
            _ => catalog
                .first()
                .map(|t| t.name.clone())
                .ok_or(SessionError::EmptyCatalog)?,
        };
        let round = Self::deal(&catalog, &theme)?;
        let sound_on = prefs.sound_on();
        let player_name = prefs.player_name();
        debug!(theme = %theme, player = %player_name, "session ready");

        Ok(Rc::new_cyclic(|this| {
            RefCell::new(Session {
                this: this.clone(),
                catalog,
                settings,
                theme,
                round,
                generation: 0,
                timer: Timer::new(clock),
                scheduler,
                settle: None,
                scores: BestScoreStore::new(storage),
                prefs,
                sounds,
                sound_on,
                player_name,
                leaderboard,
                last_win: None,
                listener: None,
            })
        }))
    }

    fn deal(catalog: &ThemeCatalog, theme: &str) -> Result<Round<String>, SessionError> {
        let tokens = catalog
            .get(theme)
            .ok_or_else(|| SessionError::UnknownTheme(theme.to_string()))?;
        let deck = deck::build_random(&tokens.tokens, deck::PAIR_COUNT)?;
        Ok(Round::new(deck))
    }

    pub fn set_listener(&mut self, listener: Rc<dyn SessionListener>) {
        self.listener = Some(listener);
    }

    /// Switches theme and deals a new round. Unknown themes leave everything as is.
    pub fn select_theme(&mut self, theme: &str) -> Result<(), SessionError> {
        let round = Self::deal(&self.catalog, theme)?;
        self.theme = theme.to_string();
        self.replace_round(round);
        self.prefs.set_theme(theme);
        Ok(())
    }

    /// Deals a fresh round of the current theme.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let round = Self::deal(&self.catalog, &self.theme)?;
        self.replace_round(round);
        Ok(())
    }

    /// Abandons the round in progress.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        if self.round.phase() == RoundPhase::Running {
            debug!(theme = %self.theme, turns = self.round.turns(), "round abandoned");
        }
        self.reset()
    }

    fn replace_round(&mut self, round: Round<String>) {
        if let Some(pending) = self.settle.take() {
            pending.handle.cancel();
        }
        self.timer.reset();
        self.generation = self.generation.wrapping_add(1);
        self.round = round;
        self.last_win = None;
        debug!(theme = %self.theme, generation = self.generation, "round dealt");
        self.emit(SessionEvent::RoundStarted {
            theme: self.theme.clone(),
        });
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        let outcome = self.round.flip(index);
        match outcome {
            FlipOutcome::Ignored => {}
            FlipOutcome::Revealed { index, started } => {
                if started {
                    self.timer.start();
                    debug!(theme = %self.theme, "round started");
                }
                self.play(SoundCue::Flip);
                self.emit(SessionEvent::Revealed { index });
            }
            FlipOutcome::Matched { pair, won } => {
                self.play(SoundCue::Flip);
                self.play(SoundCue::Match);
                self.emit(SessionEvent::Matched {
                    pair,
                    turns: self.round.turns(),
                });
                if won {
                    self.finish_round();
                }
            }
            FlipOutcome::Mismatched { pair } => {
                self.play(SoundCue::Flip);
                self.schedule_settle();
                self.emit(SessionEvent::Mismatched {
                    pair,
                    turns: self.round.turns(),
                });
            }
        }
        outcome
    }

    fn schedule_settle(&mut self) {
        let generation = self.generation;
        let session = self.this.clone();
        let handle = self.scheduler.schedule(
            self.settings.settle_delay(),
            Box::new(move || {
                if let Some(session) = session.upgrade() {
                    session.borrow_mut().settle_due(generation);
                }
            }),
        );
        if let Some(previous) = self.settle.replace(PendingSettle { generation, handle }) {
            previous.handle.cancel();
        }
    }

    fn settle_due(&mut self, generation: u64) {
        match self.settle.take() {
            Some(pending) if pending.generation == generation => {}
            other => {
                self.settle = other;
                warn!(generation, current = self.generation, "dropping stale settle");
                return;
            }
        }
        if let Some(pair) = self.round.settle() {
            self.emit(SessionEvent::Settled { pair });
        }
    }

    fn finish_round(&mut self) {
        self.timer.stop();
        let candidate = BestScore::from_elapsed(self.timer.elapsed(), self.round.turns());
        let commit = self.scores.commit(&self.theme, candidate);

        if self.settings.leaderboard
            && let Some(sink) = &self.leaderboard
        {
            let entry = LeaderboardEntry {
                name: self.player_name.clone(),
                turns: candidate.turns(),
                time_ms: candidate.time_ms(),
            };
            if let Err(err) = sink.submit(&entry) {
                warn!(%err, "leaderboard submit failed");
            }
        }

        let summary = WinSummary {
            theme: self.theme.clone(),
            time_ms: candidate.time_ms(),
            turns: candidate.turns(),
            is_new_best: commit.is_new_best,
            best: commit.best,
        };
        info!(
            theme = %summary.theme,
            time_ms = summary.time_ms,
            turns = summary.turns,
            new_best = summary.is_new_best,
            "round won"
        );
        self.play(SoundCue::Win);
        self.last_win = Some(summary.clone());
        self.emit(SessionEvent::Won(summary));
    }

    fn play(&self, cue: SoundCue) {
        if self.sound_on {
            self.sounds.play(cue);
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(listener) = &self.listener {
            listener.on_event(&event);
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tiles(&self) -> &[Tile<String>] {
        self.round.tiles()
    }

    pub fn turns(&self) -> u32 {
        self.round.turns()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn is_won(&self) -> bool {
        self.round.is_won()
    }

    pub fn is_locked(&self) -> bool {
        self.round.is_locked()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn best(&self) -> Option<BestScore> {
        self.scores.read(&self.theme)
    }

    pub fn clear_best(&mut self) {
        self.scores.clear(&self.theme);
    }

    pub fn last_win(&self) -> Option<&WinSummary> {
        self.last_win.as_ref()
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn set_sound_on(&mut self, on: bool) {
        self.sound_on = on;
        self.prefs.set_sound_on(on);
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, raw: &str) -> &str {
        self.player_name = self.prefs.set_player_name(raw);
        &self.player_name
    }
}
