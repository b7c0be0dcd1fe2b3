//! Toolkit-free game core: one round of pair matching plus what it persists.

pub mod config;
pub mod deck;
pub mod error;
pub mod leaderboard;
pub mod prefs;
pub mod records;
pub mod round;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod state;
pub mod storage;
pub mod themes;
pub mod timer;

pub use error::{InvalidThemeError, LeaderboardError, SessionError, StorageError};
pub use records::{BestScore, BestScoreStore, Commit};
pub use round::{FlipOutcome, Round};
pub use session::{Session, SessionEvent, SessionListener, SessionParts, WinSummary};
pub use state::{RoundPhase, Tile, TileStatus};
