use thiserror::Error;

/// A theme catalog entry that cannot produce a full board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidThemeError {
    #[error("theme needs {needed} tokens but only has {found}")]
    TooFewTokens { needed: usize, found: usize },
    #[error("theme repeats token {token:?} within its first pairs")]
    DuplicateToken { token: String },
    #[error("a deck needs at least one pair")]
    NoPairs,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage file {0} is unreadable and could not be moved aside")]
    ReadOnly(std::path::PathBuf),
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard io: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("leaderboard unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("theme catalog is empty")]
    EmptyCatalog,
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
    #[error(transparent)]
    InvalidTheme(#[from] InvalidThemeError),
}
