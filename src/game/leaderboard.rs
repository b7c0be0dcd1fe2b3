use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::LeaderboardError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub turns: u32,
    pub time_ms: u64,
}

/// Fire-and-forget destination for finished rounds. Failures never reach the round.
pub trait LeaderboardSink {
    fn submit(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError>;
}

/// Appends one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesLeaderboard {
    path: PathBuf,
}

impl JsonLinesLeaderboard {
    pub const FILE_NAME: &'static str = "leaderboard.jsonl";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesLeaderboard { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    /// Entries sorted fastest first; unreadable lines are skipped.
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let mut entries: Vec<LeaderboardEntry> = raw
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        entries.sort_by(|a, b| a.time_ms.cmp(&b.time_ms).then_with(|| a.turns.cmp(&b.turns)));
        entries.truncate(limit);
        entries
    }
}

impl LeaderboardSink for JsonLinesLeaderboard {
    fn submit(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
