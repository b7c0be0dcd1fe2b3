use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::deck::{BOARD_COLUMNS, PAIR_COUNT};

pub const APP_DIR_NAME: &str = "duotiles";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause before a mismatched pair turns back over.
    pub settle_delay_ms: u64,
    pub columns: usize,
    /// Offer finished rounds to the local leaderboard file.
    pub leaderboard: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            settle_delay_ms: 600,
            columns: BOARD_COLUMNS,
            leaderboard: true,
        }
    }
}

impl Settings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn rows(&self) -> usize {
        (PAIR_COUNT * 2).div_ceil(self.columns.max(1))
    }

    /// Reads `settings.json` from `dir`; missing or malformed files give defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE_NAME);
        let Ok(raw) = fs::read_to_string(&path) else {
            return Settings::default();
        };
        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring malformed settings");
                Settings::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.columns == 0 {
            self.columns = BOARD_COLUMNS;
        }
        self
    }
}

/// `<config>/duotiles`, or the working directory when no config dir is known.
pub fn data_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.settle_delay(), Duration::from_millis(600));
        assert_eq!(settings.rows(), 4);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{\"settle_delay_ms\": 1500}").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.settle_delay_ms, 1500);
        assert_eq!(settings.columns, 4);
        assert!(settings.leaderboard);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "settle=fast").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn zero_columns_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{\"columns\": 0}").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!((settings.columns, settings.rows()), (4, 4));
    }

    #[test]
    fn board_size_is_not_configurable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{\"pair_count\": 3, \"settle_delay_ms\": 900}").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.settle_delay_ms, 900);
        assert_eq!(settings.rows(), 4);
    }
}
