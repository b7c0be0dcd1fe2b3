use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::StorageError;
use super::storage::SharedStorage;

const BEST_KEY_PREFIX: &str = "duotiles_best_";

/// Fastest completed round for a theme, ties broken by fewer turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestScore {
    time_ms: u64,
    turns: u32,
}

impl BestScore {
    /// `None` for a zero time; no stored record may have one.
    pub fn new(time_ms: u64, turns: u32) -> Option<Self> {
        (time_ms > 0).then_some(BestScore { time_ms, turns })
    }

    /// Score for a finished round; sub-millisecond times count as 1 ms.
    pub fn from_elapsed(elapsed: Duration, turns: u32) -> Self {
        let time_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX).max(1);
        BestScore { time_ms, turns }
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Strictly better: faster, or as fast in fewer turns.
    pub fn beats(&self, other: &BestScore) -> bool {
        self.time_ms < other.time_ms || (self.time_ms == other.time_ms && self.turns < other.turns)
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Stored {
            time_ms: u64,
            turns: u32,
        }
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        if !value.is_object() {
            return None;
        }
        let stored: Stored = serde_json::from_value(value).ok()?;
        BestScore::new(stored.time_ms, stored.turns)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commit {
    pub best: BestScore,
    pub is_new_best: bool,
}

pub struct BestScoreStore {
    storage: SharedStorage,
}

impl BestScoreStore {
    pub fn new(storage: SharedStorage) -> Self {
        BestScoreStore { storage }
    }

    pub fn key_for(theme: &str) -> String {
        format!("{BEST_KEY_PREFIX}{theme}")
    }

    /// Malformed records read as absent.
    pub fn read(&self, theme: &str) -> Option<BestScore> {
        let raw = self.storage.borrow().get(&Self::key_for(theme))?;
        let parsed = BestScore::from_json(&raw);
        if parsed.is_none() {
            warn!(theme, raw = %raw, "discarding corrupt best score");
        }
        parsed
    }

    pub fn commit(&self, theme: &str, candidate: BestScore) -> Commit {
        if let Some(stored) = self.read(theme)
            && !candidate.beats(&stored)
        {
            return Commit {
                best: stored,
                is_new_best: false,
            };
        }

        match self.persist(theme, &candidate) {
            Ok(()) => debug!(theme, time_ms = candidate.time_ms, turns = candidate.turns, "stored best score"),
            Err(err) => warn!(theme, %err, "could not persist best score"),
        }
        Commit {
            best: candidate,
            is_new_best: true,
        }
    }

    fn persist(&self, theme: &str, score: &BestScore) -> Result<(), StorageError> {
        let raw = serde_json::to_string(score)?;
        self.storage.borrow_mut().set(&Self::key_for(theme), raw)
    }

    pub fn clear(&self, theme: &str) {
        if let Err(err) = self.storage.borrow_mut().remove(&Self::key_for(theme)) {
            warn!(theme, %err, "could not clear best score");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::game::storage::{KeyValueStore, MemoryStore};

    fn store() -> (Rc<RefCell<MemoryStore>>, BestScoreStore) {
        let memory = Rc::new(RefCell::new(MemoryStore::new()));
        let store = BestScoreStore::new(memory.clone());
        (memory, store)
    }

    fn score(time_ms: u64, turns: u32) -> BestScore {
        BestScore::new(time_ms, turns).unwrap()
    }

    #[test]
    fn first_commit_is_stored() {
        let (memory, store) = store();
        let commit = store.commit("Animals", score(42_000, 11));
        assert!(commit.is_new_best);
        assert_eq!(store.read("Animals"), Some(score(42_000, 11)));
        assert_eq!(
            memory.borrow().get("duotiles_best_Animals").as_deref(),
            Some("{\"timeMs\":42000,\"turns\":11}")
        );
    }

    #[test]
    fn fewer_turns_wins_a_tie() {
        let (_memory, store) = store();
        store.commit("Animals", score(50_000, 20));
        let commit = store.commit("Animals", score(50_000, 15));
        assert!(commit.is_new_best);
        assert_eq!(store.read("Animals"), Some(score(50_000, 15)));
    }

    #[test]
    fn slower_time_never_wins() {
        let (_memory, store) = store();
        store.commit("Animals", score(50_000, 20));
        let commit = store.commit("Animals", score(60_000, 5));
        assert_eq!(
            commit,
            Commit {
                best: score(50_000, 20),
                is_new_best: false
            }
        );
        assert_eq!(store.read("Animals"), Some(score(50_000, 20)));
    }

    #[test]
    fn equal_record_does_not_replace() {
        let (_memory, store) = store();
        store.commit("Food", score(30_000, 9));
        assert!(!store.commit("Food", score(30_000, 9)).is_new_best);
    }

    #[test]
    fn themes_are_independent() {
        let (_memory, store) = store();
        store.commit("Food", score(30_000, 9));
        assert_eq!(store.read("Ocean"), None);
        assert!(store.commit("Ocean", score(90_000, 30)).is_new_best);
    }

    #[test]
    fn corrupt_records_read_as_absent() {
        let (memory, store) = store();
        for raw in [
            "not json",
            "null",
            "{\"timeMs\":\"fast\",\"turns\":3}",
            "{\"timeMs\":0,\"turns\":3}",
            "{\"timeMs\":-5,\"turns\":3}",
            "{\"turns\":3}",
            "[1,2]",
        ] {
            memory
                .borrow_mut()
                .set("duotiles_best_Space", raw.to_string())
                .unwrap();
            assert_eq!(store.read("Space"), None, "{raw} should read as absent");
        }
        assert!(store.commit("Space", score(70_000, 14)).is_new_best);
        assert_eq!(store.read("Space"), Some(score(70_000, 14)));
    }

    #[test]
    fn zero_time_cannot_be_constructed() {
        assert_eq!(BestScore::new(0, 8), None);
    }

    #[test]
    fn elapsed_scores_are_never_zero() {
        let score = BestScore::from_elapsed(Duration::from_micros(300), 8);
        assert_eq!(score.time_ms(), 1);
        assert_eq!(BestScore::from_elapsed(Duration::from_millis(41_250), 8).time_ms(), 41_250);
    }

    #[test]
    fn clear_removes_record() {
        let (_memory, store) = store();
        store.commit("Love", score(12_345, 8));
        store.clear("Love");
        assert_eq!(store.read("Love"), None);
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let value = serde_json::to_value(score(1_500, 8)).unwrap();
        assert_eq!(value, serde_json::json!({ "timeMs": 1500, "turns": 8 }));
    }
}
