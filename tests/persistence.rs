// Records, preferences and leaderboard entries surviving a restart.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use duotiles::game::error::LeaderboardError;
use duotiles::game::leaderboard::{JsonLinesLeaderboard, LeaderboardEntry, LeaderboardSink};
use duotiles::game::scheduler::ManualScheduler;
use duotiles::game::storage::{FileStore, SharedStorage};
use duotiles::game::timer::ManualClock;
use duotiles::game::{BestScore, Session, SessionParts, TileStatus};
use tempfile::tempdir;

fn open_session(dir: &std::path::Path, clock: Rc<ManualClock>) -> Rc<RefCell<Session>> {
    let scheduler = Rc::new(ManualScheduler::new(clock.clone()));
    let storage: SharedStorage = Rc::new(RefCell::new(FileStore::in_dir(dir)));
    let mut parts = SessionParts::new(storage, clock, scheduler);
    parts.leaderboard = Some(Box::new(JsonLinesLeaderboard::in_dir(dir)));
    Session::shared(parts).unwrap()
}

fn clear_board(session: &Rc<RefCell<Session>>, clock: &ManualClock) {
    for i in 0..16 {
        let mate = {
            let s = session.borrow();
            if s.tiles()[i].status != TileStatus::Hidden {
                continue;
            }
            (0..16)
                .find(|&j| j != i && s.tiles()[j].token == s.tiles()[i].token)
                .unwrap()
        };
        session.borrow_mut().flip(i);
        clock.advance(Duration::from_millis(500));
        session.borrow_mut().flip(mate);
    }
}

#[test]
fn theme_name_and_record_survive_restart() {
    let dir = tempdir().unwrap();
    let clock = Rc::new(ManualClock::new());
    {
        let session = open_session(dir.path(), clock.clone());
        session.borrow_mut().select_theme("Fruits").unwrap();
        session.borrow_mut().set_player_name("Ada <Lovelace>!");
        session.borrow_mut().set_sound_on(false);
        clear_board(&session, &clock);
        assert!(session.borrow().last_win().unwrap().is_new_best);
    }

    let session = open_session(dir.path(), clock);
    let s = session.borrow();
    assert_eq!(s.theme(), "Fruits");
    assert_eq!(s.player_name(), "Ada Lovelace");
    assert!(!s.sound_on());
    assert_eq!(s.best(), BestScore::new(4000, 8));
}

#[test]
fn records_are_kept_per_theme() {
    let dir = tempdir().unwrap();
    let clock = Rc::new(ManualClock::new());
    let session = open_session(dir.path(), clock.clone());
    clear_board(&session, &clock);
    assert!(session.borrow().best().is_some());

    session.borrow_mut().select_theme("Space").unwrap();
    assert_eq!(session.borrow().best(), None);
    session.borrow_mut().select_theme("Animals").unwrap();
    assert_eq!(session.borrow().best(), BestScore::new(4000, 8));

    session.borrow_mut().clear_best();
    assert_eq!(session.borrow().best(), None);
}

#[test]
fn winning_rounds_reach_the_leaderboard() {
    let dir = tempdir().unwrap();
    let clock = Rc::new(ManualClock::new());
    let session = open_session(dir.path(), clock.clone());
    session.borrow_mut().set_player_name("Grace");
    clear_board(&session, &clock);

    let board = JsonLinesLeaderboard::in_dir(dir.path());
    assert_eq!(
        board.top(10),
        vec![LeaderboardEntry {
            name: "Grace".to_string(),
            turns: 8,
            time_ms: 4000,
        }]
    );
}

struct BrokenSink;

impl LeaderboardSink for BrokenSink {
    fn submit(&self, _entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unavailable)
    }
}

#[test]
fn leaderboard_failure_does_not_spoil_the_win() {
    let dir = tempdir().unwrap();
    let clock = Rc::new(ManualClock::new());
    let scheduler = Rc::new(ManualScheduler::new(clock.clone()));
    let storage: SharedStorage = Rc::new(RefCell::new(FileStore::in_dir(dir.path())));
    let mut parts = SessionParts::new(storage, clock.clone(), scheduler);
    parts.leaderboard = Some(Box::new(BrokenSink));
    let session = Session::shared(parts).unwrap();

    clear_board(&session, &clock);
    let s = session.borrow();
    assert!(s.is_won());
    assert_eq!(s.best(), BestScore::new(4000, 8));
}

#[test]
fn corrupt_storage_file_starts_fresh() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(FileStore::FILE_NAME), "{not json").unwrap();
    let session = open_session(dir.path(), Rc::new(ManualClock::new()));
    let s = session.borrow();
    assert_eq!(s.theme(), "Animals");
    assert_eq!(s.best(), None);
    assert!(s.sound_on());
}

#[test]
fn unreadable_storage_file_is_kept_for_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(FileStore::FILE_NAME);
    let original = b"{\"duotiles_best_Animals\": \"{\\\"timeMs\\\":9\xff}\"}".to_vec();
    std::fs::write(&path, &original).unwrap();

    let session = open_session(dir.path(), Rc::new(ManualClock::new()));
    assert_eq!(session.borrow().best(), None);

    let kept: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("storage.corrupt-"))
        .collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(std::fs::read(&kept[0]).unwrap(), original);
}
