use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use libadwaita as adw;

use crate::game::Session;
use crate::game::leaderboard::JsonLinesLeaderboard;

/// Widget handles plus the session they present.
pub struct AppState {
    pub session: Rc<RefCell<Session>>,
    pub view_stack: Option<gtk::Stack>,
    pub window_title: Option<adw::WindowTitle>,
    pub restart_button: Option<gtk::Button>,
    pub tile_buttons: Vec<gtk::Button>,
    pub time_label: Option<gtk::Label>,
    pub phase_label: Option<gtk::Label>,
    pub turns_label: Option<gtk::Label>,
    pub best_label: Option<gtk::Label>,
    pub victory_title_label: Option<gtk::Label>,
    pub victory_stats_label: Option<gtk::Label>,
    pub victory_best_label: Option<gtk::Label>,
    pub victory_leaders_label: Option<gtk::Label>,
    /// Local board shown on the victory view, when enabled.
    pub leaderboard: Option<JsonLinesLeaderboard>,
    pub tick_handle: Option<glib::SourceId>,
    pub refresh_queued: bool,
    /// Bumped on every new round; delayed UI work compares against it.
    pub round_serial: u64,
}

impl AppState {
    pub fn new(session: Rc<RefCell<Session>>, leaderboard: Option<JsonLinesLeaderboard>) -> Self {
        AppState {
            session,
            view_stack: None,
            window_title: None,
            restart_button: None,
            tile_buttons: Vec::new(),
            time_label: None,
            phase_label: None,
            turns_label: None,
            best_label: None,
            victory_title_label: None,
            victory_stats_label: None,
            victory_best_label: None,
            victory_leaders_label: None,
            leaderboard,
            tick_handle: None,
            refresh_queued: false,
            round_serial: 0,
        }
    }
}
