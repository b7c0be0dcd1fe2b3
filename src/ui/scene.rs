use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use tracing::warn;

use super::hud::{best_text, queue_refresh, refresh};
use super::state::AppState;
use crate::game::leaderboard::JsonLinesLeaderboard;
use crate::game::timer::format_clock;
use crate::game::{SessionEvent, SessionListener, WinSummary};

const VICTORY_DELAY_MS: u64 = 700;
const LEADERS_SHOWN: usize = 5;

/// Routes session events to the widgets. Runs inside a session borrow, so it
/// only touches the app state and defers anything that reads the session.
pub struct UiListener {
    state: Weak<RefCell<AppState>>,
}

impl UiListener {
    pub fn new(state: &Rc<RefCell<AppState>>) -> Self {
        UiListener {
            state: Rc::downgrade(state),
        }
    }
}

impl SessionListener for UiListener {
    fn on_event(&self, event: &SessionEvent) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        match event {
            SessionEvent::RoundStarted { .. } => {
                let mut st = state.borrow_mut();
                st.round_serial = st.round_serial.wrapping_add(1);
            }
            SessionEvent::Won(_) => schedule_victory(&state),
            _ => {}
        }
        queue_refresh(&state);
    }
}

fn schedule_victory(state: &Rc<RefCell<AppState>>) {
    let serial = state.borrow().round_serial;
    let state = state.clone();
    glib::timeout_add_local_once(Duration::from_millis(VICTORY_DELAY_MS), move || {
        if state.borrow().round_serial != serial {
            return;
        }
        let session = state.borrow().session.clone();
        let summary = session.borrow().last_win().cloned();
        if let Some(summary) = summary {
            show_victory(&state, &summary);
        }
    });
}

fn leaders_text(board: &JsonLinesLeaderboard) -> String {
    board
        .top(LEADERS_SHOWN)
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            format!(
                "{}. {}  {} · {} turns",
                rank + 1,
                entry.name,
                format_clock(Duration::from_millis(entry.time_ms)),
                entry.turns
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    refresh(state);
    let st = state.borrow();
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideRight);
        stack.set_visible_child_name("game");
    }
}

pub(super) fn show_victory(state: &Rc<RefCell<AppState>>, summary: &WinSummary) {
    let st = state.borrow();
    if let Some(label) = &st.victory_title_label {
        label.set_text(if summary.is_new_best {
            "New personal best!"
        } else {
            "Well done!"
        });
    }
    if let Some(label) = &st.victory_stats_label {
        label.set_text(&format!(
            "{} · Time {} · {} turns",
            summary.theme,
            format_clock(Duration::from_millis(summary.time_ms)),
            summary.turns
        ));
    }
    if let Some(label) = &st.victory_best_label {
        label.set_text(&format!("Best {}", best_text(Some(summary.best))));
    }
    if let Some(label) = &st.victory_leaders_label {
        let text = st.leaderboard.as_ref().map(leaders_text).unwrap_or_default();
        label.set_visible(!text.is_empty());
        label.set_text(&text);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        stack.set_visible_child_name("victory");
    }
}

/// Deals a fresh round of the current theme and returns to the board.
pub(super) fn restart_game(state: &Rc<RefCell<AppState>>) {
    let session = state.borrow().session.clone();
    if let Err(err) = session.borrow_mut().reset() {
        warn!(%err, "cannot deal a new round");
        return;
    }
    show_game(state);
}

pub(super) fn change_theme(state: &Rc<RefCell<AppState>>, theme: &str) {
    let session = state.borrow().session.clone();
    if let Err(err) = session.borrow_mut().select_theme(theme) {
        warn!(%err, theme, "theme change rejected");
        return;
    }
    show_game(state);
}
