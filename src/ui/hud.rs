use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::board::sync_tile;
use super::state::AppState;
use crate::game::timer::format_clock;
use crate::game::{BestScore, RoundPhase};

const TICK_MS: u64 = 250;

fn build_pill(caption: &str) -> (gtk::Box, gtk::Label) {
    let pill = gtk::Box::new(gtk::Orientation::Vertical, 2);
    pill.add_css_class("hud-pill");
    pill.set_hexpand(true);

    let caption = gtk::Label::new(Some(caption));
    caption.add_css_class("caption");
    caption.add_css_class("dim-label");

    let value = gtk::Label::new(Some("--"));
    value.add_css_class("hud-value");
    value.add_css_class("numeric");

    pill.append(&caption);
    pill.append(&value);
    (pill, value)
}

pub(super) fn build_hud(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    row.add_css_class("hud-row");
    row.set_halign(gtk::Align::Fill);

    let (time_pill, time_label) = build_pill("Time");
    let phase_label = gtk::Label::new(Some(RoundPhase::NotStarted.name()));
    phase_label.add_css_class("caption");
    phase_label.add_css_class("dim-label");
    time_pill.append(&phase_label);
    let (turns_pill, turns_label) = build_pill("Turns");
    let (best_pill, best_label) = build_pill("Personal Best");
    row.append(&time_pill);
    row.append(&turns_pill);
    row.append(&best_pill);

    let mut st = state.borrow_mut();
    st.time_label = Some(time_label);
    st.phase_label = Some(phase_label);
    st.turns_label = Some(turns_label);
    st.best_label = Some(best_label);
    row
}

pub(super) fn best_text(best: Option<BestScore>) -> String {
    match best {
        Some(best) => format!(
            "{} · {} turns",
            format_clock(Duration::from_millis(best.time_ms())),
            best.turns()
        ),
        None => "--:--".to_string(),
    }
}

/// Coalesces session events into one refresh on the next idle.
pub(super) fn queue_refresh(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        if st.refresh_queued {
            return;
        }
        st.refresh_queued = true;
    }
    let state = state.clone();
    glib::idle_add_local_once(move || refresh(&state));
}

/// Pulls tiles, counters and the best score from the session into the widgets.
pub(super) fn refresh(state: &Rc<RefCell<AppState>>) {
    let session = {
        let mut st = state.borrow_mut();
        st.refresh_queued = false;
        st.session.clone()
    };
    let running = {
        let session = session.borrow();
        let st = state.borrow();
        for (button, tile) in st.tile_buttons.iter().zip(session.tiles()) {
            sync_tile(button, tile.status);
        }
        if let Some(label) = &st.time_label {
            label.set_text(&format_clock(session.elapsed()));
        }
        if let Some(label) = &st.turns_label {
            label.set_text(&session.turns().to_string());
        }
        if let Some(label) = &st.best_label {
            label.set_text(&best_text(session.best()));
        }
        if let Some(label) = &st.phase_label {
            label.set_text(session.phase().name());
        }
        if let Some(title) = &st.window_title {
            title.set_subtitle(session.theme());
        }
        session.phase() == RoundPhase::Running
    };

    if running {
        start_tick(state);
    } else {
        stop_tick(&mut state.borrow_mut());
    }
}

pub(super) fn start_tick(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    if st.tick_handle.is_some() {
        return;
    }
    let state_weak = Rc::downgrade(state);
    let handle = glib::timeout_add_local(Duration::from_millis(TICK_MS), move || {
        let Some(state) = state_weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        let st = state.borrow();
        let elapsed = st.session.borrow().elapsed();
        if let Some(label) = &st.time_label {
            label.set_text(&format_clock(elapsed));
        }
        glib::ControlFlow::Continue
    });
    st.tick_handle = Some(handle);
}

pub(super) fn stop_tick(st: &mut AppState) {
    if let Some(handle) = st.tick_handle.take() {
        handle.remove();
    }
}
