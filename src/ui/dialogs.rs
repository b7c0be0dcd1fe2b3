use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use tracing::info;

use super::hud::refresh;
use super::state::AppState;
use crate::game::prefs::NAME_MAX_CHARS;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("How to play"),
        Some(
            "Flip two tiles per turn and find the matching pairs.\n\
Mismatched tiles turn back over after a moment.\n\
Clear the board in as little time as you can.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("DuoTiles")
        .application_icon("io.github.duotiles.DuoTiles")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("Flip tiles, find the pairs, beat your best time.")
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_reset_best_dialog(state: &Rc<RefCell<AppState>>, app: &adw::Application) {
    let theme = state.borrow().session.borrow().theme().to_string();
    let dialog = adw::AlertDialog::new(
        Some("Reset best time?"),
        Some(&format!("The personal best for {theme} will be forgotten.")),
    );
    dialog.add_response("cancel", "Cancel");
    dialog.add_response("reset", "Reset");
    dialog.set_response_appearance("reset", adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("cancel"));
    dialog.set_close_response("cancel");
    dialog.connect_response(None, {
        let state = state.clone();
        move |_, response| {
            if response != "reset" {
                return;
            }
            let session = state.borrow().session.clone();
            session.borrow_mut().clear_best();
            info!(theme = %session.borrow().theme(), "best time reset");
            refresh(&state);
        }
    });
    dialog.present(app.active_window().as_ref());
}

pub fn show_name_dialog(state: &Rc<RefCell<AppState>>, app: &adw::Application) {
    let current = state.borrow().session.borrow().player_name().to_string();

    let entry = gtk::Entry::new();
    entry.set_text(&current);
    entry.set_max_length(NAME_MAX_CHARS as i32);
    entry.set_activates_default(true);

    let dialog = adw::AlertDialog::new(
        Some("Player name"),
        Some("Shown next to your times on the leaderboard."),
    );
    dialog.set_extra_child(Some(&entry));
    dialog.add_response("cancel", "Cancel");
    dialog.add_response("save", "Save");
    dialog.set_response_appearance("save", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("save"));
    dialog.set_close_response("cancel");
    dialog.connect_response(None, {
        let state = state.clone();
        let entry = entry.clone();
        move |_, response| {
            if response != "save" {
                return;
            }
            let session = state.borrow().session.clone();
            let mut session = session.borrow_mut();
            let name = session.set_player_name(&entry.text());
            info!(name, "player renamed");
        }
    });
    dialog.present(app.active_window().as_ref());
}
