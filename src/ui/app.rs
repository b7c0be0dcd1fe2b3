use std::cell::RefCell;
use std::rc::Rc;

use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use tracing::{error, info};

use super::board::{CONTENT_MARGIN, build_board_grid};
use super::dialogs::{
    show_about_dialog,
    show_instructions_dialog,
    show_name_dialog,
    show_reset_best_dialog,
};
use super::hud::{build_hud, refresh, stop_tick};
use super::scene::{UiListener, restart_game};
use super::schedule::GlibScheduler;
use super::sounds::MediaSounds;
use super::state::AppState;
use super::theme_dialog::show_theme_dialog;
use crate::game::config::{self, Settings};
use crate::game::leaderboard::JsonLinesLeaderboard;
use crate::game::storage::{FileStore, SharedStorage};
use crate::game::timer::SystemClock;
use crate::game::{Session, SessionError, SessionParts};

const APP_ID: &str = "io.github.duotiles.DuoTiles";

const STYLE: &str = "
.hud-pill {
    padding: 8px 12px;
    border-radius: 12px;
    background-color: alpha(currentColor, 0.06);
}
.hud-value {
    font-size: 1.25em;
    font-weight: bold;
}
.duotiles-board-card {
    padding: 12px;
    border-radius: 18px;
    background-color: alpha(currentColor, 0.04);
}
.duotiles-tile {
    padding: 0;
    border-radius: 14px;
    transition: background-color 150ms ease-in-out;
}
.duotiles-tile.active {
    background-color: alpha(@accent_bg_color, 0.25);
}
.duotiles-tile.matched {
    background-color: alpha(@success_color, 0.25);
}
.victory-card {
    padding: 28px;
    border-radius: 24px;
    background-color: alpha(currentColor, 0.05);
}
";

fn load_css() {
    let Some(display) = gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLE);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

type Opened = (Rc<RefCell<Session>>, Option<JsonLinesLeaderboard>);

/// Wires the session to on-disk storage, the glib main loop and sound files.
fn open_session() -> Result<Opened, SessionError> {
    let dir = config::data_dir();
    let settings = Settings::load(&dir);
    let storage: SharedStorage = Rc::new(RefCell::new(FileStore::in_dir(&dir)));

    let mut parts = SessionParts::new(storage, Rc::new(SystemClock), Rc::new(GlibScheduler));
    parts.sounds = Box::new(MediaSounds::in_dir(&dir));
    let leaderboard = settings
        .leaderboard
        .then(|| JsonLinesLeaderboard::in_dir(&dir));
    if let Some(board) = &leaderboard {
        parts.leaderboard = Some(Box::new(board.clone()));
    }
    parts.settings = settings;
    info!(dir = %dir.display(), "data directory");
    Ok((Session::shared(parts)?, leaderboard))
}

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        load_css();

        let (session, leaderboard) = match open_session() {
            Ok(opened) => opened,
            Err(err) => {
                error!(%err, "cannot start a round");
                app.quit();
                return;
            }
        };
        let state = Rc::new(RefCell::new(AppState::new(session.clone(), leaderboard)));
        session
            .borrow_mut()
            .set_listener(Rc::new(UiListener::new(&state)));

        install_actions(app, &state);

        let window_title = adw::WindowTitle::new("DuoTiles", session.borrow().theme());

        let header = adw::HeaderBar::builder()
            .title_widget(&window_title)
            .build();
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        let game_section = gio::Menu::new();
        game_section.append(Some("Change Theme"), Some("app.theme"));
        game_section.append(Some("Player Name"), Some("app.player-name"));
        game_section.append(Some("Sound"), Some("app.sound"));
        game_section.append(Some("Reset Best Time"), Some("app.reset-best"));
        menu_model.append_section(None, &game_section);
        let app_section = gio::Menu::new();
        app_section.append(Some("How to Play"), Some("app.instructions"));
        app_section.append(Some("About DuoTiles"), Some("app.about"));
        app_section.append(Some("Quit"), Some("app.quit"));
        menu_model.append_section(None, &app_section);

        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some("New Game"));
        restart_button.connect_clicked({
            let state = state.clone();
            move |_| restart_game(&state)
        });
        header.pack_start(&restart_button);
        header.pack_end(&menu_button);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_transition_duration(300);

        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some("game"));
        let victory_view = build_victory_view(&state, app);
        view_stack.add_named(&victory_view, Some("victory"));
        view_stack.set_visible_child_name("game");

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&view_stack));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("DuoTiles")
            .icon_name(APP_ID)
            .default_width(560)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 520);

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack);
            st.window_title = Some(window_title);
            st.restart_button = Some(restart_button);
        }

        let keys = gtk::EventControllerKey::new();
        keys.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, mods| {
                if key == gdk::Key::F5
                    || (key == gdk::Key::n && mods.contains(gdk::ModifierType::CONTROL_MASK))
                {
                    restart_game(&state);
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(keys);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                stop_tick(&mut state.borrow_mut());
                glib::Propagation::Proceed
            }
        });

        refresh(&state);
        win.present();
    });

    app.run()
}

fn install_actions(app: &adw::Application, state: &Rc<RefCell<AppState>>) {
    let theme_action = SimpleAction::new("theme", None);
    theme_action.connect_activate({
        let app = app.clone();
        let state = state.clone();
        move |_, _| show_theme_dialog(&state, &app)
    });
    app.add_action(&theme_action);

    let name_action = SimpleAction::new("player-name", None);
    name_action.connect_activate({
        let app = app.clone();
        let state = state.clone();
        move |_, _| show_name_dialog(&state, &app)
    });
    app.add_action(&name_action);

    let sound_on = state.borrow().session.borrow().sound_on();
    let sound_action = SimpleAction::new_stateful("sound", None, &sound_on.to_variant());
    sound_action.connect_activate({
        let state = state.clone();
        move |action, _| {
            let on = !action
                .state()
                .and_then(|value| value.get::<bool>())
                .unwrap_or(true);
            action.set_state(&on.to_variant());
            let session = state.borrow().session.clone();
            session.borrow_mut().set_sound_on(on);
        }
    });
    app.add_action(&sound_action);

    let reset_action = SimpleAction::new("reset-best", None);
    reset_action.connect_activate({
        let app = app.clone();
        let state = state.clone();
        move |_, _| show_reset_best_dialog(&state, &app)
    });
    app.add_action(&reset_action);

    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_instructions_dialog(&app);
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(&app);
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        let state = state.clone();
        move |_, _| {
            let session = state.borrow().session.clone();
            if let Err(err) = session.borrow_mut().quit() {
                error!(%err, "failed to abandon round");
            }
            app.quit();
        }
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<primary>q"]);
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    root.append(&build_hud(state));

    let (columns, rows) = {
        let st = state.borrow();
        let session = st.session.borrow();
        let settings = session.settings();
        (settings.columns.max(1) as f32, settings.rows().max(1) as f32)
    };

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.add_css_class("duotiles-board-card");
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);

    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, columns / rows, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&build_board_grid(state)));
    board_card.append(&grid_frame);

    root.append(&board_card);
    root
}

fn build_victory_view(state: &Rc<RefCell<AppState>>, app: &adw::Application) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 14);
    content.add_css_class("victory-card");
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);

    let title = gtk::Label::new(Some("Well done!"));
    title.add_css_class("title-1");

    let stats = gtk::Label::new(None);
    stats.add_css_class("body");
    stats.set_wrap(true);
    stats.set_justify(gtk::Justification::Center);
    stats.set_max_width_chars(36);

    let best = gtk::Label::new(None);
    best.add_css_class("dim-label");

    let leaders = gtk::Label::new(None);
    leaders.add_css_class("caption");
    leaders.set_justify(gtk::Justification::Left);
    leaders.set_visible(false);

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    buttons.set_halign(gtk::Align::Center);
    buttons.set_margin_top(6);

    let again_btn = gtk::Button::with_label("Play Again");
    again_btn.add_css_class("suggested-action");
    again_btn.add_css_class("pill");
    again_btn.connect_clicked({
        let state = state.clone();
        move |_| restart_game(&state)
    });

    let theme_btn = gtk::Button::with_label("Change Theme");
    theme_btn.add_css_class("pill");
    theme_btn.connect_clicked({
        let state = state.clone();
        let app = app.clone();
        move |_| show_theme_dialog(&state, &app)
    });

    buttons.append(&again_btn);
    buttons.append(&theme_btn);

    content.append(&title);
    content.append(&stats);
    content.append(&best);
    content.append(&leaders);
    content.append(&buttons);
    center.set_center_widget(Some(&content));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.victory_title_label = Some(title);
        st.victory_stats_label = Some(stats);
        st.victory_best_label = Some(best);
        st.victory_leaders_label = Some(leaders);
    }

    root
}
