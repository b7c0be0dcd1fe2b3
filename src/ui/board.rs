use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;
use tracing::debug;

use super::state::AppState;
use crate::game::{FlipOutcome, TileStatus};

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 8;

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("duotiles-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let session = state.borrow().session.clone();
    let (tile_count, columns) = {
        let session = session.borrow();
        (session.tiles().len(), session.settings().columns.max(1))
    };

    let mut buttons = Vec::with_capacity(tile_count);
    for index in 0..tile_count {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["duotiles-tile"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("duotiles-tile-face");

        let session_draw = session.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let Ok(session) = session_draw.try_borrow() else {
                return;
            };
            let Some(tile) = session.tiles().get(index) else {
                return;
            };
            let face_up = tile.status.is_face_up();
            let text = if face_up { tile.token.as_str() } else { "?" };

            let min_dim = width.min(height) as f64;
            let font_size = if face_up { min_dim * 0.44 } else { min_dim * 0.34 };

            cr.set_antialias(cairo::Antialias::Best);

            let layout = pangocairo::functions::create_layout(cr);
            let mut font_desc = pango::FontDescription::new();
            if face_up {
                font_desc.set_family("Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, sans");
            } else {
                font_desc.set_family("Cantarell, Noto Sans, sans");
                font_desc.set_weight(pango::Weight::Bold);
            }
            font_desc.set_size((font_size * pango::SCALE as f64) as i32);
            layout.set_font_description(Some(&font_desc));
            layout.set_text(text);

            let fg = area.style_context().color();
            cr.set_source_rgba(
                fg.red() as f64,
                fg.green() as f64,
                fg.blue() as f64,
                fg.alpha() as f64,
            );

            let (text_width, text_height) = layout.pixel_size();
            cr.move_to(
                (width as f64 - text_width as f64) / 2.0,
                (height as f64 - text_height as f64) / 2.0,
            );
            pangocairo::functions::show_layout(cr, &layout);
        });
        button.set_child(Some(&drawing_area));

        let state_click = state.clone();
        button.connect_clicked(move |_| {
            handle_tile_click(&state_click, index);
        });

        aspect_frame.set_child(Some(&button));
        grid.attach(
            &aspect_frame,
            (index % columns) as i32,
            (index / columns) as i32,
            1,
            1,
        );
        buttons.push(button);
    }

    state.borrow_mut().tile_buttons = buttons;
    grid
}

/// Forwards a click to the session. The app state must not stay borrowed
/// across the flip because the session listener writes to it.
pub fn handle_tile_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let session = state.borrow().session.clone();
    let outcome = session.borrow_mut().flip(index);
    if outcome == FlipOutcome::Ignored {
        debug!(index, "click ignored");
    }
}

pub(super) fn sync_tile(button: &gtk::Button, status: TileStatus) {
    match status {
        TileStatus::Hidden => {
            button.remove_css_class("active");
            button.remove_css_class("matched");
        }
        TileStatus::Flipped => {
            button.remove_css_class("matched");
            button.add_css_class("active");
        }
        TileStatus::Matched => {
            button.remove_css_class("active");
            button.add_css_class("matched");
        }
    }
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}
