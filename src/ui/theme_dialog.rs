use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::scene::change_theme;
use super::state::AppState;

fn add_theme_row(content: &gtk::Box, label: &str, current: bool, on_select: impl Fn() + 'static) {
    let button = gtk::Button::with_label(label);
    button.set_hexpand(true);
    button.set_size_request(-1, 42);
    button.add_css_class("theme-dialog-button");
    if current {
        button.add_css_class("suggested-action");
    }
    button.connect_clicked(move |_| on_select());
    content.append(&button);
}

pub fn show_theme_dialog(state: &Rc<RefCell<AppState>>, app: &adw::Application) {
    let parent_window = app.active_window();
    let dialog = adw::Dialog::new();
    dialog.set_can_close(true);
    dialog.set_content_width(320);

    let title = gtk::Label::new(Some("Choose theme"));
    title.add_css_class("dialog-header-title");
    title.set_halign(gtk::Align::Center);

    let header = adw::HeaderBar::new();
    header.set_title_widget(Some(&title));
    header.set_show_end_title_buttons(true);
    header.add_css_class("flat");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.add_css_class("theme-dialog-content");
    content.set_margin_top(16);
    content.set_margin_bottom(16);
    content.set_margin_start(16);
    content.set_margin_end(16);

    let (current, rows): (String, Vec<(String, String)>) = {
        let st = state.borrow();
        let session = st.session.borrow();
        let catalog = session.catalog();
        let rows = catalog
            .names()
            .filter_map(|name| catalog.get(name))
            .map(|theme| {
                let preview = theme.tokens.first().map(String::as_str).unwrap_or("");
                (theme.name.clone(), format!("{preview}  {}", theme.name))
            })
            .collect();
        (session.theme().to_string(), rows)
    };

    for (name, label) in rows {
        add_theme_row(&content, &label, name == current, {
            let state = state.clone();
            let dialog = dialog.clone();
            move || {
                dialog.close();
                change_theme(&state, &name);
            }
        });
    }

    let scroller = gtk::ScrolledWindow::new();
    scroller.set_hscrollbar_policy(gtk::PolicyType::Never);
    scroller.set_propagate_natural_height(true);
    scroller.set_max_content_height(480);
    scroller.set_child(Some(&content));

    let toolbar = adw::ToolbarView::new();
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&scroller));

    dialog.set_child(Some(&toolbar));
    dialog.present(parent_window.as_ref());
}
