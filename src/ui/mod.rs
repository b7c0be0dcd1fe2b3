//! GTK4 + libadwaita front end over [`crate::game::Session`].

pub mod app;
pub mod board;
pub mod dialogs;
pub mod hud;
pub mod scene;
pub mod schedule;
pub mod sounds;
pub mod state;
pub mod theme_dialog;
