//! DuoTiles: a pair-matching tile game.
//!
//! The `game` module holds the round state machine, timer, best-score store and
//! session controller. The GTK front end lives in `ui` behind the `gui` feature.

pub mod game;

#[cfg(feature = "gui")]
pub mod ui;
