//! Presentation layer handling terminal UI and user input.
//!
//! Renders one view per screen with ratatui and maps key presses onto the
//! application's screen handlers.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
