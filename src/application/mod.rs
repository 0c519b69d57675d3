//! Application layer managing the session and the screen workflow.
//!
//! This module coordinates between the domain layer and presentation layer:
//! screen transitions, form buffers, and the login attempt counter.

pub mod flow;
pub mod forms;
pub mod state;
pub mod throttle;

pub use flow::*;
pub use forms::*;
pub use state::*;
pub use throttle::*;
