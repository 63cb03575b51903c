//! User interface
//!
//! Input handling, per-screen handlers, and the application shell.

pub mod app;
pub mod handlers;
pub mod input;

pub use app::App;
pub use handlers::{Handler, HandlerContext, Transition};
pub use input::InputEvent;
