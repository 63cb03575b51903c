//! Rendering
//!
//! `frame` describes what the main view shows; `terminal` paints it.

pub mod frame;
pub mod terminal;

pub use frame::{build_draw_request, names_at, DrawRequest, EntityGlyph, HealthBar};
pub use terminal::{dim, paint, put_char, put_str, to_color};

use crate::ecs::Position;

/// Per-frame state that lives outside the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Map tile under the mouse pointer
    pub mouse: Option<Position>,
}
