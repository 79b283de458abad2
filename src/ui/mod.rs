//! Interactive terminal UI for katafind
//!
//! This module provides the as-you-type search widget:
//! - `input`: the single-line search field
//! - `render`: crossterm drawing of the prompt and dropdown
//! - `session`: the event loop wiring input, engine and renderer together

pub mod input;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use input::{InputChange, SearchInput};
pub use render::Renderer;
pub use session::{SearchSession, SessionOptions};
