//! Platform abstraction layer
//!
//! Maps the minigame onto the page:
//! - `style`: stage transforms as CSS (platform-free)
//! - `dom`: element lookup, rendering, and trigger wiring (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod style;

pub use style::{actor_transform_css, hand_transform_css};
