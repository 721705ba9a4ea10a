//! Canvas 2D rendering module
//!
//! `scene` lays the frame out as draw commands; `canvas` paints them.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::{DrawCmd, Rect, build};
