//! Rendering: layer compositor over abstract surfaces.
//!
//! # Invariants
//! - Rendering never mutates session state.
//! - Layers are drawn in a fixed order; later layers overdraw earlier ones.
//! - The same scene always produces the same output.

mod compositor;
pub mod glyphs;
mod renderer;
mod surface;

pub use compositor::{Compositor, FrameStyle, Layer, Scene};
pub use renderer::{RasterRenderer, Renderer, TextRenderer};
pub use surface::{DrawList, DrawOp, Raster, Surface};
