//! Data types shared by the grid core, the renderer, and the host bindings.

mod geometry;
mod photo;

pub use geometry::*;
pub use photo::*;
