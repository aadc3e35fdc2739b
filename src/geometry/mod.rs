pub mod parse;
pub mod store;

pub use parse::{Geometry, GeometryError};
pub use store::GeometryStore;

pub const FLOATS_PER_POSITION: usize = 3;
pub const FLOATS_PER_COLOR: usize = 4;
pub const VERTICES_PER_TRIANGLE: usize = 3;
pub const POSITION_FLOATS_PER_TRIANGLE: usize = FLOATS_PER_POSITION * VERTICES_PER_TRIANGLE;
pub const COLOR_FLOATS_PER_TRIANGLE: usize = FLOATS_PER_COLOR * VERTICES_PER_TRIANGLE;
