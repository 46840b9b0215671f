// Core math and geometry shared by the engine

pub mod geometry;
pub mod math;

pub use geometry::{line_intersection, Segment};
pub use math::Vector2;
