//! Points and axis-aligned boxes in image space.
//!
//! Both types are plain `Copy` values, every operation returns a new value.

pub mod bbox;
pub mod point;

pub use bbox::BoundingBox;
pub use point::Point;
