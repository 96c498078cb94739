//! Pure domain types with minimal dependencies
//!
//! Types here carry no rendering or capture dependencies so that every
//! other module can build on them.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
