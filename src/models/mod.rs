//! Core point types shared by the geometry modules.

pub mod point;

pub use point::{normalize_point, GeoPoint, ToPoint};
