//! Point-in-Polygon (PIP) containment testing.
//!
//! Boundary-inclusive even-odd test over a caller-supplied vertex list.
//! Vertices and the query point may be given in any [`ToPoint`] shape.
//!
//! [`ToPoint`]: crate::models::ToPoint

mod contains;
mod ring;

pub use contains::{contains_all, point_in_closed_polygon, point_in_polygon};
pub use ring::close_ring;
