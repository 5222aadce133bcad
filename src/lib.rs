//! Cartokit - geometry helpers for map clients
//!
//! Point-in-polygon testing, encoded polylines with zoom levels, and RD to
//! WGS84 datum conversion. Everything is a pure function of its inputs.

pub mod datum;
pub mod error;
pub mod models;
pub mod pip;
pub mod polyline;

pub use datum::rd_to_wgs84;
pub use error::GeoError;
pub use models::{normalize_point, GeoPoint, ToPoint};
pub use pip::point_in_polygon;
pub use polyline::{encode_polyline, EncodedPolyline, EncoderOptions, PolylineEncoder};
