//! Encoded polylines with per-point zoom levels.
//!
//! A path is thinned with Douglas-Peucker, then the retained points are
//! written as floored 1e-5 coordinate deltas and each retained point gets the
//! coarsest zoom level at which it must still be drawn. Both outputs are
//! compact printable-ASCII strings understood by standard polyline decoders.

pub mod codec;
mod config;
mod encoder;
mod simplify;

pub use codec::{decode_levels, decode_points};
pub use config::EncoderOptions;
pub use encoder::{encode_points, encode_polyline, EncodedPolyline, PolylineEncoder, ZoomLevels};
pub use simplify::{segment_distance, simplify, DeviationMap, Simplification};
