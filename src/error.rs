//! Error type shared by the geometry modules.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Input could not be turned into a two-component point
    #[error(
        "input needs to be a string of two doubles separated by either a space or comma, \
         or a collection of exactly two doubles; got {input:?}"
    )]
    InvalidPointFormat { input: String },

    /// Encoded polyline text is malformed at the given byte offset
    #[error("invalid polyline encoding at byte {position}")]
    InvalidEncoding { position: usize },
}

pub type Result<T> = std::result::Result<T, GeoError>;
