//! Point normalization.
//!
//! Callers hand us points in a handful of shapes (text such as `"52.1,5.3"`,
//! slices, tuples, `geo` coordinates). Everything is funnelled through
//! [`ToPoint`] into a `Coord<f64>` before any geometry runs.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};

/// Geographic point (lat/lon) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(p: GeoPoint) -> Self {
        (p.lat, p.lon)
    }
}

/// Anything that can be normalized into a two-component point
pub trait ToPoint {
    fn to_point(&self) -> Result<Coord<f64>>;
}

/// Normalize a point-like value into a `Coord<f64>`.
pub fn normalize_point<P: ToPoint + ?Sized>(input: &P) -> Result<Coord<f64>> {
    input.to_point()
}

fn invalid(input: impl Into<String>) -> GeoError {
    GeoError::InvalidPointFormat {
        input: input.into(),
    }
}

fn finite_pair(x: f64, y: f64, describe: impl FnOnce() -> String) -> Result<Coord<f64>> {
    if x.is_finite() && y.is_finite() {
        Ok(Coord { x, y })
    } else {
        Err(invalid(describe()))
    }
}

fn from_slice(values: &[f64]) -> Result<Coord<f64>> {
    match values {
        [x, y] => finite_pair(*x, *y, || format!("{:?}", values)),
        _ => Err(invalid(format!("{:?}", values))),
    }
}

impl ToPoint for str {
    fn to_point(&self) -> Result<Coord<f64>> {
        // Space wins over comma when both are present
        let separator = if self.contains(' ') {
            ' '
        } else if self.contains(',') {
            ','
        } else {
            return Err(invalid(self));
        };

        let parts: Vec<&str> = self.split(separator).collect();
        let [x, y] = parts.as_slice() else {
            return Err(invalid(self));
        };

        let x: f64 = x.parse().map_err(|_| invalid(self))?;
        let y: f64 = y.parse().map_err(|_| invalid(self))?;
        finite_pair(x, y, || self.to_string())
    }
}

impl ToPoint for String {
    fn to_point(&self) -> Result<Coord<f64>> {
        self.as_str().to_point()
    }
}

impl ToPoint for &str {
    fn to_point(&self) -> Result<Coord<f64>> {
        (**self).to_point()
    }
}

impl ToPoint for [f64] {
    fn to_point(&self) -> Result<Coord<f64>> {
        from_slice(self)
    }
}

impl ToPoint for Vec<f64> {
    fn to_point(&self) -> Result<Coord<f64>> {
        from_slice(self)
    }
}

impl ToPoint for [f64; 2] {
    fn to_point(&self) -> Result<Coord<f64>> {
        from_slice(self)
    }
}

impl ToPoint for (f64, f64) {
    fn to_point(&self) -> Result<Coord<f64>> {
        finite_pair(self.0, self.1, || format!("{:?}", self))
    }
}

impl ToPoint for Coord<f64> {
    fn to_point(&self) -> Result<Coord<f64>> {
        finite_pair(self.x, self.y, || format!("{:?}", self))
    }
}

impl ToPoint for geo::Point<f64> {
    fn to_point(&self) -> Result<Coord<f64>> {
        self.0.to_point()
    }
}
