//! Rijksdriehoek (Dutch national grid) to WGS84.
//!
//! Approximates the transformation with two polynomial series in the grid
//! offset from Amersfoort. The series yield corrections in arcseconds that
//! are added to the base point's latitude and longitude.

use rayon::prelude::*;
use tracing::debug;

use crate::models::GeoPoint;

/// Base point Amersfoort, grid coordinates in metres
pub const X0: f64 = 155000.00;
pub const Y0: f64 = 463000.00;
/// Base point Amersfoort, WGS84 degrees
pub const LAT0: f64 = 52.15517440;
pub const LON0: f64 = 5.38720621;

/// Grid offsets are expressed in units of 100 km
const GRID_SCALE: f64 = 100000.0;
const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// One `coefficient * dX^p * dY^q` term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub p: i32,
    pub q: i32,
    pub coefficient: f64,
}

const fn term(p: i32, q: i32, coefficient: f64) -> Term {
    Term { p, q, coefficient }
}

/// Latitude correction series
pub const LAT_TERMS: &[Term] = &[
    term(0, 1, 3235.65389),
    term(0, 2, -0.24750),
    term(0, 3, -0.06550),
    term(1, 0, -0.00738),
    term(1, 1, -0.00012),
    term(2, 0, -32.58297),
    term(2, 1, -0.84978),
    term(2, 2, -0.01709),
    term(2, 3, -0.00039),
    term(4, 0, 0.00530),
    term(4, 1, 0.00033),
];

/// Longitude correction series
pub const LON_TERMS: &[Term] = &[
    term(0, 1, 0.01199),
    term(0, 2, 0.00022),
    term(1, 0, 5260.52916),
    term(1, 1, 105.94684),
    term(1, 2, 2.45656),
    term(1, 3, 0.05594),
    term(1, 4, 0.00128),
    term(2, 0, -0.00022),
    term(3, 0, -0.81885),
    term(3, 1, -0.05607),
    term(3, 2, -0.00256),
    term(5, 0, 0.00026),
];

/// Evaluate `sum(coefficient * dx^p * dy^q)` over `terms`.
pub fn sum_over(terms: &[Term], dx: f64, dy: f64) -> f64 {
    terms
        .iter()
        .map(|t| t.coefficient * dx.powi(t.p) * dy.powi(t.q))
        .sum()
}

/// Convert RD grid coordinates (metres) to WGS84 latitude/longitude.
pub fn rd_to_wgs84(x: f64, y: f64) -> GeoPoint {
    let dx = (x - X0) / GRID_SCALE;
    let dy = (y - Y0) / GRID_SCALE;

    GeoPoint {
        lat: LAT0 + sum_over(LAT_TERMS, dx, dy) / ARCSEC_PER_DEGREE,
        lon: LON0 + sum_over(LON_TERMS, dx, dy) / ARCSEC_PER_DEGREE,
    }
}

/// Convert many grid coordinates in parallel, preserving order.
pub fn rd_to_wgs84_batch(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
    debug!("Converting {} RD coordinates", coords.len());
    coords.par_iter().map(|&(x, y)| rd_to_wgs84(x, y)).collect()
}
