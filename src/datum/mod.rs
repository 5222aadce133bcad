//! Datum conversion between the Dutch RD grid and WGS84.

pub mod rd;

pub use rd::{rd_to_wgs84, rd_to_wgs84_batch, sum_over, Term, LAT_TERMS, LON_TERMS};
