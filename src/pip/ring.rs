//! Ring helpers for callers that want an implicitly closed boundary.

use geo::Coord;

/// Close the ring if needed by repeating the first vertex at the end.
pub fn close_ring(ring: &mut Vec<Coord<f64>>) {
    if let Some(first) = ring.first().copied() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
}
