//! Even-odd ray casting over an explicit vertex list.

use geo::Coord;
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::models::ToPoint;

use super::ring::close_ring;

/// Test whether `point` lies inside `polygon`, boundary included.
///
/// Only edges between consecutive stored vertices are tested. The ring is not
/// closed for you: repeat the first vertex at the end, or use
/// [`point_in_closed_polygon`].
pub fn point_in_polygon<P, V>(point: &P, polygon: &[V]) -> Result<bool>
where
    P: ToPoint + ?Sized,
    V: ToPoint,
{
    let point = point.to_point()?;
    let vertices = normalize_vertices(polygon)?;
    let inside = contains(point, &vertices);
    debug!(
        "PIP at ({}, {}) against {} vertices: {}",
        point.x,
        point.y,
        vertices.len(),
        inside
    );
    Ok(inside)
}

/// Like [`point_in_polygon`], but closes an open ring before testing.
pub fn point_in_closed_polygon<P, V>(point: &P, polygon: &[V]) -> Result<bool>
where
    P: ToPoint + ?Sized,
    V: ToPoint,
{
    let point = point.to_point()?;
    let mut vertices = normalize_vertices(polygon)?;
    close_ring(&mut vertices);
    let inside = contains(point, &vertices);
    debug!(
        "PIP at ({}, {}) against closed {}-vertex ring: {}",
        point.x,
        point.y,
        vertices.len(),
        inside
    );
    Ok(inside)
}

/// Test many points against one polygon. The polygon is normalized once and
/// the points are checked in parallel; results keep the input order.
pub fn contains_all<P, V>(points: &[P], polygon: &[V]) -> Result<Vec<bool>>
where
    P: ToPoint + Sync,
    V: ToPoint,
{
    let vertices = normalize_vertices(polygon)?;
    let results: Result<Vec<bool>> = points
        .par_iter()
        .map(|p| p.to_point().map(|p| contains(p, &vertices)))
        .collect();

    if let Ok(hits) = &results {
        debug!(
            "Batch containment: {}/{} points inside {}-vertex polygon",
            hits.iter().filter(|h| **h).count(),
            hits.len(),
            vertices.len()
        );
    }
    results
}

fn normalize_vertices<V: ToPoint>(polygon: &[V]) -> Result<Vec<Coord<f64>>> {
    polygon.iter().map(|v| v.to_point()).collect()
}

/// Core predicate over already-normalized vertices.
pub(crate) fn contains(point: Coord<f64>, vertices: &[Coord<f64>]) -> bool {
    if vertices.iter().any(|v| *v == point) {
        return true;
    }

    let mut intersections = 0usize;

    for edge in vertices.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        let horizontal = a.y == b.y;

        // On a horizontal boundary segment
        if horizontal && a.y == point.y && point.x > min_x && point.x < max_x {
            return true;
        }

        if point.y > min_y && point.y <= max_y && point.x <= max_x && !horizontal {
            let xint = (point.y - a.y) * (b.x - a.x) / (b.y - a.y) + a.x;

            // On any other boundary segment
            if xint == point.x {
                return true;
            }

            if a.x == b.x || point.x <= xint {
                intersections += 1;
            }
        }
    }

    intersections % 2 == 1
}
