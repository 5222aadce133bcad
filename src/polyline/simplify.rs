//! Douglas-Peucker simplification with an explicit work stack.

use geo::Coord;
use hashbrown::HashMap;
use tracing::{debug, trace};

/// Path index -> deviation that caused the point to be kept
pub type DeviationMap = HashMap<usize, f64>;

/// Result of simplifying a path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simplification {
    /// Interior points that survived, with their deviation from the chord
    pub deviations: DeviationMap,
    /// Largest deviation seen in any frame, kept or not. Zero for paths of
    /// two or fewer points.
    pub max_deviation: f64,
}

impl Simplification {
    /// Whether the point at `index` of a path of `len` points is kept.
    /// Endpoints always are.
    pub fn is_retained(&self, index: usize, len: usize) -> bool {
        index == 0 || index + 1 == len || self.deviations.contains_key(&index)
    }

    /// Indices of the kept points in path order
    pub fn retained_indices(&self, len: usize) -> Vec<usize> {
        (0..len).filter(|&i| self.is_retained(i, len)).collect()
    }
}

/// Simplify `points`, keeping any point whose deviation from its enclosing
/// chord exceeds `epsilon`.
pub fn simplify(points: &[Coord<f64>], epsilon: f64) -> Simplification {
    let mut result = Simplification::default();

    if points.len() <= 2 {
        return result;
    }

    let mut stack = vec![(0usize, points.len() - 1)];

    while let Some((lo, hi)) = stack.pop() {
        let mut max_dist = 0.0;
        let mut max_idx = lo;

        for i in (lo + 1)..hi {
            let dist = segment_distance(points[i], points[lo], points[hi]);
            if dist > max_dist {
                max_dist = dist;
                max_idx = i;
            }
        }

        if max_dist > result.max_deviation {
            result.max_deviation = max_dist;
        }

        trace!(lo, hi, max_idx, max_dist, "simplify frame");

        // max_idx == lo means no interior point lies off the chord
        if max_idx > lo && max_dist > epsilon {
            result.deviations.insert(max_idx, max_dist);
            stack.push((lo, max_idx));
            stack.push((max_idx, hi));
        }
    }

    debug!(
        "Simplified {} points to {} (max deviation {})",
        points.len(),
        result.deviations.len() + 2,
        result.max_deviation
    );

    result
}

/// Distance from `p` to the segment `start..end`.
///
/// A degenerate segment degrades to the distance to its single point.
pub fn segment_distance(p: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    if start == end {
        return distance(p, end);
    }

    let d = end - start;
    let u = ((p.x - start.x) * d.x + (p.y - start.y) * d.y) / (d.x * d.x + d.y * d.y);

    if u <= 0.0 {
        distance(p, start)
    } else if u >= 1.0 {
        distance(p, end)
    } else {
        (p.x - start.x - u * d.x).hypot(p.y - start.y - u * d.y)
    }
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
