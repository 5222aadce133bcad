//! Simplify-then-encode pipeline producing points and levels strings.

use geo::Coord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::{encode_signed, encode_unsigned, COORD_FACTOR};
use super::config::EncoderOptions;
use super::simplify::{simplify, Simplification};

/// Output of [`PolylineEncoder::encode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedPolyline {
    /// Encoded coordinate deltas of the retained points
    pub points: String,
    /// One encoded zoom level per retained point
    pub levels: String,
    /// `points` with backslashes doubled, for pasting into a string literal
    pub points_literal: String,
    pub zoom_factor: u32,
    pub num_levels: u32,
}

/// Zoom thresholds for one set of options.
///
/// `breaks[lev] = epsilon * zoom_factor^(num_levels - 1 - lev)`, largest
/// first. Built per encode call.
#[derive(Debug, Clone)]
pub struct ZoomLevels {
    breaks: Vec<f64>,
    epsilon: f64,
}

impl ZoomLevels {
    pub fn new(options: &EncoderOptions) -> Self {
        let n = options.num_levels;
        let breaks = (0..n)
            .map(|lev| {
                options.epsilon * f64::from(options.zoom_factor).powi((n - lev - 1) as i32)
            })
            .collect();
        Self {
            breaks,
            epsilon: options.epsilon,
        }
    }

    /// Level at which a feature of size `deviation` becomes visible; higher
    /// means visible from further out.
    ///
    /// Anything at or below epsilon is never simplified away and gets the
    /// top level.
    pub fn level_of(&self, deviation: f64) -> u32 {
        let top = self.breaks.len().saturating_sub(1);
        if deviation <= self.epsilon {
            return top as u32;
        }
        let lev = self
            .breaks
            .iter()
            .position(|&threshold| deviation >= threshold)
            .unwrap_or(top);
        (top - lev) as u32
    }

    fn top(&self) -> u32 {
        self.breaks.len().saturating_sub(1) as u32
    }
}

/// Encodes paths for multi-zoom rendering.
///
/// Holds only immutable options; every call works on its own locals, so a
/// single encoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PolylineEncoder {
    options: EncoderOptions,
}

impl PolylineEncoder {
    /// Options are used as given. A non-positive epsilon keeps every point
    /// that is off its chord; use [`PolylineEncoder::try_new`] to reject it.
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Like [`PolylineEncoder::new`], but validates the options first.
    pub fn try_new(options: EncoderOptions) -> anyhow::Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn encode(&self, points: &[Coord<f64>]) -> EncodedPolyline {
        let zoom = ZoomLevels::new(&self.options);
        let simplified = simplify(points, self.options.epsilon);

        let encoded_points = encode_points(points, &simplified);
        let levels = self.encode_levels(points, &simplified, &zoom);
        let points_literal = encoded_points.replace('\\', "\\\\");

        debug!(
            "Encoded {} points: {} retained, {} bytes",
            points.len(),
            simplified.deviations.len() + points.len().min(2),
            encoded_points.len()
        );

        EncodedPolyline {
            points: encoded_points,
            levels,
            points_literal,
            zoom_factor: self.options.zoom_factor,
            num_levels: self.options.num_levels,
        }
    }

    /// One level per retained point. Endpoints get the top level when
    /// `force_endpoints` is set, otherwise the level of the largest deviation.
    pub fn encode_levels(
        &self,
        points: &[Coord<f64>],
        simplified: &Simplification,
        zoom: &ZoomLevels,
    ) -> String {
        let mut out = String::new();
        let Some(last) = points.len().checked_sub(1) else {
            return out;
        };

        let endpoint_level = if self.options.force_endpoints {
            zoom.top()
        } else {
            zoom.level_of(simplified.max_deviation)
        };

        encode_unsigned(u64::from(endpoint_level), &mut out);
        for i in 1..last {
            if let Some(&deviation) = simplified.deviations.get(&i) {
                encode_unsigned(u64::from(zoom.level_of(deviation)), &mut out);
            }
        }
        if last > 0 {
            encode_unsigned(u64::from(endpoint_level), &mut out);
        }

        out
    }
}

/// Encode the retained points as floored 1e-5 deltas, first one relative to
/// the origin.
pub fn encode_points(points: &[Coord<f64>], simplified: &Simplification) -> String {
    let mut out = String::new();
    let (mut prev_x, mut prev_y) = (0i64, 0i64);

    for (i, point) in points.iter().enumerate() {
        if !simplified.is_retained(i, points.len()) {
            continue;
        }
        let x = (point.x * COORD_FACTOR).floor() as i64;
        let y = (point.y * COORD_FACTOR).floor() as i64;
        encode_signed(x - prev_x, &mut out);
        encode_signed(y - prev_y, &mut out);
        prev_x = x;
        prev_y = y;
    }

    out
}

/// Encode with the default options (18 levels, factor 2, epsilon 1e-5,
/// endpoints forced).
pub fn encode_polyline(points: &[Coord<f64>]) -> EncodedPolyline {
    PolylineEncoder::default().encode(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn reference_path() -> Vec<Coord<f64>> {
        coords(&[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)])
    }

    #[test]
    fn test_reference_path() {
        let encoded = encode_polyline(&reference_path());
        assert_eq!(encoded.points, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(encoded.levels, "POP");
        assert_eq!(encoded.zoom_factor, 2);
        assert_eq!(encoded.num_levels, 18);
    }

    #[test]
    fn test_unforced_endpoints_use_max_deviation() {
        let encoder = PolylineEncoder::new(EncoderOptions {
            force_endpoints: false,
            ..Default::default()
        });
        let encoded = encoder.encode(&reference_path());
        assert_eq!(encoded.points, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(encoded.levels, "OOO");
    }

    #[test]
    fn test_nested_levels() {
        let path = coords(&[(52.0, 5.0), (52.001, 5.002), (52.0, 5.004), (52.003, 5.006)]);
        let encoded = encode_polyline(&path);
        assert_eq!(encoded.points, "_gk|H_qo]gEoKfEmKwQqK");
        assert_eq!(encoded.levels, "PEFP");
    }

    #[test]
    fn test_collinear_path() {
        let path = coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let encoded = encode_polyline(&path);
        assert_eq!(encoded.points, "??_}hQ_}hQ");
        assert_eq!(encoded.levels, "PP");
    }

    #[test]
    fn test_trivial_paths() {
        let empty = encode_polyline(&[]);
        assert_eq!(empty.points, "");
        assert_eq!(empty.levels, "");

        let single = encode_polyline(&coords(&[(0.00036, 0.0)]));
        assert_eq!(single.points, "gA?");
        assert_eq!(single.levels, "P");

        let pair = encode_polyline(&coords(&[(0.0, 0.0), (0.00036, 0.0)]));
        assert_eq!(pair.points, "??gA?");
        assert_eq!(pair.levels, "PP");
    }

    #[test]
    fn test_unforced_endpoints_without_deviation_stay_visible() {
        let encoder = PolylineEncoder::new(EncoderOptions {
            force_endpoints: false,
            ..Default::default()
        });
        let trivial = encoder.encode(&coords(&[(0.0, 0.0), (1.0, 0.0)]));
        assert_eq!(trivial.levels, "PP");

        let collinear = encoder.encode(&coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(collinear.levels, "PP");
    }

    #[test]
    fn test_negative_epsilon_terminates() {
        let encoder = PolylineEncoder::new(EncoderOptions {
            epsilon: -1.0,
            ..Default::default()
        });
        let encoded = encoder.encode(&coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(encoded.points, "??_seK_seK");
        assert_eq!(encoded.levels, "PP");
    }

    #[test]
    fn test_try_new_validates_options() {
        assert!(PolylineEncoder::try_new(EncoderOptions::default()).is_ok());
        assert!(PolylineEncoder::try_new(EncoderOptions {
            epsilon: -1.0,
            ..Default::default()
        })
        .is_err());
        assert!(PolylineEncoder::try_new(EncoderOptions {
            num_levels: 0,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_floor_not_round() {
        // -0.000001 * 1e5 floors to -1, rounding would give 0
        let encoded = encode_polyline(&coords(&[(-0.000001, 1.234567)]));
        let mut expected = String::new();
        encode_signed(-1, &mut expected);
        encode_signed(123456, &mut expected);
        assert_eq!(encoded.points, expected);
    }

    #[test]
    fn test_points_literal_escapes_backslash() {
        // -15 folds to 29, which is emitted as a backslash
        let mut s = String::new();
        encode_signed(-15, &mut s);
        assert_eq!(s, "\\");

        let encoded = encode_polyline(&coords(&[(-0.00015, -0.00015)]));
        assert_eq!(encoded.points, "\\\\");
        assert_eq!(encoded.points_literal, "\\\\\\\\");
    }

    #[test]
    fn test_level_of_boundaries() {
        let zoom = ZoomLevels::new(&EncoderOptions::default());
        // at or below epsilon: never dropped, visible at every zoom
        assert_eq!(zoom.level_of(0.0), 17);
        assert_eq!(zoom.level_of(1e-5), 17);
        assert_eq!(zoom.level_of(1.5e-5), 0);
        assert_eq!(zoom.level_of(2e-5), 1);
        assert_eq!(zoom.level_of(1e-5 * 2f64.powi(17)), 17);
        assert_eq!(zoom.level_of(1e6), 17);
    }

    #[test]
    fn test_level_of_is_monotonic() {
        let zoom = ZoomLevels::new(&EncoderOptions::default());
        let mut prev = 0;
        for k in 0..200 {
            let level = zoom.level_of(1.01e-5 * 1.15f64.powi(k));
            assert!(level >= prev);
            assert!(level <= 17);
            prev = level;
        }
    }

    #[test]
    fn test_encoded_polyline_serializes() {
        let encoded = encode_polyline(&reference_path());
        let json = serde_json::to_value(&encoded).unwrap();
        assert_eq!(json["points"], "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(json["levels"], "POP");
        assert_eq!(json["num_levels"], 18);
        assert_eq!(json["zoom_factor"], 2);
    }

    #[test]
    fn test_encoder_shared_across_threads() {
        let encoder = PolylineEncoder::default();
        let path = reference_path();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| encoder.encode(&path))).collect();
            for h in handles {
                assert_eq!(h.join().unwrap().levels, "POP");
            }
        });
    }
}
