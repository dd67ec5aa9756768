//! Curve sampler
//!
//! Turns the keyframe points of a host curve into the `(frame, value,
//! tangent)` samples stored by the interpolated formats, or selects the
//! per-frame values stored by the linear formats.

use brres_common::Keyframe;

use crate::curve::{Interpolation, KeyframeCurve, KeyframePoint};

/// Stand-in gradient for vertical handles, which the node formats cannot
/// represent. At or above 64 a track escalates to i6, at 128 to i12.
pub const VERTICAL_TANGENT_GRADIENT: f32 = 1000.0;

/// Left and right tangents further apart than this are stored as two samples
pub const DISTINCT_TANGENTS_THRESHOLD: f32 = 1e-5;

/// Slope between two points, or a signed vertical gradient when `x1 == x2`
pub fn get_tangent(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x2 - x1 == 0.0 {
        if y2 - y1 >= 0.0 {
            VERTICAL_TANGENT_GRADIENT
        } else {
            -VERTICAL_TANGENT_GRADIENT
        }
    } else {
        (y2 - y1) / (x2 - x1)
    }
}

/// Whether every keyframe point sits on a whole frame
pub fn all_frames_are_integers(points: &[KeyframePoint]) -> bool {
    points.iter().all(|p| p.frame().fract() == 0.0)
}

/// Whether keyframe frames strictly increase, as the span lookups require
pub fn frames_are_sorted(points: &[KeyframePoint]) -> bool {
    points.windows(2).all(|pair| pair[0].frame() < pair[1].frame())
}

/// Keyframe points selected for export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyframeSpan {
    /// Index of the first selected point
    pub first: usize,
    /// Index of the last selected point
    pub last: usize,
    /// Number of selected points; 1 means the channel is constant
    pub count: usize,
}

/// Select the keyframe points of `curve` that cover `start..=end`
///
/// Without sampling, selects the points inside the interval; `None` if
/// there are none.
///
/// With sampling, the curve is first extended so it reaches both ends of
/// the interval (a boundary keyframe holding the nearest endpoint value is
/// synthesized on each side it falls short of), then resampled at every
/// integer frame between the keyframes nearest each boundary from outside.
/// The returned span then covers exactly one point per frame of the
/// interval. A single-keyframe curve is returned as `(0, 0, 1)` without
/// touching it.
///
/// Sampling mutates `curve`; pass a snapshot to keep the source intact.
pub fn analyse_keyframe_list<C: KeyframeCurve + ?Sized>(
    curve: &mut C,
    start: i32,
    end: i32,
    to_be_sampled: bool,
) -> Option<KeyframeSpan> {
    let points = curve.keyframe_points();
    let (first_point, last_point) = (points.first()?, points.last()?);

    if !to_be_sampled {
        let first = points.partition_point(|p| p.frame() < start as f32);
        let last = points.partition_point(|p| p.frame() <= end as f32).checked_sub(1)?;
        if last < first {
            return None;
        }
        return Some(KeyframeSpan {
            first,
            last,
            count: last - first + 1,
        });
    }

    if points.len() == 1 {
        return Some(KeyframeSpan {
            first: 0,
            last: 0,
            count: 1,
        });
    }

    let (data_left, data_right) = (first_point.frame(), last_point.frame());
    let (left_value, right_value) = (first_point.value(), last_point.value());

    let index_start = if (start as f32) < data_left {
        curve.synthesize_boundary(start, left_value)
    } else if data_left < start as f32 {
        // Last keyframe at or before the boundary
        curve
            .keyframe_points()
            .partition_point(|p| p.frame() <= start as f32)
            - 1
    } else {
        0
    };

    let index_end = if data_right < end as f32 {
        curve.synthesize_boundary(end, right_value)
    } else if (end as f32) < data_right {
        // First keyframe at or after the boundary
        curve
            .keyframe_points()
            .partition_point(|p| p.frame() < end as f32)
    } else {
        curve.keyframe_points().len() - 1
    };

    let anchor = curve.keyframe_points()[index_start].frame() as i64;
    curve.sample_range(index_start, index_end);

    let first = index_start + usize::try_from(i64::from(start) - anchor).ok()?;
    let count = usize::try_from(i64::from(end) - i64::from(start) + 1).ok()?;
    Some(KeyframeSpan {
        first,
        last: first + count - 1,
        count,
    })
}

/// Build the interpolated samples for the points in `span`
///
/// Frames are made relative to `start`. Constant and linear segments are
/// expanded into sample pairs that reproduce their shape; a sample shared by
/// two segments is never emitted more than twice. `span` must come from
/// [`analyse_keyframe_list`] without sampling.
pub fn extract_keyframes(
    points: &[KeyframePoint],
    span: KeyframeSpan,
    start: i32,
    end: i32,
) -> Vec<Keyframe> {
    let relative = |frame: f32| (frame as i32).saturating_sub(start);
    let end_frame = end.saturating_sub(start);
    let mut keyframes = Vec::with_capacity(span.count * 2);

    // Set when the previous segment already emitted the current point
    let mut keyframe_at_next = false;

    let first = &points[span.first];
    if first.frame() != start as f32 && span.first > 0 {
        let previous = &points[span.first - 1];
        let [x1, y1] = previous.co;
        let [x2, y2] = first.co;
        match previous.interpolation {
            Interpolation::Bezier => {}
            Interpolation::Linear => {
                let tangent = get_tangent(x1, y1, x2, y2);
                let value = y1 + tangent * (start as f32 - x1);
                keyframes.push(Keyframe::new(0, value, tangent));
                keyframes.push(Keyframe::new(relative(x2), y2, tangent));
                keyframe_at_next = true;
            }
            Interpolation::Constant => {
                keyframes.push(Keyframe::new(0, y1, 0.0));
                keyframes.push(Keyframe::new(relative(x2), y1, 0.0));
                keyframe_at_next = true;
            }
        }
    }

    for i in span.first..=span.last {
        let point = &points[i];
        let frame = relative(point.frame());
        let value = point.value();
        let at_end = point.frame() == end as f32;

        match point.interpolation {
            Interpolation::Linear if !at_end => {
                if i == span.last {
                    if i == points.len() - 1 {
                        // Curve ends here and holds its value
                        keyframes.push(Keyframe::new(frame, value, 0.0));
                        keyframes.push(Keyframe::new(end_frame, value, 0.0));
                    } else {
                        let [x1, y1] = point.co;
                        let [x2, y2] = points[i + 1].co;
                        let tangent = get_tangent(x1, y1, x2, y2);
                        keyframes.push(Keyframe::new(frame, value, tangent));
                        let extrapolated = value + tangent * (end as f32 - x1);
                        keyframes.push(Keyframe::new(end_frame, extrapolated, tangent));
                    }
                } else {
                    let [x1, y1] = point.co;
                    let [x2, y2] = points[i + 1].co;
                    let tangent = get_tangent(x1, y1, x2, y2);
                    keyframes.push(Keyframe::new(frame, value, tangent));
                    keyframes.push(Keyframe::new(relative(x2), y2, tangent));
                    keyframe_at_next = true;
                }
            }

            Interpolation::Constant if !at_end => {
                keyframes.push(Keyframe::new(frame, value, 0.0));
                let hold_until = if i == span.last {
                    end_frame
                } else {
                    keyframe_at_next = true;
                    relative(points[i + 1].frame())
                };
                keyframes.push(Keyframe::new(hold_until, value, 0.0));
            }

            Interpolation::Bezier => {
                let [hx, hy] = point.handle_left();
                let [x, y] = point.co;
                let left_tangent = get_tangent(hx, hy, x, y);

                if at_end {
                    if !keyframe_at_next {
                        keyframes.push(Keyframe::new(frame, value, left_tangent));
                    }
                    continue;
                }

                let [hx, hy] = point.handle_right();
                let right_tangent = get_tangent(x, y, hx, hy);

                if !keyframe_at_next
                    && frame != 0
                    && (right_tangent - left_tangent).abs() > DISTINCT_TANGENTS_THRESHOLD
                {
                    keyframes.push(Keyframe::new(frame, value, left_tangent));
                }
                keyframes.push(Keyframe::new(frame, value, right_tangent));

                match points.get(i + 1) {
                    Some(next) if i < span.last && next.interpolation != Interpolation::Bezier => {
                        let [hx, hy] = next.handle_left();
                        let [nx, ny] = next.co;
                        let next_left_tangent = get_tangent(hx, hy, nx, ny);
                        keyframes.push(Keyframe::new(relative(nx), ny, next_left_tangent));
                        keyframe_at_next = true;
                    }
                    _ => keyframe_at_next = false,
                }
            }

            // Constant or linear point on the last frame: already emitted by
            // the segment before it
            _ => {}
        }
    }

    tracing::debug!(
        "Extracted {} samples from keyframes {}..={}",
        keyframes.len(),
        span.first,
        span.last
    );
    keyframes
}
