//! Host curve model
//!
//! A curve is what a curve editor hands to the exporter for one channel: an
//! ordered list of keyframe points, each carrying its Bezier handles and the
//! interpolation of the segment that starts at it.

use serde::{Deserialize, Serialize};

/// Bisection steps used to invert the x component of a Bezier segment
const BEZIER_SOLVE_ITERATIONS: usize = 24;
const BEZIER_SOLVE_TOLERANCE: f64 = 1e-6;

/// Interpolation of the segment starting at a keyframe point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interpolation {
    Constant,
    Linear,
    #[default]
    Bezier,
}

/// One keyframe point of a host curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframePoint {
    /// (frame, value)
    pub co: [f32; 2],
    /// Defaults to a flat handle one frame to the left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_left: Option<[f32; 2]>,
    /// Defaults to a flat handle one frame to the right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_right: Option<[f32; 2]>,
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl KeyframePoint {
    /// Point with flat handles
    pub fn new(frame: f32, value: f32, interpolation: Interpolation) -> Self {
        Self {
            co: [frame, value],
            handle_left: None,
            handle_right: None,
            interpolation,
        }
    }

    pub fn with_handles(mut self, left: [f32; 2], right: [f32; 2]) -> Self {
        self.handle_left = Some(left);
        self.handle_right = Some(right);
        self
    }

    #[inline]
    pub fn frame(&self) -> f32 {
        self.co[0]
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.co[1]
    }

    pub fn handle_left(&self) -> [f32; 2] {
        self.handle_left
            .unwrap_or([self.frame() - 1.0, self.value()])
    }

    pub fn handle_right(&self) -> [f32; 2] {
        self.handle_right
            .unwrap_or([self.frame() + 1.0, self.value()])
    }
}

/// Operations the sampler needs from a host curve
///
/// `synthesize_boundary` and `sample_range` mutate the curve they are called
/// on. Callers that must leave the source curve untouched run them on a
/// clone.
pub trait KeyframeCurve {
    /// Keyframe points in frame order
    fn keyframe_points(&self) -> &[KeyframePoint];

    /// Insert a keyframe at `frame` holding `value`, keeping frame order.
    /// An existing keyframe at that frame is overwritten. A keyframe added
    /// past the end holds flat from the previous one. Returns its index.
    fn synthesize_boundary(&mut self, frame: i32, value: f32) -> usize;

    /// Replace keyframes `first..=last` with one keyframe per integer frame
    /// between them, valued from the curve as it was before the call
    fn sample_range(&mut self, first: usize, last: usize);
}

/// A keyframed scalar curve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FCurve {
    /// Channel label used in log output
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keyframe_points: Vec<KeyframePoint>,
}

impl FCurve {
    pub fn new(name: impl Into<String>, keyframe_points: Vec<KeyframePoint>) -> Self {
        Self {
            name: name.into(),
            keyframe_points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyframe_points.is_empty()
    }

    /// Value of the curve at `frame`
    ///
    /// Outside the keyed range the nearest endpoint value is held. An empty
    /// curve evaluates to 0.
    pub fn evaluate(&self, frame: f32) -> f32 {
        let points = &self.keyframe_points;
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return 0.0;
        };
        if frame <= first.frame() {
            return first.value();
        }
        if frame >= last.frame() {
            return last.value();
        }

        // Segment i spans points[i]..points[i + 1]
        let i = points.partition_point(|p| p.frame() <= frame) - 1;
        let (a, b) = (&points[i], &points[i + 1]);

        match a.interpolation {
            Interpolation::Constant => a.value(),
            Interpolation::Linear => {
                let t = (frame - a.frame()) / (b.frame() - a.frame());
                a.value() + (b.value() - a.value()) * t
            }
            Interpolation::Bezier => {
                let p1 = a.handle_right();
                let p2 = b.handle_left();
                let x = [a.frame() as f64, p1[0] as f64, p2[0] as f64, b.frame() as f64];
                let y = [a.value() as f64, p1[1] as f64, p2[1] as f64, b.value() as f64];
                let t = solve_bezier_t(&x, frame as f64);
                cubic_bezier(&y, t) as f32
            }
        }
    }
}

impl KeyframeCurve for FCurve {
    fn keyframe_points(&self) -> &[KeyframePoint] {
        &self.keyframe_points
    }

    fn synthesize_boundary(&mut self, frame: i32, value: f32) -> usize {
        let frame = frame as f32;
        let index = self.keyframe_points.partition_point(|p| p.frame() < frame);

        match self.keyframe_points.get_mut(index) {
            Some(existing) if existing.frame() == frame => {
                existing.co[1] = value;
                existing.handle_left = None;
                existing.handle_right = None;
            }
            _ => {
                // Linear with an equal neighbour value keeps the hold flat
                let point = KeyframePoint::new(frame, value, Interpolation::Linear);
                if index == self.keyframe_points.len() {
                    if let Some(previous) = self.keyframe_points.last_mut() {
                        previous.handle_right = None;
                    }
                }
                self.keyframe_points.insert(index, point);
            }
        }
        index
    }

    fn sample_range(&mut self, first: usize, last: usize) {
        if first >= last || last >= self.keyframe_points.len() {
            return;
        }

        let from = self.keyframe_points[first].frame() as i32;
        let to = self.keyframe_points[last].frame() as i32;
        let tail = self.keyframe_points[last].clone();

        let mut sampled: Vec<KeyframePoint> = (from..=to)
            .map(|frame| {
                let frame = frame as f32;
                KeyframePoint::new(frame, self.evaluate(frame), Interpolation::Linear)
            })
            .collect();

        // The segment after the range keeps its shape
        if let Some(end) = sampled.last_mut() {
            end.interpolation = tail.interpolation;
            end.handle_right = tail.handle_right;
        }

        self.keyframe_points.splice(first..=last, sampled);
    }
}

#[inline]
fn cubic_bezier(p: &[f64; 4], t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p[0] + 3.0 * u * u * t * p[1] + 3.0 * u * t * t * p[2] + t * t * t * p[3]
}

/// Find t in [0, 1] where the x component of the segment reaches `x`
fn solve_bezier_t(p: &[f64; 4], x: f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut mid = 0.5;
    for _ in 0..BEZIER_SOLVE_ITERATIONS {
        let at = cubic_bezier(p, mid);
        if (at - x).abs() < BEZIER_SOLVE_TOLERANCE {
            break;
        }
        if at < x {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    mid
}
