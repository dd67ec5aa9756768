//! Animation data types shared by the track builders and node writers

use super::CurveFormat;

/// Sample size in bytes for each interpolated format
pub const I4_SAMPLE_SIZE: usize = 4;
pub const I6_SAMPLE_SIZE: usize = 6;
pub const I12_SAMPLE_SIZE: usize = 12;
/// Linear formats store one f32 per frame
pub const LINEAR_SAMPLE_SIZE: usize = 4;

/// One extracted curve sample: frame index relative to the export start,
/// value, and the slope of the curve at that frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: i32,
    pub value: f32,
    pub tangent: f32,
}

impl Keyframe {
    pub const fn new(frame: i32, value: f32, tangent: f32) -> Self {
        Self {
            frame,
            value,
            tangent,
        }
    }
}

/// Raw per-axis data handed to a track builder, before constant collapse
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AxisSamples {
    /// Axis not exported
    #[default]
    Empty,
    /// Axis given as a single value (one keyframe on the interval)
    Constant(f32),
    /// Tangent-aware samples for the interpolated formats
    Keyframes(Vec<Keyframe>),
    /// One value per frame for the linear formats
    Values(Vec<f32>),
}

impl AxisSamples {
    pub fn is_empty(&self) -> bool {
        match self {
            AxisSamples::Empty => true,
            AxisSamples::Constant(_) => false,
            AxisSamples::Keyframes(k) => k.is_empty(),
            AxisSamples::Values(v) => v.is_empty(),
        }
    }
}

/// Finalized data for one axis
#[derive(Debug, Clone, PartialEq)]
pub enum AxisTrack {
    /// Constant value, stored inline in the node's slot
    Fixed(f32),
    Keyframes(Vec<Keyframe>),
    Values(Vec<f32>),
}

impl AxisTrack {
    /// Collapse samples to a constant when they carry no variation
    ///
    /// Empty samples become `identity`; a single element, or a sequence whose
    /// values are all equal, becomes that value. Only the `value` of each
    /// keyframe is compared.
    pub fn collapse(samples: AxisSamples, identity: f32) -> Self {
        match samples {
            AxisSamples::Empty => AxisTrack::Fixed(identity),
            AxisSamples::Constant(v) => AxisTrack::Fixed(v),
            AxisSamples::Keyframes(keys) => match keys.first() {
                None => AxisTrack::Fixed(identity),
                Some(first) if keys.iter().all(|k| k.value == first.value) => {
                    AxisTrack::Fixed(first.value)
                }
                Some(_) => AxisTrack::Keyframes(keys),
            },
            AxisSamples::Values(values) => match values.first() {
                None => AxisTrack::Fixed(identity),
                Some(&first) if values.iter().all(|&v| v == first) => AxisTrack::Fixed(first),
                Some(_) => AxisTrack::Values(values),
            },
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self, AxisTrack::Fixed(_))
    }

    /// Constant value, if fixed
    pub fn fixed_value(&self) -> Option<f32> {
        match self {
            AxisTrack::Fixed(v) => Some(*v),
            _ => None,
        }
    }

    /// Number of stored samples (1 for a fixed axis)
    pub fn len(&self) -> usize {
        match self {
            AxisTrack::Fixed(_) => 1,
            AxisTrack::Keyframes(k) => k.len(),
            AxisTrack::Values(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size in bytes of this axis' payload block in `format`
    ///
    /// Fixed axes have no payload: their value lives in the slot.
    pub fn payload_size(&self, format: CurveFormat) -> usize {
        if self.is_fixed() {
            0
        } else {
            format.header_size() + format.sample_size() * self.len()
        }
    }
}

/// Which component of a bone transform a track animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Scale,
    Rotation,
    Translation,
}

impl TransformKind {
    pub const ALL: [TransformKind; 3] = [
        TransformKind::Scale,
        TransformKind::Rotation,
        TransformKind::Translation,
    ];

    /// Value of an axis that does not change the bone
    #[inline]
    pub const fn identity(self) -> f32 {
        match self {
            TransformKind::Scale => 1.0,
            TransformKind::Rotation | TransformKind::Translation => 0.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TransformKind::Scale => "Scale",
            TransformKind::Rotation => "Rotation",
            TransformKind::Translation => "Translation",
        }
    }
}

/// Axis names in slot order
pub const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];
