//! Keyframe storage formats

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage format of an animated axis
///
/// Interpolated formats (`I4`, `I6`, `I12`) store `(frame, value, tangent)`
/// samples. Linear formats (`L1`, `L4`) store one value per frame and no
/// tangents. `None` marks a track whose axes are all constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveFormat {
    #[default]
    None,
    /// 4 bytes per sample: 8-bit frame, 12-bit value, 12-bit tangent
    I4,
    /// 6 bytes per sample: 16-bit frame, 16-bit value, 16-bit tangent
    I6,
    /// 12 bytes per sample: three f32
    I12,
    /// One normalized f32 per frame
    L1,
    /// One raw f32 per frame
    L4,
}

impl CurveFormat {
    /// Code stored in a type code's format field (5 is unused)
    pub const fn code(self) -> u32 {
        match self {
            CurveFormat::None => 0,
            CurveFormat::I4 => 1,
            CurveFormat::I6 => 2,
            CurveFormat::I12 => 3,
            CurveFormat::L1 => 4,
            CurveFormat::L4 => 6,
        }
    }

    /// Size of the per-axis header preceding sample data
    pub const fn header_size(self) -> usize {
        match self {
            // count, reserved, frame scale, step, base
            CurveFormat::I4 | CurveFormat::I6 => 16,
            // count, reserved, frame scale
            CurveFormat::I12 => 8,
            // step, base
            CurveFormat::L1 => 8,
            CurveFormat::L4 | CurveFormat::None => 0,
        }
    }

    /// Size of one encoded sample
    pub const fn sample_size(self) -> usize {
        match self {
            CurveFormat::I4 => super::I4_SAMPLE_SIZE,
            CurveFormat::I6 => super::I6_SAMPLE_SIZE,
            CurveFormat::I12 => super::I12_SAMPLE_SIZE,
            CurveFormat::L1 | CurveFormat::L4 => super::LINEAR_SAMPLE_SIZE,
            CurveFormat::None => 0,
        }
    }

    /// Whether samples carry frame and tangent
    #[inline]
    pub const fn is_interpolated(self) -> bool {
        matches!(self, CurveFormat::I4 | CurveFormat::I6 | CurveFormat::I12)
    }

    /// Whether the curve is stored as one value per frame
    #[inline]
    pub const fn is_linear(self) -> bool {
        matches!(self, CurveFormat::L1 | CurveFormat::L4)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CurveFormat::None => "none",
            CurveFormat::I4 => "i4",
            CurveFormat::I6 => "i6",
            CurveFormat::I12 => "i12",
            CurveFormat::L1 => "l1",
            CurveFormat::L4 => "l4",
        }
    }
}

impl fmt::Display for CurveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
