//! Quantization and per-axis payload encoding
//!
//! All multi-byte fields are big-endian. Bit-packed samples are assembled
//! MSB-first into a single integer and then written big-endian.

use super::{AxisTrack, CurveFormat, Keyframe};
use crate::packing::{EncodeError, to_bits, to_signed_bits};

/// Frame scale written into every interpolated header
pub const FRAME_SCALE: f32 = 1.0;

// ============================================================================
// Quantization
// ============================================================================

/// Step and base mapping a value range onto `0..2^bits`
///
/// Decoded value is `base + step * quantized`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeRange {
    pub step: f64,
    pub base: f64,
}

impl QuantizeRange {
    /// Normalize the range of `values` to an unsigned `bits`-bit integer
    ///
    /// An empty input yields a zero range.
    pub fn from_values(values: impl IntoIterator<Item = f32>, bits: u32) -> Self {
        let mut iter = values.into_iter().map(|v| v as f64);
        let Some(first) = iter.next() else {
            return Self {
                step: 0.0,
                base: 0.0,
            };
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        Self {
            step: (max - min) / ((1u64 << bits) - 1) as f64,
            base: min,
        }
    }

    /// Position of `value` in step units above `base` (0 for a flat range)
    #[inline]
    pub fn normalize(&self, value: f32) -> f64 {
        if self.step != 0.0 {
            (value as f64 - self.base) / self.step
        } else {
            0.0
        }
    }

    /// Quantize `value` to a `bits`-bit unsigned integer, rounding down
    ///
    /// A result of exactly `2^bits` (the top of the range landing one past
    /// the last code through float error) is clamped to `2^bits - 1`.
    pub fn quantize(&self, value: f32, bits: u32) -> Result<u32, EncodeError> {
        let normalized = self.normalize(value);
        let top = (1u64 << bits) as f64;
        let quantized = if normalized == top {
            top as i64 - 1
        } else {
            normalized.trunc() as i64
        };
        to_bits(quantized, bits)
    }
}

/// Truncate a scaled tangent to a signed `bits`-bit field
#[inline]
fn quantize_tangent(tangent: f32, scale: f64, bits: u32) -> Result<u32, EncodeError> {
    to_signed_bits((tangent as f64 * scale).trunc() as i64, bits)
}

// ============================================================================
// Sample Encoding
// ============================================================================

/// Pack an I4 sample: `[frame:8][value:12][tangent:12]`
pub fn encode_i4_sample(key: &Keyframe, range: &QuantizeRange) -> Result<u32, EncodeError> {
    let frame = to_bits(key.frame as i64, 8)?;
    let value = range.quantize(key.value, 12)?;
    let tangent = quantize_tangent(key.tangent, 32.0, 12)?;
    Ok((frame << 24) | (value << 12) | tangent)
}

/// Pack an I6 sample: `[frame*32:16][value:16][tangent:16]`
pub fn encode_i6_sample(key: &Keyframe, range: &QuantizeRange) -> Result<[u8; 6], EncodeError> {
    let frame = to_bits(key.frame as i64 * 32, 16)? as u64;
    let value = range.quantize(key.value, 16)? as u64;
    let tangent = quantize_tangent(key.tangent, 256.0, 16)? as u64;
    let packed = (frame << 32) | (value << 16) | tangent;

    let mut bytes = [0u8; 6];
    bytes.copy_from_slice(&packed.to_be_bytes()[2..]);
    Ok(bytes)
}

// ============================================================================
// Axis Payloads
// ============================================================================

fn write_interpolated_header(
    out: &mut Vec<u8>,
    count: usize,
    range: Option<&QuantizeRange>,
) -> Result<(), EncodeError> {
    let count = to_bits(count as i64, 16)? as u16;
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&FRAME_SCALE.to_be_bytes());
    if let Some(range) = range {
        out.extend_from_slice(&(range.step as f32).to_be_bytes());
        out.extend_from_slice(&(range.base as f32).to_be_bytes());
    }
    Ok(())
}

/// Append the payload block of one animated axis
///
/// Fixed axes have no payload and append nothing. The number of bytes
/// appended always equals [`AxisTrack::payload_size`].
pub fn encode_axis(
    out: &mut Vec<u8>,
    axis: &AxisTrack,
    format: CurveFormat,
) -> Result<(), EncodeError> {
    match (format, axis) {
        (_, AxisTrack::Fixed(_)) => Ok(()),

        (CurveFormat::I4, AxisTrack::Keyframes(keys)) => {
            let range = QuantizeRange::from_values(keys.iter().map(|k| k.value), 12);
            write_interpolated_header(out, keys.len(), Some(&range))?;
            for key in keys {
                out.extend_from_slice(&encode_i4_sample(key, &range)?.to_be_bytes());
            }
            Ok(())
        }

        (CurveFormat::I6, AxisTrack::Keyframes(keys)) => {
            let range = QuantizeRange::from_values(keys.iter().map(|k| k.value), 16);
            write_interpolated_header(out, keys.len(), Some(&range))?;
            for key in keys {
                out.extend_from_slice(&encode_i6_sample(key, &range)?);
            }
            Ok(())
        }

        (CurveFormat::I12, AxisTrack::Keyframes(keys)) => {
            write_interpolated_header(out, keys.len(), None)?;
            for key in keys {
                out.extend_from_slice(&(key.frame as f32).to_be_bytes());
                out.extend_from_slice(&key.value.to_be_bytes());
                out.extend_from_slice(&key.tangent.to_be_bytes());
            }
            Ok(())
        }

        (CurveFormat::L1, AxisTrack::Values(values)) => {
            let range = QuantizeRange::from_values(values.iter().copied(), 16);
            out.extend_from_slice(&(range.step as f32).to_be_bytes());
            out.extend_from_slice(&(range.base as f32).to_be_bytes());
            for &value in values {
                out.extend_from_slice(&(range.normalize(value) as f32).to_be_bytes());
            }
            Ok(())
        }

        (CurveFormat::L4, AxisTrack::Values(values)) => {
            for value in values {
                out.extend_from_slice(&value.to_be_bytes());
            }
            Ok(())
        }

        (format, _) => Err(EncodeError::FormatMismatch {
            format: format.as_str(),
        }),
    }
}
