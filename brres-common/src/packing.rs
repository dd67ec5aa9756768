//! Fixed-width integer packing utilities
//!
//! Provides the primitives every node encoder is built from:
//! - unsigned and two's-complement packing into N-bit fields
//! - [`BitField`], a `(shift, width)` descriptor over a `u32` word
//! - colour float → byte conversion
//!
//! Nothing in this module truncates or wraps: a value that does not fit its
//! field is an [`EncodeError`].

// ============================================================================
// Errors
// ============================================================================

/// Encoding error raised while packing a node
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// Unsigned value does not fit in the field
    #[error("{value} not in range(0, 2^{bits})")]
    Overflow { value: i64, bits: u32 },

    /// Signed value does not fit in the field
    #[error("{value} not in range(-2^{}, 2^{})", .bits - 1, .bits - 1)]
    SignedOverflow { value: i64, bits: u32 },

    /// Axis data does not match the layout required by the format
    #[error("axis data cannot be encoded with format {format}")]
    FormatMismatch { format: &'static str },

    /// Per-frame channel has the wrong number of samples
    #[error("channel has {actual} samples, expected {expected}")]
    ChannelLength { expected: usize, actual: usize },

    /// Value does not fit a named bitfield of a type code
    #[error("value {value} does not fit type code field '{field}'")]
    FieldOverflow { field: &'static str, value: u32 },
}

// ============================================================================
// Integer Packing
// ============================================================================

/// Pack a non-negative integer into `bits` bits
///
/// Returns [`EncodeError::Overflow`] unless `0 <= value < 2^bits`.
#[inline]
pub fn to_bits(value: i64, bits: u32) -> Result<u32, EncodeError> {
    debug_assert!(bits > 0 && bits <= 32);
    if (0..(1i64 << bits)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(EncodeError::Overflow { value, bits })
    }
}

/// Pack a signed integer into a `bits`-bit two's-complement field
///
/// Values in `0..2^(bits-1)` are stored as-is, values in `-2^(bits-1)..0`
/// are stored as `value + 2^bits`. The result never has bits set above
/// `bits`.
#[inline]
pub fn to_signed_bits(value: i64, bits: u32) -> Result<u32, EncodeError> {
    debug_assert!(bits > 0 && bits <= 32);
    let edge = 1i64 << (bits - 1);
    if (-edge..edge).contains(&value) {
        if value < 0 {
            Ok(((edge << 1) + value) as u32)
        } else {
            Ok(value as u32)
        }
    } else {
        Err(EncodeError::SignedOverflow { value, bits })
    }
}

// ============================================================================
// Bitfields
// ============================================================================

/// A field of a 32-bit type code, described by its shift and width
///
/// Constructed with [`BitField::new`], which is `const` and rejects fields
/// that run past bit 31, so layouts declared as `const` items are checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub shift: u32,
    pub width: u32,
}

impl BitField {
    pub const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        assert!(width > 0, "bitfield must be at least one bit wide");
        assert!(shift + width <= 32, "bitfield exceeds 32-bit word");
        Self { name, shift, width }
    }

    /// Single-bit flag at `shift`
    pub const fn flag(name: &'static str, shift: u32) -> Self {
        Self::new(name, shift, 1)
    }

    /// Mask of the field in place
    #[inline]
    pub const fn mask(self) -> u32 {
        (u32::MAX >> (32 - self.width)) << self.shift
    }

    /// Whether two fields share any bit
    pub const fn overlaps(self, other: BitField) -> bool {
        self.mask() & other.mask() != 0
    }

    /// Place `value` in this field of `word`
    pub fn insert(self, word: u32, value: u32) -> Result<u32, EncodeError> {
        if value > (u32::MAX >> (32 - self.width)) {
            return Err(EncodeError::FieldOverflow {
                field: self.name,
                value,
            });
        }
        Ok((word & !self.mask()) | (value << self.shift))
    }

    /// Place a boolean flag in this field of `word`
    #[inline]
    pub fn insert_flag(self, word: u32, set: bool) -> Result<u32, EncodeError> {
        self.insert(word, set as u32)
    }

    /// Read this field back out of `word`
    #[inline]
    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }
}

/// Check at compile time that no two fields of a layout overlap
pub const fn fields_are_disjoint(fields: &[BitField]) -> bool {
    let mut i = 0;
    while i < fields.len() {
        let mut j = i + 1;
        while j < fields.len() {
            if fields[i].overlaps(fields[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

// ============================================================================
// Colour Packing
// ============================================================================

/// Convert a colour component in [0.0, 1.0] to a byte
///
/// Scales by 256 rather than 255 so the byte range is split into equal
/// buckets; anything at or above 255.5 saturates to 255.
#[inline]
pub fn scale_colour_value(value: f32) -> u8 {
    let scaled = value as f64 * 256.0;
    if scaled >= 255.5 {
        255
    } else if scaled <= 0.0 {
        0
    } else {
        scaled.floor() as u8
    }
}
