//! Node type codes and fixed headers
//!
//! Every bit position here is part of the node format consumed by the
//! runtime. Layouts are declared as `const` [`BitField`]s and checked for
//! overlap at compile time.

use super::{TransformTrack, UvTransformTracks};
use crate::packing::{BitField, EncodeError, fields_are_disjoint, scale_colour_value};

// ============================================================================
// Bone Transform (CHR0) Type Code
// ============================================================================

/// Isotropic flag per component (scale, rotation, translation)
pub const CHR0_ISOTROPIC: [BitField; 3] = [
    BitField::flag("scale isotropic", 0x04),
    BitField::flag("rotation isotropic", 0x05),
    BitField::flag("translation isotropic", 0x06),
];

/// Fixed flag per component and axis
pub const CHR0_FIXED: [[BitField; 3]; 3] = [
    [
        BitField::flag("scale x fixed", 0x0D),
        BitField::flag("scale y fixed", 0x0E),
        BitField::flag("scale z fixed", 0x0F),
    ],
    [
        BitField::flag("rotation x fixed", 0x10),
        BitField::flag("rotation y fixed", 0x11),
        BitField::flag("rotation z fixed", 0x12),
    ],
    [
        BitField::flag("translation x fixed", 0x13),
        BitField::flag("translation y fixed", 0x14),
        BitField::flag("translation z fixed", 0x15),
    ],
];

/// Has-data flag per component
pub const CHR0_HAS: [BitField; 3] = [
    BitField::flag("scale has data", 0x16),
    BitField::flag("rotation has data", 0x17),
    BitField::flag("translation has data", 0x18),
];

/// Format code per component; only rotation has room for the linear formats
pub const CHR0_FORMAT: [BitField; 3] = [
    BitField::new("scale format", 0x19, 2),
    BitField::new("rotation format", 0x1B, 3),
    BitField::new("translation format", 0x1E, 2),
];

const CHR0_FIELDS: [BitField; 18] = [
    CHR0_ISOTROPIC[0],
    CHR0_ISOTROPIC[1],
    CHR0_ISOTROPIC[2],
    CHR0_FIXED[0][0],
    CHR0_FIXED[0][1],
    CHR0_FIXED[0][2],
    CHR0_FIXED[1][0],
    CHR0_FIXED[1][1],
    CHR0_FIXED[1][2],
    CHR0_FIXED[2][0],
    CHR0_FIXED[2][1],
    CHR0_FIXED[2][2],
    CHR0_HAS[0],
    CHR0_HAS[1],
    CHR0_HAS[2],
    CHR0_FORMAT[0],
    CHR0_FORMAT[1],
    CHR0_FORMAT[2],
];

const _: () = assert!(fields_are_disjoint(&CHR0_FIELDS));

/// Build the bone transform type code from scale, rotation and translation
///
/// Fails if a component's format code does not fit its field (a linear
/// format on scale or translation).
pub fn chr0_type_code(tracks: [&TransformTrack; 3]) -> Result<u32, EncodeError> {
    let mut code = 0u32;
    for (i, track) in tracks.iter().enumerate() {
        code = CHR0_ISOTROPIC[i].insert_flag(code, track.is_isotropic())?;
        for axis in 0..3 {
            code = CHR0_FIXED[i][axis].insert_flag(code, track.is_fixed(axis))?;
        }
        code = CHR0_HAS[i].insert_flag(code, track.has_data())?;
        code = CHR0_FORMAT[i].insert(code, track.format().code())?;
    }
    Ok(code)
}

// ============================================================================
// UV Transform (SRT0) Type Code
// ============================================================================

pub const SRT0_ALWAYS_SET: BitField = BitField::flag("always set", 0x00);
pub const SRT0_SCALE_IDENTITY: BitField = BitField::flag("scale identity", 0x01);
pub const SRT0_ROTATION_ZERO: BitField = BitField::flag("rotation zero", 0x02);
pub const SRT0_TRANSLATION_ZERO: BitField = BitField::flag("translation zero", 0x03);
pub const SRT0_SCALE_ISOTROPIC: BitField = BitField::flag("scale isotropic", 0x04);
pub const SRT0_SCALE_X_FIXED: BitField = BitField::flag("scale x fixed", 0x05);
pub const SRT0_SCALE_Y_FIXED: BitField = BitField::flag("scale y fixed", 0x06);
pub const SRT0_ROTATION_FIXED: BitField = BitField::flag("rotation fixed", 0x07);
pub const SRT0_TRANSLATION_X_FIXED: BitField = BitField::flag("translation x fixed", 0x08);
pub const SRT0_TRANSLATION_Y_FIXED: BitField = BitField::flag("translation y fixed", 0x09);

const _: () = assert!(fields_are_disjoint(&[
    SRT0_ALWAYS_SET,
    SRT0_SCALE_IDENTITY,
    SRT0_ROTATION_ZERO,
    SRT0_TRANSLATION_ZERO,
    SRT0_SCALE_ISOTROPIC,
    SRT0_SCALE_X_FIXED,
    SRT0_SCALE_Y_FIXED,
    SRT0_ROTATION_FIXED,
    SRT0_TRANSLATION_X_FIXED,
    SRT0_TRANSLATION_Y_FIXED,
]));

/// Build the UV transform type code
pub fn srt0_type_code(tracks: &UvTransformTracks) -> Result<u32, EncodeError> {
    let mut code = SRT0_ALWAYS_SET.insert_flag(0, true)?;
    code = SRT0_SCALE_IDENTITY.insert_flag(code, !tracks.scale_has())?;
    code = SRT0_ROTATION_ZERO.insert_flag(code, !tracks.rotation_has())?;
    code = SRT0_TRANSLATION_ZERO.insert_flag(code, !tracks.translation_has())?;
    code = SRT0_SCALE_ISOTROPIC.insert_flag(code, tracks.scale_isotropic())?;
    code = SRT0_SCALE_X_FIXED.insert_flag(code, tracks.scale_x.is_fixed())?;
    code = SRT0_SCALE_Y_FIXED.insert_flag(code, tracks.scale_y.is_fixed())?;
    code = SRT0_ROTATION_FIXED.insert_flag(code, tracks.rotation.is_fixed())?;
    code = SRT0_TRANSLATION_X_FIXED.insert_flag(code, tracks.translation_x.is_fixed())?;
    code = SRT0_TRANSLATION_Y_FIXED.insert_flag(code, tracks.translation_y.is_fixed())?;
    Ok(code)
}

// ============================================================================
// Colour (CLR0) Header
// ============================================================================

/// Colour node header (12 bytes)
///
/// Note: Not packed - we use explicit byte serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clr0Header {
    /// Mask colour, RGBA
    pub mask: [u8; 4],
    /// Unknown word, always 8
    pub flags: u32,
    /// Number of frames (one RGBA entry each)
    pub frame_count: u32,
}

impl Clr0Header {
    pub const SIZE: usize = 12;

    pub fn new(mask: [f32; 4], frame_count: u32) -> Self {
        Self {
            mask: mask.map(scale_colour_value),
            flags: 0x08,
            frame_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.mask);
        bytes[4..8].copy_from_slice(&self.flags.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.frame_count.to_be_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            mask: [bytes[0], bytes[1], bytes[2], bytes[3]],
            flags: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            frame_count: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Total node size (header + one RGBA entry per frame)
    pub fn node_size(&self) -> usize {
        Self::SIZE + self.frame_count as usize * 4
    }
}
