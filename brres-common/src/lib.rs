//! Shared types and encoders for BRRES animation nodes
//!
//! This crate provides the codec used by `brres-export`:
//!
//! # Modules
//!
//! - [`packing`] - Fixed-width bit packing with overflow detection
//! - [`formats`] - Track builders, quantization and node writers

pub mod formats;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{BitField, EncodeError, scale_colour_value, to_bits, to_signed_bits};

// Re-export commonly used format items
pub use formats::{
    AXIS_NAMES, AxisSamples, AxisTrack, ColourChannel, ConversionOptions, CurveFormat, Keyframe,
    TransformKind, TransformTrack, UV_CHANNEL_NAMES, UvTransformTracks, write_chr0_node,
    write_clr0_node, write_srt0_node,
};
