//! BRRES animation node formats
//!
//! Three node kinds, each a self-contained big-endian byte buffer:
//!
//! - **CHR0** (bone transform): scale, rotation and translation, each up to
//!   three axes, each axis constant or a keyframed curve in one of the
//!   [`CurveFormat`]s.
//! - **SRT0** (UV transform): five independent scalar channels stored as
//!   constants or I12 curves.
//! - **CLR0** (colour): one RGBA byte entry per frame.
//!
//! # Keyframed axis payloads
//! ```text
//! I4/I6:  u16 count | u16 0 | f32 frame scale (1.0) | f32 step | f32 base | samples
//! I12:    u16 count | u16 0 | f32 frame scale (1.0) | samples
//! L1:     f32 step | f32 base | f32 normalized value per frame
//! L4:     f32 value per frame
//!
//! I4 sample  (32 bits): [frame:8][value:12][tangent*32:12 signed]
//! I6 sample  (48 bits): [frame*32:16][value:16][tangent*256:16 signed]
//! I12 sample (96 bits): f32 frame | f32 value | f32 tangent
//! ```
//!
//! Quantized values decode as `base + step * value`.

mod encoding;
mod format;
mod header;
mod node;
mod track;
mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use encoding::{FRAME_SCALE, QuantizeRange, encode_axis, encode_i4_sample, encode_i6_sample};
pub use format::CurveFormat;
pub use header::{
    CHR0_FIXED, CHR0_FORMAT, CHR0_HAS, CHR0_ISOTROPIC, Clr0Header, SRT0_ALWAYS_SET,
    SRT0_ROTATION_FIXED, SRT0_ROTATION_ZERO, SRT0_SCALE_IDENTITY, SRT0_SCALE_ISOTROPIC,
    SRT0_SCALE_X_FIXED, SRT0_SCALE_Y_FIXED, SRT0_TRANSLATION_X_FIXED, SRT0_TRANSLATION_Y_FIXED,
    SRT0_TRANSLATION_ZERO, chr0_type_code, srt0_type_code,
};
pub use node::{
    CHR0_PREFIX_SIZE, ColourChannel, SLOT_SIZE, SRT0_PREFIX_SIZE, ascii_node_name,
    write_chr0_node, write_clr0_node, write_srt0_node,
};
pub use track::{
    ConversionOptions, TrackExtrema, TransformTrack, UV_CHANNEL_NAMES, UvTransformTracks,
    escalate_format,
};
pub use types::{
    AXIS_NAMES, AxisSamples, AxisTrack, I4_SAMPLE_SIZE, I6_SAMPLE_SIZE, I12_SAMPLE_SIZE,
    Keyframe, LINEAR_SAMPLE_SIZE, TransformKind,
};
