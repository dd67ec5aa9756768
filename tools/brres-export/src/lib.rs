//! brres-export library
//!
//! Converts keyframed host curves into BRRES animation nodes: bone transform
//! (CHR0), colour (CLR0) and UV transform (SRT0).

pub mod curve;
pub mod export;
pub mod manifest;
pub mod sampler;

// Re-export the node codec
pub use brres_common::formats;

pub use curve::{FCurve, Interpolation, KeyframeCurve, KeyframePoint};
pub use export::{export_manifest, export_node, ChannelError, ExportError, ExportedNode};
pub use manifest::{ExportManifest, ExportSettings, NodeType};
pub use sampler::{
    all_frames_are_integers, analyse_keyframe_list, extract_keyframes, frames_are_sorted,
    get_tangent, KeyframeSpan, DISTINCT_TANGENTS_THRESHOLD, VERTICAL_TANGENT_GRADIENT,
};
