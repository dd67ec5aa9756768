//! Export pipeline (manifest -> node bytes)
//!
//! Each enabled channel takes the next curve of the manifest, is sampled on
//! a private copy of that curve, and feeds the track builders. Channel
//! problems are collected and reported together; nothing is encoded when any
//! channel failed.

use anyhow::{Context, Result};
use brres_common::{
    scale_colour_value, write_chr0_node, write_clr0_node, write_srt0_node, AxisSamples,
    ColourChannel, CurveFormat, EncodeError, TransformKind, TransformTrack, UvTransformTracks,
    AXIS_NAMES, UV_CHANNEL_NAMES,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::slice;

use crate::curve::{FCurve, KeyframeCurve};
use crate::manifest::{ColourSource, ExportManifest, ExportSettings, NodeType};
use crate::sampler::{
    all_frames_are_integers, analyse_keyframe_list, extract_keyframes, frames_are_sorted,
};

/// Channel names of a colour node, RGBA order
pub const COLOUR_CHANNEL_NAMES: [&str; 4] = ["red", "green", "blue", "alpha"];

/// Problem with the curve feeding one channel
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("at least one keyframe point in the curve used for {0} is not on a whole frame")]
    NonIntegerFrame(String),

    #[error("curve used for {0} is missing or has no keyframes within the export interval")]
    NoKeyframes(String),

    #[error("keyframe points in the curve used for {0} are not in increasing frame order")]
    UnsortedFrames(String),
}

/// Export failure
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Every channel problem found during the export
    #[error("{}", join_errors(.0))]
    Channels(Vec<ChannelError>),

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("invalid manifest: {0}")]
    Manifest(String),
}

fn join_errors(errors: &[ChannelError]) -> String {
    errors
        .iter()
        .map(|e| format!("Error: {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of a successful export
#[derive(Debug, Clone)]
pub struct ExportedNode {
    pub node_type: NodeType,
    /// Complete node, ready to be written as-is
    pub bytes: Vec<u8>,
    /// Non-fatal notes about the input
    pub hints: Vec<String>,
}

/// Encode the node described by `manifest`
///
/// The manifest's curves are never modified.
pub fn export_node(manifest: &ExportManifest) -> Result<ExportedNode, ExportError> {
    let settings = &manifest.settings;
    settings.validate()?;

    let mut curves = manifest.curves.iter();
    let mut hints = Vec::new();

    let bytes = match settings.node_type {
        NodeType::Chr0 => export_chr0(settings, &mut curves)?,
        NodeType::Clr0 => export_clr0(settings, &mut curves, &mut hints)?,
        NodeType::Srt0 => export_srt0(settings, &mut curves)?,
    };

    if curves.len() > 0 {
        tracing::debug!("{} curves left unused", curves.len());
    }
    for hint in &hints {
        tracing::warn!("Hint: {}", hint);
    }
    tracing::info!(
        "Encoded {} node: {} bytes",
        settings.node_type,
        bytes.len()
    );

    Ok(ExportedNode {
        node_type: settings.node_type,
        bytes,
        hints,
    })
}

/// Encode `manifest` and write the node to `output`
///
/// No file is created when the export fails.
pub fn export_manifest(manifest: &ExportManifest, output: &Path) -> Result<ExportedNode> {
    let node = export_node(manifest)
        .with_context(|| format!("Failed to export {}", output.display()))?;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&node.bytes)?;
    writer.flush()?;

    tracing::info!(
        "Exported {} node to {:?} ({} bytes)",
        node.node_type,
        output,
        node.bytes.len()
    );
    Ok(node)
}

// ============================================================================
// Channel Sampling
// ============================================================================

/// Copy the curve for `channel` and reject it if it cannot be sampled
fn snapshot(curve: Option<&FCurve>, channel: &str) -> Result<FCurve, ChannelError> {
    let curve = curve
        .filter(|curve| !curve.is_empty())
        .ok_or_else(|| ChannelError::NoKeyframes(channel.to_string()))?;
    if !all_frames_are_integers(&curve.keyframe_points) {
        return Err(ChannelError::NonIntegerFrame(channel.to_string()));
    }
    if !frames_are_sorted(&curve.keyframe_points) {
        return Err(ChannelError::UnsortedFrames(channel.to_string()));
    }
    Ok(curve.clone())
}

/// Samples for one transform axis in the requested format
fn sample_axis(
    curve: Option<&FCurve>,
    channel: &str,
    settings: &ExportSettings,
    format: CurveFormat,
) -> Result<AxisSamples, ChannelError> {
    let (start, end) = (settings.start_frame, settings.end_frame);
    let mut curve = snapshot(curve, channel)?;

    let span = analyse_keyframe_list(&mut curve, start, end, format.is_linear())
        .ok_or_else(|| ChannelError::NoKeyframes(channel.to_string()))?;
    tracing::debug!(
        "{} ({}): keyframes {}..={}, {} on interval",
        channel,
        curve.name,
        span.first,
        span.last,
        span.count
    );

    let points = curve.keyframe_points();
    if span.count == 1 {
        return Ok(AxisSamples::Constant(points[span.first].value()));
    }

    if format.is_linear() {
        let values = points[span.first..=span.last]
            .iter()
            .map(|p| p.value())
            .collect();
        Ok(AxisSamples::Values(values))
    } else {
        Ok(AxisSamples::Keyframes(extract_keyframes(
            points, span, start, end,
        )))
    }
}

/// One byte per frame for a colour channel
fn sample_colour(
    curve: Option<&FCurve>,
    channel: &str,
    settings: &ExportSettings,
    hints: &mut Vec<String>,
) -> Result<ColourChannel, ChannelError> {
    let mut curve = snapshot(curve, channel)?;

    let span = analyse_keyframe_list(&mut curve, settings.start_frame, settings.end_frame, true)
        .ok_or_else(|| ChannelError::NoKeyframes(channel.to_string()))?;

    let points = curve.keyframe_points();
    if span.count == 1 {
        hints.push(format!("curve selected for {} is constant", channel));
        return Ok(ColourChannel::Constant(scale_colour_value(
            points[span.first].value(),
        )));
    }

    let bytes = points[span.first..=span.last]
        .iter()
        .map(|p| scale_colour_value(p.value()))
        .collect();
    Ok(ColourChannel::Frames(bytes))
}

// ============================================================================
// Node Builders
// ============================================================================

fn export_chr0(
    settings: &ExportSettings,
    curves: &mut slice::Iter<'_, FCurve>,
) -> Result<Vec<u8>, ExportError> {
    let options = settings.chr0.conversion();
    let mut errors = Vec::new();
    let mut tracks = TransformKind::ALL.map(TransformTrack::absent);

    for (track, kind) in tracks.iter_mut().zip(TransformKind::ALL) {
        let transform = settings.chr0.transform(kind);
        if !transform.enabled {
            continue;
        }

        let mut samples: [AxisSamples; 3] = Default::default();
        for (axis, enabled) in transform.axes().into_iter().enumerate() {
            if !enabled {
                continue;
            }
            let channel = format!("{} {}", kind.name(), AXIS_NAMES[axis]);
            match sample_axis(curves.next(), &channel, settings, transform.format) {
                Ok(axis_samples) => samples[axis] = axis_samples,
                Err(e @ ChannelError::NonIntegerFrame(_)) => {
                    errors.push(e);
                    break;
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            *track = TransformTrack::build(kind, samples, transform.format, &options);
            tracing::debug!(
                "{}: format={} has={} isotropic={}",
                kind.name(),
                track.format(),
                track.has_data(),
                track.is_isotropic()
            );
        }
    }

    if !errors.is_empty() {
        return Err(ExportError::Channels(errors));
    }

    let [scale, rotation, translation] = &tracks;
    Ok(write_chr0_node(
        [scale, rotation, translation],
        &settings.node_name,
    )?)
}

fn export_clr0(
    settings: &ExportSettings,
    curves: &mut slice::Iter<'_, FCurve>,
    hints: &mut Vec<String>,
) -> Result<Vec<u8>, ExportError> {
    let frame_count = u32::try_from(settings.frame_count())
        .map_err(|_| ExportError::Settings("too many frames for a colour node".to_string()))?;

    let mut errors = Vec::new();
    let mut channels: [ColourChannel; 4] =
        [0, 0, 0, 0].map(ColourChannel::Constant);

    for (rgba, source) in settings.clr0.sources().into_iter().enumerate() {
        let channel = format!("{} channel", COLOUR_CHANNEL_NAMES[rgba]);
        match source {
            ColourSource::Constant { value } => {
                channels[rgba] = ColourChannel::Constant(scale_colour_value(value));
            }
            ColourSource::Fcurve => match sample_colour(curves.next(), &channel, settings, hints) {
                Ok(colour) => channels[rgba] = colour,
                Err(e @ ChannelError::NonIntegerFrame(_)) => {
                    errors.push(e);
                    break;
                }
                Err(e) => errors.push(e),
            },
        }
    }

    if !errors.is_empty() {
        return Err(ExportError::Channels(errors));
    }

    Ok(write_clr0_node(settings.clr0.mask, &channels, frame_count)?)
}

fn export_srt0(
    settings: &ExportSettings,
    curves: &mut slice::Iter<'_, FCurve>,
) -> Result<Vec<u8>, ExportError> {
    let mut errors = Vec::new();
    let mut samples: [AxisSamples; 5] = Default::default();

    for (i, enabled) in settings.srt0.channels().into_iter().enumerate() {
        if !enabled {
            continue;
        }
        match sample_axis(curves.next(), UV_CHANNEL_NAMES[i], settings, CurveFormat::I12) {
            Ok(channel_samples) => samples[i] = channel_samples,
            Err(e @ ChannelError::NonIntegerFrame(_)) => {
                errors.push(e);
                break;
            }
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(ExportError::Channels(errors));
    }

    let tracks = UvTransformTracks::build(samples);
    tracing::debug!(
        "UV transform: scale has={} isotropic={}, rotation has={}, translation has={}",
        tracks.scale_has(),
        tracks.scale_isotropic(),
        tracks.rotation_has(),
        tracks.translation_has()
    );
    Ok(write_srt0_node(&tracks)?)
}
