//! Track builders
//!
//! A [`TransformTrack`] is built once from up to three axes of raw samples
//! and is read-only afterwards. Building performs, in order: the optional
//! Y/Z swap, unit conversion, constant collapse, flag computation and (for
//! animated tracks) format escalation.

use super::{AxisSamples, AxisTrack, CurveFormat, Keyframe, TransformKind};

/// Unit and space conversion applied while building bone transform tracks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    /// Swap the Y and Z axes, negating the new Z of rotation and translation
    pub xyz_to_xzy: bool,
    /// Rotation data is in radians and is stored in degrees
    pub convert_to_degrees: bool,
    /// Multiplier applied to translation values and tangents
    pub translation_scale: f32,
}

impl ConversionOptions {
    /// Leaves all data untouched
    pub const IDENTITY: Self = Self {
        xyz_to_xzy: false,
        convert_to_degrees: false,
        translation_scale: 1.0,
    };

    fn multiplier(&self, kind: TransformKind, axis: usize) -> f64 {
        let sign = if axis == 2 && self.xyz_to_xzy { -1.0 } else { 1.0 };
        match kind {
            TransformKind::Scale => 1.0,
            TransformKind::Rotation => {
                let deg_per_rad = if self.convert_to_degrees {
                    180.0 / std::f64::consts::PI
                } else {
                    1.0
                };
                deg_per_rad * sign
            }
            TransformKind::Translation => self.translation_scale as f64 * sign,
        }
    }
}

// ============================================================================
// Format Escalation
// ============================================================================

/// Global extrema of a track's animated axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackExtrema {
    pub sample_count: usize,
    pub max_frame: i32,
    /// Smallest tangent, never above 0
    pub min_tangent: f32,
    /// Largest tangent, never below 0
    pub max_tangent: f32,
}

impl TrackExtrema {
    /// Measure every keyframed axis
    pub fn measure<'a>(axes: impl IntoIterator<Item = &'a AxisTrack>) -> Self {
        let mut extrema = Self::default();
        for axis in axes {
            if let AxisTrack::Keyframes(keys) = axis {
                extrema.sample_count = extrema.sample_count.max(keys.len());
                for key in keys {
                    extrema.max_frame = extrema.max_frame.max(key.frame);
                    extrema.min_tangent = extrema.min_tangent.min(key.tangent);
                    extrema.max_tangent = extrema.max_tangent.max(key.tangent);
                }
            }
        }
        extrema
    }
}

/// Widen `format` until the track's frames and tangents fit its fields
///
/// Only `I4` and `I6` are ever widened; every other format is returned
/// unchanged. `I12` is chosen when the sample count, frame index or scaled
/// tangent would overflow the 16-bit fields of `I6`, and `I6` when they
/// would overflow the 8-bit frame or 12-bit tangent of `I4`.
pub fn escalate_format(format: CurveFormat, extrema: &TrackExtrema) -> CurveFormat {
    if !matches!(format, CurveFormat::I4 | CurveFormat::I6) {
        return format;
    }

    let min_tangent = extrema.min_tangent as f64;
    let max_tangent = extrema.max_tangent as f64;

    if extrema.sample_count > 65535
        || extrema.max_frame > 2047
        || 256.0 * min_tangent < -32768.0
        || 256.0 * max_tangent >= 32768.0
    {
        tracing::debug!("Increased format from {} to i12", format);
        return CurveFormat::I12;
    }

    if format == CurveFormat::I4
        && (extrema.max_frame > 255 || 32.0 * min_tangent < -2048.0 || 32.0 * max_tangent >= 2048.0)
    {
        tracing::debug!("Increased format from {} to i6", format);
        return CurveFormat::I6;
    }

    format
}

// ============================================================================
// Bone Transform Tracks
// ============================================================================

/// One finalized component (scale, rotation or translation) of a bone node
#[derive(Debug, Clone, PartialEq)]
pub struct TransformTrack {
    kind: TransformKind,
    format: CurveFormat,
    has_data: bool,
    isotropic: bool,
    axes: [AxisTrack; 3],
}

impl TransformTrack {
    /// Track for a component that is not exported
    pub fn absent(kind: TransformKind) -> Self {
        let identity = AxisTrack::Fixed(kind.identity());
        Self {
            kind,
            format: CurveFormat::None,
            has_data: false,
            isotropic: true,
            axes: [identity.clone(), identity.clone(), identity],
        }
    }

    /// Build a track from raw per-axis samples
    ///
    /// `format` is the requested storage format for animated axes; it may be
    /// widened (see [`escalate_format`]) and is replaced by
    /// [`CurveFormat::None`] when every axis is constant.
    pub fn build(
        kind: TransformKind,
        samples: [AxisSamples; 3],
        format: CurveFormat,
        options: &ConversionOptions,
    ) -> Self {
        if samples.iter().all(AxisSamples::is_empty) {
            return Self::absent(kind);
        }

        let [x, mut y, mut z] = samples;
        if options.xyz_to_xzy {
            std::mem::swap(&mut y, &mut z);
        }

        let mut axis = 0;
        let axes = [x, y, z].map(|samples| {
            let converted = convert_samples(samples, options.multiplier(kind, axis));
            axis += 1;
            AxisTrack::collapse(converted, kind.identity())
        });

        let isotropic = axes[0] == axes[1] && axes[1] == axes[2];

        let (format, has_data) = if axes.iter().all(AxisTrack::is_fixed) {
            let identity = isotropic && axes[0].fixed_value() == Some(kind.identity());
            (CurveFormat::None, !identity)
        } else {
            let requested = if format == CurveFormat::None {
                CurveFormat::I4
            } else {
                format
            };
            let extrema = TrackExtrema::measure(axes.iter());
            tracing::debug!(
                "{} extrema: samples={} max_frame={} tangents=[{}, {}]",
                kind.name(),
                extrema.sample_count,
                extrema.max_frame,
                extrema.min_tangent,
                extrema.max_tangent
            );
            (escalate_format(requested, &extrema), true)
        };

        Self {
            kind,
            format,
            has_data,
            isotropic,
            axes,
        }
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn format(&self) -> CurveFormat {
        self.format
    }

    pub fn has_data(&self) -> bool {
        self.has_data
    }

    pub fn is_isotropic(&self) -> bool {
        self.isotropic
    }

    pub fn is_fixed(&self, axis: usize) -> bool {
        self.axes[axis].is_fixed()
    }

    pub fn axis(&self, axis: usize) -> &AxisTrack {
        &self.axes[axis]
    }

    /// Axes that get a slot in the node: none without data, only X when
    /// isotropic, otherwise all three.
    pub fn written_axes(&self) -> &[AxisTrack] {
        if !self.has_data {
            &[]
        } else if self.isotropic {
            &self.axes[..1]
        } else {
            &self.axes[..]
        }
    }
}

fn convert_samples(samples: AxisSamples, multiplier: f64) -> AxisSamples {
    if multiplier == 1.0 {
        return samples;
    }
    let scale = |v: f32| (v as f64 * multiplier) as f32;
    match samples {
        AxisSamples::Empty => AxisSamples::Empty,
        AxisSamples::Constant(v) => AxisSamples::Constant(scale(v)),
        AxisSamples::Keyframes(keys) => AxisSamples::Keyframes(
            keys.into_iter()
                .map(|k| Keyframe::new(k.frame, scale(k.value), scale(k.tangent)))
                .collect(),
        ),
        AxisSamples::Values(values) => {
            AxisSamples::Values(values.into_iter().map(scale).collect())
        }
    }
}

// ============================================================================
// UV Transform Channels
// ============================================================================

/// The five independent channels of a UV transform node
///
/// Rotation is stored in degrees; rotation and translation are negated to
/// match texture space. Both conversions are applied while building.
#[derive(Debug, Clone, PartialEq)]
pub struct UvTransformTracks {
    pub scale_x: AxisTrack,
    pub scale_y: AxisTrack,
    pub rotation: AxisTrack,
    pub translation_x: AxisTrack,
    pub translation_y: AxisTrack,
    scale_isotropic: bool,
    scale_has: bool,
    rotation_has: bool,
    translation_has: bool,
}

/// Channel names in node order
pub const UV_CHANNEL_NAMES: [&str; 5] = [
    "Scale X",
    "Scale Y",
    "Rotation",
    "Translation X",
    "Translation Y",
];

impl UvTransformTracks {
    pub fn build(samples: [AxisSamples; 5]) -> Self {
        let [sx, sy, rot, tx, ty] = samples;
        let scale_x = AxisTrack::collapse(sx, TransformKind::Scale.identity());
        let scale_y = AxisTrack::collapse(sy, TransformKind::Scale.identity());
        let rotation = AxisTrack::collapse(
            convert_samples(rot, -180.0 / std::f64::consts::PI),
            TransformKind::Rotation.identity(),
        );
        let translation_x = AxisTrack::collapse(
            convert_samples(tx, -1.0),
            TransformKind::Translation.identity(),
        );
        let translation_y = AxisTrack::collapse(
            convert_samples(ty, -1.0),
            TransformKind::Translation.identity(),
        );

        let animated_or_nonzero = |track: &AxisTrack| track.fixed_value().is_none_or(|v| v != 0.0);

        let scale_isotropic = scale_x == scale_y;
        let scale_has = !(scale_isotropic && scale_x.fixed_value() == Some(1.0));
        let rotation_has = animated_or_nonzero(&rotation);
        let translation_has =
            animated_or_nonzero(&translation_x) || animated_or_nonzero(&translation_y);

        Self {
            scale_x,
            scale_y,
            rotation,
            translation_x,
            translation_y,
            scale_isotropic,
            scale_has,
            rotation_has,
            translation_has,
        }
    }

    pub fn scale_isotropic(&self) -> bool {
        self.scale_isotropic
    }

    pub fn scale_has(&self) -> bool {
        self.scale_has
    }

    pub fn rotation_has(&self) -> bool {
        self.rotation_has
    }

    pub fn translation_has(&self) -> bool {
        self.translation_has
    }

    /// Channels that get a slot, in node order
    pub fn written_channels(&self) -> Vec<&AxisTrack> {
        let mut channels = Vec::with_capacity(5);
        if self.scale_has {
            channels.push(&self.scale_x);
            if !self.scale_isotropic {
                channels.push(&self.scale_y);
            }
        }
        if self.rotation_has {
            channels.push(&self.rotation);
        }
        if self.translation_has {
            channels.push(&self.translation_x);
            channels.push(&self.translation_y);
        }
        channels
    }
}
