//! Export manifest parsing
//!
//! A manifest holds the export settings plus a snapshot of the host curves.
//! Enabled channels consume `[[curves]]` in order: scale X/Y/Z, rotation
//! X/Y/Z, translation X/Y/Z for bone nodes; red, green, blue, alpha for
//! colour nodes; scale X/Y, rotation, translation X/Y for UV nodes.

use anyhow::{Context, Result};
use brres_common::{ConversionOptions, CurveFormat, TransformKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::curve::FCurve;
use crate::export::ExportError;

/// Export manifest (TOML, or JSON by extension)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportManifest {
    #[serde(default)]
    pub settings: ExportSettings,
    #[serde(default)]
    pub curves: Vec<FCurve>,
}

impl ExportManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let manifest = if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        };
        manifest.with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Parse a TOML manifest
    pub fn parse(content: &str) -> Result<Self, ExportError> {
        toml::from_str(content).map_err(|e| ExportError::Manifest(e.to_string()))
    }

    /// Parse a JSON manifest
    pub fn parse_json(content: &str) -> Result<Self, ExportError> {
        serde_json::from_str(content).map_err(|e| ExportError::Manifest(e.to_string()))
    }
}

/// Kind of node to export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Bone transform
    #[default]
    Chr0,
    /// Colour
    Clr0,
    /// UV transform
    Srt0,
}

impl NodeType {
    /// File extension of an exported node
    pub const fn extension(self) -> &'static str {
        match self {
            NodeType::Chr0 => "chr0",
            NodeType::Clr0 => "clr0",
            NodeType::Srt0 => "srt0",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Chr0 => "CHR0",
            NodeType::Clr0 => "CLR0",
            NodeType::Srt0 => "SRT0",
        };
        f.write_str(name)
    }
}

/// Longest export interval; relative frame indices fit 16 bits
pub const MAX_FRAME_COUNT: i64 = 1 << 16;

/// `[settings]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub node_type: NodeType,
    /// First exported frame (inclusive)
    pub start_frame: i32,
    /// Last exported frame (inclusive)
    pub end_frame: i32,
    /// Bone name written into bone transform nodes
    pub node_name: String,
    pub chr0: Chr0Settings,
    pub clr0: Clr0Settings,
    pub srt0: Srt0Settings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            node_type: NodeType::default(),
            start_frame: 1,
            end_frame: 60,
            node_name: "MyAnimationNode".to_string(),
            chr0: Chr0Settings::default(),
            clr0: Clr0Settings::default(),
            srt0: Srt0Settings::default(),
        }
    }
}

impl ExportSettings {
    /// Number of frames in the export interval
    pub fn frame_count(&self) -> i64 {
        self.end_frame as i64 - self.start_frame as i64 + 1
    }

    /// Validate settings before export
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.end_frame < self.start_frame {
            return Err(ExportError::Settings(format!(
                "end_frame {} is before start_frame {}",
                self.end_frame, self.start_frame
            )));
        }
        if self.frame_count() > MAX_FRAME_COUNT {
            return Err(ExportError::Settings(format!(
                "interval of {} frames exceeds the limit of {} frames",
                self.frame_count(),
                MAX_FRAME_COUNT
            )));
        }

        if self.node_type == NodeType::Chr0 {
            for kind in TransformKind::ALL {
                let transform = self.chr0.transform(kind);
                if transform.enabled && !transform_accepts(kind, transform.format) {
                    return Err(ExportError::Settings(format!(
                        "format {} cannot be used for {} data",
                        transform.format,
                        kind.name().to_lowercase()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Scale and translation only have a 2-bit format field
fn transform_accepts(kind: TransformKind, format: CurveFormat) -> bool {
    format.is_interpolated() || (format.is_linear() && kind == TransformKind::Rotation)
}

/// `[settings.chr0]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Chr0Settings {
    /// Swap Y and Z for a Y-up runtime
    pub xyz_to_xzy: bool,
    /// Rotation curves are in radians
    pub convert_to_degrees: bool,
    /// Multiplier for translation data
    pub scale_translation: f32,
    pub scale: TransformSettings,
    pub rotation: TransformSettings,
    pub translation: TransformSettings,
}

impl Default for Chr0Settings {
    fn default() -> Self {
        Self {
            xyz_to_xzy: true,
            convert_to_degrees: true,
            scale_translation: 100.0,
            scale: TransformSettings::default(),
            rotation: TransformSettings::default(),
            translation: TransformSettings::default(),
        }
    }
}

impl Chr0Settings {
    pub fn transform(&self, kind: TransformKind) -> &TransformSettings {
        match kind {
            TransformKind::Scale => &self.scale,
            TransformKind::Rotation => &self.rotation,
            TransformKind::Translation => &self.translation,
        }
    }

    pub fn conversion(&self) -> ConversionOptions {
        ConversionOptions {
            xyz_to_xzy: self.xyz_to_xzy,
            convert_to_degrees: self.convert_to_degrees,
            translation_scale: self.scale_translation,
        }
    }
}

/// One transform group of a bone node
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    pub enabled: bool,
    pub format: CurveFormat,
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            format: CurveFormat::I4,
            x: false,
            y: false,
            z: false,
        }
    }
}

impl TransformSettings {
    pub fn axes(&self) -> [bool; 3] {
        [self.x, self.y, self.z]
    }
}

/// Where a colour channel's bytes come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ColourSource {
    /// Next curve in the manifest
    #[default]
    Fcurve,
    /// Same value on every frame, in [0, 1]
    Constant { value: f32 },
}

/// `[settings.clr0]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Clr0Settings {
    /// Mask colour, RGBA in [0, 1]
    pub mask: [f32; 4],
    pub red: ColourSource,
    pub green: ColourSource,
    pub blue: ColourSource,
    pub alpha: ColourSource,
}

impl Clr0Settings {
    /// Sources in RGBA order
    pub fn sources(&self) -> [ColourSource; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

/// `[settings.srt0]` section
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Srt0Settings {
    pub scale_x: bool,
    pub scale_y: bool,
    pub rotation: bool,
    pub translation_x: bool,
    pub translation_y: bool,
}

impl Srt0Settings {
    /// Inclusion flags in node channel order
    pub fn channels(&self) -> [bool; 5] {
        [
            self.scale_x,
            self.scale_y,
            self.rotation,
            self.translation_x,
            self.translation_y,
        ]
    }
}
