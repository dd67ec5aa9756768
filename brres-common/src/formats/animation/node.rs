//! Node assembly
//!
//! Bone and UV transform nodes are a type code, one 4-byte slot per written
//! channel, then the payload blocks of the animated channels in slot order.
//! A slot holds either the channel's constant value or the offset of its
//! payload. Layout is planned up front: payload sizes are known from the
//! tracks, so every offset is fixed before the first byte is written and
//! the node is then produced in one forward pass.

use super::{
    AxisTrack, Clr0Header, CurveFormat, TransformTrack, UvTransformTracks, chr0_type_code,
    encode_axis, srt0_type_code,
};
use crate::packing::{EncodeError, to_bits};

/// Bone node prefix: total length + type code
pub const CHR0_PREFIX_SIZE: usize = 8;
/// UV node prefix: type code
pub const SRT0_PREFIX_SIZE: usize = 4;
pub const SLOT_SIZE: usize = 4;

// ============================================================================
// Slot Planning
// ============================================================================

/// Where a slot's payload offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetBase {
    /// Start of the node
    Node,
    /// Position of the slot itself
    Slot,
}

#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    axis: &'a AxisTrack,
    format: CurveFormat,
}

/// Planned slot table: every payload offset resolved before writing
#[derive(Debug)]
struct SlotPlan<'a> {
    slots: Vec<Slot<'a>>,
    /// Offset of the first slot from node start
    slots_start: usize,
    /// Node offset of each slot's payload (unused for fixed slots)
    payload_offsets: Vec<usize>,
    /// Node length once every payload is written
    end: usize,
}

impl<'a> SlotPlan<'a> {
    fn new(slots: Vec<Slot<'a>>, slots_start: usize) -> Self {
        let mut cursor = slots_start + slots.len() * SLOT_SIZE;
        let payload_offsets = slots
            .iter()
            .map(|slot| {
                let offset = cursor;
                cursor += slot.axis.payload_size(slot.format);
                offset
            })
            .collect();

        Self {
            slots,
            slots_start,
            payload_offsets,
            end: cursor,
        }
    }

    /// Write slots then payloads; `node` must end exactly at `slots_start`
    fn write(&self, node: &mut Vec<u8>, base: OffsetBase) -> Result<(), EncodeError> {
        debug_assert_eq!(node.len(), self.slots_start);

        for (i, slot) in self.slots.iter().enumerate() {
            match slot.axis {
                AxisTrack::Fixed(value) => node.extend_from_slice(&value.to_be_bytes()),
                _ => {
                    let offset = match base {
                        OffsetBase::Node => self.payload_offsets[i],
                        OffsetBase::Slot => {
                            self.payload_offsets[i] - (self.slots_start + i * SLOT_SIZE)
                        }
                    };
                    let offset = to_bits(offset as i64, 32)?;
                    node.extend_from_slice(&offset.to_be_bytes());
                }
            }
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if !slot.axis.is_fixed() {
                debug_assert_eq!(node.len(), self.payload_offsets[i]);
                encode_axis(node, slot.axis, slot.format)?;
            }
        }

        debug_assert_eq!(node.len(), self.end);
        Ok(())
    }
}

// ============================================================================
// Bone Transform (CHR0) Node
// ============================================================================

/// Remove characters that cannot be stored in a node name
pub fn ascii_node_name(name: &str) -> String {
    name.chars().filter(char::is_ascii).collect()
}

/// Assemble a bone transform node
///
/// # Layout
/// ```text
/// 0x00: u32 length     - bytes up to and including the name length field
/// 0x04: u32 type code  - see chr0_type_code
/// 0x08: slots          - 4 bytes per written axis, S then R then T
///       payloads       - one block per animated axis, in slot order
///       u32 name length
///       name bytes     - ASCII, zero-padded to a multiple of 4
/// ```
/// Payload offsets in slots are measured from the start of the node.
pub fn write_chr0_node(tracks: [&TransformTrack; 3], name: &str) -> Result<Vec<u8>, EncodeError> {
    let code = chr0_type_code(tracks)?;

    let slots = tracks
        .into_iter()
        .flat_map(|track| {
            track.written_axes().iter().map(move |axis| Slot {
                axis,
                format: track.format(),
            })
        })
        .collect();
    let plan = SlotPlan::new(slots, CHR0_PREFIX_SIZE);

    let name = ascii_node_name(name);
    let length = to_bits((plan.end + 4) as i64, 32)?;
    let padding = (4 - (plan.end + 4 + name.len()) % 4) % 4;

    let mut node = Vec::with_capacity(plan.end + 4 + name.len() + padding);
    node.extend_from_slice(&length.to_be_bytes());
    node.extend_from_slice(&code.to_be_bytes());
    plan.write(&mut node, OffsetBase::Node)?;

    let name_length = to_bits(name.len() as i64, 32)?;
    node.extend_from_slice(&name_length.to_be_bytes());
    node.extend_from_slice(name.as_bytes());
    node.resize(node.len() + padding, 0);

    Ok(node)
}

// ============================================================================
// UV Transform (SRT0) Node
// ============================================================================

/// Assemble a UV transform node
///
/// Animated channels are always stored as I12 blocks. Payload offsets in
/// slots are measured from the slot that holds them.
pub fn write_srt0_node(tracks: &UvTransformTracks) -> Result<Vec<u8>, EncodeError> {
    let code = srt0_type_code(tracks)?;

    let slots = tracks
        .written_channels()
        .into_iter()
        .map(|axis| Slot {
            axis,
            format: CurveFormat::I12,
        })
        .collect();
    let plan = SlotPlan::new(slots, SRT0_PREFIX_SIZE);

    let mut node = Vec::with_capacity(plan.end);
    node.extend_from_slice(&code.to_be_bytes());
    plan.write(&mut node, OffsetBase::Slot)?;

    Ok(node)
}

// ============================================================================
// Colour (CLR0) Node
// ============================================================================

/// One channel of a colour node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColourChannel {
    /// Same byte on every frame
    Constant(u8),
    /// One byte per frame
    Frames(Vec<u8>),
}

/// Assemble a colour node: header then one RGBA entry per frame
///
/// Channels are red, green, blue, alpha and each lands at its fixed byte
/// within every 4-byte entry.
pub fn write_clr0_node(
    mask: [f32; 4],
    channels: &[ColourChannel; 4],
    frame_count: u32,
) -> Result<Vec<u8>, EncodeError> {
    let header = Clr0Header::new(mask, frame_count);
    let mut node = vec![0u8; header.node_size()];
    node[..Clr0Header::SIZE].copy_from_slice(&header.to_bytes());

    for (rgba, channel) in channels.iter().enumerate() {
        let entries = node[Clr0Header::SIZE..].chunks_exact_mut(4);
        match channel {
            ColourChannel::Constant(byte) => {
                for entry in entries {
                    entry[rgba] = *byte;
                }
            }
            ColourChannel::Frames(bytes) => {
                if bytes.len() != frame_count as usize {
                    return Err(EncodeError::ChannelLength {
                        expected: frame_count as usize,
                        actual: bytes.len(),
                    });
                }
                for (entry, byte) in entries.zip(bytes) {
                    entry[rgba] = *byte;
                }
            }
        }
    }

    Ok(node)
}
