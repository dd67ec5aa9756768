//! Tests for animation node formats

use super::*;
use crate::packing::EncodeError;

fn keys(samples: &[(i32, f32, f32)]) -> Vec<Keyframe> {
    samples
        .iter()
        .map(|&(frame, value, tangent)| Keyframe::new(frame, value, tangent))
        .collect()
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_bits(read_u32(bytes, at))
}

// ========================================================================
// Constant Collapse
// ========================================================================

#[test]
fn test_collapse_equal_keyframes() {
    let track = AxisTrack::collapse(
        AxisSamples::Keyframes(keys(&[(0, 2.0, 0.0), (5, 2.0, 1.0), (9, 2.0, -1.0)])),
        0.0,
    );
    assert_eq!(track, AxisTrack::Fixed(2.0));
}

#[test]
fn test_collapse_equal_values_any_length() {
    for len in 1..20 {
        let track = AxisTrack::collapse(AxisSamples::Values(vec![3.5; len]), 0.0);
        assert_eq!(track, AxisTrack::Fixed(3.5), "length {}", len);
    }
}

#[test]
fn test_collapse_empty_uses_identity() {
    assert_eq!(
        AxisTrack::collapse(AxisSamples::Empty, 1.0),
        AxisTrack::Fixed(1.0)
    );
    assert_eq!(
        AxisTrack::collapse(AxisSamples::Keyframes(Vec::new()), 0.0),
        AxisTrack::Fixed(0.0)
    );
}

#[test]
fn test_collapse_single_keyframe_is_constant() {
    let track = AxisTrack::collapse(AxisSamples::Keyframes(keys(&[(17, 4.0, 2.0)])), 0.0);
    assert_eq!(track, AxisTrack::Fixed(4.0));
}

#[test]
fn test_collapse_keeps_varying_data() {
    let data = keys(&[(0, 0.0, 0.0), (10, 1.0, 0.0)]);
    let track = AxisTrack::collapse(AxisSamples::Keyframes(data.clone()), 0.0);
    assert_eq!(track, AxisTrack::Keyframes(data));
    assert!(!track.is_fixed());
}

// ========================================================================
// Format Escalation
// ========================================================================

fn extrema(max_frame: i32, min_tangent: f32, max_tangent: f32) -> TrackExtrema {
    TrackExtrema {
        sample_count: 2,
        max_frame,
        min_tangent,
        max_tangent,
    }
}

#[test]
fn test_escalation_frame_bounds() {
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(255, 0.0, 0.0)), CurveFormat::I4);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(256, 0.0, 0.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(2047, 0.0, 0.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(2048, 0.0, 0.0)), CurveFormat::I12);
}

#[test]
fn test_escalation_tangent_bounds() {
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, 0.0, 63.9)), CurveFormat::I4);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, 0.0, 64.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, -64.0, 0.0)), CurveFormat::I4);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, -64.5, 0.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, 0.0, 128.0)), CurveFormat::I12);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, -128.0, 0.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I4, &extrema(10, -128.5, 0.0)), CurveFormat::I12);
}

#[test]
fn test_escalation_sample_count() {
    let many = TrackExtrema {
        sample_count: 65536,
        ..TrackExtrema::default()
    };
    assert_eq!(escalate_format(CurveFormat::I4, &many), CurveFormat::I12);
}

#[test]
fn test_escalation_never_downgrades() {
    // Small data keeps the requested wider format
    assert_eq!(escalate_format(CurveFormat::I6, &extrema(10, 0.0, 1.0)), CurveFormat::I6);
    assert_eq!(escalate_format(CurveFormat::I12, &extrema(10, 0.0, 1.0)), CurveFormat::I12);
    // I6 only escalates through the I12 rule
    assert_eq!(escalate_format(CurveFormat::I6, &extrema(300, 0.0, 100.0)), CurveFormat::I6);
    // Linear formats are never touched
    assert_eq!(escalate_format(CurveFormat::L1, &extrema(5000, 0.0, 0.0)), CurveFormat::L1);
    assert_eq!(escalate_format(CurveFormat::L4, &extrema(5000, 0.0, 0.0)), CurveFormat::L4);
}

#[test]
fn test_escalation_is_monotonic_in_frame_range() {
    let mut previous = CurveFormat::I4;
    for max_frame in [10, 255, 256, 511, 1024, 2047, 2048, 4096] {
        let format = escalate_format(CurveFormat::I4, &extrema(max_frame, 0.0, 0.0));
        assert!(format >= previous, "{} after {}", format, previous);
        previous = format;
    }
    assert_eq!(previous, CurveFormat::I12);
}

#[test]
fn test_extrema_ignore_fixed_axes() {
    let axes = [
        AxisTrack::Fixed(1000.0),
        AxisTrack::Keyframes(keys(&[(0, 0.0, -3.0), (40, 1.0, 2.0)])),
        AxisTrack::Keyframes(keys(&[(0, 0.0, 0.5), (12, 1.0, 0.5), (20, 0.0, 0.5)])),
    ];
    let measured = TrackExtrema::measure(axes.iter());
    assert_eq!(measured.sample_count, 3);
    assert_eq!(measured.max_frame, 40);
    assert_eq!(measured.min_tangent, -3.0);
    assert_eq!(measured.max_tangent, 2.0);
}

// ========================================================================
// Track Builder
// ========================================================================

#[test]
fn test_identity_scale_track_has_no_data() {
    let track = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(1.0),
        ],
        CurveFormat::I4,
        &ConversionOptions::IDENTITY,
    );
    assert!(!track.has_data());
    assert!(track.is_isotropic());
    assert_eq!(track.format(), CurveFormat::None);
    assert!(track.written_axes().is_empty());
}

#[test]
fn test_constant_non_identity_track_keeps_one_slot() {
    let track = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Constant(2.0),
            AxisSamples::Constant(2.0),
            AxisSamples::Constant(2.0),
        ],
        CurveFormat::I4,
        &ConversionOptions::IDENTITY,
    );
    assert!(track.has_data());
    assert!(track.is_isotropic());
    assert_eq!(track.format(), CurveFormat::None);
    assert_eq!(track.written_axes(), &[AxisTrack::Fixed(2.0)]);
}

#[test]
fn test_empty_axes_default_to_identity() {
    let track = TransformTrack::build(
        TransformKind::Scale,
        [AxisSamples::Constant(3.0), AxisSamples::Empty, AxisSamples::Empty],
        CurveFormat::I4,
        &ConversionOptions::IDENTITY,
    );
    assert_eq!(track.axis(1), &AxisTrack::Fixed(1.0));
    assert_eq!(track.axis(2), &AxisTrack::Fixed(1.0));
    assert!(!track.is_isotropic());
    assert_eq!(track.written_axes().len(), 3);
}

#[test]
fn test_absent_track_flags() {
    let track = TransformTrack::absent(TransformKind::Translation);
    assert!(!track.has_data());
    assert!(track.is_isotropic());
    assert!((0..3).all(|axis| track.is_fixed(axis)));
    assert_eq!(track.format(), CurveFormat::None);

    let all_empty = TransformTrack::build(
        TransformKind::Translation,
        Default::default(),
        CurveFormat::I6,
        &ConversionOptions::IDENTITY,
    );
    assert_eq!(all_empty, track);
}

#[test]
fn test_axis_swap_negates_new_z() {
    let options = ConversionOptions {
        xyz_to_xzy: true,
        convert_to_degrees: false,
        translation_scale: 10.0,
    };
    let track = TransformTrack::build(
        TransformKind::Translation,
        [
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(2.0),
            AxisSamples::Keyframes(keys(&[(0, 0.0, 0.5), (4, 2.0, 0.5)])),
        ],
        CurveFormat::I4,
        &options,
    );
    assert_eq!(track.axis(0), &AxisTrack::Fixed(10.0));
    assert_eq!(
        track.axis(1),
        &AxisTrack::Keyframes(keys(&[(0, 0.0, 5.0), (4, 20.0, 5.0)]))
    );
    assert_eq!(track.axis(2), &AxisTrack::Fixed(-20.0));
}

#[test]
fn test_scale_swap_is_not_negated() {
    let options = ConversionOptions {
        xyz_to_xzy: true,
        ..ConversionOptions::IDENTITY
    };
    let track = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(2.0),
            AxisSamples::Constant(3.0),
        ],
        CurveFormat::I4,
        &options,
    );
    assert_eq!(track.axis(1), &AxisTrack::Fixed(3.0));
    assert_eq!(track.axis(2), &AxisTrack::Fixed(2.0));
}

#[test]
fn test_rotation_converted_to_degrees() {
    let options = ConversionOptions {
        convert_to_degrees: true,
        ..ConversionOptions::IDENTITY
    };
    let track = TransformTrack::build(
        TransformKind::Rotation,
        [
            AxisSamples::Keyframes(keys(&[(0, 0.0, 0.1), (10, std::f32::consts::PI, 0.1)])),
            AxisSamples::Empty,
            AxisSamples::Empty,
        ],
        CurveFormat::I4,
        &options,
    );
    let AxisTrack::Keyframes(x) = track.axis(0) else {
        panic!("rotation X should stay keyframed");
    };
    assert!((x[1].value - 180.0).abs() < 1e-3);
    assert!((x[0].tangent - 0.1f32.to_degrees()).abs() < 1e-4);
    assert_eq!(x[1].frame, 10);
}

#[test]
fn test_track_format_escalates_on_steep_tangent() {
    let track = TransformTrack::build(
        TransformKind::Translation,
        [
            AxisSamples::Keyframes(keys(&[(0, 0.0, 0.0), (10, 1.0, 0.2)])),
            AxisSamples::Empty,
            AxisSamples::Empty,
        ],
        CurveFormat::I4,
        &ConversionOptions {
            translation_scale: 400.0,
            ..ConversionOptions::IDENTITY
        },
    );
    // 0.2 * 400 = 80 units/frame: past the 12-bit I4 tangent field
    assert_eq!(track.format(), CurveFormat::I6);
}

#[test]
fn test_requested_none_starts_at_i4() {
    let track = TransformTrack::build(
        TransformKind::Translation,
        [
            AxisSamples::Keyframes(keys(&[(0, 0.0, 0.0), (10, 1.0, 0.0)])),
            AxisSamples::Empty,
            AxisSamples::Empty,
        ],
        CurveFormat::None,
        &ConversionOptions::IDENTITY,
    );
    assert_eq!(track.format(), CurveFormat::I4);
}

// ========================================================================
// Quantization
// ========================================================================

#[test]
fn test_quantize_range_normalization() {
    let range = QuantizeRange::from_values([2.0, -2.0, 1.0], 12);
    assert_eq!(range.base, -2.0);
    assert!((range.step - 4.0 / 4095.0).abs() < 1e-12);
    assert_eq!(range.quantize(-2.0, 12), Ok(0));
    assert!(range.quantize(2.0, 12).unwrap() >= 4094);
}

#[test]
fn test_quantize_flat_range_is_zero() {
    let range = QuantizeRange::from_values([5.0, 5.0], 16);
    assert_eq!(range.step, 0.0);
    assert_eq!(range.quantize(5.0, 16), Ok(0));
}

#[test]
fn test_quantize_clamps_top_of_range() {
    let range = QuantizeRange {
        step: 1.0,
        base: 0.0,
    };
    assert_eq!(range.quantize(4096.0, 12), Ok(4095));
    assert_eq!(range.quantize(65536.0, 16), Ok(65535));
    assert_eq!(
        range.quantize(4097.0, 12),
        Err(EncodeError::Overflow {
            value: 4097,
            bits: 12
        })
    );
}

#[test]
fn test_quantization_error_bound() {
    let values: Vec<f32> = (0..200)
        .map(|i| ((i as f32) * 0.37).sin() * 12.5 + (i as f32) * 0.01)
        .collect();
    for bits in [12, 16] {
        let range = QuantizeRange::from_values(values.iter().copied(), bits);
        assert!(range.step > 0.0);
        for &value in &values {
            let q = range.quantize(value, bits).unwrap();
            let decoded = range.base + range.step * q as f64;
            let error = value as f64 - decoded;
            // Values round down, so the decoded value never overshoots
            assert!(error > -1e-9, "bits={} value={} error={}", bits, value, error);
            assert!(error < range.step + 1e-9, "bits={} value={} error={}", bits, value, error);
        }
    }
}

// ========================================================================
// Sample Packing
// ========================================================================

#[test]
fn test_i4_sample_layout() {
    let range = QuantizeRange {
        step: 1.0,
        base: 0.0,
    };
    let packed = encode_i4_sample(&Keyframe::new(3, 5.0, 2.5), &range).unwrap();
    assert_eq!(packed, (3 << 24) | (5 << 12) | 80);

    let negative = encode_i4_sample(&Keyframe::new(0, 0.0, -0.5), &range).unwrap();
    assert_eq!(negative & 0xFFF, 0xFF0);
}

#[test]
fn test_i4_tangent_truncates_toward_zero() {
    let range = QuantizeRange {
        step: 0.0,
        base: 0.0,
    };
    let packed = encode_i4_sample(&Keyframe::new(0, 0.0, -0.03), &range).unwrap();
    assert_eq!(packed & 0xFFF, 0);
}

#[test]
fn test_i4_frame_overflow_is_error() {
    let range = QuantizeRange {
        step: 1.0,
        base: 0.0,
    };
    assert_eq!(
        encode_i4_sample(&Keyframe::new(256, 0.0, 0.0), &range),
        Err(EncodeError::Overflow {
            value: 256,
            bits: 8
        })
    );
    assert!(matches!(
        encode_i4_sample(&Keyframe::new(0, 0.0, 64.0), &range),
        Err(EncodeError::SignedOverflow { value: 2048, bits: 12 })
    ));
}

#[test]
fn test_i6_sample_layout() {
    let range = QuantizeRange {
        step: 1.0,
        base: 0.0,
    };
    let packed = encode_i6_sample(&Keyframe::new(10, 100.0, -1.5), &range).unwrap();
    assert_eq!(packed, [0x01, 0x40, 0x00, 0x64, 0xFE, 0x80]);
}

#[test]
fn test_axis_payload_sizes_match_encoding() {
    let animated = AxisTrack::Keyframes(keys(&[(0, 0.0, 0.0), (8, 1.0, 0.5), (16, -1.0, 0.0)]));
    for format in [CurveFormat::I4, CurveFormat::I6, CurveFormat::I12] {
        let mut out = Vec::new();
        encode_axis(&mut out, &animated, format).unwrap();
        assert_eq!(out.len(), animated.payload_size(format), "{}", format);
        assert_eq!(read_u16(&out, 0), 3);
        assert_eq!(read_u16(&out, 2), 0);
        assert_eq!(read_f32(&out, 4), FRAME_SCALE);
    }

    let per_frame = AxisTrack::Values(vec![0.0, 1.0, 0.5]);
    for format in [CurveFormat::L1, CurveFormat::L4] {
        let mut out = Vec::new();
        encode_axis(&mut out, &per_frame, format).unwrap();
        assert_eq!(out.len(), per_frame.payload_size(format), "{}", format);
    }
}

#[test]
fn test_l1_payload_normalizes_values() {
    let mut out = Vec::new();
    encode_axis(&mut out, &AxisTrack::Values(vec![0.0, 1.0, 0.5]), CurveFormat::L1).unwrap();
    assert_eq!(read_f32(&out, 0), (1.0f64 / 65535.0) as f32);
    assert_eq!(read_f32(&out, 4), 0.0);
    assert_eq!(read_f32(&out, 8), 0.0);
    assert!((read_f32(&out, 12) - 65535.0).abs() < 1e-2);
    assert!((read_f32(&out, 16) - 32767.5).abs() < 1e-2);
}

#[test]
fn test_format_mismatch_is_error() {
    let mut out = Vec::new();
    let per_frame = AxisTrack::Values(vec![0.0, 1.0]);
    assert_eq!(
        encode_axis(&mut out, &per_frame, CurveFormat::I4),
        Err(EncodeError::FormatMismatch { format: "i4" })
    );
    assert!(out.is_empty());
}

// ========================================================================
// Bone Transform Node
// ========================================================================

fn rotation_y_track() -> TransformTrack {
    TransformTrack::build(
        TransformKind::Rotation,
        [
            AxisSamples::Empty,
            AxisSamples::Empty,
            AxisSamples::Keyframes(keys(&[(0, 0.0, 0.0), (30, 1.0, 0.0), (60, 0.0, 0.0)])),
        ],
        CurveFormat::I4,
        &ConversionOptions {
            xyz_to_xzy: true,
            convert_to_degrees: true,
            translation_scale: 1.0,
        },
    )
}

#[test]
fn test_chr0_type_code_bits() {
    let scale = TransformTrack::absent(TransformKind::Scale);
    let rotation = rotation_y_track();
    let translation = TransformTrack::absent(TransformKind::Translation);

    let code = chr0_type_code([&scale, &rotation, &translation]).unwrap();
    let expected = (1 << 4)
        | (1 << 6)
        | (1 << 13)
        | (1 << 14)
        | (1 << 15)
        | (1 << 16)
        | (1 << 18)
        | (1 << 19)
        | (1 << 20)
        | (1 << 21)
        | (1 << 23)
        | (1 << 27);
    assert_eq!(code, expected);
    assert_eq!(CHR0_FORMAT[1].extract(code), CurveFormat::I4.code());
    assert_eq!(CHR0_HAS[1].extract(code), 1);
    assert_eq!(CHR0_FIXED[1][1].extract(code), 0);
}

#[test]
fn test_chr0_linear_format_only_fits_rotation() {
    let per_frame = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Values(vec![1.0, 2.0]),
            AxisSamples::Empty,
            AxisSamples::Empty,
        ],
        CurveFormat::L4,
        &ConversionOptions::IDENTITY,
    );
    let absent = TransformTrack::absent(TransformKind::Rotation);
    let result = chr0_type_code([&per_frame, &absent, &absent]);
    assert!(matches!(result, Err(EncodeError::FieldOverflow { .. })));
}

#[test]
fn test_chr0_node_layout() {
    let scale = TransformTrack::absent(TransformKind::Scale);
    let rotation = rotation_y_track();
    let translation = TransformTrack::absent(TransformKind::Translation);

    let node = write_chr0_node([&scale, &rotation, &translation], "bone").unwrap();

    // prefix (8) + 3 slots (12) + I4 payload (16 + 3 * 4) + name length (4) + "bone"
    assert_eq!(node.len(), 56);
    assert_eq!(read_u32(&node, 0), 52);
    assert_eq!(read_f32(&node, 8), 0.0);
    assert_eq!(read_u32(&node, 12), 20);
    assert_eq!(read_f32(&node, 16), 0.0);

    // Y payload
    assert_eq!(read_u16(&node, 20), 3);
    let step = read_f32(&node, 28);
    let base = read_f32(&node, 32);
    assert_eq!(base, 0.0);
    assert!((step - 1.0f32.to_degrees() / 4095.0).abs() < 1e-6);

    let samples: Vec<u32> = (0..3).map(|i| read_u32(&node, 36 + i * 4)).collect();
    assert_eq!(samples[0] >> 24, 0);
    assert_eq!((samples[0] >> 12) & 0xFFF, 0);
    assert_eq!(samples[1] >> 24, 30);
    assert!((samples[1] >> 12) & 0xFFF >= 4094);
    assert_eq!(samples[2] >> 24, 60);
    assert_eq!((samples[2] >> 12) & 0xFFF, 0);

    // Name trailer
    assert_eq!(read_u32(&node, 48), 4);
    assert_eq!(&node[52..56], b"bone");
}

#[test]
fn test_chr0_identity_scale_writes_no_payload() {
    let scale = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(1.0),
            AxisSamples::Constant(1.0),
        ],
        CurveFormat::I4,
        &ConversionOptions::IDENTITY,
    );
    let absent_r = TransformTrack::absent(TransformKind::Rotation);
    let absent_t = TransformTrack::absent(TransformKind::Translation);

    let node = write_chr0_node([&scale, &absent_r, &absent_t], "").unwrap();
    assert_eq!(node.len(), 12);
    assert_eq!(read_u32(&node, 0), 12);

    let code = read_u32(&node, 4);
    assert_eq!(CHR0_HAS[0].extract(code), 0);
    assert_eq!(CHR0_FORMAT[0].extract(code), 0);
    assert_eq!(read_u32(&node, 8), 0);
}

#[test]
fn test_chr0_name_padding_and_ascii() {
    let absent = [
        TransformTrack::absent(TransformKind::Scale),
        TransformTrack::absent(TransformKind::Rotation),
        TransformTrack::absent(TransformKind::Translation),
    ];
    let node = write_chr0_node([&absent[0], &absent[1], &absent[2]], "Bön€e").unwrap();
    // "Bne" is 3 bytes, padded with one zero
    assert_eq!(read_u32(&node, 8), 3);
    assert_eq!(&node[12..15], b"Bne");
    assert_eq!(node[15], 0);
    assert_eq!(node.len(), 16);
    assert_eq!(read_u32(&node, 0), 12);
}

#[test]
fn test_chr0_slot_offsets_point_at_payloads() {
    let scale = TransformTrack::build(
        TransformKind::Scale,
        [
            AxisSamples::Keyframes(keys(&[(0, 1.0, 0.0), (10, 2.0, 0.0)])),
            AxisSamples::Keyframes(keys(&[(0, 1.0, 0.0), (5, 3.0, 0.0), (10, 1.0, 0.0)])),
            AxisSamples::Constant(1.5),
        ],
        CurveFormat::I4,
        &ConversionOptions::IDENTITY,
    );
    let rotation = TransformTrack::absent(TransformKind::Rotation);
    let translation = TransformTrack::build(
        TransformKind::Translation,
        [
            AxisSamples::Keyframes(keys(&[(0, 0.0, 1.0), (2, 2.0, 1.0), (4, 0.0, -1.0), (6, 1.0, 0.0)])),
            AxisSamples::Empty,
            AxisSamples::Empty,
        ],
        CurveFormat::I12,
        &ConversionOptions::IDENTITY,
    );

    let node = write_chr0_node([&scale, &rotation, &translation], "offsets").unwrap();

    let slots: Vec<u32> = (0..6).map(|i| read_u32(&node, CHR0_PREFIX_SIZE + i * SLOT_SIZE)).collect();
    let expected_counts = [Some(2), Some(3), None, Some(4), None, None];

    let mut expected_offset = CHR0_PREFIX_SIZE + 6 * SLOT_SIZE;
    for (slot, count) in slots.iter().zip(expected_counts) {
        match count {
            Some(count) => {
                let offset = *slot as usize;
                assert_eq!(offset, expected_offset);
                assert_eq!(read_u16(&node, offset), count);
                assert_eq!(read_u16(&node, offset + 2), 0);
                assert_eq!(read_f32(&node, offset + 4), FRAME_SCALE);
                let format = if count == 4 { CurveFormat::I12 } else { CurveFormat::I4 };
                expected_offset += format.header_size() + format.sample_size() * count as usize;
            }
            None => assert!(f32::from_bits(*slot) == 1.5 || f32::from_bits(*slot) == 0.0),
        }
    }
    assert_eq!(read_u32(&node, 0) as usize, expected_offset + 4);
}

// ========================================================================
// UV Transform Node
// ========================================================================

#[test]
fn test_uv_tracks_defaults_have_no_data() {
    let tracks = UvTransformTracks::build(Default::default());
    assert!(!tracks.scale_has());
    assert!(!tracks.rotation_has());
    assert!(!tracks.translation_has());
    assert!(tracks.written_channels().is_empty());

    let node = write_srt0_node(&tracks).unwrap();
    assert_eq!(node.len(), 4);
    assert_eq!(read_u32(&node, 0), 0b11_1111_1111);
}

#[test]
fn test_srt0_node_layout() {
    let tracks = UvTransformTracks::build([
        AxisSamples::Keyframes(keys(&[(0, 1.0, 0.0), (10, 2.0, 0.1)])),
        AxisSamples::Empty,
        AxisSamples::Constant(std::f32::consts::FRAC_PI_2),
        AxisSamples::Empty,
        AxisSamples::Empty,
    ]);
    assert!(tracks.scale_has());
    assert!(!tracks.scale_isotropic());
    assert!(tracks.rotation_has());
    assert!(!tracks.translation_has());

    let node = write_srt0_node(&tracks).unwrap();
    let code = read_u32(&node, 0);
    assert_eq!(
        code,
        1 | (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8) | (1 << 9)
    );

    // Slot offsets are relative to the slot
    assert_eq!(read_u32(&node, 4), 12);
    assert_eq!(read_f32(&node, 8), 1.0);
    assert!((read_f32(&node, 12) + 90.0).abs() < 1e-3);

    let payload = 4 + read_u32(&node, 4) as usize;
    assert_eq!(read_u16(&node, payload), 2);
    assert_eq!(read_f32(&node, payload + 4), 1.0);
    assert_eq!(read_f32(&node, payload + 8 + 12), 10.0);
    assert_eq!(read_f32(&node, payload + 8 + 16), 2.0);
    assert_eq!(read_f32(&node, payload + 8 + 20), 0.1);
    assert_eq!(node.len(), payload + 8 + 24);
}

#[test]
fn test_srt0_translation_is_negated() {
    let tracks = UvTransformTracks::build([
        AxisSamples::Empty,
        AxisSamples::Empty,
        AxisSamples::Empty,
        AxisSamples::Keyframes(keys(&[(0, 0.0, 0.5), (4, 2.0, 0.5)])),
        AxisSamples::Constant(0.25),
    ]);
    assert!(tracks.translation_has());
    assert_eq!(tracks.translation_y, AxisTrack::Fixed(-0.25));
    assert_eq!(
        tracks.translation_x,
        AxisTrack::Keyframes(keys(&[(0, -0.0, -0.5), (4, -2.0, -0.5)]))
    );

    let node = write_srt0_node(&tracks).unwrap();
    // Two slots: translation X (offset) then translation Y (constant)
    assert_eq!(read_u32(&node, 4), 8);
    assert_eq!(read_f32(&node, 8), -0.25);
    assert_eq!(node.len(), 12 + 8 + 2 * 12);
}

// ========================================================================
// Colour Node
// ========================================================================

#[test]
fn test_clr0_header_roundtrip() {
    let header = Clr0Header::new([1.0, 0.0, 0.0, 0.5], 3);
    assert_eq!(header.mask, [255, 0, 0, 128]);
    assert_eq!(header.flags, 8);

    let parsed = Clr0Header::from_bytes(&header.to_bytes()).unwrap();
    assert_eq!(parsed, header);
    assert_eq!(parsed.node_size(), 24);
    assert!(Clr0Header::from_bytes(&[0u8; 4]).is_none());
}

#[test]
fn test_clr0_node_interleaves_channels() {
    let channels = [
        ColourChannel::Frames(vec![0, 64, 128]),
        ColourChannel::Constant(7),
        ColourChannel::Constant(0),
        ColourChannel::Frames(vec![255, 255, 254]),
    ];
    let node = write_clr0_node([1.0, 0.0, 0.0, 0.5], &channels, 3).unwrap();
    assert_eq!(node.len(), 24);
    assert_eq!(&node[..4], &[255, 0, 0, 128]);
    assert_eq!(read_u32(&node, 4), 8);
    assert_eq!(read_u32(&node, 8), 3);
    assert_eq!(&node[12..], &[0, 7, 0, 255, 64, 7, 0, 255, 128, 7, 0, 254]);
}

#[test]
fn test_clr0_channel_length_mismatch() {
    let channels = [
        ColourChannel::Frames(vec![0, 64]),
        ColourChannel::Constant(0),
        ColourChannel::Constant(0),
        ColourChannel::Constant(0),
    ];
    assert_eq!(
        write_clr0_node([0.0; 4], &channels, 3),
        Err(EncodeError::ChannelLength {
            expected: 3,
            actual: 2
        })
    );
}
