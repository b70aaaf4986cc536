use carp_frame::{
    carp_log, carp_write, ByteOrder, CaptureSink, Counter, EncoderConfig, FrameError, Logger,
    HEADER_SIZE,
};

#[test]
fn reference_frame_little_endian() {
    let mut logger = Logger::new(CaptureSink::new());
    carp_write!(logger, 1, 6, 10, "foo", 47.1f32).unwrap();

    let mut expected = vec![
        0x00, 0x00, 0x00, 0x00, // timestamp
        0x01, 0x00, 0x00, 0x00, // domain
        0x06, 0x00, 0x00, 0x00, // message
        0x03, // arg count
        0x49, 0x0A, 0x00, 0x00, 0x00, // I 10
        0x53, 0x03, 0x00, 0x66, 0x6F, 0x6F, // S "foo"
        0x46, // F
    ];
    expected.extend_from_slice(&47.1f32.to_le_bytes());

    let frames = logger.get_ref().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].as_ref(), expected.as_slice());
}

#[test]
fn reference_frame_big_endian() {
    let cfg = EncoderConfig {
        byte_order: ByteOrder::Big,
        ..EncoderConfig::default()
    };
    let mut logger = Logger::with_config(CaptureSink::new(), cfg);
    carp_write!(logger, 1, 6, 10, "foo").unwrap();

    let frame = logger.get_ref().last_frame().unwrap();
    assert_eq!(
        frame.as_ref(),
        &[
            0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 6, 2, b'I', 0, 0, 0, 10, b'S', 0, 3, b'f', b'o', b'o'
        ]
    );
}

#[test]
fn repeated_frames_are_identical_with_constant_clock() {
    let mut logger = Logger::new(CaptureSink::new()).with_timestamp_provider(|| 1234);
    for _ in 0..3 {
        carp_write!(logger, 7, 9, -3i8, 300i16, 70_000u32, 2.5f64, "same").unwrap();
    }

    let frames = logger.get_ref().frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], frames[1]);
    assert_eq!(frames[1], frames[2]);
    assert_eq!(&frames[0][0..4], &1234u32.to_le_bytes());
}

#[test]
fn counter_clock_distinguishes_frames() {
    let mut logger = Logger::new(CaptureSink::new()).with_timestamp_provider(Counter::new());
    carp_write!(logger, 1, 1).unwrap();
    carp_write!(logger, 1, 1).unwrap();

    let frames = logger.get_ref().frames();
    assert_ne!(frames[0], frames[1]);
    assert_eq!(&frames[0][4..], &frames[1][4..]);
}

#[test]
fn every_supported_type_in_one_frame() {
    let owned = String::from("owned");
    let mut logger = Logger::new(CaptureSink::new());
    carp_write!(logger, 2, 3, -1i8, -2i16, -3i32, 4u8, 5u16, 6u32, 7.0f32, 8.0f64, "lit", &owned)
        .unwrap();

    let frame = logger.get_ref().last_frame().unwrap();
    assert_eq!(frame[12], 10);

    let tags: Vec<u8> = walk_tags(&frame[HEADER_SIZE..]);
    assert_eq!(tags, b"biIBuUFDSS");
}

#[test]
fn legacy_u8_tag_reproduces_old_streams() {
    let cfg = EncoderConfig {
        legacy_u8_tag: true,
        ..EncoderConfig::default()
    };
    let mut logger = Logger::with_config(CaptureSink::new(), cfg);
    carp_write!(logger, 0, 0, 1u8, 1u16).unwrap();

    let frame = logger.get_ref().last_frame().unwrap();
    assert_eq!(&frame[HEADER_SIZE..], &[b'u', 1, b'u', 1, 0]);
}

#[test]
fn unresolved_log_carries_format_string_first() {
    let mut logger = Logger::new(CaptureSink::new());
    carp_log!(logger, "Meh!{}", 27).unwrap();

    let frame = logger.get_ref().last_frame().unwrap();
    assert_eq!(&frame[4..12], &[0; 8]);
    assert_eq!(frame[12], 2);
    assert_eq!(&frame[13..16], &[b'S', 6, 0]);
    assert_eq!(&frame[16..22], b"Meh!{}");
    assert_eq!(&frame[22..], &[b'I', 27, 0, 0, 0]);
}

#[test]
fn arity_limit_enforced() {
    let args = vec![carp_frame::Value::U8(0); 256];
    let mut logger = Logger::new(CaptureSink::new());
    let err = logger.write(1, 1, &args).unwrap_err();
    assert!(matches!(err, FrameError::TooManyArgs { .. }));

    logger.write(1, 1, &args[..255]).unwrap();
    assert_eq!(logger.get_ref().last_frame().unwrap()[12], 255);
}

/// Tags of a little-endian argument block, using payload widths for the non-legacy table.
fn walk_tags(mut body: &[u8]) -> Vec<u8> {
    let mut tags = Vec::new();
    while let Some((&tag, rest)) = body.split_first() {
        let width = match tag {
            b'b' | b'B' => 1,
            b'i' | b'u' => 2,
            b'I' | b'U' | b'F' => 4,
            b'D' => 8,
            b'S' => 2 + u16::from_le_bytes([rest[0], rest[1]]) as usize,
            other => panic!("unexpected tag {other}"),
        };
        tags.push(tag);
        body = &rest[width..];
    }
    tags
}
