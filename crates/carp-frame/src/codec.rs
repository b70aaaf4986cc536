use crate::value::Value;

/// Frame header: timestamp (4) + domain (4) + message (4) + arg count (1) = 13 bytes.
pub const HEADER_SIZE: usize = 13;

/// Largest argument count the one-byte header field can carry.
pub const MAX_ARGS: usize = u8::MAX as usize;

/// Largest text payload the u16 length prefix can describe.
pub const MAX_TEXT_LEN: usize = u16::MAX as usize;

/// Byte order used for header fields and numeric payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// Canonical little-endian output, identical on every host.
    #[default]
    Little,
    /// Big-endian (network order) output.
    Big,
    /// Host order. Streams are only decodable with knowledge of the encoder's platform.
    Native,
}

impl ByteOrder {
    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }

    pub fn u64_bytes(self, value: u64) -> [u8; 8] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }

    /// Human-readable name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ByteOrder::Little => "little",
            ByteOrder::Big => "big",
            ByteOrder::Native if cfg!(target_endian = "big") => "native (big)",
            ByteOrder::Native => "native (little)",
        }
    }
}

/// What to do with text arguments longer than [`MAX_TEXT_LEN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextOverflow {
    /// Cut the text at the byte limit and log a warning.
    #[default]
    Truncate,
    /// Refuse the whole frame with [`FrameError::TextTooLong`](crate::FrameError::TextTooLong).
    Reject,
}

/// Configuration for frame encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Byte order for header fields and numeric payloads. Default: little endian.
    pub byte_order: ByteOrder,
    /// Handling of oversized text arguments. Default: truncate.
    pub text_overflow: TextOverflow,
    /// Tag `u8` arguments with `u` instead of `B`.
    ///
    /// Older encoders shared the `u16` tag for `u8` values while still writing
    /// a single payload byte. Enable this only to stay byte-compatible with
    /// streams produced that way; such streams are ambiguous to decode.
    pub legacy_u8_tag: bool,
}

/// Encode the untagged frame header.
///
/// Wire format:
/// ```text
/// ┌─────────────┬─────────────┬─────────────┬───────────┐
/// │ Timestamp   │ Domain ID   │ Message ID  │ Arg count │
/// │ (4B)        │ (4B)        │ (4B)        │ (1B)      │
/// └─────────────┴─────────────┴─────────────┴───────────┘
/// ```
pub fn encode_header(
    timestamp: u32,
    domain_id: u32,
    message_id: u32,
    arg_count: u8,
    order: ByteOrder,
) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&order.u32_bytes(timestamp));
    header[4..8].copy_from_slice(&order.u32_bytes(domain_id));
    header[8..12].copy_from_slice(&order.u32_bytes(message_id));
    header[12] = arg_count;
    header
}

/// The exact number of bytes a frame with these arguments occupies on the wire.
pub fn frame_len(args: &[Value<'_>]) -> usize {
    HEADER_SIZE + args.iter().map(Value::wire_len).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_little_endian_layout() {
        let header = encode_header(0x0403_0201, 1, 6, 3, ByteOrder::Little);
        assert_eq!(
            header,
            [0x01, 0x02, 0x03, 0x04, 1, 0, 0, 0, 6, 0, 0, 0, 3]
        );
    }

    #[test]
    fn header_big_endian_layout() {
        let header = encode_header(7, 0x0102_0304, 0xAABB_CCDD, 255, ByteOrder::Big);
        assert_eq!(
            header,
            [0, 0, 0, 7, 0x01, 0x02, 0x03, 0x04, 0xAA, 0xBB, 0xCC, 0xDD, 255]
        );
    }

    #[test]
    fn header_native_matches_host() {
        let header = encode_header(9, 10, 11, 0, ByteOrder::Native);
        assert_eq!(&header[0..4], &9u32.to_ne_bytes());
        assert_eq!(&header[4..8], &10u32.to_ne_bytes());
        assert_eq!(&header[8..12], &11u32.to_ne_bytes());
        assert_eq!(header[12], 0);
    }

    #[test]
    fn frame_len_counts_header_and_args() {
        assert_eq!(frame_len(&[]), HEADER_SIZE);

        let args = [Value::I32(10), Value::Str("foo"), Value::F32(47.1)];
        // I + 4, S + 2 + 3, F + 4
        assert_eq!(frame_len(&args), HEADER_SIZE + 5 + 6 + 5);
    }

    #[test]
    fn default_config_is_canonical() {
        let cfg = EncoderConfig::default();
        assert_eq!(cfg.byte_order, ByteOrder::Little);
        assert_eq!(cfg.text_overflow, TextOverflow::Truncate);
        assert!(!cfg.legacy_u8_tag);
    }
}
