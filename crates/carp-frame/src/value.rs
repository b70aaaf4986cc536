//! Typed arguments and their one-byte wire tags.

use crate::codec::{EncoderConfig, TextOverflow, MAX_TEXT_LEN};
use crate::error::{FrameError, Result};
use crate::sink::FrameSink;

/// Wire tag preceding every argument payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    I8 = b'b',
    I16 = b'i',
    I32 = b'I',
    U8 = b'B',
    U16 = b'u',
    U32 = b'U',
    F32 = b'F',
    F64 = b'D',
    Str = b'S',
}

impl TypeTag {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Str => "str",
        }
    }
}

/// A single frame argument.
///
/// The set of variants is closed: only types with a `From` conversion can be
/// passed to [`carp_write!`](crate::carp_write), so an unsupported argument
/// type is a compile error rather than a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
    Str(&'a str),
}

impl<'a> Value<'a> {
    /// The tag written for this value.
    ///
    /// With `legacy_u8_tag`, `u8` values reuse the `u16` tag.
    pub fn tag(&self, legacy_u8_tag: bool) -> TypeTag {
        match self {
            Value::I8(_) => TypeTag::I8,
            Value::I16(_) => TypeTag::I16,
            Value::I32(_) => TypeTag::I32,
            Value::U8(_) if legacy_u8_tag => TypeTag::U16,
            Value::U8(_) => TypeTag::U8,
            Value::U16(_) => TypeTag::U16,
            Value::U32(_) => TypeTag::U32,
            Value::F32(_) => TypeTag::F32,
            Value::F64(_) => TypeTag::F64,
            Value::Str(_) => TypeTag::Str,
        }
    }

    /// Payload size in bytes, excluding the tag. Text includes its length prefix.
    pub fn payload_len(&self) -> usize {
        match self {
            Value::I8(_) | Value::U8(_) => 1,
            Value::I16(_) | Value::U16(_) => 2,
            Value::I32(_) | Value::U32(_) | Value::F32(_) => 4,
            Value::F64(_) => 8,
            Value::Str(text) => 2 + text.len().min(MAX_TEXT_LEN),
        }
    }

    /// Tag plus payload size in bytes.
    pub fn wire_len(&self) -> usize {
        1 + self.payload_len()
    }

    /// Byte length of a text value before any truncation.
    pub fn text_len(&self) -> Option<usize> {
        match self {
            Value::Str(text) => Some(text.len()),
            _ => None,
        }
    }

    /// Write the tag and payload to `sink`.
    ///
    /// Numeric values go out in a single `write` call; text goes out as the
    /// tag and length prefix followed by the raw bytes.
    pub fn encode<S: FrameSink + ?Sized>(&self, sink: &mut S, config: &EncoderConfig) -> Result<()> {
        let tag = self.tag(config.legacy_u8_tag).as_byte();
        let order = config.byte_order;
        match *self {
            Value::I8(v) => sink.write(&[tag, v as u8]),
            Value::I16(v) => write_tagged(sink, tag, &order.u16_bytes(v as u16)),
            Value::I32(v) => write_tagged(sink, tag, &order.u32_bytes(v as u32)),
            Value::U8(v) => sink.write(&[tag, v]),
            Value::U16(v) => write_tagged(sink, tag, &order.u16_bytes(v)),
            Value::U32(v) => write_tagged(sink, tag, &order.u32_bytes(v)),
            Value::F32(v) => write_tagged(sink, tag, &order.u32_bytes(v.to_bits())),
            Value::F64(v) => write_tagged(sink, tag, &order.u64_bytes(v.to_bits())),
            Value::Str(text) => {
                let bytes = text_payload(text, config.text_overflow)?;
                // text_payload caps the length at u16::MAX
                let len = order.u16_bytes(bytes.len() as u16);
                sink.write(&[tag, len[0], len[1]])?;
                sink.write(bytes)
            }
        }
    }
}

fn write_tagged<S: FrameSink + ?Sized>(sink: &mut S, tag: u8, payload: &[u8]) -> Result<()> {
    let mut buf = [0u8; 9];
    buf[0] = tag;
    buf[1..=payload.len()].copy_from_slice(payload);
    sink.write(&buf[..=payload.len()])
}

fn text_payload(text: &str, overflow: TextOverflow) -> Result<&[u8]> {
    let bytes = text.as_bytes();
    if bytes.len() <= MAX_TEXT_LEN {
        return Ok(bytes);
    }
    match overflow {
        TextOverflow::Truncate => {
            tracing::warn!(
                len = bytes.len(),
                max = MAX_TEXT_LEN,
                "text argument truncated"
            );
            Ok(&bytes[..MAX_TEXT_LEN])
        }
        TextOverflow::Reject => Err(FrameError::TextTooLong {
            len: bytes.len(),
            max: MAX_TEXT_LEN,
        }),
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    f32 => F32,
    f64 => F64,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Str(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ByteOrder;

    fn encoded(value: Value<'_>, config: &EncoderConfig) -> Vec<u8> {
        let mut out = Vec::new();
        value.encode(&mut out, config).unwrap();
        out
    }

    #[test]
    fn tags_match_wire_table() {
        let cases = [
            (Value::I8(0), b'b'),
            (Value::I16(0), b'i'),
            (Value::I32(0), b'I'),
            (Value::U8(0), b'B'),
            (Value::U16(0), b'u'),
            (Value::U32(0), b'U'),
            (Value::F32(0.0), b'F'),
            (Value::F64(0.0), b'D'),
            (Value::Str(""), b'S'),
        ];
        for (value, tag) in cases {
            assert_eq!(value.tag(false).as_byte(), tag, "{value:?}");
        }
    }

    #[test]
    fn legacy_mode_only_changes_u8() {
        assert_eq!(Value::U8(1).tag(true), TypeTag::U16);
        assert_eq!(Value::U16(1).tag(true), TypeTag::U16);
        assert_eq!(Value::I8(1).tag(true), TypeTag::I8);
    }

    #[test]
    fn i32_encodes_tag_then_four_bytes() {
        let out = encoded(Value::I32(-2), &EncoderConfig::default());
        assert_eq!(out, [b'I', 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn f64_encodes_ieee_bits() {
        let v = 1234.5678f64;
        let out = encoded(Value::F64(v), &EncoderConfig::default());
        assert_eq!(out[0], b'D');
        assert_eq!(&out[1..], &v.to_le_bytes());
    }

    #[test]
    fn f32_native_matches_host_layout() {
        let cfg = EncoderConfig {
            byte_order: ByteOrder::Native,
            ..EncoderConfig::default()
        };
        let out = encoded(Value::F32(47.1), &cfg);
        assert_eq!(out[0], b'F');
        assert_eq!(&out[1..], &47.1f32.to_ne_bytes());
    }

    #[test]
    fn u16_big_endian() {
        let cfg = EncoderConfig {
            byte_order: ByteOrder::Big,
            ..EncoderConfig::default()
        };
        assert_eq!(encoded(Value::U16(0x0102), &cfg), [b'u', 0x01, 0x02]);
    }

    #[test]
    fn u8_payload_is_one_byte_in_both_modes() {
        let legacy = EncoderConfig {
            legacy_u8_tag: true,
            ..EncoderConfig::default()
        };
        assert_eq!(encoded(Value::U8(200), &EncoderConfig::default()), [b'B', 200]);
        assert_eq!(encoded(Value::U8(200), &legacy), [b'u', 200]);
    }

    #[test]
    fn text_is_length_prefixed_without_terminator() {
        let out = encoded(Value::Str("foo"), &EncoderConfig::default());
        assert_eq!(out, [b'S', 3, 0, b'f', b'o', b'o']);
    }

    #[test]
    fn empty_text() {
        let out = encoded(Value::Str(""), &EncoderConfig::default());
        assert_eq!(out, [b'S', 0, 0]);
    }

    #[test]
    fn long_text_truncated_at_limit() {
        let text = "x".repeat(MAX_TEXT_LEN + 10);
        let value = Value::from(&text);
        let out = encoded(value, &EncoderConfig::default());

        assert_eq!(out.len(), 3 + MAX_TEXT_LEN);
        assert_eq!(&out[1..3], &[0xFF, 0xFF]);
        assert_eq!(value.wire_len(), out.len());
    }

    #[test]
    fn long_text_rejected_when_configured() {
        let text = "x".repeat(MAX_TEXT_LEN + 1);
        let cfg = EncoderConfig {
            text_overflow: TextOverflow::Reject,
            ..EncoderConfig::default()
        };
        let mut out = Vec::new();
        let err = Value::Str(&text).encode(&mut out, &cfg).unwrap_err();
        assert!(matches!(err, FrameError::TextTooLong { len, .. } if len == MAX_TEXT_LEN + 1));
        assert!(out.is_empty());
    }

    #[test]
    fn text_at_limit_is_untouched() {
        let text = "y".repeat(MAX_TEXT_LEN);
        let cfg = EncoderConfig {
            text_overflow: TextOverflow::Reject,
            ..EncoderConfig::default()
        };
        let out = encoded(Value::Str(&text), &cfg);
        assert_eq!(out.len(), 3 + MAX_TEXT_LEN);
    }

    #[test]
    fn from_conversions_pick_variant() {
        assert_eq!(Value::from(10i32), Value::I32(10));
        assert_eq!(Value::from(10u8), Value::U8(10));
        assert_eq!(Value::from(2.5f64), Value::F64(2.5));
        assert_eq!(Value::from("hi"), Value::Str("hi"));
    }

    #[test]
    fn wire_len_matches_encoding() {
        let cfg = EncoderConfig::default();
        for value in [
            Value::I8(1),
            Value::I16(1),
            Value::I32(1),
            Value::U8(1),
            Value::U16(1),
            Value::U32(1),
            Value::F32(1.0),
            Value::F64(1.0),
            Value::Str("hello"),
        ] {
            assert_eq!(encoded(value, &cfg).len(), value.wire_len(), "{value:?}");
        }
    }
}
