use std::fs::OpenOptions;
use std::io::Write;

use carp_frame::{
    frame_len, ByteOrder, Counter, EncoderConfig, FrameSink, IoSink, Logger, TextOverflow,
    UptimeMillis, Value,
};

use crate::cmd::{EmitArgs, OrderArg};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{hex_string, print_report, EmitReport, OutputFormat};

/// An owned frame argument parsed from `KIND:VALUE`.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgSpec {
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
    Str(String),
}

impl ArgSpec {
    pub fn as_value(&self) -> Value<'_> {
        match self {
            ArgSpec::I8(v) => Value::I8(*v),
            ArgSpec::I16(v) => Value::I16(*v),
            ArgSpec::I32(v) => Value::I32(*v),
            ArgSpec::U8(v) => Value::U8(*v),
            ArgSpec::U16(v) => Value::U16(*v),
            ArgSpec::U32(v) => Value::U32(*v),
            ArgSpec::F32(v) => Value::F32(*v),
            ArgSpec::F64(v) => Value::F64(*v),
            ArgSpec::Str(v) => Value::Str(v),
        }
    }
}

pub fn parse_arg_spec(raw: &str) -> Result<ArgSpec, String> {
    let (kind, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:VALUE, got '{raw}'"))?;

    fn num<T: std::str::FromStr>(kind: &str, value: &str) -> Result<T, String>
    where
        T::Err: std::fmt::Display,
    {
        value
            .trim()
            .parse::<T>()
            .map_err(|err| format!("invalid {kind} value '{value}': {err}"))
    }

    match kind {
        "i8" => num(kind, value).map(ArgSpec::I8),
        "i16" => num(kind, value).map(ArgSpec::I16),
        "i32" => num(kind, value).map(ArgSpec::I32),
        "u8" => num(kind, value).map(ArgSpec::U8),
        "u16" => num(kind, value).map(ArgSpec::U16),
        "u32" => num(kind, value).map(ArgSpec::U32),
        "f32" => num(kind, value).map(ArgSpec::F32),
        "f64" => num(kind, value).map(ArgSpec::F64),
        "str" => Ok(ArgSpec::Str(value.to_string())),
        other => Err(format!(
            "unknown argument kind '{other}' (expected i8, i16, i32, u8, u16, u32, f32, f64 or str)"
        )),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampSource {
    Zero,
    Counter,
    Uptime,
    Fixed(i32),
}

pub fn parse_timestamp(raw: &str) -> Result<TimestampSource, String> {
    match raw {
        "zero" => Ok(TimestampSource::Zero),
        "counter" => Ok(TimestampSource::Counter),
        "uptime" => Ok(TimestampSource::Uptime),
        other => other
            .parse::<u32>()
            .map(|n| TimestampSource::Fixed(n as i32))
            .or_else(|_| other.parse::<i32>().map(TimestampSource::Fixed))
            .map_err(|_| {
                format!("invalid timestamp '{other}' (expected zero, counter, uptime or a number)")
            }),
    }
}

impl From<OrderArg> for ByteOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Little => ByteOrder::Little,
            OrderArg::Big => ByteOrder::Big,
            OrderArg::Native => ByteOrder::Native,
        }
    }
}

fn encoder_config(args: &EmitArgs) -> EncoderConfig {
    EncoderConfig {
        byte_order: args.byte_order.into(),
        text_overflow: if args.reject_long_text {
            TextOverflow::Reject
        } else {
            TextOverflow::Truncate
        },
        legacy_u8_tag: args.legacy_u8_tag,
    }
}

/// Forwards to an inner sink and keeps a copy of the first frame.
struct FirstFrame<S> {
    inner: S,
    first: Vec<u8>,
    recording: bool,
    done: bool,
}

impl<S: FrameSink> FirstFrame<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            first: Vec::new(),
            recording: false,
            done: false,
        }
    }
}

impl<S: FrameSink> FrameSink for FirstFrame<S> {
    fn begin_frame(&mut self) -> carp_frame::Result<()> {
        self.recording = !self.done;
        if self.recording {
            self.first.clear();
        }
        self.inner.begin_frame()
    }

    fn write(&mut self, bytes: &[u8]) -> carp_frame::Result<()> {
        if self.recording {
            self.first.extend_from_slice(bytes);
        }
        self.inner.write(bytes)
    }

    fn end_frame(&mut self) -> carp_frame::Result<()> {
        self.inner.end_frame()?;
        if self.recording {
            self.recording = false;
            self.done = true;
        }
        Ok(())
    }
}

struct Emitted<W> {
    sink: IoSink<W>,
    first: Vec<u8>,
}

fn emit_frames<W: Write>(args: &EmitArgs, sink: IoSink<W>) -> CliResult<Emitted<W>> {
    let values: Vec<Value<'_>> = args.args.iter().map(ArgSpec::as_value).collect();
    let sink = if args.newline {
        sink.with_terminator(&b"\n"[..])
    } else {
        sink
    };

    let logger = Logger::with_config(FirstFrame::new(sink), encoder_config(args));
    let mut logger = match args.timestamp {
        TimestampSource::Zero => logger,
        TimestampSource::Counter => logger.with_timestamp_provider(Counter::new()),
        TimestampSource::Uptime => logger.with_timestamp_provider(UptimeMillis::new()),
        TimestampSource::Fixed(n) => logger.with_timestamp_provider(move || n),
    };

    for _ in 0..args.repeat {
        logger
            .write(args.domain, args.message, &values)
            .map_err(|err| frame_error("emit failed", err))?;
    }

    let recorded = logger.into_inner();
    Ok(Emitted {
        sink: recorded.inner,
        first: recorded.first,
    })
}

pub fn run(args: EmitArgs, format: OutputFormat) -> CliResult<i32> {
    let values: Vec<Value<'_>> = args.args.iter().map(ArgSpec::as_value).collect();
    let expected_len = frame_len(&values);

    let (frames, bytes_written, first, stream) = match &args.out {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| io_error(&format!("failed to open {}", path.display()), err))?;
            let emitted = emit_frames(&args, IoSink::new(file))?;
            (
                emitted.sink.frames_written(),
                emitted.sink.bytes_written(),
                emitted.first,
                Vec::new(),
            )
        }
        None => {
            let emitted = emit_frames(&args, IoSink::new(Vec::<u8>::new()))?;
            let frames = emitted.sink.frames_written();
            let bytes = emitted.sink.bytes_written();
            (frames, bytes, emitted.first, emitted.sink.into_inner())
        }
    };

    tracing::debug!(
        domain = args.domain,
        message = args.message,
        frames,
        bytes_written,
        "frames emitted"
    );

    let report = EmitReport {
        domain_id: args.domain,
        message_id: args.message,
        arg_count: values.len(),
        frames,
        frame_len: expected_len,
        bytes_written,
        byte_order: ByteOrder::from(args.byte_order).name(),
        output: args.out.as_ref().map(|p| p.display().to_string()),
        hex: hex_string(&first),
        stream,
    };
    print_report(&report, format);
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_args(args: Vec<ArgSpec>) -> EmitArgs {
        EmitArgs {
            domain: 1,
            message: 6,
            args,
            timestamp: TimestampSource::Zero,
            byte_order: OrderArg::Little,
            legacy_u8_tag: false,
            reject_long_text: false,
            repeat: 1,
            newline: false,
            out: None,
        }
    }

    #[test]
    fn parses_every_kind() {
        assert_eq!(parse_arg_spec("i8:-3").unwrap(), ArgSpec::I8(-3));
        assert_eq!(parse_arg_spec("i16:-300").unwrap(), ArgSpec::I16(-300));
        assert_eq!(parse_arg_spec("i32:10").unwrap(), ArgSpec::I32(10));
        assert_eq!(parse_arg_spec("u8:255").unwrap(), ArgSpec::U8(255));
        assert_eq!(parse_arg_spec("u16:65535").unwrap(), ArgSpec::U16(65535));
        assert_eq!(parse_arg_spec("u32:7").unwrap(), ArgSpec::U32(7));
        assert_eq!(parse_arg_spec("f32:47.1").unwrap(), ArgSpec::F32(47.1));
        assert_eq!(parse_arg_spec("f64:0.5").unwrap(), ArgSpec::F64(0.5));
        assert_eq!(
            parse_arg_spec("str:a:b").unwrap(),
            ArgSpec::Str("a:b".to_string())
        );
        assert_eq!(parse_arg_spec("str:").unwrap(), ArgSpec::Str(String::new()));
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(parse_arg_spec("i32").unwrap_err().contains("KIND:VALUE"));
        assert!(parse_arg_spec("bool:true").unwrap_err().contains("unknown"));
        assert!(parse_arg_spec("u8:300").is_err());
        assert!(parse_arg_spec("i8:x").is_err());
    }

    #[test]
    fn parses_timestamp_sources() {
        assert_eq!(parse_timestamp("zero").unwrap(), TimestampSource::Zero);
        assert_eq!(parse_timestamp("counter").unwrap(), TimestampSource::Counter);
        assert_eq!(parse_timestamp("uptime").unwrap(), TimestampSource::Uptime);
        assert_eq!(parse_timestamp("42").unwrap(), TimestampSource::Fixed(42));
        assert_eq!(
            parse_timestamp("4294967295").unwrap(),
            TimestampSource::Fixed(-1)
        );
        assert_eq!(parse_timestamp("-2").unwrap(), TimestampSource::Fixed(-2));
        assert!(parse_timestamp("later").is_err());
    }

    #[test]
    fn emits_reference_frame() {
        let args = emit_args(vec![
            ArgSpec::I32(10),
            ArgSpec::Str("foo".to_string()),
            ArgSpec::F32(47.1),
        ]);
        let emitted = emit_frames(&args, IoSink::new(Vec::<u8>::new())).unwrap();

        let mut expected = vec![0, 0, 0, 0, 1, 0, 0, 0, 6, 0, 0, 0, 3];
        expected.extend_from_slice(&[b'I', 10, 0, 0, 0]);
        expected.extend_from_slice(&[b'S', 3, 0, b'f', b'o', b'o']);
        expected.push(b'F');
        expected.extend_from_slice(&47.1f32.to_le_bytes());

        assert_eq!(emitted.first, expected);
        assert_eq!(emitted.sink.get_ref(), &expected);
    }

    #[test]
    fn repeat_with_counter_and_newline() {
        let mut args = emit_args(vec![ArgSpec::U8(9)]);
        args.repeat = 3;
        args.newline = true;
        args.timestamp = TimestampSource::Counter;
        let emitted = emit_frames(&args, IoSink::new(Vec::<u8>::new())).unwrap();

        let frame = 13 + 2;
        let stream = emitted.sink.get_ref();
        assert_eq!(emitted.sink.frames_written(), 3);
        assert_eq!(stream.len(), 3 * (frame + 1));
        for (i, chunk) in stream.chunks(frame + 1).enumerate() {
            assert_eq!(&chunk[0..4], &(i as u32).to_le_bytes());
            assert_eq!(chunk[frame], b'\n');
        }
        assert_eq!(emitted.first.len(), frame);
    }

    #[test]
    fn fixed_timestamp_and_big_endian() {
        let mut args = emit_args(vec![ArgSpec::U16(0x0102)]);
        args.timestamp = TimestampSource::Fixed(0x0A0B_0C0D);
        args.byte_order = OrderArg::Big;
        let emitted = emit_frames(&args, IoSink::new(Vec::<u8>::new())).unwrap();

        assert_eq!(&emitted.first[0..4], &[0x0A, 0x0B, 0x0C, 0x0D]);
        assert_eq!(&emitted.first[4..8], &[0, 0, 0, 1]);
        assert_eq!(&emitted.first[13..], &[b'u', 0x01, 0x02]);
    }

    #[test]
    fn legacy_u8_tag_flag() {
        let mut args = emit_args(vec![ArgSpec::U8(5)]);
        args.legacy_u8_tag = true;
        let emitted = emit_frames(&args, IoSink::new(Vec::<u8>::new())).unwrap();
        assert_eq!(&emitted.first[13..], &[b'u', 5]);
    }

    #[test]
    fn reject_long_text_fails_with_data_invalid() {
        let mut args = emit_args(vec![ArgSpec::Str("x".repeat(70_000))]);
        args.reject_long_text = true;
        let err = match emit_frames(&args, IoSink::new(Vec::<u8>::new())) {
            Ok(_) => panic!("oversized text should be rejected"),
            Err(err) => err,
        };
        assert_eq!(err.code, crate::exit::DATA_INVALID);
    }
}
