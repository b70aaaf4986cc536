//! Compact, self-describing binary frames for structured log and telemetry events.
//!
//! A frame is a fixed 13-byte header followed by one tagged value per argument:
//! - timestamp, domain id and message id (4 bytes each, untagged)
//! - a one-byte argument count
//! - for each argument, a one-byte type tag and its payload
//!
//! Encoding never allocates; bytes go straight to a caller-supplied
//! [`FrameSink`]. There is no decoder here.

pub mod assembler;
pub mod clock;
pub mod codec;
pub mod error;
pub mod global;
pub mod sink;
pub mod value;
pub mod writer;

pub use assembler::{assemble_frame, Logger};
pub use clock::{Counter, TimestampProvider, UptimeMillis};
pub use codec::{
    encode_header, frame_len, ByteOrder, EncoderConfig, TextOverflow, HEADER_SIZE, MAX_ARGS,
    MAX_TEXT_LEN,
};
pub use error::{FrameError, Result};
pub use global::{set_timestamp_provider, setup_logging, setup_logging_with_config};
pub use sink::FrameSink;
pub use value::{TypeTag, Value};
pub use writer::{CaptureSink, IoSink};

/// Emit a frame through a [`Logger`], converting each argument with `Value::from`.
///
/// The argument count in the header is the number of arguments listed here.
/// Arguments of unsupported types do not compile.
#[macro_export]
macro_rules! carp_write {
    ($logger:expr, $domain:expr, $message:expr $(, $arg:expr)* $(,)?) => {
        $logger.write($domain, $message, &[$($crate::Value::from($arg)),*])
    };
}

/// Emit an unresolved log line: domain 0, message 0, with the format string
/// carried as the first argument.
#[macro_export]
macro_rules! carp_log {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::carp_write!($logger, 0, 0, $fmt $(, $arg)*)
    };
}

/// Emit a frame through the process-wide sink registered with [`setup_logging`].
#[macro_export]
macro_rules! carp_emit {
    ($domain:expr, $message:expr $(, $arg:expr)* $(,)?) => {
        $crate::global::write($domain, $message, &[$($crate::Value::from($arg)),*])
    };
}
