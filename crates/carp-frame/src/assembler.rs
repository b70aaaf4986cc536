use crate::clock::TimestampProvider;
use crate::codec::{encode_header, EncoderConfig, TextOverflow, MAX_ARGS, MAX_TEXT_LEN};
use crate::error::{FrameError, Result};
use crate::sink::FrameSink;
use crate::value::Value;

/// Encode one complete frame into `sink`.
///
/// Argument count and text lengths are validated before `begin_frame`, so a
/// rejected frame leaves the sink untouched. If the sink itself fails part
/// way through, `end_frame` is not called and the frame is abandoned.
pub fn assemble_frame<S: FrameSink + ?Sized>(
    sink: &mut S,
    config: &EncoderConfig,
    timestamp: u32,
    domain_id: u32,
    message_id: u32,
    args: &[Value<'_>],
) -> Result<()> {
    let arg_count = validate_args(args, config)?;
    write_frame(sink, config, timestamp, domain_id, message_id, arg_count, args)
}

/// Check that `args` fit in one frame and return the header arg count.
pub(crate) fn validate_args(args: &[Value<'_>], config: &EncoderConfig) -> Result<u8> {
    let arg_count = u8::try_from(args.len()).map_err(|_| FrameError::TooManyArgs {
        count: args.len(),
        max: MAX_ARGS,
    })?;

    if config.text_overflow == TextOverflow::Reject {
        if let Some(len) = args
            .iter()
            .filter_map(Value::text_len)
            .find(|len| *len > MAX_TEXT_LEN)
        {
            return Err(FrameError::TextTooLong {
                len,
                max: MAX_TEXT_LEN,
            });
        }
    }
    Ok(arg_count)
}

/// Emit an already validated frame.
pub(crate) fn write_frame<S: FrameSink + ?Sized>(
    sink: &mut S,
    config: &EncoderConfig,
    timestamp: u32,
    domain_id: u32,
    message_id: u32,
    arg_count: u8,
    args: &[Value<'_>],
) -> Result<()> {
    sink.begin_frame()?;
    sink.write(&encode_header(
        timestamp,
        domain_id,
        message_id,
        arg_count,
        config.byte_order,
    ))?;
    for arg in args {
        arg.encode(sink, config)?;
    }
    sink.end_frame()?;

    tracing::trace!(timestamp, domain_id, message_id, arg_count, "frame emitted");
    Ok(())
}

/// Frame assembler bound to one sink and an optional timestamp source.
///
/// ```
/// use carp_frame::{carp_write, CaptureSink, Logger};
///
/// let mut logger = Logger::new(CaptureSink::new());
/// carp_write!(logger, 1, 6, 10, "foo", 47.1f32).unwrap();
/// assert_eq!(logger.get_ref().frames().len(), 1);
/// ```
pub struct Logger<S> {
    sink: S,
    clock: Option<Box<dyn TimestampProvider + Send + Sync>>,
    config: EncoderConfig,
}

impl<S: FrameSink> Logger<S> {
    /// Create a logger with default configuration and no timestamp source.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, EncoderConfig::default())
    }

    /// Create a logger with explicit configuration.
    pub fn with_config(sink: S, config: EncoderConfig) -> Self {
        Self {
            sink,
            clock: None,
            config,
        }
    }

    /// Stamp every frame with values from `provider`. Without one, frames carry 0.
    pub fn with_timestamp_provider<P>(mut self, provider: P) -> Self
    where
        P: TimestampProvider + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(provider));
        self
    }

    /// Emit one frame. Prefer [`carp_write!`](crate::carp_write), which builds
    /// the argument slice from a literal argument list.
    ///
    /// The timestamp provider is only consulted for frames that pass validation.
    pub fn write(&mut self, domain_id: u32, message_id: u32, args: &[Value<'_>]) -> Result<()> {
        let arg_count = validate_args(args, &self.config)?;
        let timestamp = self.timestamp();
        write_frame(
            &mut self.sink,
            &self.config,
            timestamp,
            domain_id,
            message_id,
            arg_count,
            args,
        )
    }

    /// The timestamp the next frame would carry.
    fn timestamp(&self) -> u32 {
        self.clock
            .as_ref()
            .map_or(0, |clock| clock.timestamp() as u32)
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Replace the encoder configuration for subsequent frames.
    pub fn set_config(&mut self, config: EncoderConfig) {
        self.config = config;
    }

    /// Borrow the sink.
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the logger and return the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S> std::fmt::Debug for Logger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("timestamped", &self.clock.is_some())
            .finish_non_exhaustive()
    }
}
