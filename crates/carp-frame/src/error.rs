/// Errors that can occur while assembling or emitting frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A global write was attempted before `setup_logging` was called.
    #[error("no frame sink registered (call setup_logging first)")]
    NotRegistered,

    /// `setup_logging` was called a second time.
    #[error("a frame sink is already registered")]
    AlreadyRegistered,

    /// More arguments than the one-byte argument count can describe.
    #[error("too many arguments ({count}, max {max})")]
    TooManyArgs { count: usize, max: usize },

    /// A text argument exceeds the u16 length prefix and the encoder is
    /// configured to reject rather than truncate.
    #[error("text argument too long ({len} bytes, max {max})")]
    TextTooLong { len: usize, max: usize },

    /// A sink received bytes outside of a `begin_frame`/`end_frame` pair.
    #[error("write outside of an open frame")]
    FrameNotOpen,

    /// The underlying stream accepted zero bytes.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// An I/O error occurred while writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
