use std::io::{ErrorKind, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::sink::FrameSink;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Publishes complete frames to any `Write` stream.
///
/// Bytes are staged in memory between `begin_frame` and `end_frame` and
/// written in one pass when the frame closes, so a partially assembled
/// frame never reaches the stream.
pub struct IoSink<T> {
    inner: T,
    buf: BytesMut,
    open: bool,
    terminator: Option<Bytes>,
    frames_written: u64,
    bytes_written: u64,
}

impl<T: Write> IoSink<T> {
    /// Create a sink with no frame terminator.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            open: false,
            terminator: None,
            frames_written: 0,
            bytes_written: 0,
        }
    }

    /// Append `terminator` after every frame (e.g. `b"\n"` for line-based consoles).
    pub fn with_terminator(mut self, terminator: impl Into<Bytes>) -> Self {
        self.terminator = Some(terminator.into());
        self
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Number of frames published so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Number of bytes published so far, terminators included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the sink and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn publish(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.bytes_written += offset as u64;
        self.frames_written += 1;
        self.flush()
    }
}

impl<T: Write> FrameSink for IoSink<T> {
    fn begin_frame(&mut self) -> Result<()> {
        if self.open {
            tracing::debug!(
                pending = self.buf.len(),
                "discarding unterminated frame"
            );
        }
        self.buf.clear();
        self.open = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.open {
            return Err(FrameError::FrameNotOpen);
        }
        self.buf.put_slice(bytes);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.open {
            return Err(FrameError::FrameNotOpen);
        }
        self.open = false;
        if let Some(terminator) = &self.terminator {
            self.buf.put_slice(terminator);
        }
        let result = self.publish();
        self.buf.clear();
        result
    }
}

/// Keeps every completed frame in memory as an immutable [`Bytes`] chunk.
#[derive(Debug, Default)]
pub struct CaptureSink {
    buf: BytesMut,
    open: bool,
    frames: Vec<Bytes>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames captured so far, oldest first.
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }

    /// Remove and return all captured frames.
    pub fn take_frames(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.frames)
    }

    /// The most recently completed frame.
    pub fn last_frame(&self) -> Option<&Bytes> {
        self.frames.last()
    }

    /// Sum of all captured frame sizes.
    pub fn total_bytes(&self) -> usize {
        self.frames.iter().map(Bytes::len).sum()
    }

    /// All captured frames concatenated, as they would appear in a stream.
    pub fn to_stream(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.total_bytes());
        for frame in &self.frames {
            out.put_slice(frame);
        }
        out.freeze()
    }
}

impl FrameSink for CaptureSink {
    fn begin_frame(&mut self) -> Result<()> {
        self.buf.clear();
        self.open = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.open {
            return Err(FrameError::FrameNotOpen);
        }
        self.buf.put_slice(bytes);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.open {
            return Err(FrameError::FrameNotOpen);
        }
        self.open = false;
        self.frames.push(self.buf.split().freeze());
        Ok(())
    }
}
