use crate::error::Result;

/// Destination for encoded frames.
///
/// The assembler calls `begin_frame`, then `write` one or more times, then
/// `end_frame` for every frame. `write` calls must be applied in order.
/// Whether a frame is observed atomically by concurrent producers is up to the
/// implementation: take a lock in `begin_frame` and release it in
/// `end_frame`, or buffer and publish on `end_frame`.
pub trait FrameSink {
    /// Called before the first byte of a frame. Use it to reset buffers or
    /// acquire resources.
    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    /// Append raw bytes to the current frame.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Called after the last byte of a frame. Use it to flush, publish or
    /// append a terminator.
    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin_frame(&mut self) -> Result<()> {
        (**self).begin_frame()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn end_frame(&mut self) -> Result<()> {
        (**self).end_frame()
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin_frame(&mut self) -> Result<()> {
        (**self).begin_frame()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn end_frame(&mut self) -> Result<()> {
        (**self).end_frame()
    }
}

/// Plain append: frames are concatenated back to back.
impl FrameSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}
