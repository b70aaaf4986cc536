//! Timestamp sources for the frame header.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Supplies the 32-bit timestamp stored in every frame header.
///
/// Called once per frame before any byte is written. The value is stored as
/// its u32 bit pattern. No monotonicity is required; a provider that wraps or
/// simply counts upwards is fine when no real clock is available.
pub trait TimestampProvider {
    fn timestamp(&self) -> i32;
}

impl<F> TimestampProvider for F
where
    F: Fn() -> i32,
{
    fn timestamp(&self) -> i32 {
        self()
    }
}

/// Free-running counter: 0, 1, 2, ... wrapping on overflow.
#[derive(Debug, Default)]
pub struct Counter {
    next: AtomicU32,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `start`.
    pub fn starting_at(start: u32) -> Self {
        Self {
            next: AtomicU32::new(start),
        }
    }
}

impl TimestampProvider for Counter {
    fn timestamp(&self) -> i32 {
        self.next.fetch_add(1, Ordering::Relaxed) as i32
    }
}

/// Milliseconds elapsed since construction, wrapping after ~49.7 days.
#[derive(Debug, Clone, Copy)]
pub struct UptimeMillis {
    start: Instant,
}

impl UptimeMillis {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for UptimeMillis {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampProvider for UptimeMillis {
    fn timestamp(&self) -> i32 {
        self.start.elapsed().as_millis() as u32 as i32
    }
}
