//! Process-wide sink and timestamp slots.
//!
//! Mirrors the classic "register once, log from anywhere" entry points. A
//! [`Logger`](crate::Logger) owned by the caller is the better fit when more
//! than one sink is needed; the global slot exists for call sites that cannot
//! thread a logger through.
//!
//! The sink is registered exactly once per process. The timestamp provider
//! can be replaced at any time. Frames written through [`write`] hold the
//! sink's lock for the whole frame, so concurrent callers never interleave.

use std::sync::{Mutex, OnceLock, PoisonError, RwLock};

use crate::assembler::{validate_args, write_frame};
use crate::clock::TimestampProvider;
use crate::codec::EncoderConfig;
use crate::error::{FrameError, Result};
use crate::sink::FrameSink;
use crate::value::Value;

type SharedClock = Box<dyn TimestampProvider + Send + Sync>;

struct Registration {
    sink: Mutex<Box<dyn FrameSink + Send>>,
    config: EncoderConfig,
}

static REGISTRATION: OnceLock<Registration> = OnceLock::new();
static CLOCK: RwLock<Option<SharedClock>> = RwLock::new(None);

/// Register the process-wide sink with default encoder configuration.
///
/// Returns [`FrameError::AlreadyRegistered`] if a sink was registered before;
/// the first registration stays in place.
pub fn setup_logging<S>(sink: S) -> Result<()>
where
    S: FrameSink + Send + 'static,
{
    setup_logging_with_config(sink, EncoderConfig::default())
}

/// Register the process-wide sink with explicit encoder configuration.
pub fn setup_logging_with_config<S>(sink: S, config: EncoderConfig) -> Result<()>
where
    S: FrameSink + Send + 'static,
{
    let registration = Registration {
        sink: Mutex::new(Box::new(sink)),
        config,
    };
    REGISTRATION
        .set(registration)
        .map_err(|_| FrameError::AlreadyRegistered)?;
    tracing::debug!(byte_order = config.byte_order.name(), "frame sink registered");
    Ok(())
}

/// Whether [`setup_logging`] has succeeded in this process.
pub fn is_registered() -> bool {
    REGISTRATION.get().is_some()
}

/// Install (or replace) the process-wide timestamp provider.
pub fn set_timestamp_provider<P>(provider: P)
where
    P: TimestampProvider + Send + Sync + 'static,
{
    let mut slot = CLOCK.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Box::new(provider));
}

/// Remove the process-wide timestamp provider; later frames carry 0.
pub fn clear_timestamp_provider() {
    let mut slot = CLOCK.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

/// Emit one frame through the registered sink.
///
/// Returns [`FrameError::NotRegistered`] when no sink has been registered.
pub fn write(domain_id: u32, message_id: u32, args: &[Value<'_>]) -> Result<()> {
    let registration = REGISTRATION.get().ok_or(FrameError::NotRegistered)?;
    let arg_count = validate_args(args, &registration.config)?;
    let timestamp = current_timestamp();

    let mut sink = registration
        .sink
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    write_frame(
        &mut **sink,
        &registration.config,
        timestamp,
        domain_id,
        message_id,
        arg_count,
        args,
    )
}

fn current_timestamp() -> u32 {
    let slot = CLOCK.read().unwrap_or_else(PoisonError::into_inner);
    slot.as_ref().map_or(0, |clock| clock.timestamp() as u32)
}
