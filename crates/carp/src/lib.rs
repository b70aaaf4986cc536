//! Compact tagged binary logging for constrained systems.
//!
//! carp turns a log call into a small binary frame: a numeric domain and
//! message id instead of the format string, plus one tagged value per
//! argument. Format strings live in domain tables kept next to the source.
//!
//! # Crate Structure
//!
//! - [`frame`] — Frame encoding, sinks, timestamp sources, global registration
//! - [`domain`] — Domain tables mapping message ids to format strings

/// Re-export frame types.
pub mod frame {
    pub use carp_frame::*;
}

/// Re-export domain table types.
pub mod domain {
    pub use carp_domain::*;
}

pub use carp_frame::{carp_emit, carp_log, carp_write, Logger, Value};
