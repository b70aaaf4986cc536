//! Domain tables for carp frames.
//!
//! Frames carry a numeric domain id and message id instead of the format
//! string. A domain file (`carp.domain`) records, for one domain, the format
//! string behind each message id; an aggregate table merges many domain files
//! so a viewer can turn frames back into text.
//!
//! This crate only manages the tables: allocating ids, loading, merging and
//! persisting them. It never touches frame bytes.

pub mod config;
pub mod domain;
pub mod error;
pub mod table;

pub use config::CatalogConfig;
pub use domain::{Domain, DOMAIN_FILE_NAME};
pub use error::{DomainError, Result};
pub use table::DomainTable;
