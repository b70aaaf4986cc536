use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::error::{DomainError, Result};

/// File name of a per-directory domain file.
pub const DOMAIN_FILE_NAME: &str = "carp.domain";

/// One domain: its id, a display name, and the format string of every message.
///
/// The message id of a format string is its index in `messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub domain: u32,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl Domain {
    pub fn new(domain: u32, name: impl Into<String>) -> Self {
        Self {
            domain,
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Return the message id for `format`, appending it if it is new.
    pub fn intern(&mut self, format: &str) -> Result<u32> {
        if let Some(id) = self.find(format) {
            tracing::debug!(domain = self.domain, message = id, "reusing message id");
            return Ok(id);
        }
        let id = u32::try_from(self.messages.len()).map_err(|_| DomainError::TooManyMessages {
            domain: self.domain,
        })?;
        self.messages.push(format.to_string());
        tracing::debug!(domain = self.domain, message = id, "allocated message id");
        Ok(id)
    }

    /// Message id of an already known format string.
    pub fn find(&self, format: &str) -> Option<u32> {
        self.messages
            .iter()
            .position(|known| known == format)
            .and_then(|index| u32::try_from(index).ok())
    }

    /// Format string for a message id.
    pub fn message(&self, message_id: u32) -> Option<&str> {
        self.messages
            .get(usize::try_from(message_id).ok()?)
            .map(String::as_str)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        to_pretty_json(self)
    }

    /// Read a domain file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_config(path, &CatalogConfig::default())
    }

    /// Read a domain file, refusing files larger than `config.max_domain_file_size`.
    pub fn load_with_config(path: &Path, config: &CatalogConfig) -> Result<Self> {
        Self::from_json(&read_file(path, config.max_domain_file_size)?)
    }

    /// Write this domain as a domain file, replacing any existing one.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_json()?)
    }
}

/// Pretty JSON with four-space indentation, as the offline tooling writes it.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|err| DomainError::LoadFailed(err.to_string()))
}

pub(crate) fn read_file(path: &Path, max_bytes: usize) -> Result<String> {
    let file = File::open(path)
        .map_err(|err| DomainError::LoadFailed(format!("{}: {err}", path.display())))?;
    read_capped(file, path, max_bytes)
}

/// Read at most `max_bytes` from an opened domain file.
pub(crate) fn read_capped(file: File, path: &Path, max_bytes: usize) -> Result<String> {
    let len = file
        .metadata()
        .map_err(|err| DomainError::LoadFailed(format!("{}: {err}", path.display())))?
        .len();
    if len > max_bytes as u64 {
        return Err(DomainError::LoadFailed(format!(
            "domain file too large ({len} bytes): {}",
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            DomainError::LoadFailed(format!("failed reading domain {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(DomainError::LoadFailed(format!(
            "domain file too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content.as_bytes())
        .map_err(|err| DomainError::LoadFailed(format!("failed writing {}: {err}", path.display())))
}
