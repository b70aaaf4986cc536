use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::config::CatalogConfig;
use crate::domain::{read_capped, read_file, to_pretty_json, write_file, Domain, DOMAIN_FILE_NAME};
use crate::error::{DomainError, Result};

/// Domain-keyed collection of domain files.
///
/// Serialized as a JSON object keyed by the decimal domain id.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    domains: BTreeMap<u32, Domain>,
    config: CatalogConfig,
}

impl DomainTable {
    /// Create an empty table with default config.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty table with explicit config.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            domains: BTreeMap::new(),
            config,
        }
    }

    /// Add a domain. A domain id that is already present is an error unless
    /// `fail_on_duplicate_domain` is off, in which case it is replaced.
    pub fn insert(&mut self, domain: Domain) -> Result<()> {
        self.insert_from(domain, None, None)
    }

    fn insert_from(
        &mut self,
        domain: Domain,
        source: Option<&Path>,
        previous: Option<&Path>,
    ) -> Result<()> {
        if let Some(existing) = self.domains.get(&domain.domain) {
            let first = previous.map_or_else(|| existing.name.clone(), |p| p.display().to_string());
            let second = source.map_or_else(|| domain.name.clone(), |p| p.display().to_string());
            if self.config.fail_on_duplicate_domain {
                return Err(DomainError::DuplicateDomain {
                    domain: domain.domain,
                    first,
                    second,
                });
            }
            tracing::warn!(domain = domain.domain, %first, %second, "replacing duplicate domain");
        }
        self.domains.insert(domain.domain, domain);
        Ok(())
    }

    /// Collect every `carp.domain` file below `root`.
    pub fn from_directory(root: &Path) -> Result<Self> {
        Self::from_directory_with_config(root, CatalogConfig::default())
    }

    /// Collect every `carp.domain` file below `root` with explicit config.
    ///
    /// Directories are visited in name order so duplicate resolution is
    /// deterministic. Symlinked domain files are refused; symlinked
    /// directories are skipped.
    pub fn from_directory_with_config(root: &Path, config: CatalogConfig) -> Result<Self> {
        let mut table = Self::with_config(config);
        let mut sources: HashMap<u32, PathBuf> = HashMap::new();
        let mut loaded = 0usize;
        let mut pending = vec![(root.to_path_buf(), 0usize)];

        while let Some((dir, depth)) = pending.pop() {
            let mut entries = std::fs::read_dir(&dir)
                .map_err(|err| DomainError::LoadFailed(format!("{}: {err}", dir.display())))?
                .collect::<std::io::Result<Vec<_>>>()
                .map_err(|err| DomainError::LoadFailed(err.to_string()))?;
            entries.sort_by_key(|entry| entry.file_name());

            let mut subdirs = Vec::new();
            for entry in entries {
                let entry_path = entry.path();
                let file_name = entry.file_name();
                let is_domain_file = file_name.to_str() == Some(DOMAIN_FILE_NAME);
                let path_metadata = std::fs::symlink_metadata(&entry_path)
                    .map_err(|err| DomainError::LoadFailed(err.to_string()))?;
                let file_type = path_metadata.file_type();

                if file_type.is_symlink() {
                    if is_domain_file {
                        return Err(DomainError::LoadFailed(format!(
                            "refusing to load domain symlink: {}",
                            entry_path.display()
                        )));
                    }
                    continue;
                }
                if file_type.is_dir() {
                    if depth < table.config.max_depth {
                        subdirs.push((entry_path, depth + 1));
                    }
                    continue;
                }
                if !file_type.is_file() || !is_domain_file {
                    continue;
                }

                loaded = loaded.saturating_add(1);
                if loaded > table.config.max_domain_files {
                    return Err(DomainError::LoadFailed(format!(
                        "domain file count exceeds configured max ({}): {}",
                        table.config.max_domain_files, loaded
                    )));
                }

                let content = read_limited(&entry_path, &path_metadata, &table.config)?;
                let domain = Domain::from_json(&content).map_err(|err| {
                    DomainError::LoadFailed(format!("{}: {err}", entry_path.display()))
                })?;
                tracing::debug!(
                    domain = domain.domain,
                    messages = domain.messages.len(),
                    path = %entry_path.display(),
                    "loaded domain file"
                );

                let id = domain.domain;
                let previous = sources.get(&id).cloned();
                table.insert_from(domain, Some(&entry_path), previous.as_deref())?;
                sources.insert(id, entry_path);
            }

            // Stack order: push in reverse so directories pop in name order.
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(table)
    }

    /// Parse an aggregate table.
    pub fn from_json(json: &str) -> Result<Self> {
        let domains: BTreeMap<u32, Domain> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (key, domain) in domains {
            if key != domain.domain {
                return Err(DomainError::LoadFailed(format!(
                    "table key {key} does not match domain id {}",
                    domain.domain
                )));
            }
            table.insert(domain)?;
        }
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        to_pretty_json(&self.domains)
    }

    /// Read an aggregate table. A single domain file is accepted as a
    /// one-entry table.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_config(path, CatalogConfig::default())
    }

    /// Read an aggregate table, refusing files larger than
    /// `config.max_domain_file_size`.
    pub fn load_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let content = read_file(path, config.max_domain_file_size)?;
        match Self::from_json(&content) {
            Ok(mut table) => {
                table.config = config;
                Ok(table)
            }
            Err(table_err) => match Domain::from_json(&content) {
                Ok(domain) => {
                    let mut table = Self::with_config(config);
                    table.insert(domain)?;
                    Ok(table)
                }
                Err(_) => Err(table_err),
            },
        }
    }

    /// Write the aggregate table, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_json()?)
    }

    pub fn get(&self, domain_id: u32) -> Option<&Domain> {
        self.domains.get(&domain_id)
    }

    pub fn get_mut(&mut self, domain_id: u32) -> Option<&mut Domain> {
        self.domains.get_mut(&domain_id)
    }

    /// Display name of a domain, or its decimal id when unknown.
    pub fn domain_name(&self, domain_id: u32) -> String {
        match self.domains.get(&domain_id) {
            Some(domain) => domain.name.clone(),
            None => domain_id.to_string(),
        }
    }

    /// Format string behind a (domain, message) pair.
    pub fn format_string(&self, domain_id: u32, message_id: u32) -> Option<&str> {
        self.domains.get(&domain_id)?.message(message_id)
    }

    /// Allocate (or reuse) a message id in a known domain.
    pub fn intern(&mut self, domain_id: u32, format: &str) -> Result<u32> {
        self.domains
            .get_mut(&domain_id)
            .ok_or(DomainError::UnknownDomain(domain_id))?
            .intern(format)
    }

    /// Domain ids in ascending order.
    pub fn domain_ids(&self) -> Vec<u32> {
        self.domains.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Get table configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

fn read_limited(
    path: &Path,
    path_metadata: &std::fs::Metadata,
    config: &CatalogConfig,
) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        DomainError::LoadFailed(format!("failed opening domain {}: {err}", path.display()))
    })?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| DomainError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(path_metadata, &opened_metadata) {
            return Err(DomainError::LoadFailed(format!(
                "domain file changed during load: {}",
                path.display()
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = (path_metadata, &opened_metadata);

    read_capped(file, path, config.max_domain_file_size)
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
