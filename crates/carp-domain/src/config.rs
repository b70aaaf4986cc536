/// Controls how domain files are collected into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// When true, two files with the same domain id fail the load.
    /// When false, the file found later replaces the earlier one.
    pub fail_on_duplicate_domain: bool,
    /// Maximum number of domain files collected from a directory tree.
    pub max_domain_files: usize,
    /// Maximum bytes allowed per domain file.
    pub max_domain_file_size: usize,
    /// Maximum directory depth searched below the root.
    pub max_depth: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fail_on_duplicate_domain: true,
            max_domain_files: 1024,
            max_domain_file_size: 4 * 1024 * 1024,
            max_depth: 32,
        }
    }
}
