/// Errors that can occur while handling domain tables.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A domain file or table could not be read or written.
    #[error("failed to load domain table: {0}")]
    LoadFailed(String),

    /// The file is not valid domain JSON.
    #[error("invalid domain json: {0}")]
    Json(#[from] serde_json::Error),

    /// Two domain files claim the same domain id.
    #[error("domain {domain} defined twice ({first} and {second})")]
    DuplicateDomain {
        domain: u32,
        first: String,
        second: String,
    },

    /// No domain with this id is known.
    #[error("unknown domain {0}")]
    UnknownDomain(u32),

    /// The domain has used up its 32-bit message id space.
    #[error("domain {domain} has no free message ids")]
    TooManyMessages { domain: u32 },
}

pub type Result<T> = std::result::Result<T, DomainError>;
