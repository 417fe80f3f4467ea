use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Search backend failed: {0}")]
    SearchBackend(#[source] anyhow::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl Error {
    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Embedding(_) => "embedding_error",
            Error::SearchBackend(_) => "search_backend_error",
            Error::InvalidQuery(_) => "invalid_query",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Catalog(_) => "catalog_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
