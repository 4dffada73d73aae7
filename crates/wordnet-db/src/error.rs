use thiserror::Error;

/// Error taxonomy for the data-access layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("misformatted line: {0}")]
    MisformattedLine(#[from] wordnet_parse::MisformattedLine),

    #[error("I/O error for {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("operation attempted on a closed data source")]
    ObjectClosed,

    #[error("mutation attempted on an open data source or registry")]
    ObjectOpen,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
