use thiserror::Error;

/// Error taxonomy for the dictionary facade, cache, and RAM snapshot.
#[derive(Debug, Error)]
pub enum DictError {
    #[error(transparent)]
    Db(#[from] wordnet_db::DbError),

    #[error(transparent)]
    Parse(#[from] wordnet_parse::MisformattedLine),

    #[error(transparent)]
    Types(#[from] wordnet_types::TypesError),

    #[error("operation attempted on a closed dictionary or cache")]
    ObjectClosed,

    #[error("mutation attempted on an open dictionary or cache")]
    ObjectOpen,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    #[error("snapshot (de)serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DictError>;
