use thiserror::Error;

/// Errors raised while constructing or parsing the identifier types in this
/// crate. Every other crate in the workspace wraps this with `#[from]`.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed id string: {0}")]
    MalformedId(String),

    #[error("mutation rejected: {0}")]
    Immutable(&'static str),
}

pub type Result<T> = std::result::Result<T, TypesError>;
