use thiserror::Error;

/// Error taxonomy for the stemmer: the only failure mode is the backing
/// dictionary's.
#[derive(Debug, Error)]
pub enum MorphyError {
    #[error(transparent)]
    Dict(#[from] wordnet_dict::DictError),
}

pub type Result<T> = std::result::Result<T, MorphyError>;
