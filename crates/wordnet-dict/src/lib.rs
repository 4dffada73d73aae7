//! The dictionary facade: caching, sense-key head resolution, and (via
//! [`ram`]) a RAM-resident snapshot layered over `wordnet-db`'s file access.

mod cache;
mod config;
mod dictionary;
mod error;
mod hotswap;
mod ram;

pub use config::{DEFAULT_CACHE_MAX_CAPACITY, DictionaryConfig};
pub use dictionary::{
    BackingExceptionEntryIterator, BackingIndexWordIterator, BackingSenseEntryIterator, BackingSynsetIterator,
    Dictionary, ExceptionEntryIterator, IndexWordIterator, ResolvedWord, SenseEntryIterator, SynsetIterator,
};
pub use error::{DictError, Result};
pub use ram::RamDictionary;
