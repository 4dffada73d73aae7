//! The data access layer: content-type registry, binary-search and
//! direct-access data sources over WordNet-format files, and the file
//! provider that discovers and opens them.

mod buffer;
mod content_type;
mod error;
mod line;
mod provider;
mod source;
mod version;

pub use content_type::{Charset, ContentType, ContentTypeKey, ContentTypeRegistry, DataKind};
pub use error::{DbError, Result};
pub use provider::{DataSource, FileProvider, LoadPolicy, SourceHandle};
pub use source::{BinarySearchSource, DirectAccessSource, LineIterator};
