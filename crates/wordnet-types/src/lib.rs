//! Identifiers, catalogues, and record types shared across the WordNet data
//! access engine.
//!
//! This crate has no I/O of its own: it defines the value types
//! (`Pos`, [`SynsetId`], [`WordId`], [`SenseKey`], [`ExceptionEntryId`],
//! [`IndexWordId`]), the frozen process-wide catalogues (pointer kinds,
//! lexical files, verb frames), and the record structs
//! ([`Synset`], [`IndexWord`], [`SenseEntry`], [`ExceptionEntry`]) that
//! `wordnet-parse` builds from raw lines and that `wordnet-dict` caches and
//! serves.
//!
//! ```
//! use wordnet_types::{Pos, SynsetId};
//!
//! let id = SynsetId::new(1740, Pos::Noun).unwrap();
//! assert_eq!(id.to_string(), "SID-00001740-N");
//! assert_eq!("SID-00001740-N".parse::<SynsetId>().unwrap(), id);
//! ```

mod error;
mod frame;
mod ids;
mod lexfile;
mod pointer;
mod pos;
mod records;
mod sense_key;

pub use error::{Result, TypesError};
pub use frame::{FrameTemplate, lookup as lookup_frame};
pub use ids::{ExceptionEntryId, IndexWordId, SynsetId, WordId, WordNumber, normalize_lemma};
pub use lexfile::{ADJ_ALL, LexicalFile, UnknownLexicalFile, lookup as lookup_lexfile};
pub use pointer::{PointerKind, SIMILAR_TO, pointer_kind};
pub use pos::Pos;
pub use records::{
    ExceptionEntry, ExceptionEntryProxy, IndexWord, LexFileRef, LexicalPointer, SemanticPointer,
    SenseEntry, Synset, Word,
};
pub use sense_key::SenseKey;
