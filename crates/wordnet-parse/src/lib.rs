//! Pure parsers and line comparators for WordNet-format dictionary files.
//!
//! This crate has no I/O of its own and does not know about files, mmap, or
//! caching — it turns one already-located line of text into one owned
//! `wordnet_types` record, and it knows how each file family is sorted on
//! disk so a binary search can be driven generically. `wordnet-db` is the
//! only caller: it locates lines (via binary search or direct offset seek)
//! and hands the bytes here.

mod comparator;
mod error;
mod parser;

pub use comparator::{DataComparator, ExceptionComparator, IndexComparator, LineComparator, SenseKeyComparator};
pub use error::{MisformattedLine, Result};
pub use parser::{
    exception_entry_id, parse_exception_line, parse_index_line, parse_sense_index_line,
    parse_synset_line,
};
