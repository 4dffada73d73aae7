//! The content-type registry: a table pairing (data kind × part of speech)
//! with the parser, comparator, and character set that govern one file.

use std::collections::HashMap;
use std::sync::Arc;

use wordnet_parse::{DataComparator, ExceptionComparator, IndexComparator, LineComparator, SenseKeyComparator};
use wordnet_types::Pos;

use crate::error::{DbError, Result};

/// Character set used to decode a file's bytes into text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Charset {
    Utf8,
    /// Every byte is a valid Latin-1 code point, so this is a direct,
    /// allocation-free mapping rather than a `str::from_utf8` substitute.
    Latin1,
}

impl Charset {
    pub(crate) fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Which line grammar governs a file, independent of its part of speech.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataKind {
    Index,
    Data,
    Exception,
    Sense,
}

impl DataKind {
    /// The filename substring used for discovery hints (`index.noun`,
    /// `noun.exc`, `data.verb`, `index.sense`).
    fn hint(self) -> &'static str {
        match self {
            DataKind::Index => "index",
            DataKind::Data => "data",
            DataKind::Exception => "exc",
            DataKind::Sense => "sense",
        }
    }
}

/// One content-type key: a fixed member of the registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ContentTypeKey {
    IndexNoun,
    IndexVerb,
    IndexAdj,
    IndexAdv,
    DataNoun,
    DataVerb,
    DataAdj,
    DataAdv,
    ExceptionNoun,
    ExceptionVerb,
    ExceptionAdj,
    ExceptionAdv,
    Sense,
}

impl ContentTypeKey {
    pub const ALL: [ContentTypeKey; 13] = [
        ContentTypeKey::IndexNoun,
        ContentTypeKey::IndexVerb,
        ContentTypeKey::IndexAdj,
        ContentTypeKey::IndexAdv,
        ContentTypeKey::DataNoun,
        ContentTypeKey::DataVerb,
        ContentTypeKey::DataAdj,
        ContentTypeKey::DataAdv,
        ContentTypeKey::ExceptionNoun,
        ContentTypeKey::ExceptionVerb,
        ContentTypeKey::ExceptionAdj,
        ContentTypeKey::ExceptionAdv,
        ContentTypeKey::Sense,
    ];

    pub fn data_kind(self) -> DataKind {
        match self {
            ContentTypeKey::IndexNoun
            | ContentTypeKey::IndexVerb
            | ContentTypeKey::IndexAdj
            | ContentTypeKey::IndexAdv => DataKind::Index,
            ContentTypeKey::DataNoun
            | ContentTypeKey::DataVerb
            | ContentTypeKey::DataAdj
            | ContentTypeKey::DataAdv => DataKind::Data,
            ContentTypeKey::ExceptionNoun
            | ContentTypeKey::ExceptionVerb
            | ContentTypeKey::ExceptionAdj
            | ContentTypeKey::ExceptionAdv => DataKind::Exception,
            ContentTypeKey::Sense => DataKind::Sense,
        }
    }

    pub fn pos(self) -> Option<Pos> {
        match self {
            ContentTypeKey::IndexNoun | ContentTypeKey::DataNoun | ContentTypeKey::ExceptionNoun => {
                Some(Pos::Noun)
            }
            ContentTypeKey::IndexVerb | ContentTypeKey::DataVerb | ContentTypeKey::ExceptionVerb => {
                Some(Pos::Verb)
            }
            ContentTypeKey::IndexAdj | ContentTypeKey::DataAdj | ContentTypeKey::ExceptionAdj => {
                Some(Pos::Adj)
            }
            ContentTypeKey::IndexAdv | ContentTypeKey::DataAdv | ContentTypeKey::ExceptionAdv => {
                Some(Pos::Adv)
            }
            ContentTypeKey::Sense => None,
        }
    }

    pub fn for_pos(kind: DataKind, pos: Pos) -> Option<ContentTypeKey> {
        ContentTypeKey::ALL
            .into_iter()
            .find(|k| k.data_kind() == kind && k.pos() == Some(pos))
    }

    /// Filename hints a candidate file's lowercased name must all contain.
    pub fn filename_hints(self) -> Vec<&'static str> {
        let mut hints = vec![self.data_kind().hint()];
        if let Some(pos) = self.pos() {
            hints.extend(pos.filename_hints());
        }
        hints
    }
}

fn default_comparator(kind: DataKind) -> Arc<dyn LineComparator> {
    match kind {
        DataKind::Index => Arc::new(IndexComparator::default()),
        DataKind::Data => Arc::new(DataComparator),
        DataKind::Exception => Arc::new(ExceptionComparator),
        DataKind::Sense => Arc::new(SenseKeyComparator::default()),
    }
}

/// A content type: the bundle of parser-selection, comparator, and charset
/// governing one file. `pub(crate)` since callers only observe it through
/// [`ContentTypeRegistry`] accessors.
#[derive(Clone)]
pub struct ContentType {
    pub key: ContentTypeKey,
    pub comparator: Arc<dyn LineComparator>,
    pub charset: Charset,
}

static DEFAULT_CHARSET: Charset = Charset::Utf8;

/// The process's content-type table, mutable only while closed.
pub struct ContentTypeRegistry {
    entries: HashMap<ContentTypeKey, ContentType>,
    open: bool,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        let entries = ContentTypeKey::ALL
            .into_iter()
            .map(|key| {
                (
                    key,
                    ContentType {
                        key,
                        comparator: default_comparator(key.data_kind()),
                        charset: DEFAULT_CHARSET,
                    },
                )
            })
            .collect();
        Self { entries, open: false }
    }

    pub(crate) fn mark_open(&mut self) {
        self.open = true;
    }

    pub(crate) fn mark_closed(&mut self) {
        self.open = false;
    }

    pub fn get(&self, key: ContentTypeKey) -> &ContentType {
        self.entries.get(&key).expect("all keys are pre-populated")
    }

    pub fn get_index(&self, pos: Pos) -> &ContentType {
        self.get(ContentTypeKey::for_pos(DataKind::Index, pos).expect("index content type exists for every pos"))
    }

    pub fn get_data(&self, pos: Pos) -> &ContentType {
        self.get(ContentTypeKey::for_pos(DataKind::Data, pos).expect("data content type exists for every pos"))
    }

    pub fn get_exception(&self, pos: Pos) -> &ContentType {
        self.get(
            ContentTypeKey::for_pos(DataKind::Exception, pos).expect("exception content type exists for every pos"),
        )
    }

    pub fn set_comparator(&mut self, key: ContentTypeKey, comparator: Arc<dyn LineComparator>) -> Result<()> {
        if self.open {
            return Err(DbError::ObjectOpen);
        }
        self.entries.get_mut(&key).expect("all keys are pre-populated").comparator = comparator;
        Ok(())
    }

    pub fn set_charset(&mut self, key: ContentTypeKey, charset: Charset) -> Result<()> {
        if self.open {
            return Err(DbError::ObjectOpen);
        }
        self.entries.get_mut(&key).expect("all keys are pre-populated").charset = charset;
        Ok(())
    }
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_by_pos() {
        let registry = ContentTypeRegistry::new();
        let ct = registry.get_index(Pos::Noun);
        assert_eq!(ct.key, ContentTypeKey::IndexNoun);
    }

    #[test]
    fn filename_hints_combine_kind_and_pos() {
        let hints = ContentTypeKey::DataVerb.filename_hints();
        assert_eq!(hints, vec!["data", "verb"]);
    }

    #[test]
    fn comparator_override_rejected_while_open() {
        let mut registry = ContentTypeRegistry::new();
        registry.mark_open();
        let err = registry
            .set_charset(ContentTypeKey::DataNoun, Charset::Latin1)
            .unwrap_err();
        assert!(matches!(err, DbError::ObjectOpen));
    }
}
