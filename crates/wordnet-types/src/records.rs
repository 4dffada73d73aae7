use std::collections::HashSet;

use crate::error::{Result, TypesError};
use crate::ids::{IndexWordId, SynsetId, WordId};
use crate::lexfile::{self, LexicalFile, UnknownLexicalFile, ADJ_ALL};
use crate::pos::Pos;
use crate::sense_key::SenseKey;

/// Either a cataloged lexical file or a dynamically cached unknown one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LexFileRef {
    Known(&'static LexicalFile),
    Unknown(UnknownLexicalFile),
}

impl LexFileRef {
    pub fn resolve(number: u8) -> Self {
        match lexfile::lookup(number) {
            Ok(known) => LexFileRef::Known(known),
            Err(unknown) => LexFileRef::Unknown(unknown),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            LexFileRef::Known(f) => f.number,
            LexFileRef::Unknown(u) => u.number,
        }
    }

    pub fn name(&self) -> String {
        match self {
            LexFileRef::Known(f) => f.name.to_string(),
            LexFileRef::Unknown(u) => u.name(),
        }
    }
}

/// A lexical pointer from one source word index to one target word index
/// within the target synset (1-based), decoded from a data line's `SSTT`
/// nibble pair.
#[derive(Clone, Debug)]
pub struct LexicalPointer {
    pub symbol: String,
    pub target_synset: SynsetId,
    pub source_word_number: u8,
    pub target_word_number: u8,
}

/// A semantic (synset-to-synset) pointer.
#[derive(Clone, Debug)]
pub struct SemanticPointer {
    pub symbol: String,
    pub target: SynsetId,
}

/// One member of a synset.
#[derive(Clone, Debug)]
pub struct Word {
    pub lemma: String,
    pub lex_id: u8,
    /// Parenthesized adjective marker, e.g. `(ip)`; only present when the
    /// synset's part-of-speech is [`Pos::Adj`].
    pub adjective_marker: Option<String>,
    /// Verb-frame numbers applicable to this word (frame entries whose
    /// `word` field was `0` apply to every word and are expanded here).
    pub verb_frames: Vec<u8>,
    pub lexical_pointers: Vec<LexicalPointer>,
}

/// A fully parsed synset record.
#[derive(Clone, Debug)]
pub struct Synset {
    pub id: SynsetId,
    pub lex_file: LexFileRef,
    pub is_satellite: bool,
    pub is_adjective_head: bool,
    pub gloss: String,
    pub words: Vec<Word>,
    pub semantic_pointers: Vec<SemanticPointer>,
}

impl Synset {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SynsetId,
        lex_file: LexFileRef,
        is_satellite: bool,
        is_adjective_head: bool,
        gloss: impl Into<String>,
        words: Vec<Word>,
        semantic_pointers: Vec<SemanticPointer>,
    ) -> Result<Self> {
        if words.is_empty() {
            return Err(TypesError::InvalidArgument(
                "synset must have at least one member word".into(),
            ));
        }
        if is_satellite && lex_file.number() != ADJ_ALL {
            return Err(TypesError::InvalidArgument(
                "adjective-satellite synsets must use lexical file 0 (adj.all)".into(),
            ));
        }
        if is_satellite && is_adjective_head {
            return Err(TypesError::InvalidArgument(
                "a synset cannot be both a satellite and a cluster head".into(),
            ));
        }
        if id.pos != Pos::Adj {
            for word in &words {
                if word.adjective_marker.is_some() {
                    return Err(TypesError::InvalidArgument(
                        "adjective markers are only valid on adjective synsets".into(),
                    ));
                }
            }
        }
        Ok(Self {
            id,
            lex_file,
            is_satellite,
            is_adjective_head,
            gloss: gloss.into(),
            words,
            semantic_pointers,
        })
    }
}

/// One entry of an `index.*` file: a lemma's senses, pointer-kind summary,
/// and tag-sense count.
#[derive(Clone, Debug)]
pub struct IndexWord {
    pub id: IndexWordId,
    pub tag_sense_count: u32,
    pub word_ids: Vec<WordId>,
    pub pointer_symbols: HashSet<String>,
}

impl IndexWord {
    pub fn new(
        id: IndexWordId,
        tag_sense_count: u32,
        word_ids: Vec<WordId>,
        pointer_symbols: HashSet<String>,
    ) -> Result<Self> {
        if word_ids.is_empty() {
            return Err(TypesError::InvalidArgument(
                "index word must reference at least one synset".into(),
            ));
        }
        Ok(Self {
            id,
            tag_sense_count,
            word_ids,
            pointer_symbols,
        })
    }
}

/// One entry of `index.sense`/`sense.index`.
#[derive(Clone, Debug)]
pub struct SenseEntry {
    pub sense_key: SenseKey,
    pub synset_offset: u32,
    pub sense_number: u32,
    pub tag_count: u32,
}

/// A surface form mapped to one or more candidate root forms, as read from
/// a `*.exc` file, before a part-of-speech has been attached.
#[derive(Clone, Debug)]
pub struct ExceptionEntryProxy {
    pub surface_form: String,
    pub root_forms: Vec<String>,
}

/// A complete exception-list entry (surface form + roots + POS).
#[derive(Clone, Debug)]
pub struct ExceptionEntry {
    pub surface_form: String,
    pub pos: Pos,
    pub root_forms: Vec<String>,
}

impl ExceptionEntry {
    pub fn from_proxy(proxy: ExceptionEntryProxy, pos: Pos) -> Result<Self> {
        if proxy.root_forms.iter().any(|r| r.trim().is_empty()) {
            return Err(TypesError::InvalidArgument(
                "exception root forms must not be blank".into(),
            ));
        }
        Ok(Self {
            surface_form: proxy.surface_form,
            pos,
            root_forms: proxy.root_forms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(lemma: &str) -> Word {
        Word {
            lemma: lemma.to_string(),
            lex_id: 0,
            adjective_marker: None,
            verb_frames: Vec::new(),
            lexical_pointers: Vec::new(),
        }
    }

    #[test]
    fn synset_requires_nonempty_members() {
        let id = SynsetId::new(1, Pos::Noun).unwrap();
        let err = Synset::new(
            id,
            LexFileRef::resolve(5),
            false,
            false,
            "gloss",
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TypesError::InvalidArgument(_)));
    }

    #[test]
    fn satellite_must_use_adj_all_lexfile() {
        let id = SynsetId::new(1, Pos::Adj).unwrap();
        let err = Synset::new(
            id,
            LexFileRef::resolve(1),
            true,
            false,
            "gloss",
            vec![word("x")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TypesError::InvalidArgument(_)));
    }

    #[test]
    fn satellite_and_head_are_mutually_exclusive() {
        let id = SynsetId::new(1, Pos::Adj).unwrap();
        let err = Synset::new(
            id,
            LexFileRef::resolve(0),
            true,
            true,
            "gloss",
            vec![word("x")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TypesError::InvalidArgument(_)));
    }

    #[test]
    fn adjective_marker_rejected_outside_adjectives() {
        let id = SynsetId::new(1, Pos::Noun).unwrap();
        let mut w = word("x");
        w.adjective_marker = Some("ip".into());
        let err = Synset::new(id, LexFileRef::resolve(5), false, false, "gloss", vec![w], Vec::new())
            .unwrap_err();
        assert!(matches!(err, TypesError::InvalidArgument(_)));
    }
}
