use std::fmt;

use crate::error::{Result, TypesError};
use crate::pos::Pos;

/// `(offset, pos)` pair uniquely identifying a synset within the WordNet
/// files. `offset` is bound to `[0, 99_999_999]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SynsetId {
    pub offset: u32,
    pub pos: Pos,
}

impl SynsetId {
    pub const MAX_OFFSET: u32 = 99_999_999;

    pub fn new(offset: u32, pos: Pos) -> Result<Self> {
        if offset > Self::MAX_OFFSET {
            return Err(TypesError::InvalidArgument(format!(
                "synset offset {offset} exceeds {}",
                Self::MAX_OFFSET
            )));
        }
        Ok(Self { offset, pos })
    }

    /// Eight-digit zero-padded decimal offset, as written in `data.*` files.
    pub fn offset_string(&self) -> String {
        format!("{:08}", self.offset)
    }
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SID-{:08}-{}", self.offset, self.pos.upper_tag())
    }
}

impl std::str::FromStr for SynsetId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("SID-")
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let (offset_str, tag_str) = rest
            .split_once('-')
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        if offset_str.len() != 8 {
            return Err(TypesError::MalformedId(s.to_string()));
        }
        let offset: u32 = offset_str
            .parse()
            .map_err(|_| TypesError::MalformedId(s.to_string()))?;
        let tag = tag_str
            .chars()
            .next()
            .filter(|_| tag_str.len() == 1)
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let pos = Pos::from_char(tag.to_ascii_lowercase())
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        SynsetId::new(offset, pos)
    }
}

/// A word number within a synset, `1..=255`, or unknown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WordNumber {
    Known(u8),
    Unknown,
}

impl WordNumber {
    fn matches(self, other: WordNumber) -> bool {
        match (self, other) {
            (WordNumber::Unknown, _) | (_, WordNumber::Unknown) => true,
            (WordNumber::Known(a), WordNumber::Known(b)) => a == b,
        }
    }
}

/// The identity of one lemma within a synset.
///
/// Three variants mirror the three ways a caller may name a sense: by its
/// 1-based ordinal within the synset, by its lemma text, or both. Equality on
/// the lemma component is case-insensitive; equality on the number component
/// treats [`WordNumber::Unknown`] (serialized as `-1`) as a wildcard that
/// compares equal to any number.
#[derive(Clone, Debug)]
pub enum WordId {
    ByNumber { synset: SynsetId, number: u8 },
    ByLemma { synset: SynsetId, lemma: String },
    Both {
        synset: SynsetId,
        number: u8,
        lemma: String,
    },
}

impl WordId {
    pub fn by_number(synset: SynsetId, number: u8) -> Result<Self> {
        if number == 0 {
            return Err(TypesError::InvalidArgument(
                "word number must be in 1..=255".into(),
            ));
        }
        Ok(Self::ByNumber { synset, number })
    }

    pub fn by_lemma(synset: SynsetId, lemma: impl Into<String>) -> Result<Self> {
        let lemma = lemma.into().trim().to_string();
        if lemma.is_empty() {
            return Err(TypesError::InvalidArgument("lemma must not be empty".into()));
        }
        Ok(Self::ByLemma { synset, lemma })
    }

    pub fn both(synset: SynsetId, number: u8, lemma: impl Into<String>) -> Result<Self> {
        if number == 0 {
            return Err(TypesError::InvalidArgument(
                "word number must be in 1..=255".into(),
            ));
        }
        let lemma = lemma.into().trim().to_string();
        if lemma.is_empty() {
            return Err(TypesError::InvalidArgument("lemma must not be empty".into()));
        }
        Ok(Self::Both {
            synset,
            number,
            lemma,
        })
    }

    pub fn synset(&self) -> SynsetId {
        match self {
            WordId::ByNumber { synset, .. }
            | WordId::ByLemma { synset, .. }
            | WordId::Both { synset, .. } => *synset,
        }
    }

    pub fn number(&self) -> WordNumber {
        match self {
            WordId::ByNumber { number, .. } | WordId::Both { number, .. } => {
                WordNumber::Known(*number)
            }
            WordId::ByLemma { .. } => WordNumber::Unknown,
        }
    }

    pub fn lemma(&self) -> Option<&str> {
        match self {
            WordId::ByLemma { lemma, .. } | WordId::Both { lemma, .. } => Some(lemma.as_str()),
            WordId::ByNumber { .. } => None,
        }
    }
}

impl PartialEq for WordId {
    fn eq(&self, other: &Self) -> bool {
        if self.synset() != other.synset() {
            return false;
        }
        if !self.number().matches(other.number()) {
            return false;
        }
        match (self.lemma(), other.lemma()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            // Missing lemma on either side is a wildcard, same as WordNumber::Unknown.
            _ => true,
        }
    }
}
impl Eq for WordId {}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let synset = self.synset();
        let number = match self.number() {
            WordNumber::Known(n) => format!("{n:02X}"),
            WordNumber::Unknown => "??".to_string(),
        };
        let lemma = self.lemma().unwrap_or("?");
        write!(
            f,
            "WID-{:08}-{}-{}-{}",
            synset.offset,
            synset.pos.upper_tag(),
            number,
            lemma
        )
    }
}

impl std::str::FromStr for WordId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("WID-")
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let mut parts = rest.splitn(4, '-');
        let offset_str = parts.next().ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let tag_str = parts.next().ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let number_str = parts.next().ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let lemma_str = parts.next().ok_or_else(|| TypesError::MalformedId(s.to_string()))?;

        if offset_str.len() != 8 {
            return Err(TypesError::MalformedId(s.to_string()));
        }
        let offset: u32 = offset_str
            .parse()
            .map_err(|_| TypesError::MalformedId(s.to_string()))?;
        let tag = tag_str
            .chars()
            .next()
            .filter(|_| tag_str.len() == 1)
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let pos = Pos::from_char(tag.to_ascii_lowercase())
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let synset = SynsetId::new(offset, pos)?;

        let number = if number_str == "??" {
            None
        } else {
            Some(
                u8::from_str_radix(number_str, 16)
                    .map_err(|_| TypesError::MalformedId(s.to_string()))?,
            )
        };
        let lemma = if lemma_str == "?" {
            None
        } else {
            Some(lemma_str.to_string())
        };

        match (number, lemma) {
            (Some(n), Some(l)) => WordId::both(synset, n, l),
            (Some(n), None) => WordId::by_number(synset, n),
            (None, Some(l)) => WordId::by_lemma(synset, l),
            (None, None) => Err(TypesError::MalformedId(s.to_string())),
        }
    }
}

/// The identity of an exception-list entry: its surface form and POS.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExceptionEntryId {
    pub surface: String,
    pub pos: Pos,
}

impl ExceptionEntryId {
    pub fn new(surface: impl Into<String>, pos: Pos) -> Result<Self> {
        let surface = surface.into().trim().to_lowercase();
        if surface.is_empty() {
            return Err(TypesError::InvalidArgument(
                "surface form must not be empty".into(),
            ));
        }
        Ok(Self { surface, pos })
    }
}

impl fmt::Display for ExceptionEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EID-{}-{}", self.surface, self.pos.to_char())
    }
}

impl std::str::FromStr for ExceptionEntryId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("EID-")
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let (surface, tag) = rest
            .rsplit_once('-')
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let pos = tag
            .chars()
            .next()
            .filter(|_| tag.len() == 1)
            .and_then(Pos::from_char)
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        ExceptionEntryId::new(surface, pos)
    }
}

/// The identity of an index-word entry: its normalized lemma and POS.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IndexWordId {
    pub lemma: String,
    pub pos: Pos,
}

impl IndexWordId {
    pub fn new(lemma: impl Into<String>, pos: Pos) -> Result<Self> {
        let lemma = normalize_lemma(&lemma.into());
        if lemma.is_empty() {
            return Err(TypesError::InvalidArgument("lemma must not be empty".into()));
        }
        Ok(Self { lemma, pos })
    }
}

impl fmt::Display for IndexWordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XID-{}-{}", self.lemma, self.pos.to_char())
    }
}

impl std::str::FromStr for IndexWordId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("XID-")
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let (lemma, tag) = rest
            .rsplit_once('-')
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let pos = tag
            .chars()
            .next()
            .filter(|_| tag.len() == 1)
            .and_then(Pos::from_char)
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        IndexWordId::new(lemma, pos)
    }
}

/// Lowercase, trim, and fold internal whitespace into underscores the way
/// WordNet index files encode multi-word lemmas.
pub fn normalize_lemma(text: &str) -> String {
    text.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synset_id_round_trips() {
        let id = SynsetId::new(1740, Pos::Noun).unwrap();
        assert_eq!(id.to_string(), "SID-00001740-N");
        assert_eq!("SID-00001740-N".parse::<SynsetId>().unwrap(), id);
    }

    #[test]
    fn word_id_variants_round_trip() {
        let synset = SynsetId::new(1740, Pos::Noun).unwrap();
        let by_number = WordId::by_number(synset, 2).unwrap();
        assert_eq!(by_number.to_string(), "WID-00001740-N-02-?");
        assert_eq!(by_number.to_string().parse::<WordId>().unwrap(), by_number);

        let by_lemma = WordId::by_lemma(synset, "dog").unwrap();
        assert_eq!(by_lemma.to_string(), "WID-00001740-N-??-dog");
        assert_eq!(by_lemma.to_string().parse::<WordId>().unwrap(), by_lemma);

        let both = WordId::both(synset, 2, "dog").unwrap();
        assert_eq!(both.to_string(), "WID-00001740-N-02-dog");
    }

    #[test]
    fn word_id_equality_treats_unknown_as_wildcard() {
        let synset = SynsetId::new(1740, Pos::Noun).unwrap();
        let by_number = WordId::by_number(synset, 2).unwrap();
        let by_lemma = WordId::by_lemma(synset, "dog").unwrap();
        assert_eq!(by_number, by_lemma);
    }

    #[test]
    fn word_id_equality_is_case_insensitive_on_lemma() {
        let synset = SynsetId::new(1740, Pos::Noun).unwrap();
        assert_eq!(
            WordId::by_lemma(synset, "Dog").unwrap(),
            WordId::by_lemma(synset, "dog").unwrap()
        );
    }

    #[test]
    fn exception_entry_id_round_trips() {
        let id = ExceptionEntryId::new("dogs", Pos::Noun).unwrap();
        assert_eq!(id.to_string(), "EID-dogs-n");
        assert_eq!("EID-dogs-n".parse::<ExceptionEntryId>().unwrap(), id);
    }

    #[test]
    fn index_word_id_normalizes_whitespace() {
        let id = IndexWordId::new("dog day", Pos::Noun).unwrap();
        assert_eq!(id.lemma, "dog_day");
        assert_eq!(id.to_string(), "XID-dog_day-n");
    }
}
