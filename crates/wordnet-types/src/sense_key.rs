use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Result, TypesError};
use crate::ids::normalize_lemma;
use crate::pos::Pos;

/// The canonical cross-reference for a word sense across files.
///
/// Every field is immutable once constructed except the head lemma/lexical-id
/// pair on an adjective-satellite key, which may be set exactly once after
/// construction via [`SenseKey::set_head`] — the head is only discoverable by
/// consulting the synset the satellite points to (see `wordnet-dict`'s
/// lazy/eager head-resolution strategies).
#[derive(Debug)]
pub struct SenseKey {
    lemma: String,
    pos: Pos,
    lex_filenum: u8,
    lex_id: u8,
    is_satellite: bool,
    head: OnceLock<(String, u8)>,
}

impl SenseKey {
    pub fn new(
        lemma: impl Into<String>,
        pos: Pos,
        lex_filenum: u8,
        lex_id: u8,
        is_satellite: bool,
    ) -> Result<Self> {
        let lemma = normalize_lemma(&lemma.into());
        if lemma.is_empty() {
            return Err(TypesError::InvalidArgument("lemma must not be empty".into()));
        }
        if lex_filenum > 99 {
            return Err(TypesError::InvalidArgument(format!(
                "lexical file number {lex_filenum} out of range [0,99]"
            )));
        }
        if lex_id > 15 {
            return Err(TypesError::InvalidArgument(format!(
                "lexical id {lex_id} out of range [0,15]"
            )));
        }
        Ok(Self {
            lemma,
            pos,
            lex_filenum,
            lex_id,
            is_satellite,
            head: OnceLock::new(),
        })
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn lex_filenum(&self) -> u8 {
        self.lex_filenum
    }

    pub fn lex_id(&self) -> u8 {
        self.lex_id
    }

    pub fn is_satellite(&self) -> bool {
        self.is_satellite
    }

    pub fn head(&self) -> Option<(&str, u8)> {
        self.head.get().map(|(lemma, id)| (lemma.as_str(), *id))
    }

    /// `ss_type` numeric code: 1=noun, 2=verb, 3=adj, 4=adv, 5=adj-satellite.
    pub fn ss_type(&self) -> u8 {
        if self.is_satellite {
            5
        } else {
            self.pos.to_code()
        }
    }

    /// Set the head lemma/lexical-id for an adjective-satellite key. Errors
    /// if the key is not a satellite, or if the head was already set.
    pub fn set_head(&self, head_lemma: impl Into<String>, head_lex_id: u8) -> Result<()> {
        if !self.is_satellite {
            return Err(TypesError::InvalidArgument(
                "only adjective-satellite sense keys carry a head".into(),
            ));
        }
        let head_lemma = normalize_lemma(&head_lemma.into());
        self.head
            .set((head_lemma, head_lex_id))
            .map_err(|_| TypesError::Immutable("sense key head is already set"))
    }
}

impl Clone for SenseKey {
    fn clone(&self) -> Self {
        let cloned = Self {
            lemma: self.lemma.clone(),
            pos: self.pos,
            lex_filenum: self.lex_filenum,
            lex_id: self.lex_id,
            is_satellite: self.is_satellite,
            head: OnceLock::new(),
        };
        if let Some((lemma, id)) = self.head.get() {
            let _ = cloned.head.set((lemma.clone(), *id));
        }
        cloned
    }
}

impl PartialEq for SenseKey {
    fn eq(&self, other: &Self) -> bool {
        self.lemma == other.lemma
            && self.ss_type() == other.ss_type()
            && self.lex_filenum == other.lex_filenum
            && self.lex_id == other.lex_id
            && self.head() == other.head()
    }
}
impl Eq for SenseKey {}

impl PartialOrd for SenseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SenseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lemma
            .cmp(&other.lemma)
            .then_with(|| self.ss_type().cmp(&other.ss_type()))
            .then_with(|| self.lex_filenum.cmp(&other.lex_filenum))
            .then_with(|| self.lex_id.cmp(&other.lex_id))
            .then_with(|| self.is_satellite.cmp(&other.is_satellite))
            .then_with(|| {
                let a = self.head().map(|(l, _)| l.to_string()).unwrap_or_default();
                let b = other.head().map(|(l, _)| l.to_string()).unwrap_or_default();
                a.cmp(&b)
            })
            .then_with(|| {
                let a = self.head().map(|(_, i)| i).unwrap_or(0);
                let b = other.head().map(|(_, i)| i).unwrap_or(0);
                a.cmp(&b)
            })
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head_lemma, head_id) = match self.head() {
            Some((lemma, id)) => (lemma.to_string(), format!("{id:02}")),
            None => (String::new(), String::new()),
        };
        write!(
            f,
            "{}%{}:{:02}:{:02}:{}:{}",
            self.lemma,
            self.ss_type(),
            self.lex_filenum,
            self.lex_id,
            head_lemma,
            head_id
        )
    }
}

impl std::str::FromStr for SenseKey {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let (lemma, rest) = s
            .split_once('%')
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let mut fields = rest.splitn(5, ':');
        let ss_type: u8 = fields
            .next()
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?
            .parse()
            .map_err(|_| TypesError::MalformedId(s.to_string()))?;
        let lex_filenum: u8 = fields
            .next()
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?
            .parse()
            .map_err(|_| TypesError::MalformedId(s.to_string()))?;
        let lex_id: u8 = fields
            .next()
            .ok_or_else(|| TypesError::MalformedId(s.to_string()))?
            .parse()
            .map_err(|_| TypesError::MalformedId(s.to_string()))?;
        let head_lemma = fields.next().unwrap_or("");
        let head_id = fields.next().unwrap_or("");

        let is_satellite = ss_type == 5;
        let pos = Pos::from_code(ss_type).ok_or_else(|| TypesError::MalformedId(s.to_string()))?;
        let key = SenseKey::new(lemma, pos, lex_filenum, lex_id, is_satellite)?;
        if is_satellite && !head_lemma.is_empty() {
            let head_id: u8 = head_id
                .parse()
                .map_err(|_| TypesError::MalformedId(s.to_string()))?;
            key.set_head(head_lemma, head_id)?;
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_satellite_round_trips() {
        let key = SenseKey::new("dog", Pos::Noun, 5, 0, false).unwrap();
        assert_eq!(key.to_string(), "dog%1:05:00::");
        assert_eq!(key.to_string().parse::<SenseKey>().unwrap(), key);
    }

    #[test]
    fn satellite_round_trips_once_head_is_set() {
        let key = SenseKey::new("beautiful", Pos::Adj, 0, 0, true).unwrap();
        key.set_head("pretty", 1).unwrap();
        assert_eq!(key.to_string(), "beautiful%5:00:00:pretty:01");
        assert_eq!(key.to_string().parse::<SenseKey>().unwrap(), key);
    }

    #[test]
    fn head_can_only_be_set_once() {
        let key = SenseKey::new("beautiful", Pos::Adj, 0, 0, true).unwrap();
        key.set_head("pretty", 1).unwrap();
        assert!(key.set_head("lovely", 2).is_err());
    }

    #[test]
    fn sort_order_prefers_non_satellite_at_equal_prefix() {
        let satellite = SenseKey::new("x", Pos::Adj, 0, 0, true).unwrap();
        let plain = SenseKey::new("x", Pos::Adj, 0, 0, false).unwrap();
        // ss_type differs (3 vs 5) so plain compares less regardless, matching
        // the spec's "non-satellites precede satellites at equal prefix" rule.
        assert!(plain < satellite);
    }
}
