use once_cell::sync::Lazy;
use std::sync::Mutex;

use crate::pos::Pos;

/// A named, numbered partition of the dictionary (e.g. `noun.animal`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexicalFile {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub pos: Option<Pos>,
}

/// Cached descriptor for a lexical-file number outside the known catalogue.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLexicalFile {
    pub number: u8,
}

impl UnknownLexicalFile {
    pub fn name(&self) -> String {
        format!("unknown.{:02}", self.number)
    }
}

macro_rules! lexfile {
    ($number:expr, $name:expr, $desc:expr, $pos:expr) => {
        LexicalFile {
            number: $number,
            name: $name,
            description: $desc,
            pos: $pos,
        }
    };
}

/// The fixed 45-entry WordNet lexicographer-file catalogue (numbers 0..44).
const CATALOG: &[LexicalFile] = &[
    lexfile!(0, "adj.all", "all adjective clusters", Some(Pos::Adj)),
    lexfile!(1, "adj.pert", "relational adjectives (pertainyms)", Some(Pos::Adj)),
    lexfile!(2, "adv.all", "all adverbs", Some(Pos::Adv)),
    lexfile!(3, "noun.Tops", "unique beginner for nouns", Some(Pos::Noun)),
    lexfile!(4, "noun.act", "nouns denoting acts or actions", Some(Pos::Noun)),
    lexfile!(5, "noun.animal", "nouns denoting animals", Some(Pos::Noun)),
    lexfile!(6, "noun.artifact", "nouns denoting man-made objects", Some(Pos::Noun)),
    lexfile!(7, "noun.attribute", "nouns denoting attributes of people and objects", Some(Pos::Noun)),
    lexfile!(8, "noun.body", "nouns denoting body parts", Some(Pos::Noun)),
    lexfile!(9, "noun.cognition", "nouns denoting cognitive processes and contents", Some(Pos::Noun)),
    lexfile!(10, "noun.communication", "nouns denoting communicative processes and contents", Some(Pos::Noun)),
    lexfile!(11, "noun.event", "nouns denoting natural events", Some(Pos::Noun)),
    lexfile!(12, "noun.feeling", "nouns denoting feelings and emotions", Some(Pos::Noun)),
    lexfile!(13, "noun.food", "nouns denoting foods and drinks", Some(Pos::Noun)),
    lexfile!(14, "noun.group", "nouns denoting groupings of people or objects", Some(Pos::Noun)),
    lexfile!(15, "noun.location", "nouns denoting spatial position", Some(Pos::Noun)),
    lexfile!(16, "noun.motive", "nouns denoting goals", Some(Pos::Noun)),
    lexfile!(17, "noun.object", "nouns denoting natural objects (not man-made)", Some(Pos::Noun)),
    lexfile!(18, "noun.person", "nouns denoting people", Some(Pos::Noun)),
    lexfile!(19, "noun.phenomenon", "nouns denoting natural phenomena", Some(Pos::Noun)),
    lexfile!(20, "noun.plant", "nouns denoting plants", Some(Pos::Noun)),
    lexfile!(21, "noun.possession", "nouns denoting possession and transfer of possession", Some(Pos::Noun)),
    lexfile!(22, "noun.process", "nouns denoting natural processes", Some(Pos::Noun)),
    lexfile!(23, "noun.quantity", "nouns denoting quantities and units of measure", Some(Pos::Noun)),
    lexfile!(24, "noun.relation", "nouns denoting relations between people or things", Some(Pos::Noun)),
    lexfile!(25, "noun.shape", "nouns denoting two- and three-dimensional shapes", Some(Pos::Noun)),
    lexfile!(26, "noun.state", "nouns denoting stable states of affairs", Some(Pos::Noun)),
    lexfile!(27, "noun.substance", "nouns denoting substances", Some(Pos::Noun)),
    lexfile!(28, "noun.time", "nouns denoting time and temporal relations", Some(Pos::Noun)),
    lexfile!(29, "verb.body", "verbs of grooming, dressing, and bodily care", Some(Pos::Verb)),
    lexfile!(30, "verb.change", "verbs of size, temperature change, intensifying, etc.", Some(Pos::Verb)),
    lexfile!(31, "verb.cognition", "verbs of thinking, judging, analyzing, doubting", Some(Pos::Verb)),
    lexfile!(32, "verb.communication", "verbs of telling, asking, ordering, singing", Some(Pos::Verb)),
    lexfile!(33, "verb.competition", "verbs of fighting, athletic activities", Some(Pos::Verb)),
    lexfile!(34, "verb.consumption", "verbs of eating and drinking", Some(Pos::Verb)),
    lexfile!(35, "verb.contact", "verbs of touching, hitting, tying, digging", Some(Pos::Verb)),
    lexfile!(36, "verb.creation", "verbs of sewing, baking, painting, performing", Some(Pos::Verb)),
    lexfile!(37, "verb.emotion", "verbs of feeling", Some(Pos::Verb)),
    lexfile!(38, "verb.motion", "verbs of walking, flying, swimming", Some(Pos::Verb)),
    lexfile!(39, "verb.perception", "verbs of seeing, hearing, feeling", Some(Pos::Verb)),
    lexfile!(40, "verb.possession", "verbs of buying, selling, owning", Some(Pos::Verb)),
    lexfile!(41, "verb.social", "verbs of political and social activities and events", Some(Pos::Verb)),
    lexfile!(42, "verb.stative", "verbs of being, having, spatial relations", Some(Pos::Verb)),
    lexfile!(43, "verb.weather", "verbs of raining, snowing, thawing, thundering", Some(Pos::Verb)),
    lexfile!(44, "adj.ppl", "participial adjectives", Some(Pos::Adj)),
];

/// `lex_filenum` used by satellite-adjective synsets per spec invariant.
pub const ADJ_ALL: u8 = 0;

static UNKNOWN_CACHE: Lazy<Mutex<Vec<UnknownLexicalFile>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Look up a lexical-file descriptor by number. Numbers outside the known
/// catalogue resolve to a dynamically cached "Unknown" descriptor rather
/// than an error, matching real-world corpora that carry stray numbers.
pub fn lookup(number: u8) -> Result<&'static LexicalFile, UnknownLexicalFile> {
    CATALOG
        .iter()
        .find(|f| f.number == number)
        .ok_or_else(|| cache_unknown(number))
}

fn cache_unknown(number: u8) -> UnknownLexicalFile {
    let mut cache = UNKNOWN_CACHE.lock().expect("lexfile unknown cache poisoned");
    if let Some(existing) = cache.iter().find(|u| u.number == number) {
        return existing.clone();
    }
    let entry = UnknownLexicalFile { number };
    cache.push(entry.clone());
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_45_entries_numbered_0_to_44() {
        assert_eq!(CATALOG.len(), 45);
        for (i, entry) in CATALOG.iter().enumerate() {
            assert_eq!(entry.number as usize, i);
        }
    }

    #[test]
    fn known_number_resolves() {
        let entry = lookup(5).unwrap();
        assert_eq!(entry.name, "noun.animal");
        assert_eq!(entry.pos, Some(Pos::Noun));
    }

    #[test]
    fn unknown_number_is_cached_and_stable() {
        let a = lookup(200).unwrap_err();
        let b = lookup(200).unwrap_err();
        assert_eq!(a, b);
        assert_eq!(a.name(), "unknown.200");
    }
}
