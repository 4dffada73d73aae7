//! WordNet morphological stemming (morphy).
//!
//! Two layers, per the classic algorithm:
//!
//! - [`simple_stem`]: pure suffix-rewriting rules, indexed by part of
//!   speech, consulting no dictionary.
//! - [`WordnetStemmer`]: decorates the simple stemmer with exception-list and
//!   index-word lookups against an open [`wordnet_dict::Dictionary`], so
//!   that only real lemmas are returned.
//!
//! # Example
//! ```no_run
//! use wordnet_dict::Dictionary;
//! use wordnet_morphy::WordnetStemmer;
//! use wordnet_types::Pos;
//!
//! # fn main() -> wordnet_morphy::Result<()> {
//! let dict = Dictionary::open("/path/to/wordnet")?;
//! let stemmer = WordnetStemmer::new(&dict);
//! let stems = stemmer.find_stems("running", Pos::Verb)?;
//! # Ok(()) }
//! ```

use std::collections::HashSet;

mod error;
mod rules;

pub use error::{MorphyError, Result};
pub use rules::simple_stem;

use wordnet_dict::Dictionary;
use wordnet_types::{normalize_lemma, Pos};

/// Trim, lowercase, and fold internal whitespace to underscores — the
/// normalization every stemming entry point applies before matching.
pub fn normalize(word: &str) -> String {
    normalize_lemma(word)
}

/// Decorates [`simple_stem`] with exception-list and index-word lookups
/// against an open dictionary.
pub struct WordnetStemmer<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> WordnetStemmer<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Root forms for `word` under `pos`.
    ///
    /// 1. If the (normalized) word is itself an index word, it is included.
    /// 2. If an exception-list entry matches, its root forms are the answer
    ///    (merged with step 1's result) — the simple stemmer is not
    ///    consulted in this case.
    /// 3. Otherwise, every simple-stemmer candidate that is blank or
    ///    whitespace is dropped, and the rest are kept only if they are
    ///    index words.
    /// 4. If nothing survives step 1 or 3, the raw simple-stemmer output is
    ///    returned as a last resort.
    pub fn find_stems(&self, word: &str, pos: Pos) -> Result<Vec<String>> {
        let normalized = normalize(word);
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        if self.dictionary.get_index_word(&normalized, pos)?.is_some() {
            seen.insert(normalized.clone());
            out.push(normalized.clone());
        }

        if let Some(entry) = self.dictionary.get_exception_entry(&normalized, pos)? {
            for root in entry.root_forms {
                if seen.insert(root.clone()) {
                    out.push(root);
                }
            }
            return Ok(out);
        }

        let candidates = simple_stem(&normalized, Some(pos));
        let mut filtered = Vec::new();
        for candidate in &candidates {
            if candidate.trim().is_empty() {
                continue;
            }
            if self.dictionary.get_index_word(candidate, pos)?.is_some() && seen.insert(candidate.clone()) {
                filtered.push(candidate.clone());
            }
        }

        if out.is_empty() && filtered.is_empty() {
            Ok(candidates)
        } else {
            out.extend(filtered);
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write as _;

    fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn seed(dir: &std::path::Path) {
        write_file(
            dir,
            "index.noun",
            "  1 fixture\ndog n 1 0 0 1 1 00000042\ngoose n 1 0 0 1 1 00000100\n",
        );
        write_file(
            dir,
            "data.noun",
            "  1 fixture\n\
             00000042 03 n 01 dog 0 000 | a domesticated canine\n\
             00000100 03 n 01 goose 0 000 | a web-footed bird\n",
        );
        write_file(dir, "noun.exc", "geese goose\n");
        write_file(dir, "index.verb", "  1 fixture\n");
        write_file(dir, "data.verb", "  1 fixture\n");
        write_file(dir, "verb.exc", "");
        write_file(dir, "index.adj", "  1 fixture\n");
        write_file(dir, "data.adj", "  1 fixture\n");
        write_file(dir, "adj.exc", "");
        write_file(dir, "index.adv", "  1 fixture\n");
        write_file(dir, "data.adv", "  1 fixture\n");
        write_file(dir, "adv.exc", "");
        write_file(dir, "index.sense", "");
    }

    #[test]
    fn irregular_plural_resolves_via_exception_list() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let stemmer = WordnetStemmer::new(&dict);
        assert_eq!(stemmer.find_stems("geese", Pos::Noun).unwrap(), vec!["goose".to_string()]);
    }

    #[test]
    fn regular_plural_resolves_via_simple_stemmer() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let stemmer = WordnetStemmer::new(&dict);
        assert_eq!(stemmer.find_stems("dogs", Pos::Noun).unwrap(), vec!["dog".to_string()]);
    }

    #[test]
    fn index_word_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let stemmer = WordnetStemmer::new(&dict);
        assert_eq!(stemmer.find_stems("dog", Pos::Noun).unwrap(), vec!["dog".to_string()]);
    }

    #[test]
    fn unknown_word_falls_back_to_raw_simple_stem_output() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let stemmer = WordnetStemmer::new(&dict);
        let stems = stemmer.find_stems("zzzzes", Pos::Noun).unwrap();
        assert_eq!(stems, simple_stem("zzzzes", Some(Pos::Noun)));
    }
}
