//! Line comparators for the four WordNet file families.
//!
//! Each family's data file is sorted by a different key and a binary search
//! over the raw bytes needs to reproduce that ordering exactly, including the
//! convention that comment lines (two leading spaces) sort before the first
//! real entry. `wordnet-db`'s binary-search data source is generic over
//! [`LineComparator`] so the same descent logic serves all four families.

use std::cmp::Ordering;

/// Recognizes and orders the lines of one WordNet file family.
pub trait LineComparator: Send + Sync {
    /// The sort key a line would compare on, extracted without full parsing.
    fn key<'a>(&self, line: &'a str) -> &'a str;

    /// Compare two already-extracted keys the way the file is sorted on disk.
    fn compare_keys(&self, a: &str, b: &str) -> Ordering;

    /// Compare two whole lines by their extracted keys.
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.compare_keys(self.key(a), self.key(b))
    }

    /// Comment lines (the two-space-indented header convention) always sort
    /// first; a binary search must skip past them before descending.
    fn is_comment(&self, line: &str) -> bool {
        line.starts_with("  ")
    }
}

fn first_token(line: &str) -> &str {
    line.split_ascii_whitespace().next().unwrap_or("")
}

/// Compare only the common-length prefix of `a` and `b`, case-folded: if one
/// is a prefix of the other they compare equal. Used by `getWords` prefix
/// search, where `a` is a candidate line's lemma and `b` is the search prefix.
fn prefix_cmp(a: &str, b: &str) -> Ordering {
    let mut ac = a.chars().flat_map(char::to_lowercase);
    let mut bc = b.chars().flat_map(char::to_lowercase);
    loop {
        match (ac.next(), bc.next()) {
            (None, _) | (_, None) => break Ordering::Equal,
            (Some(x), Some(y)) if x != y => break x.cmp(&y),
            _ => {}
        }
    }
}

/// Orders `index.*` lines by lemma.
#[derive(Clone, Debug)]
pub enum IndexComparator {
    /// Lowercased comparison — the on-disk convention.
    Default,
    /// Raw byte comparison.
    CaseSensitive,
    /// Common-length-prefix comparison, so a search key that is a prefix of a
    /// line's lemma compares equal to it; drives prefix-bounded iteration.
    Search,
}

impl Default for IndexComparator {
    fn default() -> Self {
        Self::Default
    }
}

impl LineComparator for IndexComparator {
    fn key<'a>(&self, line: &'a str) -> &'a str {
        first_token(line)
    }

    fn compare_keys(&self, a: &str, b: &str) -> Ordering {
        match self {
            IndexComparator::Default => a.to_lowercase().cmp(&b.to_lowercase()),
            IndexComparator::CaseSensitive => a.cmp(b),
            IndexComparator::Search => prefix_cmp(a, b),
        }
    }
}

/// Orders `data.*` lines by their eight-digit decimal byte offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataComparator;

impl LineComparator for DataComparator {
    fn key<'a>(&self, line: &'a str) -> &'a str {
        first_token(line)
    }

    fn compare_keys(&self, a: &str, b: &str) -> Ordering {
        // Offsets are fixed-width zero-padded decimal, so lexicographic order
        // agrees with numeric order; fall back to numeric compare for safety
        // against malformed or differently-padded input.
        match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        }
    }
}

/// Orders `*.exc` lines by surface form, case-folded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExceptionComparator;

impl LineComparator for ExceptionComparator {
    fn key<'a>(&self, line: &'a str) -> &'a str {
        first_token(line)
    }

    fn compare_keys(&self, a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

/// Orders `index.sense` lines by the literal sense-key text.
#[derive(Clone, Copy, Debug)]
pub enum SenseKeyComparator {
    /// Case-insensitive comparison — the default.
    CaseInsensitive,
    /// Raw byte comparison.
    CaseSensitive,
    /// Case-insensitive primary order, ties broken by reversed case-sensitive
    /// order (so "Dog" and "dog" are adjacent but deterministically ordered).
    Lexicographic,
}

impl Default for SenseKeyComparator {
    fn default() -> Self {
        Self::CaseInsensitive
    }
}

impl LineComparator for SenseKeyComparator {
    fn key<'a>(&self, line: &'a str) -> &'a str {
        first_token(line)
    }

    fn compare_keys(&self, a: &str, b: &str) -> Ordering {
        match self {
            SenseKeyComparator::CaseInsensitive => a.to_lowercase().cmp(&b.to_lowercase()),
            SenseKeyComparator::CaseSensitive => a.cmp(b),
            SenseKeyComparator::Lexicographic => {
                let primary = a.to_lowercase().cmp(&b.to_lowercase());
                if primary == Ordering::Equal { b.cmp(a) } else { primary }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_comparator_is_case_insensitive_by_default() {
        let cmp = IndexComparator::default();
        assert_eq!(cmp.compare("Dog n 1 0 1 1 2 1740", "dog n 1 0 1 1 2 1740"), Ordering::Equal);
    }

    #[test]
    fn index_comparator_search_matches_prefixes() {
        let cmp = IndexComparator::Search;
        assert_eq!(cmp.compare_keys("dog-eared", "dog"), Ordering::Equal);
        assert_eq!(cmp.compare_keys("cat", "dog"), Ordering::Less);
    }

    #[test]
    fn data_comparator_orders_numerically() {
        let cmp = DataComparator;
        assert_eq!(cmp.compare("00000100 ...", "00001740 ..."), Ordering::Less);
    }

    #[test]
    fn comment_lines_are_detected() {
        let cmp = DataComparator;
        assert!(cmp.is_comment("  1 this WordNet release is from Princeton University"));
        assert!(!cmp.is_comment("00001740 03 n ..."));
    }

    #[test]
    fn sense_key_lexicographic_breaks_ties_on_reversed_case() {
        let cmp = SenseKeyComparator::Lexicographic;
        assert_eq!(cmp.compare_keys("Dog", "dog"), Ordering::Greater);
    }
}
