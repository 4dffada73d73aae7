use once_cell::sync::Lazy;
use regex::Regex;

use crate::content_type::Charset;
use crate::line::read_line;
use wordnet_parse::LineComparator;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\.\d+\b").expect("static regex"));

/// Scan the leading comment block for a version number (e.g. "WordNet 3.0").
/// Returns `None` if no comment line carries a recognizable version.
pub(crate) fn resolve_from_header(
    bytes: &[u8],
    comparator: &dyn LineComparator,
    charset: Charset,
) -> Option<String> {
    let mut pos = 0usize;
    while let Some((line, next)) = read_line(bytes, pos, charset) {
        if !comparator.is_comment(&line) {
            break;
        }
        if let Some(m) = VERSION_PATTERN.find(&line) {
            return Some(m.as_str().to_string());
        }
        pos = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordnet_parse::DataComparator;

    #[test]
    fn extracts_version_from_comment_header() {
        let bytes = b"  1 This is WordNet 3.0 distributed by Princeton University\n00001740 03 n ...\n";
        let version = resolve_from_header(bytes, &DataComparator, Charset::Utf8);
        assert_eq!(version.as_deref(), Some("3.0"));
    }

    #[test]
    fn no_version_found_returns_none() {
        let bytes = b"00001740 03 n ...\n";
        let version = resolve_from_header(bytes, &DataComparator, Charset::Utf8);
        assert!(version.is_none());
    }
}
