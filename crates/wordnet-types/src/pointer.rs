use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::pos::Pos;

/// A labeled, directed relation between two synsets (semantic) or two
/// word senses (lexical). Carries the on-disk symbol and a human name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PointerKind {
    pub symbol: &'static str,
    pub name: &'static str,
}

/// All non-ambiguous pointer symbols, in the encoding WordNet's `data.*`
/// files use. `\` is deliberately absent here — see [`pointer_kind`].
const CATALOG: &[PointerKind] = &[
    PointerKind { symbol: "!", name: "antonym" },
    PointerKind { symbol: "@", name: "hypernym" },
    PointerKind { symbol: "@i", name: "instance_hypernym" },
    PointerKind { symbol: "~", name: "hyponym" },
    PointerKind { symbol: "~i", name: "instance_hyponym" },
    PointerKind { symbol: "#m", name: "member_holonym" },
    PointerKind { symbol: "#s", name: "substance_holonym" },
    PointerKind { symbol: "#p", name: "part_holonym" },
    PointerKind { symbol: "%m", name: "member_meronym" },
    PointerKind { symbol: "%s", name: "substance_meronym" },
    PointerKind { symbol: "%p", name: "part_meronym" },
    PointerKind { symbol: "=", name: "attribute" },
    PointerKind { symbol: "+", name: "derivationally_related_form" },
    PointerKind { symbol: ";c", name: "domain_of_synset_topic" },
    PointerKind { symbol: "-c", name: "member_of_domain_topic" },
    PointerKind { symbol: ";r", name: "domain_of_synset_region" },
    PointerKind { symbol: "-r", name: "member_of_domain_region" },
    PointerKind { symbol: ";u", name: "domain_of_synset_usage" },
    PointerKind { symbol: "-u", name: "member_of_domain_usage" },
    PointerKind { symbol: "*", name: "entailment" },
    PointerKind { symbol: ">", name: "cause" },
    PointerKind { symbol: "^", name: "also_see" },
    PointerKind { symbol: "$", name: "verb_group" },
    PointerKind { symbol: "&", name: "similar_to" },
    PointerKind { symbol: "<", name: "participle_of_verb" },
];

const PERTAINYM: PointerKind = PointerKind { symbol: "\\", name: "pertainym" };
const DERIVED_FROM_ADJ: PointerKind = PointerKind {
    symbol: "\\",
    name: "derived_from_adjective",
};

/// `similar_to`, used to locate an adjective satellite's cluster head.
pub const SIMILAR_TO: &str = "&";

static BY_SYMBOL: Lazy<HashMap<&'static str, PointerKind>> =
    Lazy::new(|| CATALOG.iter().map(|p| (p.symbol, *p)).collect());

/// Resolve a pointer symbol to its kind. `\` is ambiguous and resolved using
/// the part-of-speech of the *source* synset per spec: pertainym for
/// adjectives, "derived from adjective" for adverbs.
pub fn pointer_kind(symbol: &str, source_pos: Pos) -> Option<PointerKind> {
    if symbol == "\\" {
        return Some(match source_pos {
            Pos::Adj => PERTAINYM,
            Pos::Adv => DERIVED_FROM_ADJ,
            _ => PERTAINYM,
        });
    }
    BY_SYMBOL.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pertainym_ambiguity_is_pos_aware() {
        assert_eq!(pointer_kind("\\", Pos::Adj).unwrap().name, "pertainym");
        assert_eq!(
            pointer_kind("\\", Pos::Adv).unwrap().name,
            "derived_from_adjective"
        );
    }

    #[test]
    fn known_symbols_resolve() {
        assert_eq!(pointer_kind("@", Pos::Noun).unwrap().name, "hypernym");
        assert_eq!(
            pointer_kind("~i", Pos::Noun).unwrap().name,
            "instance_hyponym"
        );
    }

    #[test]
    fn unknown_symbol_is_none() {
        assert!(pointer_kind("???", Pos::Noun).is_none());
    }
}
