//! The pattern-rule table driving the simple stemmer, indexed by part of
//! speech. This is configuration data, not algorithm: the matching loop in
//! [`simple_stem`] is the same for every row.

use std::collections::HashSet;

use wordnet_types::Pos;

use crate::normalize;

struct Rule {
    suffix: &'static str,
    replacement: &'static str,
    /// A match is discarded if the word also ends with one of these —
    /// e.g. the noun `s`→`""` rule must not turn "glass" into "glas".
    ignore_suffixes: &'static [&'static str],
}

const NOUN_RULES: &[Rule] = &[
    Rule { suffix: "s", replacement: "", ignore_suffixes: &["ss"] },
    Rule { suffix: "ses", replacement: "s", ignore_suffixes: &[] },
    Rule { suffix: "xes", replacement: "x", ignore_suffixes: &[] },
    Rule { suffix: "zes", replacement: "z", ignore_suffixes: &[] },
    Rule { suffix: "ches", replacement: "ch", ignore_suffixes: &[] },
    Rule { suffix: "shes", replacement: "sh", ignore_suffixes: &[] },
    Rule { suffix: "men", replacement: "man", ignore_suffixes: &[] },
    Rule { suffix: "ies", replacement: "y", ignore_suffixes: &[] },
];

const VERB_RULES: &[Rule] = &[
    Rule { suffix: "s", replacement: "", ignore_suffixes: &[] },
    Rule { suffix: "ies", replacement: "y", ignore_suffixes: &[] },
    Rule { suffix: "es", replacement: "e", ignore_suffixes: &[] },
    Rule { suffix: "es", replacement: "", ignore_suffixes: &[] },
    Rule { suffix: "ed", replacement: "e", ignore_suffixes: &[] },
    Rule { suffix: "ed", replacement: "", ignore_suffixes: &[] },
    Rule { suffix: "ing", replacement: "e", ignore_suffixes: &[] },
    Rule { suffix: "ing", replacement: "", ignore_suffixes: &[] },
];

const ADJ_RULES: &[Rule] = &[
    Rule { suffix: "er", replacement: "", ignore_suffixes: &[] },
    Rule { suffix: "er", replacement: "e", ignore_suffixes: &[] },
    Rule { suffix: "est", replacement: "", ignore_suffixes: &[] },
    Rule { suffix: "est", replacement: "e", ignore_suffixes: &[] },
];

fn rules_for(pos: Pos) -> &'static [Rule] {
    match pos {
        Pos::Noun => NOUN_RULES,
        Pos::Verb => VERB_RULES,
        Pos::Adj | Pos::Adv => ADJ_RULES,
    }
}

fn apply(word: &str, rule: &Rule) -> Option<String> {
    let stem = word.strip_suffix(rule.suffix)?;
    if rule.ignore_suffixes.iter().any(|ignored| word.ends_with(ignored)) {
        return None;
    }
    Some(format!("{stem}{}", rule.replacement))
}

/// Pure pattern-rule stemming, consulting no dictionary: apply every rule
/// for `pos`, or (when `pos` is `None`) every rule set in [`Pos::ALL`]
/// order, and collect the hits, deduplicated in the order first produced.
pub fn simple_stem(word: &str, pos: Option<Pos>) -> Vec<String> {
    let word = normalize(word);
    let pos_list: Vec<Pos> = match pos {
        Some(p) => vec![p],
        None => Pos::ALL.to_vec(),
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in pos_list {
        for rule in rules_for(p) {
            if let Some(candidate) = apply(&word, rule)
                && seen.insert(candidate.clone())
            {
                out.push(candidate);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noun_plural_strips_trailing_s() {
        assert_eq!(simple_stem("dogs", Some(Pos::Noun)), vec!["dog".to_string()]);
    }

    #[test]
    fn noun_s_rule_does_not_eat_double_s() {
        assert!(simple_stem("glass", Some(Pos::Noun)).is_empty());
    }

    #[test]
    fn verb_ing_form_produces_both_variants() {
        let candidates = simple_stem("running", Some(Pos::Verb));
        assert!(candidates.contains(&"runn".to_string()));
        assert!(candidates.contains(&"runne".to_string()));
    }

    #[test]
    fn no_pos_merges_every_rule_set() {
        let candidates = simple_stem("dogs", None);
        assert!(candidates.contains(&"dog".to_string()));
    }
}
