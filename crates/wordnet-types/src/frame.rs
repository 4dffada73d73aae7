/// One of the 39 generic verb sentence frames, with `----` marking the
/// slot the headword fills.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameTemplate {
    pub number: u8,
    pub template: &'static str,
}

/// The fixed catalogue of verb frames (`frames.vrb`/`verb.Framestext`), used
/// to resolve a synset's `f_cnt` entries to readable templates.
pub const CATALOG: &[FrameTemplate] = &[
    FrameTemplate { number: 1, template: "Something ----s" },
    FrameTemplate { number: 2, template: "Somebody ----s" },
    FrameTemplate { number: 3, template: "It is ----ing" },
    FrameTemplate { number: 4, template: "Something is ----ing PP" },
    FrameTemplate { number: 5, template: "Something ----s something Adjective/Noun" },
    FrameTemplate { number: 6, template: "Something ----s Adjective/Noun" },
    FrameTemplate { number: 7, template: "Something ----s something" },
    FrameTemplate { number: 8, template: "Something ----s somebody" },
    FrameTemplate { number: 9, template: "Somebody ----s something" },
    FrameTemplate { number: 10, template: "Somebody ----s somebody" },
    FrameTemplate { number: 11, template: "Something ----s somebody something" },
    FrameTemplate { number: 12, template: "Something ----s something to somebody" },
    FrameTemplate { number: 13, template: "Something ----s something from somebody" },
    FrameTemplate { number: 14, template: "Something ----s somebody with something" },
    FrameTemplate { number: 15, template: "Something ----s somebody of something" },
    FrameTemplate { number: 16, template: "Something ----s something on somebody" },
    FrameTemplate { number: 17, template: "Somebody ----s somebody something" },
    FrameTemplate { number: 18, template: "Somebody ----s something to somebody" },
    FrameTemplate { number: 19, template: "Somebody ----s something from somebody" },
    FrameTemplate { number: 20, template: "Somebody ----s somebody with something" },
    FrameTemplate { number: 21, template: "Somebody ----s somebody of something" },
    FrameTemplate { number: 22, template: "Somebody ----s something on somebody" },
    FrameTemplate { number: 23, template: "Somebody ----s somebody PP" },
    FrameTemplate { number: 24, template: "Somebody ----s something PP" },
    FrameTemplate { number: 25, template: "Somebody ----s PP" },
    FrameTemplate { number: 26, template: "Somebody's (body part) ----s" },
    FrameTemplate { number: 27, template: "Somebody ----s somebody to INFINITIVE" },
    FrameTemplate { number: 28, template: "Somebody ----s somebody INFINITIVE" },
    FrameTemplate { number: 29, template: "Somebody ----s that CLAUSE" },
    FrameTemplate { number: 30, template: "Somebody ----s to somebody" },
    FrameTemplate { number: 31, template: "Somebody ----s to INFINITIVE" },
    FrameTemplate { number: 32, template: "Somebody ----s whether INFINITIVE" },
    FrameTemplate { number: 33, template: "Somebody ----s somebody into V-ing something" },
    FrameTemplate { number: 34, template: "Somebody ----s something with something" },
    FrameTemplate { number: 35, template: "Somebody ----s INFINITIVE" },
    FrameTemplate { number: 36, template: "Somebody ----s VERB-ing" },
    FrameTemplate { number: 37, template: "It ----s that CLAUSE" },
    FrameTemplate { number: 38, template: "Something ----s INFINITIVE" },
    FrameTemplate { number: 39, template: "Somebody ----s at something" },
];

/// Look up a frame template by number (`1..=39`).
pub fn lookup(number: u8) -> Option<FrameTemplate> {
    CATALOG.iter().find(|f| f.number == number).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_39_entries_with_the_verb_slot_marker() {
        assert_eq!(CATALOG.len(), 39);
        for frame in CATALOG {
            assert!(frame.template.contains("----"));
        }
    }

    #[test]
    fn lookup_finds_known_frame() {
        assert_eq!(lookup(2).unwrap().template, "Somebody ----s");
        assert!(lookup(0).is_none());
        assert!(lookup(40).is_none());
    }
}
