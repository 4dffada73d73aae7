//! Pure, allocation-owning line parsers.
//!
//! Each function parses exactly one line from one WordNet file family into
//! one owned `wordnet_types` record. None of them touch the filesystem —
//! `wordnet-db`'s data sources hand them the already-located line text.

use wordnet_types::{
    ExceptionEntryId, ExceptionEntryProxy, IndexWord, IndexWordId, LexFileRef, LexicalPointer,
    Pos, SemanticPointer, SenseEntry, SenseKey, Synset, SynsetId, Word, WordId,
};

use crate::error::{MisformattedLine, Result};

fn fail(line: &str, reason: impl Into<String>) -> MisformattedLine {
    MisformattedLine::new(line, reason)
}

fn tokens(line: &str) -> Vec<&str> {
    line.split_ascii_whitespace().collect()
}

/// `00` means "applies to every word in the synset"; expand it to a
/// concrete, explicit per-word list once all words are known.
const ALL_WORDS: u8 = 0;

/// Parse one `data.<pos>` line (everything before the first `"|"` is fields,
/// everything after is the gloss) into a [`Synset`].
pub fn parse_synset_line(line: &str, pos: Pos) -> Result<Synset> {
    let (fields_part, gloss_part) = match line.split_once('|') {
        Some((f, g)) => (f.trim(), g.trim()),
        None => (line.trim(), ""),
    };
    let toks = tokens(fields_part);
    if toks.len() < 4 {
        return Err(fail(line, "too few fields before word count"));
    }

    let offset: u32 = toks[0].parse().map_err(|_| fail(line, "bad synset offset"))?;
    let lex_filenum: u8 = toks[1].parse().map_err(|_| fail(line, "bad lex_filenum"))?;
    let ss_char = toks[2]
        .chars()
        .next()
        .ok_or_else(|| fail(line, "missing ss_type"))?;
    let is_satellite = ss_char == 's';
    let is_adjective_head = ss_char == 'a' && matches!(pos, Pos::Adj);
    if Pos::from_char(ss_char) != Some(pos) && !(ss_char == 's' && pos == Pos::Adj) {
        return Err(fail(line, "ss_type does not match containing file's part of speech"));
    }

    let w_cnt = usize::from_str_radix(toks[3], 16).map_err(|_| fail(line, "bad w_cnt"))?;
    let mut idx = 4;
    if toks.len() < idx + w_cnt * 2 {
        return Err(fail(line, "not enough word/lex_id pairs"));
    }

    let mut raw_words: Vec<(String, u8, Option<String>)> = Vec::with_capacity(w_cnt);
    for _ in 0..w_cnt {
        let raw_lemma = toks[idx];
        let lex_id = u8::from_str_radix(toks[idx + 1], 16).map_err(|_| fail(line, "bad lex_id"))?;
        let (lemma, marker) = split_adjective_marker(raw_lemma);
        raw_words.push((lemma, lex_id, marker));
        idx += 2;
    }

    if toks.len() <= idx {
        return Err(fail(line, "missing pointer count"));
    }
    let p_cnt: usize = toks[idx].parse().map_err(|_| fail(line, "bad p_cnt"))?;
    idx += 1;

    let mut semantic_pointers = Vec::new();
    let mut lexical_pointers_by_word: Vec<Vec<LexicalPointer>> =
        (0..raw_words.len()).map(|_| Vec::new()).collect();

    for _ in 0..p_cnt {
        if toks.len() < idx + 4 {
            return Err(fail(line, "incomplete pointer block"));
        }
        let symbol = toks[idx].to_string();
        let target_offset: u32 = toks[idx + 1]
            .parse()
            .map_err(|_| fail(line, "bad pointer target offset"))?;
        let target_pos = toks[idx + 2]
            .chars()
            .next()
            .and_then(Pos::from_char)
            .ok_or_else(|| fail(line, "bad pointer target pos"))?;
        let target_synset = SynsetId::new(target_offset, target_pos).map_err(|e| fail(line, e.to_string()))?;
        let (source_word_number, target_word_number) = decode_source_target(toks[idx + 3])
            .ok_or_else(|| fail(line, "bad pointer source/target nibble field"))?;
        idx += 4;

        match source_word_number {
            0 => semantic_pointers.push(SemanticPointer { symbol, target: target_synset }),
            n => {
                let slot = (n as usize)
                    .checked_sub(1)
                    .filter(|i| *i < lexical_pointers_by_word.len())
                    .ok_or_else(|| fail(line, "pointer source word number out of range"))?;
                lexical_pointers_by_word[slot].push(LexicalPointer {
                    symbol,
                    target_synset,
                    source_word_number: n,
                    target_word_number,
                });
            }
        }
    }

    let mut verb_frames_by_word: Vec<Vec<u8>> = (0..raw_words.len()).map(|_| Vec::new()).collect();
    if matches!(pos, Pos::Verb) {
        let f_cnt: usize = if toks.len() <= idx {
            0
        } else {
            let v = toks[idx].parse().map_err(|_| fail(line, "bad f_cnt"))?;
            idx += 1;
            v
        };
        for _ in 0..f_cnt {
            if toks.len() < idx + 3 {
                return Err(fail(line, "incomplete frame entry"));
            }
            if toks[idx] != "+" {
                return Err(fail(line, "expected '+' before frame entry"));
            }
            let frame_number: u8 = toks[idx + 1].parse().map_err(|_| fail(line, "bad frame number"))?;
            let word_number = u8::from_str_radix(toks[idx + 2], 16).map_err(|_| fail(line, "bad frame word number"))?;
            idx += 3;
            if word_number == ALL_WORDS {
                for frames in &mut verb_frames_by_word {
                    frames.push(frame_number);
                }
            } else {
                let slot = (word_number as usize)
                    .checked_sub(1)
                    .filter(|i| *i < verb_frames_by_word.len())
                    .ok_or_else(|| fail(line, "frame word number out of range"))?;
                verb_frames_by_word[slot].push(frame_number);
            }
        }
    }

    let words: Vec<Word> = raw_words
        .into_iter()
        .zip(lexical_pointers_by_word)
        .zip(verb_frames_by_word)
        .map(|(((lemma, lex_id, marker), lexical_pointers), verb_frames)| Word {
            lemma,
            lex_id,
            adjective_marker: marker,
            verb_frames,
            lexical_pointers,
        })
        .collect();

    let id = SynsetId::new(offset, pos).map_err(|e| fail(line, e.to_string()))?;
    Synset::new(
        id,
        LexFileRef::resolve(lex_filenum),
        is_satellite,
        is_adjective_head,
        gloss_part,
        words,
        semantic_pointers,
    )
    .map_err(|e| fail(line, e.to_string()))
}

/// Decode the four-hex-digit `src_tgt` pointer field: first two digits are
/// the 1-based source word number within this synset (`00` = whole synset,
/// i.e. a semantic pointer), last two are the 1-based target word number.
fn decode_source_target(token: &str) -> Option<(u8, u8)> {
    if token.len() != 4 {
        return None;
    }
    let source = u8::from_str_radix(&token[0..2], 16).ok()?;
    let target = u8::from_str_radix(&token[2..4], 16).ok()?;
    Some((source, target))
}

/// Strip a parenthesized adjective marker suffix such as `(ip)` or `(p)`.
fn split_adjective_marker(raw: &str) -> (String, Option<String>) {
    if let Some(open) = raw.find('(') {
        if let Some(stripped) = raw.strip_suffix(')') {
            let marker = &stripped[open + 1..];
            return (raw[..open].to_string(), Some(marker.to_string()));
        }
    }
    (raw.to_string(), None)
}

/// Parse one `index.<pos>` line into an [`IndexWord`].
pub fn parse_index_line(line: &str, pos: Pos) -> Result<IndexWord> {
    let toks = tokens(line);
    if toks.len() < 6 {
        return Err(fail(line, "too few fields"));
    }
    let lemma = toks[0];
    // toks[1] is the pos tag, redundant with the containing file.
    let synset_cnt: usize = toks[2].parse().map_err(|_| fail(line, "bad synset_cnt"))?;
    let p_cnt: usize = toks[3].parse().map_err(|_| fail(line, "bad p_cnt"))?;

    let mut idx = 4;
    if toks.len() < idx + p_cnt {
        return Err(fail(line, "pointer symbol count mismatch"));
    }
    let pointer_symbols = toks[idx..idx + p_cnt].iter().map(|s| s.to_string()).collect();
    idx += p_cnt;

    if toks.len() < idx + 2 {
        return Err(fail(line, "missing sense counts"));
    }
    // sense_cnt (toks[idx]) duplicates synset_cnt in real files; skip it.
    idx += 1;
    let tag_sense_count: u32 = toks[idx].parse().map_err(|_| fail(line, "bad tag_sense_count"))?;
    idx += 1;

    if toks.len() != idx + synset_cnt {
        return Err(fail(line, "synset_cnt does not match trailing offset count"));
    }
    let mut word_ids = Vec::with_capacity(synset_cnt);
    for tok in &toks[idx..] {
        let offset: u32 = tok.parse().map_err(|_| fail(line, "bad synset offset"))?;
        let synset = SynsetId::new(offset, pos).map_err(|e| fail(line, e.to_string()))?;
        word_ids.push(WordId::by_lemma(synset, lemma).map_err(|e| fail(line, e.to_string()))?);
    }

    let id = IndexWordId::new(lemma, pos).map_err(|e| fail(line, e.to_string()))?;
    IndexWord::new(id, tag_sense_count, word_ids, pointer_symbols).map_err(|e| fail(line, e.to_string()))
}

/// Parse one `<pos>.exc` line (`surface_form root_form+`) into an exception
/// proxy; the caller attaches the part of speech, since that's determined by
/// which file the line came from, not by the line's own content.
pub fn parse_exception_line(line: &str) -> Result<ExceptionEntryProxy> {
    let toks = tokens(line);
    if toks.len() < 2 {
        return Err(fail(line, "exception line needs a surface form and at least one root"));
    }
    Ok(ExceptionEntryProxy {
        surface_form: toks[0].to_string(),
        root_forms: toks[1..].iter().map(|s| s.to_string()).collect(),
    })
}

/// Parse one `index.sense` line into a [`SenseEntry`].
pub fn parse_sense_index_line(line: &str) -> Result<SenseEntry> {
    let toks = tokens(line);
    if toks.len() < 4 {
        return Err(fail(line, "too few fields"));
    }
    let sense_key: SenseKey = toks[0].parse().map_err(|e: wordnet_types::TypesError| fail(line, e.to_string()))?;
    let synset_offset: u32 = toks[1].parse().map_err(|_| fail(line, "bad synset_offset"))?;
    let sense_number: u32 = toks[2].parse().map_err(|_| fail(line, "bad sense_number"))?;
    let tag_count: u32 = toks[3].parse().map_err(|_| fail(line, "bad tag_cnt"))?;
    Ok(SenseEntry {
        sense_key,
        synset_offset,
        sense_number,
        tag_count,
    })
}

/// Build an [`ExceptionEntryId`] for a parsed exception, validating the POS
/// alongside the surface form the way `wordnet-db`'s file provider does when
/// it attaches a file's part of speech to each line it reads.
pub fn exception_entry_id(surface_form: &str, pos: Pos) -> Result<ExceptionEntryId> {
    ExceptionEntryId::new(surface_form, pos).map_err(|e| fail(surface_form, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_noun_synset() {
        let line = "00001740 03 n 02 entity 0 abstraction 0 001 @ 00002137 n 0000 | that which is perceived or known or inferred to have its own distinct existence (living or nonliving)";
        let synset = parse_synset_line(line, Pos::Noun).unwrap();
        assert_eq!(synset.id.offset, 1740);
        assert_eq!(synset.words.len(), 2);
        assert_eq!(synset.words[0].lemma, "entity");
        assert_eq!(synset.semantic_pointers.len(), 1);
        assert_eq!(synset.semantic_pointers[0].symbol, "@");
        assert!(synset.gloss.starts_with("that which is perceived"));
    }

    #[test]
    fn parses_lexical_pointer_targeting_a_specific_word() {
        let line = "00001740 03 n 02 entity 0 abstraction 0 001 ! 00002137 n 0101 | gloss";
        let synset = parse_synset_line(line, Pos::Noun).unwrap();
        assert!(synset.semantic_pointers.is_empty());
        assert_eq!(synset.words[0].lexical_pointers.len(), 1);
        assert_eq!(synset.words[0].lexical_pointers[0].target_word_number, 1);
    }

    #[test]
    fn parses_adjective_marker() {
        let line = "00001740 00 a 01 able(ip) 0 000 | gloss";
        let synset = parse_synset_line(line, Pos::Adj).unwrap();
        assert_eq!(synset.words[0].lemma, "able");
        assert_eq!(synset.words[0].adjective_marker.as_deref(), Some("ip"));
    }

    #[test]
    fn parses_verb_frame_applies_to_all_words() {
        let line = "00001740 29 v 02 run 0 sprint 0 000 1 + 02 00 | gloss";
        let synset = parse_synset_line(line, Pos::Verb).unwrap();
        assert_eq!(synset.words[0].verb_frames, vec![2]);
        assert_eq!(synset.words[1].verb_frames, vec![2]);
    }

    #[test]
    fn parses_index_line() {
        let line = "dog n 2 1 @ 2 2 04123405 01234567";
        let entry = parse_index_line(line, Pos::Noun).unwrap();
        assert_eq!(entry.word_ids.len(), 2);
        assert_eq!(entry.tag_sense_count, 2);
    }

    #[test]
    fn parses_exception_line() {
        let proxy = parse_exception_line("mice mouse").unwrap();
        assert_eq!(proxy.surface_form, "mice");
        assert_eq!(proxy.root_forms, vec!["mouse".to_string()]);
    }

    #[test]
    fn rejects_malformed_data_line() {
        let err = parse_synset_line("not enough tokens", Pos::Noun).unwrap_err();
        assert!(err.reason.contains("too few fields"));
    }
}
