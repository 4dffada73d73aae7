//! An in-memory snapshot of an entire dictionary (spec.md §4.8): four maps
//! bucketed by part-of-speech (synsets, index words, exception entries, and
//! sense entries, the last kept for in-order iteration) plus two flat maps
//! keyed by sense-key string (word, sense entry) for O(1) lookup without a
//! POS hint. Exported and re-imported as one gzip-compressed `bincode`
//! stream for a fast warm start.
//!
//! Once installed on a `Dictionary` (see `Dictionary::install_snapshot`),
//! this snapshot is also where every live iterator hot-swaps to — see
//! [`crate::hotswap`].

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use wordnet_types::{
    ExceptionEntry, IndexWord, IndexWordId, LexFileRef, LexicalPointer, Pos, SemanticPointer, SenseEntry, SenseKey,
    Synset, SynsetId, Word, WordId,
};

use crate::dictionary::{Dictionary, ResolvedWord};
use crate::error::{DictError, Result};

/// The frozen in-memory dictionary. Every getter is a plain map lookup; no
/// I/O, no cache, no lifecycle beyond the snapshot's own lifetime.
pub struct RamDictionary {
    version: Option<String>,
    synsets: HashMap<Pos, HashMap<u32, Arc<Synset>>>,
    index_words: HashMap<Pos, HashMap<String, Arc<IndexWord>>>,
    exception_entries: HashMap<Pos, HashMap<String, Arc<ExceptionEntry>>>,
    sense_entries_by_pos: HashMap<Pos, Vec<Arc<SenseEntry>>>,
    words_by_sense_key: HashMap<String, Arc<ResolvedWord>>,
    sense_entries_by_sense_key: HashMap<String, Arc<SenseEntry>>,
}

impl RamDictionary {
    /// Walk every collection of `dictionary` and freeze it into the four
    /// POS-bucketed maps and two flat maps, then **compact**: shrink every
    /// map to its exact size. The second half of spec.md §4.8's compaction
    /// step — canonicalizing nested id references to one interned instance —
    /// is automatic here, since every cross-reference (`SynsetId`, `WordId`)
    /// is a plain value type compared by value, never an object pointer.
    pub fn build(dictionary: &Dictionary) -> Result<Self> {
        let version = dictionary.version()?;

        let mut synsets: HashMap<Pos, HashMap<u32, Arc<Synset>>> = HashMap::new();
        let mut index_words: HashMap<Pos, HashMap<String, Arc<IndexWord>>> = HashMap::new();
        let mut exception_entries: HashMap<Pos, HashMap<String, Arc<ExceptionEntry>>> = HashMap::new();
        let mut words_by_sense_key: HashMap<String, Arc<ResolvedWord>> = HashMap::new();

        for pos in Pos::ALL {
            let mut synset_bucket = HashMap::new();
            for synset in dictionary.get_synset_iterator(pos)? {
                let synset = synset?;
                let sense_keys = dictionary.sense_keys_for(&synset)?;
                for (number, (word, key)) in (1u8..).zip(synset.words.iter().zip(sense_keys.iter())) {
                    let resolved = Arc::new(ResolvedWord { synset: synset.clone(), number, word: word.clone() });
                    words_by_sense_key.insert(key.to_string(), resolved);
                }
                synset_bucket.insert(synset.id.offset, synset);
            }
            synset_bucket.shrink_to_fit();
            synsets.insert(pos, synset_bucket);

            let mut index_bucket = HashMap::new();
            for entry in dictionary.get_index_word_iterator(pos)? {
                let entry = entry?;
                index_bucket.insert(entry.id.lemma.clone(), entry);
            }
            index_bucket.shrink_to_fit();
            index_words.insert(pos, index_bucket);

            let mut exception_bucket = HashMap::new();
            for entry in dictionary.get_exception_entry_iterator(pos)? {
                let entry = entry?;
                exception_bucket.insert(entry.surface_form.clone(), entry);
            }
            exception_bucket.shrink_to_fit();
            exception_entries.insert(pos, exception_bucket);
        }

        let mut sense_entries_by_pos: HashMap<Pos, Vec<Arc<SenseEntry>>> = HashMap::new();
        let mut sense_entries_by_sense_key: HashMap<String, Arc<SenseEntry>> = HashMap::new();
        for entry in dictionary.get_sense_entry_iterator()? {
            let entry = entry?;
            sense_entries_by_pos.entry(entry.sense_key.pos()).or_default().push(entry.clone());
            sense_entries_by_sense_key.insert(entry.sense_key.to_string(), entry);
        }
        for bucket in sense_entries_by_pos.values_mut() {
            bucket.shrink_to_fit();
        }
        words_by_sense_key.shrink_to_fit();
        sense_entries_by_sense_key.shrink_to_fit();

        Ok(Self {
            version,
            synsets,
            index_words,
            exception_entries,
            sense_entries_by_pos,
            words_by_sense_key,
            sense_entries_by_sense_key,
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn get_synset(&self, id: &SynsetId) -> Option<Arc<Synset>> {
        self.synsets.get(&id.pos)?.get(&id.offset).cloned()
    }

    pub fn get_index_word(&self, id: &IndexWordId) -> Option<Arc<IndexWord>> {
        self.index_words.get(&id.pos)?.get(&id.lemma).cloned()
    }

    pub fn get_exception_entry(&self, surface: &str, pos: Pos) -> Option<Arc<ExceptionEntry>> {
        self.exception_entries.get(&pos)?.get(surface).cloned()
    }

    pub fn get_word_by_sense_key(&self, key: &SenseKey) -> Option<Arc<ResolvedWord>> {
        self.words_by_sense_key.get(&key.to_string()).cloned()
    }

    pub fn get_sense_entry(&self, key: &SenseKey) -> Option<Arc<SenseEntry>> {
        self.sense_entries_by_sense_key.get(&key.to_string()).cloned()
    }

    pub fn synset_iterator(&self, pos: Pos) -> impl Iterator<Item = Arc<Synset>> + '_ {
        self.synsets.get(&pos).into_iter().flat_map(|bucket| bucket.values().cloned())
    }

    pub fn index_word_iterator(&self, pos: Pos) -> impl Iterator<Item = Arc<IndexWord>> + '_ {
        self.index_words.get(&pos).into_iter().flat_map(|bucket| bucket.values().cloned())
    }

    pub fn sense_entry_iterator(&self, pos: Pos) -> impl Iterator<Item = Arc<SenseEntry>> + '_ {
        self.sense_entries_by_pos.get(&pos).into_iter().flat_map(|bucket| bucket.iter().cloned())
    }

    /// Serialize as a single gzip-compressed `bincode` stream.
    pub fn export(&self, writer: impl Write) -> Result<()> {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        let dto = SnapshotDto::from(self);
        bincode::serialize_into(&mut encoder, &dto).map_err(|e| DictError::Serialization(e.to_string()))?;
        encoder.finish().map_err(|e| DictError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Deserialize a stream written by [`Self::export`]. No validation beyond
    /// structural deserialization is performed, per spec.
    pub fn import(reader: impl Read) -> Result<Self> {
        let decoder = GzDecoder::new(reader);
        let dto: SnapshotDto =
            bincode::deserialize_from(decoder).map_err(|e| DictError::Serialization(e.to_string()))?;
        Ok(dto.into())
    }
}

// -- wire format ------------------------------------------------------------
//
// `wordnet_types` records aren't `serde`-derived (and `SenseKey`'s `OnceLock`
// head resolves this on purpose), so the snapshot round-trips through these
// mirror structs instead of deriving on the domain types directly.

#[derive(Serialize, Deserialize)]
struct SnapshotDto {
    version: Option<String>,
    synsets: Vec<SynsetDto>,
    index_words: Vec<IndexWordDto>,
    exception_entries: Vec<ExceptionEntryDto>,
    sense_entries: Vec<SenseEntryDto>,
}

#[derive(Serialize, Deserialize)]
struct SynsetDto {
    offset: u32,
    pos: u8,
    lex_filenum: u8,
    is_satellite: bool,
    is_adjective_head: bool,
    gloss: String,
    words: Vec<WordDto>,
    semantic_pointers: Vec<SemanticPointerDto>,
}

#[derive(Serialize, Deserialize)]
struct WordDto {
    lemma: String,
    lex_id: u8,
    adjective_marker: Option<String>,
    verb_frames: Vec<u8>,
    lexical_pointers: Vec<LexicalPointerDto>,
}

#[derive(Serialize, Deserialize)]
struct LexicalPointerDto {
    symbol: String,
    target_offset: u32,
    target_pos: u8,
    source_word_number: u8,
    target_word_number: u8,
}

#[derive(Serialize, Deserialize)]
struct SemanticPointerDto {
    symbol: String,
    target_offset: u32,
    target_pos: u8,
}

#[derive(Serialize, Deserialize)]
enum WordIdDto {
    ByNumber { offset: u32, pos: u8, number: u8 },
    ByLemma { offset: u32, pos: u8, lemma: String },
    Both { offset: u32, pos: u8, number: u8, lemma: String },
}

#[derive(Serialize, Deserialize)]
struct IndexWordDto {
    lemma: String,
    pos: u8,
    tag_sense_count: u32,
    word_ids: Vec<WordIdDto>,
    pointer_symbols: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct ExceptionEntryDto {
    surface_form: String,
    pos: u8,
    root_forms: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct SenseEntryDto {
    sense_key: String,
    synset_offset: u32,
    sense_number: u32,
    tag_count: u32,
}

fn pos_code(pos: Pos) -> u8 {
    pos.to_code()
}

fn pos_from_code(code: u8) -> Pos {
    Pos::from_code(code).expect("wire format only ever carries codes this snapshot itself wrote")
}

impl From<&Synset> for SynsetDto {
    fn from(s: &Synset) -> Self {
        Self {
            offset: s.id.offset,
            pos: pos_code(s.id.pos),
            lex_filenum: s.lex_file.number(),
            is_satellite: s.is_satellite,
            is_adjective_head: s.is_adjective_head,
            gloss: s.gloss.clone(),
            words: s.words.iter().map(WordDto::from).collect(),
            semantic_pointers: s.semantic_pointers.iter().map(SemanticPointerDto::from).collect(),
        }
    }
}

impl From<&Word> for WordDto {
    fn from(w: &Word) -> Self {
        Self {
            lemma: w.lemma.clone(),
            lex_id: w.lex_id,
            adjective_marker: w.adjective_marker.clone(),
            verb_frames: w.verb_frames.clone(),
            lexical_pointers: w.lexical_pointers.iter().map(LexicalPointerDto::from).collect(),
        }
    }
}

impl From<&LexicalPointer> for LexicalPointerDto {
    fn from(p: &LexicalPointer) -> Self {
        Self {
            symbol: p.symbol.clone(),
            target_offset: p.target_synset.offset,
            target_pos: pos_code(p.target_synset.pos),
            source_word_number: p.source_word_number,
            target_word_number: p.target_word_number,
        }
    }
}

impl From<&SemanticPointer> for SemanticPointerDto {
    fn from(p: &SemanticPointer) -> Self {
        Self { symbol: p.symbol.clone(), target_offset: p.target.offset, target_pos: pos_code(p.target.pos) }
    }
}

impl From<&WordId> for WordIdDto {
    fn from(id: &WordId) -> Self {
        let synset = id.synset();
        match (id.number(), id.lemma()) {
            (wordnet_types::WordNumber::Known(n), Some(l)) => {
                WordIdDto::Both { offset: synset.offset, pos: pos_code(synset.pos), number: n, lemma: l.to_string() }
            }
            (wordnet_types::WordNumber::Known(n), None) => {
                WordIdDto::ByNumber { offset: synset.offset, pos: pos_code(synset.pos), number: n }
            }
            (wordnet_types::WordNumber::Unknown, Some(l)) => {
                WordIdDto::ByLemma { offset: synset.offset, pos: pos_code(synset.pos), lemma: l.to_string() }
            }
            (wordnet_types::WordNumber::Unknown, None) => {
                // Unreachable in practice: every WordId constructor requires
                // at least one of number/lemma.
                WordIdDto::ByLemma { offset: synset.offset, pos: pos_code(synset.pos), lemma: String::new() }
            }
        }
    }
}

impl From<&IndexWord> for IndexWordDto {
    fn from(w: &IndexWord) -> Self {
        Self {
            lemma: w.id.lemma.clone(),
            pos: pos_code(w.id.pos),
            tag_sense_count: w.tag_sense_count,
            word_ids: w.word_ids.iter().map(WordIdDto::from).collect(),
            pointer_symbols: w.pointer_symbols.iter().cloned().collect(),
        }
    }
}

impl From<&ExceptionEntry> for ExceptionEntryDto {
    fn from(e: &ExceptionEntry) -> Self {
        Self { surface_form: e.surface_form.clone(), pos: pos_code(e.pos), root_forms: e.root_forms.clone() }
    }
}

impl From<&SenseEntry> for SenseEntryDto {
    fn from(e: &SenseEntry) -> Self {
        Self {
            sense_key: e.sense_key.to_string(),
            synset_offset: e.synset_offset,
            sense_number: e.sense_number,
            tag_count: e.tag_count,
        }
    }
}

impl From<&RamDictionary> for SnapshotDto {
    fn from(ram: &RamDictionary) -> Self {
        Self {
            version: ram.version.clone(),
            synsets: ram.synsets.values().flat_map(|bucket| bucket.values()).map(|s| SynsetDto::from(s.as_ref())).collect(),
            index_words: ram
                .index_words
                .values()
                .flat_map(|bucket| bucket.values())
                .map(|w| IndexWordDto::from(w.as_ref()))
                .collect(),
            exception_entries: ram
                .exception_entries
                .values()
                .flat_map(|bucket| bucket.values())
                .map(|e| ExceptionEntryDto::from(e.as_ref()))
                .collect(),
            sense_entries: ram
                .sense_entries_by_sense_key
                .values()
                .map(|e| SenseEntryDto::from(e.as_ref()))
                .collect(),
        }
    }
}

impl From<SynsetDto> for Synset {
    fn from(dto: SynsetDto) -> Self {
        let pos = pos_from_code(dto.pos);
        let id = SynsetId::new(dto.offset, pos).expect("snapshot only ever carries offsets this crate itself wrote");
        let words = dto
            .words
            .into_iter()
            .map(|w| Word {
                lemma: w.lemma,
                lex_id: w.lex_id,
                adjective_marker: w.adjective_marker,
                verb_frames: w.verb_frames,
                lexical_pointers: w
                    .lexical_pointers
                    .into_iter()
                    .map(|p| LexicalPointer {
                        symbol: p.symbol,
                        target_synset: SynsetId::new(p.target_offset, pos_from_code(p.target_pos))
                            .expect("snapshot round-trips valid offsets"),
                        source_word_number: p.source_word_number,
                        target_word_number: p.target_word_number,
                    })
                    .collect(),
            })
            .collect();
        let semantic_pointers = dto
            .semantic_pointers
            .into_iter()
            .map(|p| SemanticPointer {
                symbol: p.symbol,
                target: SynsetId::new(p.target_offset, pos_from_code(p.target_pos))
                    .expect("snapshot round-trips valid offsets"),
            })
            .collect();
        Synset::new(
            id,
            LexFileRef::resolve(dto.lex_filenum),
            dto.is_satellite,
            dto.is_adjective_head,
            dto.gloss,
            words,
            semantic_pointers,
        )
        .expect("snapshot only ever carries synsets this crate itself validated on write")
    }
}

impl From<WordIdDto> for WordId {
    fn from(dto: WordIdDto) -> Self {
        match dto {
            WordIdDto::ByNumber { offset, pos, number } => {
                let synset = SynsetId::new(offset, pos_from_code(pos)).expect("snapshot round-trips valid offsets");
                WordId::by_number(synset, number).expect("snapshot round-trips a number this crate itself validated")
            }
            WordIdDto::ByLemma { offset, pos, lemma } => {
                let synset = SynsetId::new(offset, pos_from_code(pos)).expect("snapshot round-trips valid offsets");
                WordId::by_lemma(synset, lemma).expect("snapshot round-trips a lemma this crate itself validated")
            }
            WordIdDto::Both { offset, pos, number, lemma } => {
                let synset = SynsetId::new(offset, pos_from_code(pos)).expect("snapshot round-trips valid offsets");
                WordId::both(synset, number, lemma).expect("snapshot round-trips values this crate itself validated")
            }
        }
    }
}

impl From<IndexWordDto> for IndexWord {
    fn from(dto: IndexWordDto) -> Self {
        let pos = pos_from_code(dto.pos);
        let id = IndexWordId::new(dto.lemma, pos).expect("snapshot round-trips a lemma this crate itself validated");
        IndexWord::new(
            id,
            dto.tag_sense_count,
            dto.word_ids.into_iter().map(WordId::from).collect(),
            dto.pointer_symbols.into_iter().collect(),
        )
        .expect("snapshot only ever carries index words this crate itself validated on write")
    }
}

impl From<ExceptionEntryDto> for ExceptionEntry {
    fn from(dto: ExceptionEntryDto) -> Self {
        ExceptionEntry::from_proxy(
            wordnet_types::ExceptionEntryProxy { surface_form: dto.surface_form, root_forms: dto.root_forms },
            pos_from_code(dto.pos),
        )
        .expect("snapshot only ever carries exception entries this crate itself validated on write")
    }
}

impl From<SenseEntryDto> for SenseEntry {
    fn from(dto: SenseEntryDto) -> Self {
        SenseEntry {
            sense_key: dto.sense_key.parse().expect("snapshot round-trips a sense key this crate itself wrote"),
            synset_offset: dto.synset_offset,
            sense_number: dto.sense_number,
            tag_count: dto.tag_count,
        }
    }
}

impl From<SnapshotDto> for RamDictionary {
    fn from(dto: SnapshotDto) -> Self {
        let mut synsets: HashMap<Pos, HashMap<u32, Arc<Synset>>> = HashMap::new();
        let mut words_by_sense_key: HashMap<String, Arc<ResolvedWord>> = HashMap::new();

        for synset_dto in dto.synsets {
            let synset = Arc::new(Synset::from(synset_dto));
            for (number, word) in (1u8..).zip(synset.words.iter()) {
                let lex_id = word.lex_id.min(15);
                if let Ok(key) = SenseKey::new(word.lemma.clone(), synset.id.pos, synset.lex_file.number(), lex_id, synset.is_satellite) {
                    if synset.is_satellite {
                        if let Some(pointer) = synset.semantic_pointers.iter().find(|p| p.symbol == wordnet_types::SIMILAR_TO) {
                            if let Some(head_bucket) = synsets.get(&pointer.target.pos) {
                                if let Some(head_synset) = head_bucket.get(&pointer.target.offset) {
                                    if let Some(head_word) = head_synset.words.first() {
                                        let _ = key.set_head(head_word.lemma.clone(), head_word.lex_id);
                                    }
                                }
                            }
                        }
                    }
                    let resolved = Arc::new(ResolvedWord { synset: synset.clone(), number, word: word.clone() });
                    words_by_sense_key.insert(key.to_string(), resolved);
                }
            }
            synsets.entry(synset.id.pos).or_default().insert(synset.id.offset, synset);
        }
        for bucket in synsets.values_mut() {
            bucket.shrink_to_fit();
        }

        let mut index_words: HashMap<Pos, HashMap<String, Arc<IndexWord>>> = HashMap::new();
        for index_dto in dto.index_words {
            let word = Arc::new(IndexWord::from(index_dto));
            index_words.entry(word.id.pos).or_default().insert(word.id.lemma.clone(), word);
        }
        for bucket in index_words.values_mut() {
            bucket.shrink_to_fit();
        }

        let mut exception_entries: HashMap<Pos, HashMap<String, Arc<ExceptionEntry>>> = HashMap::new();
        for exception_dto in dto.exception_entries {
            let entry = Arc::new(ExceptionEntry::from(exception_dto));
            exception_entries.entry(entry.pos).or_default().insert(entry.surface_form.clone(), entry);
        }
        for bucket in exception_entries.values_mut() {
            bucket.shrink_to_fit();
        }

        let mut sense_entries_by_pos: HashMap<Pos, Vec<Arc<SenseEntry>>> = HashMap::new();
        let mut sense_entries_by_sense_key: HashMap<String, Arc<SenseEntry>> = HashMap::new();
        for sense_dto in dto.sense_entries {
            let entry = Arc::new(SenseEntry::from(sense_dto));
            sense_entries_by_pos.entry(entry.sense_key.pos()).or_default().push(entry.clone());
            sense_entries_by_sense_key.insert(entry.sense_key.to_string(), entry);
        }
        for bucket in sense_entries_by_pos.values_mut() {
            bucket.shrink_to_fit();
        }
        words_by_sense_key.shrink_to_fit();
        sense_entries_by_sense_key.shrink_to_fit();

        Self {
            version: dto.version,
            synsets,
            index_words,
            exception_entries,
            sense_entries_by_pos,
            words_by_sense_key,
            sense_entries_by_sense_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DictionaryConfig;
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
            "  1 fixture\nant n 1 0 0 1 1 00000042\ndog n 1 0 0 1 1 00000154\n",
        );
        write_file(
            dir,
            "data.noun",
            "  1 fixture\n\
             00000042 03 n 01 ant 0 000 | a small insect\n\
             00000104 03 n 01 insect 0 000 | a small arthropod\n\
             00000154 03 n 01 dog 0 000 | a domesticated canine\n",
        );
        write_file(dir, "noun.exc", "axes ax axis\n");
        write_file(dir, "index.sense", "ant%1:05:00:: 00000042 1 0\ndog%1:05:00:: 00000154 1 0\n");
    }

    #[test]
    fn build_freezes_every_synset_and_index_word() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open_with_config(DictionaryConfig::new(dir.path())).unwrap();
        let ram = RamDictionary::build(&dict).unwrap();

        assert_eq!(ram.synset_iterator(Pos::Noun).count(), 3);
        let id = SynsetId::new(154, Pos::Noun).unwrap();
        assert_eq!(ram.get_synset(&id).unwrap().words[0].lemma, "dog");

        let index_id = IndexWordId::new("dog", Pos::Noun).unwrap();
        assert!(ram.get_index_word(&index_id).is_some());
    }

    #[test]
    fn export_then_import_round_trips_a_synset() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open_with_config(DictionaryConfig::new(dir.path())).unwrap();
        let ram = RamDictionary::build(&dict).unwrap();

        let mut bytes = Vec::new();
        ram.export(&mut bytes).unwrap();
        let restored = RamDictionary::import(bytes.as_slice()).unwrap();

        let id = SynsetId::new(154, Pos::Noun).unwrap();
        assert_eq!(restored.get_synset(&id).unwrap().words[0].lemma, "dog");
        assert_eq!(restored.synset_iterator(Pos::Noun).count(), 3);
    }

    #[test]
    fn word_by_sense_key_survives_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open_with_config(DictionaryConfig::new(dir.path())).unwrap();
        let ram = RamDictionary::build(&dict).unwrap();

        let key: SenseKey = "dog%1:05:00::".parse().unwrap();
        assert_eq!(ram.get_word_by_sense_key(&key).unwrap().word.lemma, "dog");
    }
}
