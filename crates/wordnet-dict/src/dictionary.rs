//! The user-visible query surface: opens a [`crate::config::DictionaryConfig`]
//! against a [`FileProvider`], serving records through the LRU [`Cache`] and
//! resolving adjective-satellite sense-key heads on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use parking_lot::RwLock;

use wordnet_db::{ContentTypeKey, DataKind, FileProvider, SourceHandle};
use wordnet_parse::{IndexComparator, parse_exception_line, parse_index_line, parse_sense_index_line, parse_synset_line};
use wordnet_types::{
    ExceptionEntry, ExceptionEntryId, IndexWord, IndexWordId, Pos, SenseEntry, SenseKey, Synset, SynsetId, Word,
    WordId, WordNumber, SIMILAR_TO,
};

use crate::cache::Cache;
use crate::config::DictionaryConfig;
use crate::error::{DictError, Result};
use crate::hotswap::{HotSwapIterator, PosScope, SnapshotCell};
use crate::ram::RamDictionary;

/// One sense of a synset, resolved down to the specific member word.
#[derive(Clone, Debug)]
pub struct ResolvedWord {
    pub synset: Arc<Synset>,
    pub number: u8,
    pub word: Word,
}

fn content_type_for(kind: DataKind, pos: Pos) -> ContentTypeKey {
    ContentTypeKey::for_pos(kind, pos).expect("every data kind has a content type for every pos")
}

/// The dictionary facade: a file provider plus a cache, implementing the
/// full query surface over WordNet-format files.
pub struct Dictionary {
    provider: FileProvider,
    cache: Cache,
    check_lexical_id: bool,
    open: AtomicBool,
    snapshot: SnapshotCell,
}

impl Dictionary {
    /// Open with default configuration against `source_path`.
    pub fn open(source_path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::open_with_config(DictionaryConfig::new(source_path))
    }

    pub fn open_with_config(config: DictionaryConfig) -> Result<Self> {
        let provider = FileProvider::new(config.source_path.clone());
        if let Some(charset) = config.charset {
            for key in ContentTypeKey::ALL {
                provider.set_charset(key, charset)?;
            }
        }
        for (key, comparator) in &config.comparator_overrides {
            provider.set_comparator(*key, comparator.clone())?;
        }
        for (key, pattern) in &config.source_matcher_overrides {
            provider.set_filename_override(*key, pattern.clone())?;
        }
        provider.set_load_policy(config.load_policy)?;
        provider.open()?;

        let cache_capacity = if config.cache_enabled { config.cache_max_capacity } else { 0 };
        let cache = Cache::new(cache_capacity);
        cache.open();

        Ok(Self {
            provider,
            cache,
            check_lexical_id: config.check_lexical_id,
            open: AtomicBool::new(true),
            snapshot: Arc::new(RwLock::new(None)),
        })
    }

    pub fn close(&self) {
        self.cache.close();
        self.provider.close();
        self.open.store(false, AtomicOrdering::SeqCst);
    }

    /// Install a RAM snapshot built from this dictionary (typically produced
    /// by a background loader once `RamDictionary::build` finishes). Every
    /// iterator already handed out, and every one handed out from now on,
    /// switches over to it on its next step — see [`crate::hotswap`].
    pub fn install_snapshot(&self, snapshot: RamDictionary) {
        *self.snapshot.write() = Some(Arc::new(snapshot));
    }

    /// The installed snapshot, if loading has completed.
    pub fn snapshot(&self) -> Option<Arc<RamDictionary>> {
        self.snapshot.read().clone()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(DictError::ObjectClosed)
        }
    }

    fn source(&self, key: ContentTypeKey) -> Result<Option<SourceHandle>> {
        self.ensure_open()?;
        Ok(self.provider.source(key))
    }

    pub fn version(&self) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(self.provider.version())
    }

    // -- index words ---------------------------------------------------

    pub fn get_index_word(&self, lemma: &str, pos: Pos) -> Result<Option<Arc<IndexWord>>> {
        let id = IndexWordId::new(lemma, pos)?;
        self.get_index_word_by_id(&id)
    }

    pub fn get_index_word_by_id(&self, id: &IndexWordId) -> Result<Option<Arc<IndexWord>>> {
        self.ensure_open()?;
        let cache_key = id.to_string();
        if let Some(hit) = self.cache.get_index_word(&cache_key)? {
            return Ok(Some(hit));
        }
        let Some(source) = self.source(content_type_for(DataKind::Index, id.pos))? else {
            return Ok(None);
        };
        let Some(line) = source.lookup(&id.lemma)? else {
            return Ok(None);
        };
        let entry = Arc::new(parse_index_line(&line, id.pos)?);
        self.cache.put_index_word(cache_key, entry.clone())?;
        Ok(Some(entry))
    }

    pub fn get_index_word_iterator(&self, pos: Pos) -> Result<IndexWordIterator> {
        let source = self.source(content_type_for(DataKind::Index, pos))?;
        let backing = BackingIndexWordIterator { source, pos, cursor: 0 };
        Ok(HotSwapIterator::new(self.snapshot.clone(), PosScope::One(pos), backing))
    }

    // -- synsets ---------------------------------------------------------

    pub fn get_synset(&self, id: &SynsetId) -> Result<Option<Arc<Synset>>> {
        self.ensure_open()?;
        let cache_key = id.to_string();
        if let Some(hit) = self.cache.get_synset(&cache_key)? {
            return Ok(Some(hit));
        }
        let Some(source) = self.source(content_type_for(DataKind::Data, id.pos))? else {
            return Ok(None);
        };
        let Some(line) = source.lookup(&id.offset_string())? else {
            return Ok(None);
        };
        let synset = Arc::new(parse_synset_line(&line, id.pos)?);
        let sense_keys = self.sense_keys_for(&synset)?;
        self.cache.put_synset(cache_key, synset.clone(), &sense_keys)?;
        Ok(Some(synset))
    }

    pub fn get_synset_iterator(&self, pos: Pos) -> Result<SynsetIterator> {
        let source = self.source(content_type_for(DataKind::Data, pos))?;
        let backing = BackingSynsetIterator { source, pos, cursor: 0 };
        Ok(HotSwapIterator::new(self.snapshot.clone(), PosScope::One(pos), backing))
    }

    /// Build one sense key per member word, resolving the adjective-satellite
    /// head lazily by following `SIMILAR_TO` to the cluster head's synset —
    /// strategy 1 of the two permitted by spec.md §4.6. `check_lexical_id`
    /// governs whether an out-of-range lexical id is rejected or clamped.
    pub(crate) fn sense_keys_for(&self, synset: &Synset) -> Result<Vec<SenseKey>> {
        let head = if synset.is_satellite { self.resolve_satellite_head(synset)? } else { None };
        let mut keys = Vec::with_capacity(synset.words.len());
        for word in &synset.words {
            let lex_id = if self.check_lexical_id { word.lex_id } else { word.lex_id.min(15) };
            let key = SenseKey::new(word.lemma.clone(), synset.id.pos, synset.lex_file.number(), lex_id, synset.is_satellite)?;
            if let Some((ref lemma, id)) = head {
                // A head lookup that fails to resolve (dangling pointer) leaves
                // the key without a head rather than failing the whole synset.
                let _ = key.set_head(lemma.clone(), id);
            }
            keys.push(key);
        }
        Ok(keys)
    }

    fn resolve_satellite_head(&self, synset: &Synset) -> Result<Option<(String, u8)>> {
        let Some(pointer) = synset.semantic_pointers.iter().find(|p| p.symbol == SIMILAR_TO) else {
            return Ok(None);
        };
        let Some(head_synset) = self.get_synset(&pointer.target)? else {
            return Ok(None);
        };
        let Some(head_word) = head_synset.words.first() else {
            return Ok(None);
        };
        Ok(Some((head_word.lemma.clone(), head_word.lex_id)))
    }

    // -- words ------------------------------------------------------------

    pub fn get_word(&self, id: &WordId) -> Result<Option<Word>> {
        self.ensure_open()?;
        if matches!(id.number(), WordNumber::Unknown) && id.lemma().is_none() {
            return Err(DictError::InvalidArgument(
                "word id must resolve by word number or lemma".into(),
            ));
        }
        let Some(synset) = self.get_synset(&id.synset())? else {
            return Ok(None);
        };
        let found = synset.words.iter().enumerate().find(|(i, w)| {
            let number_matches = match id.number() {
                WordNumber::Known(n) => (*i as u8 + 1) == n,
                WordNumber::Unknown => true,
            };
            let lemma_matches = id.lemma().is_none_or(|l| w.lemma.eq_ignore_ascii_case(l));
            number_matches && lemma_matches
        });
        Ok(found.map(|(_, w)| w.clone()))
    }

    pub fn get_word_by_sense_key(&self, sense_key: &SenseKey) -> Result<Option<Arc<ResolvedWord>>> {
        self.ensure_open()?;
        let cache_key = sense_key.to_string();
        if let Some(hit) = self.cache.get_word_by_sense_key(&cache_key)? {
            return Ok(Some(hit));
        }
        let Some(entry) = self.get_sense_entry(sense_key)? else {
            return Ok(None);
        };
        let synset_id = SynsetId::new(entry.synset_offset, sense_key.pos())?;
        let Some(synset) = self.get_synset(&synset_id)? else {
            return Ok(None);
        };
        let sense_keys = self.sense_keys_for(&synset)?;
        let found = synset
            .words
            .iter()
            .zip(sense_keys.iter())
            .enumerate()
            .find(|(_, (_, k))| k.lemma() == sense_key.lemma() && k.lex_id() == sense_key.lex_id());
        let Some((index, (word, _))) = found else {
            return Ok(None);
        };
        let resolved = Arc::new(ResolvedWord { synset: synset.clone(), number: index as u8 + 1, word: word.clone() });
        self.cache.put_word_by_sense_key(cache_key, resolved.clone())?;
        Ok(Some(resolved))
    }

    // -- sense entries ------------------------------------------------------

    pub fn get_sense_entry(&self, key: &SenseKey) -> Result<Option<Arc<SenseEntry>>> {
        self.ensure_open()?;
        let cache_key = key.to_string();
        if let Some(hit) = self.cache.get_sense_entry(&cache_key)? {
            return Ok(Some(hit));
        }
        let Some(source) = self.source(ContentTypeKey::Sense)? else {
            return Ok(None);
        };
        let Some(line) = source.lookup(&cache_key)? else {
            return Ok(None);
        };
        let entry = Arc::new(parse_sense_index_line(&line)?);
        self.cache.put_sense_entry(cache_key, entry.clone())?;
        Ok(Some(entry))
    }

    pub fn get_sense_entry_iterator(&self) -> Result<SenseEntryIterator> {
        let source = self.source(ContentTypeKey::Sense)?;
        let backing = BackingSenseEntryIterator { source, cursor: 0 };
        Ok(HotSwapIterator::new(self.snapshot.clone(), PosScope::All, backing))
    }

    // -- exceptions -----------------------------------------------------

    pub fn get_exception_entry(&self, surface: &str, pos: Pos) -> Result<Option<ExceptionEntry>> {
        let id = ExceptionEntryId::new(surface, pos)?;
        self.get_exception_entry_by_id(&id)
    }

    pub fn get_exception_entry_by_id(&self, id: &ExceptionEntryId) -> Result<Option<ExceptionEntry>> {
        self.ensure_open()?;
        let Some(source) = self.source(content_type_for(DataKind::Exception, id.pos))? else {
            return Ok(None);
        };
        let Some(line) = source.lookup(&id.surface)? else {
            return Ok(None);
        };
        let proxy = parse_exception_line(&line)?;
        Ok(Some(ExceptionEntry::from_proxy(proxy, id.pos)?))
    }

    pub fn get_exception_entry_iterator(&self, pos: Pos) -> Result<ExceptionEntryIterator> {
        let source = self.source(content_type_for(DataKind::Exception, pos))?;
        let backing = BackingExceptionEntryIterator { source, pos, cursor: 0 };
        Ok(HotSwapIterator::new(self.snapshot.clone(), PosScope::One(pos), backing))
    }

    // -- prefix search ------------------------------------------------------

    /// Iterate over the index file(s) starting at `prefix`, collecting
    /// lemmas whose first token starts with the (lowercased) prefix, up to
    /// `limit`. Empty if the prefix is absent.
    pub fn get_words(&self, prefix: &str, pos: Option<Pos>, limit: usize) -> Result<Vec<String>> {
        self.ensure_open()?;
        let prefix_lower = prefix.to_lowercase();
        let search_comparator = IndexComparator::Search;
        let mut seen = std::collections::HashSet::new();
        let mut results = Vec::new();

        for candidate_pos in pos.map(|p| vec![p]).unwrap_or_else(|| Pos::ALL.to_vec()) {
            if results.len() >= limit {
                break;
            }
            let Some(source) = self.source(content_type_for(DataKind::Index, candidate_pos))? else {
                continue;
            };
            let Some(binary) = source.as_binary() else { continue };
            let Some(start) = binary.find_prefix_start(&prefix_lower, &search_comparator)? else {
                continue;
            };
            for line in binary.iterate_from_offset(start) {
                let line = line?;
                let lemma = line.split_ascii_whitespace().next().unwrap_or("");
                if !lemma.to_lowercase().starts_with(&prefix_lower) {
                    break;
                }
                if seen.insert(lemma.to_string()) {
                    results.push(lemma.to_string());
                    if results.len() >= limit {
                        break;
                    }
                }
            }
        }
        Ok(results)
    }
}

impl Drop for Dictionary {
    fn drop(&mut self) {
        if self.open.load(AtomicOrdering::SeqCst) {
            self.close();
        }
    }
}

/// Restartable cursor over one content type's lines: re-derives a fresh
/// `LineIterator` at the recorded byte offset on each step, so it can be
/// returned without borrowing from `&Dictionary` (its `SourceHandle` keeps
/// the backing buffer alive on its own).
fn step<'a>(source: &'a SourceHandle, cursor: &mut usize) -> Option<wordnet_db::Result<String>> {
    let binary = source.as_binary()?;
    let mut iter = binary.iterate_from_offset(*cursor);
    let item = iter.next();
    *cursor = iter.position();
    item
}

/// Hot-swappable public iterator types (spec.md §4.8): each starts out
/// reading its backing file directly and switches to the RAM snapshot the
/// moment one is installed, without repeating or skipping an element. See
/// [`crate::hotswap`].
pub type IndexWordIterator = HotSwapIterator<IndexWord, BackingIndexWordIterator>;
pub type SynsetIterator = HotSwapIterator<Synset, BackingSynsetIterator>;
pub type SenseEntryIterator = HotSwapIterator<SenseEntry, BackingSenseEntryIterator>;
pub type ExceptionEntryIterator = HotSwapIterator<ExceptionEntry, BackingExceptionEntryIterator>;

pub struct BackingIndexWordIterator {
    source: Option<SourceHandle>,
    pos: Pos,
    cursor: usize,
}

impl Iterator for BackingIndexWordIterator {
    type Item = Result<Arc<IndexWord>>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_ref()?;
        match step(source, &mut self.cursor)? {
            Err(e) => Some(Err(e.into())),
            Ok(line) => Some(parse_index_line(&line, self.pos).map(Arc::new).map_err(Into::into)),
        }
    }
}

pub struct BackingSynsetIterator {
    source: Option<SourceHandle>,
    pos: Pos,
    cursor: usize,
}

impl Iterator for BackingSynsetIterator {
    type Item = Result<Arc<Synset>>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_ref()?;
        match step(source, &mut self.cursor)? {
            Err(e) => Some(Err(e.into())),
            Ok(line) => Some(parse_synset_line(&line, self.pos).map(Arc::new).map_err(Into::into)),
        }
    }
}

pub struct BackingSenseEntryIterator {
    source: Option<SourceHandle>,
    cursor: usize,
}

impl Iterator for BackingSenseEntryIterator {
    type Item = Result<Arc<SenseEntry>>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_ref()?;
        match step(source, &mut self.cursor)? {
            Err(e) => Some(Err(e.into())),
            Ok(line) => Some(parse_sense_index_line(&line).map(Arc::new).map_err(Into::into)),
        }
    }
}

pub struct BackingExceptionEntryIterator {
    source: Option<SourceHandle>,
    pos: Pos,
    cursor: usize,
}

impl Iterator for BackingExceptionEntryIterator {
    type Item = Result<Arc<ExceptionEntry>>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_ref()?;
        match step(source, &mut self.cursor)? {
            Err(e) => Some(Err(e.into())),
            Ok(line) => Some(
                parse_exception_line(&line)
                    .map_err(DictError::from)
                    .and_then(|proxy| ExceptionEntry::from_proxy(proxy, self.pos).map_err(Into::into).map(Arc::new)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn seed(dir: &std::path::Path) {
        write_file(
            dir,
            "index.noun",
            "  1 fixture\n\
             ant n 1 0 0 1 1 00000042\n\
             dog n 1 0 0 1 1 00000154\n",
        );
        write_file(
            dir,
            "data.noun",
            "  1 fixture\n\
             00000042 03 n 01 ant 0 001 @ 00000154 n 0000 | a small insect\n\
             00000104 03 n 01 insect 0 000 | a small arthropod\n\
             00000154 03 n 01 dog 0 000 | a domesticated canine\n",
        );
        write_file(dir, "noun.exc", "axes ax axis\n");
        write_file(
            dir,
            "index.sense",
            "ant%1:05:00:: 00000042 1 0\ndog%1:05:00:: 00000154 1 0\n",
        );
    }

    #[test]
    fn get_index_word_resolves_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let word = dict.get_index_word("dog", Pos::Noun).unwrap().unwrap();
        assert_eq!(word.word_ids.len(), 1);
        assert!(dict.get_index_word("dog", Pos::Noun).unwrap().is_some());
    }

    #[test]
    fn get_synset_round_trips_offset() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let id = SynsetId::new(154, Pos::Noun).unwrap();
        let synset = dict.get_synset(&id).unwrap().unwrap();
        assert_eq!(synset.words[0].lemma, "dog");
    }

    #[test]
    fn get_word_by_sense_key_finds_the_member() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let key: SenseKey = "dog%1:05:00::".parse().unwrap();
        let resolved = dict.get_word_by_sense_key(&key).unwrap().unwrap();
        assert_eq!(resolved.word.lemma, "dog");
        assert_eq!(resolved.synset.id.offset, 154);
    }

    #[test]
    fn get_exception_entry_reads_roots() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let entry = dict.get_exception_entry("axes", Pos::Noun).unwrap().unwrap();
        assert_eq!(entry.root_forms, vec!["ax".to_string(), "axis".to_string()]);
    }

    #[test]
    fn get_words_collects_prefix_matches_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let words = dict.get_words("d", Some(Pos::Noun), 10).unwrap();
        assert_eq!(words, vec!["dog".to_string()]);
    }

    #[test]
    fn synset_iterator_yields_every_record_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        let lemmas: Vec<String> = dict
            .get_synset_iterator(Pos::Noun)
            .unwrap()
            .map(|s| s.unwrap().words[0].lemma.clone())
            .collect();
        assert_eq!(lemmas, vec!["ant".to_string(), "insect".to_string(), "dog".to_string()]);
    }

    #[test]
    fn synset_iterator_hot_swaps_to_snapshot_mid_iteration() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();

        let mut iter = dict.get_synset_iterator(Pos::Noun).unwrap();
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.words[0].lemma, "ant");

        let snapshot = RamDictionary::build(&dict).unwrap();
        dict.install_snapshot(snapshot);

        let rest: Vec<String> = iter.map(|s| s.unwrap().words[0].lemma.clone()).collect();
        assert_eq!(rest, vec!["insect".to_string(), "dog".to_string()]);
    }

    #[test]
    fn closed_dictionary_rejects_queries() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let dict = Dictionary::open(dir.path()).unwrap();
        dict.close();
        assert!(matches!(dict.get_index_word("dog", Pos::Noun), Err(DictError::ObjectClosed)));
    }
}
