//! The LRU layer sitting between facade callers and the backing dictionary.
//!
//! Four maps, one per spec.md §4.7: by item id (index word / synset, keyed
//! as a string so both id kinds share one map), by sense key (word), by
//! sense key (sense entry), and by sense key (the senses array behind a
//! `getWords`-style prefix lookup). All four share one `max_capacity` and
//! one open/close lifecycle.

use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use wordnet_types::{IndexWord, SenseEntry, SenseKey, Synset};

use crate::dictionary::ResolvedWord;
use crate::error::{DictError, Result};

enum Bound {
    Capped(NonZeroUsize),
    Disabled,
}

fn cache_of<T>(bound: &Bound) -> LruCache<String, Arc<T>> {
    match bound {
        Bound::Capped(n) => LruCache::new(*n),
        Bound::Disabled => LruCache::unbounded(),
    }
}

/// One of the four maps: item id / sense key to the record, recency-ordered.
struct Map<T> {
    inner: Mutex<LruCache<String, Arc<T>>>,
}

impl<T> Map<T> {
    fn new(bound: &Bound) -> Self {
        Self { inner: Mutex::new(cache_of(bound)) }
    }

    fn get(&self, key: &str) -> Option<Arc<T>> {
        self.inner.lock().get(key).cloned()
    }

    fn put(&self, key: String, value: Arc<T>) {
        self.inner.lock().put(key, value);
    }
}

/// The cache layer: four LRU maps plus its own open/close lifecycle.
pub struct Cache {
    enabled: bool,
    index_words: Map<IndexWord>,
    synsets: Map<Synset>,
    words_by_sense_key: Map<ResolvedWord>,
    sense_entries: Map<SenseEntry>,
    open: std::sync::atomic::AtomicBool,
}

impl Cache {
    /// `max_capacity = 0` disables caching entirely, per spec.
    pub fn new(max_capacity: usize) -> Self {
        let enabled = max_capacity > 0;
        let bound = NonZeroUsize::new(max_capacity).map(Bound::Capped).unwrap_or(Bound::Disabled);
        Self {
            enabled,
            index_words: Map::new(&bound),
            synsets: Map::new(&bound),
            words_by_sense_key: Map::new(&bound),
            sense_entries: Map::new(&bound),
            open: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn open(&self) {
        self.open.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.open.store(false, std::sync::atomic::Ordering::SeqCst);
        self.index_words.inner.lock().clear();
        self.synsets.inner.lock().clear();
        self.words_by_sense_key.inner.lock().clear();
        self.sense_entries.inner.lock().clear();
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open.load(std::sync::atomic::Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DictError::ObjectClosed)
        }
    }

    pub fn get_index_word(&self, key: &str) -> Result<Option<Arc<IndexWord>>> {
        self.ensure_open()?;
        Ok(if self.enabled { self.index_words.get(key) } else { None })
    }

    pub fn put_index_word(&self, key: String, value: Arc<IndexWord>) -> Result<()> {
        self.ensure_open()?;
        if self.enabled {
            self.index_words.put(key, value);
        }
        Ok(())
    }

    pub fn get_synset(&self, key: &str) -> Result<Option<Arc<Synset>>> {
        self.ensure_open()?;
        Ok(if self.enabled { self.synsets.get(key) } else { None })
    }

    /// Inserting a synset fans out into every member word's sense-key entry,
    /// per spec.md §4.7. `sense_keys` must already carry a resolved head for
    /// any satellite word (the caller follows `SIMILAR_TO` before calling
    /// this), one per `value.words`, in order.
    pub fn put_synset(&self, key: String, value: Arc<Synset>, sense_keys: &[SenseKey]) -> Result<()> {
        self.ensure_open()?;
        if !self.enabled {
            return Ok(());
        }
        for ((number, word), sense_key) in (1u8..).zip(value.words.iter()).zip(sense_keys.iter()) {
            let resolved = ResolvedWord { synset: value.clone(), number, word: word.clone() };
            self.words_by_sense_key.put(sense_key.to_string(), Arc::new(resolved));
        }
        self.synsets.put(key, value);
        Ok(())
    }

    pub fn get_word_by_sense_key(&self, key: &str) -> Result<Option<Arc<ResolvedWord>>> {
        self.ensure_open()?;
        Ok(if self.enabled { self.words_by_sense_key.get(key) } else { None })
    }

    pub fn put_word_by_sense_key(&self, key: String, value: Arc<ResolvedWord>) -> Result<()> {
        self.ensure_open()?;
        if self.enabled {
            self.words_by_sense_key.put(key, value);
        }
        Ok(())
    }

    pub fn get_sense_entry(&self, key: &str) -> Result<Option<Arc<SenseEntry>>> {
        self.ensure_open()?;
        Ok(if self.enabled { self.sense_entries.get(key) } else { None })
    }

    pub fn put_sense_entry(&self, key: String, value: Arc<SenseEntry>) -> Result<()> {
        self.ensure_open()?;
        if self.enabled {
            self.sense_entries.put(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordnet_types::{IndexWordId, Pos, WordId};

    fn sample_index_word() -> IndexWord {
        let synset = wordnet_types::SynsetId::new(1, Pos::Noun).unwrap();
        IndexWord::new(
            IndexWordId::new("dog", Pos::Noun).unwrap(),
            0,
            vec![WordId::by_lemma(synset, "dog").unwrap()],
            Default::default(),
        )
        .unwrap()
    }

    #[test]
    fn disabled_cache_never_returns_a_hit() {
        let cache = Cache::new(0);
        cache.open();
        cache.put_index_word("dog".into(), Arc::new(sample_index_word())).unwrap();
        assert!(cache.get_index_word("dog").unwrap().is_none());
    }

    #[test]
    fn closed_cache_rejects_access() {
        let cache = Cache::new(16);
        assert!(matches!(cache.get_index_word("dog"), Err(DictError::ObjectClosed)));
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = Cache::new(16);
        cache.open();
        cache.put_index_word("dog".into(), Arc::new(sample_index_word())).unwrap();
        assert!(cache.get_index_word("dog").unwrap().is_some());
    }

    #[test]
    fn eviction_drops_the_least_recently_used_entry() {
        let cache = Cache::new(1);
        cache.open();
        cache.put_index_word("dog".into(), Arc::new(sample_index_word())).unwrap();
        cache.put_index_word("cat".into(), Arc::new(sample_index_word())).unwrap();
        assert!(cache.get_index_word("dog").unwrap().is_none());
        assert!(cache.get_index_word("cat").unwrap().is_some());
    }
}
