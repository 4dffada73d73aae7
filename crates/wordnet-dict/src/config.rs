//! The builder of knobs a caller may set before opening a [`crate::Dictionary`].

use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use wordnet_db::{Charset, ContentTypeKey, LoadPolicy};
use wordnet_parse::LineComparator;

/// Configuration accepted by [`crate::Dictionary::open_with_config`].
#[derive(Clone)]
pub struct DictionaryConfig {
    pub(crate) source_path: PathBuf,
    pub(crate) load_policy: LoadPolicy,
    pub(crate) charset: Option<Charset>,
    pub(crate) comparator_overrides: Vec<(ContentTypeKey, Arc<dyn LineComparator>)>,
    pub(crate) source_matcher_overrides: Vec<(ContentTypeKey, Regex)>,
    pub(crate) cache_enabled: bool,
    pub(crate) cache_max_capacity: usize,
    pub(crate) check_lexical_id: bool,
}

/// Cache capacity default per spec (§4.7): 512 steady-state, 16 initial.
pub const DEFAULT_CACHE_MAX_CAPACITY: usize = 512;

impl DictionaryConfig {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            load_policy: LoadPolicy::NoLoad,
            charset: None,
            comparator_overrides: Vec::new(),
            source_matcher_overrides: Vec::new(),
            cache_enabled: true,
            cache_max_capacity: DEFAULT_CACHE_MAX_CAPACITY,
            check_lexical_id: false,
        }
    }

    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn comparator(mut self, key: ContentTypeKey, comparator: Arc<dyn LineComparator>) -> Self {
        self.comparator_overrides.push((key, comparator));
        self
    }

    pub fn source_matcher(mut self, key: ContentTypeKey, pattern: Regex) -> Self {
        self.source_matcher_overrides.push((key, pattern));
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn cache_max_capacity(mut self, capacity: usize) -> Self {
        self.cache_max_capacity = capacity;
        self
    }

    /// If true, reject out-of-range lexical ids (`[0,15]`); some corpora
    /// violate this, so it defaults off.
    pub fn check_lexical_id(mut self, check: bool) -> Self {
        self.check_lexical_id = check;
        self
    }
}
