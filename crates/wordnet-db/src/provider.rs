//! Discovers files in a source directory, matches them to content types,
//! opens data sources, and manages lifecycle and background loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::thread::JoinHandle;

use parking_lot::{Mutex, RwLock};
use regex::Regex;

use crate::content_type::{Charset, ContentType, ContentTypeKey, ContentTypeRegistry, DataKind};
use crate::error::{DbError, Result};
use crate::source::{BinarySearchSource, DirectAccessSource};
use wordnet_parse::{DataComparator, LineComparator};

/// When to pre-load a provider's data sources into RAM.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadPolicy {
    NoLoad,
    BackgroundLoad,
    ImmediateLoad,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        LoadPolicy::NoLoad
    }
}

/// Either variant of data source, unified behind the same contract so the
/// provider can hold one map keyed by content type.
pub enum DataSource {
    Binary(BinarySearchSource),
    Direct(DirectAccessSource),
}

impl DataSource {
    pub fn open(&self) -> Result<()> {
        match self {
            DataSource::Binary(s) => s.open(),
            DataSource::Direct(s) => s.open(),
        }
    }

    pub fn close(&self) {
        match self {
            DataSource::Binary(s) => s.close(),
            DataSource::Direct(s) => s.close(),
        }
    }

    pub fn lookup(&self, key: &str) -> Result<Option<String>> {
        match self {
            DataSource::Binary(s) => s.lookup(key),
            DataSource::Direct(s) => s.lookup(key),
        }
    }

    pub fn load(&self) -> Result<()> {
        match self {
            DataSource::Binary(s) => s.load(),
            DataSource::Direct(s) => s.load(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        match self {
            DataSource::Binary(s) => s.is_loaded(),
            DataSource::Direct(s) => s.is_loaded(),
        }
    }

    pub fn version(&self) -> Option<String> {
        match self {
            DataSource::Binary(s) => s.version(),
            DataSource::Direct(s) => s.version(),
        }
    }

    pub fn as_binary(&self) -> Option<&BinarySearchSource> {
        match self {
            DataSource::Binary(s) => Some(s),
            DataSource::Direct(_) => None,
        }
    }

    pub fn as_direct(&self) -> Option<&DirectAccessSource> {
        match self {
            DataSource::Direct(s) => Some(s),
            DataSource::Binary(_) => None,
        }
    }
}

/// A borrowed handle to one opened data source. Derefs to [`DataSource`];
/// keeps the provider's source map alive without holding any provider-wide
/// lock for the duration of a query — only the source's own internal mutex
/// serializes descent.
pub struct SourceHandle {
    sources: Arc<HashMap<ContentTypeKey, DataSource>>,
    key: ContentTypeKey,
}

impl std::ops::Deref for SourceHandle {
    type Target = DataSource;

    fn deref(&self) -> &DataSource {
        self.sources.get(&self.key).expect("key checked present at construction")
    }
}

fn filename_matches(path: &Path, hints: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    hints.iter().all(|hint| lower.contains(hint))
}

/// Build the data source for one content type, applying the direct-access
/// fallback policy for data files: try direct access first, confirm it
/// against the first data line's own offset, and fall back to binary search
/// (with a diagnostic) if the offsets don't line up.
fn build_source(path: &Path, content_type: &ContentType) -> Result<DataSource> {
    if content_type.key.data_kind() != DataKind::Data {
        let source = BinarySearchSource::new(path, content_type);
        source.open()?;
        return Ok(DataSource::Binary(source));
    }

    let direct = DirectAccessSource::new(path, content_type);
    direct.open()?;
    let first_line = direct.iterate().next().transpose()?;
    let confirmed = match &first_line {
        Some(line) => {
            let offset = DataComparator.key(line);
            matches!(direct.lookup(offset), Ok(Some(_)))
        }
        None => true,
    };
    if confirmed {
        return Ok(DataSource::Direct(direct));
    }

    tracing::warn!(
        path = %path.display(),
        "direct access offsets disagree with file contents, falling back to binary search",
    );
    direct.close();
    let binary = BinarySearchSource::new(path, content_type);
    binary.open()?;
    Ok(DataSource::Binary(binary))
}

/// Opens a directory of WordNet-format files as a map of content type to
/// data source, honoring filename-hint discovery or caller-registered regex
/// overrides, and orchestrating a background pre-load per the configured
/// [`LoadPolicy`].
///
/// Lifecycle mutations (`open`/`close`/the `set_*` configuration methods)
/// take `&self`: every mutable field below has its own lock, so concurrent
/// readers are never blocked by another thread merely holding a `&FileProvider`.
pub struct FileProvider {
    dir: PathBuf,
    registry: RwLock<ContentTypeRegistry>,
    overrides: Mutex<HashMap<ContentTypeKey, Regex>>,
    sources: RwLock<Arc<HashMap<ContentTypeKey, DataSource>>>,
    load_policy: Mutex<LoadPolicy>,
    open: AtomicBool,
    cancel: Arc<AtomicBool>,
    loader: Mutex<Option<JoinHandle<()>>>,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            registry: RwLock::new(ContentTypeRegistry::new()),
            overrides: Mutex::new(HashMap::new()),
            sources: RwLock::new(Arc::new(HashMap::new())),
            load_policy: Mutex::new(LoadPolicy::default()),
            open: AtomicBool::new(false),
            cancel: Arc::new(AtomicBool::new(false)),
            loader: Mutex::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(AtomicOrdering::SeqCst)
    }

    /// Override the comparator used for one content type. Rejected once open.
    pub fn set_comparator(&self, key: ContentTypeKey, comparator: Arc<dyn LineComparator>) -> Result<()> {
        if self.is_open() {
            return Err(DbError::ObjectOpen);
        }
        self.registry.write().set_comparator(key, comparator)
    }

    /// Override the charset used for one content type. Rejected once open.
    pub fn set_charset(&self, key: ContentTypeKey, charset: Charset) -> Result<()> {
        if self.is_open() {
            return Err(DbError::ObjectOpen);
        }
        self.registry.write().set_charset(key, charset)
    }

    /// Register a filename regex override for a content-type key. Honoured
    /// before hint-based discovery. Rejected once the provider is open.
    pub fn set_filename_override(&self, key: ContentTypeKey, pattern: Regex) -> Result<()> {
        if self.is_open() {
            return Err(DbError::ObjectOpen);
        }
        self.overrides.lock().insert(key, pattern);
        Ok(())
    }

    pub fn set_load_policy(&self, policy: LoadPolicy) -> Result<()> {
        if self.is_open() {
            return Err(DbError::ObjectOpen);
        }
        *self.load_policy.lock() = policy;
        Ok(())
    }

    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|source| DbError::Io { path: self.dir.clone(), source })? {
            let entry = entry.map_err(|source| DbError::Io { path: self.dir.clone(), source })?;
            let path = entry.path();
            if path.is_file() {
                candidates.push(path);
            }
        }
        Ok(candidates)
    }

    /// Open every content type's data source and, per the configured load
    /// policy, start (and possibly wait on) a background pre-load.
    pub fn open(&self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        let mut pool = self.discover()?;
        self.registry.write().mark_open();
        let overrides = self.overrides.lock();

        let mut sources = HashMap::new();
        for key in ContentTypeKey::ALL {
            let matched_index = if let Some(pattern) = overrides.get(&key) {
                pool.iter().position(|p| {
                    p.file_name().and_then(|n| n.to_str()).map(|n| pattern.is_match(n)).unwrap_or(false)
                })
            } else {
                pool.iter().position(|p| filename_matches(p, &key.filename_hints()))
            };

            let Some(index) = matched_index else { continue };
            let path = pool[index].clone();
            let shared = matches!(key.data_kind(), DataKind::Index | DataKind::Sense);
            if !shared {
                pool.remove(index);
            }

            let content_type = self.registry.read().get(key).clone();
            let source = build_source(&path, &content_type)?;
            sources.insert(key, source);
        }
        drop(overrides);

        *self.sources.write() = Arc::new(sources);
        self.open.store(true, AtomicOrdering::SeqCst);
        self.cancel.store(false, AtomicOrdering::SeqCst);

        match *self.load_policy.lock() {
            LoadPolicy::NoLoad => {}
            LoadPolicy::ImmediateLoad => self.run_background_load(),
            LoadPolicy::BackgroundLoad => self.spawn_background_load(),
        }

        Ok(())
    }

    fn run_background_load(&self) {
        for source in self.sources.read().values() {
            if self.cancel.load(AtomicOrdering::SeqCst) {
                break;
            }
            if let Err(e) = source.load() {
                tracing::error!(error = %e, "background load failed, callers will keep hitting the backing source");
                break;
            }
        }
    }

    fn spawn_background_load(&self) {
        let sources = self.sources.read().clone();
        let cancel = self.cancel.clone();
        let handle = std::thread::spawn(move || {
            for source in sources.values() {
                if cancel.load(AtomicOrdering::SeqCst) {
                    break;
                }
                if let Err(e) = source.load() {
                    tracing::error!(error = %e, "background load failed, callers will keep hitting the backing source");
                    break;
                }
            }
        });
        *self.loader.lock() = Some(handle);
    }

    /// Interrupt and join the background loader, then close every source.
    pub fn close(&self) {
        self.cancel.store(true, AtomicOrdering::SeqCst);
        if let Some(handle) = self.loader.lock().take() {
            let _ = handle.join();
        }
        for source in self.sources.read().values() {
            source.close();
        }
        *self.sources.write() = Arc::new(HashMap::new());
        self.registry.write().mark_closed();
        self.open.store(false, AtomicOrdering::SeqCst);
    }

    pub fn source(&self, key: ContentTypeKey) -> Option<SourceHandle> {
        let sources = self.sources.read().clone();
        if sources.contains_key(&key) { Some(SourceHandle { sources, key }) } else { None }
    }

    /// The dictionary version if every opened source's header agrees;
    /// `None` ("no version") if any disagree or are unversioned.
    pub fn version(&self) -> Option<String> {
        let sources = self.sources.read().clone();
        let mut versions = sources.values().map(|s| s.version());
        let first = versions.next()??;
        if versions.all(|v| v.as_deref() == Some(first.as_str())) {
            Some(first)
        } else {
            None
        }
    }
}

impl Drop for FileProvider {
    fn drop(&mut self) {
        if self.is_open() {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn discovers_and_opens_index_and_data_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.noun", "  1 header\nant n 1 0 0 1 1 00000000\n");
        // "00000011" is the byte offset of this line itself, header included,
        // so the direct-access confirmation check succeeds.
        write_file(dir.path(), "data.noun", "  1 header\n00000011 03 n 01 ant 0 000 | small insect\n");

        let provider = FileProvider::new(dir.path());
        provider.open().unwrap();

        let index = provider.source(ContentTypeKey::IndexNoun).unwrap();
        assert!(index.lookup("ant").unwrap().is_some());

        let data = provider.source(ContentTypeKey::DataNoun).unwrap();
        assert!(data.lookup("00000011").unwrap().is_some());
        assert!(matches!(*data, DataSource::Direct(_)));

        provider.close();
    }

    #[test]
    fn falls_back_to_binary_search_when_offsets_are_inflated() {
        let dir = tempfile::tempdir().unwrap();
        // CRLF terminators inflate byte offsets by one per preceding line,
        // so the offset recorded in the line text no longer matches its
        // real file position once more than one line precedes it.
        write_file(
            dir.path(),
            "data.verb",
            "  1 header\r\n00000005 03 v 01 run 0 000 | to move fast\r\n00000100 03 v 01 jog 0 000 | to move slowly\r\n",
        );

        let provider = FileProvider::new(dir.path());
        provider.open().unwrap();

        let data = provider.source(ContentTypeKey::DataVerb).unwrap();
        assert!(matches!(*data, DataSource::Binary(_)));
        provider.close();
    }

    #[test]
    fn version_reports_none_when_sources_disagree() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.noun", "  1 WordNet 3.0\nant n 1 0 0 1 1 00000000\n");
        write_file(dir.path(), "data.noun", "  1 WordNet 3.1\n00000016 03 n 01 ant 0 000 | small insect\n");

        let provider = FileProvider::new(dir.path());
        provider.open().unwrap();
        assert!(provider.version().is_none());
        provider.close();
    }

    #[test]
    fn set_load_policy_rejected_once_open() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.noun", "ant n 1 0 0 1 1 00000000\n");
        let provider = FileProvider::new(dir.path());
        provider.open().unwrap();
        assert!(matches!(provider.set_load_policy(LoadPolicy::ImmediateLoad), Err(DbError::ObjectOpen)));
        provider.close();
    }
}
