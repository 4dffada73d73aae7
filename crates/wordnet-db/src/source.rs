//! The two data-source variants: binary search over alphabetically-sorted
//! files, and direct offset seek into data files.

use std::cmp::Ordering;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use memmap2::Mmap;
use parking_lot::Mutex;
use wordnet_parse::LineComparator;

use crate::buffer::Buffer;
use crate::content_type::{Charset, ContentType};
use crate::error::{DbError, Result};
use crate::line::{read_line, rewind_to_line_start};
use crate::version;

type SharedBuffer = Mutex<Option<Arc<Buffer>>>;

/// State and behavior common to both data-source variants: the mmap/owned
/// buffer swap, open/close lifecycle, and version resolution.
struct Core {
    path: PathBuf,
    comparator: Arc<dyn LineComparator>,
    charset: Charset,
    buffer: SharedBuffer,
    is_open: AtomicBool,
    loaded: AtomicBool,
    version: Mutex<Option<String>>,
}

impl Core {
    fn new(path: PathBuf, content_type: &ContentType) -> Self {
        Self {
            path,
            comparator: content_type.comparator.clone(),
            charset: content_type.charset,
            buffer: Mutex::new(None),
            is_open: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            version: Mutex::new(None),
        }
    }

    fn open(&self) -> Result<()> {
        if self.is_open.load(AtomicOrdering::SeqCst) {
            return Ok(());
        }
        let file = File::open(&self.path).map_err(|source| DbError::Io { path: self.path.clone(), source })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| DbError::Io { path: self.path.clone(), source })?;
        let buffer = Arc::new(Buffer::Mmap(mmap));
        *self.version.lock() = version::resolve_from_header(buffer.as_slice(), self.comparator.as_ref(), self.charset);
        *self.buffer.lock() = Some(buffer);
        self.is_open.store(true, AtomicOrdering::SeqCst);
        tracing::debug!(path = %self.path.display(), "opened data source");
        Ok(())
    }

    fn close(&self) {
        *self.buffer.lock() = None;
        self.is_open.store(false, AtomicOrdering::SeqCst);
        self.loaded.store(false, AtomicOrdering::SeqCst);
        tracing::debug!(path = %self.path.display(), "closed data source");
    }

    fn current_buffer(&self) -> Result<Arc<Buffer>> {
        self.buffer.lock().clone().ok_or(DbError::ObjectClosed)
    }

    /// Read the whole file into an owned buffer and hot-swap it in.
    /// Byte offsets are unaffected, so any in-flight descent or iterator
    /// stays valid across the swap.
    fn load(&self) -> Result<()> {
        let current = self.current_buffer()?;
        let owned = current.as_slice().to_vec();
        *self.buffer.lock() = Some(Arc::new(Buffer::Owned(owned)));
        self.loaded.store(true, AtomicOrdering::SeqCst);
        tracing::debug!(path = %self.path.display(), "loaded data source into RAM");
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(AtomicOrdering::SeqCst)
    }

    fn version(&self) -> Option<String> {
        self.version.lock().clone()
    }
}

/// A lazy, comment-skipping sequence of lines starting at a fixed byte
/// offset. Tolerates the backing buffer being hot-swapped: it re-fetches the
/// current buffer on every step rather than holding one for its lifetime, so
/// it never blocks (or is blocked by) the per-source descent lock.
pub struct LineIterator<'a> {
    buffer: fn(&Core) -> Result<Arc<Buffer>>,
    core: &'a Core,
    pos: usize,
    comparator: Arc<dyn LineComparator>,
    charset: Charset,
}

impl<'a> LineIterator<'a> {
    fn new(core: &'a Core, pos: usize) -> Self {
        Self {
            buffer: Core::current_buffer,
            core,
            pos,
            comparator: core.comparator.clone(),
            charset: core.charset,
        }
    }

    /// The byte offset the next `next()` call will resume from. Lets a
    /// caller that cannot hold a borrowed iterator across calls (because it
    /// owns the source behind an `Arc`, not a reference) restart a fresh one
    /// at the right cursor after each step.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for LineIterator<'a> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let buffer = match (self.buffer)(self.core) {
                Ok(b) => b,
                Err(e) => return Some(Err(e)),
            };
            let bytes = buffer.as_slice();
            match read_line(bytes, self.pos, self.charset) {
                None => return None,
                Some((line, next)) => {
                    self.pos = next;
                    if self.comparator.is_comment(&line) {
                        continue;
                    }
                    return Some(Ok(line));
                }
            }
        }
    }
}

/// Binary-search source: used for alphabetically-ordered files (`index.*`,
/// `*.exc`, `index.sense`).
pub struct BinarySearchSource {
    core: Core,
}

impl BinarySearchSource {
    pub fn new(path: impl AsRef<Path>, content_type: &ContentType) -> Self {
        Self { core: Core::new(path.as_ref().to_path_buf(), content_type) }
    }

    pub fn open(&self) -> Result<()> {
        self.core.open()
    }

    pub fn close(&self) {
        self.core.close()
    }

    pub fn is_loaded(&self) -> bool {
        self.core.is_loaded()
    }

    pub fn load(&self) -> Result<()> {
        self.core.load()
    }

    pub fn version(&self) -> Option<String> {
        self.core.version()
    }

    /// Binary search per the standard descent: narrow `[start, stop)` by
    /// repeatedly reading the line at the midpoint's line start and
    /// comparing it against `key`. A null (past-end) line compares greater;
    /// a comment line always compares less, pushing the search forward past
    /// the header.
    pub fn lookup(&self, key: &str) -> Result<Option<String>> {
        let buffer = self.core.current_buffer()?;
        let bytes = buffer.as_slice();
        let mut start = 0usize;
        let mut stop = bytes.len();
        while stop - start > 1 {
            let mid = start + (stop - start) / 2;
            let line_start = rewind_to_line_start(bytes, mid);
            match read_line(bytes, line_start, self.core.charset) {
                None => stop = mid,
                Some((line, _)) if self.core.comparator.is_comment(&line) => start = mid,
                Some((line, _)) => {
                    let cmp = self.core.comparator.compare_keys(self.core.comparator.key(&line), key);
                    match cmp {
                        Ordering::Equal => return Ok(Some(line)),
                        Ordering::Greater => stop = mid,
                        Ordering::Less => start = mid,
                    }
                }
            }
        }
        Ok(None)
    }

    /// Descend as in [`lookup`](Self::lookup), but using a prefix-aware
    /// comparator and recording the most recent line whose key starts with
    /// `prefix`. Used by `getWords` to locate where prefix iteration should
    /// begin even when no line exactly equals the prefix.
    pub fn find_prefix_start(&self, prefix: &str, prefix_comparator: &dyn LineComparator) -> Result<Option<usize>> {
        let buffer = self.core.current_buffer()?;
        let bytes = buffer.as_slice();
        let mut start = 0usize;
        let mut stop = bytes.len();
        let mut last_match: Option<usize> = None;
        while stop - start > 1 {
            let mid = start + (stop - start) / 2;
            let line_start = rewind_to_line_start(bytes, mid);
            match read_line(bytes, line_start, self.core.charset) {
                None => stop = mid,
                Some((line, _)) if self.core.comparator.is_comment(&line) => start = mid,
                Some((line, _)) => {
                    let cmp = prefix_comparator.compare_keys(prefix_comparator.key(&line), prefix);
                    match cmp {
                        Ordering::Equal => {
                            last_match = Some(line_start);
                            stop = mid;
                        }
                        Ordering::Greater => stop = mid,
                        Ordering::Less => start = mid,
                    }
                }
            }
        }
        Ok(last_match)
    }

    pub fn iterate(&self) -> LineIterator<'_> {
        LineIterator::new(&self.core, 0)
    }

    pub fn iterate_from_offset(&self, pos: usize) -> LineIterator<'_> {
        LineIterator::new(&self.core, pos)
    }
}

/// Direct-access source: used for `data.*` files, keyed by byte offset.
pub struct DirectAccessSource {
    core: Core,
}

impl DirectAccessSource {
    pub fn new(path: impl AsRef<Path>, content_type: &ContentType) -> Self {
        Self { core: Core::new(path.as_ref().to_path_buf(), content_type) }
    }

    pub fn open(&self) -> Result<()> {
        self.core.open()
    }

    pub fn close(&self) {
        self.core.close()
    }

    pub fn is_loaded(&self) -> bool {
        self.core.is_loaded()
    }

    pub fn load(&self) -> Result<()> {
        self.core.load()
    }

    pub fn version(&self) -> Option<String> {
        self.core.version()
    }

    /// Parse `offset_string` as a decimal byte offset; position the buffer
    /// there and confirm the line begins with that same offset, guarding
    /// against CRLF/LF desynchronization between the index and the file.
    pub fn lookup(&self, offset_string: &str) -> Result<Option<String>> {
        let offset: usize = match offset_string.parse() {
            Ok(n) => n,
            Err(_) => return Ok(None),
        };
        let buffer = self.core.current_buffer()?;
        let bytes = buffer.as_slice();
        if offset >= bytes.len() {
            return Ok(None);
        }
        match read_line(bytes, offset, self.core.charset) {
            Some((line, _)) if line.starts_with(offset_string) => Ok(Some(line)),
            _ => Ok(None),
        }
    }

    pub fn iterate(&self) -> LineIterator<'_> {
        LineIterator::new(&self.core, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::ContentTypeRegistry;
    use std::io::Write;
    use wordnet_types::Pos;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn binary_search_finds_exact_lemma() {
        let registry = ContentTypeRegistry::new();
        let contents = "  1 header comment\nant n 1 0 0 1 1 00001740\ndog n 1 0 0 1 1 00002000\nzebra n 1 0 0 1 1 00003000\n";
        let file = write_fixture(contents);
        let source = BinarySearchSource::new(file.path(), registry.get_index(Pos::Noun));
        source.open().unwrap();
        let line = source.lookup("dog").unwrap().unwrap();
        assert!(line.starts_with("dog "));
    }

    #[test]
    fn binary_search_returns_none_for_missing_key() {
        let registry = ContentTypeRegistry::new();
        let contents = "ant n 1 0 0 1 1 00001740\nzebra n 1 0 0 1 1 00003000\n";
        let file = write_fixture(contents);
        let source = BinarySearchSource::new(file.path(), registry.get_index(Pos::Noun));
        source.open().unwrap();
        assert!(source.lookup("cat").unwrap().is_none());
    }

    #[test]
    fn direct_access_confirms_offset_prefix() {
        let registry = ContentTypeRegistry::new();
        let contents = "00000000 03 n 01 entity 0 000 | gloss\n";
        let file = write_fixture(contents);
        let source = DirectAccessSource::new(file.path(), registry.get_data(Pos::Noun));
        source.open().unwrap();
        let line = source.lookup("00000000").unwrap().unwrap();
        assert!(line.starts_with("00000000"));
    }

    #[test]
    fn load_hot_swaps_to_owned_buffer_without_changing_contents() {
        let registry = ContentTypeRegistry::new();
        let contents = "ant n 1 0 0 1 1 00001740\ndog n 1 0 0 1 1 00002000\n";
        let file = write_fixture(contents);
        let source = BinarySearchSource::new(file.path(), registry.get_index(Pos::Noun));
        source.open().unwrap();
        source.load().unwrap();
        assert!(source.is_loaded());
        let line = source.lookup("dog").unwrap().unwrap();
        assert!(line.starts_with("dog "));
    }

    #[test]
    fn iterate_skips_comment_header() {
        let registry = ContentTypeRegistry::new();
        let contents = "  1 header\nant n 1 0 0 1 1 00001740\ndog n 1 0 0 1 1 00002000\n";
        let file = write_fixture(contents);
        let source = BinarySearchSource::new(file.path(), registry.get_index(Pos::Noun));
        source.open().unwrap();
        let lines: Vec<String> = source.iterate().collect::<Result<_>>().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ant"));
    }
}
