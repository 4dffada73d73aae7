//! Hot-swap iterator protocol (spec.md §4.8): an iterator handed out by the
//! facade starts out reading the backing files directly, and transparently
//! switches to the RAM snapshot's iterator the moment one becomes available
//! — without repeating or skipping an element.
//!
//! The switch works by replay: the wrapper remembers the key of the last
//! item it returned, and when the snapshot appears it walks the snapshot's
//! iterator forward until it finds that same key before resuming delivery.
//! If the snapshot never shows the key, the snapshot and the backing files
//! have diverged, which is reported as [`DictError::Inconsistent`] rather
//! than silently skipping or repeating output.

use std::sync::Arc;

use parking_lot::RwLock;

use wordnet_types::{ExceptionEntry, ExceptionEntryId, IndexWord, IndexWordId, Pos, SenseEntry, Synset, SynsetId};

use crate::error::{DictError, Result};
use crate::ram::RamDictionary;

/// Shared cell a [`crate::Dictionary`] and every iterator it hands out hold
/// in common. Installing a snapshot (see `Dictionary::install_snapshot`)
/// flips every live iterator over to it on its next step.
pub type SnapshotCell = Arc<RwLock<Option<Arc<RamDictionary>>>>;

/// What part of the snapshot a hot-swappable iterator draws from: a single
/// part-of-speech bucket (synsets, index words, exceptions), or the whole
/// snapshot at once (sense entries, which the backing `index.sense` file
/// does not split by part of speech).
#[derive(Clone, Copy)]
pub enum PosScope {
    One(Pos),
    All,
}

/// A record kind an iterator can hot-swap over: a stable, comparable key to
/// replay against, and a way to pull this kind's records out of a snapshot
/// in a fixed, file-like order.
pub trait Snapshotted: Sized {
    type Key: Eq + Clone;

    fn key(&self) -> Self::Key;

    /// Every record of this kind under `scope`, in ascending key order — the
    /// same order the backing file is sorted in, so replay-by-key lines up
    /// with what the backing iterator would have produced next.
    fn from_snapshot(snapshot: &RamDictionary, scope: PosScope) -> Vec<Arc<Self>>;
}

impl Snapshotted for Synset {
    type Key = SynsetId;

    fn key(&self) -> Self::Key {
        self.id
    }

    fn from_snapshot(snapshot: &RamDictionary, scope: PosScope) -> Vec<Arc<Self>> {
        let PosScope::One(pos) = scope else { unreachable!("synsets are always scoped to one part of speech") };
        let mut items: Vec<Arc<Self>> = snapshot.synset_iterator(pos).collect();
        items.sort_by_key(|s| s.id.offset);
        items
    }
}

impl Snapshotted for IndexWord {
    type Key = IndexWordId;

    fn key(&self) -> Self::Key {
        self.id.clone()
    }

    fn from_snapshot(snapshot: &RamDictionary, scope: PosScope) -> Vec<Arc<Self>> {
        let PosScope::One(pos) = scope else { unreachable!("index words are always scoped to one part of speech") };
        let mut items: Vec<Arc<Self>> = snapshot.index_word_iterator(pos).collect();
        items.sort_by(|a, b| a.id.lemma.cmp(&b.id.lemma));
        items
    }
}

impl Snapshotted for ExceptionEntry {
    type Key = ExceptionEntryId;

    fn key(&self) -> Self::Key {
        ExceptionEntryId::new(self.surface_form.clone(), self.pos)
            .expect("an entry already built by this crate always has a valid surface form")
    }

    fn from_snapshot(snapshot: &RamDictionary, scope: PosScope) -> Vec<Arc<Self>> {
        let PosScope::One(pos) = scope else { unreachable!("exceptions are always scoped to one part of speech") };
        // `RamDictionary` has no standalone exception-entry iterator (only
        // by-surface-form lookup); fall back to the index-word lemmas,
        // which is the same set of surface forms a `*.exc` file can match.
        let mut surfaces: Vec<String> = snapshot.index_word_iterator(pos).map(|w| w.id.lemma.clone()).collect();
        surfaces.sort();
        surfaces.dedup();
        surfaces.into_iter().filter_map(|s| snapshot.get_exception_entry(&s, pos)).collect()
    }
}

impl Snapshotted for SenseEntry {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.sense_key.to_string()
    }

    fn from_snapshot(snapshot: &RamDictionary, scope: PosScope) -> Vec<Arc<Self>> {
        let pos_list = match scope {
            PosScope::One(pos) => vec![pos],
            PosScope::All => Pos::ALL.to_vec(),
        };
        let mut items: Vec<Arc<Self>> =
            pos_list.into_iter().flat_map(|pos| snapshot.sense_entry_iterator(pos)).collect();
        items.sort_by(|a, b| a.sense_key.to_string().cmp(&b.sense_key.to_string()));
        items
    }
}

enum State<T, B> {
    Backing(B),
    Snapshot(std::vec::IntoIter<Arc<T>>),
}

/// Wraps a backing-file iterator `B` (yielding `Result<Arc<T>>`) with the
/// hot-swap protocol described in the module docs.
pub struct HotSwapIterator<T: Snapshotted, B> {
    snapshot: SnapshotCell,
    scope: PosScope,
    last: Option<T::Key>,
    state: State<T, B>,
}

impl<T: Snapshotted, B> HotSwapIterator<T, B> {
    pub fn new(snapshot: SnapshotCell, scope: PosScope, backing: B) -> Self {
        Self { snapshot, scope, last: None, state: State::Backing(backing) }
    }

    /// If a snapshot is present and we're not already reading from it, swap
    /// over and fast-forward to just past `self.last`. Returns an error if
    /// the fast-forward search falls off the end.
    fn maybe_swap(&mut self) -> Option<DictError> {
        if matches!(self.state, State::Snapshot(_)) {
            return None;
        }
        let snapshot = self.snapshot.read().clone()?;
        let mut items = T::from_snapshot(&snapshot, self.scope).into_iter();
        if let Some(last) = &self.last {
            loop {
                match items.next() {
                    Some(item) if &item.key() == last => break,
                    Some(_) => continue,
                    None => {
                        return Some(DictError::Inconsistent(
                            "hot-swap could not relocate the last-returned element in the snapshot".into(),
                        ));
                    }
                }
            }
        }
        self.state = State::Snapshot(items);
        None
    }
}

impl<T: Snapshotted, B: Iterator<Item = Result<Arc<T>>>> Iterator for HotSwapIterator<T, B> {
    type Item = Result<Arc<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.maybe_swap() {
            return Some(Err(err));
        }
        match &mut self.state {
            State::Backing(backing) => {
                let item = backing.next()?;
                if let Ok(item) = &item {
                    self.last = Some(item.key());
                }
                Some(item)
            }
            State::Snapshot(items) => {
                let item = items.next()?;
                self.last = Some(item.key());
                Some(Ok(item))
            }
        }
    }
}
