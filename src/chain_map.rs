//! ChainMap: fixed-capacity bucket table with singly linked chains.

use crate::dump::Dump;
use crate::entry::Entry;
use crate::error::MapError;
use crate::hash::Djb2State;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use slotmap::{DefaultKey, SlotMap};

/// String-to-string map with a fixed number of buckets.
///
/// Each bucket holds the head of a chain of entries whose keys reduce to
/// that bucket (`hash(key) % capacity`). New keys are appended at the
/// chain tail; lookups scan the chain linearly. The bucket count never
/// changes, so chains grow without bound as the map fills.
pub struct ChainMap<S = Djb2State> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    slots: SlotMap<DefaultKey, Entry>,
    len: usize,
}

impl ChainMap {
    /// Create a map with `capacity` buckets, hashed with djb2.
    pub fn new(capacity: usize) -> Result<Self, MapError> {
        Self::with_hasher(capacity, Djb2State)
    }
}

impl<S> ChainMap<S> {
    /// Number of buckets. Fixed for the lifetime of the map.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Entries of bucket `index` in chain order, or `None` past the end.
    pub fn bucket(&self, index: usize) -> Option<Chain<'_>> {
        self.buckets
            .get(index)
            .map(|&head| Chain::new(&self.slots, head))
    }

    /// Every bucket in index order, paired with its chain.
    pub fn buckets(&self) -> Buckets<'_> {
        Buckets {
            slots: &self.slots,
            heads: self.buckets.iter().enumerate(),
        }
    }

    /// All key/value pairs, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buckets().flat_map(|(_, chain)| chain)
    }

    /// Human-readable listing of every bucket; see [`Dump`].
    pub fn dump(&self) -> Dump<'_, S> {
        Dump::new(self)
    }

    fn links(&self, index: usize) -> Links<'_> {
        Links {
            slots: &self.slots,
            cursor: self.buckets[index],
        }
    }

    /// Unlink the first entry of bucket `index` matching `pred` and return
    /// its arena key. The entry itself is left in the arena.
    fn unlink<F>(&mut self, index: usize, mut pred: F) -> Option<DefaultKey>
    where
        F: FnMut(DefaultKey, &Entry) -> bool,
    {
        let mut previous: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let entry = self.slots.get(k)?;
            let next = entry.next;
            if pred(k, entry) {
                match previous {
                    Some(p) => self.slots[p].next = next,
                    None => self.buckets[index] = next,
                }
                self.slots[k].next = None;
                return Some(k);
            }
            previous = Some(k);
            cursor = next;
        }
        None
    }

    /// Drop an unlinked entry and its buffers.
    fn destroy_entry(&mut self, k: DefaultKey) {
        let entry = self.slots.remove(k);
        debug_assert!(
            entry.map_or(true, |e| e.next.is_none()),
            "destroying an entry that is still linked"
        );
    }

    fn clear_bucket(&mut self, index: usize) -> usize {
        let mut cursor = self.buckets[index].take();
        let mut dropped = 0;
        while let Some(entry) = cursor.and_then(|k| self.slots.remove(k)) {
            debug_assert!(entry.is_populated());
            cursor = entry.next;
            self.len -= 1;
            dropped += 1;
        }
        dropped
    }

    /// Drop every entry of bucket `index`, returning how many were dropped.
    /// Other buckets are untouched.
    pub fn clear_index(&mut self, index: usize) -> Result<usize, MapError> {
        let capacity = self.capacity();
        if index >= capacity {
            return Err(MapError::IndexOutOfBounds { index, capacity });
        }
        let dropped = self.clear_bucket(index);
        log::trace!("cleared {dropped} entries from bucket {index}");
        Ok(dropped)
    }

    /// Drop every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        let dropped: usize = (0..self.capacity()).map(|i| self.clear_bucket(i)).sum();
        debug_assert_eq!(self.len, 0);
        debug_assert!(self.slots.is_empty());
        log::debug!("cleared {dropped} entries from chain map");
    }

    /// Clear the map and release it. Dropping the map does the same.
    pub fn destroy(mut self) {
        self.clear();
        log::debug!("destroyed chain map with {} buckets", self.capacity());
    }
}

impl<S> ChainMap<S>
where
    S: BuildHasher,
{
    /// Create a map with `capacity` buckets and a custom hasher.
    ///
    /// Zero buckets is rejected. The bucket table is reserved fallibly, so
    /// an oversized capacity reports [`MapError::Alloc`] instead of aborting.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(capacity)?;
        buckets.resize(capacity, None);
        log::debug!("created chain map with {capacity} buckets");
        Ok(Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            len: 0,
        })
    }

    /// Hash of `key`'s bytes under this map's hasher.
    pub fn hash(&self, key: &str) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }

    /// Bucket that `key` belongs to. Depends only on the key and capacity.
    pub fn index(&self, key: &str) -> usize {
        (self.hash(key) % self.buckets.len() as u64) as usize
    }

    pub(crate) fn locate_entry(&self, key: &str) -> Option<&Entry> {
        self.links(self.index(key))
            .map(|(_, entry)| entry)
            .find(|entry| entry.matches(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.locate_entry(key).is_some()
    }

    /// Value stored under `key`. The borrow ends before the map can be
    /// mutated again; copy it out to keep it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.locate_entry(key).and_then(Entry::value)
    }

    /// Existing entry for `key`, or a new unpopulated entry linked at the
    /// tail of the key's chain (or as its head when the bucket is empty).
    /// Fails without linking anything if the arena cannot grow.
    pub(crate) fn entry_for_key(&mut self, key: &str) -> Result<DefaultKey, MapError> {
        let index = self.index(key);
        let mut tail = None;
        for (k, entry) in self.links(index) {
            if entry.matches(key) {
                return Ok(k);
            }
            tail = Some(k);
        }

        self.slots.try_reserve(1)?;
        let k = self.slots.insert(Entry::new());
        match tail {
            Some(t) => self.slots[t].next = Some(k),
            None => self.buckets[index] = Some(k),
        }
        Ok(k)
    }

    /// Unlink and drop the unpopulated entry `k` left by a failed insert.
    fn discard_placeholder(&mut self, key: &str, k: DefaultKey) {
        debug_assert!(self.slots.get(k).is_some_and(|e| !e.is_populated()));
        let index = self.index(key);
        if let Some(placeholder) = self.unlink(index, |kk, _| kk == k) {
            self.destroy_entry(placeholder);
        }
    }

    /// Store a copy of `value` under `key`, replacing any previous value.
    ///
    /// On allocation failure nothing observable changes: a replaced value
    /// is kept, and a new key is neither linked nor counted.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(), MapError> {
        let k = self.entry_for_key(key).map_err(|e| {
            log::warn!("allocating entry for {key:?} failed: {e}");
            e
        })?;
        let entry = &mut self.slots[k];

        if entry.is_populated() {
            return entry.replace_value(value).map_err(|e| {
                log::warn!("replacing value for {key:?} failed: {e}");
                e
            });
        }

        match entry.populate(key, value) {
            Ok(()) => {
                self.len += 1;
                log::trace!("inserted {key:?}");
                Ok(())
            }
            Err(e) => {
                log::warn!("inserting {key:?} failed: {e}");
                self.discard_placeholder(key, k);
                Err(e)
            }
        }
    }

    /// Remove `key`. Returns `false`, changing nothing, if it is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let index = self.index(key);
        let Some(k) = self.unlink(index, |_, entry| entry.matches(key)) else {
            return false;
        };
        self.destroy_entry(k);
        self.len -= 1;
        log::trace!("removed {key:?} from bucket {index}");
        true
    }
}

impl<S> fmt::Debug for ChainMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Arena walk along one chain, including unpopulated entries.
struct Links<'a> {
    slots: &'a SlotMap<DefaultKey, Entry>,
    cursor: Option<DefaultKey>,
}

impl<'a> Iterator for Links<'a> {
    type Item = (DefaultKey, &'a Entry);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let entry = self.slots.get(k)?;
        self.cursor = entry.next;
        Some((k, entry))
    }
}

/// Key/value pairs of one bucket, in chain order.
pub struct Chain<'a> {
    links: Links<'a>,
}

impl<'a> Chain<'a> {
    fn new(slots: &'a SlotMap<DefaultKey, Entry>, head: Option<DefaultKey>) -> Self {
        Chain {
            links: Links {
                slots,
                cursor: head,
            },
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.links.by_ref().find_map(|(_, entry)| entry.pair())
    }
}

/// Iterator over `(index, chain)` for every bucket.
pub struct Buckets<'a> {
    slots: &'a SlotMap<DefaultKey, Entry>,
    heads: core::iter::Enumerate<core::slice::Iter<'a, Option<DefaultKey>>>,
}

impl<'a> Iterator for Buckets<'a> {
    type Item = (usize, Chain<'a>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heads
            .next()
            .map(|(index, &head)| (index, Chain::new(self.slots, head)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heads.size_hint()
    }
}

impl ExactSizeIterator for Buckets<'_> {}

#[cfg(test)]
impl<S: BuildHasher> ChainMap<S> {
    /// Structural check used by the tests: `len` matches the reachable
    /// entries and the arena, every entry is populated and sits in the
    /// bucket its key hashes to, and no chain repeats a key.
    pub(crate) fn assert_consistent(&self) {
        let mut reachable = 0;
        for index in 0..self.capacity() {
            let mut seen = std::collections::HashSet::new();
            for (_, entry) in self.links(index).take(self.slots.len() + 1) {
                let (key, _) = entry.pair().expect("chain holds an unpopulated entry");
                assert_eq!(self.index(key), index, "{key:?} is in the wrong bucket");
                assert!(seen.insert(key.to_string()), "{key:?} repeated in chain");
                reachable += 1;
            }
        }
        assert_eq!(reachable, self.len, "len drifted from reachable entries");
        assert_eq!(self.slots.len(), self.len, "arena holds unreachable entries");
    }
}
