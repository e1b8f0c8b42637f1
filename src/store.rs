use bytes::{Bytes, BytesMut};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error as ThisError;

use crate::frame::Status;

pub const DEFAULT_CAPACITY: usize = 1024;

/// Memcached's default maximum item size.
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Expirations up to 30 days are relative to now; larger values are
/// absolute unix timestamps (memcached convention).
const EXPIRATION_CUTOFF: u32 = 60 * 60 * 24 * 30;

/// Sentinel expiration on increment/decrement meaning "fail instead of
/// creating the key".
pub const EXPIRATION_NO_CREATE: u32 = 0xffff_ffff;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found")]
    KeyNotFound,
    #[error("key exists")]
    KeyExists,
    #[error("item not stored")]
    NotStored,
    #[error("non-numeric value")]
    NonNumericValue,
    #[error("value too large")]
    ValueTooLarge,
}

impl From<StoreError> for Status {
    fn from(err: StoreError) -> Status {
        match err {
            StoreError::KeyNotFound => Status::KeyNotFound,
            StoreError::KeyExists => Status::KeyExists,
            StoreError::NotStored => Status::ItemNotStored,
            StoreError::NonNumericValue => Status::NonNumericValue,
            StoreError::ValueTooLarge => Status::ValueTooLarge,
        }
    }
}

/// A live item as returned by `get`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub value: Bytes,
    pub flags: u32,
    pub cas: u64,
}

#[derive(Debug)]
struct Entry {
    value: Bytes,
    flags: u32,
    cas: u64,
    /// Absolute unix deadline in seconds; 0 means the item never expires.
    expires_at: u64,
    prev: Option<Vec<u8>>,
    next: Option<Vec<u8>>,
}

impl Entry {
    fn new(value: Bytes, flags: u32, cas: u64, expires_at: u64) -> Entry {
        Entry {
            value,
            flags,
            cas,
            expires_at,
            prev: None,
            next: None,
        }
    }

    fn is_expired(&self, now: u64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

#[derive(Debug, Default)]
struct Counters {
    cmd_get: u64,
    cmd_set: u64,
    get_hits: u64,
    get_misses: u64,
    total_items: u64,
    evictions: u64,
}

/// An LRU-bounded key/value store.
///
/// Recency order is a doubly-linked list threaded through the entry map
/// (`prev`/`next` keys plus `head`/`tail`), so touching and evicting are
/// O(1). Every successful operation on a key moves it to the head; when an
/// insert exceeds the capacity the tail is evicted. Expired entries are
/// purged lazily by whichever operation observes them.
pub struct LruStore {
    entries: HashMap<Vec<u8>, Entry>,
    /// Most recently used key.
    head: Option<Vec<u8>>,
    /// Least recently used key, first in line for eviction.
    tail: Option<Vec<u8>>,
    capacity: usize,
    cas_counter: u64,
    counters: Counters,
}

impl LruStore {
    pub fn new(capacity: usize) -> LruStore {
        LruStore {
            entries: HashMap::new(),
            head: None,
            tail: None,
            capacity: capacity.max(1),
            cas_counter: 0,
            counters: Counters::default(),
        }
    }

    pub fn get(&mut self, key: &[u8]) -> Result<Item, StoreError> {
        self.counters.cmd_get += 1;
        self.purge_expired(key, now_secs());

        match self.entries.get(key) {
            Some(entry) => {
                let item = Item {
                    value: entry.value.clone(),
                    flags: entry.flags,
                    cas: entry.cas,
                };
                self.touch(key);
                self.counters.get_hits += 1;
                Ok(item)
            }
            None => {
                self.counters.get_misses += 1;
                Err(StoreError::KeyNotFound)
            }
        }
    }

    /// Unconditional write when `cas` is 0; compare-and-swap otherwise.
    /// The CAS path reports `KeyExists` both on a version mismatch and when
    /// the key is gone, matching memcached's historical behavior.
    pub fn set(
        &mut self,
        key: &[u8],
        value: Bytes,
        flags: u32,
        expiration: u32,
        cas: u64,
    ) -> Result<u64, StoreError> {
        self.counters.cmd_set += 1;
        check_value_size(value.len())?;
        let now = now_secs();
        self.purge_expired(key, now);

        if cas != 0 {
            match self.entries.get(key) {
                Some(entry) if entry.cas == cas => {}
                _ => return Err(StoreError::KeyExists),
            }
        }

        Ok(self.store(key, value, flags, deadline(expiration, now)))
    }

    /// Store only if the key is absent.
    pub fn add(
        &mut self,
        key: &[u8],
        value: Bytes,
        flags: u32,
        expiration: u32,
    ) -> Result<u64, StoreError> {
        self.counters.cmd_set += 1;
        check_value_size(value.len())?;
        let now = now_secs();
        self.purge_expired(key, now);

        if self.entries.contains_key(key) {
            return Err(StoreError::KeyExists);
        }

        Ok(self.store(key, value, flags, deadline(expiration, now)))
    }

    /// Store only if the key is present.
    pub fn replace(
        &mut self,
        key: &[u8],
        value: Bytes,
        flags: u32,
        expiration: u32,
    ) -> Result<u64, StoreError> {
        self.counters.cmd_set += 1;
        check_value_size(value.len())?;
        let now = now_secs();
        self.purge_expired(key, now);

        if !self.entries.contains_key(key) {
            return Err(StoreError::KeyNotFound);
        }

        Ok(self.store(key, value, flags, deadline(expiration, now)))
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.purge_expired(key, now_secs());

        if !self.entries.contains_key(key) {
            return Err(StoreError::KeyNotFound);
        }

        self.remove(key);
        Ok(())
    }

    /// Add `delta` to the decimal-ASCII value stored at `key`, saturating
    /// at 2^64-1. An absent key is created holding `initial`, unless
    /// `expiration` is the no-create sentinel. Returns the resulting count
    /// and the new version.
    pub fn increment(
        &mut self,
        key: &[u8],
        delta: u64,
        initial: u64,
        expiration: u32,
    ) -> Result<(u64, u64), StoreError> {
        self.apply_delta(key, delta, initial, expiration, true)
    }

    /// As `increment`, but subtracting; the count never goes below zero.
    pub fn decrement(
        &mut self,
        key: &[u8],
        delta: u64,
        initial: u64,
        expiration: u32,
    ) -> Result<(u64, u64), StoreError> {
        self.apply_delta(key, delta, initial, expiration, false)
    }

    pub fn append(&mut self, key: &[u8], suffix: &[u8]) -> Result<u64, StoreError> {
        self.concat(key, suffix, true)
    }

    pub fn prepend(&mut self, key: &[u8], prefix: &[u8]) -> Result<u64, StoreError> {
        self.concat(key, prefix, false)
    }

    /// Expire every current item `delay` seconds from now. Items already
    /// expiring sooner keep their earlier deadline.
    pub fn flush(&mut self, delay: u32) {
        let watermark = now_secs() + delay as u64;
        for entry in self.entries.values_mut() {
            if entry.expires_at == 0 || entry.expires_at > watermark {
                entry.expires_at = watermark;
            }
        }
    }

    pub fn stats(&self) -> Vec<(String, String)> {
        vec![
            ("version".to_string(), self.version().to_string()),
            ("curr_items".to_string(), self.entries.len().to_string()),
            ("limit_items".to_string(), self.capacity.to_string()),
            (
                "total_items".to_string(),
                self.counters.total_items.to_string(),
            ),
            ("cmd_get".to_string(), self.counters.cmd_get.to_string()),
            ("cmd_set".to_string(), self.counters.cmd_set.to_string()),
            ("get_hits".to_string(), self.counters.get_hits.to_string()),
            (
                "get_misses".to_string(),
                self.counters.get_misses.to_string(),
            ),
            ("evictions".to_string(), self.counters.evictions.to_string()),
        ]
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Number of entries currently held, including expired ones that have
    /// not been swept yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply_delta(
        &mut self,
        key: &[u8],
        delta: u64,
        initial: u64,
        expiration: u32,
        incr: bool,
    ) -> Result<(u64, u64), StoreError> {
        let now = now_secs();
        self.purge_expired(key, now);

        let current = match self.entries.get(key) {
            Some(entry) => Some(parse_decimal(&entry.value).ok_or(StoreError::NonNumericValue)?),
            None => None,
        };

        match current {
            Some(current) => {
                let count = if incr {
                    current.saturating_add(delta)
                } else {
                    current.saturating_sub(delta)
                };
                let cas = self.next_cas();
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.value = Bytes::from(count.to_string());
                    entry.cas = cas;
                }
                self.touch(key);
                self.counters.total_items += 1;
                Ok((count, cas))
            }
            None => {
                if expiration == EXPIRATION_NO_CREATE {
                    return Err(StoreError::KeyNotFound);
                }
                let cas = self.next_cas();
                let value = Bytes::from(initial.to_string());
                self.insert(
                    key.to_vec(),
                    Entry::new(value, 0, cas, deadline(expiration, now)),
                );
                self.counters.total_items += 1;
                Ok((initial, cas))
            }
        }
    }

    fn concat(&mut self, key: &[u8], bytes: &[u8], append: bool) -> Result<u64, StoreError> {
        self.purge_expired(key, now_secs());

        let new_value = match self.entries.get(key) {
            Some(entry) => {
                check_value_size(entry.value.len() + bytes.len())?;
                let mut buf = BytesMut::with_capacity(entry.value.len() + bytes.len());
                if append {
                    buf.extend_from_slice(&entry.value);
                    buf.extend_from_slice(bytes);
                } else {
                    buf.extend_from_slice(bytes);
                    buf.extend_from_slice(&entry.value);
                }
                buf.freeze()
            }
            None => return Err(StoreError::NotStored),
        };

        let cas = self.next_cas();
        if let Some(entry) = self.entries.get_mut(key) {
            entry.value = new_value;
            entry.cas = cas;
        }
        self.touch(key);
        self.counters.total_items += 1;
        Ok(cas)
    }

    /// Write-through for set/add/replace after their preconditions held.
    fn store(&mut self, key: &[u8], value: Bytes, flags: u32, expires_at: u64) -> u64 {
        let cas = self.next_cas();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.value = value;
                entry.flags = flags;
                entry.cas = cas;
                entry.expires_at = expires_at;
                self.touch(key);
            }
            None => {
                self.insert(key.to_vec(), Entry::new(value, flags, cas, expires_at));
            }
        }
        self.counters.total_items += 1;
        cas
    }

    fn purge_expired(&mut self, key: &[u8], now: u64) {
        let expired = self
            .entries
            .get(key)
            .map_or(false, |entry| entry.is_expired(now));
        if expired {
            self.remove(key);
        }
    }

    fn next_cas(&mut self) -> u64 {
        // Skip 0 on wraparound; 0 means "no version" on the wire.
        self.cas_counter = self.cas_counter.wrapping_add(1).max(1);
        self.cas_counter
    }

    fn insert(&mut self, key: Vec<u8>, entry: Entry) {
        self.entries.insert(key.clone(), entry);
        self.push_front(key);

        while self.entries.len() > self.capacity {
            match self.tail.clone() {
                Some(tail_key) => {
                    self.remove(&tail_key);
                    self.counters.evictions += 1;
                }
                None => break,
            }
        }
    }

    fn remove(&mut self, key: &[u8]) {
        self.unlink(key);
        self.entries.remove(key);
    }

    fn touch(&mut self, key: &[u8]) {
        if self.head.as_deref() == Some(key) {
            return;
        }
        self.unlink(key);
        self.push_front(key.to_vec());
    }

    fn unlink(&mut self, key: &[u8]) {
        let (prev, next) = match self.entries.get_mut(key) {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match &prev {
            Some(prev_key) => {
                if let Some(entry) = self.entries.get_mut(prev_key) {
                    entry.next = next.clone();
                }
            }
            None => self.head = next.clone(),
        }

        match &next {
            Some(next_key) => {
                if let Some(entry) = self.entries.get_mut(next_key) {
                    entry.prev = prev.clone();
                }
            }
            None => self.tail = prev.clone(),
        }
    }

    /// The entry for `key` must already be in the map with cleared links.
    fn push_front(&mut self, key: Vec<u8>) {
        let old_head = self.head.replace(key.clone());

        match &old_head {
            Some(head_key) => {
                if let Some(entry) = self.entries.get_mut(head_key) {
                    entry.prev = Some(key.clone());
                }
            }
            None => self.tail = Some(key.clone()),
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.prev = None;
            entry.next = old_head;
        }
    }
}

impl Default for LruStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Resolve a request expiration to an absolute unix deadline.
fn deadline(expiration: u32, now: u64) -> u64 {
    match expiration {
        0 => 0,
        exp if exp <= EXPIRATION_CUTOFF => now + exp as u64,
        exp => exp as u64,
    }
}

fn parse_decimal(value: &[u8]) -> Option<u64> {
    std::str::from_utf8(value).ok()?.parse().ok()
}

fn check_value_size(len: usize) -> Result<(), StoreError> {
    if len > MAX_VALUE_SIZE {
        return Err(StoreError::ValueTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Above the relative cutoff, so it is read as an absolute timestamp in
    // early 1970 and the item is expired immediately.
    const PAST: u32 = EXPIRATION_CUTOFF + 1;

    fn set(store: &mut LruStore, key: &[u8], value: &'static [u8]) -> u64 {
        store.set(key, Bytes::from_static(value), 0, 0, 0).unwrap()
    }

    #[test]
    fn set_then_get_round_trip() {
        let mut store = LruStore::default();

        let cas = store
            .set(b"get_ok", Bytes::from_static(b"atpons"), 3, 0, 0)
            .unwrap();
        assert_ne!(cas, 0);

        let item = store.get(b"get_ok").unwrap();
        assert_eq!(&item.value[..], b"atpons");
        assert_eq!(item.flags, 3);
        assert_eq!(item.cas, cas);
    }

    #[test]
    fn get_missing_key() {
        let mut store = LruStore::default();

        assert_eq!(store.get(b"nope"), Err(StoreError::KeyNotFound));
    }

    #[test]
    fn set_overwrites_and_changes_cas() {
        let mut store = LruStore::default();

        let first = set(&mut store, b"k", b"before");
        let second = set(&mut store, b"k", b"after");

        assert_ne!(first, second);
        assert_eq!(&store.get(b"k").unwrap().value[..], b"after");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cas_set_succeeds_with_current_version() {
        let mut store = LruStore::default();

        set(&mut store, b"cas_ok", b"before");
        let cas = store.get(b"cas_ok").unwrap().cas;

        store
            .set(b"cas_ok", Bytes::from_static(b"after"), 0, 0, cas)
            .unwrap();
        assert_eq!(&store.get(b"cas_ok").unwrap().value[..], b"after");
    }

    #[test]
    fn cas_set_fails_on_version_mismatch() {
        let mut store = LruStore::default();

        set(&mut store, b"cas_ok", b"before");
        let cas = store.get(b"cas_ok").unwrap().cas;

        let err = store
            .set(b"cas_ok", Bytes::from_static(b"after"), 0, 0, cas + 1)
            .unwrap_err();
        assert_eq!(err, StoreError::KeyExists);
        assert_eq!(&store.get(b"cas_ok").unwrap().value[..], b"before");
    }

    #[test]
    fn cas_set_fails_when_key_is_gone() {
        let mut store = LruStore::default();

        let err = store
            .set(b"vanished", Bytes::from_static(b"v"), 0, 0, 99)
            .unwrap_err();
        assert_eq!(err, StoreError::KeyExists);
    }

    #[test]
    fn add_only_stores_absent_keys() {
        let mut store = LruStore::default();

        store
            .add(b"add_normal", Bytes::from_static(b"before"), 0, 0)
            .unwrap();
        let err = store
            .add(b"add_normal", Bytes::from_static(b"failure"), 0, 0)
            .unwrap_err();

        assert_eq!(err, StoreError::KeyExists);
        assert_eq!(&store.get(b"add_normal").unwrap().value[..], b"before");
    }

    #[test]
    fn add_succeeds_over_an_expired_entry() {
        let mut store = LruStore::default();

        store
            .set(b"k", Bytes::from_static(b"old"), 0, PAST, 0)
            .unwrap();
        store.add(b"k", Bytes::from_static(b"new"), 0, 0).unwrap();

        assert_eq!(&store.get(b"k").unwrap().value[..], b"new");
    }

    #[test]
    fn replace_requires_an_existing_key() {
        let mut store = LruStore::default();

        assert_eq!(
            store.replace(b"replace_not", Bytes::from_static(b"foobar"), 0, 0),
            Err(StoreError::KeyNotFound)
        );

        set(&mut store, b"replace_normal", b"foobar");
        store
            .replace(b"replace_normal", Bytes::from_static(b"ok"), 0, 0)
            .unwrap();
        assert_eq!(&store.get(b"replace_normal").unwrap().value[..], b"ok");
    }

    #[test]
    fn delete_removes_the_key() {
        let mut store = LruStore::default();

        set(&mut store, b"del_ok", b"ok");
        store.delete(b"del_ok").unwrap();

        assert_eq!(store.get(b"del_ok"), Err(StoreError::KeyNotFound));
        assert_eq!(store.delete(b"del_ok"), Err(StoreError::KeyNotFound));
    }

    #[test]
    fn expired_entry_is_absent() {
        let mut store = LruStore::default();

        store
            .set(b"gone", Bytes::from_static(b"v"), 0, PAST, 0)
            .unwrap();

        assert_eq!(store.get(b"gone"), Err(StoreError::KeyNotFound));
        assert!(store.is_empty());
    }

    #[test]
    fn future_expiration_keeps_the_entry_live() {
        let mut store = LruStore::default();

        store
            .set(b"alive", Bytes::from_static(b"v"), 0, 60, 0)
            .unwrap();

        assert!(store.get(b"alive").is_ok());
    }

    #[test]
    fn increment_creates_with_initial_value() {
        let mut store = LruStore::default();

        let (count, cas) = store.increment(b"incr_normal", 1, 1, 60).unwrap();
        assert_eq!(count, 1);
        assert_ne!(cas, 0);

        let (count, _) = store.increment(b"incr_normal", 1, 1, 60).unwrap();
        assert_eq!(count, 2);
        assert_eq!(&store.get(b"incr_normal").unwrap().value[..], b"2");
    }

    #[test]
    fn decrement_creates_with_initial_value() {
        let mut store = LruStore::default();

        let (count, _) = store.decrement(b"decr_normal", 1, 10, 60).unwrap();
        assert_eq!(count, 10);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut store = LruStore::default();

        set(&mut store, b"n", b"3");
        let (count, _) = store.decrement(b"n", 10, 0, 0).unwrap();

        assert_eq!(count, 0);
        assert_eq!(&store.get(b"n").unwrap().value[..], b"0");
    }

    #[test]
    fn increment_saturates() {
        let mut store = LruStore::default();

        store
            .set(b"n", Bytes::from(u64::MAX.to_string()), 0, 0, 0)
            .unwrap();
        let (count, _) = store.increment(b"n", 1, 0, 0).unwrap();

        assert_eq!(count, u64::MAX);
    }

    #[test]
    fn increment_rejects_non_numeric_values() {
        let mut store = LruStore::default();

        set(&mut store, b"k", b"abc");

        assert_eq!(
            store.increment(b"k", 1, 0, 0),
            Err(StoreError::NonNumericValue)
        );
    }

    #[test]
    fn increment_no_create_sentinel() {
        let mut store = LruStore::default();

        assert_eq!(
            store.increment(b"absent", 1, 1, EXPIRATION_NO_CREATE),
            Err(StoreError::KeyNotFound)
        );
    }

    #[test]
    fn increment_preserves_flags() {
        let mut store = LruStore::default();

        store.set(b"n", Bytes::from_static(b"1"), 9, 0, 0).unwrap();
        store.increment(b"n", 1, 0, 0).unwrap();

        assert_eq!(store.get(b"n").unwrap().flags, 9);
    }

    #[test]
    fn append_and_prepend() {
        let mut store = LruStore::default();

        set(&mut store, b"append_normal", b"at");
        store.append(b"append_normal", b"pons").unwrap();
        assert_eq!(&store.get(b"append_normal").unwrap().value[..], b"atpons");

        set(&mut store, b"prepend_normal", b"pons");
        store.prepend(b"prepend_normal", b"at").unwrap();
        assert_eq!(&store.get(b"prepend_normal").unwrap().value[..], b"atpons");
    }

    #[test]
    fn append_requires_an_existing_key() {
        let mut store = LruStore::default();

        assert_eq!(store.append(b"nope", b"x"), Err(StoreError::NotStored));
        assert_eq!(store.prepend(b"nope", b"x"), Err(StoreError::NotStored));
    }

    #[test]
    fn append_preserves_flags_and_changes_cas() {
        let mut store = LruStore::default();

        let first = store
            .set(b"k", Bytes::from_static(b"at"), 5, 0, 0)
            .unwrap();
        let second = store.append(b"k", b"pons").unwrap();

        assert_ne!(first, second);
        let item = store.get(b"k").unwrap();
        assert_eq!(item.flags, 5);
        assert_eq!(item.cas, second);
    }

    #[test]
    fn oversized_values_are_rejected() {
        let mut store = LruStore::default();
        let huge = Bytes::from(vec![0u8; MAX_VALUE_SIZE + 1]);

        assert_eq!(
            store.set(b"big", huge, 0, 0, 0),
            Err(StoreError::ValueTooLarge)
        );

        store
            .set(b"k", Bytes::from(vec![0u8; MAX_VALUE_SIZE]), 0, 0, 0)
            .unwrap();
        assert_eq!(store.append(b"k", b"x"), Err(StoreError::ValueTooLarge));
    }

    #[test]
    fn flush_expires_all_current_items() {
        let mut store = LruStore::default();

        set(&mut store, b"a", b"1");
        set(&mut store, b"b", b"2");
        store.flush(0);

        assert_eq!(store.get(b"a"), Err(StoreError::KeyNotFound));
        assert_eq!(store.get(b"b"), Err(StoreError::KeyNotFound));
    }

    #[test]
    fn flush_with_delay_keeps_items_for_now() {
        let mut store = LruStore::default();

        set(&mut store, b"a", b"1");
        store.flush(1000);

        assert!(store.get(b"a").is_ok());
    }

    #[test]
    fn lru_evicts_the_least_recently_used_key() {
        let mut store = LruStore::new(3);

        set(&mut store, b"a", b"1");
        set(&mut store, b"b", b"2");
        set(&mut store, b"c", b"3");
        set(&mut store, b"d", b"4");

        assert_eq!(store.get(b"a"), Err(StoreError::KeyNotFound));
        assert!(store.get(b"b").is_ok());
        assert!(store.get(b"c").is_ok());
        assert!(store.get(b"d").is_ok());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn lru_get_touches_the_entry() {
        let mut store = LruStore::new(3);

        set(&mut store, b"a", b"1");
        set(&mut store, b"b", b"2");
        set(&mut store, b"c", b"3");
        store.get(b"a").unwrap();
        set(&mut store, b"d", b"4");

        // "b" became the oldest once "a" was read.
        assert_eq!(store.get(b"b"), Err(StoreError::KeyNotFound));
        assert!(store.get(b"a").is_ok());
        assert!(store.get(b"c").is_ok());
        assert!(store.get(b"d").is_ok());
    }

    #[test]
    fn lru_update_touches_the_entry() {
        let mut store = LruStore::new(3);

        set(&mut store, b"a", b"1");
        set(&mut store, b"b", b"2");
        set(&mut store, b"c", b"3");
        set(&mut store, b"a", b"1'");
        set(&mut store, b"d", b"4");

        assert_eq!(store.get(b"b"), Err(StoreError::KeyNotFound));
        assert!(store.get(b"a").is_ok());
    }

    #[test]
    fn delete_unlinks_from_the_recency_order() {
        let mut store = LruStore::new(2);

        set(&mut store, b"a", b"1");
        set(&mut store, b"b", b"2");
        store.delete(b"a").unwrap();
        set(&mut store, b"c", b"3");
        set(&mut store, b"d", b"4");

        assert_eq!(store.get(b"b"), Err(StoreError::KeyNotFound));
        assert!(store.get(b"c").is_ok());
        assert!(store.get(b"d").is_ok());
    }

    #[test]
    fn every_successful_mutation_produces_a_distinct_cas() {
        let mut store = LruStore::default();

        let mut versions = vec![
            set(&mut store, b"k", b"1"),
            set(&mut store, b"k", b"2"),
            store.append(b"k", b"0").unwrap(),
            store.increment(b"k", 1, 0, 0).unwrap().1,
            store.decrement(b"k", 1, 0, 0).unwrap().1,
        ];

        versions.sort_unstable();
        versions.dedup();
        assert_eq!(versions.len(), 5);
        assert!(versions.iter().all(|&cas| cas != 0));
    }

    #[test]
    fn stats_reports_engine_counters() {
        let mut store = LruStore::new(10);

        set(&mut store, b"k", b"v");
        store.get(b"k").unwrap();
        let _ = store.get(b"missing");

        let stats: HashMap<_, _> = store.stats().into_iter().collect();
        assert_eq!(stats["curr_items"], "1");
        assert_eq!(stats["limit_items"], "10");
        assert_eq!(stats["cmd_get"], "2");
        assert_eq!(stats["cmd_set"], "1");
        assert_eq!(stats["get_hits"], "1");
        assert_eq!(stats["get_misses"], "1");
    }

    #[test]
    fn version_is_not_empty() {
        let store = LruStore::default();

        assert!(!store.version().is_empty());
    }
}
