// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caches of native resource handles with least-recently-used eviction.

use std::hash::Hash;
use std::rc::Rc;

use attributed_text::{Font, FontStyle};
use foldhash::fast::FixedState;
use hashbrown::hash_map::RawEntryMut;
use hashbrown::{Equivalent, HashMap};

use crate::Error;

/// A native handle and the serial of its last use.
struct CacheEntry<H> {
    handle: Rc<H>,
    serial: u64,
}

/// A borrowed form of a cache key, turned into an owned key only on insertion.
pub(crate) trait LookupKey<K>: Hash + Equivalent<K> {
    fn to_key(&self) -> K;
}

impl<K: Hash + Eq + Clone> LookupKey<K> for K {
    fn to_key(&self) -> K {
        self.clone()
    }
}

/// Maps keys to shared native handles, creating them on demand.
///
/// Handles are reference counted: evicting an entry only drops the cache's reference, so a
/// handle still used by a saved state stays alive until that state is popped.
pub(crate) struct ResourceCache<K, H> {
    entries: HashMap<K, CacheEntry<H>, FixedState>,
    capacity: usize,
    serial: u64,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq + Clone, H> ResourceCache<K, H> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// With a capacity of `0`, every lookup creates a fresh, uncached handle.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::default(),
            capacity,
            serial: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the handle for `key`, calling `create` on a miss.
    ///
    /// Failures are returned to the caller and not cached.
    pub(crate) fn get_or_try_insert_with(
        &mut self,
        key: &impl LookupKey<K>,
        create: impl FnOnce() -> Result<H, Error>,
    ) -> Result<Rc<H>, Error> {
        self.serial += 1;
        if let RawEntryMut::Occupied(mut occupied) = self.entries.raw_entry_mut().from_key(key) {
            let entry = occupied.get_mut();
            entry.serial = self.serial;
            self.hits += 1;
            return Ok(Rc::clone(&entry.handle));
        }
        self.misses += 1;
        let handle = Rc::new(create()?);
        if self.capacity == 0 {
            return Ok(handle);
        }
        if self.entries.len() >= self.capacity {
            self.evict_least_recently_used();
        }
        self.entries.insert(
            key.to_key(),
            CacheEntry {
                handle: Rc::clone(&handle),
                serial: self.serial,
            },
        );
        Ok(handle)
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.serial)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }
}

/// The parts of a [`Font`] that select a native font.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FontKey {
    family: Box<str>,
    size_bits: u32,
    weight_bits: u32,
    style: FontStyle,
    horizontal_scale_bits: u32,
}

/// A [`FontKey`] borrowing its family name.
///
/// Fields and their order match [`FontKey`], so both hash the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FontLookupKey<'a> {
    family: &'a str,
    size_bits: u32,
    weight_bits: u32,
    style: FontStyle,
    horizontal_scale_bits: u32,
}

impl<'a> From<&'a Font> for FontLookupKey<'a> {
    fn from(font: &'a Font) -> Self {
        Self {
            family: font.family(),
            size_bits: font.size().to_bits(),
            weight_bits: font.weight().value().to_bits(),
            style: font.style(),
            horizontal_scale_bits: font.horizontal_scale().to_bits(),
        }
    }
}

impl Equivalent<FontKey> for FontLookupKey<'_> {
    fn equivalent(&self, key: &FontKey) -> bool {
        self.family == &*key.family
            && self.size_bits == key.size_bits
            && self.weight_bits == key.weight_bits
            && self.style == key.style
            && self.horizontal_scale_bits == key.horizontal_scale_bits
    }
}

impl LookupKey<FontKey> for FontLookupKey<'_> {
    fn to_key(&self) -> FontKey {
        FontKey {
            family: self.family.into(),
            size_bits: self.size_bits,
            weight_bits: self.weight_bits,
            style: self.style,
            horizontal_scale_bits: self.horizontal_scale_bits,
        }
    }
}
