//! Open-addressing hash table with quadratic probing.
//!
//! For a key hashing to `h`, probe `i` lands on slot `(h + i*i) mod capacity`
//! and at most `capacity` probes are tried. Removing an entry leaves a
//! tombstone behind so later probe chains that pass through the slot still
//! reach their keys. Tombstones are reusable by fresh inserts and are dropped
//! whenever the table is rehashed.
//!
//! The table grows (never shrinks) once `len / capacity` exceeds 0.75 before
//! a fresh insert.

use super::errors::ContainerError;
use log::{trace, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;

/// Slot count used by [`HashTable::new`]
pub const DEFAULT_CAPACITY: usize = 29;

const LOAD_FACTOR: f64 = 0.75;
const GROWTH_FACTOR: usize = 2;
/// Fallback growth when doubling is not representable
const CAPACITY_INCREMENT: usize = 32;

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    Occupied { key: K, value: V },
    Tombstone,
}

impl<K, V> Slot<K, V> {
    fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

fn hash_of<K: Hash>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn probe_index(hash: u64, probe: usize, capacity: usize) -> usize {
    let offset = (probe as u128) * (probe as u128);
    ((hash as u128 + offset) % capacity as u128) as usize
}

fn next_capacity(capacity: usize) -> usize {
    capacity
        .checked_mul(GROWTH_FACTOR)
        .unwrap_or_else(|| capacity.saturating_add(CAPACITY_INCREMENT))
}

/// Writes the entry into the first empty or tombstoned slot of its probe
/// sequence, handing it back if the sequence is exhausted.
fn place<K, V>(slots: &mut [Slot<K, V>], hash: u64, key: K, value: V) -> Result<usize, (K, V)> {
    let capacity = slots.len();
    for probe in 0..capacity {
        let index = probe_index(hash, probe, capacity);
        if matches!(slots[index], Slot::Empty | Slot::Tombstone) {
            slots[index] = Slot::Occupied { key, value };
            return Ok(index);
        }
    }
    Err((key, value))
}

/// Key/value store backed by a single slot array.
#[derive(Debug, Clone)]
pub struct HashTable<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
}

impl<K: Hash + Eq, V> HashTable<K, V> {
    /// Create an empty table with [`DEFAULT_CAPACITY`] slots
    pub fn new() -> Self {
        Self {
            slots: empty_slots(DEFAULT_CAPACITY),
            len: 0,
        }
    }

    /// Create an empty table with `capacity` slots
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        if capacity == 0 {
            return Err(ContainerError::InvalidArgument(
                "hash table capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            slots: empty_slots(capacity),
            len: 0,
        })
    }

    /// Insert `value` under `key`.
    ///
    /// An existing entry for `key` is overwritten in its current slot and the
    /// previous value is returned; nothing moves and `len` is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.find(&key) {
            if let Slot::Occupied { value: stored, .. } = &mut self.slots[index] {
                return Some(mem::replace(stored, value));
            }
        }

        if self.load() > LOAD_FACTOR {
            self.resize(next_capacity(self.capacity()));
        }

        let hash = hash_of(&key);
        let (mut key, mut value) = (key, value);
        loop {
            match place(&mut self.slots, hash, key, value) {
                Ok(_) => {
                    self.len += 1;
                    return None;
                }
                Err(rejected) => {
                    warn!(
                        "Probe sequence exhausted at {} slots ({} entries); growing",
                        self.capacity(),
                        self.len
                    );
                    self.resize(next_capacity(self.capacity()));
                    (key, value) = rejected;
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.find(key)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove the entry for `key`, leaving a tombstone in its slot.
    /// Absent keys leave the table untouched.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.find(key)?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.len -= 1;
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Drop every entry. The slot array keeps its current capacity.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        })
    }

    fn load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    fn find(&self, key: &K) -> Option<usize> {
        let capacity = self.capacity();
        let hash = hash_of(key);
        for probe in 0..capacity {
            let index = probe_index(hash, probe, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { key: stored, .. } if stored == key => return Some(index),
                _ => {}
            }
        }
        None
    }

    fn resize(&mut self, capacity: usize) {
        let mut pending: Vec<(K, V)> = mem::take(&mut self.slots)
            .into_iter()
            .filter_map(Slot::into_entry)
            .collect();
        let mut capacity = capacity;

        loop {
            let mut slots = empty_slots(capacity);
            let mut rejected = Vec::new();
            for (key, value) in pending.drain(..) {
                let hash = hash_of(&key);
                if let Err(entry) = place(&mut slots, hash, key, value) {
                    rejected.push(entry);
                }
            }

            if rejected.is_empty() {
                trace!("Hash table rehashed into {} slots ({} entries)", capacity, self.len);
                self.slots = slots;
                return;
            }

            warn!(
                "{} entries did not fit while rehashing into {} slots; growing again",
                rejected.len(),
                capacity
            );
            pending = slots
                .into_iter()
                .filter_map(Slot::into_entry)
                .chain(rejected)
                .collect();
            capacity = next_capacity(capacity);
        }
    }
}

impl<K: Hash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
