//! Memoization service for solved densities.
//!
//! The solvers are evaluated many times with identical inputs from an outer
//! nonlinear solve, so every solved value is stored together with its
//! derivatives and replayed on the next identical request. Keys are the exact
//! IEEE-754 bit patterns of the inputs, which makes a hit bit-identical to a
//! fresh solve.
//!
//! Tables are internally synchronized. Two threads solving the same key at the
//! same time both compute and both store the same deterministic value; there
//! is no in-flight deduplication.

use crate::config::MemoConfig;
use hz_core::{Derivs1, Derivs2, Real};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Stores keyed on `(p, τ)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinStore {
    DeltaLiq,
    DeltaVap,
}

/// Stores keyed on `τ` alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnStore {
    SatDeltaLiq,
    SatDeltaVap,
    SatP,
}

/// Key→value memo consumed by the solvers.
///
/// A miss is `None`; a stored not-a-number is a hit like any other value.
pub trait MemoStore: Send + Sync {
    fn get_bin(&self, store: BinStore, x: Real, y: Real) -> Option<Derivs2>;

    fn add_bin(&self, store: BinStore, x: Real, y: Real, entry: Derivs2);

    fn get_un(&self, store: UnStore, x: Real) -> Option<Derivs1>;

    fn add_un(&self, store: UnStore, x: Real, entry: Derivs1);
}

/// Counters for memo traffic.
#[derive(Debug, Default)]
pub struct MemoStats {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    clears: AtomicU64,
}

/// Point-in-time copy of [`MemoStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoCounts {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub clears: u64,
}

impl MemoStats {
    fn record_lookup(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MemoCounts {
        MemoCounts {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
        self.clears.store(0, Ordering::Relaxed);
    }
}

type BinKey = (BinStore, u64, u64);
type UnKey = (UnStore, u64);

/// In-memory memo tables, cleared wholesale once they reach capacity.
#[derive(Debug)]
pub struct MemoTable {
    bin: Mutex<HashMap<BinKey, Derivs2>>,
    un: Mutex<HashMap<UnKey, Derivs1>>,
    capacity: usize,
    stats: MemoStats,
}

impl Default for MemoTable {
    fn default() -> Self {
        Self::new(MemoConfig::default())
    }
}

// Entries are inserted whole, so a poisoned table is still consistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoTable {
    pub fn new(config: MemoConfig) -> Self {
        Self {
            bin: Mutex::new(HashMap::new()),
            un: Mutex::new(HashMap::new()),
            capacity: config.capacity.max(1),
            stats: MemoStats::default(),
        }
    }

    pub fn stats(&self) -> &MemoStats {
        &self.stats
    }

    /// Number of stored entries across both tables.
    pub fn len(&self) -> usize {
        lock(&self.bin).len() + lock(&self.un).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.bin).clear();
        lock(&self.un).clear();
    }

    fn make_room<K, V>(&self, table: &mut HashMap<K, V>) {
        if table.len() >= self.capacity {
            tracing::debug!(entries = table.len(), "memo table full, clearing");
            table.clear();
            self.stats.clears.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl MemoStore for MemoTable {
    fn get_bin(&self, store: BinStore, x: Real, y: Real) -> Option<Derivs2> {
        let found = lock(&self.bin)
            .get(&(store, x.to_bits(), y.to_bits()))
            .copied();
        self.stats.record_lookup(found.is_some());
        found
    }

    fn add_bin(&self, store: BinStore, x: Real, y: Real, entry: Derivs2) {
        let mut table = lock(&self.bin);
        let key = (store, x.to_bits(), y.to_bits());
        if !table.contains_key(&key) {
            self.make_room(&mut *table);
        }
        table.insert(key, entry);
        self.stats.stores.fetch_add(1, Ordering::Relaxed);
    }

    fn get_un(&self, store: UnStore, x: Real) -> Option<Derivs1> {
        let found = lock(&self.un).get(&(store, x.to_bits())).copied();
        self.stats.record_lookup(found.is_some());
        found
    }

    fn add_un(&self, store: UnStore, x: Real, entry: Derivs1) {
        let mut table = lock(&self.un);
        let key = (store, x.to_bits());
        if !table.contains_key(&key) {
            self.make_room(&mut *table);
        }
        table.insert(key, entry);
        self.stats.stores.fetch_add(1, Ordering::Relaxed);
    }
}

/// A memo that never remembers anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMemo;

impl MemoStore for NoMemo {
    fn get_bin(&self, _store: BinStore, _x: Real, _y: Real) -> Option<Derivs2> {
        None
    }

    fn add_bin(&self, _store: BinStore, _x: Real, _y: Real, _entry: Derivs2) {}

    fn get_un(&self, _store: UnStore, _x: Real) -> Option<Derivs1> {
        None
    }

    fn add_un(&self, _store: UnStore, _x: Real, _entry: Derivs1) {}
}

impl<S: MemoStore + ?Sized> MemoStore for std::sync::Arc<S> {
    fn get_bin(&self, store: BinStore, x: Real, y: Real) -> Option<Derivs2> {
        (**self).get_bin(store, x, y)
    }

    fn add_bin(&self, store: BinStore, x: Real, y: Real, entry: Derivs2) {
        (**self).add_bin(store, x, y, entry)
    }

    fn get_un(&self, store: UnStore, x: Real) -> Option<Derivs1> {
        (**self).get_un(store, x)
    }

    fn add_un(&self, store: UnStore, x: Real, entry: Derivs1) {
        (**self).add_un(store, x, entry)
    }
}
