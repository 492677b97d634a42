//! Bounded resource pools (component C2).
//!
//! The original Go pulled `Buffer`, `Hash`, and `MaxGo` slots out of three
//! process-wide globals guarded by an index free-list
//! (`util/tannhauser/pool.IndexPool`). Per spec.md §9 ("Global pools as
//! singletons"), this is re-architected as an explicit, owned `PoolSet`
//! value threaded through the pipeline instead of statics, which keeps the
//! stages parallel-safe and testable in isolation.
//!
//! `MaxGo` itself is realized as a `rayon::ThreadPool` sized to the
//! configured capacity rather than a literal per-item acquire/release
//! semaphore, per spec.md §9's redesign note: a systems rewrite should
//! statically partition work across a worker pool and join, which is
//! simpler and just as effective as spawning one lightweight task per item.

use std::sync::{Condvar, Mutex};

use rayon::{ThreadPool, ThreadPoolBuilder};

pub const DEFAULT_BUFFER_POOL: usize = 10;
pub const DEFAULT_HASH_POOL: usize = 128;
pub const DEFAULT_MAX_ROUTINE: usize = 4096;

/// A fixed-capacity free-list of reusable `T` slots, borrowed by index.
///
/// `acquire` blocks until a slot is free; `release` returns it. Acquisitions
/// are unordered, and the pool guarantees at most one concurrent holder per
/// slot.
pub struct Pool<T> {
    slots: Vec<Mutex<T>>,
    free: Mutex<Vec<usize>>,
    available: Condvar,
}

/// A borrowed slot. Carries its own index so release is O(1).
pub struct Handle<'a, T> {
    pool: &'a Pool<T>,
    index: usize,
}

impl<T> Pool<T> {
    pub fn new<F: FnMut(usize) -> T>(capacity: usize, mut make: F) -> Self {
        let slots = (0..capacity).map(|i| Mutex::new(make(i))).collect();
        Self {
            slots,
            free: Mutex::new((0..capacity).rev().collect()),
            available: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn acquire(&self) -> Handle<'_, T> {
        let mut free = self.free.lock().unwrap();
        loop {
            if let Some(index) = free.pop() {
                return Handle { pool: self, index };
            }
            free = self.available.wait(free).unwrap();
        }
    }

    fn release(&self, index: usize) {
        self.free.lock().unwrap().push(index);
        self.available.notify_one();
    }
}

impl<'a, T> Handle<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.pool.slots[self.index].lock().unwrap();
        f(&mut guard)
    }
}

impl<'a, T> Drop for Handle<'a, T> {
    fn drop(&mut self) {
        self.pool.release(self.index);
    }
}

/// Reusable scratch buffers for CSV row splitting: each slot is an
/// `Nf`-length `Vec<String>` so a worker can split a line into it without
/// allocating a fresh vector per row.
pub type ScratchPool = Pool<Vec<String>>;

pub fn scratch_pool(capacity: usize, num_fields: usize) -> ScratchPool {
    Pool::new(capacity, |_| vec![String::new(); num_fields])
}

/// Reusable scratch buffers for the MD5 hot path: each slot is a `Vec<u8>`
/// used to assemble `salt || n-gram` bytes before hashing. The teacher
/// stack's `md5` crate only exposes a one-shot `md5::compute`, so "reset,
/// write, sum" becomes "clear the buffer, extend it, compute" — the pool
/// still amortizes the allocation the original's per-call `hash.Hash`
/// checkout was there to avoid.
pub type HashPool = Pool<Vec<u8>>;

pub fn hash_pool(capacity: usize) -> HashPool {
    Pool::new(capacity, |_| Vec::new())
}

/// Bounds the number of concurrent units of work. Backed by a `rayon`
/// thread pool sized to `MaxGo` rather than a literal token
/// acquire/release pool — see the module doc comment.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(max_go: usize) -> Self {
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_go)
            .build()
            .expect("failed to build worker thread pool");
        Self { pool }
    }

    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }
}

/// The three pools the pipeline threads through every stage, replacing the
/// original's `buffers`/`hashes`/`go_pool` globals.
pub struct PoolSet {
    pub scratch: ScratchPool,
    pub hash: HashPool,
    pub workers: WorkerPool,
}

impl PoolSet {
    pub fn new(buffer_cap: usize, hash_cap: usize, max_go: usize, num_fields: usize) -> Self {
        Self {
            scratch: scratch_pool(buffer_cap, num_fields),
            hash: hash_pool(hash_cap),
            workers: WorkerPool::new(max_go),
        }
    }
}
