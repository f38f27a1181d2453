//! The store critical-section primitive.
//!
//! A [`StoreLock`] is an owned RAII guard over a store's critical-section
//! lock: holding it fences a multi-step read (or write) sequence against
//! concurrent mutation, and dropping it releases the section on every exit
//! path. Read sections are acquired recursively, so a read section may be
//! re-entered on the same thread without deadlocking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{RawRwLock, RwLock};

/// Process-unique identity of a store instance.
///
/// Used as a ledger key by the copy engine and for same-store checks; two
/// handles to the same backing store must report the same id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    /// Allocate a fresh process-unique store id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Debug for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StoreId({})", self.0)
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store-{}", self.0)
    }
}

/// Scoped critical-section guard returned by
/// [`ModelStore::enter_critical_section`](crate::ModelStore::enter_critical_section).
///
/// The section is left when the guard is dropped.
pub struct StoreLock {
    guard: Guard,
}

enum Guard {
    Read(ArcRwLockReadGuard<RawRwLock, ()>),
    Write(ArcRwLockWriteGuard<RawRwLock, ()>),
    Noop,
}

impl StoreLock {
    /// Enter a read section on the given critical-section lock.
    pub fn read(lock: &Arc<RwLock<()>>) -> Self {
        Self {
            guard: Guard::Read(RwLock::read_arc_recursive(lock)),
        }
    }

    /// Enter a write section on the given critical-section lock.
    pub fn write(lock: &Arc<RwLock<()>>) -> Self {
        Self {
            guard: Guard::Write(RwLock::write_arc(lock)),
        }
    }

    /// A no-op guard for backends whose operations are individually atomic
    /// and need no extra fencing.
    pub fn noop() -> Self {
        Self { guard: Guard::Noop }
    }

    /// Whether this guard holds a read (as opposed to write) section.
    pub fn is_read(&self) -> bool {
        matches!(self.guard, Guard::Read(_) | Guard::Noop)
    }
}

impl std::fmt::Debug for StoreLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.guard {
            Guard::Read(_) => "read",
            Guard::Write(_) => "write",
            Guard::Noop => "noop",
        };
        f.debug_struct("StoreLock").field("kind", &kind).finish()
    }
}
