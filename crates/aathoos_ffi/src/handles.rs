//! Registry of database handles issued across the C boundary.
//!
//! # Responsibility
//! - Turn an owned `Database` into an opaque pointer token for the host.
//! - Resolve tokens back to a live handle, rejecting closed or foreign ones.
//!
//! # Invariants
//! - A token is never dereferenced; it is only a lookup key.
//! - Tokens come from a counter and are never reissued, so a stale token
//!   cannot alias a handle opened later.
//! - After `release`, the token resolves to nothing, so use-after-close and
//!   double-close are reported instead of touching freed memory.
//! - An operation in flight keeps its handle alive until it returns, even if
//!   the host closes the token concurrently.

use aathoos_core::Database;
use std::collections::HashMap;
use std::marker::{PhantomData, PhantomPinned};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Opaque handle type seen by C callers. Pointers to it are registry
/// tokens and never point at a real value.
#[repr(C)]
pub struct AathoosDb {
    _private: [u8; 0],
    _not_send_sync: PhantomData<(*mut u8, PhantomPinned)>,
}

static LIVE_HANDLES: OnceLock<Mutex<HashMap<usize, Arc<Database>>>> = OnceLock::new();
static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(1);

fn live_handles() -> MutexGuard<'static, HashMap<usize, Arc<Database>>> {
    LIVE_HANDLES
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Takes ownership of `db` and returns the token the host will pass back.
pub(crate) fn register(db: Database) -> *mut AathoosDb {
    let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    live_handles().insert(token, Arc::new(db));
    token as *mut AathoosDb
}

/// Resolves a token to its live handle.
pub(crate) fn resolve(token: *mut AathoosDb) -> Option<Arc<Database>> {
    if token.is_null() {
        return None;
    }
    live_handles().get(&(token as usize)).cloned()
}

/// Removes a token from the registry and hands back its handle.
///
/// Returns `None` for null, unknown or already released tokens.
pub(crate) fn release(token: *mut AathoosDb) -> Option<Arc<Database>> {
    if token.is_null() {
        return None;
    }
    live_handles().remove(&(token as usize))
}
