use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod cancel;
pub mod signal;

/// Every critical section in this crate leaves its data consistent before it
/// can panic, so a poisoned lock is still safe to use.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
