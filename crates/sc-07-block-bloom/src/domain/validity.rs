//! Write-once validity cell
//!
//! A cell starts empty and is filled at most once, by the first computation
//! that succeeds. A failed computation leaves the cell empty so the next
//! caller retries from scratch. Concurrent callers are serialized through a
//! compute gate; whoever enters after a success reads the stored value.

use parking_lot::Mutex;
use std::fmt;
use std::sync::OnceLock;

pub struct ValidityCell<T> {
    value: OnceLock<T>,
    gate: Mutex<()>,
}

impl<T> ValidityCell<T> {
    pub fn new() -> Self {
        Self {
            value: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// Cached record, if a computation has succeeded.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_set(&self) -> bool {
        self.value.get().is_some()
    }

    /// Return the cached record or run `compute` to produce it.
    ///
    /// `compute` runs at most once per successful fill. On `Err` nothing is
    /// stored and the error is handed back to the caller.
    pub fn get_or_try_init<E, F>(&self, compute: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _gate = self.gate.lock();
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = compute()?;
        Ok(self.value.get_or_init(|| value))
    }
}

impl<T> Default for ValidityCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ValidityCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            gate: Mutex::new(()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidityCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidityCell").field(&self.value.get()).finish()
    }
}
