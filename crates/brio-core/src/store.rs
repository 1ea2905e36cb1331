//! Keyed registry of shared immutable sample buffers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::AudioBuffer;

/// Thread-safe store mapping opaque keys to shared sample buffers.
///
/// Upper layers use the store to keep sample data alive while voices hold
/// references to it. Keys are monotonically increasing and never reused,
/// so a stale key can only miss, never alias a newer buffer.
pub struct BufferStore {
    next_key: AtomicU64,
    buffers: RwLock<HashMap<u64, Arc<AudioBuffer>>>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self {
            next_key: AtomicU64::new(0),
            buffers: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a buffer and returns its key.
    pub fn insert(&self, buffer: Arc<AudioBuffer>) -> u64 {
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        self.buffers.write().insert(key, buffer);
        debug!(key, "buffer stored");
        key
    }

    /// Looks up a buffer; `None` when the key was never issued or has been
    /// erased.
    pub fn get(&self, key: u64) -> Option<Arc<AudioBuffer>> {
        self.buffers.read().get(&key).cloned()
    }

    /// Removes a buffer. Returns whether the key was present. Voices still
    /// holding the `Arc` keep the data alive.
    pub fn erase(&self, key: u64) -> bool {
        self.buffers.write().remove(&key).is_some()
    }

    pub fn len(&self) -> usize {
        self.buffers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.read().is_empty()
    }
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new()
    }
}
