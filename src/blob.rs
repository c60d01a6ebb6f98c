//! Blob store capability
//!
//! URL-addressable byte storage behind a trait so the core is
//! host-independent: browser hosts back it with `URL.createObjectURL`, while
//! `MemoryBlobStore` serves tests and the CLI. URLs are process-wide handles;
//! whoever launches a simulation is responsible for revoking every URL it
//! owns when the simulation is closed or replaced.

use crate::types::BlobUrl;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Capability interface for materializing and revoking blob URLs.
pub trait BlobStore: Send + Sync {
    /// Store bytes under a fresh, independently revocable URL. The same
    /// content stored twice yields two distinct URLs.
    fn put(&self, bytes: Vec<u8>, mime: &str) -> BlobUrl;

    /// Invalidate a URL; dereferencing it afterward fails.
    fn revoke(&self, url: &str);
}

struct BlobEntry {
    bytes: Vec<u8>,
    mime: String,
}

/// In-memory blob store with counter-addressed `blob:mem/N` URLs.
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, BlobEntry>>,
    next_id: AtomicU64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Dereference a URL. `None` for unknown or revoked URLs.
    pub fn get(&self, url: &str) -> Option<(Vec<u8>, String)> {
        self.entries
            .read()
            .get(url)
            .map(|entry| (entry.bytes.clone(), entry.mime.clone()))
    }

    /// Number of live (unrevoked) URLs.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, bytes: Vec<u8>, mime: &str) -> BlobUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:mem/{id}");
        self.entries.write().insert(
            url.clone(),
            BlobEntry {
                bytes,
                mime: mime.to_string(),
            },
        );
        url
    }

    fn revoke(&self, url: &str) {
        self.entries.write().remove(url);
    }
}
