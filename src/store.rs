// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Blob storage for encrypted envelopes.
//!
//! The escrow core treats storage as an opaque content store keyed by an
//! identifier assigned at store time, with time-to-live expiry handled by
//! the store itself. [`MemoryBlobStore`] is the in-process implementation;
//! production deployments plug in a database-backed one through the same
//! [`BlobStore`] trait.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::escrow::error::EscrowError;

/// An opaque expiring blob store for encrypted envelopes.
///
/// Concurrent calls for different identifiers must not interfere; a fetch
/// racing an expiry on the same identifier resolves to [`EscrowError::NotFound`].
pub trait BlobStore {
    /// Persist `data` until `expires_at`, returning the assigned identifier.
    fn store(&self, data: &[u8], expires_at: SystemTime) -> Result<String, EscrowError>;

    /// Retrieve a blob by identifier.
    ///
    /// # Errors
    /// [`EscrowError::NotFound`] if the identifier is unknown or the blob
    /// has expired.
    fn fetch(&self, id: &str) -> Result<Vec<u8>, EscrowError>;
}

struct StoredBlob {
    data: Vec<u8>,
    expires_at: SystemTime,
}

/// In-memory blob store with lazy time-to-live expiry.
///
/// Identifiers are random UUIDs. Expired blobs are dropped on the fetch
/// that observes them; [`purge_expired`](Self::purge_expired) sweeps the
/// rest for long-running processes.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held, expired or not.
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("blob store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired blob, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = SystemTime::now();
        let mut blobs = self.blobs.lock().expect("blob store lock poisoned");
        let before = blobs.len();
        blobs.retain(|_, blob| blob.expires_at > now);
        let removed = before - blobs.len();
        if removed > 0 {
            log::debug!("purged {removed} expired blobs");
        }
        removed
    }
}

impl BlobStore for MemoryBlobStore {
    fn store(&self, data: &[u8], expires_at: SystemTime) -> Result<String, EscrowError> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut blobs = self.blobs.lock().expect("blob store lock poisoned");
        blobs.insert(id.clone(), StoredBlob { data: data.to_vec(), expires_at });
        Ok(id)
    }

    fn fetch(&self, id: &str) -> Result<Vec<u8>, EscrowError> {
        let mut blobs = self.blobs.lock().expect("blob store lock poisoned");
        match blobs.get(id) {
            Some(blob) if blob.expires_at > SystemTime::now() => Ok(blob.data.clone()),
            Some(_) => {
                blobs.remove(id);
                Err(EscrowError::NotFound)
            }
            None => Err(EscrowError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn in_one_hour() -> SystemTime {
        SystemTime::now() + Duration::from_secs(3600)
    }

    #[test]
    fn store_fetch_roundtrip() {
        let store = MemoryBlobStore::new();
        let id = store.store(b"envelope bytes", in_one_hour()).unwrap();
        assert_eq!(store.fetch(&id).unwrap(), b"envelope bytes");
    }

    #[test]
    fn ids_are_unique() {
        let store = MemoryBlobStore::new();
        let a = store.store(b"one", in_one_hour()).unwrap();
        let b = store.store(b"two", in_one_hour()).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.fetch(&a).unwrap(), b"one");
        assert_eq!(store.fetch(&b).unwrap(), b"two");
    }

    #[test]
    fn unknown_id_not_found() {
        let store = MemoryBlobStore::new();
        assert!(matches!(store.fetch("no-such-id"), Err(EscrowError::NotFound)));
    }

    #[test]
    fn expired_blob_not_found_and_dropped() {
        let store = MemoryBlobStore::new();
        let past = SystemTime::now() - Duration::from_secs(1);
        let id = store.store(b"stale", past).unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(store.fetch(&id), Err(EscrowError::NotFound)));
        assert_eq!(store.len(), 0, "expired blob dropped on fetch");
    }

    #[test]
    fn purge_removes_only_expired() {
        let store = MemoryBlobStore::new();
        let past = SystemTime::now() - Duration::from_secs(1);
        store.store(b"stale", past).unwrap();
        let live = store.store(b"live", in_one_hour()).unwrap();

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch(&live).unwrap(), b"live");
    }
}
