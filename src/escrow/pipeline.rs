// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Encode/decode orchestration.
//!
//! [`Escrow`] sequences the full escrow flow over injected collaborators:
//!
//! - encode: validate → pack → encrypt → conceal key in a cover photo →
//!   persist the envelope (persist is last, so an abandoned call writes
//!   nothing).
//! - decode: validate → recover key from the carrier → fetch the envelope →
//!   decrypt → unpack.
//!
//! Each call is a single sequential unit of work owning its own key and
//! buffers; no state is shared across concurrent calls. Every failure
//! surfaces as exactly one [`EscrowError`] kind. The plaintext key lives
//! only in process memory for the duration of an encode and is never
//! logged or persisted.

use std::time::{Duration, SystemTime};

use crate::cover::CoverSource;
use crate::escrow::error::EscrowError;
use crate::escrow::frame::{self, PlainFile, SEPARATOR};
use crate::escrow::{crypto, keyimage};
use crate::raster::RasterCodec;
use crate::store::BlobStore;

/// Default per-file size ceiling (storage-tier document limit).
pub const DEFAULT_MAX_FILE_BYTES: usize = 15 * 1024 * 1024;

/// Orchestrator configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct EscrowConfig {
    /// Largest accepted input file in bytes.
    pub max_file_bytes: usize,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self { max_file_bytes: DEFAULT_MAX_FILE_BYTES }
    }
}

/// Result of a successful encode: the stored-envelope handle and the
/// carrier image that is the only way to get the file back.
#[derive(Debug)]
pub struct EncodeReceipt {
    pub storage_id: String,
    /// Lossless raster container bytes holding the hidden key.
    pub key_image: Vec<u8>,
}

/// The escrow pipeline over a blob store, cover source, and raster codec.
pub struct Escrow<S, C, R> {
    store: S,
    cover: C,
    raster: R,
    config: EscrowConfig,
}

impl<S: BlobStore, C: CoverSource, R: RasterCodec> Escrow<S, C, R> {
    pub fn new(store: S, cover: C, raster: R) -> Self {
        Self::with_config(store, cover, raster, EscrowConfig::default())
    }

    pub fn with_config(store: S, cover: C, raster: R, config: EscrowConfig) -> Self {
        Self { store, cover, raster, config }
    }

    /// Encrypt `file`, persist the envelope for `ttl`, and return the
    /// storage handle plus the key-carrying image.
    ///
    /// # Errors
    /// - [`EscrowError::InvalidExpiry`] if `ttl` is zero.
    /// - [`EscrowError::FileTooLarge`] if the payload exceeds the configured
    ///   ceiling.
    /// - [`EscrowError::MissingSeparator`] if the name or MIME type contains
    ///   the framing separator byte.
    /// - Any cover-source, raster, capacity, or storage error from the
    ///   downstream stages.
    pub fn encode(&self, file: &PlainFile, ttl: Duration) -> Result<EncodeReceipt, EscrowError> {
        // 1. Validate before any work happens.
        if ttl.is_zero() {
            return Err(EscrowError::InvalidExpiry);
        }
        if file.bytes.len() > self.config.max_file_bytes {
            return Err(EscrowError::FileTooLarge {
                size: file.bytes.len(),
                limit: self.config.max_file_bytes,
            });
        }
        if file.name.as_bytes().contains(&SEPARATOR) || file.mime_type.as_bytes().contains(&SEPARATOR)
        {
            return Err(EscrowError::MissingSeparator);
        }

        let expires_at = SystemTime::now() + ttl;

        // 2. Pack filename + MIME + payload into one buffer.
        let packed = frame::pack(&file.name, &file.mime_type, &file.bytes);

        // 3. Encrypt under a fresh key; the packed plaintext is no longer
        //    needed once the envelope exists.
        let sealed = crypto::encrypt(&packed);
        drop(packed);

        // 4. Hide the key in a freshly fetched cover photo.
        let key_image = keyimage::conceal_key(&self.cover, &self.raster, &sealed.key)?;

        // 5. Persist the envelope last — nothing is written until every
        //    fallible stage has succeeded.
        let storage_id = self.store.store(&sealed.envelope, expires_at)?;

        log::debug!(
            "encoded {} byte file as {} byte envelope, id {storage_id}",
            file.bytes.len(),
            sealed.envelope.len()
        );

        Ok(EncodeReceipt { storage_id, key_image })
    }

    /// Recover the original file from a storage identifier and the carrier
    /// image returned by [`encode`](Self::encode).
    ///
    /// # Errors
    /// - [`EscrowError::MissingInput`] if either input is empty.
    /// - [`EscrowError::KeyRecovery`] if the carrier holds no valid key —
    ///   the dominant failure when the wrong image is supplied.
    /// - [`EscrowError::NotFound`] if the envelope is absent or expired.
    /// - [`EscrowError::DecryptionFailed`] on tag mismatch; no partial
    ///   plaintext is ever released.
    pub fn decode(&self, storage_id: &str, carrier_image: &[u8]) -> Result<PlainFile, EscrowError> {
        // 1. Validate.
        if storage_id.trim().is_empty() {
            return Err(EscrowError::MissingInput("storage identifier"));
        }
        if carrier_image.is_empty() {
            return Err(EscrowError::MissingInput("carrier image"));
        }

        // 2. Extract the key from the carrier image.
        let key = keyimage::recover_key(&self.raster, carrier_image)?;

        // 3. Retrieve the envelope.
        let envelope = self.store.fetch(storage_id)?;

        // 4. Decrypt with tag verification.
        let plaintext = crypto::decrypt(&key, &envelope)?;

        // 5. Unpack into the original file.
        let file = frame::unpack(&plaintext)?;

        log::debug!("decoded id {storage_id} into {} byte file", file.bytes.len());

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterError, RasterImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullStore {
        stores: AtomicUsize,
    }

    impl NullStore {
        fn new() -> Self {
            Self { stores: AtomicUsize::new(0) }
        }
    }

    impl BlobStore for NullStore {
        fn store(&self, _data: &[u8], _expires_at: SystemTime) -> Result<String, EscrowError> {
            self.stores.fetch_add(1, Ordering::SeqCst);
            Ok("id".into())
        }
        fn fetch(&self, _id: &str) -> Result<Vec<u8>, EscrowError> {
            Err(EscrowError::NotFound)
        }
    }

    struct NoCover;

    impl CoverSource for NoCover {
        fn fetch_cover(&self) -> Result<Vec<u8>, EscrowError> {
            Err(EscrowError::CoverSource("unavailable".into()))
        }
    }

    struct NoRaster;

    impl RasterCodec for NoRaster {
        fn decode(&self, _bytes: &[u8]) -> Result<RasterImage, RasterError> {
            Err(RasterError::Decode("unavailable".into()))
        }
        fn encode(&self, _image: &RasterImage) -> Result<Vec<u8>, RasterError> {
            Err(RasterError::Encode("unavailable".into()))
        }
    }

    fn escrow_with(config: EscrowConfig) -> Escrow<NullStore, NoCover, NoRaster> {
        Escrow::with_config(NullStore::new(), NoCover, NoRaster, config)
    }

    fn sample_file() -> PlainFile {
        PlainFile { name: "a.txt".into(), mime_type: "text/plain".into(), bytes: b"hello".to_vec() }
    }

    #[test]
    fn zero_expiry_rejected() {
        let escrow = escrow_with(EscrowConfig::default());
        let result = escrow.encode(&sample_file(), Duration::ZERO);
        assert!(matches!(result, Err(EscrowError::InvalidExpiry)));
        assert_eq!(escrow.store.stores.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn oversized_file_rejected_before_any_work() {
        let escrow = escrow_with(EscrowConfig { max_file_bytes: 4 });
        let result = escrow.encode(&sample_file(), Duration::from_secs(600));
        match result {
            Err(EscrowError::FileTooLarge { size: 5, limit: 4 }) => {}
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
        assert_eq!(escrow.store.stores.load(Ordering::SeqCst), 0, "no partial state written");
    }

    #[test]
    fn separator_in_name_rejected() {
        let escrow = escrow_with(EscrowConfig::default());
        let mut file = sample_file();
        file.name = "evil\nname.txt".into();
        assert!(matches!(
            escrow.encode(&file, Duration::from_secs(600)),
            Err(EscrowError::MissingSeparator)
        ));
    }

    #[test]
    fn separator_in_mime_rejected() {
        let escrow = escrow_with(EscrowConfig::default());
        let mut file = sample_file();
        file.mime_type = "text/\nplain".into();
        assert!(matches!(
            escrow.encode(&file, Duration::from_secs(600)),
            Err(EscrowError::MissingSeparator)
        ));
    }

    #[test]
    fn decode_requires_both_inputs() {
        let escrow = escrow_with(EscrowConfig::default());
        assert!(matches!(
            escrow.decode("", b"carrier"),
            Err(EscrowError::MissingInput("storage identifier"))
        ));
        assert!(matches!(
            escrow.decode("   ", b"carrier"),
            Err(EscrowError::MissingInput("storage identifier"))
        ));
        assert!(matches!(
            escrow.decode("some-id", b""),
            Err(EscrowError::MissingInput("carrier image"))
        ));
    }

    #[test]
    fn cover_failure_surfaces_and_writes_nothing() {
        let escrow = escrow_with(EscrowConfig::default());
        let result = escrow.encode(&sample_file(), Duration::from_secs(600));
        assert!(matches!(result, Err(EscrowError::CoverSource(_))));
        assert_eq!(escrow.store.stores.load(Ordering::SeqCst), 0);
    }
}
