// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Authenticated encryption of the packed file buffer.
//!
//! Uses AES-256-GCM with a fresh random key and nonce per call. The
//! envelope is the self-contained unit that gets persisted:
//!
//! ```text
//! [12 bytes] nonce
//! [N bytes ] ciphertext (same length as the plaintext)
//! [16 bytes] authentication tag
//! ```
//!
//! Key and nonce are always generated together and never cached — nonce
//! reuse under the same key is the one condition that silently breaks
//! confidentiality. The key leaves this module only wrapped in
//! [`Zeroizing`], and its sole long-term home is the carrier image.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use zeroize::Zeroizing;

use crate::escrow::error::EscrowError;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Minimum envelope length: nonce + tag around an empty ciphertext.
pub const ENVELOPE_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Result of sealing a plaintext: the fresh key and the storable envelope.
pub struct Sealed {
    /// The 32-byte encryption key, zeroed on drop.
    pub key: Zeroizing<[u8; KEY_LEN]>,
    /// `nonce ‖ ciphertext ‖ tag`, ready for the blob store.
    pub envelope: Vec<u8>,
}

/// Encrypt a plaintext buffer under a freshly generated key and nonce.
pub fn encrypt(plaintext: &[u8]) -> Sealed {
    use rand::RngCore;
    let mut rng = rand::thread_rng();

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    rng.fill_bytes(&mut *key);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(&*key).expect("valid key length");
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher.encrypt(nonce, plaintext).expect("AES-GCM encrypt should not fail");

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);

    Sealed { key, envelope }
}

/// Decrypt an envelope with the given key, verifying the authentication tag.
///
/// # Errors
/// - [`EscrowError::EnvelopeTooShort`] if the envelope cannot hold a nonce
///   and tag (< 28 bytes). This is a format problem, not a failed
///   authentication.
/// - [`EscrowError::DecryptionFailed`] if the tag does not verify (wrong
///   key, or any corruption of nonce/ciphertext/tag). No plaintext is
///   released in that case.
pub fn decrypt(key: &[u8; KEY_LEN], envelope: &[u8]) -> Result<Vec<u8>, EscrowError> {
    if envelope.len() < ENVELOPE_OVERHEAD {
        return Err(EscrowError::EnvelopeTooShort);
    }

    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new_from_slice(key).expect("valid key length");
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher.decrypt(nonce, ciphertext).map_err(|_| EscrowError::DecryptionFailed)
}
