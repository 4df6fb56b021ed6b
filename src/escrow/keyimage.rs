// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Key-image pipeline: hiding the encryption key in a carrier image.
//!
//! The key is embedded as its lowercase hexadecimal text (64 ASCII
//! characters for a 32-byte key). That doubles the embedded bit count over
//! raw bytes but keeps the hidden value printable for diagnostics. The
//! carrier must therefore offer at least `32 + 8 * 64` sample bytes —
//! any cover photo of 130 pixels or more in RGBA easily qualifies.

use zeroize::Zeroizing;

use crate::cover::CoverSource;
use crate::escrow::crypto::KEY_LEN;
use crate::escrow::error::{EscrowError, KeyFault};
use crate::escrow::lsb;
use crate::raster::RasterCodec;

/// Fetch a cover photo and produce a carrier image holding `key`.
///
/// The cover is decoded to raw RGBA samples (alpha forced present), the
/// key's hex form is embedded in the sample low bits, and the modified
/// samples are re-encoded into a lossless container with the original
/// geometry.
///
/// # Errors
/// - [`EscrowError::CoverSource`] if no cover photo can be fetched.
/// - [`EscrowError::Raster`] if the cover cannot be decoded or re-encoded.
/// - [`EscrowError::MessageTooLarge`] if the cover is too small to hold
///   the key.
pub fn conceal_key<C: CoverSource, R: RasterCodec>(
    cover: &C,
    raster: &R,
    key: &[u8; KEY_LEN],
) -> Result<Vec<u8>, EscrowError> {
    let cover_bytes = cover.fetch_cover()?;
    let mut image = raster.decode(&cover_bytes)?;

    let key_hex = Zeroizing::new(hex::encode(key));
    lsb::hide(&mut image.samples, key_hex.as_bytes())?;

    log::debug!(
        "key concealed in {}x{} carrier ({} samples)",
        image.width,
        image.height,
        image.samples.len()
    );

    Ok(raster.encode(&image)?)
}

/// Recover the encryption key from a carrier image.
///
/// Decodes the carrier to the same raw sample layout used by
/// [`conceal_key`], reveals the hidden hex text, and parses it back into
/// the raw 32-byte key.
///
/// # Errors
/// - [`EscrowError::Raster`] if the carrier bytes cannot be decoded.
/// - [`EscrowError::KeyRecovery`] wrapping the codec error if the carrier
///   holds no valid payload, or if the revealed text is not hex, or the
///   decoded key is not exactly 32 bytes.
pub fn recover_key<R: RasterCodec>(
    raster: &R,
    carrier_bytes: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>, EscrowError> {
    let image = raster.decode(carrier_bytes)?;

    let revealed = lsb::reveal(&image.samples)
        .map_err(|e| EscrowError::KeyRecovery(KeyFault::Hidden(Box::new(e))))?;
    let revealed = Zeroizing::new(revealed);

    let decoded = hex::decode(&*revealed)
        .map_err(|_| EscrowError::KeyRecovery(KeyFault::NotHex))?;
    let decoded = Zeroizing::new(decoded);

    if decoded.len() != KEY_LEN {
        return Err(EscrowError::KeyRecovery(KeyFault::WrongLength(decoded.len())));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&decoded);
    Ok(key)
}
