// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Least-significant-bit steganographic codec.
//!
//! Embeds an arbitrary byte string into a sequence of raw pixel samples,
//! one bit per sample, touching only each sample's low bit:
//!
//! ```text
//! [32 samples       ] message length, u32 little-endian, LSB-first
//! [8 * len samples  ] message bytes, each LSB-first
//! [remaining samples] untouched
//! ```
//!
//! `hide` and `reveal` are exact inverses only when the sample sequence is
//! byte-for-byte preserved between them. Any lossy recompression of the
//! carrier surfaces as [`EscrowError::CarrierCorrupted`] on reveal, not as
//! a silent misdecode.

use crate::escrow::error::EscrowError;

/// Number of samples consumed by the length prefix.
pub const LENGTH_PREFIX_SAMPLES: usize = 32;

/// Number of samples required to hide a message of `len` bytes.
pub fn required_samples(len: usize) -> usize {
    LENGTH_PREFIX_SAMPLES + len * 8
}

/// Hide `message` in the low bits of `samples`, in place.
///
/// Every modified sample changes by at most 1; samples beyond the consumed
/// prefix are left untouched.
///
/// # Errors
/// [`EscrowError::MessageTooLarge`] if `32 + 8 * message.len()` exceeds the
/// sample count. A message needing exactly `samples.len()` bits fits.
pub fn hide(samples: &mut [u8], message: &[u8]) -> Result<(), EscrowError> {
    if required_samples(message.len()) > samples.len() {
        return Err(EscrowError::MessageTooLarge);
    }

    let len = message.len() as u32;
    let mut offset = 0;

    for i in 0..LENGTH_PREFIX_SAMPLES {
        let bit = ((len >> i) & 1) as u8;
        samples[offset] = (samples[offset] & 0xFE) | bit;
        offset += 1;
    }

    for &byte in message {
        for j in 0..8 {
            let bit = (byte >> j) & 1;
            samples[offset] = (samples[offset] & 0xFE) | bit;
            offset += 1;
        }
    }

    Ok(())
}

/// Reveal a message hidden by [`hide`] from the low bits of `samples`.
///
/// # Errors
/// [`EscrowError::CarrierCorrupted`] if the samples are too few to hold a
/// length prefix, or the decoded length implies more data than the samples
/// hold. This is how images that were never steganographically written, or
/// were recompressed in transit, are detected.
pub fn reveal(samples: &[u8]) -> Result<Vec<u8>, EscrowError> {
    if samples.len() < LENGTH_PREFIX_SAMPLES {
        return Err(EscrowError::CarrierCorrupted);
    }

    let mut len: u32 = 0;
    for i in 0..LENGTH_PREFIX_SAMPLES {
        let bit = (samples[i] & 1) as u32;
        len |= bit << i;
    }

    // u64 arithmetic so an adversarial length can't overflow the bound check.
    let needed = LENGTH_PREFIX_SAMPLES as u64 + (len as u64) * 8;
    if needed > samples.len() as u64 {
        return Err(EscrowError::CarrierCorrupted);
    }

    let mut message = vec![0u8; len as usize];
    let mut offset = LENGTH_PREFIX_SAMPLES;
    for byte in message.iter_mut() {
        for j in 0..8 {
            let bit = samples[offset] & 1;
            *byte |= bit << j;
            offset += 1;
        }
    }

    Ok(message)
}
