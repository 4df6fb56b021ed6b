// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Error types for the escrow pipeline.
//!
//! [`EscrowError`] covers all failure modes from binary framing through
//! encryption, steganographic embedding, and blob storage. Every variant is
//! matched by kind at the orchestrator boundary — never by message text —
//! so callers can distinguish "wrong key image" from "file expired" from
//! "file too large".

use core::fmt;

use crate::raster::RasterError;

/// Errors that can occur during escrow encoding or decoding.
#[derive(Debug)]
pub enum EscrowError {
    /// The packed buffer is missing a filename or MIME-type separator.
    MissingSeparator,
    /// The envelope is too short to contain a nonce and authentication tag.
    EnvelopeTooShort,
    /// AES-GCM tag verification failed (wrong key or corrupted envelope).
    /// No plaintext bytes are released when this is returned.
    DecryptionFailed,
    /// The message does not fit in the carrier's sample buffer.
    MessageTooLarge,
    /// The revealed length prefix implies more data than the carrier holds
    /// (image never written to, or recompressed/corrupted in transit).
    CarrierCorrupted,
    /// Key recovery from the carrier image failed.
    KeyRecovery(KeyFault),
    /// No stored envelope under the given identifier (absent or expired).
    NotFound,
    /// The input file exceeds the configured storage ceiling.
    FileTooLarge { size: usize, limit: usize },
    /// The expiry duration is zero.
    InvalidExpiry,
    /// A required request input was empty.
    MissingInput(&'static str),
    /// The raster codec could not convert between container and samples.
    Raster(RasterError),
    /// The cover-image source failed to supply a photograph.
    CoverSource(String),
    /// The blob store rejected the operation.
    Storage(String),
}

/// Why key recovery from a carrier image failed.
#[derive(Debug)]
pub enum KeyFault {
    /// The steganographic codec reported an error while revealing.
    Hidden(Box<EscrowError>),
    /// The revealed payload is not hexadecimal text.
    NotHex,
    /// The hex-decoded key is not exactly 32 bytes.
    WrongLength(usize),
}

impl fmt::Display for EscrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "packed buffer is missing a field separator"),
            Self::EnvelopeTooShort => write!(f, "envelope too short to hold nonce and auth tag"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong key image?)"),
            Self::MessageTooLarge => write!(f, "message too large for this carrier image"),
            Self::CarrierCorrupted => write!(f, "carrier holds no valid hidden payload"),
            Self::KeyRecovery(fault) => write!(f, "key recovery failed: {fault}"),
            Self::NotFound => write!(f, "stored file not found or expired"),
            Self::FileTooLarge { size, limit } => {
                write!(f, "file of {size} bytes exceeds the {limit}-byte limit")
            }
            Self::InvalidExpiry => write!(f, "expiry duration must be positive"),
            Self::MissingInput(what) => write!(f, "missing required input: {what}"),
            Self::Raster(e) => write!(f, "raster conversion failed: {e}"),
            Self::CoverSource(msg) => write!(f, "cover image source failed: {msg}"),
            Self::Storage(msg) => write!(f, "blob store failed: {msg}"),
        }
    }
}

impl fmt::Display for KeyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden(e) => write!(f, "{e}"),
            Self::NotHex => write!(f, "revealed payload is not hexadecimal"),
            Self::WrongLength(n) => write!(f, "hex-decoded key is {n} bytes, expected 32"),
        }
    }
}

impl std::error::Error for EscrowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::KeyRecovery(KeyFault::Hidden(e)) => Some(e),
            Self::Raster(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RasterError> for EscrowError {
    fn from(e: RasterError) -> Self {
        Self::Raster(e)
    }
}
