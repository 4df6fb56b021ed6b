// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! The file-escrow core: framing, authenticated encryption, LSB
//! steganography, and the encode/decode orchestrators that tie them to the
//! collaborator traits ([`BlobStore`](crate::store::BlobStore),
//! [`CoverSource`](crate::cover::CoverSource),
//! [`RasterCodec`](crate::raster::RasterCodec)).
//!
//! Leaf-first: `frame` and `crypto` and `lsb` have no dependencies on each
//! other; `keyimage` builds on `lsb` plus the raster and cover
//! collaborators; `pipeline` sequences everything.

pub mod error;
pub mod frame;
pub mod crypto;
pub mod lsb;
pub mod keyimage;
mod pipeline;

pub use error::{EscrowError, KeyFault};
pub use frame::PlainFile;
pub use pipeline::{Escrow, EscrowConfig, EncodeReceipt, DEFAULT_MAX_FILE_BYTES};
