// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! # obscursa-core
//!
//! Secure file-escrow pipeline: a submitted file is packed, encrypted with
//! AES-256-GCM, and only the ciphertext is stored. The encryption key is
//! hidden in the pixel low bits of a cover photograph, and that carrier
//! image is the only way to recover the file. Decoding extracts the key
//! from the supplied image, decrypts the stored envelope, and reconstructs
//! the original file byte-for-byte.
//!
//! Storage, cover-photo acquisition, and raster conversion are pluggable
//! collaborators (`store`, `cover`, `raster` modules); the `escrow` module
//! holds the framing, cipher, steganographic codec, and orchestrators.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use obscursa_core::{Escrow, PlainFile, MemoryBlobStore, PexelsCoverSource, PngCodec};
//! use std::time::Duration;
//!
//! let escrow = Escrow::new(
//!     MemoryBlobStore::new(),
//!     PexelsCoverSource::new(api_key, "dog"),
//!     PngCodec,
//! );
//!
//! let file = PlainFile {
//!     name: "report.pdf".into(),
//!     mime_type: "application/pdf".into(),
//!     bytes: std::fs::read("report.pdf").unwrap(),
//! };
//! let receipt = escrow.encode(&file, Duration::from_secs(600)).unwrap();
//! // receipt.key_image is the PNG to hand to the caller;
//! // receipt.storage_id addresses the stored ciphertext.
//!
//! let recovered = escrow.decode(&receipt.storage_id, &receipt.key_image).unwrap();
//! assert_eq!(recovered, file);
//! ```

pub mod escrow;
pub mod cover;
pub mod raster;
pub mod store;

pub use escrow::{Escrow, EscrowConfig, EscrowError, EncodeReceipt, KeyFault, PlainFile};
pub use cover::{CoverSource, PexelsCoverSource};
pub use raster::{PngCodec, RasterCodec, RasterError, RasterImage};
pub use store::{BlobStore, MemoryBlobStore};
