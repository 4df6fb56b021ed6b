// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Raster conversion between container bytes and raw pixel samples.
//!
//! The escrow core never touches a specific image library directly: it
//! works through the [`RasterCodec`] trait, which converts between an
//! encoded raster container and a [`RasterImage`] of interleaved per-channel
//! byte samples. The conversion must be lossless and order-stable in both
//! directions — same row-major traversal, same channel count — or the
//! hide/reveal symmetry of the steganographic codec breaks.
//!
//! [`PngCodec`] is the default implementation: it decodes any format the
//! `image` crate is built with (PNG and JPEG here, since cover photos
//! usually arrive as JPEG) into RGBA with alpha forced present, and always
//! re-encodes to PNG so the carrier stays lossless.

use core::fmt;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Errors from raster container conversion.
#[derive(Debug)]
pub enum RasterError {
    /// The byte stream is not a decodable raster image.
    Decode(String),
    /// Re-encoding the sample buffer into a container failed.
    Encode(String),
    /// The sample buffer does not match the declared geometry.
    Geometry { width: u32, height: u32, channels: u8, samples: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "raster decode failed: {msg}"),
            Self::Encode(msg) => write!(f, "raster encode failed: {msg}"),
            Self::Geometry { width, height, channels, samples } => write!(
                f,
                "sample buffer of {samples} bytes does not match {width}x{height}x{channels}"
            ),
        }
    }
}

impl std::error::Error for RasterError {}

/// A decoded raster image as raw interleaved per-channel byte samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel. Decoders force alpha, so this is always >= 4.
    pub channels: u8,
    /// Row-major interleaved samples, `width * height * channels` bytes.
    pub samples: Vec<u8>,
}

impl RasterImage {
    /// Expected sample count for the declared geometry.
    pub fn expected_samples(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

/// Lossless conversion between container bytes and raw samples.
pub trait RasterCodec {
    /// Decode container bytes into raw samples with alpha forced present.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, RasterError>;

    /// Encode raw samples back into a lossless container.
    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>, RasterError>;
}

/// Default codec: decodes PNG/JPEG input, always emits PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl RasterCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, RasterError> {
        let img = image::load_from_memory(bytes).map_err(|e| RasterError::Decode(e.to_string()))?;
        // to_rgba8 forces a 4th alpha channel (255 where the source had none).
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RasterImage { width, height, channels: 4, samples: rgba.into_raw() })
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>, RasterError> {
        if image.channels != 4 || image.samples.len() != image.expected_samples() {
            return Err(RasterError::Geometry {
                width: image.width,
                height: image.height,
                channels: image.channels,
                samples: image.samples.len(),
            });
        }

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&image.samples, image.width, image.height, ExtendedColorType::Rgba8)
            .map_err(|e| RasterError::Encode(e.to_string()))?;
        Ok(out)
    }
}
