// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Binary packing of a file into a single buffer.
//!
//! The packed format is what gets encrypted and stored:
//!
//! ```text
//! [N bytes] filename (UTF-8)
//! [1 byte ] 0x0A separator
//! [M bytes] MIME type (UTF-8)
//! [1 byte ] 0x0A separator
//! [K bytes] file payload
//! ```
//!
//! No escaping is performed: a filename or MIME type containing the
//! separator byte would make framing ambiguous. The orchestrator rejects
//! such inputs before packing (see `pipeline`); `unpack` keeps the original
//! split-on-first-separator behavior for buffers produced elsewhere.

use crate::escrow::error::EscrowError;

/// Field separator between filename, MIME type, and payload.
pub const SEPARATOR: u8 = b'\n';

/// A plaintext file: the unit the escrow accepts and reconstructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Pack filename, MIME type, and payload into a single buffer.
///
/// Pure concatenation; the caller is responsible for keeping the separator
/// byte out of `name` and `mime_type`.
pub fn pack(name: &str, mime_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(name.len() + mime_type.len() + bytes.len() + 2);
    packed.extend_from_slice(name.as_bytes());
    packed.push(SEPARATOR);
    packed.extend_from_slice(mime_type.as_bytes());
    packed.push(SEPARATOR);
    packed.extend_from_slice(bytes);
    packed
}

/// Unpack a buffer into filename, MIME type, and payload.
///
/// Splits on the first separator for the filename and the next one for the
/// MIME type; everything after the second separator is the payload. Name and
/// MIME type are recovered with lossy UTF-8 conversion.
///
/// # Errors
/// [`EscrowError::MissingSeparator`] if fewer than two separator bytes exist.
pub fn unpack(buffer: &[u8]) -> Result<PlainFile, EscrowError> {
    let first = buffer
        .iter()
        .position(|&b| b == SEPARATOR)
        .ok_or(EscrowError::MissingSeparator)?;

    let second = buffer[first + 1..]
        .iter()
        .position(|&b| b == SEPARATOR)
        .map(|i| first + 1 + i)
        .ok_or(EscrowError::MissingSeparator)?;

    Ok(PlainFile {
        name: String::from_utf8_lossy(&buffer[..first]).into_owned(),
        mime_type: String::from_utf8_lossy(&buffer[first + 1..second]).into_owned(),
        bytes: buffer[second + 1..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let packed = pack("report.pdf", "application/pdf", &bytes);
        let file = unpack(&packed).unwrap();

        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.bytes, bytes);
    }

    #[test]
    fn packed_layout_is_byte_exact() {
        let packed = pack("a.txt", "text/plain", b"hello");
        assert_eq!(packed, b"a.txt\ntext/plain\nhello");
    }

    #[test]
    fn payload_may_contain_separators() {
        // Separator bytes in the payload are fine — only the first two count.
        let bytes = b"line one\nline two\n".to_vec();
        let packed = pack("notes.txt", "text/plain", &bytes);
        let file = unpack(&packed).unwrap();
        assert_eq!(file.bytes, bytes);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let packed = pack("empty.bin", "application/octet-stream", &[]);
        let file = unpack(&packed).unwrap();
        assert_eq!(file.name, "empty.bin");
        assert!(file.bytes.is_empty());
    }

    #[test]
    fn missing_separators_rejected() {
        assert!(matches!(unpack(b"no separators here"), Err(EscrowError::MissingSeparator)));
        assert!(matches!(unpack(b"only-one\nseparator"), Err(EscrowError::MissingSeparator)));
        assert!(matches!(unpack(&[]), Err(EscrowError::MissingSeparator)));
    }

    #[test]
    fn separator_in_name_truncates() {
        // Known format fragility: a separator inside the name shifts the
        // field boundaries. The orchestrator forbids this input; unpack
        // itself just splits on the first occurrence.
        let packed = pack("bad\nname.txt", "text/plain", b"data");
        let file = unpack(&packed).unwrap();
        assert_eq!(file.name, "bad");
        assert_eq!(file.mime_type, "name.txt");
    }

    #[test]
    fn empty_name_and_mime_roundtrip() {
        let packed = pack("", "", b"x");
        let file = unpack(&packed).unwrap();
        assert_eq!(file.name, "");
        assert_eq!(file.mime_type, "");
        assert_eq!(file.bytes, b"x");
    }
}
