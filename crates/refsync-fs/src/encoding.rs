//! BOM-aware text decoding and re-encoding.
//!
//! Rewritten files must come back in the encoding they were read in, or the
//! rewrite would churn bytes the engine never touched. The BOM is the only
//! encoding signal honored; BOM-less files are treated as UTF-8.

use std::path::Path;

use crate::error::{Error, Result};

/// Text encoding detected from a file's byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];
const UTF16_LE_BOM: [u8; 2] = [0xff, 0xfe];
const UTF16_BE_BOM: [u8; 2] = [0xfe, 0xff];

impl TextEncoding {
    /// Sniffs the encoding from leading bytes. No BOM means plain UTF-8.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&UTF8_BOM) {
            Self::Utf8Bom
        } else if bytes.starts_with(&UTF16_LE_BOM) {
            Self::Utf16Le
        } else if bytes.starts_with(&UTF16_BE_BOM) {
            Self::Utf16Be
        } else {
            Self::Utf8
        }
    }
}

/// Decodes `bytes` to text, returning the detected encoding so the caller
/// can re-encode identically on write.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let encoding = TextEncoding::detect(bytes);
    let text = match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|_| decode_error(path, "UTF-8"))?,
        TextEncoding::Utf8Bom => String::from_utf8(bytes[UTF8_BOM.len()..].to_vec())
            .map_err(|_| decode_error(path, "UTF-8"))?,
        TextEncoding::Utf16Le => decode_utf16(path, &bytes[2..], u16::from_le_bytes)?,
        TextEncoding::Utf16Be => decode_utf16(path, &bytes[2..], u16::from_be_bytes)?,
    };
    Ok((text, encoding))
}

/// Encodes `text` back to bytes in `encoding`, restoring the BOM.
pub fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
        TextEncoding::Utf8Bom => {
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
            bytes.extend_from_slice(&UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            bytes
        }
        TextEncoding::Utf16Le => encode_utf16(text, &UTF16_LE_BOM, u16::to_le_bytes),
        TextEncoding::Utf16Be => encode_utf16(text, &UTF16_BE_BOM, u16::to_be_bytes),
    }
}

fn decode_utf16(path: &Path, bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(decode_error(path, "UTF-16"));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| decode_error(path, "UTF-16"))
}

fn encode_utf16(text: &str, bom: &[u8], to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bom.len() + text.len() * 2);
    bytes.extend_from_slice(bom);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&to_bytes(unit));
    }
    bytes
}

fn decode_error(path: &Path, encoding: &'static str) -> Error {
    Error::Decode {
        path: path.to_path_buf(),
        encoding,
    }
}
