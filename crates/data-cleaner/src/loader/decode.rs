//! Byte decoding with an ordered encoding fallback.

use crate::error::{CleanerError, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings tried when decoding an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Single-byte Western encoding (decoded as windows-1252).
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::Latin1 => WINDOWS_1252,
        }
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<String, String> {
        let bytes = match self {
            Self::Utf8 => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            Self::Latin1 => bytes,
        };
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| format!("bytes are not valid {}", self.name()))
    }
}

/// Encodings in the order they are attempted. First success wins.
pub const ENCODINGS: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

/// Decode bytes with the first encoding that accepts them.
///
/// Fails with [`CleanerError::DecodeFailure`] carrying the last attempt's
/// message when every encoding rejects the input.
pub fn decode_bytes(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let mut last_error = String::from("no encodings attempted");

    for encoding in ENCODINGS {
        match encoding.decode(bytes) {
            Ok(text) => {
                debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());
                return Ok((text, encoding));
            }
            Err(e) => {
                debug!("Decoding as {} failed: {}", encoding.name(), e);
                last_error = e;
            }
        }
    }

    Err(CleanerError::DecodeFailure(last_error))
}
