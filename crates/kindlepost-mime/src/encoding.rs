//! Base64 encoding and decoding utilities.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum line length for base64 content lines (RFC 2045 section 6.8).
const MAX_ENCODED_LINE: usize = 76;

/// Encodes data as base64 using the standard alphabet.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as base64 wrapped at 76 columns with CRLF line breaks.
///
/// Receiving mail systems decode base64 irrespective of line length, but
/// wrapped output keeps every line within the SMTP line-length limit.
#[must_use]
pub fn encode_base64_mime(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / MAX_ENCODED_LINE * 2);

    for (i, chunk) in encoded.as_bytes().chunks(MAX_ENCODED_LINE).enumerate() {
        if i > 0 {
            wrapped.push_str("\r\n");
        }
        // Base64 output is pure ASCII, so chunking bytes is safe.
        wrapped.push_str(&String::from_utf8_lossy(chunk));
    }

    wrapped
}

/// Decodes base64 data, ignoring interleaved whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encode_simple() {
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode_base64(b""), "");
        assert_eq!(encode_base64_mime(b""), "");
    }

    #[test]
    fn decode_ignores_line_breaks() {
        let decoded = decode_base64("aGVs\r\nbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_base64("not*base64!").is_err());
    }

    #[test]
    fn wrapped_lines_stay_within_limit() {
        let data = vec![0xAB_u8; 1000];
        let wrapped = encode_base64_mime(&data);
        assert!(wrapped.lines().all(|l| l.len() <= MAX_ENCODED_LINE));
        assert!(wrapped.lines().count() > 1);
    }

    #[test]
    fn wrapped_output_decodes_back() {
        let data: Vec<u8> = (0..=255).collect();
        let wrapped = encode_base64_mime(&data);
        assert_eq!(decode_base64(&wrapped).unwrap(), data);
    }
}
