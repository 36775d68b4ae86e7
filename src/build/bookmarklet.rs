//! Bookmarklet encoding of a bundle.
//!
//! `javascript:(function(){<percent-encoded bundle>})()`
//!
//! The escaping matches JavaScript's `encodeURIComponent`, which is what
//! browsers undo when a `javascript:` URL is run from the address bar.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

const PREFIX: &str = "javascript:(function(){";
const SUFFIX: &str = "})()";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode(bundle: &[u8]) -> String {
    let encoded = percent_encode(bundle, URI_COMPONENT);
    let mut out = String::with_capacity(PREFIX.len() + bundle.len() + SUFFIX.len());
    out.push_str(PREFIX);
    out.extend(encoded);
    out.push_str(SUFFIX);
    out
}

/// Recover the bundle bytes from a bookmarklet produced by [`encode`].
pub fn decode(bookmarklet: &str) -> Option<Vec<u8>> {
    let inner = bookmarklet.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    Some(percent_encoding::percent_decode_str(inner).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_shape() {
        let bookmarklet = encode(b"alert(1)");
        assert_eq!(bookmarklet, "javascript:(function(){alert(1)})()");
    }

    #[test]
    fn test_escapes_like_encode_uri_component() {
        let bookmarklet = encode(b"a b;c/d?e=\"f\"");
        assert_eq!(
            bookmarklet,
            "javascript:(function(){a%20b%3Bc%2Fd%3Fe%3D%22f%22})()"
        );
        // unreserved marks stay literal
        assert_eq!(encode(b"-_.!~*'()"), "javascript:(function(){-_.!~*'()})()");
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let bundle = "(()=>{var e=\"%41 π → ✓\";console.log(`${e}\n`)})();\r\n\t"
            .as_bytes()
            .to_vec();
        let bookmarklet = encode(&bundle);
        assert!(bookmarklet.is_ascii());
        assert_eq!(decode(&bookmarklet), Some(bundle));
    }

    #[test]
    fn test_decode_rejects_foreign_input() {
        assert!(decode("javascript:alert(1)").is_none());
    }
}
