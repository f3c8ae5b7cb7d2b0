//! Keyed MAC primitive and signature encoding.
//!
//! Signatures are the raw HMAC tag, encoded as URL-safe base64 without
//! padding so they can travel in cookies, headers, and query strings as-is.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::KeygripError;
use crate::types::Algorithm;

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;

/// Compute the raw HMAC tag of `data` under `key`.
pub fn compute_tag(algorithm: Algorithm, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeygripError> {
    match algorithm {
        Algorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(key)
                .map_err(|e| KeygripError::InvalidKey(format!("invalid HMAC key: {e}")))?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        Algorithm::Sha1 => {
            let mut mac = HmacSha1::new_from_slice(key)
                .map_err(|e| KeygripError::InvalidKey(format!("invalid HMAC key: {e}")))?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Check `tag` against the HMAC of `data` under `key` in constant time.
///
/// A tag of the wrong length is rejected without touching the key.
#[must_use]
pub fn verify_tag(algorithm: Algorithm, key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    if tag.len() != algorithm.tag_len() {
        return false;
    }
    match algorithm {
        Algorithm::Sha256 => match HmacSha256::new_from_slice(key) {
            Ok(mut mac) => {
                mac.update(data);
                mac.verify_slice(tag).is_ok()
            }
            Err(_) => false,
        },
        Algorithm::Sha1 => match HmacSha1::new_from_slice(key) {
            Ok(mut mac) => {
                mac.update(data);
                mac.verify_slice(tag).is_ok()
            }
            Err(_) => false,
        },
    }
}

/// Encode a raw tag as URL-safe base64 without padding.
#[must_use]
pub fn encode_signature(tag: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(tag)
}

/// Decode a URL-safe, unpadded base64 signature back to its raw tag.
///
/// Returns `None` for anything that is not strictly in that encoding,
/// including padded or standard-alphabet input.
#[must_use]
pub fn decode_signature(digest: &[u8]) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(digest).ok()
}

/// Sign `data` under `key` and return the encoded signature.
pub fn sign(algorithm: Algorithm, key: &[u8], data: &[u8]) -> Result<String, KeygripError> {
    let tag = compute_tag(algorithm, key, data)?;
    Ok(encode_signature(&tag))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lengths() {
        let t256 = compute_tag(Algorithm::Sha256, b"a", b"tree.xie").unwrap();
        let t1 = compute_tag(Algorithm::Sha1, b"a", b"tree.xie").unwrap();
        assert_eq!(t256.len(), Algorithm::Sha256.tag_len());
        assert_eq!(t1.len(), Algorithm::Sha1.tag_len());
    }

    #[test]
    fn test_sign_known_answer() {
        assert_eq!(
            sign(Algorithm::Sha256, b"a", b"tree.xie").unwrap(),
            "vQnDy-htZ2aBjvDGHp7gqfLuPzIEvi3EAUz9Rd-y6fc"
        );
        assert_eq!(
            sign(Algorithm::Sha1, b"a", b"tree.xie").unwrap(),
            "Sh85NXa97FLHFgCLzfQhI_qmV_Q"
        );
    }

    #[test]
    fn test_verify_tag() {
        let tag = compute_tag(Algorithm::Sha256, b"key", b"data").unwrap();
        assert!(verify_tag(Algorithm::Sha256, b"key", b"data", &tag));
        assert!(!verify_tag(Algorithm::Sha256, b"other", b"data", &tag));
        assert!(!verify_tag(Algorithm::Sha256, b"key", b"datb", &tag));
        assert!(!verify_tag(Algorithm::Sha1, b"key", b"data", &tag));
    }

    #[test]
    fn test_verify_tag_truncated() {
        let tag = compute_tag(Algorithm::Sha256, b"key", b"data").unwrap();
        assert!(!verify_tag(Algorithm::Sha256, b"key", b"data", &tag[..16]));
        assert!(!verify_tag(Algorithm::Sha256, b"key", b"data", &[]));
    }

    #[test]
    fn test_decode_signature_strict() {
        let sig = sign(Algorithm::Sha256, b"a", b"tree.xie").unwrap();
        assert!(decode_signature(sig.as_bytes()).is_some());

        // Padding is not accepted.
        assert!(decode_signature(b"YQ==").is_none());
        // Standard alphabet is not accepted.
        assert!(decode_signature(b"a+b/").is_none());
        assert!(decode_signature(b"not base64!").is_none());
        // Non-zero trailing bits are not canonical.
        assert!(decode_signature(b"YR").is_none());
        assert_eq!(decode_signature(b"YQ").unwrap(), b"a");
    }

    #[test]
    fn test_empty_key_is_valid_hmac_key() {
        let sig = sign(Algorithm::Sha256, b"", b"data").unwrap();
        let tag = decode_signature(sig.as_bytes()).unwrap();
        assert!(verify_tag(Algorithm::Sha256, b"", b"data", &tag));
    }
}
