use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::KeygripError;

/// MAC algorithm used to sign and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// HMAC-SHA256. Use this for anything new.
    #[default]
    Sha256,
    /// HMAC-SHA1, for tokens issued by older keygrip deployments.
    Sha1,
}

impl Algorithm {
    /// Returns the raw tag length in bytes for this algorithm.
    #[must_use]
    pub fn tag_len(self) -> usize {
        match self {
            Algorithm::Sha256 => HMAC_SHA256_TAG_LEN,
            Algorithm::Sha1 => HMAC_SHA1_TAG_LEN,
        }
    }

    /// Returns the length of an encoded signature for this algorithm.
    #[must_use]
    pub fn encoded_len(self) -> usize {
        // Unpadded base64: 4 chars per 3 bytes, rounded up.
        (self.tag_len() * 4).div_ceil(3)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha1 => "sha1",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = KeygripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "hmac-sha256" => Ok(Algorithm::Sha256),
            "sha1" | "hmac-sha1" => Ok(Algorithm::Sha1),
            _ => Err(KeygripError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Outcome of looking up which retained key produced a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIndex {
    /// The signature was produced by the key at this position.
    Found(usize),
    /// Well-formed signature that no retained key produced.
    NoMatch,
    /// The signature is not valid unpadded URL-safe base64.
    Malformed,
}

impl KeyIndex {
    /// Sentinel reported for [`KeyIndex::NoMatch`].
    pub const NO_MATCH: i64 = -1;
    /// Sentinel reported for [`KeyIndex::Malformed`].
    pub const MALFORMED: i64 = -2;

    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, KeyIndex::Found(_))
    }

    #[must_use]
    pub fn position(self) -> Option<usize> {
        match self {
            KeyIndex::Found(i) => Some(i),
            KeyIndex::NoMatch | KeyIndex::Malformed => None,
        }
    }

    /// Integer form: the key position, `-1` for no match, `-2` for malformed input.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            KeyIndex::Found(i) => i64::try_from(i).unwrap_or(i64::MAX),
            KeyIndex::NoMatch => Self::NO_MATCH,
            KeyIndex::Malformed => Self::MALFORMED,
        }
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Constant: HMAC-SHA256 tag length.
pub const HMAC_SHA256_TAG_LEN: usize = 32;

/// Constant: HMAC-SHA1 tag length.
pub const HMAC_SHA1_TAG_LEN: usize = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len() {
        assert_eq!(Algorithm::Sha256.encoded_len(), 43);
        assert_eq!(Algorithm::Sha1.encoded_len(), 27);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("sha256".parse::<Algorithm>(), Ok(Algorithm::Sha256));
        assert_eq!("HMAC-SHA1".parse::<Algorithm>(), Ok(Algorithm::Sha1));
        assert_eq!(
            "md5".parse::<Algorithm>(),
            Err(KeygripError::UnknownAlgorithm("md5".into()))
        );
    }

    #[test]
    fn test_key_index_sentinels() {
        assert_eq!(KeyIndex::Found(0).as_i64(), 0);
        assert_eq!(KeyIndex::Found(3).as_i64(), 3);
        assert_eq!(KeyIndex::NoMatch.as_i64(), -1);
        assert_eq!(KeyIndex::Malformed.as_i64(), -2);
        assert!(KeyIndex::Found(1).is_match());
        assert!(!KeyIndex::NoMatch.is_match());
        assert!(!KeyIndex::Malformed.is_match());
        assert_eq!(KeyIndex::Malformed.to_string(), "-2");
    }
}
