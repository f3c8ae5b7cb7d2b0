//! Ordered key set for rotating HMAC secrets.
//!
//! The key at index 0 is the active key and signs everything new. Every
//! other key is kept only so signatures issued before a rotation still
//! verify until that key is retired.

use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::KeygripError;
use crate::mac;
use crate::types::{Algorithm, KeyIndex};

/// A key grip without internal locking.
///
/// Mutations take `&mut self`, so a single owner (or an outer lock) is what
/// serializes access. Use [`SharedKeygrip`](crate::SharedKeygrip) to share
/// one instance across threads.
#[derive(Clone)]
pub struct Keygrip {
    keys: Vec<Zeroizing<String>>,
    algorithm: Algorithm,
}

impl Keygrip {
    /// Create a key grip signing with HMAC-SHA256.
    ///
    /// `keys` is ordered active-first. Repeated keys are collapsed to their
    /// first occurrence. Returns [`KeygripError::EmptyKeys`] if `keys` is empty.
    pub fn new<I, S>(keys: I) -> Result<Self, KeygripError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_algorithm(keys, Algorithm::default())
    }

    /// Create a key grip with an explicit MAC algorithm.
    pub fn with_algorithm<I, S>(keys: I, algorithm: Algorithm) -> Result<Self, KeygripError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = collect_unique(keys);
        if keys.is_empty() {
            return Err(KeygripError::EmptyKeys);
        }
        Ok(Keygrip { keys, algorithm })
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign `data` with the active key.
    ///
    /// Returns [`KeygripError::NoActiveKey`] once every key has been removed.
    pub fn sign(&self, data: impl AsRef<[u8]>) -> Result<String, KeygripError> {
        let Some(active) = self.keys.first() else {
            warn!(algorithm = %self.algorithm, "sign called with an empty key list");
            return Err(KeygripError::NoActiveKey);
        };
        mac::sign(self.algorithm, active.as_bytes(), data.as_ref())
    }

    /// Find the position of the key that produced `digest` for `data`.
    ///
    /// Keys are tried in order, so the lowest matching position wins.
    #[must_use]
    pub fn index(&self, data: impl AsRef<[u8]>, digest: impl AsRef<[u8]>) -> KeyIndex {
        let Some(tag) = mac::decode_signature(digest.as_ref()) else {
            return KeyIndex::Malformed;
        };
        let data = data.as_ref();
        self.keys
            .iter()
            .position(|key| mac::verify_tag(self.algorithm, key.as_bytes(), data, &tag))
            .map_or(KeyIndex::NoMatch, KeyIndex::Found)
    }

    /// True if any retained key produced `digest` for `data`.
    #[must_use]
    pub fn verify(&self, data: impl AsRef<[u8]>, digest: impl AsRef<[u8]>) -> bool {
        self.index(data, digest).is_match()
    }

    /// Make `key` the active signing key, keeping the others for verification.
    ///
    /// No-op if `key` is empty or already present.
    pub fn add_key(&mut self, key: &str) {
        if key.is_empty() || self.contains(key) {
            return;
        }
        self.keys.insert(0, Zeroizing::new(key.to_owned()));
        debug!(key_count = self.keys.len(), "added active signing key");
    }

    /// Retire `key`. No-op if `key` is empty or absent.
    pub fn remove_key(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        let Some(pos) = self.keys.iter().position(|k| k.as_str() == key) else {
            return;
        };
        self.keys.remove(pos);
        debug!(position = pos, key_count = self.keys.len(), "removed signing key");
    }

    /// Drop every key. Signing fails and nothing verifies until keys are added again.
    pub fn remove_all_keys(&mut self) {
        self.keys.clear();
        debug!("removed all signing keys");
    }

    /// Replace the whole key list. Unlike [`Keygrip::new`], an empty list is accepted.
    pub fn set_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keys = collect_unique(keys);
        debug!(key_count = self.keys.len(), "replaced signing keys");
    }

    /// Copy of the current keys, active key first.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.as_str().to_owned()).collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k.as_str() == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for Keygrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keygrip")
            .field("algorithm", &self.algorithm)
            .field("key_count", &self.keys.len())
            .finish()
    }
}

fn collect_unique<I, S>(keys: I) -> Vec<Zeroizing<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<Zeroizing<String>> = Vec::new();
    for key in keys {
        let key = key.as_ref();
        if !out.iter().any(|k| k.as_str() == key) {
            out.push(Zeroizing::new(key.to_owned()));
        }
    }
    out
}
