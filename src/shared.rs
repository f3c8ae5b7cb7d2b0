//! Thread-safe key grip.

use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::KeygripError;
use crate::keygrip::Keygrip;
use crate::types::{Algorithm, KeyIndex};

/// A [`Keygrip`] behind a reader/writer lock.
///
/// `sign`, `index`, `verify` and `keys` share the read lock. Key mutations
/// take the write lock, so readers always see the key list either fully
/// before or fully after a rotation.
pub struct SharedKeygrip {
    inner: RwLock<Keygrip>,
}

impl SharedKeygrip {
    pub fn new<I, S>(keys: I) -> Result<Self, KeygripError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Keygrip::new(keys).map(Self::from)
    }

    pub fn with_algorithm<I, S>(keys: I, algorithm: Algorithm) -> Result<Self, KeygripError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Keygrip::with_algorithm(keys, algorithm).map(Self::from)
    }

    fn read(&self) -> RwLockReadGuard<'_, Keygrip> {
        self.inner.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Keygrip> {
        self.inner.write()
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.read().algorithm()
    }

    pub fn sign(&self, data: impl AsRef<[u8]>) -> Result<String, KeygripError> {
        self.read().sign(data)
    }

    #[must_use]
    pub fn index(&self, data: impl AsRef<[u8]>, digest: impl AsRef<[u8]>) -> KeyIndex {
        self.read().index(data, digest)
    }

    #[must_use]
    pub fn verify(&self, data: impl AsRef<[u8]>, digest: impl AsRef<[u8]>) -> bool {
        self.read().verify(data, digest)
    }

    pub fn add_key(&self, key: &str) {
        self.write().add_key(key);
    }

    pub fn remove_key(&self, key: &str) {
        self.write().remove_key(key);
    }

    pub fn remove_all_keys(&self) {
        self.write().remove_all_keys();
    }

    pub fn set_keys<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write().set_keys(keys);
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.read().keys()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Owned copy of the current state, detached from the lock.
    #[must_use]
    pub fn snapshot(&self) -> Keygrip {
        self.read().clone()
    }

    pub fn into_inner(self) -> Keygrip {
        self.inner.into_inner()
    }
}

impl From<Keygrip> for SharedKeygrip {
    fn from(keygrip: Keygrip) -> Self {
        SharedKeygrip {
            inner: RwLock::new(keygrip),
        }
    }
}

impl fmt::Debug for SharedKeygrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("SharedKeygrip")
            .field("algorithm", &inner.algorithm())
            .field("key_count", &inner.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DATA: &[u8] = b"tree.xie";

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_is_send_sync() {
        assert_send_sync::<SharedKeygrip>();
    }

    #[test]
    fn test_shared_sign_verify() {
        let kg = SharedKeygrip::new(["a", "b"]).unwrap();
        let sig = kg.sign(DATA).unwrap();
        assert!(kg.verify(DATA, &sig));
        assert_eq!(kg.index(DATA, &sig), KeyIndex::Found(0));
    }

    #[test]
    fn test_shared_rotation() {
        let kg = SharedKeygrip::new(["a"]).unwrap();
        let sig = kg.sign(DATA).unwrap();
        kg.add_key("b");
        assert_eq!(kg.keys(), vec!["b", "a"]);
        assert_eq!(kg.index(DATA, &sig), KeyIndex::Found(1));
        kg.remove_key("a");
        assert!(!kg.verify(DATA, &sig));
        assert_eq!(kg.keys(), vec!["b"]);
    }

    #[test]
    fn test_shared_set_keys_keeps_algorithm() {
        let kg = SharedKeygrip::with_algorithm(["a"], Algorithm::Sha1).unwrap();
        kg.set_keys(["c", "d"]);
        assert_eq!(kg.algorithm(), Algorithm::Sha1);
        assert_eq!(kg.keys(), vec!["c", "d"]);
        kg.set_keys(Vec::<&str>::new());
        assert!(kg.is_empty());
        assert_eq!(kg.sign(DATA).unwrap_err(), KeygripError::NoActiveKey);
    }

    #[test]
    fn test_shared_remove_all_keys() {
        let kg = SharedKeygrip::new(["a", "b"]).unwrap();
        let sig = kg.sign(DATA).unwrap();
        kg.remove_all_keys();
        assert!(kg.keys().is_empty());
        assert!(!kg.verify(DATA, &sig));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let kg = SharedKeygrip::new(["a"]).unwrap();
        let mut snap = kg.snapshot();
        snap.add_key("b");
        assert_eq!(kg.keys(), vec!["a"]);
        assert_eq!(kg.into_inner().keys(), vec!["a"]);
    }

    #[test]
    fn test_shared_new_rejects_empty() {
        let err = SharedKeygrip::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, KeygripError::EmptyKeys);
    }
}
