use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeygripError {
    #[error("keys can not be empty")]
    EmptyKeys,

    #[error("no active signing key: key list is empty")]
    NoActiveKey,

    #[error("unknown algorithm: {0} (use 'sha256' or 'sha1')")]
    UnknownAlgorithm(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
