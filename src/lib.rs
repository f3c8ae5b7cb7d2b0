//! Keygrip: sign and verify data with a rotating set of HMAC secrets.
//!
//! The first key signs; every retained key verifies. Rotating a secret is
//! `add_key(new)` now and `remove_key(old)` once tokens signed under the old
//! secret have aged out.
//!
//! Signatures are HMAC-SHA256 (or HMAC-SHA1 for legacy tokens), encoded as
//! URL-safe base64 without padding.

pub mod error;
pub mod keygrip;
pub mod mac;
pub mod shared;
pub mod types;

pub use error::KeygripError;
pub use keygrip::Keygrip;
pub use shared::SharedKeygrip;
pub use types::{Algorithm, KeyIndex};
