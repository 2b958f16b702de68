//! # WebAuth Keys
//!
//! Public key material for verifying WebAuth responses.
//!
//! ## Overview
//!
//! The webauth-keys crate handles:
//! - **Public keys**: RSA keys parsed from PEM or DER, verifying
//!   RSASSA-PKCS1-v1_5 / SHA-1 signatures
//! - **Key stores**: the `lookup(alias)` capability the validator consumes
//! - **Snapshots**: immutable alias → key sets, swapped atomically through
//!   a [`KeyRing`] when keys are rotated
//! - **Loading**: building a snapshot from a directory of PEM files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webauth_keys::{KeyRing, KeySnapshot, KeyStore};
//!
//! let ring = KeyRing::new(KeySnapshot::load_dir("/etc/webauth/keys").unwrap());
//!
//! // Each validation works against one consistent snapshot
//! let keys = ring.snapshot();
//! let key = keys.lookup("webauth-pubkey2");
//!
//! // Key rotation publishes a whole new snapshot
//! ring.replace(KeySnapshot::load_dir("/etc/webauth/keys").unwrap());
//! ```

pub mod error;
pub mod loader;
pub mod public_key;
pub mod store;

// Re-export main types
pub use error::{KeyError, KeyResult};
pub use loader::load_file;
pub use public_key::PublicKey;
pub use store::{KeyRing, KeySnapshot, KeyStore};
