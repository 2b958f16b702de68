//! Key lookup capability and immutable key snapshots
//!
//! Validation only ever needs `lookup(alias)`. Anything that can answer that
//! question implements [`KeyStore`]: a plain `HashMap`, a [`KeySnapshot`],
//! or an `Arc` to either.
//!
//! ## Refreshing keys
//!
//! Snapshots are never changed once published. A [`KeyRing`] holds the
//! current snapshot behind an `Arc`; readers take a clone of that `Arc` and
//! validate against it while a writer installs a complete replacement with
//! [`KeyRing::replace`].

use crate::public_key::PublicKey;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Lookup from a key alias to a public key.
pub trait KeyStore {
    /// Find the key registered under `alias`.
    fn lookup(&self, alias: &str) -> Option<&PublicKey>;
}

impl<K: KeyStore + ?Sized> KeyStore for &K {
    fn lookup(&self, alias: &str) -> Option<&PublicKey> {
        (**self).lookup(alias)
    }
}

impl<K: KeyStore + ?Sized> KeyStore for Arc<K> {
    fn lookup(&self, alias: &str) -> Option<&PublicKey> {
        (**self).lookup(alias)
    }
}

impl KeyStore for HashMap<String, PublicKey> {
    fn lookup(&self, alias: &str) -> Option<&PublicKey> {
        self.get(alias)
    }
}

/// An immutable set of aliased public keys.
///
/// Built up by value, then shared read-only (usually through a [`KeyRing`]).
///
/// # Example
///
/// ```rust,no_run
/// use webauth_keys::{KeySnapshot, KeyStore, PublicKey};
///
/// let pem = std::fs::read_to_string("webauth-pubkey2.pem").unwrap();
/// let snapshot = KeySnapshot::new().with_key("webauth-pubkey2", PublicKey::from_pem(&pem).unwrap());
/// assert!(snapshot.lookup("webauth-pubkey2").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeySnapshot {
    keys: HashMap<String, PublicKey>,
}

impl KeySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key under an alias.
    pub fn with_key(mut self, alias: impl Into<String>, key: PublicKey) -> Self {
        self.insert(alias, key);
        self
    }

    /// Add or replace a key while the snapshot is still being assembled.
    ///
    /// Returns the key previously stored under the alias.
    pub fn insert(&mut self, alias: impl Into<String>, key: PublicKey) -> Option<PublicKey> {
        self.keys.insert(alias.into(), key)
    }

    /// Check whether an alias is present.
    pub fn contains(&self, alias: &str) -> bool {
        self.keys.contains_key(alias)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the snapshot holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }
}

impl KeyStore for KeySnapshot {
    fn lookup(&self, alias: &str) -> Option<&PublicKey> {
        self.keys.get(alias)
    }
}

impl FromIterator<(String, PublicKey)> for KeySnapshot {
    fn from_iter<I: IntoIterator<Item = (String, PublicKey)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Holder of the current [`KeySnapshot`], replaced wholesale on refresh.
#[derive(Debug, Default)]
pub struct KeyRing {
    current: RwLock<Arc<KeySnapshot>>,
}

impl KeyRing {
    /// Create a ring publishing `snapshot`.
    pub fn new(snapshot: KeySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot currently published.
    ///
    /// The returned `Arc` stays valid after a later [`replace`](Self::replace).
    pub fn snapshot(&self) -> Arc<KeySnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish a new snapshot, returning the one it replaces.
    pub fn replace(&self, snapshot: KeySnapshot) -> Arc<KeySnapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(keys = snapshot.len(), "Replacing key snapshot");
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }
}
