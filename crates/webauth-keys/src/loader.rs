//! Building key snapshots from PEM files on disk
//!
//! A key directory holds one PEM file per key, named after the alias the
//! validator will ask for, e.g. `webauth-pubkey2.pem`.

use crate::error::{KeyError, KeyResult};
use crate::public_key::PublicKey;
use crate::store::KeySnapshot;
use std::path::Path;

const PEM_EXTENSIONS: &[&str] = &["pem", "pub"];

impl KeySnapshot {
    /// Load every `*.pem` / `*.pub` file in `dir`, keyed by file stem.
    ///
    /// Files with other extensions are ignored. A key file that does not
    /// parse fails the whole load, so a snapshot never silently lacks a key
    /// its directory promised.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Io`] if the directory or a file cannot be read,
    /// and the parse error of the first invalid key file otherwise.
    pub fn load_dir(dir: impl AsRef<Path>) -> KeyResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| KeyError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut snapshot = KeySnapshot::new();
        for entry in entries {
            let entry = entry.map_err(|source| KeyError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            let is_key_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| PEM_EXTENSIONS.contains(&ext))
                .unwrap_or(false);
            if !is_key_file || !path.is_file() {
                tracing::debug!(path = %path.display(), "Skipping non-key file");
                continue;
            }

            let alias = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| KeyError::InvalidAlias(path.clone()))?
                .to_string();

            let key = load_file(&path)?;
            tracing::info!(alias = %alias, bits = key.bits(), "Loaded WLS public key");
            if snapshot.insert(alias.clone(), key).is_some() {
                tracing::warn!(alias = %alias, "Duplicate key alias; later file wins");
            }
        }

        if snapshot.is_empty() {
            tracing::warn!(dir = %dir.display(), "No public keys found");
        }

        Ok(snapshot)
    }
}

/// Read and parse a single PEM key file.
///
/// # Errors
///
/// Returns [`KeyError::Io`] if the file cannot be read, or the parse error.
pub fn load_file(path: impl AsRef<Path>) -> KeyResult<PublicKey> {
    let path = path.as_ref();
    let pem = std::fs::read_to_string(path).map_err(|source| KeyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    PublicKey::from_pem(&pem)
}
