//! RSA public keys used to verify WLS response signatures
//!
//! The WLS signs the raw response data with RSASSA-PKCS1-v1_5 over SHA-1.
//! Keys are published as PEM, either as a SubjectPublicKeyInfo
//! (`BEGIN PUBLIC KEY`) or as a bare PKCS#1 key (`BEGIN RSA PUBLIC KEY`).

use crate::error::{KeyError, KeyResult};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest, Sha1};

const PKCS1_LABEL: &str = "-----BEGIN RSA PUBLIC KEY-----";
const SPKI_LABEL: &str = "-----BEGIN PUBLIC KEY-----";

/// A public key able to verify WLS response signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &"RSA")
            .field("bits", &self.bits())
            .finish()
    }
}

impl PublicKey {
    /// Parse a PEM encoded RSA public key.
    ///
    /// Both SubjectPublicKeyInfo and PKCS#1 documents are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Pem`] if the document carries neither label, and
    /// [`KeyError::InvalidKey`] if the key inside does not decode.
    pub fn from_pem(pem: &str) -> KeyResult<Self> {
        let pem = pem.trim();
        let inner = if pem.contains(PKCS1_LABEL) {
            RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| KeyError::InvalidKey(format!("PKCS#1 key: {}", e)))?
        } else if pem.contains(SPKI_LABEL) {
            RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| KeyError::InvalidKey(format!("SubjectPublicKeyInfo key: {}", e)))?
        } else {
            return Err(KeyError::Pem(
                "expected a PUBLIC KEY or RSA PUBLIC KEY block".to_string(),
            ));
        };

        Ok(Self { inner })
    }

    /// Parse a DER encoded RSA public key (SubjectPublicKeyInfo or PKCS#1).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if neither encoding decodes.
    pub fn from_der(der: &[u8]) -> KeyResult<Self> {
        RsaPublicKey::from_public_key_der(der)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(der))
            .map(|inner| Self { inner })
            .map_err(|e| KeyError::InvalidKey(e.to_string()))
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.size() * 8
    }

    /// The underlying RSA key.
    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.inner
    }

    /// Check an RSASSA-PKCS1-v1_5 / SHA-1 signature over `data`.
    ///
    /// Returns `false` for any mismatch, including a signature of the wrong
    /// length; the reason is not reported.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let digest = Sha1::digest(data);
        self.inner
            .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature)
            .is_ok()
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(inner: RsaPublicKey) -> Self {
        Self { inner }
    }
}

impl std::str::FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pem(s)
    }
}
