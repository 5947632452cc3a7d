//! License key checks for the module endpoints.
//!
//! Keys are kept only as SHA-256 digests. With no keys configured every
//! request is rejected.

use std::{collections::HashSet, sync::Arc};

use sha2::{Digest, Sha256};
use thiserror::Error;

pub const LICENSE_HEADER: &str = "x-license-key";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LicenseError {
    #[error("License key is required")]
    Missing,
    #[error("License key is not valid")]
    Invalid,
}

#[derive(Debug, Clone, Default)]
pub struct LicenseService {
    digests: Arc<HashSet<String>>,
}

impl LicenseService {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digests = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| Self::hash_key(&k))
            .collect();
        Self {
            digests: Arc::new(digests),
        }
    }

    pub fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn validate(&self, key: Option<&str>) -> Result<(), LicenseError> {
        let key = key.map(str::trim).filter(|k| !k.is_empty());
        let Some(key) = key else {
            return Err(LicenseError::Missing);
        };
        if self.digests.contains(&Self::hash_key(key)) {
            Ok(())
        } else {
            Err(LicenseError::Invalid)
        }
    }

    pub fn key_count(&self) -> usize {
        self.digests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_configured_keys() {
        let licenses = LicenseService::new(["alpha-key", " beta-key "]);
        assert_eq!(licenses.key_count(), 2);
        assert_eq!(licenses.validate(Some("alpha-key")), Ok(()));
        assert_eq!(licenses.validate(Some("beta-key ")), Ok(()));
    }

    #[test]
    fn test_rejects_missing_and_unknown_keys() {
        let licenses = LicenseService::new(["alpha-key"]);
        assert_eq!(licenses.validate(None), Err(LicenseError::Missing));
        assert_eq!(licenses.validate(Some("  ")), Err(LicenseError::Missing));
        assert_eq!(licenses.validate(Some("gamma")), Err(LicenseError::Invalid));
    }

    #[test]
    fn test_no_keys_rejects_everything() {
        let licenses = LicenseService::new(Vec::<String>::new());
        assert_eq!(licenses.validate(Some("anything")), Err(LicenseError::Invalid));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        assert_eq!(
            LicenseService::hash_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
