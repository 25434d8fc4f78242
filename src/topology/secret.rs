//! Secret material referenced by outputs.
//!
//! Values are opaque bytes. Generation only checks which keys are present and
//! then either copies a value or writes a reference to it.

use super::component_id;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const CLIENT_CERT_KEY: &str = "tls.crt";
pub const CLIENT_PRIVATE_KEY: &str = "tls.key";
pub const TRUSTED_CA_BUNDLE_KEY: &str = "ca-bundle.crt";
pub const CLIENT_USERNAME: &str = "username";
pub const CLIENT_PASSWORD: &str = "password";
pub const CREDENTIALS_PATH: &str = "credentials_path";

/// Identifier a secret name takes inside `${SECRET_<ID>_<KEY>}` references.
///
/// Not injective ("es-secret" and "es.secret" share one id), so validation
/// rejects topologies where two referenced secrets collide.
pub fn env_id(name: &str) -> String {
    component_id(name).to_ascii_uppercase()
}

/// Secrets keyed by name.
pub type Secrets = BTreeMap<String, Secret>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Secret {
    data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl From<BTreeMap<String, String>> for Secret {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            data: map.into_iter().map(|(k, v)| (k, v.into_bytes())).collect(),
        }
    }
}
