//! In-memory test doubles for the two external collaborators the store
//! consumes (`MasterKeyManager`, `CacheInvalidator`), shipped alongside the
//! trait definitions rather than hidden behind `#[cfg(test)]`, since
//! integration tests need to construct them too.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::cache::CacheInvalidator;
use crate::error::Result;
use crate::masterkey::MasterKeyManager;

/// A master-key manager backed by an in-memory keystream, for tests only.
/// Encryption is a keystream XOR (key derived from `sha256(key_id)`), which
/// is sufficient to exercise rotation and re-encryption without pulling in
/// an authenticated-encryption dependency this crate's production code path
/// never touches directly.
pub struct InMemoryMasterKeyManager {
    active_key_id: Mutex<String>,
}

impl InMemoryMasterKeyManager {
    pub fn new(initial_key_id: impl Into<String>) -> Self {
        Self {
            active_key_id: Mutex::new(initial_key_id.into()),
        }
    }

    /// Simulates master-key rotation between calls.
    pub fn rotate(&self, new_key_id: impl Into<String>) {
        *self.active_key_id.lock().unwrap() = new_key_id.into();
    }

    fn keystream(key_id: &str, len: usize) -> Vec<u8> {
        let mut stream = Vec::with_capacity(len);
        let mut counter: u64 = 0;
        while stream.len() < len {
            let mut hasher = Sha256::new();
            hasher.update(key_id.as_bytes());
            hasher.update(counter.to_le_bytes());
            stream.extend_from_slice(&hasher.finalize());
            counter += 1;
        }
        stream.truncate(len);
        stream
    }
}

#[async_trait]
impl MasterKeyManager for InMemoryMasterKeyManager {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn active_key_id(&self) -> Result<String> {
        Ok(self.active_key_id.lock().unwrap().clone())
    }

    async fn encrypt(&self, plaintext: &[u8], key_id: &str) -> Result<String> {
        let stream = Self::keystream(key_id, plaintext.len());
        let cipher: Vec<u8> = plaintext
            .iter()
            .zip(stream.iter())
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(BASE64.encode(cipher))
    }

    async fn decrypt(&self, ciphertext: &str, key_id: &str) -> Result<Vec<u8>> {
        let cipher = BASE64.decode(ciphertext).map_err(|e| {
            crate::error::IamError::ServiceFailure(format!("bad ciphertext encoding: {e}"))
        })?;
        let stream = Self::keystream(key_id, cipher.len());
        Ok(cipher
            .iter()
            .zip(stream.iter())
            .map(|(a, b)| a ^ b)
            .collect())
    }
}

/// Records every invalidated access key, for assertions in tests.
#[derive(Default)]
pub struct RecordingCacheInvalidator {
    invalidated: Mutex<HashMap<String, usize>>,
}

impl RecordingCacheInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, access_key: &str) -> usize {
        *self.invalidated.lock().unwrap().get(access_key).unwrap_or(&0)
    }

    pub fn total_invalidations(&self) -> usize {
        self.invalidated.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCacheInvalidator {
    async fn invalidate(&self, access_key: &str) -> Result<()> {
        *self
            .invalidated
            .lock()
            .unwrap()
            .entry(access_key.to_string())
            .or_insert(0) += 1;
        Ok(())
    }
}
