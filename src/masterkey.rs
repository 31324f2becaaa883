//! Master-key manager interface.
//!
//! The real key manager is an external collaborator — out of scope for this
//! crate. This trait is the narrow seam the Access-Key Lifecycle calls into:
//! `init()` once, then `active_key_id()` and `encrypt`/`decrypt` on every
//! mutating operation, tolerating rotation of the active key between calls.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait MasterKeyManager: Send + Sync {
    /// Idempotent initialization, called before first use.
    async fn init(&self) -> Result<()>;

    /// The currently active master key id.
    async fn active_key_id(&self) -> Result<String>;

    /// Encrypts `plaintext` under `key_id`, returning an opaque ciphertext string.
    async fn encrypt(&self, plaintext: &[u8], key_id: &str) -> Result<String>;

    /// Decrypts `ciphertext`, which was produced under `key_id`.
    async fn decrypt(&self, ciphertext: &str, key_id: &str) -> Result<Vec<u8>>;
}
