//! The identity store: construction and shared plumbing for the Account
//! Lifecycle (`users`) and Access-Key Lifecycle (`access_keys`) operations.

pub mod access_keys;
pub mod users;

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::cache::CacheInvalidator;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::fsio;
use crate::masterkey::MasterKeyManager;

/// The filesystem-backed Account & Access-Key Identity Store.
///
/// Carries no in-process locks; concurrent callers race on the underlying
/// `rename`, and the store relies entirely on the atomicity of the
/// filesystem primitives in `fsio`/`symlink`.
pub struct FsIdentityStore {
    config: StoreConfig,
    master_key_manager: Arc<dyn MasterKeyManager>,
    cache: Arc<dyn CacheInvalidator>,
    list_semaphore: Arc<Semaphore>,
}

impl FsIdentityStore {
    /// Opens the store, creating `accounts/` and `access_keys/` (mode
    /// `0700`) under `config.root` if they do not already exist, and calling
    /// `master_key_manager.init()`.
    pub async fn open(
        config: StoreConfig,
        master_key_manager: Arc<dyn MasterKeyManager>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Result<Self> {
        fsio::ensure_dir(&config.accounts_dir()).await?;
        fsio::ensure_dir(&config.access_keys_dir()).await?;
        master_key_manager.init().await?;

        let list_semaphore = Arc::new(Semaphore::new(config.list_concurrency));
        Ok(Self {
            config,
            master_key_manager,
            cache,
            list_semaphore,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
