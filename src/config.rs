//! Store configuration.
//!
//! A small, explicit config struct rather than a sprawling options object,
//! constructible directly or from the one environment variable proper to
//! the core.

use std::path::{Path, PathBuf};

/// Default bound on in-flight directory-scan reads.
pub const DEFAULT_LIST_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The configuration root under which `accounts/` and `access_keys/` live.
    pub root: PathBuf,
    /// Upper bound on concurrent reads during a directory scan.
    pub list_concurrency: usize,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            list_concurrency: DEFAULT_LIST_CONCURRENCY,
        }
    }

    pub fn with_list_concurrency(mut self, n: usize) -> Self {
        self.list_concurrency = n.max(1);
        self
    }

    /// Reads `IAM_STORE_ROOT`; the only environment variable proper to the core.
    pub fn from_env() -> Option<Self> {
        std::env::var_os("IAM_STORE_ROOT").map(|v| Self::new(PathBuf::from(v)))
    }

    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    pub fn access_keys_dir(&self) -> PathBuf {
        self.root.join("access_keys")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
