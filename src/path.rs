//! Path Resolver.
//!
//! Pure functions mapping entity identifiers to on-disk paths under a
//! configuration root. Names and access-key identifiers are used verbatim —
//! the store trusts the upstream request parser to have rejected path
//! separators before they reach here.

use std::path::PathBuf;

use crate::config::StoreConfig;

pub fn account_path(config: &StoreConfig, name: &str) -> PathBuf {
    config.accounts_dir().join(format!("{name}.json"))
}

pub fn access_key_path(config: &StoreConfig, access_key: &str) -> PathBuf {
    config.access_keys_dir().join(format!("{access_key}.symlink"))
}

/// The relative symlink target used when indexing an access key, so the
/// index survives relocation of the configuration root.
pub fn relative_account_target(name: &str) -> PathBuf {
    PathBuf::from("..").join("accounts").join(format!("{name}.json"))
}

/// Marker substring embedded in every temp-file name created by the Config
/// File Engine, used by directory scans to skip in-flight writes.
pub const TEMP_FILE_MARKER: &str = ".tmp-";
