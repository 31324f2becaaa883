//! Offline index reconciler.
//!
//! Heals the two crash windows the lifecycle operations tolerate on read but
//! never repair themselves: an access key present in an account file with no
//! matching symlink, and a symlink whose target account file is missing or
//! no longer carries that key. Not invoked automatically by any lifecycle
//! operation — this is a maintenance entry point for operators.

use log::{info, warn};
use tokio::fs;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::fsio::map_io_error;
use crate::model::Account;
use crate::path::{access_key_path, TEMP_FILE_MARKER};
use crate::symlink;

#[derive(Debug, Default, Clone)]
pub struct ReconcileReport {
    pub symlinks_created: Vec<String>,
    pub symlinks_removed: Vec<String>,
}

/// Scans `accounts/*.json` and `access_keys/*.symlink`, recreating any
/// missing index entries and removing any dangling or stale ones.
pub async fn rebuild_indexes(config: &StoreConfig) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    let mut live_keys: std::collections::HashMap<String, String> = std::collections::HashMap::new();

    let mut entries = fs::read_dir(config.accounts_dir()).await.map_err(map_io_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(map_io_error)? {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.contains(TEMP_FILE_MARKER) || !file_name.ends_with(".json") {
            continue;
        }

        let bytes = fs::read(&path).await.map_err(map_io_error)?;
        let account: Account = match serde_json::from_slice(&bytes) {
            Ok(a) => a,
            Err(e) => {
                warn!("reconcile: skipping unparseable account file {file_name}: {e}");
                continue;
            }
        };

        for key in &account.access_keys {
            live_keys.insert(key.access_key.clone(), account.name.clone());
            let idx = access_key_path(config, &key.access_key);
            if !fs::try_exists(&idx).await.map_err(map_io_error)? {
                symlink::create_index(&idx, &account.name).await?;
                info!("reconcile: recreated missing symlink for {}", key.access_key);
                report.symlinks_created.push(key.access_key.clone());
            }
        }
    }

    let mut entries = fs::read_dir(config.access_keys_dir()).await.map_err(map_io_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(map_io_error)? {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(access_key) = file_name.strip_suffix(".symlink") else {
            continue;
        };

        let resolved = symlink::resolve_account_name(&path).await;
        let stale = match resolved {
            Err(_) => true,
            Ok(account_name) => live_keys.get(access_key) != Some(&account_name),
        };
        if stale {
            symlink::remove_index(&path, true).await?;
            warn!("reconcile: removed stale symlink for {access_key}");
            report.symlinks_removed.push(access_key.to_string());
        }
    }

    Ok(report)
}
