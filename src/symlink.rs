//! Symlink Index Engine.
//!
//! Maintains the `access_keys/<key>.symlink -> ../accounts/<name>.json`
//! index. Create and delete are atomic filesystem operations in their own
//! right (`symlink(2)`/`unlink(2)`); this engine never follows a symlink to
//! reach the account file for a write — writes always address
//! `accounts/<name>.json` directly through the Path Resolver.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs;

use crate::error::{IamError, Result};
use crate::fsio::map_io_error;
use crate::path::relative_account_target;

/// Creates `index_path -> relative_account_target(account_name)`.
pub async fn create_index(index_path: &Path, account_name: &str) -> Result<()> {
    let target = relative_account_target(account_name);
    debug!(
        "symlink: create {} -> {}",
        index_path.display(),
        target.display()
    );
    fs::symlink(&target, index_path).await.map_err(map_io_error)
}

/// Unlinks `index_path`. A missing symlink is tolerated when requested.
pub async fn remove_index(index_path: &Path, tolerate_missing: bool) -> Result<()> {
    debug!("symlink: remove {}", index_path.display());
    match fs::remove_file(index_path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound && tolerate_missing => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IamError::NoSuchEntity {
            entity: format!("access_key_index:{}", index_path.display()),
        }),
        Err(e) => Err(map_io_error(e)),
    }
}

/// Reads the account name a `access_key` symlink resolves to.
///
/// A dangling symlink (the index entry exists but its target file does not)
/// is treated as equivalent to `NotFound` on read; the Authorization Gate
/// turns that into `AccessDeniedException` for the access-key-identifier
/// form of an unknown key.
pub async fn resolve_account_name(index_path: &Path) -> Result<String> {
    let target = match fs::read_link(index_path).await {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(IamError::NoSuchEntity {
                entity: format!("access_key_index:{}", index_path.display()),
            })
        }
        Err(e) => return Err(map_io_error(e)),
    };

    let parent = index_path.parent().unwrap_or_else(|| Path::new("."));
    let resolved_target = parent.join(&target);
    if !fs::try_exists(&resolved_target).await.map_err(map_io_error)? {
        warn!(
            "symlink: dangling index {} -> {}",
            index_path.display(),
            target.display()
        );
        return Err(IamError::NoSuchEntity {
            entity: format!("access_key_index:{}", index_path.display()),
        });
    }

    account_name_from_target(&target).ok_or_else(|| {
        IamError::ServiceFailure(format!(
            "malformed access-key index target: {}",
            target.display()
        ))
    })
}

fn account_name_from_target(target: &Path) -> Option<String> {
    target.file_stem()?.to_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::fsio;
    use crate::path::{access_key_path, account_path};
    use tempfile::tempdir;

    async fn setup() -> (tempfile::TempDir, StoreConfig) {
        let dir = tempdir().unwrap();
        let cfg = StoreConfig::new(dir.path());
        fsio::ensure_dir(&cfg.accounts_dir()).await.unwrap();
        fsio::ensure_dir(&cfg.access_keys_dir()).await.unwrap();
        (dir, cfg)
    }

    #[tokio::test]
    async fn create_then_resolve_round_trips() {
        let (_dir, cfg) = setup().await;
        let acct_path = account_path(&cfg, "alice");
        fsio::create(&cfg.accounts_dir(), &acct_path, b"{}", "account:alice")
            .await
            .unwrap();

        let idx = access_key_path(&cfg, "AKIAEXAMPLE0000000AA");
        create_index(&idx, "alice").await.unwrap();

        let resolved = resolve_account_name(&idx).await.unwrap();
        assert_eq!(resolved, "alice");
    }

    #[tokio::test]
    async fn dangling_symlink_resolves_as_not_found() {
        let (_dir, cfg) = setup().await;
        let idx = access_key_path(&cfg, "AKIAEXAMPLE0000000AA");
        create_index(&idx, "ghost").await.unwrap();

        let err = resolve_account_name(&idx).await.unwrap_err();
        assert_eq!(err.aws_code(), "NoSuchEntity");
    }

    #[tokio::test]
    async fn remove_then_resolve_fails() {
        let (_dir, cfg) = setup().await;
        let acct_path = account_path(&cfg, "alice");
        fsio::create(&cfg.accounts_dir(), &acct_path, b"{}", "account:alice")
            .await
            .unwrap();
        let idx = access_key_path(&cfg, "AKIAEXAMPLE0000000AA");
        create_index(&idx, "alice").await.unwrap();

        remove_index(&idx, false).await.unwrap();
        let err = resolve_account_name(&idx).await.unwrap_err();
        assert_eq!(err.aws_code(), "NoSuchEntity");
    }

    #[test]
    fn account_name_from_target_strips_dirs_and_extension() {
        assert_eq!(
            account_name_from_target(&PathBuf::from("../accounts/bob.json")),
            Some("bob".to_string())
        );
    }
}
