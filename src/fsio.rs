//! Config File Engine: atomic create/read/update/delete of
//! small JSON files via write-to-temp → fsync → rename, with file mode
//! `0600` and directory mode `0700`.
//!
//! Grounded in the same `write(temp) -> rename(temp, target)` shape the
//! retrieval pack uses for on-disk atomic writes (e.g. the solver crate's
//! `storage/implementations/file.rs`), adapted to fsync before rename and to
//! the stricter POSIX permissions an identity store needs.

use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use log::debug;
use tokio::fs;

use crate::error::{IamError, Result};
use crate::path::TEMP_FILE_MARKER;

const FILE_MODE: u32 = 0o600;
const DIR_MODE: u32 = 0o700;

/// Creates `dir` (and its ancestors) with mode `0700` if missing.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await.map_err(map_io_error)?;
    fs::set_permissions(dir, std::fs::Permissions::from_mode(DIR_MODE))
        .await
        .map_err(map_io_error)?;
    Ok(())
}

/// Writes `bytes` to a sibling temp file under `dir` and renames it onto
/// `path`, fsyncing before the rename so a crash never exposes a partial
/// file.
async fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_name = format!("{}{}", TEMP_FILE_MARKER, uuid::Uuid::new_v4());
    let temp_path = dir.join(temp_name);

    let mut file = fs::File::create(&temp_path).await.map_err(map_io_error)?;
    use tokio::io::AsyncWriteExt;
    file.write_all(bytes).await.map_err(map_io_error)?;
    file.sync_all().await.map_err(map_io_error)?;
    drop(file);

    fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(FILE_MODE))
        .await
        .map_err(map_io_error)?;

    match fs::rename(&temp_path, path).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(map_io_error(e))
        }
    }
}

/// Fails with `EntityAlreadyExists` if `path` exists; otherwise atomically
/// writes `bytes`.
pub async fn create(dir: &Path, path: &Path, bytes: &[u8], entity: &str) -> Result<()> {
    if fs::try_exists(path).await.map_err(map_io_error)? {
        return Err(IamError::EntityAlreadyExists {
            entity: entity.to_string(),
        });
    }
    debug!("fsio: create {}", path.display());
    write_atomic(dir, path, bytes).await
}

/// Returns the contents of `path`. Fails with `NoSuchEntity` if missing.
pub async fn read(path: &Path, entity: &str) -> Result<Vec<u8>> {
    debug!("fsio: read {}", path.display());
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IamError::NoSuchEntity {
            entity: entity.to_string(),
        }),
        Err(e) => Err(map_io_error(e)),
    }
}

/// Atomically overwrites the existing file at `path`. Callers validate the
/// schema before calling this.
pub async fn update(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    debug!("fsio: update {}", path.display());
    write_atomic(dir, path, bytes).await
}

/// Unlinks `path`. When `tolerate_missing` is false (the default for every
/// caller in this crate), a missing file propagates as `NoSuchEntity`.
pub async fn delete(path: &Path, entity: &str, tolerate_missing: bool) -> Result<()> {
    debug!("fsio: delete {}", path.display());
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound && tolerate_missing => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IamError::NoSuchEntity {
            entity: entity.to_string(),
        }),
        Err(e) => Err(map_io_error(e)),
    }
}

/// POSIX errno fallback mapping: classifies unmapped I/O errors.
/// Every error-taxonomy decision point above constructs a more specific kind
/// first; this only ever fires for genuine filesystem failures (disk full,
/// permission denied on the directory itself, etc).
pub fn map_io_error(err: io::Error) -> IamError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => IamError::AccessDenied {
            message: err.to_string(),
        },
        _ => IamError::ServiceFailure(err.to_string()),
    }
}
