//! Schema validation run before every write.
//!
//! `NsfsAccountConfig`'s mutually-exclusive shapes are enforced by the Rust
//! type itself (an `untagged` enum can't represent "neither", which is
//! stronger than a runtime check) — this module validates the remaining
//! structural invariants a typed `Account` can still violate: the filename
//! invariant (I1), the two-key cap (I4), and non-empty required strings
//! inside whichever `NsfsAccountConfig` variant is present.

use crate::error::{IamError, Result};
use crate::model::{Account, NsfsAccountConfig};

pub fn validate_account(account: &Account, expected_filename: &str) -> Result<()> {
    if account.name != expected_filename {
        return Err(IamError::ValidationError {
            message: format!(
                "account name '{}' does not match filename '{}'",
                account.name, expected_filename
            ),
        });
    }

    if account.name.is_empty() {
        return Err(IamError::ValidationError {
            message: "account name cannot be empty".to_string(),
        });
    }

    if account.access_keys.len() > 2 {
        return Err(IamError::ValidationError {
            message: format!(
                "account '{}' carries {} access keys, more than the maximum of 2",
                account.name,
                account.access_keys.len()
            ),
        });
    }

    for key in &account.access_keys {
        if key.access_key.len() != 20 {
            return Err(IamError::ValidationError {
                message: format!(
                    "access key id '{}' is not 20 characters",
                    key.access_key
                ),
            });
        }
    }

    if !account.iam_path.starts_with('/') {
        return Err(IamError::ValidationError {
            message: format!("iam_path '{}' must start with '/'", account.iam_path),
        });
    }

    if let Some(config) = &account.nsfs_account_config {
        validate_nsfs_config(config)?;
    }

    Ok(())
}

fn validate_nsfs_config(config: &NsfsAccountConfig) -> Result<()> {
    match config {
        NsfsAccountConfig::Posix {
            new_buckets_path, ..
        } => {
            if new_buckets_path.is_empty() {
                return Err(IamError::ValidationError {
                    message: "nsfs_account_config.new_buckets_path cannot be empty".to_string(),
                });
            }
        }
        NsfsAccountConfig::DistinguishedName {
            distinguished_name,
            new_buckets_path,
            ..
        } => {
            if distinguished_name.is_empty() {
                return Err(IamError::ValidationError {
                    message: "nsfs_account_config.distinguished_name cannot be empty".to_string(),
                });
            }
            if new_buckets_path.is_empty() {
                return Err(IamError::ValidationError {
                    message: "nsfs_account_config.new_buckets_path cannot be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}
