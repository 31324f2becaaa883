//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::access_key::AccessKey;

/// Filesystem/fs-backend specific settings, mutually exclusive between the
/// POSIX-uid/gid form and the distinguished-name form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NsfsAccountConfig {
    Posix {
        uid: u32,
        gid: u32,
        new_buckets_path: String,
        fs_backend: Option<String>,
    },
    DistinguishedName {
        distinguished_name: String,
        new_buckets_path: String,
        fs_backend: Option<String>,
    },
}

/// The normalized ownership classification derived from `Account::owner`.
///
/// The on-disk encoding is legacy (`owner` absent, or equal to `id`, both
/// mean "root account"); this is the tagged view the rest of the crate
/// should reason about instead of re-deriving the comparison everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOwner<'a> {
    RootAccount,
    IamUser { owner_id: &'a str },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub creator: String,
    #[serde(default = "default_iam_path")]
    pub iam_path: String,
    pub master_key_id: String,
    pub allow_bucket_creation: bool,
    pub force_md5_etag: bool,
    #[serde(default)]
    pub access_keys: Vec<AccessKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfs_account_config: Option<NsfsAccountConfig>,
}

fn default_iam_path() -> String {
    "/".to_string()
}

impl Account {
    /// Normalizes the legacy `owner` encoding into a tagged view.
    pub fn owner_kind(&self) -> AccountOwner<'_> {
        match &self.owner {
            None => AccountOwner::RootAccount,
            Some(owner_id) if owner_id == &self.id => AccountOwner::RootAccount,
            Some(owner_id) => AccountOwner::IamUser { owner_id },
        }
    }

    pub fn is_root_account(&self) -> bool {
        matches!(self.owner_kind(), AccountOwner::RootAccount)
    }

    /// The id of the root account this account belongs to: itself, if it is
    /// a root account, or its `owner` otherwise.
    pub fn root_id(&self) -> &str {
        match self.owner_kind() {
            AccountOwner::RootAccount => &self.id,
            AccountOwner::IamUser { owner_id } => owner_id,
        }
    }

    pub fn find_access_key(&self, access_key: &str) -> Option<&AccessKey> {
        self.access_keys.iter().find(|k| k.access_key == access_key)
    }

    pub fn find_access_key_mut(&mut self, access_key: &str) -> Option<&mut AccessKey> {
        self.access_keys
            .iter_mut()
            .find(|k| k.access_key == access_key)
    }

    /// The first vacant access-key slot index: 0 if the list is empty or
    /// slot 0 is vacant, else 1.
    pub fn first_vacant_slot(&self) -> Option<usize> {
        if self.access_keys.len() >= 2 {
            None
        } else if self.access_keys.is_empty() {
            Some(0)
        } else {
            Some(1)
        }
    }
}
