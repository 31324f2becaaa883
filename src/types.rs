//! Wire-level value types shared across the store's callable surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The wire spelling of an access key's activation state.
///
/// Persisted internally as the `is_active` boolean on `AccessKey`; this type
/// exists only at the request/response boundary so the two spellings never
/// get conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKeyStatus {
    Active,
    Inactive,
}

impl AccessKeyStatus {
    pub fn from_is_active(is_active: bool) -> Self {
        if is_active {
            AccessKeyStatus::Active
        } else {
            AccessKeyStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, AccessKeyStatus::Active)
    }
}

/// Who created a given access key, recorded on the key itself (informational).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatorIdentity {
    RootAccount,
    User,
}

/// `CreateUser` response / `GetUser` response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: String,
    pub username: String,
    pub iam_path: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    /// Synthetic placeholder; real password-based login is out of scope.
    pub password_last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub members: Vec<UserView>,
    pub is_truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessKeyResponse {
    pub username: String,
    pub access_key: String,
    /// Plaintext secret, returned exactly once and never persisted.
    pub secret_key: String,
    pub status: AccessKeyStatus,
    pub create_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKeyView {
    pub username: String,
    pub access_key: String,
    pub status: AccessKeyStatus,
    pub create_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAccessKeysResponse {
    pub username: String,
    pub members: Vec<AccessKeyView>,
    pub is_truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKeyLastUsed {
    pub username: String,
    /// Synthetic placeholder; real usage tracking is unimplemented.
    pub region: Option<String>,
    pub service_name: Option<String>,
    pub last_used_date: Option<DateTime<Utc>>,
}
