//! AccessKey domain model, embedded inside `Account::access_keys`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CreatorIdentity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKey {
    pub access_key: String,
    pub encrypted_secret_key: String,
    pub creation_date: DateTime<Utc>,
    /// Persisted internally as a boolean; wire form is `AccessKeyStatus`.
    pub is_active: bool,
    pub creator_identity: CreatorIdentity,
    pub master_key_id: String,
}
