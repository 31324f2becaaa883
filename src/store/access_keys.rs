//! Access-Key Lifecycle: `CreateAccessKey`, `UpdateAccessKey`,
//! `DeleteAccessKey`, `GetAccessKeyLastUsed`, `ListAccessKeys`.

use chrono::Utc;
use log::info;

use crate::auth;
use crate::credentials;
use crate::error::{IamError, Result};
use crate::fsio;
use crate::model::Account;
use crate::path::{access_key_path, account_path};
use crate::schema;
use crate::session::Session;
use crate::symlink;
use crate::types::{
    AccessKeyLastUsed, AccessKeyStatus, AccessKeyView, CreateAccessKeyResponse,
    CreatorIdentity, ListAccessKeysResponse,
};

use super::FsIdentityStore;

pub struct CreateAccessKeyRequest {
    pub username: Option<String>,
}

pub struct UpdateAccessKeyRequest {
    pub username: Option<String>,
    pub access_key: String,
    pub status: AccessKeyStatus,
}

pub struct DeleteAccessKeyRequest {
    pub username: Option<String>,
    pub access_key: String,
}

pub struct GetAccessKeyLastUsedRequest {
    pub access_key: String,
}

pub struct ListAccessKeysRequest {
    pub username: Option<String>,
}

impl FsIdentityStore {
    async fn read_account_by_name(&self, username: &str) -> Result<Account> {
        let path = account_path(&self.config, username);
        let bytes = fsio::read(&path, &format!("user:{username}")).await?;
        serde_json::from_slice(&bytes).map_err(IamError::from)
    }

    /// Resolves the account an access key belongs to through the symlink
    /// index. An unresolvable key (missing or dangling symlink) surfaces as
    /// `AccessDeniedException`, not `NoSuchEntity` — matching AWS behavior
    /// for an unrecognized access-key identifier.
    async fn read_account_by_access_key(&self, access_key: &str) -> Result<Account> {
        let idx = access_key_path(&self.config, access_key);
        let username = symlink::resolve_account_name(&idx).await.map_err(|_| {
            IamError::access_denied(format!("unknown access key id '{access_key}'"))
        })?;
        self.read_account_by_name(&username).await
    }

    async fn write_account(&self, account: &Account) -> Result<()> {
        schema::validate_account(account, &account.name)?;
        let bytes = serde_json::to_vec(account)?;
        let path = account_path(&self.config, &account.name);
        fsio::update(&self.config.accounts_dir(), &path, &bytes).await
    }

    async fn invalidate_all(&self, account: &Account) -> Result<()> {
        for key in &account.access_keys {
            self.cache.invalidate(&key.access_key).await?;
        }
        Ok(())
    }

    /// `CreateAccessKey`.
    pub async fn create_access_key(
        &self,
        session: &Session,
        request: CreateAccessKeyRequest,
    ) -> Result<CreateAccessKeyResponse> {
        let username = auth::effective_target_username(session, request.username.as_deref())?;
        let mut account = self.read_account_by_name(username).await?;
        auth::authorize_same_root_by_name(session, &account, "CreateAccessKey")?;

        if account.first_vacant_slot().is_none() {
            return Err(IamError::LimitExceeded {
                reason: format!("user '{}' already has 2 access keys", account.name),
            });
        }

        let access_key_id = credentials::generate_access_key_id();
        let secret_key = credentials::generate_secret_key();
        let active_key_id = self.master_key_manager.active_key_id().await?;
        let cipher = self
            .master_key_manager
            .encrypt(secret_key.as_bytes(), &active_key_id)
            .await?;

        let creator_identity = if session.is_root() {
            CreatorIdentity::RootAccount
        } else {
            CreatorIdentity::User
        };
        let now = Utc::now();

        account.access_keys.push(crate::model::AccessKey {
            access_key: access_key_id.clone(),
            encrypted_secret_key: cipher,
            creation_date: now,
            is_active: true,
            creator_identity,
            master_key_id: active_key_id.clone(),
        });
        account.master_key_id = active_key_id;

        self.write_account(&account).await?;
        let idx = access_key_path(&self.config, &access_key_id);
        symlink::create_index(&idx, &account.name).await?;
        self.invalidate_all(&account).await?;

        info!("create_access_key: {access_key_id} for {}", account.name);
        Ok(CreateAccessKeyResponse {
            username: account.name.clone(),
            access_key: access_key_id,
            secret_key,
            status: AccessKeyStatus::Active,
            create_date: now,
        })
    }

    /// `UpdateAccessKey`: status toggle, re-encrypting the
    /// secret under the currently active master key on every real change.
    pub async fn update_access_key(
        &self,
        session: &Session,
        request: UpdateAccessKeyRequest,
    ) -> Result<()> {
        let mut account = self.read_account_by_access_key(&request.access_key).await?;
        auth::authorize_same_root(session, &account, "UpdateAccessKey")?;
        if let Some(expected) = &request.username {
            if expected != &account.name {
                return Err(IamError::access_denied(format!(
                    "access key '{}' does not belong to user '{expected}'",
                    request.access_key
                )));
            }
        }

        let active_key_id = self.master_key_manager.active_key_id().await?;
        let requested_active = request.status.is_active();

        let key = account
            .find_access_key_mut(&request.access_key)
            .ok_or_else(|| {
                IamError::ServiceFailure(format!(
                    "index pointed at '{}' but it has no matching access key",
                    request.access_key
                ))
            })?;

        if key.is_active == requested_active {
            // Idempotent no-op: no re-encryption, no write.
            return Ok(());
        }

        let plaintext = self
            .master_key_manager
            .decrypt(&key.encrypted_secret_key, &key.master_key_id)
            .await?;
        let cipher = self
            .master_key_manager
            .encrypt(&plaintext, &active_key_id)
            .await?;

        key.encrypted_secret_key = cipher;
        key.is_active = requested_active;
        key.master_key_id = active_key_id.clone();
        account.master_key_id = active_key_id;

        self.write_account(&account).await?;
        self.invalidate_all(&account).await?;
        info!(
            "update_access_key: {} -> {:?}",
            request.access_key, request.status
        );
        Ok(())
    }

    /// `DeleteAccessKey`.
    pub async fn delete_access_key(
        &self,
        session: &Session,
        request: DeleteAccessKeyRequest,
    ) -> Result<()> {
        let mut account = self.read_account_by_access_key(&request.access_key).await?;
        auth::authorize_same_root(session, &account, "DeleteAccessKey")?;
        if let Some(expected) = &request.username {
            if expected != &account.name {
                return Err(IamError::access_denied(format!(
                    "access key '{}' does not belong to user '{expected}'",
                    request.access_key
                )));
            }
        }

        let before = account.access_keys.len();
        account
            .access_keys
            .retain(|k| k.access_key != request.access_key);
        if account.access_keys.len() == before {
            return Err(IamError::ServiceFailure(format!(
                "index pointed at '{}' but it has no matching access key",
                request.access_key
            )));
        }

        self.write_account(&account).await?;
        let idx = access_key_path(&self.config, &request.access_key);
        symlink::remove_index(&idx, false).await?;
        self.cache.invalidate(&request.access_key).await?;
        info!("delete_access_key: {} for {}", request.access_key, account.name);
        Ok(())
    }

    /// `GetAccessKeyLastUsed`. The first three response fields are
    /// synthetic placeholders; only `username` is authoritative.
    pub async fn get_access_key_last_used(
        &self,
        session: &Session,
        request: GetAccessKeyLastUsedRequest,
    ) -> Result<AccessKeyLastUsed> {
        let account = self.read_account_by_access_key(&request.access_key).await?;
        auth::authorize_same_root_read(session, &account)?;

        Ok(AccessKeyLastUsed {
            username: account.name,
            region: Some("us-east-1".to_string()),
            service_name: Some("s3".to_string()),
            last_used_date: None,
        })
    }

    /// `ListAccessKeys`.
    pub async fn list_access_keys(
        &self,
        session: &Session,
        request: ListAccessKeysRequest,
    ) -> Result<ListAccessKeysResponse> {
        let username = auth::effective_target_username(session, request.username.as_deref())?;
        let account = self.read_account_by_name(username).await?;
        auth::authorize_same_root_by_name(session, &account, "ListAccessKeys")?;

        let mut members: Vec<AccessKeyView> = account
            .access_keys
            .iter()
            .map(|k| AccessKeyView {
                username: account.name.clone(),
                access_key: k.access_key.clone(),
                status: AccessKeyStatus::from_is_active(k.is_active),
                create_date: k.creation_date,
            })
            .collect();
        members.sort_by(|a, b| a.access_key.cmp(&b.access_key));

        Ok(ListAccessKeysResponse {
            username: account.name,
            members,
            is_truncated: false,
        })
    }
}
