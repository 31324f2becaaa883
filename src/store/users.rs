//! Account Lifecycle: `CreateUser`, `GetUser`, `UpdateUser`,
//! `DeleteUser`, `ListUsers`.

use chrono::Utc;
use log::{info, warn};

use crate::arn::user_arn;
use crate::auth;
use crate::error::{IamError, Result};
use crate::fsio;
use crate::model::{Account, AccountOwner};
use crate::path::{account_path, TEMP_FILE_MARKER};
use crate::schema;
use crate::session::Session;
use crate::symlink;
use crate::types::{ListUsersResponse, UserView};

use super::FsIdentityStore;

pub struct CreateUserRequest {
    pub username: String,
    pub iam_path: Option<String>,
}

pub struct GetUserRequest {
    pub username: Option<String>,
}

pub struct UpdateUserRequest {
    pub username: String,
    pub new_username: Option<String>,
    pub new_iam_path: Option<String>,
}

pub struct DeleteUserRequest {
    pub username: String,
}

pub struct ListUsersRequest {
    pub iam_path_prefix: Option<String>,
}

fn require_explicit_username<'a>(username: Option<&'a str>) -> Result<&'a str> {
    username.ok_or_else(|| IamError::no_such_entity("username"))
}

fn to_user_view(account: &Account) -> UserView {
    UserView {
        user_id: account.id.clone(),
        username: account.name.clone(),
        iam_path: account.iam_path.clone(),
        arn: user_arn(account.root_id(), &account.iam_path, &account.name),
        create_date: account.creation_date,
        password_last_used: None,
    }
}

impl FsIdentityStore {
    async fn read_account(&self, username: &str) -> Result<Account> {
        let path = account_path(&self.config, username);
        let bytes = fsio::read(&path, &format!("user:{username}")).await?;
        serde_json::from_slice(&bytes).map_err(IamError::from)
    }

    async fn invalidate_access_keys(&self, account: &Account) -> Result<()> {
        for key in &account.access_keys {
            self.cache.invalidate(&key.access_key).await?;
        }
        Ok(())
    }

    /// `CreateUser`.
    pub async fn create_user(
        &self,
        session: &Session,
        request: CreateUserRequest,
    ) -> Result<UserView> {
        auth::require_root(session, "CreateUser")?;

        let root = &session.requesting_account;
        let now = Utc::now();
        let account = Account {
            id: crate::credentials::generate_account_id(),
            name: request.username.clone(),
            email: request.username.clone(),
            creation_date: now,
            owner: Some(root.id.clone()),
            creator: root.id.clone(),
            iam_path: request.iam_path.unwrap_or_else(|| "/".to_string()),
            master_key_id: root.master_key_id.clone(),
            allow_bucket_creation: root.allow_bucket_creation,
            force_md5_etag: root.force_md5_etag,
            access_keys: Vec::new(),
            nsfs_account_config: root.nsfs_account_config.clone(),
        };

        schema::validate_account(&account, &request.username)?;
        let bytes = serde_json::to_vec(&account)?;
        let path = account_path(&self.config, &request.username);
        fsio::create(
            &self.config.accounts_dir(),
            &path,
            &bytes,
            &format!("user:{}", request.username),
        )
        .await?;

        info!("create_user: created {} under root {}", account.name, root.id);
        Ok(to_user_view(&account))
    }

    /// `GetUser`.
    pub async fn get_user(&self, session: &Session, request: GetUserRequest) -> Result<UserView> {
        auth::require_root(session, "GetUser")?;
        let username = require_explicit_username(request.username.as_deref())?;
        let account = self.read_account(username).await?;
        auth::authorize_owned_user(session, &account, "GetUser")?;
        Ok(to_user_view(&account))
    }

    /// `UpdateUser`. A rename re-points every access-key symlink at the new
    /// account filename instead of leaving it dangling.
    pub async fn update_user(
        &self,
        session: &Session,
        request: UpdateUserRequest,
    ) -> Result<UserView> {
        auth::require_root(session, "UpdateUser")?;
        let mut account = self.read_account(&request.username).await?;
        auth::authorize_owned_user(session, &account, "UpdateUser")?;

        if let Some(new_path) = request.new_iam_path {
            account.iam_path = new_path;
        }

        let renaming = request
            .new_username
            .as_deref()
            .is_some_and(|new_name| new_name != account.name);

        if renaming {
            let new_username = request.new_username.unwrap();
            let new_path = account_path(&self.config, &new_username);
            if tokio::fs::try_exists(&new_path)
                .await
                .map_err(fsio::map_io_error)?
            {
                return Err(IamError::EntityAlreadyExists {
                    entity: format!("user:{new_username}"),
                });
            }

            let old_username = account.name.clone();
            account.name = new_username.clone();
            account.email = new_username.clone();
            schema::validate_account(&account, &new_username)?;
            let bytes = serde_json::to_vec(&account)?;

            fsio::create(
                &self.config.accounts_dir(),
                &new_path,
                &bytes,
                &format!("user:{new_username}"),
            )
            .await?;

            for key in &account.access_keys {
                let idx = crate::path::access_key_path(&self.config, &key.access_key);
                if let Err(e) = symlink::remove_index(&idx, true).await {
                    warn!(
                        "update_user: rename {old_username}->{new_username}: \
                         failed to unlink old symlink for {}: {e}",
                        key.access_key
                    );
                }
                symlink::create_index(&idx, &new_username).await?;
            }

            let old_path = account_path(&self.config, &old_username);
            if let Err(e) = fsio::delete(&old_path, &format!("user:{old_username}"), true).await {
                warn!(
                    "update_user: rename {old_username}->{new_username}: \
                     old account file still present: {e}"
                );
            }

            info!("update_user: renamed {old_username} -> {new_username}");
        } else {
            schema::validate_account(&account, &account.name.clone())?;
            let bytes = serde_json::to_vec(&account)?;
            let path = account_path(&self.config, &account.name);
            fsio::update(&self.config.accounts_dir(), &path, &bytes).await?;
        }

        self.invalidate_access_keys(&account).await?;
        Ok(to_user_view(&account))
    }

    /// `DeleteUser`.
    pub async fn delete_user(&self, session: &Session, request: DeleteUserRequest) -> Result<()> {
        auth::require_root(session, "DeleteUser")?;
        let account = self.read_account(&request.username).await?;
        auth::authorize_owned_user(session, &account, "DeleteUser")?;

        if !account.access_keys.is_empty() {
            return Err(IamError::DeleteConflict {
                reason: format!(
                    "user '{}' still has {} access key(s); delete them first",
                    account.name,
                    account.access_keys.len()
                ),
            });
        }

        let path = account_path(&self.config, &request.username);
        fsio::delete(&path, &format!("user:{}", request.username), false).await?;
        info!("delete_user: deleted {}", account.name);
        Ok(())
    }

    /// `ListUsers`: bounded-concurrency directory scan,
    /// filtered to accounts owned by the requesting root, sorted by
    /// username ascending.
    pub async fn list_users(
        &self,
        session: &Session,
        request: ListUsersRequest,
    ) -> Result<ListUsersResponse> {
        auth::require_root(session, "ListUsers")?;

        let mut entries = tokio::fs::read_dir(self.config.accounts_dir())
            .await
            .map_err(fsio::map_io_error)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(fsio::map_io_error)? {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if file_name.contains(TEMP_FILE_MARKER) || !file_name.ends_with(".json") {
                continue;
            }
            paths.push(path);
        }

        let mut tasks = tokio::task::JoinSet::new();
        for path in paths {
            let sem = self.list_semaphore.clone();
            tasks.spawn(async move {
                let _permit = sem.acquire_owned().await.expect("semaphore never closed");
                let bytes = tokio::fs::read(&path).await.map_err(fsio::map_io_error)?;
                serde_json::from_slice::<Account>(&bytes).map_err(IamError::from)
            });
        }

        let mut accounts = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let account = joined.map_err(|e| IamError::ServiceFailure(e.to_string()))??;
            accounts.push(account);
        }

        let has_prefix_filter = request
            .iam_path_prefix
            .as_deref()
            .is_some_and(|p| p != "/" && !p.is_empty());

        let mut members: Vec<UserView> = accounts
            .into_iter()
            .filter(|a| matches!(a.owner_kind(), AccountOwner::IamUser { owner_id } if owner_id == session.id()))
            .filter(|a| {
                if !has_prefix_filter {
                    return true;
                }
                let prefix = request.iam_path_prefix.as_deref().unwrap();
                a.iam_path.starts_with(prefix)
            })
            .map(|a| to_user_view(&a))
            .collect();

        members.sort_by(|a, b| a.username.cmp(&b.username));

        Ok(ListUsersResponse {
            members,
            is_truncated: false,
        })
    }
}
