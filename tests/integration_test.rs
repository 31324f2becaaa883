use std::sync::Arc;

use chrono::Utc;
use tempfile::tempdir;

use nsfs_iam_store::cache::NoopCacheInvalidator;
use nsfs_iam_store::config::StoreConfig;
use nsfs_iam_store::model::Account;
use nsfs_iam_store::store::access_keys::{
    CreateAccessKeyRequest, DeleteAccessKeyRequest, ListAccessKeysRequest,
    UpdateAccessKeyRequest,
};
use nsfs_iam_store::store::users::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateUserRequest,
};
use nsfs_iam_store::store::FsIdentityStore;
use nsfs_iam_store::testing::{InMemoryMasterKeyManager, RecordingCacheInvalidator};
use nsfs_iam_store::types::AccessKeyStatus;
use nsfs_iam_store::Session;

fn root_account(id: &str) -> Account {
    Account {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{id}@example.com"),
        creation_date: Utc::now(),
        owner: None,
        creator: id.to_string(),
        iam_path: "/".to_string(),
        master_key_id: "mk-1".to_string(),
        allow_bucket_creation: true,
        force_md5_etag: false,
        access_keys: Vec::new(),
        nsfs_account_config: None,
    }
}

fn user_session(root: &Account, name: &str) -> Session {
    Session::new(Account {
        id: format!("{name}-id"),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        creation_date: Utc::now(),
        owner: Some(root.id.clone()),
        creator: root.id.clone(),
        iam_path: "/".to_string(),
        master_key_id: root.master_key_id.clone(),
        allow_bucket_creation: root.allow_bucket_creation,
        force_md5_etag: root.force_md5_etag,
        access_keys: Vec::new(),
        nsfs_account_config: None,
    })
}

async fn new_store(dir: &std::path::Path) -> FsIdentityStore {
    let config = StoreConfig::new(dir);
    FsIdentityStore::open(
        config,
        Arc::new(InMemoryMasterKeyManager::new("mk-1")),
        Arc::new(NoopCacheInvalidator),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn create_user_then_two_access_keys_and_rotate_status() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root = root_account("root-1");
    let root_session = Session::new(root.clone());

    let user = store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "alice".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.arn.ends_with(":user/alice"));

    let alice_session = user_session(&root, "alice");

    let key1 = store
        .create_access_key(&alice_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();
    assert_eq!(key1.status, AccessKeyStatus::Active);
    assert_eq!(key1.secret_key.len(), 40);

    let key2 = store
        .create_access_key(&alice_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();
    assert_ne!(key1.access_key, key2.access_key);

    // A third key is rejected: the two-key cap.
    let err = store
        .create_access_key(&alice_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "LimitExceeded");

    store
        .update_access_key(
            &alice_session,
            UpdateAccessKeyRequest {
                username: None,
                access_key: key1.access_key.clone(),
                status: AccessKeyStatus::Inactive,
            },
        )
        .await
        .unwrap();

    let listed = store
        .list_access_keys(&alice_session, ListAccessKeysRequest { username: None })
        .await
        .unwrap();
    assert_eq!(listed.members.len(), 2);
    let toggled = listed
        .members
        .iter()
        .find(|k| k.access_key == key1.access_key)
        .unwrap();
    assert_eq!(toggled.status, AccessKeyStatus::Inactive);

    // Toggling to the same status again is a no-op.
    store
        .update_access_key(
            &alice_session,
            UpdateAccessKeyRequest {
                username: None,
                access_key: key1.access_key.clone(),
                status: AccessKeyStatus::Inactive,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn rename_user_repoints_every_access_key_symlink() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root = root_account("root-1");
    let root_session = Session::new(root.clone());

    store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "bob".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();
    let bob_session = user_session(&root, "bob");
    let key = store
        .create_access_key(&bob_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();

    store
        .update_user(
            &root_session,
            UpdateUserRequest {
                username: "bob".to_string(),
                new_username: Some("bobby".to_string()),
                new_iam_path: None,
            },
        )
        .await
        .unwrap();

    // The old account file is gone, the new one answers, and the access
    // key's symlink now resolves to the renamed account.
    let err = store
        .get_user(
            &root_session,
            GetUserRequest {
                username: Some("bob".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "NoSuchEntity");

    let renamed = store
        .get_user(
            &root_session,
            GetUserRequest {
                username: Some("bobby".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.username, "bobby");

    let bobby_session = user_session(&root, "bobby");
    let listed = store
        .list_access_keys(&bobby_session, ListAccessKeysRequest { username: None })
        .await
        .unwrap();
    assert_eq!(listed.username, "bobby");
    assert_eq!(listed.members[0].access_key, key.access_key);
}

#[tokio::test]
async fn cross_tenant_access_is_denied() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root1 = root_account("root-1");
    let root2 = root_account("root-2");
    let root1_session = Session::new(root1.clone());
    let root2_session = Session::new(root2.clone());

    store
        .create_user(
            &root1_session,
            CreateUserRequest {
                username: "carol".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();

    let err = store
        .get_user(
            &root2_session,
            GetUserRequest {
                username: Some("carol".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "NoSuchEntity");

    // root2 naming carol by username resolves the same as get_user: NoSuchEntity,
    // not AccessDenied, since root2 has no visibility into root1's tenant at all.
    let err = store
        .create_access_key(
            &root2_session,
            CreateAccessKeyRequest {
                username: Some("carol".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "NoSuchEntity");

    let carol_session = user_session(&root1, "carol");
    let key = store
        .create_access_key(&carol_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();

    // root2 cannot toggle a key belonging to root1's tenant.
    let err = store
        .update_access_key(
            &root2_session,
            UpdateAccessKeyRequest {
                username: Some("carol".to_string()),
                access_key: key.access_key,
                status: AccessKeyStatus::Inactive,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "AccessDeniedException");
}

#[tokio::test]
async fn iam_user_may_act_on_self_but_not_on_others() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root = root_account("root-1");
    let root_session = Session::new(root.clone());

    for name in ["dana", "erin"] {
        store
            .create_user(
                &root_session,
                CreateUserRequest {
                    username: name.to_string(),
                    iam_path: None,
                },
            )
            .await
            .unwrap();
    }

    let dana_session = user_session(&root, "dana");

    let own_key = store
        .create_access_key(&dana_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();
    assert_eq!(own_key.username, "dana");

    let err = store
        .create_access_key(
            &dana_session,
            CreateAccessKeyRequest {
                username: Some("erin".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "AccessDeniedException");
}

#[tokio::test]
async fn delete_user_is_blocked_while_access_keys_remain() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root = root_account("root-1");
    let root_session = Session::new(root.clone());

    store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "frank".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();
    let frank_session = user_session(&root, "frank");
    let key = store
        .create_access_key(&frank_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();

    let err = store
        .delete_user(
            &root_session,
            DeleteUserRequest {
                username: "frank".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "DeleteConflict");

    store
        .delete_access_key(
            &frank_session,
            DeleteAccessKeyRequest {
                username: None,
                access_key: key.access_key,
            },
        )
        .await
        .unwrap();

    store
        .delete_user(
            &root_session,
            DeleteUserRequest {
                username: "frank".to_string(),
            },
        )
        .await
        .unwrap();

    let err = store
        .get_user(
            &root_session,
            GetUserRequest {
                username: Some("frank".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "NoSuchEntity");
}

#[tokio::test]
async fn duplicate_create_user_is_rejected() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root = root_account("root-1");
    let root_session = Session::new(root);

    store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "grace".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();

    let err = store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "grace".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.aws_code(), "EntityAlreadyExists");
}

#[tokio::test]
async fn list_users_is_scoped_to_the_requesting_root_and_sorted() {
    let dir = tempdir().unwrap();
    let store = new_store(dir.path()).await;
    let root1 = root_account("root-1");
    let root2 = root_account("root-2");
    let root1_session = Session::new(root1);
    let root2_session = Session::new(root2);

    for name in ["zed", "amy"] {
        store
            .create_user(
                &root1_session,
                CreateUserRequest {
                    username: name.to_string(),
                    iam_path: None,
                },
            )
            .await
            .unwrap();
    }
    store
        .create_user(
            &root2_session,
            CreateUserRequest {
                username: "other-tenant".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();

    let listed = store
        .list_users(&root1_session, ListUsersRequest { iam_path_prefix: None })
        .await
        .unwrap();
    let names: Vec<&str> = listed.members.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);
}

#[tokio::test]
async fn cache_invalidation_fires_on_access_key_mutations() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    let cache = Arc::new(RecordingCacheInvalidator::new());
    let store = FsIdentityStore::open(
        config,
        Arc::new(InMemoryMasterKeyManager::new("mk-1")),
        cache.clone(),
    )
    .await
    .unwrap();

    let root = root_account("root-1");
    let root_session = Session::new(root.clone());
    store
        .create_user(
            &root_session,
            CreateUserRequest {
                username: "henry".to_string(),
                iam_path: None,
            },
        )
        .await
        .unwrap();
    let henry_session = user_session(&root, "henry");
    let key = store
        .create_access_key(&henry_session, CreateAccessKeyRequest { username: None })
        .await
        .unwrap();
    assert!(cache.count(&key.access_key) >= 1, "create_access_key must invalidate");

    store
        .update_access_key(
            &henry_session,
            UpdateAccessKeyRequest {
                username: None,
                access_key: key.access_key.clone(),
                status: AccessKeyStatus::Inactive,
            },
        )
        .await
        .unwrap();

    assert!(cache.count(&key.access_key) >= 1);
}
