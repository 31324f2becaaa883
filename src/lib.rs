//! nsfs-iam-store - a filesystem-native account and access-key identity
//! store backing an AWS-IAM-compatible control surface.
//!
//! No database: every account is a JSON file under `accounts/`, and every
//! access key is indexed by a symlink under `access_keys/` pointing back at
//! its owning account file. All writes go through a write-temp / fsync /
//! rename sequence so a reader never observes a partial file.
//!
//! ## Features
//!
//! - **Account Lifecycle**: create, get, update (including rename), delete,
//!   and list IAM users scoped to a root account
//! - **Access-Key Lifecycle**: create, activate/deactivate, delete, and list
//!   access keys, capped at two per account
//! - **Two-index consistency**: an offline reconciler rebuilds the symlink
//!   index from the account files it's meant to mirror
//! - **Pluggable collaborators**: the master-key manager and cache
//!   invalidator are injected traits, not singletons
//! - **Async API**: every store operation is asynchronous
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nsfs_iam_store::cache::NoopCacheInvalidator;
//! use nsfs_iam_store::config::StoreConfig;
//! use nsfs_iam_store::store::users::CreateUserRequest;
//! use nsfs_iam_store::store::FsIdentityStore;
//! use nsfs_iam_store::testing::InMemoryMasterKeyManager;
//! use nsfs_iam_store::Session;
//!
//! # async fn run(root_session: Session) -> nsfs_iam_store::Result<()> {
//! let config = StoreConfig::new("/var/lib/nsfs/identity");
//! let store = FsIdentityStore::open(
//!     config,
//!     Arc::new(InMemoryMasterKeyManager::new("mk-1")),
//!     Arc::new(NoopCacheInvalidator),
//! )
//! .await?;
//!
//! let user = store
//!     .create_user(
//!         &root_session,
//!         CreateUserRequest {
//!             username: "alice".to_string(),
//!             iam_path: None,
//!         },
//!     )
//!     .await?;
//! println!("created {}", user.arn);
//! # Ok(())
//! # }
//! ```

pub mod arn;
pub mod auth;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fsio;
pub mod masterkey;
pub mod model;
pub mod path;
pub mod reconcile;
pub mod schema;
pub mod session;
pub mod store;
pub mod symlink;
pub mod testing;
pub mod types;

pub use config::StoreConfig;
pub use error::{IamError, Result};
pub use session::Session;
pub use store::FsIdentityStore;
