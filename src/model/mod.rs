//! Persisted domain model: `Account` and its embedded `AccessKey` records.

mod access_key;
mod account;

pub use access_key::AccessKey;
pub use account::{Account, AccountOwner, NsfsAccountConfig};
