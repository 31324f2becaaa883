//! The session object every callable operation receives.

use crate::model::{Account, AccountOwner};

/// Wraps the requesting account as classified by the session layer. The
/// store never looks up the requester itself — it is handed the account
/// record directly by whatever authenticated the caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub requesting_account: Account,
}

impl Session {
    pub fn new(requesting_account: Account) -> Self {
        Self { requesting_account }
    }

    pub fn is_root(&self) -> bool {
        self.requesting_account.is_root_account()
    }

    pub fn id(&self) -> &str {
        &self.requesting_account.id
    }

    pub fn name(&self) -> &str {
        &self.requesting_account.name
    }

    /// The root account id this session's caller belongs to.
    pub fn root_id(&self) -> &str {
        self.requesting_account.root_id()
    }

    pub fn owner_kind(&self) -> AccountOwner<'_> {
        self.requesting_account.owner_kind()
    }
}
