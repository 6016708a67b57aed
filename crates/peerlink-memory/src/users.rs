//! Account registry backed by a concurrent map.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use peerlink_types::account::Account;
use peerlink_types::error::{StoreError, StoreResult};
use peerlink_types::store::UserRegistry;
use tracing::debug;

/// Thread-safe registry of directory accounts, keyed by login.
#[derive(Debug, Default)]
pub struct InMemoryUserRegistry {
    accounts: DashMap<String, Account>,
}

impl InMemoryUserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account is registered.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn insert(&self, login: &str, password: &str) -> StoreResult<()> {
        match self.accounts.entry(login.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "account '{login}' already exists"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(Account::new(login, password));
                Ok(())
            }
        }
    }

    async fn find_by_login_password(
        &self,
        login: &str,
        password: &str,
    ) -> StoreResult<Option<Account>> {
        let Some(account) = self.accounts.get(login) else {
            return Ok(None);
        };
        if !account.password_matches(password) {
            debug!(login, "Passwords don't match");
            return Ok(None);
        }
        Ok(Some(account.clone()))
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.get(login).map(|a| a.clone()))
    }
}
