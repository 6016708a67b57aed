//! Directory accounts.

use serde::{Deserialize, Serialize};

/// A directory account. The login is the identity key and is unique.
///
/// Passwords are kept and compared verbatim; there is no hashing in this store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique login.
    pub login: String,
    /// Plain-text password.
    pub password: String,
}

impl Account {
    /// Create an account from a login and password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Exact-match password check.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}
