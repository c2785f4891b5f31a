use super::AuthError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The account document clients send and receive. The password is cleared and the token filled
/// in before an account is sent back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub token: String,
}

/// An account as persisted by an [`AccountStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Where accounts are persisted.
pub trait AccountStore: Send + Sync {
    /// Persists a new account. Fails with [`AuthError::DuplicateEmail`] if the email is taken.
    fn insert(&self, email: &str, password_hash: String) -> Result<StoredAccount, AuthError>;

    fn find_by_email(&self, email: &str) -> Option<StoredAccount>;
}

/// An in-memory [`AccountStore`], keyed by email.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl AccountStore for MemoryStore {
    fn insert(&self, email: &str, password_hash: String) -> Result<StoredAccount, AuthError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return Err(AuthError::DuplicateEmail(email.to_owned()));
        }

        let account = StoredAccount {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash,
        };
        accounts.insert(email.to_owned(), account.clone());
        Ok(account)
    }

    fn find_by_email(&self, email: &str) -> Option<StoredAccount> {
        self.accounts.read().get(email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_find_inserted_accounts() {
        let store = MemoryStore::new();
        let stored = store.insert("a@b.c", "hash".to_owned()).unwrap();

        assert_eq!(store.find_by_email("a@b.c"), Some(stored));
        assert_eq!(store.find_by_email("x@y.z"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn should_reject_duplicate_emails() {
        let store = MemoryStore::new();
        store.insert("a@b.c", "hash".to_owned()).unwrap();

        let err = store.insert("a@b.c", "other".to_owned()).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail(email) if email == "a@b.c"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn should_default_missing_fields() {
        let account: Account = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(account.password, "");
        assert_eq!(account.token, "");
    }
}
