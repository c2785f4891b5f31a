//! Account creation, login and token checks used by the demo application.

pub mod accounts;
mod middleware;
mod password;
mod store;
mod token;

pub use self::middleware::{jwt_authentication, USER_KEY};
pub use self::password::{hash_password, verify_password};
pub use self::store::{Account, AccountStore, MemoryStore, StoredAccount};
pub use self::token::{Claims, TokenIssuer};

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the demo authentication handlers.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Password(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("system time error: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("an account for {0:?} already exists")]
    DuplicateEmail(String),

    /// The app was built without an [`AuthState`] in its data.
    #[error("auth state is not registered with the app")]
    MissingState,

    #[error(transparent)]
    Router(#[from] crate::Error),
}

/// Shared by every auth handler through the app data.
#[derive(Clone)]
pub struct AuthState {
    store: Arc<dyn AccountStore>,
    tokens: TokenIssuer,
}

impl AuthState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenIssuer) -> AuthState {
        AuthState { store, tokens }
    }

    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState").field("tokens", &self.tokens).finish()
    }
}
