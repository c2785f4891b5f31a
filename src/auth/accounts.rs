//! Account creation and login. Both answer with a [`Message`] carrying the account and its token,
//! or a failed `Message` when the credentials are rejected.

use super::password::{hash_password, verify_password};
use super::store::Account;
use super::{AuthError, AuthState};
use crate::types::Message;

/// Hashes the password, persists the account and issues a token for it.
pub fn create(state: &AuthState, mut account: Account) -> Result<Message, AuthError> {
    if account.email.is_empty() || account.password.is_empty() {
        return Ok(Message::new(false, "Email and password are required."));
    }

    let hash = hash_password(&account.password)?;
    let stored = match state.store().insert(&account.email, hash) {
        Ok(stored) => stored,
        Err(AuthError::DuplicateEmail(email)) => {
            tracing::warn!(%email, "account already exists");
            return Ok(Message::new(false, "Error creating account."));
        }
        Err(err) => return Err(err),
    };

    account.token = state.tokens().issue(&stored.id.to_string(), &stored.email)?;
    account.password.clear();
    tracing::info!(user_id = %stored.id, "account created");

    Ok(Message::new(true, "Created account.").with("account", &account)?)
}

/// Checks the credentials against the stored account and issues a fresh token.
pub fn log_in(state: &AuthState, mut account: Account) -> Result<Message, AuthError> {
    let stored = match state.store().find_by_email(&account.email) {
        Some(stored) => stored,
        None => return Ok(Message::new(false, "Error parsing account.")),
    };

    if !verify_password(&account.password, &stored.password_hash)? {
        tracing::warn!(user_id = %stored.id, "wrong password");
        return Ok(Message::new(false, "Error with the password account."));
    }

    account.token = state.tokens().issue(&stored.id.to_string(), &stored.email)?;
    account.password.clear();

    Ok(Message::new(true, "Logged in successfully.").with("account", &account)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, TokenIssuer};
    use std::sync::Arc;

    fn state() -> AuthState {
        AuthState::new(Arc::new(MemoryStore::new()), TokenIssuer::new("token-password", 60))
    }

    fn account(email: &str, password: &str) -> Account {
        Account {
            email: email.to_owned(),
            password: password.to_owned(),
            token: String::new(),
        }
    }

    fn returned_account(msg: &Message) -> Account {
        serde_json::from_value(msg.extra["account"].clone()).unwrap()
    }

    #[test]
    fn should_create_an_account_with_a_token() {
        let state = state();
        let msg = create(&state, account("a@b.c", "pw")).unwrap();

        assert!(msg.status);
        let created = returned_account(&msg);
        assert_eq!(created.password, "");
        let claims = state.tokens().verify(&created.token).unwrap();
        assert_eq!(claims.username, "a@b.c");
        assert!(!claims.user_id.is_empty());
    }

    #[test]
    fn should_refuse_a_second_account_for_the_same_email() {
        let state = state();
        create(&state, account("a@b.c", "pw")).unwrap();

        let msg = create(&state, account("a@b.c", "other")).unwrap();
        assert!(!msg.status);
        assert_eq!(msg.message, "Error creating account.");
    }

    #[test]
    fn should_log_in_with_the_right_password_only() {
        let state = state();
        create(&state, account("a@b.c", "pw")).unwrap();

        let ok = log_in(&state, account("a@b.c", "pw")).unwrap();
        assert!(ok.status);
        assert!(state.tokens().verify(&returned_account(&ok).token).is_ok());

        let wrong = log_in(&state, account("a@b.c", "nope")).unwrap();
        assert!(!wrong.status);
        assert!(!wrong.extra.contains_key("account"));

        let unknown = log_in(&state, account("x@y.z", "pw")).unwrap();
        assert!(!unknown.status);
    }

    #[test]
    fn should_require_email_and_password() {
        let msg = create(&state(), account("", "pw")).unwrap();
        assert!(!msg.status);
    }
}
