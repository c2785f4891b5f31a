use super::{AuthError, AuthState};
use crate::context::Context;
use crate::types::Message;
use hyper::header::{self, HeaderMap};
use hyper::StatusCode;

/// The request value key the authenticated user id is stored under.
pub const USER_KEY: &str = "user";

/// Middleware that only lets requests with a valid `Authorization: Bearer <token>` header through.
///
/// On success the token's user id is stored as the request value `"user"`. Otherwise the request is
/// finished with `401 Unauthorized` and a JSON [`Message`](../struct.Message.html).
pub async fn jwt_authentication(mut ctx: Context) -> Result<Context, AuthError> {
    let verified = {
        let state = ctx.data::<AuthState>().ok_or(AuthError::MissingState)?;
        bearer_token(ctx.headers()).and_then(|token| {
            state.tokens().verify(token).map_err(|err| {
                tracing::debug!(error = %err, "token verification failed");
                "Invalid Token"
            })
        })
    };

    match verified {
        Ok(claims) => {
            tracing::debug!(username = %claims.username, "request authenticated");
            ctx.set_value(USER_KEY, claims.user_id)?;
        }
        Err(reason) => {
            tracing::warn!(reason, path = %ctx.path(), "request rejected");
            ctx.set_status(StatusCode::UNAUTHORIZED);
            ctx.json(&Message::new(false, reason))?;
        }
    }

    Ok(ctx)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err("Unauthorized"),
    };

    let value = value.to_str().map_err(|_| "Invalid Token")?;
    match value.split(' ').collect::<Vec<_>>().as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => Ok(*token),
        _ => Err("Invalid Token"),
    }
}
