//! The demo application served by the `routerify-express` binary.
//!
//! | Method   | Path                                    | Answer                                   |
//! |----------|-----------------------------------------|------------------------------------------|
//! | `GET`    | `/api/go/lol/:id`                       | `____yes____` followed by the id twice   |
//! | `POST`   | `/api/go/lol/:id`                       | the request body                         |
//! | `DELETE` | `/api/go/lol/:id/:the_id_especial`      | the `the_id_especial` param              |
//! | `GET`    | `/api/http/32`                          | `"nice"`, the second handler never runs  |
//! | `POST`   | `/api/auth/sign-in`                     | creates an account, answers with a token |
//! | `POST`   | `/api/auth/log-in`                      | checks the credentials, answers a token  |
//! | `GET`    | `/api/prohibited`                       | `yex` for a valid bearer token           |

use crate::auth::{accounts, jwt_authentication, Account, AccountStore, AuthError, AuthState, TokenIssuer};
use crate::config::Config;
use crate::context::Context;
use crate::router::Router;
use crate::types::Message;
use crate::App;
use hyper::StatusCode;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct TestUser {
    username: &'static str,
}

/// Builds the demo application on top of the given account store.
pub fn app(config: &Config, store: Arc<dyn AccountStore>) -> crate::Result<App<AuthError>> {
    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);

    App::builder()
        .data(AuthState::new(store, tokens))
        .body_limit(config.body_limit)
        .router(go_router(config)?)
        .router(http_router(config)?)
        .router(auth_router(config)?)
        .router(prohibited_router(config)?)
        .build()
}

fn go_router(config: &Config) -> crate::Result<Router<AuthError>> {
    Router::<AuthError>::builder("/api/go")
        .wildcard_mode(config.wildcard)
        .get("/lol/:id", |mut ctx: Context| async move {
            let id = ctx.param("id").unwrap_or_default().to_owned();
            ctx.set_status(StatusCode::OK);
            ctx.write(format!("____yes____{}{}", id, id));
            Ok(ctx)
        })
        .delete("/lol/:id/:the_id_especial", |mut ctx: Context| async move {
            let especial = ctx.param("the_id_especial").unwrap_or_default().to_owned();
            ctx.write(especial);
            Ok(ctx)
        })
        .post("/lol/:id", |mut ctx: Context| async move {
            let body = ctx.body().clone();
            ctx.write(body);
            Ok(ctx)
        })
        .build()
}

fn http_router(config: &Config) -> crate::Result<Router<AuthError>> {
    Router::<AuthError>::builder("/api/http")
        .wildcard_mode(config.wildcard)
        .get("/32", |mut ctx: Context| async move {
            ctx.set_value("wow", "nice")?;
            let key = ctx.value_bytes("wow").unwrap_or_default();
            ctx.bytes(key);
            Ok(ctx)
        })
        .then(|mut ctx: Context| async move {
            ctx.json(&serde_json::json!({
                "lol": 32,
                "yeees": "owo",
                "user": TestUser { username: "hehehhee" },
            }))?;
            Ok(ctx)
        })
        .build()
}

fn auth_router(config: &Config) -> crate::Result<Router<AuthError>> {
    Router::<AuthError>::builder("/api/auth")
        .wildcard_mode(config.wildcard)
        .post("/log-in", |ctx: Context| respond_with_account(ctx, accounts::log_in))
        .post("/sign-in", |ctx: Context| respond_with_account(ctx, accounts::create))
        .build()
}

fn prohibited_router(config: &Config) -> crate::Result<Router<AuthError>> {
    Router::<AuthError>::builder("/api/prohibited")
        .wildcard_mode(config.wildcard)
        .get("/", jwt_authentication)
        .then(|mut ctx: Context| async move {
            ctx.text("yex");
            Ok(ctx)
        })
        .build()
}

/// Decodes the account from the body and answers with what `action` makes of it. Hashing runs
/// on the blocking pool.
async fn respond_with_account(
    mut ctx: Context,
    action: fn(&AuthState, Account) -> Result<Message, AuthError>,
) -> Result<Context, AuthError> {
    let account = match ctx.parse_json::<Account>() {
        Ok(account) => account,
        Err(err) => {
            tracing::debug!(error = %err, "invalid account body");
            ctx.set_status(StatusCode::BAD_REQUEST);
            ctx.json(&Message::new(false, "Invalid request"))?;
            return Ok(ctx);
        }
    };

    let state = ctx.data::<AuthState>().ok_or(AuthError::MissingState)?.clone();
    let msg = tokio::task::spawn_blocking(move || action(&state, account)).await??;

    ctx.json(&msg)?;
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use crate::{RequestService, RequestServiceBuilder};
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use hyper::service::Service;
    use hyper::{Method, Request};
    use std::net::SocketAddr;

    fn service() -> RequestService<AuthError> {
        let app = app(&Config::default(), Arc::new(MemoryStore::new())).unwrap();
        RequestServiceBuilder::new(app).build(SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    async fn call(service: &RequestService<AuthError>, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap();
        let res = service.call(req).await.unwrap();
        let status = res.status();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn should_serve_the_go_routes() {
        let service = service();

        assert_eq!(
            call(&service, Method::GET, "/api/go/lol/42", "").await,
            (StatusCode::OK, "____yes____4242".to_owned())
        );
        assert_eq!(
            call(&service, Method::POST, "/api/go/lol/1", "echo me").await,
            (StatusCode::OK, "echo me".to_owned())
        );
        assert_eq!(
            call(&service, Method::DELETE, "/api/go/lol/1/9", "").await,
            (StatusCode::OK, "9".to_owned())
        );
    }

    #[tokio::test]
    async fn should_stop_the_http_chain_after_the_first_response() {
        let (status, body) = call(&service(), Method::GET, "/api/http/32", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#""nice""#);
    }

    #[tokio::test]
    async fn should_reject_invalid_account_bodies() {
        let (status, body) = call(&service(), Method::POST, "/api/auth/sign-in", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"status":false,"message":"Invalid request"}"#);
    }

    #[tokio::test]
    async fn should_answer_unknown_paths_with_not_found() {
        let (status, _) = call(&service(), Method::GET, "/api/nothing", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
