//! `routerify-express` is an Express style router with middleware support for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! Its core features:
//!
//! - Compose independent [routers](./struct.Router.html) under path prefixes, tried in registration order.
//!
//! - Segment based route patterns with named captures (`/lol/:id`) and wildcards (`/files/*`).
//!
//! - Ordered [middleware](./struct.Middleware.html) chains, at the application and at the router level.
//!
//! - Route handlers chained with [`then`](./struct.RouterBuilder.html#method.then): the first handler that
//!   writes a response finishes the request and the rest are skipped.
//!
//! - One owned [`Context`](./struct.Context.html) per request carrying the captured params, request-local
//!   values and the response, so nothing is shared between concurrent requests.
//!
//! - Flexible error handling: every failure is logged and turned into a response by an
//!   [error handler](./struct.AppBuilder.html#method.err_handler).
//!
//! ## Basic Example
//!
//! A simple example with `hyper` would look like the following:
//!
//! ```no_run
//! use hyper::service::Service;
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use routerify_express::{App, AppService, Context, Middleware, Router};
//! use std::sync::Arc;
//! use std::{convert::Infallible, net::SocketAddr};
//! use tokio::net::TcpListener;
//!
//! // Define an app state to share it across the route handlers and middlewares.
//! struct State(u64);
//!
//! // A handler for "/" page.
//! async fn home_handler(mut ctx: Context) -> Result<Context, Infallible> {
//!     // Access the app state.
//!     let state = ctx.data::<State>().unwrap().0;
//!     ctx.text(format!("State value: {}", state));
//!     Ok(ctx)
//! }
//!
//! // A handler for "/users/:userId" page.
//! async fn user_handler(mut ctx: Context) -> Result<Context, Infallible> {
//!     let user_id = ctx.param("userId").unwrap_or_default().to_owned();
//!     ctx.text(format!("Hello {}", user_id));
//!     Ok(ctx)
//! }
//!
//! // A middleware which logs an http request.
//! async fn logger(ctx: Context) -> Result<Context, Infallible> {
//!     println!("{} {} {}", ctx.remote_addr(), ctx.method(), ctx.path());
//!     Ok(ctx)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let pages = Router::builder("/")
//!         .get("/", home_handler)
//!         .build()?;
//!     let users = Router::builder("/users")
//!         .middleware(Middleware::new(logger))
//!         .get("/:userId", user_handler)
//!         .build()?;
//!
//!     // Routers are tried in order, so the more specific prefix goes first.
//!     let app = App::builder().data(State(100)).router(users).router(pages).build()?;
//!     let service = Arc::new(AppService::new(app));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = service.call(&stream).await.unwrap();
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is an async function that takes the [`Context`](./struct.Context.html) by value and hands it
//! back on success. Any error type `E` with `E: Into<RouteError>` can be returned; it aborts the request
//! and reaches the error handler as [`Error::Handler`](./enum.Error.html#variant.Handler).
//!
//! ```
//! use routerify_express::{Context, Router};
//! use std::io;
//!
//! async fn echo(mut ctx: Context) -> Result<Context, io::Error> {
//!     let body = ctx.body().clone();
//!     ctx.bytes(body);
//!     Ok(ctx)
//! }
//!
//! let router: Router<io::Error> = Router::builder("/api/go").post("/lol/:id", echo).build().unwrap();
//! ```
//!
//! ### Route Paths
//!
//! Patterns are split on `/`. A segment is a literal, a `:name` capture or a `*` wildcard. The full
//! pattern of a route is its router's prefix joined with the route path, and a request must match it
//! segment for segment. A pattern ending in `/` also accepts paths with a different segment count.
//!
//! ```
//! use routerify_express::matcher::{MatchMode, Pattern, WildcardMode};
//!
//! let pattern = Pattern::join("/api/go", "/lol/:id/:the_id_especial").unwrap();
//! let params = pattern
//!     .match_path("/api/go/lol/7/9", MatchMode::Exact, WildcardMode::default())
//!     .unwrap();
//! assert_eq!(params.get("the_id_especial").map(String::as_str), Some("9"));
//! ```
//!
//! By default a `*` segment accepts the rest of the path without binding anything. With
//! [`WildcardMode::Rest`](./matcher/enum.WildcardMode.html) a trailing `*` binds the remaining segments
//! under the `*` parameter instead.
//!
//! ## Middleware
//!
//! Middlewares run in registration order before any route handler. A middleware that writes a response
//! finishes the request and nothing after it runs; a middleware that fails aborts the request.
//!
//! ```
//! use hyper::StatusCode;
//! use routerify_express::{Context, Message, Middleware, Router};
//! use std::convert::Infallible;
//!
//! async fn only_json(mut ctx: Context) -> Result<Context, Infallible> {
//!     if ctx.headers().get("content-type").map(|v| v != "application/json").unwrap_or(true) {
//!         ctx.set_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
//!         ctx.json(&Message::new(false, "JSON only")).unwrap();
//!     }
//!     Ok(ctx)
//! }
//!
//! let router: Router<Infallible> = Router::builder("/api")
//!     .middleware(Middleware::new(only_json))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Request-local values
//!
//! Values set with [`Context::set_value`](./struct.Context.html#method.set_value) are stored JSON encoded
//! and visible to every later middleware and handler of the same request only.
//!
//! ## Error Handling
//!
//! Every error, from a handler, a middleware or the request itself, is logged and passed to the error
//! handler. The default one answers with [`Error::status_code`](./enum.Error.html#method.status_code)
//! and a JSON [`Message`](./struct.Message.html). Requests that reach no route get `404 Not Found`.

pub use self::app::{default_error_response, App, AppBuilder, DEFAULT_BODY_LIMIT};
pub use self::config::Config;
pub use self::context::Context;
pub use self::error::{Error, RouteError};
pub use self::matcher::{MatchMode, Pattern, WildcardMode};
pub use self::middleware::Middleware;
pub use self::route::Route;
pub use self::router::{Outcome, Router, RouterBuilder};
pub use self::service::{AppService, RequestService, RequestServiceBuilder};
pub use self::types::{Message, RequestId, RequestInfo, RequestScope, RouteParams};

pub mod api;
mod app;
pub mod auth;
mod config;
mod context;
mod data_map;
mod error;
mod helpers;
pub mod matcher;
mod middleware;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have routerify-express errors.
pub type Result<T> = std::result::Result<T, Error>;
