use crate::context::Context;
use crate::data_map::DataMap;
use crate::middleware::{self, Middleware};
use crate::router::{Outcome, Router};
use crate::types::{Message, RequestInfo};
use crate::{Error, RouteError};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Requests with a larger body are rejected with `400 Bad Request`.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

type ErrHandlerWithoutInfo = Box<dyn Fn(Error) -> ErrHandlerReturn + Send + Sync + 'static>;
type ErrHandlerWithInfo = Box<dyn Fn(Error, RequestInfo) -> ErrHandlerReturn + Send + Sync + 'static>;
type ErrHandlerReturn = Box<dyn Future<Output = Response<Full<Bytes>>> + Send + 'static>;

pub(crate) enum ErrHandler {
    WithoutInfo(ErrHandlerWithoutInfo),
    WithInfo(ErrHandlerWithInfo),
}

impl ErrHandler {
    pub(crate) fn should_require_req_info(&self) -> bool {
        matches!(self, ErrHandler::WithInfo(_))
    }

    pub(crate) async fn execute(&self, err: Error, req_info: Option<RequestInfo>) -> Response<Full<Bytes>> {
        match (self, req_info) {
            (ErrHandler::WithoutInfo(handler), _) => Pin::from(handler(err)).await,
            (ErrHandler::WithInfo(handler), Some(req_info)) => Pin::from(handler(err, req_info)).await,
            (ErrHandler::WithInfo(_), None) => default_error_response(&err),
        }
    }
}

impl Default for ErrHandler {
    fn default() -> ErrHandler {
        let handler: ErrHandlerWithoutInfo =
            Box::new(|err: Error| Box::new(async move { default_error_response(&err) }));
        ErrHandler::WithoutInfo(handler)
    }
}

/// The response the default error handler produces: the error's status code and a JSON
/// [`Message`](./struct.Message.html) with the canonical reason.
pub fn default_error_response(err: &Error) -> Response<Full<Bytes>> {
    message_response(err.status_code())
}

fn not_found_response() -> Response<Full<Bytes>> {
    message_response(StatusCode::NOT_FOUND)
}

fn message_response(status: StatusCode) -> Response<Full<Bytes>> {
    let reason = status.canonical_reason().unwrap_or("Unknown Error");
    let body = serde_json::to_vec(&Message::new(false, reason)).unwrap_or_else(|_| reason.as_bytes().to_vec());

    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

/// The application: an ordered list of prefix routers plus the middleware that runs before them.
///
/// A request goes to the first router, in registration order, whose prefix matches its path. No
/// other router is tried, even if the chosen one has no matching route. Requests that reach no
/// route are answered with `404 Not Found`; every error is logged and turned into a response by
/// the error handler, so one failing request never takes the server down.
///
/// # Examples
///
/// ```
/// use routerify_express::{App, Context, Router};
/// use std::convert::Infallible;
///
/// async fn show(mut ctx: Context) -> Result<Context, Infallible> {
///     let id = ctx.param("id").unwrap_or_default().to_owned();
///     ctx.text(id);
///     Ok(ctx)
/// }
///
/// let go = Router::builder("/api/go").get("/lol/:id", show).build().unwrap();
/// let http = Router::builder("/api/http").get("/32", show).build().unwrap();
///
/// let app: App<Infallible> = App::new(vec![go, http]);
/// assert_eq!(app.routers().len(), 2);
/// ```
pub struct App<E> {
    routers: Vec<Router<E>>,
    middlewares: Vec<Middleware<E>>,
    data: Arc<DataMap>,
    err_handler: ErrHandler,
    body_limit: usize,
}

impl<E: Into<RouteError> + 'static> App<E> {
    /// Creates an application from routers, tried in the given order.
    pub fn new(routers: Vec<Router<E>>) -> App<E> {
        App {
            routers,
            middlewares: Vec::new(),
            data: Arc::new(DataMap::new()),
            err_handler: ErrHandler::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Return an [AppBuilder](./struct.AppBuilder.html) instance to build an `App`.
    pub fn builder() -> AppBuilder<E> {
        AppBuilder::new()
    }

    pub fn routers(&self) -> &[Router<E>] {
        &self.routers
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub(crate) fn data(&self) -> Arc<DataMap> {
        self.data.clone()
    }

    pub(crate) fn should_gen_req_info(&self) -> bool {
        self.err_handler.should_require_req_info()
    }

    /// Handles one request and produces its response. Never fails.
    pub async fn dispatch(&self, ctx: Context) -> Response<Full<Bytes>> {
        let req_info = if self.should_gen_req_info() {
            Some(ctx.request_info())
        } else {
            None
        };

        match self.route(ctx).await {
            Ok(Outcome::Handled(ctx)) => ctx.into_response(),
            Ok(Outcome::Unmatched(ctx)) => {
                tracing::debug!(method = %ctx.method(), path = %ctx.path(), "no route matched");
                not_found_response()
            }
            Err(err) => self.handle_error(err, req_info).await,
        }
    }

    /// Logs the error and converts it with the registered error handler.
    pub(crate) async fn handle_error(&self, err: Error, req_info: Option<RequestInfo>) -> Response<Full<Bytes>> {
        tracing::error!(error = %err, "request failed");
        self.err_handler.execute(err, req_info).await
    }

    async fn route(&self, ctx: Context) -> crate::Result<Outcome> {
        let mut ctx = middleware::run(&self.middlewares, ctx).await.map_err(Error::Handler)?;

        if ctx.is_finished() {
            tracing::debug!("request finished by app middleware");
            return Ok(Outcome::Handled(ctx));
        }

        let found = self
            .routers
            .iter()
            .find_map(|router| router.match_prefix(ctx.path()).map(|params| (router, params)));

        match found {
            Some((router, params)) => {
                tracing::debug!(prefix = %router.prefix(), "router matched");
                ctx.scope_mut().capture(params);
                router.dispatch(ctx).await
            }
            None => Ok(Outcome::Unmatched(ctx)),
        }
    }
}

impl<E> Debug for App<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routers: {:?}, middlewares: {:?}, data: {:?}, body_limit: {} }}",
            self.routers, self.middlewares, self.data, self.body_limit
        )
    }
}

/// Builder for the [App](./struct.App.html) type.
///
/// # Examples
///
/// ```
/// use routerify_express::{App, Context, Middleware, RequestInfo, Router};
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response, StatusCode};
/// use std::convert::Infallible;
///
/// struct State(u64);
///
/// async fn error_handler(err: routerify_express::Error, info: RequestInfo) -> Response<Full<Bytes>> {
///     let mut res = Response::new(Full::new(Bytes::from(format!("{} failed: {}", info.uri(), err))));
///     *res.status_mut() = err.status_code();
///     res
/// }
///
/// let app: App<Infallible> = App::builder()
///     .data(State(100))
///     .middleware(Middleware::new(|ctx: Context| async move { Ok(ctx) }))
///     .router(Router::builder("/api").build().unwrap())
///     .err_handler_with_info(error_handler)
///     .build()
///     .unwrap();
/// ```
pub struct AppBuilder<E> {
    inner: crate::Result<App<E>>,
}

impl<E: Into<RouteError> + 'static> AppBuilder<E> {
    pub fn new() -> AppBuilder<E> {
        AppBuilder {
            inner: Ok(App::new(Vec::new())),
        }
    }

    /// Creates a new [App](./struct.App.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<App<E>> {
        self.inner
    }

    fn and_then<F: FnOnce(App<E>) -> crate::Result<App<E>>>(self, func: F) -> Self {
        AppBuilder {
            inner: self.inner.and_then(func),
        }
    }

    /// Adds a router. Routers are tried in the order they are added.
    pub fn router(self, router: Router<E>) -> Self {
        self.and_then(move |mut app| {
            app.routers.push(router);
            Ok(app)
        })
    }

    /// Adds an application level middleware, run before the router is chosen.
    pub fn middleware(self, m: Middleware<E>) -> Self {
        self.and_then(move |mut app| {
            app.middlewares.push(m);
            Ok(app)
        })
    }

    /// Shares `data` with every middleware and handler through
    /// [`Context::data`](./struct.Context.html#method.data). One value per type.
    pub fn data<T: Send + Sync + 'static>(self, data: T) -> Self {
        self.and_then(move |mut app| {
            Arc::get_mut(&mut app.data)
                .ok_or_else(|| Error::builder("app data is already shared"))?
                .insert(data);
            Ok(app)
        })
    }

    /// Sets the largest request body accepted, in bytes.
    pub fn body_limit(self, limit: usize) -> Self {
        self.and_then(move |mut app| {
            if limit == 0 {
                return Err(Error::builder("body limit must be greater than zero"));
            }
            app.body_limit = limit;
            Ok(app)
        })
    }

    /// Adds a handler to convert any routing or handler error into a response.
    pub fn err_handler<H, R>(self, handler: H) -> Self
    where
        H: Fn(Error) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        let handler: ErrHandlerWithoutInfo = Box::new(move |err: Error| Box::new(handler(err)));
        self.and_then(move |mut app| {
            app.err_handler = ErrHandler::WithoutInfo(handler);
            Ok(app)
        })
    }

    /// Adds an error handler which also receives the [request info](./struct.RequestInfo.html).
    pub fn err_handler_with_info<H, R>(self, handler: H) -> Self
    where
        H: Fn(Error, RequestInfo) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        let handler: ErrHandlerWithInfo =
            Box::new(move |err: Error, req_info: RequestInfo| Box::new(handler(err, req_info)));
        self.and_then(move |mut app| {
            app.err_handler = ErrHandler::WithInfo(handler);
            Ok(app)
        })
    }
}

impl<E: Into<RouteError> + 'static> Default for AppBuilder<E> {
    fn default() -> Self {
        AppBuilder::new()
    }
}
