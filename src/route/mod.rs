use crate::context::Context;
use crate::helpers;
use crate::matcher::{MatchMode, Pattern, WildcardMode};
use crate::types::RouteParams;
use crate::RouteError;
use hyper::Method;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

pub(crate) type Handler<E> = Box<dyn Fn(Context) -> HandlerReturn<E> + Send + Sync + 'static>;
pub(crate) type HandlerReturn<E> = Box<dyn Future<Output = Result<Context, E>> + Send + 'static>;

pub(crate) fn into_handler<E, H, R>(handler: H) -> Handler<E>
where
    H: Fn(Context) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Context, E>> + Send + 'static,
{
    Box::new(move |ctx: Context| Box::new(handler(ctx)))
}

/// Represents a single route.
///
/// A route consists of a method, a path pattern and an ordered chain of handlers. It shouldn't be
/// created directly, use the [Router](./struct.Router.html) registration methods, which hand back
/// a `&mut Route` to append more handlers to its chain.
///
/// # Examples
///
/// ```
/// use routerify_express::{Context, Router};
/// use std::convert::Infallible;
///
/// async fn remember(mut ctx: Context) -> Result<Context, Infallible> {
///     ctx.set_value("wow", "nice").unwrap();
///     Ok(ctx)
/// }
///
/// async fn answer(mut ctx: Context) -> Result<Context, Infallible> {
///     let body = ctx.value_bytes("wow").unwrap_or_default();
///     ctx.bytes(body);
///     Ok(ctx)
/// }
///
/// let mut router: Router<Infallible> = Router::new("/api/http").unwrap();
/// router.get("/32", remember).unwrap().then(answer);
/// ```
pub struct Route<E> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) pattern: Pattern,
    pub(crate) handlers: Vec<Handler<E>>,
}

impl<E: Into<RouteError> + 'static> Route<E> {
    pub(crate) fn new_with_boxed_handler(
        method: Method,
        prefix: &str,
        path: String,
        handler: Handler<E>,
    ) -> crate::Result<Route<E>> {
        let pattern = Pattern::join(prefix, path.as_str())?;

        Ok(Route {
            method,
            path,
            pattern,
            handlers: vec![handler],
        })
    }

    /// Appends a handler to this route's chain. Handlers run in the order they were added.
    pub fn then<H, R>(&mut self, handler: H) -> &mut Route<E>
    where
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.handlers.push(into_handler(handler));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path as registered, without the router prefix.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// The full pattern matched against requests, router prefix included.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn is_match(&self, target_path: &str, wildcard: WildcardMode) -> Option<RouteParams> {
        self.pattern.match_path(target_path, MatchMode::Exact, wildcard)
    }

    pub(crate) async fn process(&self, mut ctx: Context, params: RouteParams) -> Result<Context, RouteError> {
        ctx.scope_mut().capture(params);
        helpers::run_chain(&self.handlers, ctx).await
    }
}

impl<E> Debug for Route<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ method: {:?}, path: {:?}, pattern: {:?}, handlers: {} }}",
            self.method,
            self.path,
            self.pattern.as_str(),
            self.handlers.len()
        )
    }
}
