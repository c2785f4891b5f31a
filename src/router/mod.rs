use crate::context::Context;
use crate::matcher::{MatchMode, Pattern, WildcardMode};
use crate::middleware::{self, Middleware};
use crate::route::{into_handler, Route};
use crate::types::RouteParams;
use crate::{Error, RouteError};
use hyper::Method;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

pub use self::builder::RouterBuilder;

mod builder;

/// What a router made of a request it was handed.
#[derive(Debug)]
pub enum Outcome {
    /// A middleware finished the request, or a route's handler chain ran.
    Handled(Context),
    /// No route of the request method matched the path. Not an error.
    Unmatched(Context),
}

impl Outcome {
    pub fn into_context(self) -> Context {
        match self {
            Outcome::Handled(ctx) | Outcome::Unmatched(ctx) => ctx,
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }
}

/// A prefix router: routes grouped under a path prefix plus the middleware that runs before them.
///
/// This `Router<E>` type accepts a single type parameter: `E`, the error type of its route
/// handlers and middleware. It must be convertible into a [`RouteError`](./type.RouteError.html),
/// which any `std::error::Error + Send + Sync` is.
///
/// Routes are kept per method (GET, POST, PUT and DELETE) and tried in registration order; the
/// first route whose `prefix + path` matches the request runs and no other route is tried.
///
/// # Examples
///
/// ```
/// use routerify_express::{Context, Router};
/// use std::convert::Infallible;
///
/// async fn show(mut ctx: Context) -> Result<Context, Infallible> {
///     let id = ctx.param("id").unwrap_or_default().to_owned();
///     ctx.text(id);
///     Ok(ctx)
/// }
///
/// let mut router: Router<Infallible> = Router::new("/api/go").unwrap();
/// router.get("/lol/:id", show).unwrap();
/// assert_eq!(router.routes(&hyper::Method::GET).unwrap().len(), 1);
/// ```
pub struct Router<E> {
    prefix: String,
    prefix_pattern: Pattern,
    middlewares: Vec<Middleware<E>>,
    get_routes: Vec<Route<E>>,
    post_routes: Vec<Route<E>>,
    put_routes: Vec<Route<E>>,
    delete_routes: Vec<Route<E>>,
    wildcard: WildcardMode,
}

impl<E: Into<RouteError> + 'static> Router<E> {
    /// Creates an empty router mounted at `prefix`. An empty prefix or `/` matches every path.
    pub fn new<P: Into<String>>(prefix: P) -> crate::Result<Router<E>> {
        let prefix = prefix.into();
        let prefix_pattern = Pattern::parse(prefix.as_str())?;

        Ok(Router {
            prefix,
            prefix_pattern,
            middlewares: Vec::new(),
            get_routes: Vec::new(),
            post_routes: Vec::new(),
            put_routes: Vec::new(),
            delete_routes: Vec::new(),
            wildcard: WildcardMode::default(),
        })
    }

    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder<P: Into<String>>(prefix: P) -> RouterBuilder<E> {
        RouterBuilder::new(prefix)
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn wildcard_mode(&self) -> WildcardMode {
        self.wildcard
    }

    /// Chooses how `*` segments match, for the prefix and every route of this router.
    pub fn set_wildcard_mode(&mut self, mode: WildcardMode) -> &mut Router<E> {
        self.wildcard = mode;
        self
    }

    /// Attaches a middleware. Middlewares run in the order they are attached.
    pub fn middleware(&mut self, m: Middleware<E>) -> &mut Router<E> {
        self.middlewares.push(m);
        self
    }

    /// Registers a route and returns it so more handlers can be chained with
    /// [`Route::then`](./struct.Route.html#method.then).
    pub fn add<P, H, R>(&mut self, method: Method, path: P, handler: H) -> crate::Result<&mut Route<E>>
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        let route = Route::new_with_boxed_handler(method.clone(), self.prefix.as_str(), path.into(), into_handler(handler))?;
        let routes = self.routes_mut(&method)?;
        routes.push(route);

        // just pushed
        routes
            .last_mut()
            .ok_or_else(|| Error::builder("route list is empty after registration"))
    }

    pub fn get<P, H, R>(&mut self, path: P, handler: H) -> crate::Result<&mut Route<E>>
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<P, H, R>(&mut self, path: P, handler: H) -> crate::Result<&mut Route<E>>
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    pub fn put<P, H, R>(&mut self, path: P, handler: H) -> crate::Result<&mut Route<E>>
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    pub fn delete<P, H, R>(&mut self, path: P, handler: H) -> crate::Result<&mut Route<E>>
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    /// The routes registered for `method`, in registration order.
    pub fn routes(&self, method: &Method) -> crate::Result<&[Route<E>]> {
        let routes = match *method {
            Method::GET => &self.get_routes,
            Method::POST => &self.post_routes,
            Method::PUT => &self.put_routes,
            Method::DELETE => &self.delete_routes,
            _ => return Err(Error::UnsupportedMethod(method.clone())),
        };
        Ok(routes.as_slice())
    }

    fn routes_mut(&mut self, method: &Method) -> crate::Result<&mut Vec<Route<E>>> {
        match *method {
            Method::GET => Ok(&mut self.get_routes),
            Method::POST => Ok(&mut self.post_routes),
            Method::PUT => Ok(&mut self.put_routes),
            Method::DELETE => Ok(&mut self.delete_routes),
            _ => Err(Error::UnsupportedMethod(method.clone())),
        }
    }

    /// Checks whether the request path starts with this router's prefix.
    pub fn match_prefix(&self, target_path: &str) -> Option<RouteParams> {
        self.prefix_pattern
            .match_path(target_path, MatchMode::Prefix, self.wildcard)
    }

    /// Resolves one request against this router.
    ///
    /// Runs the middlewares, then the handler chain of the first route matching the request method
    /// and path. A handler error aborts the chain and is returned as [`Error::Handler`]; a method
    /// other than GET, POST, PUT or DELETE is [`Error::UnsupportedMethod`].
    pub async fn dispatch(&self, ctx: Context) -> crate::Result<Outcome> {
        let ctx = middleware::run(&self.middlewares, ctx).await.map_err(Error::Handler)?;

        if ctx.is_finished() {
            tracing::debug!(prefix = %self.prefix, "request finished by router middleware");
            return Ok(Outcome::Handled(ctx));
        }

        let routes = self.routes(ctx.method())?;

        let found = routes
            .iter()
            .find_map(|route| route.is_match(ctx.path(), self.wildcard).map(|params| (route, params)));

        match found {
            Some((route, params)) => {
                tracing::debug!(pattern = %route.pattern(), "route matched");
                let ctx = route.process(ctx, params).await.map_err(Error::Handler)?;
                Ok(Outcome::Handled(ctx))
            }
            None => Ok(Outcome::Unmatched(ctx)),
        }
    }
}

impl<E> Debug for Router<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ prefix: {:?}, middlewares: {:?}, get: {:?}, post: {:?}, put: {:?}, delete: {:?} }}",
            self.prefix, self.middlewares, self.get_routes, self.post_routes, self.put_routes, self.delete_routes
        )
    }
}
