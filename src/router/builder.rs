use crate::context::Context;
use crate::matcher::WildcardMode;
use crate::middleware::Middleware;
use crate::router::Router;
use crate::{Error, RouteError};
use hyper::Method;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<E>` type accepts a single type parameter: `E`, the error type of the route
/// handlers and middleware.
///
/// # Examples
///
/// ```
/// use routerify_express::{Context, Middleware, Router};
/// use std::convert::Infallible;
///
/// async fn home(mut ctx: Context) -> Result<Context, Infallible> {
///     ctx.text("home");
///     Ok(ctx)
/// }
///
/// async fn logger(ctx: Context) -> Result<Context, Infallible> {
///     println!("{} {}", ctx.method(), ctx.path());
///     Ok(ctx)
/// }
///
/// fn run() -> Router<Infallible> {
///     Router::builder("/api")
///         .middleware(Middleware::new(logger))
///         .get("/", home)
///         .build()
///         .unwrap()
/// }
/// # run();
/// ```
pub struct RouterBuilder<E> {
    inner: crate::Result<Router<E>>,
    last_route: Option<Method>,
}

impl<E: Into<RouteError> + 'static> RouterBuilder<E> {
    pub fn new<P: Into<String>>(prefix: P) -> RouterBuilder<E> {
        RouterBuilder {
            inner: Router::new(prefix),
            last_route: None,
        }
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<Router<E>> {
        self.inner
    }

    fn and_then<F: FnOnce(Router<E>) -> crate::Result<Router<E>>>(self, func: F) -> Self {
        RouterBuilder {
            inner: self.inner.and_then(func),
            last_route: self.last_route,
        }
    }

    /// Adds a new route with the specified method and handler at the specified path.
    pub fn add<P, H, R>(mut self, method: Method, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.last_route = Some(method.clone());
        self.and_then(move |mut router| {
            router.add(method, path, handler)?;
            Ok(router)
        })
    }

    /// Adds a new route with `GET` method and the handler at the specified path.
    pub fn get<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    /// Adds a new route with `POST` method and the handler at the specified path.
    pub fn post<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    /// Adds a new route with `PUT` method and the handler at the specified path.
    pub fn put<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    /// Adds a new route with `DELETE` method and the handler at the specified path.
    pub fn delete<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    /// Appends a handler to the chain of the most recently added route.
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_express::{Context, Router};
    /// use std::convert::Infallible;
    ///
    /// let router: Router<Infallible> = Router::builder("/api/http")
    ///     .get("/32", |mut ctx: Context| async move {
    ///         ctx.set_value("wow", "nice").unwrap();
    ///         Ok(ctx)
    ///     })
    ///     .then(|mut ctx: Context| async move {
    ///         ctx.json(&serde_json::json!({ "lol": 32 })).unwrap();
    ///         Ok(ctx)
    ///     })
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn then<H, R>(self, handler: H) -> Self
    where
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        let method = self.last_route.clone();
        self.and_then(move |mut router| {
            let method = method.ok_or_else(|| Error::builder("`then` called before any route was added"))?;
            router
                .routes_mut(&method)?
                .last_mut()
                .ok_or_else(|| Error::builder("`then` called before any route was added"))?
                .then(handler);
            Ok(router)
        })
    }

    /// Adds a middleware. Middlewares run in the order they are added, before any route handler.
    pub fn middleware(self, m: Middleware<E>) -> Self {
        self.and_then(move |mut router| {
            router.middleware(m);
            Ok(router)
        })
    }

    /// Chooses how `*` segments match. Defaults to [`WildcardMode::ShortCircuit`].
    pub fn wildcard_mode(self, mode: WildcardMode) -> Self {
        self.and_then(move |mut router| {
            router.set_wildcard_mode(mode);
            Ok(router)
        })
    }
}

impl<E> Debug for RouterBuilder<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Ok(router) => write!(f, "RouterBuilder {{ inner: {:?} }}", router),
            Err(err) => write!(f, "RouterBuilder {{ error: {} }}", err),
        }
    }
}
