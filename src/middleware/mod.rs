use crate::context::Context;
use crate::helpers;
use crate::route::{into_handler, Handler};
use crate::RouteError;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// A middleware runs before the routes of the router (or application) it is attached to.
///
/// It has the same shape as a route handler: it takes the [`Context`](./struct.Context.html) and
/// hands it back. Returning an error aborts the request, and finishing the request (e.g. with
/// [`Context::json`](./struct.Context.html#method.json)) stops every later middleware and handler.
///
/// # Examples
///
/// ```
/// use routerify_express::{Context, Middleware, Router};
/// use std::convert::Infallible;
///
/// async fn logger(ctx: Context) -> Result<Context, Infallible> {
///     println!("{} {} {}", ctx.remote_addr(), ctx.method(), ctx.path());
///     Ok(ctx)
/// }
///
/// let mut router: Router<Infallible> = Router::new("/api").unwrap();
/// router.middleware(Middleware::new(logger));
/// ```
pub struct Middleware<E> {
    pub(crate) handler: Handler<E>,
}

impl<E: Into<RouteError> + 'static> Middleware<E> {
    pub fn new<H, R>(handler: H) -> Middleware<E>
    where
        H: Fn(Context) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Context, E>> + Send + 'static,
    {
        Middleware {
            handler: into_handler(handler),
        }
    }
}

impl<E> Debug for Middleware<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware")
    }
}

/// Runs a middleware chain in registration order.
pub(crate) async fn run<E>(middlewares: &[Middleware<E>], ctx: Context) -> Result<Context, RouteError>
where
    E: Into<RouteError> + 'static,
{
    let mut ctx = ctx;
    for middleware in middlewares {
        if ctx.is_finished() {
            break;
        }
        ctx = helpers::run_chain(std::slice::from_ref(&middleware.handler), ctx).await?;
    }
    Ok(ctx)
}
