use crate::app::App;
use crate::context::Context;
use crate::helpers;
use crate::types::{RequestId, RequestInfo};
use crate::{Error, RouteError};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::{service::Service, Request, Response};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Serves the requests of one connection.
pub struct RequestService<E> {
    pub(crate) app: Arc<App<E>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<T, E> Service<Request<T>> for RequestService<E>
where
    E: Into<RouteError> + 'static,
    T: Body + Send + 'static,
    T::Data: Send,
    T::Error: Into<RouteError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<T>) -> Self::Future {
        let app = self.app.clone();
        let remote_addr = self.remote_addr;
        let id = RequestId::next();
        let span = tracing::info_span!(
            "request",
            request_id = %id,
            method = %req.method(),
            path = %req.uri().path(),
        );

        let fut = async move {
            let started = Instant::now();
            let res = handle(app, id, remote_addr, req).await;
            tracing::info!(
                status = res.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request completed"
            );
            Ok(res)
        };

        Box::pin(fut.instrument(span))
    }
}

async fn handle<T, E>(app: Arc<App<E>>, id: RequestId, remote_addr: SocketAddr, req: Request<T>) -> Response<Full<Bytes>>
where
    E: Into<RouteError> + 'static,
    T: Body + Send + 'static,
    T::Data: Send,
    T::Error: Into<RouteError>,
{
    let (parts, body) = req.into_parts();

    let req_info = if app.should_gen_req_info() {
        Some(RequestInfo::new_from_parts(id, &parts, remote_addr))
    } else {
        None
    };

    let target_path = match helpers::percent_decode_request_path(parts.uri.path()) {
        Ok(path) => path,
        Err(e) => return app.handle_error(Error::PathDecode(e.to_string()), req_info).await,
    };

    let body = match Limited::new(body, app.body_limit()).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => return app.handle_error(Error::Body(e), req_info).await,
    };

    let ctx = Context::new(id, parts, target_path, body, remote_addr, app.data());
    app.dispatch(ctx).await
}

/// Builds a [`RequestService`] per connection, all sharing one [`App`].
#[derive(Debug)]
pub struct RequestServiceBuilder<E> {
    app: Arc<App<E>>,
}

impl<E: Into<RouteError> + 'static> RequestServiceBuilder<E> {
    pub fn new(app: App<E>) -> Self {
        Self { app: Arc::from(app) }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<E> {
        RequestService {
            app: self.app.clone(),
            remote_addr,
        }
    }
}
