#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use hyper::{Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routerify_express::{App, AppService, RouteError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};

pub struct Serve {
    addr: SocketAddr,
    tx: Sender<()>,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    /// Sends a request and returns the status and the body as text.
    pub async fn send(&self, req: Request<Full<Bytes>>) -> (StatusCode, String) {
        let res = self.client.request(req).await.unwrap();
        let status = res.status();
        (status, into_text(res.into_body()).await)
    }

    pub async fn get(&self, route: &str) -> (StatusCode, String) {
        self.send(self.new_request("GET", route).body(Full::default()).unwrap())
            .await
    }

    pub async fn send_body(&self, method: &str, route: &str, body: &str) -> (StatusCode, String) {
        let req = self
            .new_request(method, route)
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap();
        self.send(req).await
    }

    pub fn shutdown(self) {
        let _ = self.tx.send(());
    }
}

pub async fn serve<E>(app: App<E>) -> Serve
where
    E: Into<RouteError> + 'static,
{
    // Bind a TCP listener to an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(AppService::new(app));
    let (tx, mut rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, _) = accepted.unwrap();
                    let service = service.clone();
                    tokio::spawn(async move {
                        let request_service = service.call(&stream).await.unwrap();
                        let io = TokioIo::new(stream);
                        let _ = Builder::new(TokioExecutor::new())
                            .serve_connection(io, request_service)
                            .await;
                    });
                }
                _ = &mut rx => break,
            }
        }
    });

    let client = Client::builder(TokioExecutor::new()).build_http();
    Serve { addr, tx, client }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::fmt::Debug,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
