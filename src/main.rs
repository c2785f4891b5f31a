use clap::Parser;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routerify_express::auth::MemoryStore;
use routerify_express::{api, AppService, Config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        addr = %config.addr,
        wildcard = %config.wildcard,
        body_limit = config.body_limit,
        "configuration loaded"
    );

    let app = api::app(&config, Arc::new(MemoryStore::new()))?;
    let service = Arc::new(AppService::new(app));

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        tracing::warn!(error = %err, "couldn't accept connection");
                        continue;
                    }
                };
                let service = Arc::clone(&service);

                tokio::spawn(async move {
                    let request_service = match service.call(&stream).await {
                        Ok(request_service) => request_service,
                        Err(never) => match never {},
                    };
                    let io = TokioIo::new(stream);
                    if let Err(err) = Builder::new(TokioExecutor::new()).serve_connection(io, request_service).await {
                        tracing::debug!(%peer, error = %err, "connection closed with an error");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
