use crate::app::DEFAULT_BODY_LIMIT;
use crate::matcher::WildcardMode;
use clap::Parser;
use std::net::SocketAddr;

/// Command line and environment configuration of the demo server.
#[derive(Debug, Clone, Parser)]
#[command(name = "routerify-express", version, about = "Express-style routing over hyper")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "EXPRESS_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Secret used to sign and verify account tokens.
    #[arg(long, env = "EXPRESS_JWT_SECRET", default_value = "token-password", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens, in seconds.
    #[arg(long, env = "EXPRESS_TOKEN_TTL_SECS", default_value_t = 86_400)]
    pub token_ttl_secs: u64,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "EXPRESS_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "EXPRESS_LOG", default_value = "info")]
    pub log_filter: String,

    /// How `*` route segments match: `short-circuit` or `rest`.
    #[arg(long, env = "EXPRESS_WILDCARD", default_value_t = WildcardMode::ShortCircuit)]
    pub wildcard: WildcardMode,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            jwt_secret: "token-password".to_owned(),
            token_ttl_secs: 86_400,
            body_limit: DEFAULT_BODY_LIMIT,
            log_filter: "info".to_owned(),
            wildcard: WildcardMode::ShortCircuit,
        }
    }
}
