use crate::context::Context;
use crate::route::Handler;
use crate::RouteError;
use percent_encoding::percent_decode_str;
use std::pin::Pin;

pub(crate) fn percent_decode_request_path(val: &str) -> Result<String, std::str::Utf8Error> {
    percent_decode_str(val).decode_utf8().map(|val| val.to_string())
}

/// Runs handlers in order until one fails or the request is finished.
pub(crate) async fn run_chain<E>(handlers: &[Handler<E>], mut ctx: Context) -> Result<Context, RouteError>
where
    E: Into<RouteError> + 'static,
{
    for handler in handlers {
        if ctx.is_finished() {
            break;
        }
        ctx = Pin::from(handler(ctx)).await.map_err(Into::into)?;
    }

    Ok(ctx)
}
