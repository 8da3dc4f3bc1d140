use crate::{BrokerError, RequestContext, Result as BrokerErrorResult};

use log::error;

/// Runs a handler on its own task so a panic becomes an `INTERNAL_ERROR`
/// reply instead of taking the connection down.
pub async fn with_error_boundary<F, Fut>(
    ctx: &RequestContext,
    handler_name: &str,
    handler: F,
) -> BrokerErrorResult<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = BrokerErrorResult<()>> + Send + 'static,
{
    match tokio::spawn(async move { handler().await }).await {
        Ok(result) => result,
        Err(join_error) => {
            let reason = if join_error.is_panic() {
                match join_error.into_panic().downcast::<String>() {
                    Ok(msg) => *msg,
                    Err(any) => match any.downcast::<&str>() {
                        Ok(msg) => msg.to_string(),
                        Err(_) => "unknown panic".to_string(),
                    },
                }
            } else {
                "task cancelled".to_string()
            };

            error!(
                "{} Handler {handler_name} panicked: {reason}",
                ctx.log_prefix()
            );
            Err(BrokerError::internal(format!(
                "handler {handler_name} panicked: {reason}"
            )))
        }
    }
}
