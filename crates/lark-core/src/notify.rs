use std::sync::Arc;

use async_trait::async_trait;

/// Operator-facing notification channel.
///
/// Best-effort, fire-and-forget: the core reports evaluation failures here
/// and never inspects the outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, error: &str, context: &str);
}

/// Shared handle to a notification channel.
pub type NotifierHandle = Arc<dyn Notifier>;
