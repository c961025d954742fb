use std::sync::Arc;

use tokio::task::{AbortHandle, JoinHandle};
use tracing::info;

use crate::error::RelayError;
use crate::models::ScorePayload;

use super::{RelayClient, RelayRequest};

/// A submitted relay request
pub struct PendingAnalysis {
    handle: JoinHandle<Result<ScorePayload, RelayError>>,
}

impl PendingAnalysis {
    /// Wait for the answer. A request superseded or cancelled before it
    /// finished resolves to [`RelayError::Cancelled`].
    pub async fn wait(self) -> Result<ScorePayload, RelayError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(RelayError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

/// Keeps at most one relay request in flight. Submitting a new request
/// cancels the previous one; nothing is retried automatically.
pub struct RelaySession {
    client: Arc<RelayClient>,
    in_flight: Option<AbortHandle>,
}

impl RelaySession {
    pub fn new(client: RelayClient) -> Self {
        Self {
            client: Arc::new(client),
            in_flight: None,
        }
    }

    /// Start a request, cancelling any that is still running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, request: RelayRequest) -> PendingAnalysis {
        self.cancel();

        let client = Arc::clone(&self.client);
        let handle = tokio::spawn(async move { client.analyze(&request).await });
        self.in_flight = Some(handle.abort_handle());

        PendingAnalysis { handle }
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                info!("Cancelling in-flight relay request");
                previous.abort();
            }
        }
    }
}
