//! SignerHandle - signing service with isolated queue and worker task
//!
//! Requests travel over a bounded channel; each carries a one-shot reply slot.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use contracts::AuthHeaders;

use crate::error::SigningError;
use crate::signer::Signer;

type SignReply = Result<AuthHeaders, SigningError>;

/// One request/reply exchange with the signing worker
struct SignRequest {
    body: String,
    reply: oneshot::Sender<SignReply>,
}

/// Handle to a running signing worker
///
/// Owns the worker; `shutdown` unregisters it.
pub struct SignerHandle {
    /// Connector id (for logging)
    connector_id: String,
    /// Channel to send requests to worker
    tx: mpsc::Sender<SignRequest>,
    /// Stops the worker even while clients are alive
    shutdown: CancellationToken,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl SignerHandle {
    /// Create a new SignerHandle and spawn the worker task
    pub fn spawn(signer: Signer, queue_capacity: usize) -> Self {
        let connector_id = signer.connector_id().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let shutdown = CancellationToken::new();

        let worker_shutdown = shutdown.clone();
        let worker_handle = tokio::spawn(async move {
            signer_worker(signer, rx, worker_shutdown).await;
        });

        Self {
            connector_id,
            tx,
            shutdown,
            worker_handle,
        }
    }

    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    /// Cheap client for issuing sign requests from other tasks
    pub fn client(&self) -> SignerClient {
        SignerClient {
            tx: self.tx.clone(),
        }
    }

    /// Stop the signing worker
    ///
    /// Requests still queued are answered with `SigningError::Unavailable`.
    #[instrument(
        name = "signer_handle_shutdown",
        skip(self),
        fields(connector = %self.connector_id)
    )]
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(connector = %self.connector_id, error = ?e, "Signing worker panicked");
        }
        debug!(connector = %self.connector_id, "SignerHandle shutdown complete");
    }
}

/// Client side of the signing service
#[derive(Clone)]
pub struct SignerClient {
    tx: mpsc::Sender<SignRequest>,
}

impl SignerClient {
    /// Request authentication headers for `body`
    ///
    /// Suspends until the worker replies.
    ///
    /// # Errors
    /// The worker's `SigningError`, or `Unavailable` if the service is stopped.
    pub async fn sign(&self, body: impl Into<String>) -> Result<AuthHeaders, SigningError> {
        let (reply, response) = oneshot::channel();
        let request = SignRequest {
            body: body.into(),
            reply,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| SigningError::Unavailable)?;

        response.await.map_err(|_| SigningError::Unavailable)?
    }
}

/// Worker task that consumes sign requests and replies
#[instrument(name = "signer_worker_loop", skip_all, fields(connector = %signer.connector_id()))]
async fn signer_worker(
    signer: Signer,
    mut rx: mpsc::Receiver<SignRequest>,
    shutdown: CancellationToken,
) {
    info!("Signing service started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            request = rx.recv() => match request {
                Some(request) => serve(&signer, request),
                None => break,
            },
        }
    }

    // Queued requests are dropped with their reply slots
    rx.close();
    info!("Signing service stopped");
}

fn serve(signer: &Signer, request: SignRequest) {
    let SignRequest { body, reply } = request;
    debug!(body = %body, "Generating hmac authentication headers");

    let result = signer.sign(&body);
    match &result {
        Ok(_) => debug!("Generated authentication headers"),
        Err(e) => error!(error = %e, "Failed to generate authentication headers"),
    }

    if reply.send(result).is_err() {
        debug!("Requester gone before reply");
    }
}
