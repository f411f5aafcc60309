//! LogSender - logs requests via tracing instead of sending them

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{
    HttpSender, InboundResponse, OutboundRequest, TransportError, AUTHORIZATION_HEADER,
    TIMESTAMP_HEADER,
};
use tracing::{info, instrument};

/// Sender for dry runs
///
/// Every request is answered with `204 No Content`.
pub struct LogSender {
    name: String,
    sent: AtomicU64,
}

impl LogSender {
    /// Create a new LogSender with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: AtomicU64::new(0),
        }
    }

    /// Requests seen so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    fn log_request(&self, request: &OutboundRequest) {
        info!(
            sender = %self.name,
            method = request.method.as_str(),
            path = %request.path,
            timestamp = request.header_value(TIMESTAMP_HEADER).unwrap_or_default(),
            signed = request.header_value(AUTHORIZATION_HEADER).is_some(),
            body = %request.body,
            "Request not sent (dry run)"
        );
    }
}

impl HttpSender for LogSender {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sender_send", skip(self, request), fields(sender = %self.name))]
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        self.log_request(&request);
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(InboundResponse::new(204, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::HttpMethod;

    #[tokio::test]
    async fn test_log_sender_answers_no_content() {
        let sender = LogSender::new("dry-run");
        let request = OutboundRequest {
            method: HttpMethod::Put,
            path: "/".to_string(),
            headers: Vec::new(),
            body: "{}".to_string(),
        };

        let response = sender.send(request).await.unwrap();
        assert!(response.is_no_content());
        assert_eq!(sender.sent(), 1);
        assert_eq!(sender.name(), "dry-run");
    }
}
