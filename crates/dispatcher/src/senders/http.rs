//! ReqwestSender - HTTP(S) transport to the receiver

use std::time::Duration;

use contracts::{
    HttpMethod, HttpSender, InboundResponse, OutboundRequest, ReceiverConfig, TransportError,
};
use reqwest::{Client, Method};
use tracing::{debug, instrument, warn};

use crate::error::DispatcherError;

/// Configuration for ReqwestSender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSenderConfig {
    /// `scheme://host:port`
    pub base_url: String,
    /// Accept any server certificate
    pub trust_all: bool,
    /// Whole-request deadline (None = client default)
    pub request_timeout: Option<Duration>,
}

impl HttpSenderConfig {
    /// Create config from the receiver section
    pub fn from_receiver(receiver: &ReceiverConfig) -> Self {
        Self {
            base_url: receiver.base_url(),
            trust_all: receiver.trust_all,
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Sender backed by a pooled reqwest client
pub struct ReqwestSender {
    name: String,
    base_url: String,
    client: Client,
}

impl ReqwestSender {
    /// Build the client
    ///
    /// # Errors
    /// `SenderCreation` if the TLS backend cannot be initialized.
    #[instrument(name = "reqwest_sender_new", skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: HttpSenderConfig) -> Result<Self, DispatcherError> {
        let name = "http".to_string();

        if config.trust_all {
            warn!(base_url = %config.base_url, "Certificate validation disabled (trustAll)");
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(config.trust_all);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DispatcherError::sender_creation(&name, e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        debug!(sender = %name, base_url = %base_url, "ReqwestSender ready");

        Ok(Self {
            name,
            base_url,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Put => Method::PUT,
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::connect(e.to_string())
    } else {
        TransportError::request(e.to_string())
    }
}

impl HttpSender for ReqwestSender {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "reqwest_sender_send",
        skip(self, request),
        fields(sender = %self.name, method = request.method.as_str(), path = %request.path)
    )]
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(method(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // Raw body: the signature covers these exact bytes
        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status, bytes = body.len(), "Response read");

        Ok(InboundResponse::new(status, body))
    }
}
