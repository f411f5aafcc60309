//! # Integration Tests
//!
//! End-to-end tests against a stub receiver.
//!
//! Responsibilities:
//! - Stub receiver recording signed requests
//! - Log capture for warning assertions
//! - Full path: config -> dispatcher -> HTTP -> receiver

pub mod log_capture;
pub mod stub_receiver;

pub use log_capture::LogBuffer;
pub use stub_receiver::{RecordedRequest, StubReceiver};

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ConnectorBlueprint, Timestamp};
    use dispatcher::{create_dispatcher, DispatchMetrics};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use super::{LogBuffer, StubReceiver};

    const CONNECTOR_ID: &str = "connector-1";
    const CONNECTOR_KEY: &str = "secret-key";
    const WAIT: Duration = Duration::from_secs(5);

    fn blueprint(port: u16, interval: u64) -> ConnectorBlueprint {
        let content = format!(
            r#"{{
                "sensorId": "S1",
                "credentials": {{ "connectorId": "{CONNECTOR_ID}", "connectorKey": "{CONNECTOR_KEY}" }},
                "receiver": {{ "host": "127.0.0.1", "port": {port}, "useSsl": false, "trustAll": false }},
                "interval": {interval}
            }}"#
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Json).unwrap()
    }

    /// Poll until `check` holds or the wait budget is spent
    async fn wait_until(metrics: &DispatchMetrics, check: impl Fn(&DispatchMetrics) -> bool) {
        let deadline = tokio::time::Instant::now() + WAIT;
        while !check(metrics) && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn expected_signature(timestamp: &str, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(CONNECTOR_KEY.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(body.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Receiver answers 204: one signed PUT to `/`, no warning logged
    #[tokio::test]
    async fn test_e2e_signed_put_accepted() {
        let logs = LogBuffer::new();
        let _guard = logs.capture();

        let receiver = StubReceiver::start(204, "").await.unwrap();
        let running = create_dispatcher(&blueprint(receiver.port(), 150), Some(WAIT))
            .unwrap()
            .start();

        let requests = receiver.wait_for(1, WAIT).await;
        wait_until(running.metrics(), |m| m.delivered() >= 1).await;
        let snapshot = running.stop().await;
        receiver.shutdown().await;

        assert!(!requests.is_empty(), "receiver got no request");
        let request = &requests[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path, "/");
        assert_eq!(request.header("content-type"), Some("application/json"));

        // Authorization: UPConnector b64(id):b64(hmac)
        let authorization = request.header("authorization").unwrap();
        let credentials = authorization.strip_prefix("UPConnector ").unwrap();
        let (id, signature) = credentials.split_once(':').unwrap();
        assert_eq!(STANDARD.decode(id).unwrap(), CONNECTOR_ID.as_bytes());

        let timestamp = request.header("urbanpulse-timestamp").unwrap();
        assert!(Timestamp::parse(timestamp).is_ok(), "bad timestamp {timestamp}");
        assert!(timestamp.ends_with("+0000"));
        assert_eq!(signature, expected_signature(timestamp, &request.body));

        // Body: exactly one reading with SID / timestamp / value
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        let reading = data[0].as_object().unwrap();
        assert_eq!(reading.len(), 3);
        assert_eq!(reading["SID"], "S1");
        assert!(reading["timestamp"].is_string());
        let value = reading["value"].as_f64().unwrap();
        assert!((0.0..1.0).contains(&value));

        assert!(snapshot.delivered >= 1);
        assert_eq!(snapshot.unexpected_status, 0);
        assert!(
            logs.lines_at("WARN").is_empty(),
            "unexpected warnings:\n{}",
            logs.lines_at("WARN").join("\n")
        );
        assert!(logs
            .contents()
            .contains("Sensor event data was sent successfully"));
    }

    /// Nothing before the first interval, exactly one PUT shortly after it
    #[tokio::test]
    async fn test_e2e_exactly_one_put_per_interval() {
        let receiver = StubReceiver::start(204, "").await.unwrap();
        let started = tokio::time::Instant::now();
        let running = create_dispatcher(&blueprint(receiver.port(), 150), Some(WAIT))
            .unwrap()
            .start();

        tokio::time::sleep_until(started + Duration::from_millis(100)).await;
        let early = receiver.requests().len();

        tokio::time::sleep_until(started + Duration::from_millis(225)).await;
        let after_one_interval = receiver.requests().len();

        let snapshot = running.stop().await;
        receiver.shutdown().await;

        assert_eq!(early, 0, "request sent before the first interval elapsed");
        assert_eq!(after_one_interval, 1, "expected exactly one PUT");
        assert_eq!(snapshot.ticks, 1);
    }

    /// Receiver answers 500 "oops": warning with status and body, schedule keeps going
    #[tokio::test]
    async fn test_e2e_unexpected_status_warns_and_continues() {
        let logs = LogBuffer::new();
        let _guard = logs.capture();

        let receiver = StubReceiver::start(500, "oops").await.unwrap();
        let running = create_dispatcher(&blueprint(receiver.port(), 150), Some(WAIT))
            .unwrap()
            .start();

        let requests = receiver.wait_for(2, WAIT).await;
        wait_until(running.metrics(), |m| m.unexpected_status() >= 2).await;
        let snapshot = running.stop().await;
        receiver.shutdown().await;

        assert!(requests.len() >= 2, "second tick did not fire");
        assert!(snapshot.unexpected_status >= 2);
        assert_eq!(snapshot.delivered, 0);

        let warnings = logs.lines_at("WARN");
        assert!(
            warnings
                .iter()
                .any(|line| line.contains("500") && line.contains("oops")),
            "no matching warning in:\n{}",
            logs.contents()
        );
    }

    /// Nothing listens: every tick fails in transport, later ticks still fire
    #[tokio::test]
    async fn test_e2e_transport_failure_is_contained() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let running = create_dispatcher(&blueprint(port, 100), Some(WAIT))
            .unwrap()
            .start();

        wait_until(running.metrics(), |m| m.transport_failures() >= 2).await;
        let snapshot = running.stop().await;

        assert!(snapshot.ticks >= 2);
        assert!(snapshot.transport_failures >= 2);
        assert_eq!(snapshot.sent(), 0);
    }

    /// Every request carries a signature over its own body
    #[tokio::test]
    async fn test_e2e_each_request_signed_over_its_own_body() {
        let receiver = StubReceiver::start(204, "").await.unwrap();
        let running = create_dispatcher(&blueprint(receiver.port(), 100), Some(WAIT))
            .unwrap()
            .start();

        let requests = receiver.wait_for(2, WAIT).await;
        running.stop().await;
        receiver.shutdown().await;

        assert!(requests.len() >= 2);
        for request in &requests {
            let timestamp = request.header("urbanpulse-timestamp").unwrap();
            let (_, signature) = request
                .header("authorization")
                .unwrap()
                .rsplit_once(':')
                .unwrap();
            assert_eq!(signature, expected_signature(timestamp, &request.body));
        }
        assert_ne!(requests[0].body, requests[1].body);
    }
}
