use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::errors::{EventsError, Result};

/// Decoded response mapping returned by the events API
///
/// Typically carries `status`, `message` and optionally `incident_key`, but
/// no schema is enforced beyond being a non-empty JSON object.
pub type EventResponse = Map<String, Value>;

/// Delivery mechanism for serialized events
///
/// [`EventsClient`](crate::EventsClient) renders the JSON body and hands it
/// to a transport. Injecting a different implementation (a test double, or
/// [`NoopTransport`]) keeps unit tests deterministic and off the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one serialized event and return the decoded response mapping
    async fn send(&self, url: &Url, body: Vec<u8>) -> Result<EventResponse>;
}

/// HTTP transport backed by reqwest
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    ///
    /// The timeout applies to both the connection and the total transfer. A
    /// zero duration disables it entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder.build().map_err(EventsError::BuildHttpClient)?;

        Ok(Self::with_client(ClientBuilder::new(client).build()))
    }

    /// Create a transport from a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (logging, auth, etc.)
    pub fn with_client(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &Url, body: Vec<u8>) -> Result<EventResponse> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| EventsError::Transport {
                message: err.to_string(),
            })?;

        // The API signals success with 200 exactly, not any 2xx.
        let status = response.status().as_u16();
        if status != 200 {
            return Err(EventsError::UnexpectedStatus { status });
        }

        let body = response
            .text()
            .await
            .map_err(|err| EventsError::Transport {
                message: err.to_string(),
            })?;

        debug!(status, "Received events API response");

        // An unparseable body and a body that parses to nothing land in the
        // same error, raw body attached.
        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        if !has_content(&json) {
            return Err(EventsError::InvalidResponse { body });
        }
        match json {
            Value::Object(map) => Ok(map),
            _ => Err(EventsError::InvalidResponse { body }),
        }
    }
}

/// Transport that drops events instead of delivering them
///
/// Sends always succeed with an empty response mapping and perform no I/O.
/// Intended for unit tests and dry-run wiring.
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn send(&self, _url: &Url, _body: Vec<u8>) -> Result<EventResponse> {
        Ok(EventResponse::new())
    }
}

// Loose JSON truthiness: null, false, zero, the empty string and empty
// containers all count as no content.
fn has_content(json: &Value) -> bool {
    match json {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_contentless_json_values() {
        assert!(!has_content(&Value::Null));
        assert!(!has_content(&json!(false)));
        assert!(!has_content(&json!(0)));
        assert!(!has_content(&json!(0.0)));
        assert!(!has_content(&json!("")));
        assert!(!has_content(&json!([])));
        assert!(!has_content(&json!({})));

        assert!(has_content(&json!(true)));
        assert!(has_content(&json!(1)));
        assert!(has_content(&json!("ok")));
        assert!(has_content(&json!([1])));
        assert!(has_content(&json!({"status": "success"})));
    }

    #[tokio::test]
    async fn test_noop_transport_returns_empty_mapping() {
        let url = Url::parse("https://events.invalid/").unwrap();
        let response = NoopTransport.send(&url, Vec::new()).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_http_transport_posts_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"service_key": null})))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#),
            )
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let body = br#"{"service_key":null}"#.to_vec();

        let response = transport.send(&url, body).await.unwrap();
        assert_eq!(response.get("status"), Some(&json!("success")));
    }

    #[tokio::test]
    async fn test_http_transport_rejects_non_object_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1, 2]"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();

        let err = transport.send(&url, b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, EventsError::InvalidResponse { body } if body == "[1, 2]"));
    }

    #[tokio::test]
    async fn test_http_transport_surfaces_connection_errors() {
        // Nothing listens on the discard port.
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();

        let err = transport.send(&url, b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, EventsError::Transport { .. }));
        assert!(err.is_retryable());
    }
}
