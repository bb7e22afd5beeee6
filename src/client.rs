use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{EventsError, Result};
use crate::transport::{EventResponse, HttpTransport, Transport};
use crate::types::{Event, EventType};

/// Production endpoint of the generic events API
pub const EVENTS_API_URL: &str =
    "https://events.pagerduty.com/generic/2010-04-15/create_event.json";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for sending events to PagerDuty
///
/// Each operation performs a single POST to the events endpoint — no retries
/// and no pooling beyond what the underlying HTTP client provides. Callers
/// wanting concurrent dispatch should use independent [`Event`] instances on
/// separate tasks.
///
/// # Example
///
/// ```rust,no_run
/// use pagerduty_events_api::{Event, EventsClient, DEFAULT_TIMEOUT};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = EventsClient::new(DEFAULT_TIMEOUT)?;
///
///     let mut event = Event::new()
///         .with_service_key("0123456789abcdef0123456789abcdef")?
///         .with_description("Disk usage above 95% on srv01")?;
///
///     client.trigger(&mut event).await?;
///     println!("incident key: {:?}", event.incident_key());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct EventsClient {
    transport: Arc<dyn Transport>,
    api_url: Url,
}

impl EventsClient {
    /// Create a client targeting the production events endpoint
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout; zero disables it
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let api_url = Url::parse(EVENTS_API_URL).expect("Valid events API URL");
        Self::with_api_url(api_url, timeout)
    }

    /// Create a client targeting a custom endpoint
    pub fn with_api_url(api_url: Url, timeout: Duration) -> Result<Self> {
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(Arc::new(transport), api_url))
    }

    /// Create a client with an injected transport
    ///
    /// This is the seam for tests and custom delivery: pass a
    /// [`NoopTransport`](crate::NoopTransport) to short-circuit network I/O
    /// entirely, or an [`HttpTransport`] wrapping your own middleware client.
    pub fn with_transport(transport: Arc<dyn Transport>, api_url: Url) -> Self {
        Self { transport, api_url }
    }

    /// Get the target API URL
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Trigger a new incident or append to an open one
    ///
    /// If the event carries no incident key the server assigns one, and it
    /// is written back into `event` so a follow-up [`acknowledge`] or
    /// [`resolve`] call can reuse it.
    ///
    /// [`acknowledge`]: Self::acknowledge
    /// [`resolve`]: Self::resolve
    ///
    /// # Errors
    ///
    /// Fails before any I/O if `service_key` or `description` is missing;
    /// otherwise on transport failure, a non-200 status, or an unusable
    /// response body.
    #[instrument(name = "EventsClient::trigger", skip_all)]
    pub async fn trigger(&self, event: &mut Event) -> Result<EventResponse> {
        require(event.service_key(), "service_key")?;
        require(event.description(), "description")?;

        self.send(event, EventType::Trigger).await
    }

    /// Acknowledge the open incident matching the event's incident key
    ///
    /// # Errors
    ///
    /// Fails before any I/O if `service_key` or `incident_key` is missing;
    /// otherwise on transport failure, a non-200 status, or an unusable
    /// response body.
    #[instrument(name = "EventsClient::acknowledge", skip_all)]
    pub async fn acknowledge(&self, event: &mut Event) -> Result<EventResponse> {
        require(event.service_key(), "service_key")?;
        require(event.incident_key(), "incident_key")?;

        self.send(event, EventType::Acknowledge).await
    }

    /// Resolve the open incident matching the event's incident key
    ///
    /// # Errors
    ///
    /// Same conditions as [`acknowledge`](Self::acknowledge).
    #[instrument(name = "EventsClient::resolve", skip_all)]
    pub async fn resolve(&self, event: &mut Event) -> Result<EventResponse> {
        require(event.service_key(), "service_key")?;
        require(event.incident_key(), "incident_key")?;

        self.send(event, EventType::Resolve).await
    }

    async fn send(&self, event: &mut Event, event_type: EventType) -> Result<EventResponse> {
        let wire = event.to_wire(Some(event_type));
        let body = serde_json::to_vec(&wire).map_err(EventsError::Serialize)?;

        debug!(url = %self.api_url, %event_type, "Sending event");

        let response = self.transport.send(&self.api_url, body).await?;

        if let Some(incident_key) = response.get("incident_key").and_then(Value::as_str) {
            event.incident_key = Some(incident_key.to_string());
        }

        debug!("Event accepted");
        Ok(response)
    }
}

// Precondition check, always ahead of serialization and I/O. Empty strings
// count as missing, same as the wire renderer.
fn require(value: Option<&str>, field: &'static str) -> Result<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(EventsError::MissingField { field }),
    }
}
