use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

use crate::errors::{EventsError, Result};

/// Event lifecycle actions understood by the events API
///
/// An event type is chosen per send operation and is not stored on the
/// payload itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Trigger,
    Acknowledge,
    Resolve,
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Trigger => write!(f, "trigger"),
            EventType::Acknowledge => write!(f, "acknowledge"),
            EventType::Resolve => write!(f, "resolve"),
        }
    }
}

/// PagerDuty event payload
///
/// One event describes a single incident action: trigger, acknowledge or
/// resolve. The same payload can be reused across calls; after a trigger the
/// server-assigned incident key is written back into it, so a follow-up
/// acknowledge or resolve needs no extra plumbing.
///
/// A payload can also be deserialized from a JSON mapping of the wire-format
/// field names; unknown keys are silently ignored.
///
/// # Example
///
/// ```rust
/// use pagerduty_events_api::Event;
///
/// # fn main() -> pagerduty_events_api::Result<()> {
/// let event = Event::new()
///     .with_service_key("0123456789abcdef0123456789abcdef")?
///     .with_description("Disk usage above 95% on srv01")?
///     .with_client("disk-monitor")
///     .with_detail("mount", "/var");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Event {
    service_key: Option<String>,
    description: Option<String>,
    pub(crate) incident_key: Option<String>,
    client: Option<String>,
    client_url: Option<String>,
    details: Map<String, Value>,
}

impl Event {
    /// Create an empty event payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service key, required for every event type
    ///
    /// This is the GUID of one of your "Generic API" services, listed on the
    /// service detail page.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the key is exactly 32 characters.
    pub fn with_service_key(mut self, key: &str) -> Result<Self> {
        if key.len() != 32 {
            return Err(EventsError::Validation {
                reason: "service key must be a 32 character GUID string",
            });
        }
        self.service_key = Some(key.to_string());
        Ok(self)
    }

    /// Set the description, required when triggering
    ///
    /// A short account of the problem. PagerDuty uses it (possibly truncated)
    /// for phone calls, SMS messages and alert emails.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the description exceeds 1024 characters.
    pub fn with_description(mut self, description: &str) -> Result<Self> {
        if description.len() > 1024 {
            return Err(EventsError::Validation {
                reason: "description must be 1024 characters or fewer",
            });
        }
        self.description = Some(description.to_string());
        Ok(self)
    }

    /// Set the incident key, required when acknowledging or resolving
    ///
    /// The key groups related events into one incident. When triggering it is
    /// optional: without one the server opens a new incident and assigns a
    /// unique key. An empty string behaves as unset.
    pub fn with_incident_key(mut self, key: &str) -> Self {
        self.incident_key = Some(key.to_string());
        self
    }

    /// Set the name of the monitoring client triggering this event
    ///
    /// Only meaningful when triggering.
    pub fn with_client(mut self, client: &str) -> Self {
        self.client = Some(client.to_string());
        self
    }

    /// Set the URL of the monitoring client triggering this event
    ///
    /// Only meaningful when triggering.
    pub fn with_client_url(mut self, url: &str) -> Self {
        self.client_url = Some(url.to_string());
        self
    }

    /// Replace the whole detail bag
    ///
    /// Details are arbitrary JSON included in the incident log for display;
    /// their contents are not validated.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }

    /// Add a single entry to the detail bag
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Get the service key
    pub fn service_key(&self) -> Option<&str> {
        self.service_key.as_deref()
    }

    /// Get the description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the incident key
    pub fn incident_key(&self) -> Option<&str> {
        self.incident_key.as_deref()
    }

    /// Get the monitoring client name
    pub fn client(&self) -> Option<&str> {
        self.client.as_deref()
    }

    /// Get the monitoring client URL
    pub fn client_url(&self) -> Option<&str> {
        self.client_url.as_deref()
    }

    /// Get the detail bag
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Look up a single detail entry, `None` if the key is not present
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// Render the minimal wire-format mapping for this event
    ///
    /// `service_key` is always present, as JSON `null` when unset — required
    /// fields are checked by the client before sending, not here. Every other
    /// field is included only when it has content, and `client`/`client_url`
    /// only when the event type is [`EventType::Trigger`].
    pub fn to_wire(&self, event_type: Option<EventType>) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            "service_key".to_string(),
            self.service_key.clone().map_or(Value::Null, Value::String),
        );
        if let Some(event_type) = event_type {
            data.insert(
                "event_type".to_string(),
                Value::String(event_type.to_string()),
            );
        }
        if let Some(description) = non_empty(&self.description) {
            data.insert(
                "description".to_string(),
                Value::String(description.to_string()),
            );
        }
        if let Some(incident_key) = non_empty(&self.incident_key) {
            data.insert(
                "incident_key".to_string(),
                Value::String(incident_key.to_string()),
            );
        }
        if !self.details.is_empty() {
            data.insert("details".to_string(), Value::Object(self.details.clone()));
        }

        if event_type == Some(EventType::Trigger) {
            if let Some(client) = non_empty(&self.client) {
                data.insert("client".to_string(), Value::String(client.to_string()));
            }
            if let Some(client_url) = non_empty(&self.client_url) {
                data.insert(
                    "client_url".to_string(),
                    Value::String(client_url.to_string()),
                );
            }
        }

        data
    }
}

// Empty strings count as unset, both here and in the client's precondition
// checks.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
