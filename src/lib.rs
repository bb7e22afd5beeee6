//! # PagerDuty Events API
//!
//! A Rust client library for the [PagerDuty generic events API](https://developer.pagerduty.com/docs/events-api-v1/overview/),
//! used to trigger, acknowledge and resolve incidents.
//!
//! ## Features
//!
//! - Trigger, acknowledge and resolve incidents via the events HTTP API
//! - Builder pattern for constructing event payloads, with field validation
//! - Server-assigned incident keys written back into the payload
//! - Injectable transport for deterministic, network-free tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagerduty_events_api::{Event, EventsClient, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EventsClient::new(DEFAULT_TIMEOUT)?;
//!
//!     let mut event = Event::new()
//!         .with_service_key("0123456789abcdef0123456789abcdef")?
//!         .with_description("Disk usage above 95% on srv01")?
//!         .with_client("disk-monitor")
//!         .with_client_url("https://monitor.example.com")
//!         .with_detail("mount", "/var");
//!
//!     let response = client.trigger(&mut event).await?;
//!     println!("status: {:?}", response.get("status"));
//!     println!("incident key: {:?}", event.incident_key());
//!
//!     // The assigned key is now on the payload, so resolving needs no
//!     // extra plumbing.
//!     client.resolve(&mut event).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod errors;
mod transport;
mod types;

pub use client::{EventsClient, DEFAULT_TIMEOUT, EVENTS_API_URL};
pub use errors::{EventsError, Result};
pub use transport::{EventResponse, HttpTransport, NoopTransport, Transport};
pub use types::{Event, EventType};
