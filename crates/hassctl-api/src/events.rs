// Event endpoints.

use tracing::debug;

use crate::client::HassClient;
use crate::error::Error;
use crate::models::{ApiStatus, Attributes, EventListener};

impl HassClient {
    /// List event types and their listener counts.
    ///
    /// `GET /api/events`
    pub async fn get_events(&self) -> Result<Vec<EventListener>, Error> {
        debug!("listing events");
        self.get("get events", &["events"]).await
    }

    /// Fire an event and return the server's acknowledgement message.
    ///
    /// `POST /api/events/{event_type}`; `None` sends no body.
    pub async fn fire_event(
        &self,
        event_type: &str,
        event_data: Option<&Attributes>,
    ) -> Result<String, Error> {
        debug!(event_type, has_data = event_data.is_some(), "firing event");
        let ack: ApiStatus = self
            .post_optional(
                &format!("fire event {event_type}"),
                &["events", event_type],
                event_data,
            )
            .await?;
        Ok(ack.message)
    }
}
