//! Tracking service
//!
//! Stamps normalized messages with the time they were received and hands
//! them to the publisher.

use std::fmt;
use std::sync::Arc;

use domain::Message;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ClockPort, PublisherPort};

/// Records accepted messages
#[derive(Clone)]
pub struct TrackerService {
    publisher: Arc<dyn PublisherPort>,
    clock: Arc<dyn ClockPort>,
}

impl fmt::Debug for TrackerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerService").finish_non_exhaustive()
    }
}

impl TrackerService {
    pub fn new(publisher: Arc<dyn PublisherPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { publisher, clock }
    }

    /// Stamp `receivedAt` and publish the message
    #[instrument(skip(self, message), fields(method = %message.method(), path = %message.path()))]
    pub async fn track(&self, mut message: Message) -> Result<(), ApplicationError> {
        if let Some(body) = message.body_mut() {
            body.set_received_at(self.clock.now())?;
        }

        self.publisher.publish(&message).await.map_err(|e| {
            warn!(error = %e, "Failed to publish message");
            e
        })?;

        debug!(batch = message.is_batch(), "Message published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use domain::{Payload, RawBody};
    use serde_json::value::RawValue;

    use super::*;
    use crate::ports::{MockClockPort, MockPublisherPort};

    fn epoch_clock() -> MockClockPort {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
        clock
    }

    fn message_with_user() -> Message {
        let mut body = RawBody::new();
        body.insert(
            "userId".to_string(),
            RawValue::from_string(r#""user-id""#.to_string()).unwrap(),
        );
        Message::new("POST", "/v1/track", [("Content-Type", "application/json")])
            .with_body(Payload::Raw(body))
    }

    #[tokio::test]
    async fn track_stamps_and_publishes() {
        let mut publisher = MockPublisherPort::new();
        publisher
            .expect_publish()
            .withf(|message| {
                let body = message.body().unwrap().to_json_value().unwrap();
                body == serde_json::json!({
                    "userId": "user-id",
                    "receivedAt": "1970-01-01T00:00:00Z",
                })
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = TrackerService::new(Arc::new(publisher), Arc::new(epoch_clock()));
        service.track(message_with_user()).await.unwrap();
    }

    #[tokio::test]
    async fn track_without_body_skips_stamp() {
        let mut publisher = MockPublisherPort::new();
        publisher
            .expect_publish()
            .withf(|message| message.body().is_none())
            .times(1)
            .returning(|_| Ok(()));
        let mut clock = MockClockPort::new();
        clock.expect_now().never();

        let service = TrackerService::new(Arc::new(publisher), Arc::new(clock));
        let message = Message::new("GET", "/v1/pixel/track", std::iter::empty::<(&str, &str)>());
        service.track(message).await.unwrap();
    }

    #[tokio::test]
    async fn publish_failure_is_returned() {
        let mut publisher = MockPublisherPort::new();
        publisher
            .expect_publish()
            .returning(|_| Err(ApplicationError::Publish("disk full".to_string())));

        let service = TrackerService::new(Arc::new(publisher), Arc::new(epoch_clock()));
        let err = service.track(message_with_user()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Publish(ref msg) if msg == "disk full"));
    }

    #[test]
    fn debug_hides_ports() {
        let service = TrackerService::new(
            Arc::new(MockPublisherPort::new()),
            Arc::new(MockClockPort::new()),
        );
        assert_eq!(format!("{service:?}"), "TrackerService { .. }");
    }
}
