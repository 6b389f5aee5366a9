use crate::models::MatchRecord;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events the engine pushes to interested callers
///
/// Delivery is asynchronous with no ordering guarantee across event kinds;
/// consumers must not assume a message event arrives after the match event
/// for the same pair.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    MatchCreated { record: MatchRecord },
    MessageActivity { match_id: Uuid },
}

/// Broadcast channel for engine events
///
/// The engine publishes; callers subscribe and poll or forward to their own
/// transport. Publishing with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct EventChannel {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: EngineEvent) {
        // Err means no active subscribers, which is fine
        let _ = self.sender.send(event);
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let channel = EventChannel::default();
        let mut rx = channel.subscribe();

        let record = MatchRecord {
            id: Uuid::new_v4(),
            user_low: "alice".to_string(),
            user_high: "bob".to_string(),
            compatibility_score: 90,
            created_at: Utc::now(),
        };
        channel.publish(EngineEvent::MatchCreated {
            record: record.clone(),
        });

        match rx.recv().await {
            Ok(EngineEvent::MatchCreated { record: received }) => {
                assert_eq!(received.id, record.id);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_a_noop() {
        let channel = EventChannel::default();
        channel.publish(EngineEvent::MessageActivity {
            match_id: Uuid::new_v4(),
        });
    }
}
