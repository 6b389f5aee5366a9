use crate::models::{
    canonical_pair, ExclusionSnapshot, MatchRecord, SwipeAction, SwipeDecision, UserRecord,
};
use crate::repo::{
    ChatRepository, InteractionRepository, ProfileRepository, RepoError, SwipeWrite,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Chat message as the counter sees it
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub match_id: Uuid,
    pub sender_id: String,
    pub is_read: bool,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, UserRecord>,
    swipes: HashMap<(String, String), SwipeAction>,
    matches: HashMap<(String, String), MatchRecord>,
    blocks: HashSet<(String, String)>,
    messages: Vec<ChatMessage>,
}

/// In-memory store implementing every repository trait
///
/// Backs the engine in tests and local runs. A single mutex over the whole
/// state makes the snapshot and insert-if-absent operations trivially
/// atomic, which is exactly the consistency the engine asks of real stores.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RepoError> {
        self.inner
            .lock()
            .map_err(|_| RepoError::Transient("memory store lock poisoned".to_string()))
    }

    pub fn insert_record(&self, record: UserRecord) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.records.insert(record.id().to_string(), record);
        }
    }

    pub fn remove_record(&self, user_id: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.records.remove(user_id);
        }
    }

    pub fn insert_block(&self, blocker_id: &str, blocked_id: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .blocks
                .insert((blocker_id.to_string(), blocked_id.to_string()));
        }
    }

    pub fn push_message(&self, message: ChatMessage) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.messages.push(message);
        }
    }

    /// Total match rows, used by tests asserting the at-most-one invariant
    pub fn match_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.matches.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get_record(&self, user_id: &str) -> Result<UserRecord, RepoError> {
        let inner = self.lock()?;
        inner
            .records
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(format!("profile {}", user_id)))
    }

    async fn list_records_except(
        &self,
        exclude_ids: &HashSet<String>,
    ) -> Result<Vec<UserRecord>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .records
            .values()
            .filter(|record| !exclude_ids.contains(record.id()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InteractionRepository for MemoryStore {
    async fn record_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeWrite, RepoError> {
        let mut inner = self.lock()?;
        let key = (actor_id.to_string(), target_id.to_string());
        if inner.swipes.contains_key(&key) {
            return Ok(SwipeWrite::AlreadyRecorded);
        }
        inner.swipes.insert(
            key,
            SwipeAction {
                actor_id: actor_id.to_string(),
                target_id: target_id.to_string(),
                decision,
                created_at: Utc::now(),
            },
        );
        Ok(SwipeWrite::Recorded)
    }

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeAction>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .swipes
            .get(&(actor_id.to_string(), target_id.to_string()))
            .cloned())
    }

    async fn list_swiped_targets(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .swipes
            .values()
            .filter(|action| action.actor_id == user_id)
            .map(|action| action.target_id.clone())
            .collect())
    }

    async fn list_matched_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .matches
            .values()
            .filter_map(|record| record.partner_of(user_id).map(str::to_string))
            .collect())
    }

    async fn list_blocked_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .blocks
            .iter()
            .filter_map(|(blocker, blocked)| {
                if blocker == user_id {
                    Some(blocked.clone())
                } else if blocked == user_id {
                    Some(blocker.clone())
                } else {
                    None
                }
            })
            .collect())
    }

    async fn exclusion_snapshot(&self, user_id: &str) -> Result<ExclusionSnapshot, RepoError> {
        // Single lock acquisition keeps the three sets mutually consistent
        let inner = self.lock()?;
        Ok(ExclusionSnapshot {
            swiped: inner
                .swipes
                .values()
                .filter(|action| action.actor_id == user_id)
                .map(|action| action.target_id.clone())
                .collect(),
            matched: inner
                .matches
                .values()
                .filter_map(|record| record.partner_of(user_id).map(str::to_string))
                .collect(),
            blocked: inner
                .blocks
                .iter()
                .filter_map(|(blocker, blocked)| {
                    if blocker == user_id {
                        Some(blocked.clone())
                    } else if blocked == user_id {
                        Some(blocker.clone())
                    } else {
                        None
                    }
                })
                .collect(),
        })
    }

    async fn create_match_if_absent(
        &self,
        user_a: &str,
        user_b: &str,
        score: u8,
    ) -> Result<MatchRecord, RepoError> {
        let mut inner = self.lock()?;
        let (low, high) = canonical_pair(user_a, user_b);
        let record = inner
            .matches
            .entry((low.clone(), high.clone()))
            .or_insert_with(|| MatchRecord {
                id: Uuid::new_v4(),
                user_low: low,
                user_high: high,
                compatibility_score: score,
                created_at: Utc::now(),
            });
        Ok(record.clone())
    }

    async fn find_match(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<MatchRecord>, RepoError> {
        let inner = self.lock()?;
        Ok(inner.matches.get(&canonical_pair(user_a, user_b)).cloned())
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .matches
            .values()
            .filter(|record| record.involves(user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn count_unread(&self, user_id: &str, match_ids: &[Uuid]) -> Result<u64, RepoError> {
        let inner = self.lock()?;
        Ok(inner
            .messages
            .iter()
            .filter(|message| {
                !message.is_read
                    && message.sender_id != user_id
                    && match_ids.contains(&message.match_id)
            })
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_swipe_is_insert_if_absent() {
        let store = MemoryStore::new();

        let first = store
            .record_swipe("alice", "bob", SwipeDecision::Like)
            .await
            .unwrap();
        assert_eq!(first, SwipeWrite::Recorded);

        // Second write does not overwrite the decision
        let second = store
            .record_swipe("alice", "bob", SwipeDecision::Pass)
            .await
            .unwrap();
        assert_eq!(second, SwipeWrite::AlreadyRecorded);

        let action = store.find_swipe("alice", "bob").await.unwrap().unwrap();
        assert_eq!(action.decision, SwipeDecision::Like);
    }

    #[tokio::test]
    async fn test_create_match_if_absent_is_idempotent() {
        let store = MemoryStore::new();

        let first = store.create_match_if_absent("bob", "alice", 80).await.unwrap();
        let second = store.create_match_if_absent("alice", "bob", 55).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.compatibility_score, 80);
        assert_eq!(store.match_count(), 1);
        assert_eq!(first.user_low, "alice");
        assert_eq!(first.user_high, "bob");
    }

    #[tokio::test]
    async fn test_blocked_ids_cover_both_directions() {
        let store = MemoryStore::new();
        store.insert_block("alice", "bob");
        store.insert_block("carol", "alice");

        let blocked = store.list_blocked_ids("alice").await.unwrap();
        assert!(blocked.contains("bob"));
        assert!(blocked.contains("carol"));
        assert_eq!(blocked.len(), 2);
    }

    #[tokio::test]
    async fn test_count_unread_ignores_own_and_read_messages() {
        let store = MemoryStore::new();
        let match_id = Uuid::new_v4();
        let other_match = Uuid::new_v4();

        store.push_message(ChatMessage {
            match_id,
            sender_id: "bob".to_string(),
            is_read: false,
        });
        store.push_message(ChatMessage {
            match_id,
            sender_id: "bob".to_string(),
            is_read: true,
        });
        store.push_message(ChatMessage {
            match_id,
            sender_id: "alice".to_string(),
            is_read: false,
        });
        store.push_message(ChatMessage {
            match_id: other_match,
            sender_id: "bob".to_string(),
            is_read: false,
        });

        let count = store.count_unread("alice", &[match_id]).await.unwrap();
        assert_eq!(count, 1);
    }
}
