use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::{UserId, UserRecord};
use crate::store::port::{StoreError, UserStore};

/// Process-local [`UserStore`].
///
/// Used when no database is configured and as the store in tests. The
/// write lock makes `insert_if_absent` atomic.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a record. Not part of [`UserStore`]; operators and tests use it
    /// to invalidate sessions that still point at the id.
    pub async fn remove(&self, id: &UserId) -> Option<UserRecord> {
        self.users.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn insert_if_absent(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        match self.users.write().await.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.id.into_string())),
            Entry::Vacant(slot) => Ok(slot.insert(record).clone()),
        }
    }

    async fn exists(&self, id: &UserId) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::identity::AuthStrategy;

    fn record(id: &str) -> UserRecord {
        UserRecord {
            id: UserId::from_stored(id),
            display_name: "someone".into(),
            auth_strategy: AuthStrategy::Local,
            profile_image_url: "https://example.com/a.png".into(),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn insert_then_find_and_exists() {
        let store = MemoryUserStore::new();
        let id = UserId::from_stored("alice@local");

        assert!(!store.exists(&id).await.unwrap());
        assert_eq!(store.find_by_id(&id).await.unwrap(), None);

        let saved = store.insert_if_absent(record("alice@local")).await.unwrap();
        assert_eq!(saved.id, id);
        assert!(store.exists(&id).await.unwrap());
        assert_eq!(store.find_by_id(&id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn second_insert_for_same_id_is_rejected() {
        let store = MemoryUserStore::new();
        store.insert_if_absent(record("alice@local")).await.unwrap();

        let mut other = record("alice@local");
        other.display_name = "impostor".into();
        let err = store.insert_if_absent(other).await.unwrap_err();

        assert_eq!(err, StoreError::AlreadyExists("alice@local".into()));
        let kept = store
            .find_by_id(&UserId::from_stored("alice@local"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.display_name, "someone");
    }

    #[tokio::test]
    async fn concurrent_inserts_yield_exactly_one_winner() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert_if_absent(record("race@github")).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_drops_the_record() {
        let store = MemoryUserStore::new();
        store.insert_if_absent(record("gone@local")).await.unwrap();

        assert!(store.remove(&UserId::from_stored("gone@local")).await.is_some());
        assert!(store.is_empty().await);
    }
}
