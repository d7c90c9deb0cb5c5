use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use teloxide::types::ChatId;
use tokio::sync::Mutex;

use super::{SessionStore, StoreError};
use crate::models::ChatSession;

/// Хранилище в памяти для тестов
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<ChatId, ChatSession>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_rows(rows: impl IntoIterator<Item = ChatSession>) -> Self {
        Self {
            rows: Mutex::new(rows.into_iter().map(|s| (s.id, s)).collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub async fn rows(&self) -> HashMap<ChatId, ChatSession> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_all(&self) -> Result<HashMap<ChatId, ChatSession>, StoreError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn upsert_all(&self, sessions: &HashMap<ChatId, ChatSession>) -> Result<usize, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        let mut rows = self.rows.lock().await;
        for (id, session) in sessions {
            rows.insert(*id, session.clone());
        }
        Ok(sessions.len())
    }
}
