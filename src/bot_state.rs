use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::database::{SessionStore, StoreError};
use crate::models::ChatSession;

type SessionTable = Arc<RwLock<HashMap<ChatId, ChatSession>>>;

/// Последние известные состояния всех чатов, которые были активны
/// за время работы процесса (или загружены из базы).
///
/// Запись каждого чата меняет только его собственный обработчик,
/// массовое чтение и запись только когда обработчиков нет.
#[derive(Clone, Default)]
pub struct BotState {
    sessions: SessionTable,
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: HashMap<ChatId, ChatSession>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
        }
    }

    /// Загрузка всех состояний из хранилища при старте
    pub async fn load(store: &dyn SessionStore) -> Result<Self, StoreError> {
        let start_time = Instant::now();
        let sessions = store.load_all().await?;

        log::info!("📥 Loaded {} chat sessions in {:?}", sessions.len(), start_time.elapsed());
        Ok(Self::from_sessions(sessions))
    }

    /// Сохранённое состояние чата или новое, если чат ещё не встречался
    pub async fn get_chat_session(&self, chat_id: ChatId) -> ChatSession {
        let sessions = self.sessions.read().await;
        sessions
            .get(&chat_id)
            .cloned()
            .unwrap_or_else(|| ChatSession::new(chat_id))
    }

    pub async fn save_chat_session(&self, session: ChatSession) {
        let mut sessions = self.sessions.write().await;
        log::debug!("💾 State retained for chat {}: {}", session.id, session.state);
        sessions.insert(session.id, session);
    }

    pub async fn snapshot(&self) -> HashMap<ChatId, ChatSession> {
        self.sessions.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Запись всех состояний в хранилище при остановке
    pub async fn persist(&self, store: &dyn SessionStore) -> Result<usize, StoreError> {
        let start_time = Instant::now();
        let sessions = self.snapshot().await;
        let written = store.upsert_all(&sessions).await?;

        log::info!("💾 Persisted {} chat sessions in {:?}", written, start_time.elapsed());
        Ok(written)
    }
}
