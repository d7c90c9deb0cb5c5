use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use std::time::Duration;
use teloxide::types::ChatId;
use thiserror::Error;

use crate::models::favorites::FAVORITES_CAPACITY;
use crate::models::{ChatSession, Favorites, SessionState};

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Хранилище состояний чатов: читается целиком при старте,
/// пишется целиком при остановке.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_all(&self) -> Result<HashMap<ChatId, ChatSession>, StoreError>;

    /// Возвращает число записанных строк
    async fn upsert_all(&self, sessions: &HashMap<ChatId, ChatSession>) -> Result<usize, StoreError>;
}

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_sessions (
                chat_id BIGINT PRIMARY KEY,
                state TEXT NOT NULL DEFAULT 'idle',
                favorite_1 TEXT NOT NULL DEFAULT '',
                favorite_2 TEXT NOT NULL DEFAULT '',
                favorite_3 TEXT NOT NULL DEFAULT '',
                next_slot SMALLINT,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // таблицы, созданные до появления позиции записи
        sqlx::query("ALTER TABLE chat_sessions ADD COLUMN IF NOT EXISTS next_slot SMALLINT")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Сессия из колонок строки `chat_sessions`.
/// `next_slot` пуст у строк, записанных до появления колонки.
fn restore_session(
    chat_id: i64,
    tag: &str,
    slots: [String; FAVORITES_CAPACITY],
    next_slot: Option<i16>,
) -> ChatSession {
    let id = ChatId(chat_id);
    let state = tag.parse::<SessionState>().unwrap_or_else(|e| {
        log::warn!("Chat {}: {}, falling back to idle", id, e);
        SessionState::Idle
    });
    let next = next_slot.and_then(|slot| usize::try_from(slot).ok());

    ChatSession {
        id,
        state,
        favorites: Favorites::from_parts(slots, next),
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn load_all(&self) -> Result<HashMap<ChatId, ChatSession>, StoreError> {
        let rows = sqlx::query(
            "SELECT chat_id, state, favorite_1, favorite_2, favorite_3, next_slot FROM chat_sessions"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = HashMap::with_capacity(rows.len());
        for row in rows {
            let tag: String = row.try_get("state")?;
            let session = restore_session(
                row.try_get("chat_id")?,
                &tag,
                [
                    row.try_get("favorite_1")?,
                    row.try_get("favorite_2")?,
                    row.try_get("favorite_3")?,
                ],
                row.try_get("next_slot")?,
            );

            sessions.insert(session.id, session);
        }

        Ok(sessions)
    }

    async fn upsert_all(&self, sessions: &HashMap<ChatId, ChatSession>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        for session in sessions.values() {
            let [first, second, third] = session.favorites.slots();

            sqlx::query(
                r#"
                INSERT INTO chat_sessions (chat_id, state, favorite_1, favorite_2, favorite_3, next_slot, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                ON CONFLICT (chat_id)
                DO UPDATE SET
                    state = EXCLUDED.state,
                    favorite_1 = EXCLUDED.favorite_1,
                    favorite_2 = EXCLUDED.favorite_2,
                    favorite_3 = EXCLUDED.favorite_3,
                    next_slot = EXCLUDED.next_slot,
                    updated_at = NOW()
                "#
            )
            .bind(session.id.0)
            .bind(session.state.as_tag())
            .bind(first.as_str())
            .bind(second.as_str())
            .bind(third.as_str())
            .bind(session.favorites.write_position() as i16)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(sessions.len())
    }
}
