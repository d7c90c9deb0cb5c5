//! Сессии чатов: у каждого активного чата свой обработчик со своей очередью.
//!
//! - `registry`: кто сейчас активен и куда класть входящие сообщения
//! - `worker`: цикл ожидания сообщений, таймаут простоя, отмена
//! - `machine`: сам диалог (меню, погода, избранное)

pub mod machine;
pub mod menu;
pub mod registry;
pub mod worker;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use teloxide::types::ChatId;
use thiserror::Error;

use crate::models::Keyboard;

pub use machine::ChatMachine;
pub use registry::{DispatchError, RegistryConfig, SessionRegistry};

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Куда отправляются ответы пользователю
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<(), ReplyError>;
}
