use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::{ChatSession, InboundEvent};

use super::{ChatMachine, SessionRegistry};

/// Почему обработчик проснулся
enum Wake {
    Event(InboundEvent),
    Idle,
    Cancelled,
    Closed,
}

/// Обработчик одного чата: читает свою очередь и кормит сообщения автомату.
///
/// Завершается после `idle_timeout` без сообщений или по общей отмене,
/// отдавая финальное состояние реестру.
pub struct SessionWorker {
    machine: ChatMachine,
    queue: mpsc::Receiver<InboundEvent>,
    registry: SessionRegistry,
    idle_timeout: Duration,
    cancel: CancellationToken,
}

impl SessionWorker {
    pub(super) fn new(
        machine: ChatMachine,
        queue: mpsc::Receiver<InboundEvent>,
        registry: SessionRegistry,
        idle_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            machine,
            queue,
            registry,
            idle_timeout,
            cancel,
        }
    }

    pub async fn run(mut self) -> ChatSession {
        let chat_id = self.machine.session().id;
        log::debug!("Session worker started for chat {}", chat_id);

        // восстановленная сессия могла остаться в Resetting
        self.machine.settle().await;

        loop {
            match self.next_wake().await {
                Wake::Event(event) => {
                    log::info!(
                        "Chat {}: new message {:?} in state {}",
                        chat_id,
                        event.text,
                        self.machine.session().state
                    );
                    self.machine.handle(&event.text).await;
                }
                Wake::Idle => {
                    if self.registry.retire_idle(&mut self.queue, self.machine.session()).await {
                        log::info!("⏰ Chat {} is idle, worker stopped", chat_id);
                        break;
                    }
                    log::debug!("Chat {}: messages arrived at idle timeout, worker continues", chat_id);
                }
                Wake::Cancelled => {
                    log::debug!("Cancel caught, chat {} stopped", chat_id);
                    self.registry.release(self.machine.session()).await;
                    break;
                }
                Wake::Closed => {
                    log::warn!("Chat {}: queue closed unexpectedly", chat_id);
                    self.registry.release(self.machine.session()).await;
                    break;
                }
            }
        }

        self.machine.into_session()
    }

    /// Единственная точка ожидания: сообщение, отмена или таймаут простоя
    async fn next_wake(&mut self) -> Wake {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Wake::Cancelled,
            event = self.queue.recv() => match event {
                Some(event) => Wake::Event(event),
                None => Wake::Closed,
            },
            _ = tokio::time::sleep(self.idle_timeout) => Wake::Idle,
        }
    }
}
