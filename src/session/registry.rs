//! Реестр активных чатов.
//!
//! Хранит для каждого активного чата отправляющий конец его очереди.
//! Проверка "есть ли обработчик" и его создание идут под одним мьютексом,
//! поэтому два одновременных первых сообщения не создадут двух обработчиков.
//! Сама постановка в очередь выполняется уже без мьютекса.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use teloxide::types::ChatId;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::bot_state::BotState;
use crate::models::{ChatSession, InboundEvent};
use crate::weather::WeatherLookup;

use super::worker::SessionWorker;
use super::{ChatMachine, ReplySink};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Сколько обработчик ждёт сообщения, прежде чем завершиться
    pub idle_timeout: Duration,
    /// Размер очереди одного чата; при заполнении отправитель ждёт
    pub queue_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("bot is shutting down, message dropped")]
    ShuttingDown,
}

#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    queues: Mutex<HashMap<ChatId, mpsc::Sender<InboundEvent>>>,
    state: BotState,
    weather: Arc<dyn WeatherLookup>,
    replies: Arc<dyn ReplySink>,
    config: RegistryConfig,
    cancel: CancellationToken,
    workers: TaskTracker,
    started: AtomicUsize,
}

impl SessionRegistry {
    pub fn new(
        state: BotState,
        weather: Arc<dyn WeatherLookup>,
        replies: Arc<dyn ReplySink>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                queues: Mutex::new(HashMap::new()),
                state,
                weather,
                replies,
                config,
                cancel: CancellationToken::new(),
                workers: TaskTracker::new(),
                started: AtomicUsize::new(0),
            }),
        }
    }

    pub fn state(&self) -> &BotState {
        &self.inner.state
    }

    /// Передать сообщение обработчику его чата, создав обработчик при необходимости.
    ///
    /// Ждёт, если очередь чата заполнена. После отмены сообщение отбрасывается
    /// с `DispatchError::ShuttingDown`.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<(), DispatchError> {
        let mut event = event;

        loop {
            let queue = self.queue_for(event.chat_id).await?;

            let sent = tokio::select! {
                biased;
                _ = self.inner.cancel.cancelled() => None,
                sent = queue.send(event) => Some(sent),
            };

            match sent {
                None => {
                    log::debug!("Dispatch abandoned: shutting down");
                    return Err(DispatchError::ShuttingDown);
                }
                Some(Ok(())) => return Ok(()),
                // обработчик как раз завершился по таймауту, пробуем ещё раз
                Some(Err(mpsc::error::SendError(returned))) => {
                    log::debug!("Chat {}: worker retired during dispatch, retrying", returned.chat_id);
                    event = returned;
                }
            }
        }
    }

    /// Очередь активного обработчика чата. Если обработчика нет, он создаётся.
    async fn queue_for(&self, chat_id: ChatId) -> Result<mpsc::Sender<InboundEvent>, DispatchError> {
        let mut queues = self.inner.queues.lock().await;

        if self.inner.cancel.is_cancelled() {
            return Err(DispatchError::ShuttingDown);
        }

        if let Some(queue) = queues.get(&chat_id) {
            if !queue.is_closed() {
                return Ok(queue.clone());
            }
            log::warn!("Chat {}: worker is gone without releasing its queue", chat_id);
        }

        let (tx, rx) = mpsc::channel(self.inner.config.queue_capacity);
        let session = self.inner.state.get_chat_session(chat_id).await;
        let machine = ChatMachine::new(session, self.inner.weather.clone(), self.inner.replies.clone());
        let worker = SessionWorker::new(
            machine,
            rx,
            self.clone(),
            self.inner.config.idle_timeout,
            self.inner.cancel.clone(),
        );

        self.inner.workers.spawn(worker.run());
        self.inner.started.fetch_add(1, Ordering::SeqCst);
        queues.insert(chat_id, tx.clone());

        log::info!("💬 Started new chat {}", chat_id);
        Ok(tx)
    }

    /// Завершение по простою.
    ///
    /// Возвращает `false`, если в очереди успели появиться сообщения: тогда
    /// обработчик получает новую очередь с этими сообщениями и продолжает работу.
    pub(super) async fn retire_idle(
        &self,
        queue: &mut mpsc::Receiver<InboundEvent>,
        session: &ChatSession,
    ) -> bool {
        let mut queues = self.inner.queues.lock().await;

        queue.close();
        let mut pending = Vec::new();
        while let Some(event) = queue.recv().await {
            pending.push(event);
        }

        if pending.is_empty() {
            queues.remove(&session.id);
            self.inner.state.save_chat_session(session.clone()).await;
            return true;
        }

        let (tx, rx) = mpsc::channel(self.inner.config.queue_capacity.max(pending.len()));
        for event in pending {
            if let Err(e) = tx.try_send(event) {
                log::error!("Chat {}: failed to requeue message: {}", session.id, e);
            }
        }
        queues.insert(session.id, tx);
        *queue = rx;
        false
    }

    /// Завершение по отмене: очередь убирается, состояние остаётся в таблице.
    pub(super) async fn release(&self, session: &ChatSession) {
        let mut queues = self.inner.queues.lock().await;
        queues.remove(&session.id);
        self.inner.state.save_chat_session(session.clone()).await;
    }

    /// Общая отмена для всех обработчиков
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
    }

    /// Дождаться завершения всех обработчиков
    pub async fn wait_for_workers(&self) {
        self.inner.workers.close();
        self.inner.workers.wait().await;
    }

    pub async fn active_count(&self) -> usize {
        self.inner.queues.lock().await.len()
    }

    /// Сколько обработчиков было запущено за всё время
    pub fn workers_started(&self) -> usize {
        self.inner.started.load(Ordering::SeqCst)
    }
}
