use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;

use crate::session::SessionRegistry;

pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Порядок остановки: отмена обработчиков, пауза, остановка приёма обновлений,
/// ожидание всех обработчиков. Сохранение в базу делает вызывающий.
pub struct ShutdownCoordinator {
    registry: SessionRegistry,
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(registry: SessionRegistry, grace: Duration) -> Self {
        Self { registry, grace }
    }

    pub async fn drain<F>(&self, stop_transport: F)
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let active = self.registry.active_count().await;
        log::info!("🛑 Shutting down, {} active chats", active);

        self.registry.cancel();
        tokio::time::sleep(self.grace).await;

        stop_transport.await;
        log::info!("Transport stopped");

        self.registry.wait_for_workers().await;
        log::info!(
            "✅ All chat workers stopped in {:?} ({} started since launch)",
            start_time.elapsed(),
            self.registry.workers_started()
        );
    }
}

/// Остановка приёма обновлений.
///
/// Если диспетчер ещё не запущен, токен остановки отказывает; тогда задача
/// диспетчера снимается, иначе она запустится позже и уже не остановится.
pub async fn stop_or_abort<F, E>(stop: Result<F, E>, dispatcher: &AbortHandle)
where
    F: Future<Output = ()>,
    E: Display,
{
    match stop {
        Ok(stopped) => stopped.await,
        Err(e) => {
            log::warn!("Dispatcher is not running yet ({}), aborting it", e);
            dispatcher.abort();
        }
    }
}
