use anyhow::Context;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod config;
mod database;
mod handlers;
mod logging;
mod models;
mod operator;
mod session;
mod shutdown;
mod weather;

use crate::bot_state::BotState;
use crate::config::Config;
use crate::database::Database;
use crate::handlers::{message_handler, TelegramReplies};
use crate::session::SessionRegistry;
use crate::shutdown::ShutdownCoordinator;
use crate::weather::WeatherClient;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "открыть меню")]
    Menu,
    #[command(description = "о боте")]
    About,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;
    logging::init(config.log_dir.as_deref()).context("failed to initialize logging")?;
    log::info!("Starting weather bot with PostgreSQL...");

    let db = Database::new(&config.database_url)
        .await
        .context("failed to connect to database")?;
    db.init().await.context("failed to create schema")?;
    log::info!("✅ Database initialized");

    let state = BotState::load(&db).await.context("failed to load chat sessions")?;

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("bot token check failed")?;
    log::info!("🤖 Authorized as @{}", me.username());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let weather = WeatherClient::new(config.weather.clone()).context("failed to build weather client")?;
    let registry = SessionRegistry::new(
        state.clone(),
        Arc::new(weather),
        Arc::new(TelegramReplies::new(bot.clone())),
        config.registry.clone(),
    );

    let handler = Update::filter_message().endpoint(message_handler);
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![registry.clone()])
        .build();
    let shutdown_token = dispatcher.shutdown_token();

    log::info!("🚀 Starting dispatcher, type 'exit' or press Ctrl-C to stop");
    let dispatch_task = tokio::spawn(async move { dispatcher.dispatch().await });

    tokio::select! {
        _ = operator::wait_for_exit(operator::stdin_lines()) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
            log::info!("Ctrl-C received");
        }
    }

    let dispatcher = dispatch_task.abort_handle();
    ShutdownCoordinator::new(registry, config.shutdown_grace)
        .drain(async { shutdown::stop_or_abort(shutdown_token.shutdown(), &dispatcher).await })
        .await;

    match dispatch_task.await {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => log::info!("Dispatcher aborted before it started"),
        Err(e) => log::error!("Dispatcher task failed: {}", e),
    }

    log::info!("💾 Saving {} chat sessions", state.len().await);
    if let Err(e) = state.persist(&db).await {
        log::error!("❌ Failed to save chat sessions: {}", e);
    }

    log::info!("👋 Bye");
    Ok(())
}
