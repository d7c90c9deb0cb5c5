use std::sync::Arc;

use crate::models::{ChatSession, Keyboard, SessionState};
use crate::weather::WeatherLookup;

use super::menu::{self, Input};
use super::ReplySink;

/// Конечный автомат одного чата.
///
/// Владеет `ChatSession` единолично: менять состояние чата может только он.
pub struct ChatMachine {
    session: ChatSession,
    weather: Arc<dyn WeatherLookup>,
    replies: Arc<dyn ReplySink>,
}

impl ChatMachine {
    pub fn new(session: ChatSession, weather: Arc<dyn WeatherLookup>, replies: Arc<dyn ReplySink>) -> Self {
        Self { session, weather, replies }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    /// Обработка одного сообщения
    pub async fn handle(&mut self, text: &str) {
        self.apply(text).await;
        self.settle().await;
    }

    /// `Resetting` сразу разворачивается в показ меню, не дожидаясь нового сообщения
    pub async fn settle(&mut self) {
        while self.session.state == SessionState::Resetting {
            self.apply(menu::MENU_COMMAND).await;
        }
    }

    async fn apply(&mut self, text: &str) {
        use SessionState::*;

        match (self.session.state, Input::parse(text)) {
            (_, Input::Start) => {
                self.reply(menu::WELCOME_TEXT, Keyboard::Remove).await;
            }
            (_, Input::Menu) | (Resetting, _) => {
                self.reply(menu::MENU_TEXT, menu::main_menu_keyboard()).await;
                self.session.state = MenuShown;
            }
            (_, Input::Back) => {
                self.session.state = Resetting;
            }
            (_, Input::ClearFavorites) => {
                log::info!("Chat {}: favorites cleared", self.session.id);
                self.session.favorites.clear();
                self.session.state = Resetting;
            }
            (MenuShown, Input::Weather) => {
                let keyboard = menu::location_keyboard(&self.session.favorites);
                self.reply(menu::LOCATION_PROMPT, keyboard).await;
                self.session.state = AwaitingLocation;
            }
            (MenuShown, Input::Features) => {
                self.reply(menu::FEATURES_TEXT, menu::back_keyboard()).await;
            }
            (MenuShown, Input::About) => {
                self.reply(menu::ABOUT_TEXT, menu::back_keyboard()).await;
            }
            (MenuShown, Input::Text(_)) => {
                self.reply(menu::UNKNOWN_COMMAND_TEXT, Keyboard::Keep).await;
                self.session.state = Resetting;
            }
            (AwaitingLocation, Input::Weather | Input::Features | Input::About | Input::Text(_)) => {
                self.lookup_location(text).await;
                self.session.state = Resetting;
            }
            (Idle, Input::Weather | Input::Features | Input::About | Input::Text(_)) => {
                log::warn!("Chat {}: unknown command {:?}", self.session.id, text);
                self.reply(menu::UNKNOWN_COMMAND_TEXT, menu::back_keyboard()).await;
            }
        }
    }

    async fn lookup_location(&mut self, query: &str) {
        let chat_id = self.session.id;

        match self.weather.lookup(query).await {
            Err(e) => {
                log::error!("Chat {}: weather lookup for {:?} failed: {}", chat_id, query, e);
                self.reply(menu::SERVICE_UNAVAILABLE_TEXT, Keyboard::Keep).await;
            }
            Ok(None) => {
                log::info!("Chat {}: location {:?} not found", chat_id, query);
                self.reply(menu::LOCATION_NOT_FOUND_TEXT, Keyboard::Keep).await;
            }
            Ok(Some(report)) => {
                self.reply(menu::LOCATION_FOUND_TEXT, Keyboard::Keep).await;
                self.reply(&report.summary, Keyboard::Keep).await;

                if self.session.favorites.push(&report.canonical_name) {
                    log::info!(
                        "Chat {}: added {} to favorites, next slot {}",
                        chat_id,
                        report.canonical_name,
                        self.session.favorites.write_position()
                    );
                }
            }
        }
    }

    async fn reply(&self, text: &str, keyboard: Keyboard) {
        if let Err(e) = self.replies.send(self.session.id, text, keyboard).await {
            log::error!("Failed to send reply to chat {}: {}", self.session.id, e);
        }
    }
}
