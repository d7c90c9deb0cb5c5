use std::fmt;
use std::str::FromStr;
use teloxide::types::ChatId;
use thiserror::Error;

use super::Favorites;

/// Положение пользователя в меню
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    MenuShown,
    AwaitingLocation,
    /// Служебное состояние: сразу же заменяется показом меню
    Resetting,
}

impl SessionState {
    /// Тег для колонки `state` в базе
    pub fn as_tag(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::MenuShown => "menu",
            SessionState::AwaitingLocation => "location",
            SessionState::Resetting => "reset",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session state tag: {0:?}")]
pub struct UnknownStateTag(pub String);

impl FromStr for SessionState {
    type Err = UnknownStateTag;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "idle" | "" => Ok(SessionState::Idle),
            "menu" => Ok(SessionState::MenuShown),
            "location" => Ok(SessionState::AwaitingLocation),
            "reset" => Ok(SessionState::Resetting),
            other => Err(UnknownStateTag(other.to_string())),
        }
    }
}

/// Состояние одного чата
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: ChatId,
    pub state: SessionState,
    pub favorites: Favorites,
}

impl ChatSession {
    pub fn new(id: ChatId) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            favorites: Favorites::new(),
        }
    }
}
