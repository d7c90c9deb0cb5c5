use teloxide::types::ChatId;

/// Входящее текстовое сообщение, привязанное к чату
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub text: String,
}

impl InboundEvent {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Клавиатура, прикрепляемая к ответу
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    /// Оставить клавиатуру как есть
    #[default]
    Keep,
    /// Убрать клавиатуру
    Remove,
    /// Кнопки по строкам
    Rows(Vec<Vec<String>>),
}

impl Keyboard {
    pub fn rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Keyboard::Rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}
