use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::models::Keyboard;
use crate::session::{ReplyError, ReplySink};

/// Клавиатура ответа в разметку Telegram; `None`, если клавиатуру не трогаем
pub fn to_reply_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::Rows(rows) => {
            let buttons = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.as_str())).collect())
                .collect::<Vec<Vec<KeyboardButton>>>();

            Some(ReplyMarkup::Keyboard(KeyboardMarkup::new(buttons).resize_keyboard()))
        }
    }
}

/// Отправка ответов через Bot API
#[derive(Clone)]
pub struct TelegramReplies {
    bot: Bot,
}

impl TelegramReplies {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySink for TelegramReplies {
    async fn send(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<(), ReplyError> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(markup) = to_reply_markup(&keyboard) {
            request = request.reply_markup(markup);
        }

        request
            .await
            .map(|_| ())
            .map_err(|e| ReplyError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_sends_no_markup() {
        assert_eq!(to_reply_markup(&Keyboard::Keep), None);
    }

    #[test]
    fn remove_hides_keyboard() {
        assert!(matches!(
            to_reply_markup(&Keyboard::Remove),
            Some(ReplyMarkup::KeyboardRemove(_))
        ));
    }

    #[test]
    fn rows_become_resized_reply_keyboard() {
        let keyboard = Keyboard::rows([["London"], ["Вернуться обратно"]]);
        let expected = KeyboardMarkup::new(vec![
            vec![KeyboardButton::new("London")],
            vec![KeyboardButton::new("Вернуться обратно")],
        ])
        .resize_keyboard();

        assert_eq!(to_reply_markup(&keyboard), Some(ReplyMarkup::Keyboard(expected)));
    }
}
