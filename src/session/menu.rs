//! Тексты и кнопки диалога.

use crate::models::{Favorites, Keyboard};

pub const START_COMMAND: &str = "/start";
pub const MENU_COMMAND: &str = "/menu";
pub const ABOUT_COMMAND: &str = "/about";

pub const WEATHER_BUTTON: &str = "Погоду 🌧️";
pub const WEATHER_BUTTON_PLAIN: &str = "Погоду";
pub const FEATURES_BUTTON: &str = "?";
pub const ABOUT_BUTTON: &str = "Об авторе";
pub const BACK_BUTTON: &str = "Вернуться обратно";
pub const CLEAR_BUTTON: &str = "Очистить список";

pub const WELCOME_TEXT: &str = "Привет! Я подскажу погоду в любом городе и запомню три последних.\n\
    Чтобы перейти к основному функционалу, напиши /menu";
pub const MENU_TEXT: &str = "Что хотите узнать?";
pub const LOCATION_PROMPT: &str = "Введите свой город на русском или английском языке";
pub const FEATURES_TEXT: &str = "Новые функции появятся позже . . .";
pub const ABOUT_TEXT: &str = "Погодный бот: текущая погода по данным weatherapi.com \
    и список из трёх избранных городов.";
pub const UNKNOWN_COMMAND_TEXT: &str = "Не найден такой функционал . . .";
pub const LOCATION_FOUND_TEXT: &str = "Нашел твой город, держи!";
pub const LOCATION_NOT_FOUND_TEXT: &str = "Такой город не найден или не существует!";
pub const SERVICE_UNAVAILABLE_TEXT: &str = "Похоже, проблемы с сервисом погоды, попробуйте позже . . .";

/// Смысл входящего текста
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Start,
    Menu,
    Back,
    ClearFavorites,
    Weather,
    Features,
    About,
    Text(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(text: &'a str) -> Self {
        match text.trim() {
            START_COMMAND => Input::Start,
            MENU_COMMAND => Input::Menu,
            BACK_BUTTON => Input::Back,
            CLEAR_BUTTON => Input::ClearFavorites,
            WEATHER_BUTTON | WEATHER_BUTTON_PLAIN => Input::Weather,
            FEATURES_BUTTON => Input::Features,
            ABOUT_BUTTON | ABOUT_COMMAND => Input::About,
            _ => Input::Text(text),
        }
    }
}

pub fn main_menu_keyboard() -> Keyboard {
    Keyboard::rows([[WEATHER_BUTTON, FEATURES_BUTTON, ABOUT_BUTTON]])
}

pub fn back_keyboard() -> Keyboard {
    Keyboard::rows([[BACK_BUTTON]])
}

/// Избранные города по одному в строке, затем очистка (если есть что чистить) и возврат
pub fn location_keyboard(favorites: &Favorites) -> Keyboard {
    let mut rows: Vec<Vec<String>> = favorites.iter().map(|city| vec![city.to_string()]).collect();
    if !favorites.is_empty() {
        rows.push(vec![CLEAR_BUTTON.to_string()]);
    }
    rows.push(vec![BACK_BUTTON.to_string()]);
    Keyboard::Rows(rows)
}
