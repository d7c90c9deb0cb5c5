use reqwest::StatusCode;
use serde::Deserialize;

use super::{WeatherError, WeatherReport};

/// Код weatherapi.com для "No matching location found."
pub const LOCATION_NOT_FOUND: i64 = 1006;

#[derive(Clone, Debug, Deserialize)]
pub struct CurrentResponse {
    pub location: Location,
    pub current: Current,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Current {
    pub temp_c: f32,
    pub feelslike_c: f32,
    pub wind_kph: f32,
    pub cloud: f32,
    pub condition: Condition,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Condition {
    pub text: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl CurrentResponse {
    pub fn summary(&self) -> String {
        format!(
            "Страна: {}\n\
            Город: {}\n\
            Погода: {}\n\
            Температура: {:.1}°C\n\
            Ощущается как: {:.1}°C\n\
            Скорость ветра: {:.1} км/ч\n\
            Облачность: {:.0}%",
            self.location.country,
            self.location.name,
            self.current.condition.text,
            self.current.temp_c,
            self.current.feelslike_c,
            self.current.wind_kph,
            self.current.cloud,
        )
    }
}

/// Разбор ответа `current.json` по статусу и коду ошибки API.
///
/// `Ok(None)`: город не найден, это не ошибка сервиса.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Option<WeatherReport>, WeatherError> {
    if status.is_success() {
        let response: CurrentResponse = serde_json::from_str(body)?;
        if response.location.name.is_empty() {
            return Ok(None);
        }

        return Ok(Some(WeatherReport {
            summary: response.summary(),
            canonical_name: response.location.name,
        }));
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.code == LOCATION_NOT_FOUND => Ok(None),
        Ok(envelope) => Err(WeatherError::Api {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message,
        }),
        Err(_) => Err(WeatherError::Status(status.as_u16())),
    }
}
