//! Подставные погода и транспорт для тестов.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use teloxide::types::ChatId;

use crate::models::Keyboard;
use crate::weather::{WeatherError, WeatherLookup, WeatherReport};

use super::{ReplyError, ReplySink};

#[derive(Default)]
pub struct StubWeather {
    known: HashMap<String, String>,
    failing: HashSet<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, query: &str, canonical: &str) -> Self {
        self.known.insert(query.to_lowercase(), canonical.to_string());
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_lowercase());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherLookup for StubWeather {
    async fn lookup(&self, query: &str) -> Result<Option<WeatherReport>, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let key = query.trim().to_lowercase();
        if self.failing.contains(&key) {
            return Err(WeatherError::Status(503));
        }

        Ok(self.known.get(&key).map(|canonical| WeatherReport {
            summary: format!("Город: {}\nТемпература: 20.0°C", canonical),
            canonical_name: canonical.clone(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Keyboard,
}

#[derive(Default)]
pub struct RecordingReplies {
    sent: Mutex<Vec<SentReply>>,
    fail: AtomicBool,
}

impl RecordingReplies {
    /// Все отправки будут падать, но записываться
    pub fn fail_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn last(&self) -> Option<SentReply> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn texts_for(&self, chat_id: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|reply| reply.chat_id == chat_id)
            .map(|reply| reply.text.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Ждёт, пока наберётся хотя бы `n` ответов
    pub async fn wait_for(&self, n: usize) {
        while self.count() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl ReplySink for RecordingReplies {
    async fn send(&self, chat_id: ChatId, text: &str, keyboard: Keyboard) -> Result<(), ReplyError> {
        self.sent.lock().unwrap().push(SentReply {
            chat_id,
            text: text.to_string(),
            keyboard,
        });

        if self.fail.load(Ordering::SeqCst) {
            return Err(ReplyError::Transport("network is down".to_string()));
        }
        Ok(())
    }
}
