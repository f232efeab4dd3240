//! Telegram Bot API transport.
//!
//! The bot long-polls `getUpdates` and answers each text message with
//! `sendMessage`, one update at a time. [`ChatApi`] abstracts the two calls
//! so the loop can run against a fake in tests.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use super::{Command, Responder};
use crate::config::Config;
use crate::constants::{GENERIC_FAILURE_REPLY, HTTP_TIMEOUT_SECS, POLL_RETRY_DELAY_SECS};

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram bot token not configured")]
    MissingToken,

    #[error("HTTP error talking to Telegram: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from Telegram: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Telegram API error (code {code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

/// The two Bot API calls the polling loop needs.
#[cfg_attr(test, mockall::automock)]
pub trait ChatApi {
    /// Long-poll for updates with ids at or above `offset`.
    fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, TelegramError>;

    fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;
}

/// Blocking Bot API client.
pub struct TelegramClient {
    http: Client,
    endpoint: String,
}

impl TelegramClient {
    /// `poll_timeout` is the long-poll duration; the HTTP timeout is set
    /// comfortably above it.
    pub fn new(base_url: &str, token: &str, poll_timeout: u64) -> Result<Self, TelegramError> {
        if token.is_empty() {
            return Err(TelegramError::MissingToken);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(poll_timeout + HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", base_url.trim_end_matches('/'), token),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TelegramError> {
        let token = config
            .telegram_bot_token
            .as_deref()
            .ok_or(TelegramError::MissingToken)?;
        Self::new(config.telegram_base_url(), token, config.poll_timeout())
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(body)
            .send()?;

        // Error responses carry a JSON body with `ok: false`
        parse_api_response(&response.text()?)
    }
}

/// Decode a Bot API response envelope.
pub fn parse_api_response<T: DeserializeOwned>(body: &str) -> Result<T, TelegramError> {
    serde_json::from_str::<ApiResponse<T>>(body)?.into_result()
}

impl ChatApi for TelegramClient {
    fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let mut body = serde_json::json!({
            "timeout": timeout,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        self.call("getUpdates", &body)
    }

    fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        self.call::<serde_json::Value>("sendMessage", &body)
            .map(|_| ())
    }
}

/// The chat and reply text for one update, if it needs an answer.
pub fn handle_update(responder: &Responder, update: &Update) -> Option<(i64, String)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;

    let command = Command::parse(text);
    if command == Command::Ignored {
        return None;
    }

    log_debug!(
        "Update {} from chat {}: {:?}",
        update.update_id,
        message.chat.id,
        command
    );
    responder
        .reply(&command)
        .map(|reply| (message.chat.id, reply))
}

/// Fetch one batch of updates and answer them.
///
/// Returns the offset for the next call.
pub fn poll_once(
    api: &dyn ChatApi,
    responder: &Responder,
    offset: Option<i64>,
    timeout: u64,
) -> Result<Option<i64>, TelegramError> {
    let updates = api.get_updates(offset, timeout)?;
    let mut next_offset = offset;

    for update in &updates {
        next_offset = Some(update.update_id + 1);

        let Some((chat_id, reply)) = handle_update(responder, update) else {
            continue;
        };

        if let Err(e) = api.send_message(chat_id, &reply) {
            log_error!("Failed to send reply to chat {}: {}", chat_id, e);
            if let Err(e) = api.send_message(chat_id, GENERIC_FAILURE_REPLY) {
                log_error!("Failed to send error notice to chat {}: {}", chat_id, e);
            }
        }
    }

    Ok(next_offset)
}

/// Answer messages until `running` is cleared.
///
/// Polling errors are logged and retried after a pause; they never end the
/// loop.
pub fn run_polling(api: &dyn ChatApi, responder: &Responder, timeout: u64, running: &AtomicBool) {
    let mut offset = None;

    while running.load(Ordering::SeqCst) {
        match poll_once(api, responder, offset, timeout) {
            Ok(next) => offset = next,
            Err(e) => {
                log_error!("Polling failed: {}", e);
                log_indented!("Retrying in {} seconds", POLL_RETRY_DELAY_SECS);
                sleep_while_running(Duration::from_secs(POLL_RETRY_DELAY_SECS), running);
            }
        }
    }

    log_block_start!("Polling stopped");
}

fn sleep_while_running(duration: Duration, running: &AtomicBool) {
    let step = Duration::from_millis(100);
    let mut slept = Duration::ZERO;
    while slept < duration && running.load(Ordering::SeqCst) {
        thread::sleep(step);
        slept += step;
    }
}
