//! Chat front end.
//!
//! Incoming message text becomes a [`Command`], the [`Responder`] turns a
//! command into reply text, and [`telegram`] moves both over the Telegram Bot
//! API.

mod reply;
pub mod telegram;

pub use reply::Responder;

/// A chat command recognised by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/hi`: report for the configured default location.
    Hi,
    /// `/help`
    Help,
    /// Any other `/word`: forecast for the city named by `word`.
    Forecast(String),
    /// Plain text; not answered.
    Ignored,
}

impl Command {
    /// Parse the text of a chat message.
    ///
    /// Only the first token after the slash counts, and a `@botname` suffix
    /// (added by Telegram in group chats) is dropped.
    pub fn parse(text: &str) -> Self {
        let Some(rest) = text.trim().strip_prefix('/') else {
            return Command::Ignored;
        };

        let token = rest.split_whitespace().next().unwrap_or("");
        let word = token.split('@').next().unwrap_or("");

        if word.eq_ignore_ascii_case("start") {
            Command::Start
        } else if word.eq_ignore_ascii_case("hi") {
            Command::Hi
        } else if word.eq_ignore_ascii_case("help") {
            Command::Help
        } else {
            Command::Forecast(word.to_string())
        }
    }
}

/// Capitalise the first letter of every alphabetic run and lowercase the rest.
///
/// `"new_york"` becomes `"New_York"`, `"LONDON"` becomes `"London"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}

#[cfg(test)]
mod tests;
