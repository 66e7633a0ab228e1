//! UI-agnostic application state types
//!
//! Data structures shared between the TUI and the headless commands. None of
//! them depend on a UI framework, and none are ever written to disk.

use serde::{Deserialize, Serialize};

/// A quote and the person or source it is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
}

impl Quote {
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            author: author.into(),
        }
    }

    /// Chat message text, e.g. `"Stay hungry." - Steve Jobs`
    pub fn to_message(&self) -> String {
        format!("\"{}\" - {}", self.quote, self.author)
    }
}

/// Connection and credentials for one Nextcloud Talk room
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextcloudConfig {
    pub url: String,
    pub room_token: String,
    pub bot_user: String,
    pub bot_password: String,
}

/// One editable field of [`NextcloudConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Url,
    RoomToken,
    BotUser,
    BotPassword,
}

impl ConfigField {
    pub fn all() -> [ConfigField; 4] {
        [
            ConfigField::Url,
            ConfigField::RoomToken,
            ConfigField::BotUser,
            ConfigField::BotPassword,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::Url => "Nextcloud URL",
            ConfigField::RoomToken => "Talk Room Token",
            ConfigField::BotUser => "Bot Username",
            ConfigField::BotPassword => "Bot App Password",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ConfigField::Url => "https://cloud.example.com",
            ConfigField::RoomToken => "abc123xyz",
            ConfigField::BotUser => "quotebot",
            ConfigField::BotPassword => "xxxxx-xxxxx-xxxxx-xxxxx-xxxxx",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigField::BotPassword)
    }
}

impl NextcloudConfig {
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Url => &self.url,
            ConfigField::RoomToken => &self.room_token,
            ConfigField::BotUser => &self.bot_user,
            ConfigField::BotPassword => &self.bot_password,
        }
    }

    pub fn get_mut(&mut self, field: ConfigField) -> &mut String {
        match field {
            ConfigField::Url => &mut self.url,
            ConfigField::RoomToken => &mut self.room_token,
            ConfigField::BotUser => &mut self.bot_user,
            ConfigField::BotPassword => &mut self.bot_password,
        }
    }

    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<ConfigField> {
        ConfigField::all()
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
