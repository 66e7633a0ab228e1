pub mod ai;
pub mod category;
pub mod config;
pub mod error;
pub mod notification;
pub mod session;
pub mod state;
pub mod talk;

// Re-export main types for convenience
pub use ai::GeminiClient;
pub use category::Category;
pub use config::Settings;
pub use error::{Error, Result};
pub use notification::{Notification, NotificationKind, Toast, NOTIFICATION_TTL};
pub use session::{PostRequest, Session};
pub use state::{ConfigField, NextcloudConfig, Quote};
pub use talk::TalkClient;
