//! Session state and the actions a user can take on it.
//!
//! [`Session`] owns the Talk configuration, the current quote, the custom
//! quote list and the notification slot. Every finished action leaves exactly
//! one notification behind. Network actions come in two halves
//! (`begin_*` / `finish_*`) so a UI can run the request on a background task
//! while the session stays owned by the event loop; [`Session::generate`] and
//! [`Session::post`] run both halves inline.

use crate::ai::GeminiClient;
use crate::category::Category;
use crate::error::{Error, Result};
use crate::notification::{Notification, NotificationKind, Toast};
use crate::state::{ConfigField, NextcloudConfig, Quote};
use crate::talk::TalkClient;

pub const NO_QUOTE: &str = "No quote selected or generated to post.";
pub const INCOMPLETE_CONFIG: &str = "Nextcloud configuration is incomplete.";

/// A validated post, ready to be sent
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub config: NextcloudConfig,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Session {
    config: NextcloudConfig,
    category: Category,
    current_quote: Option<Quote>,
    custom_quotes: Vec<Quote>,
    generating: bool,
    posting: bool,
    toast: Toast,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors
    pub fn config(&self) -> &NextcloudConfig {
        &self.config
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.current_quote.as_ref()
    }

    pub fn custom_quotes(&self) -> &[Quote] {
        &self.custom_quotes
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_posting(&self) -> bool {
        self.posting
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.toast.current()
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn toast_mut(&mut self) -> &mut Toast {
        &mut self.toast
    }

    // Configuration and category
    pub fn set_config_field(&mut self, field: ConfigField, value: impl Into<String>) {
        self.config.set(field, value);
    }

    pub fn config_field_mut(&mut self, field: ConfigField) -> &mut String {
        self.config.get_mut(field)
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn cycle_category(&mut self) {
        self.category = self.category.next();
    }

    // Generation
    /// Start a generation. Returns the category to generate for, or `None`
    /// if one is already in flight.
    pub fn begin_generate(&mut self) -> Option<Category> {
        if self.generating {
            return None;
        }
        self.generating = true;
        self.current_quote = None;
        Some(self.category)
    }

    pub fn finish_generate(&mut self, result: Result<Quote>) {
        self.generating = false;
        match result {
            Ok(quote) => {
                self.current_quote = Some(quote);
                self.notify_success("Quote generated!");
            }
            Err(e) => self.report("Failed to generate quote", e),
        }
    }

    pub async fn generate(&mut self, client: &GeminiClient) {
        if let Some(category) = self.begin_generate() {
            let result = client.generate_quote(category).await;
            self.finish_generate(result);
        }
    }

    // Posting
    /// Check preconditions and start a post. Returns `None` if a post is
    /// already in flight or validation failed (which is reported).
    pub fn begin_post(&mut self) -> Option<PostRequest> {
        if self.posting {
            return None;
        }
        match self.validate_post() {
            Ok(request) => {
                self.posting = true;
                Some(request)
            }
            Err(e) => {
                self.report("Post blocked", e);
                None
            }
        }
    }

    pub fn finish_post(&mut self, result: Result<()>) {
        self.posting = false;
        match result {
            Ok(()) => self.notify_success("Quote posted successfully to Nextcloud Talk!"),
            Err(e) => self.report("Failed to post to Nextcloud", e),
        }
    }

    pub async fn post(&mut self, client: &TalkClient) {
        if let Some(request) = self.begin_post() {
            let result = client.post_message(&request.config, &request.message).await;
            self.finish_post(result);
        }
    }

    fn validate_post(&self) -> Result<PostRequest> {
        let quote = self
            .current_quote
            .as_ref()
            .ok_or_else(|| Error::Validation(NO_QUOTE.to_string()))?;
        if !self.config.is_complete() {
            return Err(Error::Validation(INCOMPLETE_CONFIG.to_string()));
        }
        Ok(PostRequest {
            config: self.config.clone(),
            message: quote.to_message(),
        })
    }

    // Custom quotes
    pub fn add_custom_quote(&mut self, quote: &str, author: &str) -> bool {
        if quote.trim().is_empty() || author.trim().is_empty() {
            self.report(
                "Custom quote rejected",
                Error::Validation("Both a quote and an author are required.".to_string()),
            );
            return false;
        }
        self.custom_quotes.push(Quote::new(quote, author));
        self.notify_success("Custom quote added!");
        true
    }

    pub fn delete_custom_quote(&mut self, index: usize) -> bool {
        if index >= self.custom_quotes.len() {
            self.report("Custom quote not deleted", Self::no_custom_quote(index));
            return false;
        }
        self.custom_quotes.remove(index);
        self.notify_success("Custom quote deleted.");
        true
    }

    pub fn select_custom_quote(&mut self, index: usize) -> bool {
        match self.custom_quotes.get(index) {
            Some(quote) => {
                self.current_quote = Some(quote.clone());
                self.notify_success("Custom quote selected.");
                true
            }
            None => {
                self.report("Custom quote not selected", Self::no_custom_quote(index));
                false
            }
        }
    }

    fn no_custom_quote(index: usize) -> Error {
        Error::Validation(format!("There is no custom quote #{}.", index + 1))
    }

    // Notifications
    fn notify_success(&mut self, message: &str) {
        tracing::info!(notification = message, "action succeeded");
        self.toast.show(message, NotificationKind::Success);
    }

    /// The one place errors become notifications. The log gets the full detail.
    fn report(&mut self, action: &str, error: Error) {
        tracing::error!(action, error = %error.diagnostic(), "action failed");
        self.toast.show(error.to_string(), NotificationKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config(session: &mut Session) {
        session.set_config_field(ConfigField::Url, "https://cloud.example.com/");
        session.set_config_field(ConfigField::RoomToken, "abc");
        session.set_config_field(ConfigField::BotUser, "user");
        session.set_config_field(ConfigField::BotPassword, "pass");
    }

    fn last_message(session: &Session) -> (String, NotificationKind) {
        let n = session.notification().expect("a notification should be visible");
        (n.message.clone(), n.kind)
    }

    #[test]
    fn test_add_then_delete_leaves_list_empty() {
        let mut session = Session::new();
        assert!(session.add_custom_quote("Q", "A"));
        assert_eq!(session.custom_quotes(), &[Quote::new("Q", "A")]);

        assert!(session.delete_custom_quote(0));
        assert!(session.custom_quotes().is_empty());
        assert_eq!(last_message(&session), ("Custom quote deleted.".to_string(), NotificationKind::Success));
    }

    #[test]
    fn test_custom_quotes_keep_insertion_order() {
        let mut session = Session::new();
        session.add_custom_quote("one", "A");
        session.add_custom_quote("two", "B");
        session.add_custom_quote("three", "C");
        session.delete_custom_quote(1);

        let quotes: Vec<&str> = session.custom_quotes().iter().map(|q| q.quote.as_str()).collect();
        assert_eq!(quotes, vec!["one", "three"]);
    }

    #[test]
    fn test_blank_custom_quote_is_rejected() {
        let mut session = Session::new();
        assert!(!session.add_custom_quote("  ", "A"));
        assert!(!session.add_custom_quote("Q", ""));
        assert!(session.custom_quotes().is_empty());
        assert_eq!(last_message(&session).1, NotificationKind::Error);
    }

    #[test]
    fn test_select_sets_current_quote_exactly() {
        let mut session = Session::new();
        session.add_custom_quote("Simplicity is prerequisite for reliability.", "Edsger Dijkstra");
        assert!(session.select_custom_quote(0));
        assert_eq!(
            session.current_quote(),
            Some(&Quote::new("Simplicity is prerequisite for reliability.", "Edsger Dijkstra"))
        );
        assert_eq!(last_message(&session).0, "Custom quote selected.");
    }

    #[test]
    fn test_out_of_range_index_reports_error() {
        let mut session = Session::new();
        assert!(!session.delete_custom_quote(0));
        assert!(!session.select_custom_quote(3));
        assert_eq!(last_message(&session), ("There is no custom quote #4.".to_string(), NotificationKind::Error));
    }

    #[test]
    fn test_post_without_quote_is_blocked() {
        let mut session = Session::new();
        complete_config(&mut session);

        assert!(session.begin_post().is_none());
        assert!(!session.is_posting());
        assert_eq!(last_message(&session), (NO_QUOTE.to_string(), NotificationKind::Error));
    }

    #[test]
    fn test_post_with_incomplete_config_is_blocked() {
        for field in ConfigField::all() {
            let mut session = Session::new();
            complete_config(&mut session);
            session.set_config_field(field, "");
            session.add_custom_quote("Q", "A");
            session.select_custom_quote(0);

            assert!(session.begin_post().is_none(), "{field:?} empty should block posting");
            assert_eq!(last_message(&session).0, INCOMPLETE_CONFIG);
        }
    }

    #[test]
    fn test_begin_post_builds_message_and_holds_flag() {
        let mut session = Session::new();
        complete_config(&mut session);
        session.add_custom_quote("Q", "A");
        session.select_custom_quote(0);

        let request = session.begin_post().unwrap();
        assert_eq!(request.message, "\"Q\" - A");
        assert_eq!(request.config.room_token, "abc");
        assert!(session.is_posting());
        assert!(session.begin_post().is_none(), "second post while busy");

        session.finish_post(Err(Error::Post { status: 401, detail: "Unauthorized".to_string() }));
        assert!(!session.is_posting());
        assert_eq!(last_message(&session), ("HTTP error! status: 401 - Unauthorized".to_string(), NotificationKind::Error));
    }

    #[test]
    fn test_generate_clears_quote_and_blocks_reentry() {
        let mut session = Session::new();
        session.add_custom_quote("old", "A");
        session.select_custom_quote(0);
        session.set_category(Category::Zen);

        assert_eq!(session.begin_generate(), Some(Category::Zen));
        assert!(session.current_quote().is_none());
        assert!(session.is_generating());
        assert_eq!(session.begin_generate(), None);

        session.finish_generate(Ok(Quote::new("Be water.", "Bruce Lee")));
        assert!(!session.is_generating());
        assert_eq!(session.current_quote(), Some(&Quote::new("Be water.", "Bruce Lee")));
    }

    #[test]
    fn test_failed_generation_leaves_no_quote() {
        let mut session = Session::new();
        session.begin_generate();
        session.finish_generate(Err(Error::generation("schema mismatch")));

        assert!(session.current_quote().is_none());
        let (message, kind) = last_message(&session);
        assert_eq!(kind, NotificationKind::Error);
        assert!(!message.contains("schema mismatch"));
    }

    #[test]
    fn test_generation_and_post_are_independent() {
        let mut session = Session::new();
        complete_config(&mut session);
        session.add_custom_quote("Q", "A");
        session.select_custom_quote(0);

        assert!(session.begin_post().is_some());
        assert!(session.begin_generate().is_some());
        assert!(session.is_posting() && session.is_generating());
    }
}
