//! Nextcloud Talk chat client.
//!
//! Posts one message per call to the OCS chat endpoint of a room using the
//! bot account's Basic credentials. Failures are split into HTTP status
//! errors ([`Error::Post`]) and transport errors ([`Error::Network`]).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use crate::error::{Error, Result, NO_DETAILS};
use crate::state::NextcloudConfig;

const CHAT_API_PATH: &str = "/ocs/v2.php/apps/spreed/api/v1/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Strip exactly one trailing slash
pub fn normalize_base_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Full chat endpoint for a room
pub fn chat_endpoint(base_url: &str, room_token: &str) -> String {
    format!("{}{}/{}", normalize_base_url(base_url), CHAT_API_PATH, room_token)
}

/// `Authorization` header value for the bot account
pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}

/// Pull `ocs.meta.message` out of an error body, if there is one
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.pointer("/ocs/meta/message"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_DETAILS)
        .to_string()
}

#[derive(Clone, Default)]
pub struct TalkClient {
    client: Client,
}

impl TalkClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn post_message(&self, config: &NextcloudConfig, message: &str) -> Result<()> {
        let endpoint = chat_endpoint(&config.url, &config.room_token);
        tracing::debug!(%endpoint, user = %config.bot_user, "posting chat message");

        let response = self.client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("OCS-APIRequest", "true")
            .header(AUTHORIZATION, basic_auth_header(&config.bot_user, &config.bot_password))
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%endpoint, error = %e, "Nextcloud request did not complete");
                Error::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            tracing::warn!(%endpoint, status = status.as_u16(), %detail, "Nextcloud rejected chat message");
            return Err(Error::Post {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::info!(status = status.as_u16(), "chat message posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_one_slash() {
        assert_eq!(normalize_base_url("https://x/"), "https://x");
        assert_eq!(normalize_base_url("https://x"), "https://x");
        assert_eq!(normalize_base_url("https://x//"), "https://x/");
    }

    #[test]
    fn test_endpoint_is_same_with_or_without_slash() {
        let expected = "https://x/ocs/v2.php/apps/spreed/api/v1/chat/abc";
        assert_eq!(chat_endpoint("https://x", "abc"), expected);
        assert_eq!(chat_endpoint("https://x/", "abc"), expected);
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth_header("user", "pass"), "Basic dXNlcjpwYXNz");
        assert_eq!(
            basic_auth_header("user", "pass"),
            format!("Basic {}", BASE64.encode("user:pass"))
        );
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(error_detail(r#"{"ocs":{"meta":{"message":"Unauthorized"}}}"#), "Unauthorized");
        assert_eq!(error_detail(r#"{"ocs":{"meta":{}}}"#), NO_DETAILS);
        assert_eq!(error_detail(r#"{"ocs":{"meta":{"message":""}}}"#), NO_DETAILS);
        assert_eq!(error_detail("<html>Bad Gateway</html>"), NO_DETAILS);
        assert_eq!(error_detail(""), NO_DETAILS);
    }
}
