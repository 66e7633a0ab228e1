use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::category::Category;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::state::Quote;

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Shape the model output must follow: an object with required `quote` and `author` strings
pub fn quote_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "quote": {
                "type": "STRING",
                "description": "The content of the quote."
            },
            "author": {
                "type": "STRING",
                "description": "The person or source of the quote. If unknown, can be \"Anonymous\"."
            }
        },
        "required": ["quote", "author"]
    })
}

/// Parse the model's JSON text into a [`Quote`], rejecting missing or empty fields
pub fn parse_quote(text: &str) -> Result<Quote> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| Error::generation(format!("response is not valid JSON: {e}")))?;

    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::generation(format!("response has no usable `{name}` field: {value}")))
    };

    Ok(Quote {
        quote: field("quote")?,
        author: field("author")?,
    })
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from settings. Fails if no API key can be found.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.resolve_api_key()?;
        Ok(Self::new(&api_key, settings.model(), settings.base_url()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_quote(&self, category: Category) -> Result<Quote> {
        tracing::debug!(category = category.as_str(), model = %self.model, "requesting quote");

        let result = self.query_json(category.prompt(), quote_schema()).await;
        match result.and_then(|text| parse_quote(&text)) {
            Ok(quote) => {
                tracing::info!(category = category.as_str(), author = %quote.author, "quote generated");
                Ok(quote)
            }
            Err(e) => {
                tracing::warn!(error = %e.diagnostic(), "Gemini quote generation failed");
                Err(e)
            }
        }
    }

    /// Run one schema-constrained generation and return the raw JSON text
    async fn query_json(&self, prompt: &str, schema: Value) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        };

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!("Gemini API error {status}: {text}")));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("unexpected response body: {e}")))?;

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| Error::generation("response contained no candidate text"))
    }
}
