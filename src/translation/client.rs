//! Remote translation lookup

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::TranslationError;

pub const MYMEMORY_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A remote service that turns text in one language into another
pub trait Translator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError>;
}

/// Client for the MyMemory translation API
pub struct MyMemoryClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl MyMemoryClient {
    pub fn new() -> Result<Self, TranslationError> {
        Self::with_endpoint(MYMEMORY_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, TranslationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("language-learner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    /// Send a key with each request. Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    #[serde(default)]
    response_data: Option<ResponseData>,
    #[serde(default)]
    response_status: Value,
    #[serde(default)]
    response_details: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    translated_text: Option<String>,
}

/// `responseStatus` arrives as either a number or a numeric string
fn status_code(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_response(body: MyMemoryResponse) -> Result<String, TranslationError> {
    let status = status_code(&body.response_status);
    if status != Some(200) {
        let details = match &body.response_details {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Null => "Translation failed".to_string(),
            other => other.to_string(),
        };
        return Err(TranslationError::Api {
            status: status.unwrap_or_default(),
            details,
        });
    }

    body.response_data
        .and_then(|data| data.translated_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(TranslationError::NoTranslation)
}

impl Translator for MyMemoryClient {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        let langpair = format!("{}|{}", from, to);
        let mut query: Vec<(&str, &str)> = vec![("q", text), ("langpair", &langpair)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        log::debug!("Requesting translation {} for {:?}", langpair, text);
        let response = self.client.get(&self.endpoint).query(&query).send()?;

        if !response.status().is_success() {
            return Err(TranslationError::Api {
                status: response.status().as_u16() as u64,
                details: "Translation API request failed".to_string(),
            });
        }

        let body: MyMemoryResponse = response.json()?;
        parse_response(body)
    }
}
