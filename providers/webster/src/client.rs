use std::time::Duration;

use async_trait::async_trait;
use lexi_config::dictionary::DictionaryApiConfig;
use lexi_core::lookup::{Definition, DefinitionSource, LookupFailure, log_lookup};
use reqwest::{StatusCode, Url};

use crate::parser::{EntryParser, ParsedResponse};

/// Merriam-Webster learner's dictionary over HTTP
#[derive(Clone)]
pub struct WebsterClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    timeout: Duration,
    parser: EntryParser,
}

impl WebsterClient {
    pub fn new(config: &DictionaryApiConfig) -> Self {
        if config.api_key.is_empty() {
            tracing::warn!("MERRIAM_WEBSTER_API_KEY is not set, lookups will be rejected upstream");
        }

        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            parser: EntryParser::new(config.audio_base_url.clone()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api_url}/{word}?key={api_key}`, the word as one escaped path segment
    fn request_url(&self, word: &str) -> Option<Url> {
        let mut url = Url::parse(&self.api_url).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(word);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Some(url)
    }

    async fn fetch(&self, word: &str) -> Result<Definition, LookupFailure> {
        let url = self.request_url(word).ok_or_else(|| LookupFailure::Network {
            word: word.to_string(),
            detail: format!("invalid dictionary API url: {}", self.api_url),
        })?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(word, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupFailure::NotFound {
                word: word.to_string(),
            });
        }

        if status.is_server_error() {
            return Err(LookupFailure::ServiceUnavailable {
                word: word.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(LookupFailure::Network {
                word: word.to_string(),
                detail: format!("HTTP {}", status),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(word, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(LookupFailure::Empty {
                word: word.to_string(),
            });
        }

        let raw: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| LookupFailure::MalformedResponse {
                word: word.to_string(),
                detail: format!("Failed to parse response: {}", e),
            })?;

        let parsed = self
            .parser
            .parse(&raw, word)
            .map_err(|e| LookupFailure::MalformedResponse {
                word: word.to_string(),
                detail: e.to_string(),
            })?;

        match parsed {
            ParsedResponse::Empty => Err(LookupFailure::Empty {
                word: word.to_string(),
            }),
            ParsedResponse::Suggestions(suggestions) => Err(LookupFailure::Suggestions {
                word: word.to_string(),
                suggestions,
            }),
            ParsedResponse::Entries(entries) => entries
                .into_iter()
                .find(|entry| entry.is_renderable())
                .map(|entry| Definition::from_entry(word, entry))
                .ok_or_else(|| LookupFailure::NoRenderableContent {
                    word: word.to_string(),
                }),
        }
    }
}

#[async_trait]
impl DefinitionSource for WebsterClient {
    async fn lookup(&self, word: &str) -> Result<Definition, LookupFailure> {
        let result = self.fetch(word).await;
        log_lookup(word, &result);
        result
    }
}

fn classify(word: &str, error: reqwest::Error) -> LookupFailure {
    if error.is_timeout() {
        LookupFailure::Timeout {
            word: word.to_string(),
        }
    } else if error.is_decode() {
        LookupFailure::MalformedResponse {
            word: word.to_string(),
            detail: error.to_string(),
        }
    } else {
        LookupFailure::Network {
            word: word.to_string(),
            detail: error.to_string(),
        }
    }
}
