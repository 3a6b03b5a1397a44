use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://www.dictionaryapi.com/api/v3/references/learners/json".to_string()
}

fn default_audio_base_url() -> String {
    "https://media.merriam-webster.com/soundc11".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DictionaryApiConfig {
    /// Merriam-Webster learner's dictionary key
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_audio_base_url")]
    pub audio_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl DictionaryApiConfig {
    pub fn new() -> Self {
        let api_key = env::var("MERRIAM_WEBSTER_API_KEY").unwrap_or_default();
        let api_url = env::var("DICTIONARY_API_URL").unwrap_or_else(|_| default_api_url());
        let timeout_seconds = env::var("LOOKUP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            api_key,
            api_url,
            audio_base_url: default_audio_base_url(),
            timeout_seconds,
        }
    }
}

impl Default for DictionaryApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            audio_base_url: default_audio_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
