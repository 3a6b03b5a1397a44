use std::env;

use serde::{Deserialize, Serialize};

fn default_max_message_length() -> usize {
    3800
}

fn default_words_per_page() -> usize {
    5
}

fn default_user_id() -> i64 {
    1
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ChatConfig {
    /// Longer replies are split into several messages
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_words_per_page")]
    pub words_per_page: usize,
    /// User id the console transport speaks as
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl ChatConfig {
    pub fn new() -> Self {
        let user_id = env::var("CHAT_USER_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_user_id);

        Self {
            user_id,
            ..Self::default()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            words_per_page: default_words_per_page(),
            user_id: default_user_id(),
        }
    }
}
