use std::env;

use serde::{Deserialize, Serialize};

fn default_level() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of the human format
    #[serde(default)]
    pub json: bool,
}

impl LogConfig {
    pub fn new() -> Self {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| default_level());
        let json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self { level, json }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
