use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_dir() -> String {
    "audio_files".to_string()
}

fn default_download_timeout_seconds() -> u64 {
    10
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct AudioConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory holding downloaded pronunciation files
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_download_timeout_seconds")]
    pub download_timeout_seconds: u64,
}

impl AudioConfig {
    pub fn new() -> Self {
        let dir = env::var("AUDIO_DIR").unwrap_or_else(|_| default_dir());

        Self {
            dir,
            ..Self::default()
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: default_dir(),
            download_timeout_seconds: default_download_timeout_seconds(),
        }
    }
}
