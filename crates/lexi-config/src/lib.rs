use serde::{Deserialize, Serialize};

use self::audio::AudioConfig;
use self::chat::ChatConfig;
use self::dictionary::DictionaryApiConfig;
use self::log::LogConfig;
use self::quiz::QuizConfig;
use self::storage::StorageConfig;

pub mod audio;
pub mod chat;
pub mod dictionary;
pub mod log;
pub mod quiz;
pub mod storage;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryApiConfig,
    pub quiz: QuizConfig,
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub chat: ChatConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build config from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            dictionary: DictionaryApiConfig::new(),
            quiz: QuizConfig::default(),
            storage: StorageConfig::new(),
            audio: AudioConfig::new(),
            chat: ChatConfig::new(),
            log: LogConfig::new(),
        }
    }
}
