use std::env;

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    "lexi.db".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        let db_path = env::var("DB_PATH").unwrap_or_else(|_| default_db_path());

        Self { db_path }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}
