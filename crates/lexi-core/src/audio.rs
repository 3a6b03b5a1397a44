use std::path::PathBuf;

use async_trait::async_trait;

use crate::store::StoreError;

/// Pronunciation files, downloaded once and reused
#[async_trait]
pub trait AudioCache: Send + Sync {
    /// Local file for a word, fetching `source_url` on the first miss
    async fn local_audio_path(&self, word: &str, source_url: &str) -> Result<PathBuf, AudioError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio download timed out: {0}")]
    Timeout(String),

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
