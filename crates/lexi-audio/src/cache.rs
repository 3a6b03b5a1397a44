use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lexi_config::audio::AudioConfig;
use lexi_core::audio::{AudioCache, AudioError};
use lexi_core::store::VocabularyStore;

/// Pronunciation files kept under one directory, one `.wav` per word
pub struct FileAudioCache {
    dir: PathBuf,
    client: reqwest::Client,
    store: Arc<dyn VocabularyStore>,
    timeout: Duration,
}

impl FileAudioCache {
    pub fn new(config: &AudioConfig, store: Arc<dyn VocabularyStore>) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            client: reqwest::Client::new(),
            store,
            timeout: Duration::from_secs(config.download_timeout_seconds),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn file_for(&self, word: &str) -> PathBuf {
        self.dir.join(format!("{}.wav", file_stem(word)))
    }

    async fn download(&self, source_url: &str) -> Result<Vec<u8>, AudioError> {
        let response = self
            .client
            .get(source_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(source_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Download(format!("{source_url}: HTTP {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| classify(source_url, e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AudioCache for FileAudioCache {
    async fn local_audio_path(&self, word: &str, source_url: &str) -> Result<PathBuf, AudioError> {
        if let Some(path) = self.store.audio_path(word).await? {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tracing::debug!("Audio cache hit for '{}': {}", word, path.display());
                return Ok(path);
            }
            tracing::debug!("Recorded audio for '{}' is gone, downloading again", word);
        }

        let bytes = self.download(source_url).await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.file_for(word);
        tokio::fs::write(&path, &bytes).await?;
        self.store.set_audio_path(word, &path).await?;

        tracing::info!("Saved audio for '{}' to {}", word, path.display());
        Ok(path)
    }
}

/// Flat, portable file name. Anything but letters, digits and `-` becomes
/// `_<hex>_`, so distinct words never share a file.
fn file_stem(word: &str) -> String {
    let mut stem = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_alphanumeric() || c == '-' {
            stem.push(c);
        } else {
            stem.push_str(&format!("_{:x}_", c as u32));
        }
    }
    stem
}

fn classify(source_url: &str, error: reqwest::Error) -> AudioError {
    if error.is_timeout() {
        AudioError::Timeout(source_url.to_string())
    } else {
        AudioError::Download(format!("{source_url}: {error}"))
    }
}
