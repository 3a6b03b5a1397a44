use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lexi_types::{UserId, VocabularyWord, WordId};

/// Personal dictionaries and quiz statistics
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Remember a chat user, refreshing the display name if known
    async fn register_user(&self, user_id: UserId, username: Option<&str>)
    -> Result<(), StoreError>;

    /// Add a word to the user's dictionary
    async fn add_word(&self, user_id: UserId, word: &str) -> Result<AddOutcome, StoreError>;

    /// Remove a word from the user's dictionary, false if it was not there
    async fn remove_word(&self, user_id: UserId, word: &str) -> Result<bool, StoreError>;

    /// Page through saved words, insertion order unless sorted alphabetically
    async fn list_words(
        &self,
        user_id: UserId,
        limit: usize,
        offset: usize,
        sort_alphabetically: bool,
    ) -> Result<Vec<VocabularyWord>, StoreError>;

    async fn count_words(&self, user_id: UserId) -> Result<u64, StoreError>;

    /// Saved words ranked by how little or how poorly they were quizzed
    async fn least_tested_words(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<WordId>, StoreError>;

    async fn record_quiz_outcome(
        &self,
        user_id: UserId,
        word_id: WordId,
        was_correct: bool,
    ) -> Result<(), StoreError>;

    /// Cached audio file recorded for a word
    async fn audio_path(&self, word: &str) -> Result<Option<PathBuf>, StoreError>;

    async fn set_audio_path(&self, word: &str, path: &Path) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid word: {0:?}")]
    InvalidWord(String),

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Storage task failed: {0}")]
    Task(String),
}
