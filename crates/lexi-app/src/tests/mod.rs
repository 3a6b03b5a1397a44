use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use lexi_config::Config;
use lexi_core::audio::{AudioCache, AudioError};
use lexi_core::lookup::{Definition, DefinitionSource, LookupFailure};
use lexi_core::store::VocabularyStore;
use lexi_storage::SqliteVocabularyStore;
use lexi_types::{DictionaryEntry, IncomingMessage, OutgoingMessage, Pronunciation, UserId};

use crate::events::handle_message;
use crate::state::AppState;

mod flow_tests;

/// Dictionary answering from a fixed word list
pub struct FakeDefinitions {
    entries: HashMap<String, DictionaryEntry>,
}

impl FakeDefinitions {
    pub fn new(words: &[(&str, &str)]) -> Self {
        let entries = words
            .iter()
            .map(|(word, meaning)| {
                let entry = DictionaryEntry {
                    headword: word.to_string(),
                    part_of_speech: Some("adjective".to_string()),
                    short_definitions: vec![meaning.to_string()],
                    pronunciations: vec![Pronunciation {
                        text: format!("/{word}/"),
                        audio_ref: Some(format!("https://audio.test/{word}.wav")),
                    }],
                    ..DictionaryEntry::default()
                };
                (word.to_string(), entry)
            })
            .collect();

        Self { entries }
    }
}

#[async_trait]
impl DefinitionSource for FakeDefinitions {
    async fn lookup(&self, word: &str) -> Result<Definition, LookupFailure> {
        self.entries
            .get(word)
            .cloned()
            .map(|entry| Definition::from_entry(word, entry))
            .ok_or_else(|| LookupFailure::NotFound {
                word: word.to_string(),
            })
    }
}

/// Audio cache that pretends every file is already on disk
pub struct FakeAudio;

#[async_trait]
impl AudioCache for FakeAudio {
    async fn local_audio_path(&self, word: &str, _source_url: &str) -> Result<PathBuf, AudioError> {
        Ok(Path::new("audio_files").join(format!("{word}.wav")))
    }
}

pub const WORDS: &[(&str, &str)] = &[
    ("ubiquitous", "present everywhere"),
    ("ephemeral", "lasting a very short time"),
    ("lexicon", "the words used in a language"),
];

pub fn test_state(words: &[(&str, &str)]) -> Arc<AppState> {
    let store: Arc<dyn VocabularyStore> = Arc::new(SqliteVocabularyStore::open_in_memory().unwrap());
    let definitions: Arc<dyn DefinitionSource> = Arc::new(FakeDefinitions::new(words));
    let audio: Option<Arc<dyn AudioCache>> = Some(Arc::new(FakeAudio));
    Arc::new(AppState::new(Config::default(), store, definitions, audio))
}

pub async fn send(state: &AppState, user_id: UserId, text: &str) -> OutgoingMessage {
    handle_message(
        state,
        IncomingMessage {
            user_id,
            username: Some("tester".to_string()),
            text: text.to_string(),
        },
    )
    .await
}
