use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Chat platform user id, used as an opaque tenant key
pub type UserId = i64;

pub type WordId = i64;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Text typed by a user, transport -> app
    Incoming(IncomingMessage),
    /// Reply for a user, app -> transport
    Reply(OutgoingMessage),
    /// Transport closed its input
    TransportClosed,
}

#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub user_id: UserId,
    pub username: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub user_id: UserId,
    pub text: String,
    /// Local audio file to send along with the text
    pub audio_path: Option<PathBuf>,
    /// Inline controls offered under the message
    pub options: Vec<String>,
}

impl OutgoingMessage {
    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Normalized result of parsing one lexical API entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub headword: String,
    pub part_of_speech: Option<String>,
    pub short_definitions: Vec<String>,
    pub pronunciations: Vec<Pronunciation>,
    pub usage_examples: Vec<String>,
    pub illustration_id: Option<String>,
}

impl DictionaryEntry {
    /// An entry is worth showing if it carries at least one content section
    pub fn is_renderable(&self) -> bool {
        self.part_of_speech.is_some()
            || !self.short_definitions.is_empty()
            || !self.pronunciations.is_empty()
            || !self.usage_examples.is_empty()
    }

    /// Audio url of the first pronunciation that has one
    pub fn audio_url(&self) -> Option<&str> {
        self.pronunciations
            .iter()
            .find_map(|p| p.audio_ref.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub text: String,
    pub audio_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioReference {
    pub word: String,
    pub source_url: String,
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub word_id: WordId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub word_id: WordId,
    pub word: String,
    /// Shuffled answer options, the correct one among them
    pub options: Vec<String>,
    pub correct_definition_text: String,
}

impl QuizQuestion {
    /// Option text for a 1-based choice number
    pub fn option(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}
