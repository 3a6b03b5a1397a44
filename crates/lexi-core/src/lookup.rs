use async_trait::async_trait;
use lexi_types::{AudioReference, DictionaryEntry};

use crate::format::{render, render_entry};

/// Definition lookup interface
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Look up one word, one outbound request, no retries
    async fn lookup(&self, word: &str) -> Result<Definition, LookupFailure>;
}

/// A rendered definition ready for the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Word as it was asked for
    pub word: String,
    pub text: String,
    pub audio_url: Option<String>,
    pub entry: DictionaryEntry,
}

impl Definition {
    pub fn from_entry(word: &str, entry: DictionaryEntry) -> Self {
        Self {
            word: word.to_string(),
            text: render_entry(&entry),
            audio_url: entry.audio_url().map(str::to_string),
            entry,
        }
    }

    /// Pronunciation file to hand to the audio cache, not yet fetched
    pub fn audio_reference(&self) -> Option<AudioReference> {
        self.audio_url.as_ref().map(|url| AudioReference {
            word: self.word.clone(),
            source_url: url.clone(),
            local_path: None,
        })
    }

    /// Compact meaning used as a quiz option: the short definitions, or the
    /// whole display text when the entry has none
    pub fn quiz_text(&self) -> String {
        if self.entry.short_definitions.is_empty() {
            return self.text.clone();
        }

        self.entry
            .short_definitions
            .iter()
            .map(|d| render(d))
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    #[error("The dictionary took too long to answer for '{word}'. Please try again.")]
    Timeout { word: String },

    #[error("Sorry, I couldn't reach the dictionary service while looking up '{word}'.")]
    Network { word: String, detail: String },

    #[error("No definition found for '{word}', please check the spelling.")]
    NotFound { word: String },

    #[error("The dictionary service is unavailable right now (HTTP {status}), please try again later.")]
    ServiceUnavailable { word: String, status: u16 },

    #[error("The dictionary sent an answer for '{word}' that I couldn't read.")]
    MalformedResponse { word: String, detail: String },

    #[error("'{word}' is not in the dictionary. Did you mean: {}?", .suggestions.join(", "))]
    Suggestions {
        word: String,
        suggestions: Vec<String>,
    },

    #[error("No definition found for '{word}'.")]
    Empty { word: String },

    #[error("The dictionary knows '{word}' but has nothing I can show for it.")]
    NoRenderableContent { word: String },
}

impl LookupFailure {
    /// Stable reason tag for logs
    pub fn reason(&self) -> &'static str {
        match self {
            LookupFailure::Timeout { .. } => "timeout",
            LookupFailure::Network { .. } => "network_error",
            LookupFailure::NotFound { .. } => "not_found",
            LookupFailure::ServiceUnavailable { .. } => "service_unavailable",
            LookupFailure::MalformedResponse { .. } => "malformed_response",
            LookupFailure::Suggestions { .. } => "suggestions",
            LookupFailure::Empty { .. } => "empty",
            LookupFailure::NoRenderableContent { .. } => "no_renderable_content",
        }
    }

    pub fn word(&self) -> &str {
        match self {
            LookupFailure::Timeout { word }
            | LookupFailure::Network { word, .. }
            | LookupFailure::NotFound { word }
            | LookupFailure::ServiceUnavailable { word, .. }
            | LookupFailure::MalformedResponse { word, .. }
            | LookupFailure::Suggestions { word, .. }
            | LookupFailure::Empty { word }
            | LookupFailure::NoRenderableContent { word } => word,
        }
    }

    fn detail(&self) -> String {
        match self {
            LookupFailure::Network { detail, .. }
            | LookupFailure::MalformedResponse { detail, .. } => detail.clone(),
            LookupFailure::ServiceUnavailable { status, .. } => format!("HTTP {status}"),
            LookupFailure::Suggestions { suggestions, .. } => suggestions.join(", "),
            _ => String::new(),
        }
    }
}

/// One record per lookup call
pub fn log_lookup(word: &str, result: &Result<Definition, LookupFailure>) {
    match result {
        Ok(definition) => tracing::info!(
            lookup_type = "definition_api",
            word,
            success = true,
            audio = definition.audio_url.is_some(),
            "definition lookup succeeded"
        ),
        Err(failure) => tracing::warn!(
            lookup_type = "definition_api",
            word,
            success = false,
            reason = failure.reason(),
            error = %failure.detail(),
            "definition lookup failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use lexi_types::Pronunciation;

    use super::*;

    #[test]
    fn not_found_message_names_the_word() {
        let failure = LookupFailure::NotFound {
            word: "xyzzy".to_string(),
        };
        let message = failure.to_string();
        assert!(message.contains("xyzzy"));
        assert!(message.contains("check the spelling"));
    }

    #[test]
    fn suggestions_are_listed_verbatim() {
        let failure = LookupFailure::Suggestions {
            word: "caat".to_string(),
            suggestions: vec!["cat".to_string(), "cot".to_string()],
        };
        assert!(failure.to_string().contains("Did you mean: cat, cot?"));
    }

    #[test]
    fn audio_reference_starts_unfetched() {
        let entry = DictionaryEntry {
            headword: "lexicon".to_string(),
            pronunciations: vec![Pronunciation {
                text: "ˈlɛksəˌkɑːn".to_string(),
                audio_ref: Some("https://media.test/l/lexico01.wav".to_string()),
            }],
            ..DictionaryEntry::default()
        };

        let reference = Definition::from_entry("lexicon", entry)
            .audio_reference()
            .unwrap();
        assert_eq!(reference.word, "lexicon");
        assert_eq!(reference.source_url, "https://media.test/l/lexico01.wav");
        assert!(reference.local_path.is_none());

        let silent = Definition::from_entry("word", DictionaryEntry::default());
        assert!(silent.audio_reference().is_none());
    }

    #[test]
    fn every_failure_has_its_own_message_and_reason() {
        let word = "w".to_string();
        let failures = vec![
            LookupFailure::Timeout { word: word.clone() },
            LookupFailure::Network {
                word: word.clone(),
                detail: "refused".to_string(),
            },
            LookupFailure::NotFound { word: word.clone() },
            LookupFailure::ServiceUnavailable {
                word: word.clone(),
                status: 503,
            },
            LookupFailure::MalformedResponse {
                word: word.clone(),
                detail: "eof".to_string(),
            },
            LookupFailure::Suggestions {
                word: word.clone(),
                suggestions: vec![],
            },
            LookupFailure::Empty { word: word.clone() },
            LookupFailure::NoRenderableContent { word: word.clone() },
        ];

        let mut messages: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
        let mut reasons: Vec<&str> = failures.iter().map(|f| f.reason()).collect();
        messages.sort();
        messages.dedup();
        reasons.sort();
        reasons.dedup();
        assert_eq!(messages.len(), failures.len());
        assert_eq!(reasons.len(), failures.len());
        assert!(failures.iter().all(|f| f.word() == "w"));
    }

    #[test]
    fn service_unavailable_asks_to_retry_later() {
        let failure = LookupFailure::ServiceUnavailable {
            word: "w".to_string(),
            status: 502,
        };
        assert!(failure.to_string().contains("try again later"));
    }

    #[test]
    fn quiz_text_prefers_short_definitions() {
        let entry = DictionaryEntry {
            headword: "ephemeral".to_string(),
            short_definitions: vec![
                "lasting a very short time".to_string(),
                "{it}botany{/it} living one day".to_string(),
            ],
            pronunciations: vec![Pronunciation {
                text: "ɪˈfɛmərəl".to_string(),
                audio_ref: Some("https://example.test/e/ephem01.wav".to_string()),
            }],
            ..DictionaryEntry::default()
        };

        let definition = Definition::from_entry("ephemeral", entry);
        assert_eq!(
            definition.quiz_text(),
            "lasting a very short time; _botany_ living one day"
        );
        assert_eq!(
            definition.audio_url.as_deref(),
            Some("https://example.test/e/ephem01.wav")
        );
    }

    #[test]
    fn quiz_text_falls_back_to_display_text() {
        let entry = DictionaryEntry {
            headword: "run".to_string(),
            part_of_speech: Some("verb".to_string()),
            ..DictionaryEntry::default()
        };
        let definition = Definition::from_entry("run", entry);
        assert_eq!(definition.quiz_text(), definition.text);
    }
}
