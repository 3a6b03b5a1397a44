use lexi_core::format::render;
use lexi_types::{DictionaryEntry, Pronunciation};
use serde_json::Value;

/// What a learner's dictionary response turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Entries in API order, up to and including the first renderable one
    Entries(Vec<DictionaryEntry>),
    /// "Did you mean" list returned for unknown words
    Suggestions(Vec<String>),
    /// Null body or empty list
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected a JSON array, got {0}")]
    UnexpectedShape(&'static str),
}

/// One element of a sense's `dt` (defining text) array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefiningElement {
    /// `["text", "..."]`
    Text(String),
    /// `["vis", [{"t": "..."}, ...]]`, usage examples
    VerbalIllustrations(Vec<String>),
    /// Any other tag (`uns`, `snote`, `wsgram`, ...)
    Other,
}

impl DefiningElement {
    /// None when the element is not a `[tag, payload]` pair or the payload
    /// does not fit its tag
    pub fn from_value(value: &Value) -> Option<Self> {
        let [tag, payload] = value.as_array()?.as_slice() else {
            return None;
        };

        match tag.as_str()? {
            "text" => payload.as_str().map(|t| DefiningElement::Text(t.to_string())),
            "vis" => {
                let examples = payload
                    .as_array()?
                    .iter()
                    .filter_map(|item| item.get("t")?.as_str())
                    .map(str::to_string)
                    .collect();
                Some(DefiningElement::VerbalIllustrations(examples))
            }
            _ => Some(DefiningElement::Other),
        }
    }
}

/// Parser for the Merriam-Webster learner's dictionary JSON
#[derive(Debug, Clone)]
pub struct EntryParser {
    audio_base_url: String,
}

impl EntryParser {
    pub fn new(audio_base_url: impl Into<String>) -> Self {
        Self {
            audio_base_url: audio_base_url.into(),
        }
    }

    /// Classify and parse a whole response body for the looked-up `word`
    pub fn parse(&self, raw: &Value, word: &str) -> Result<ParsedResponse, ParseError> {
        let items = match raw {
            Value::Null => return Ok(ParsedResponse::Empty),
            Value::Array(items) => items,
            Value::Bool(_) => return Err(ParseError::UnexpectedShape("a boolean")),
            Value::Number(_) => return Err(ParseError::UnexpectedShape("a number")),
            Value::String(_) => return Err(ParseError::UnexpectedShape("a string")),
            Value::Object(_) => return Err(ParseError::UnexpectedShape("an object")),
        };

        if items.is_empty() {
            return Ok(ParsedResponse::Empty);
        }

        if items.iter().all(Value::is_string) {
            let suggestions = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            return Ok(ParsedResponse::Suggestions(suggestions));
        }

        Ok(ParsedResponse::Entries(self.parse_entries(items, word)))
    }

    /// Entries in order, stopping after the first one with renderable content
    fn parse_entries(&self, items: &[Value], word: &str) -> Vec<DictionaryEntry> {
        let mut entries = Vec::new();

        for item in items {
            if !item.is_object() {
                tracing::debug!("Skipping non-object entry for '{}'", word);
                continue;
            }

            let entry = self.parse_entry(item, word);
            let renderable = entry.is_renderable();
            entries.push(entry);

            if renderable {
                break;
            }
        }

        entries
    }

    pub fn parse_entry(&self, entry: &Value, word: &str) -> DictionaryEntry {
        DictionaryEntry {
            headword: headword(entry, word),
            part_of_speech: string_field(entry, "fl"),
            short_definitions: array(entry.get("shortdef"))
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            pronunciations: self.pronunciations(entry, word),
            usage_examples: usage_examples(entry),
            illustration_id: entry.get("art").and_then(|art| string_field(art, "artid")),
        }
    }

    /// Display text of every `hwi.prs` node; only the first node carrying an
    /// audio token gets an audio reference
    fn pronunciations(&self, entry: &Value, word: &str) -> Vec<Pronunciation> {
        let nodes = array(entry.get("hwi").and_then(|hwi| hwi.get("prs")));
        let mut audio_claimed = false;
        let mut pronunciations = Vec::new();

        for node in nodes {
            let text = string_field(node, "mw").or_else(|| string_field(node, "ipa"));
            let token = node
                .get("sound")
                .and_then(|sound| string_field(sound, "audio"))
                .filter(|token| !token.is_empty());

            let audio_ref = match token {
                Some(token) if !audio_claimed => {
                    audio_claimed = true;
                    let url = self.audio_url(&token, word);
                    if url.is_none() {
                        tracing::warn!("No audio subdirectory for token '{}' of '{}'", token, word);
                    }
                    url
                }
                _ => None,
            };

            if text.is_none() && audio_ref.is_none() {
                continue;
            }

            pronunciations.push(Pronunciation {
                text: text.unwrap_or_default(),
                audio_ref,
            });
        }

        pronunciations
    }

    pub fn audio_url(&self, token: &str, word: &str) -> Option<String> {
        let subdirectory = audio_subdirectory(token, word)?;
        Some(format!(
            "{}/{}/{}.wav",
            self.audio_base_url.trim_end_matches('/'),
            subdirectory,
            token
        ))
    }
}

/// Media subdirectory for an audio token
pub fn audio_subdirectory(token: &str, word: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    for prefix in ["bix", "gg", "hom"] {
        if token.starts_with(prefix) {
            return Some(prefix.to_string());
        }
    }

    if token.starts_with('_') || token.chars().all(|c| c.is_ascii_digit()) {
        return Some("number".to_string());
    }

    // Bucketed by the word that was asked for, not the API's own field
    word.trim()
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
}

/// `meta.id` without the homograph suffix, then `hwi.hw` without syllable
/// dots, then the word that was asked for
fn headword(entry: &Value, word: &str) -> String {
    if let Some(id) = entry.get("meta").and_then(|meta| string_field(meta, "id")) {
        let id = id.split(':').next().unwrap_or_default();
        if !id.is_empty() {
            return id.to_string();
        }
    }

    if let Some(hw) = entry.get("hwi").and_then(|hwi| string_field(hwi, "hw")) {
        let hw = hw.replace('*', "");
        if !hw.is_empty() {
            return hw;
        }
    }

    word.to_string()
}

/// Verbal illustrations from `def[].sseq[][]`, in encounter order
fn usage_examples(entry: &Value) -> Vec<String> {
    let mut examples = Vec::new();

    for definition in array(entry.get("def")) {
        for sense_group in array(definition.get("sseq")) {
            for item in sense_group.as_array().map(Vec::as_slice).unwrap_or_default() {
                for element in defining_elements(item) {
                    if let DefiningElement::VerbalIllustrations(vis) = element {
                        examples.extend(vis.iter().map(|t| render(t)));
                    }
                }
            }
        }
    }

    examples
}

/// `dt` elements of a `[tag, {dt: [...]}]` sense pair
fn defining_elements(item: &Value) -> Vec<DefiningElement> {
    let Some([_, sense]) = item.as_array().map(Vec::as_slice) else {
        return Vec::new();
    };

    array(sense.get("dt"))
        .iter()
        .filter_map(DefiningElement::from_value)
        .collect()
}

fn array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}
