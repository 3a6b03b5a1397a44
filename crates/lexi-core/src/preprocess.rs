use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default English word preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC), then fold case
        let text: String = text.nfkc().collect::<String>().to_lowercase();

        // Phrases keep single spaces between words
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Canonical form of a word, used as its unique key in storage
pub fn normalize_word(text: &str) -> String {
    DefaultPreprocessor.process(text)
}
