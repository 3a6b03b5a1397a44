use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use lexi_config::Config;

/// Load config from a JSON file, or from the environment when no file is given.
///
/// Runs before tracing is set up, so it does not log; see [`config_source`].
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Where the config came from, for the startup log
pub fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("config file {}", path.display()),
        None => "environment".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dictionary": {{"api_key": "k"}}, "quiz": {{"num_quiz_options": 4}}}}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.dictionary.api_key, "k");
        assert_eq!(config.dictionary.timeout_seconds, 10);
        assert_eq!(config.quiz.num_quiz_options, 4);
        assert_eq!(config.quiz.min_words_for_quiz, 2);
        assert_eq!(config.chat.max_message_length, 3800);
        assert_eq!(config.storage.db_path, "lexi.db");
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_config(Some(file.path())).is_err());
        assert!(load_config(Some(Path::new("/nonexistent/lexi.json"))).is_err());
    }

    #[test]
    fn config_source_names_file_or_environment() {
        assert_eq!(config_source(None), "environment");
        assert_eq!(
            config_source(Some(Path::new("/etc/lexi.json"))),
            "config file /etc/lexi.json"
        );
    }
}
