use serde::{Deserialize, Serialize};

fn default_min_words_for_quiz() -> usize {
    2
}

fn default_num_quiz_options() -> usize {
    3
}

fn default_max_vocabulary() -> usize {
    200
}

fn default_lookup_concurrency() -> usize {
    3
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct QuizConfig {
    /// Saved words a user needs before a quiz can be formed
    #[serde(default = "default_min_words_for_quiz")]
    pub min_words_for_quiz: usize,
    /// Options per question, one correct and the rest distractors
    #[serde(default = "default_num_quiz_options")]
    pub num_quiz_options: usize,
    /// Upper bound of saved words pulled from the store per question
    #[serde(default = "default_max_vocabulary")]
    pub max_vocabulary: usize,
    /// Definition lookups in flight while building a question
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

impl QuizConfig {
    /// Length of the least-tested ranking requested from the store
    pub fn ranked_candidates(&self) -> usize {
        (self.num_quiz_options * 2).max(5)
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_words_for_quiz: default_min_words_for_quiz(),
            num_quiz_options: default_num_quiz_options(),
            max_vocabulary: default_max_vocabulary(),
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}
