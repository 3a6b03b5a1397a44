use std::collections::HashMap;
use std::pin::pin;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use lexi_config::quiz::QuizConfig;
use lexi_types::{QuizQuestion, UserId, VocabularyWord};
use rand::seq::SliceRandom;

use crate::lookup::DefinitionSource;
use crate::store::{StoreError, VocabularyStore};

/// Multiple-choice quizzes over a user's saved words
pub struct QuizEngine {
    definitions: Arc<dyn DefinitionSource>,
    store: Arc<dyn VocabularyStore>,
    config: QuizConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("You need at least {need} saved words for a quiz, you have {have}. Add more with /add.")]
    InsufficientVocabulary { have: usize, need: usize },

    #[error("I couldn't build a quiz question from your saved words right now. Please try again later.")]
    NoUsableQuestion,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QuizEngine {
    pub fn new(
        definitions: Arc<dyn DefinitionSource>,
        store: Arc<dyn VocabularyStore>,
        config: QuizConfig,
    ) -> Self {
        Self {
            definitions,
            store,
            config,
        }
    }

    /// Build the next question for a user.
    ///
    /// The question word is the first least-tested word with a usable
    /// definition, falling back to a shuffled scan of everything saved.
    /// Distractors are other saved words' definitions, never repeating an
    /// option's text.
    pub async fn next_question(&self, user_id: UserId) -> Result<QuizQuestion, QuizError> {
        let words = self
            .store
            .list_words(user_id, self.config.max_vocabulary, 0, false)
            .await?;

        let need = self.config.min_words_for_quiz;
        if words.len() < need {
            tracing::warn!(
                "User {} has {} saved words, quiz needs {}",
                user_id,
                words.len(),
                need
            );
            return Err(QuizError::InsufficientVocabulary {
                have: words.len(),
                need,
            });
        }

        let ranked = self.ranked_candidates(user_id, &words).await;
        let mut chosen = self.usable_definitions(&ranked, &[], 1).await.pop();

        if chosen.is_none() {
            tracing::info!(
                "No least-tested word usable for user {}, falling back to random pick",
                user_id
            );
            let mut pool = words.clone();
            pool.shuffle(&mut rand::thread_rng());
            chosen = self.usable_definitions(&pool, &[], 1).await.pop();
        }

        let Some((question_word, correct)) = chosen else {
            tracing::error!("No saved word of user {} has a usable definition", user_id);
            return Err(QuizError::NoUsableQuestion);
        };

        let mut options = vec![correct.clone()];
        let mut pool: Vec<VocabularyWord> = words
            .iter()
            .filter(|w| w.word_id != question_word.word_id)
            .cloned()
            .collect();
        pool.shuffle(&mut rand::thread_rng());

        let wanted = self.config.num_quiz_options.saturating_sub(1);
        for (distractor, text) in self.usable_definitions(&pool, &options, wanted).await {
            tracing::debug!(
                "Distractor '{}' added for '{}'",
                distractor.text,
                question_word.text
            );
            options.push(text);
        }

        if options.len() < need {
            tracing::warn!(
                "Only {} distinct options for '{}', need {}",
                options.len(),
                question_word.text,
                need
            );
            return Err(QuizError::NoUsableQuestion);
        }

        options.shuffle(&mut rand::thread_rng());

        tracing::info!(
            "Quiz for user {}: '{}' with {} options",
            user_id,
            question_word.text,
            options.len()
        );

        Ok(QuizQuestion {
            word_id: question_word.word_id,
            word: question_word.text,
            options,
            correct_definition_text: correct,
        })
    }

    /// Least-tested ranking restricted to words the user still has saved
    async fn ranked_candidates(
        &self,
        user_id: UserId,
        words: &[VocabularyWord],
    ) -> Vec<VocabularyWord> {
        let ranked_ids = match self
            .store
            .least_tested_words(user_id, self.config.ranked_candidates())
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Least-tested ranking failed for user {}: {}", user_id, e);
                Vec::new()
            }
        };

        let by_id: HashMap<_, _> = words.iter().map(|w| (w.word_id, w)).collect();
        ranked_ids
            .into_iter()
            .filter_map(|id| by_id.get(&id).map(|w| (*w).clone()))
            .collect()
    }

    /// Up to `wanted` candidates, in candidate order, whose definitions are
    /// usable and distinct from `taken` and from each other. Lookups run
    /// concurrently but are consumed in order; whatever is still in flight is
    /// dropped on return.
    async fn usable_definitions(
        &self,
        candidates: &[VocabularyWord],
        taken: &[String],
        wanted: usize,
    ) -> Vec<(VocabularyWord, String)> {
        let mut found: Vec<(VocabularyWord, String)> = Vec::new();
        if wanted == 0 {
            return found;
        }

        let concurrency = self.config.lookup_concurrency.max(1);
        let definitions = &self.definitions;

        let mut lookups = pin!(
            stream::iter(candidates.iter().cloned())
                .map(|word| async move {
                    let result = definitions.lookup(&word.text).await;
                    (word, result)
                })
                .buffered(concurrency)
        );

        while let Some((word, result)) = lookups.next().await {
            let definition = match result {
                Ok(definition) => definition,
                Err(failure) => {
                    tracing::debug!("Quiz candidate '{}' skipped: {}", word.text, failure.reason());
                    continue;
                }
            };

            let text = definition.quiz_text();
            if text.trim().is_empty() {
                tracing::debug!("Empty quiz text for '{}'", word.text);
                continue;
            }
            if taken.contains(&text) || found.iter().any(|(_, t)| *t == text) {
                tracing::debug!("Duplicate definition for '{}', skipped", word.text);
                continue;
            }

            found.push((word, text));
            if found.len() >= wanted {
                break;
            }
        }

        found
    }
}

/// Exact comparison, no normalization
pub fn grade(question: &QuizQuestion, selected: &str) -> bool {
    let correct = selected == question.correct_definition_text;
    tracing::info!(
        "Answer for '{}' is {}",
        question.word,
        if correct { "correct" } else { "incorrect" }
    );
    correct
}
