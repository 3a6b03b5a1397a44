use std::collections::HashMap;

use lexi_types::{QuizQuestion, UserId};
use tokio::sync::Mutex;

use crate::quiz::grade;

/// Pending quiz question per user.
///
/// Every method is one short critical section and never awaits anything but
/// the lock, so question generation and outcome recording happen outside.
#[derive(Default)]
pub struct QuizSessions {
    pending: Mutex<HashMap<UserId, QuizQuestion>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    NoActiveQuestion,
    /// Choice number out of range, the question stays pending
    InvalidChoice { options: usize },
    Graded {
        question: QuizQuestion,
        selected: String,
        correct: bool,
    },
}

impl QuizSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `question` the user's pending one, returning what it superseded
    pub async fn install(&self, user_id: UserId, question: QuizQuestion) -> Option<QuizQuestion> {
        let superseded = self.pending.lock().await.insert(user_id, question);
        if superseded.is_some() {
            tracing::debug!("Quiz question for user {} superseded", user_id);
        }
        superseded
    }

    pub async fn pending(&self, user_id: UserId) -> Option<QuizQuestion> {
        self.pending.lock().await.get(&user_id).cloned()
    }

    pub async fn has_pending(&self, user_id: UserId) -> bool {
        self.pending.lock().await.contains_key(&user_id)
    }

    /// Drop the user's pending question, if any
    pub async fn clear(&self, user_id: UserId) -> Option<QuizQuestion> {
        self.pending.lock().await.remove(&user_id)
    }

    /// Grade a 1-based choice and clear the slot in the same critical section,
    /// so a repeated answer finds no question
    pub async fn answer(&self, user_id: UserId, choice: usize) -> AnswerOutcome {
        let mut pending = self.pending.lock().await;

        let Some(question) = pending.get(&user_id) else {
            return AnswerOutcome::NoActiveQuestion;
        };

        let Some(selected) = question.option(choice).map(str::to_string) else {
            return AnswerOutcome::InvalidChoice {
                options: question.options.len(),
            };
        };

        let Some(question) = pending.remove(&user_id) else {
            return AnswerOutcome::NoActiveQuestion;
        };
        let correct = grade(&question, &selected);

        AnswerOutcome::Graded {
            question,
            selected,
            correct,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn question(word: &str) -> QuizQuestion {
        QuizQuestion {
            word_id: 7,
            word: word.to_string(),
            options: vec!["wrong".to_string(), format!("meaning of {word}")],
            correct_definition_text: format!("meaning of {word}"),
        }
    }

    #[tokio::test]
    async fn answer_grades_and_clears() {
        let sessions = QuizSessions::new();
        sessions.install(1, question("lexicon")).await;

        match sessions.answer(1, 2).await {
            AnswerOutcome::Graded {
                correct, selected, ..
            } => {
                assert!(correct);
                assert_eq!(selected, "meaning of lexicon");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!sessions.has_pending(1).await);
        assert_eq!(sessions.answer(1, 2).await, AnswerOutcome::NoActiveQuestion);
    }

    #[tokio::test]
    async fn wrong_answer_also_clears() {
        let sessions = QuizSessions::new();
        sessions.install(1, question("lexicon")).await;

        match sessions.answer(1, 1).await {
            AnswerOutcome::Graded { correct, .. } => assert!(!correct),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(sessions.pending(1).await.is_none());
    }

    #[tokio::test]
    async fn invalid_choice_keeps_question() {
        let sessions = QuizSessions::new();
        sessions.install(1, question("lexicon")).await;

        assert_eq!(
            sessions.answer(1, 0).await,
            AnswerOutcome::InvalidChoice { options: 2 }
        );
        assert_eq!(
            sessions.answer(1, 3).await,
            AnswerOutcome::InvalidChoice { options: 2 }
        );
        assert!(sessions.has_pending(1).await);
    }

    #[tokio::test]
    async fn new_question_supersedes_old() {
        let sessions = QuizSessions::new();
        assert!(sessions.install(1, question("old")).await.is_none());

        let superseded = sessions.install(1, question("new")).await;
        assert_eq!(superseded.map(|q| q.word), Some("old".to_string()));
        assert_eq!(sessions.pending(1).await.map(|q| q.word), Some("new".to_string()));
    }

    #[tokio::test]
    async fn users_do_not_share_slots() {
        let sessions = QuizSessions::new();
        sessions.install(1, question("one")).await;
        sessions.install(2, question("two")).await;

        sessions.clear(1).await;
        assert!(!sessions.has_pending(1).await);
        assert!(sessions.has_pending(2).await);
    }

    #[tokio::test]
    async fn concurrent_answers_grade_once() {
        let sessions = Arc::new(QuizSessions::new());
        sessions.install(1, question("race")).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let sessions = Arc::clone(&sessions);
            handles.push(tokio::spawn(async move { sessions.answer(1, 2).await }));
        }

        let mut graded = 0;
        for handle in handles {
            if let AnswerOutcome::Graded { .. } = handle.await.unwrap() {
                graded += 1;
            }
        }
        assert_eq!(graded, 1);
    }
}
