use lexi_core::quiz::QuizError;
use lexi_core::session::AnswerOutcome;
use lexi_types::{OutgoingMessage, QuizQuestion, UserId};

use crate::state::AppState;

pub async fn handle_quiz(state: &AppState, user_id: UserId) -> anyhow::Result<OutgoingMessage> {
    // Built outside the session lock, lookups can take a while
    let question = match state.quiz.next_question(user_id).await {
        Ok(question) => question,
        Err(QuizError::Store(e)) => return Err(e.into()),
        Err(e) => {
            tracing::info!("No quiz for user {}: {}", user_id, e);
            return Ok(OutgoingMessage::text(user_id, e.to_string()));
        }
    };

    let text = question_text(&question);
    let options = (1..=question.options.len())
        .map(|n| n.to_string())
        .collect();

    state.sessions.install(user_id, question).await;

    Ok(OutgoingMessage {
        user_id,
        text,
        audio_path: None,
        options,
    })
}

pub fn question_text(question: &QuizQuestion) -> String {
    let mut text = format!("What does '{}' mean?\n", question.word);
    for (i, option) in question.options.iter().enumerate() {
        text.push_str(&format!("\n{}. {}", i + 1, option));
    }
    text.push_str("\n\nReply with /answer <number> or just the number.");
    text
}

pub async fn handle_answer(
    state: &AppState,
    user_id: UserId,
    choice: Option<usize>,
) -> anyhow::Result<OutgoingMessage> {
    let Some(choice) = choice else {
        return Ok(OutgoingMessage::text(
            user_id,
            "Answer with the option number, for example /answer 2",
        ));
    };

    let (question, correct) = match state.sessions.answer(user_id, choice).await {
        AnswerOutcome::NoActiveQuestion => {
            return Ok(OutgoingMessage::text(
                user_id,
                "There is no active quiz question. Send /quiz to get one.",
            ));
        }
        AnswerOutcome::InvalidChoice { options } => {
            return Ok(OutgoingMessage::text(
                user_id,
                format!("Please choose a number between 1 and {options}."),
            ));
        }
        AnswerOutcome::Graded {
            question, correct, ..
        } => (question, correct),
    };

    // The slot is already cleared, a failed write only loses the statistic
    if let Err(e) = state
        .store
        .record_quiz_outcome(user_id, question.word_id, correct)
        .await
    {
        tracing::warn!(
            "Failed to record quiz outcome for user {} word {}: {}",
            user_id,
            question.word_id,
            e
        );
    }

    let text = if correct {
        format!(
            "Correct! '{}' means: {}",
            question.word, question.correct_definition_text
        )
    } else {
        format!(
            "Not quite. '{}' means: {}",
            question.word, question.correct_definition_text
        )
    };

    Ok(OutgoingMessage {
        user_id,
        text,
        audio_path: None,
        options: vec!["/quiz".to_string()],
    })
}
