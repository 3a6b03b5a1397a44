use lexi_types::{OutgoingMessage, UserId};
use rand::Rng;

use crate::state::AppState;

/// A random saved word with its current definition
pub async fn handle_reminder(state: &AppState, user_id: UserId) -> anyhow::Result<OutgoingMessage> {
    let count = state.store.count_words(user_id).await? as usize;
    if count == 0 {
        return Ok(OutgoingMessage::text(
            user_id,
            "Your dictionary is empty. Look up a word and save it with /add.",
        ));
    }

    let offset = rand::thread_rng().gen_range(0..count);
    let Some(word) = state
        .store
        .list_words(user_id, 1, offset, false)
        .await?
        .into_iter()
        .next()
    else {
        return Ok(OutgoingMessage::text(
            user_id,
            "Your dictionary is empty. Look up a word and save it with /add.",
        ));
    };

    let body = match state.definitions.lookup(&word.text).await {
        Ok(definition) => definition.text,
        Err(failure) => failure.to_string(),
    };

    Ok(OutgoingMessage::text(
        user_id,
        format!(
            "Here's a random word from your dictionary: {}\n\n{}",
            word.text, body
        ),
    ))
}
