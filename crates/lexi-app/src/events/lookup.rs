use std::path::PathBuf;

use lexi_core::lookup::Definition;
use lexi_types::{OutgoingMessage, UserId};

use crate::state::AppState;

pub fn youglish_link(word: &str) -> String {
    format!(
        "https://youglish.com/pronounce/{}/english",
        word.replace(' ', "%20")
    )
}

pub async fn handle_lookup(
    state: &AppState,
    user_id: UserId,
    word: &str,
) -> anyhow::Result<OutgoingMessage> {
    tracing::debug!("Lookup for user {}: '{}'", user_id, word);

    let definition = match state.definitions.lookup(word).await {
        Ok(definition) => definition,
        Err(failure) => return Ok(OutgoingMessage::text(user_id, failure.to_string())),
    };

    state.remember_lookup(user_id, word).await;

    let text = format!(
        "{}\n\nYou can listen to the pronunciation of the word here: {}\n\nSend /add {} to save it to your dictionary.",
        definition.text,
        youglish_link(word),
        word
    );

    Ok(OutgoingMessage {
        user_id,
        text,
        audio_path: local_audio(state, &definition).await,
        options: vec![format!("/add {word}")],
    })
}

/// Cached pronunciation file, if one can be had; failures only cost the audio
async fn local_audio(state: &AppState, definition: &Definition) -> Option<PathBuf> {
    let cache = state.audio.as_ref()?;
    let mut reference = definition.audio_reference()?;

    match cache
        .local_audio_path(&reference.word, &reference.source_url)
        .await
    {
        Ok(path) => reference.local_path = Some(path),
        Err(e) => tracing::warn!("No audio for '{}': {}", reference.word, e),
    }

    reference.local_path
}
