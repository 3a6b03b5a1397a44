use lexi_core::store::AddOutcome;
use lexi_types::{OutgoingMessage, UserId};

use crate::state::AppState;

pub async fn handle_add(
    state: &AppState,
    user_id: UserId,
    word: Option<String>,
) -> anyhow::Result<OutgoingMessage> {
    let word = match word {
        Some(word) => word,
        None => match state.last_lookup(user_id).await {
            Some(word) => word,
            None => {
                return Ok(OutgoingMessage::text(
                    user_id,
                    "Tell me which word to add: /add <word>",
                ));
            }
        },
    };

    let text = match state.store.add_word(user_id, &word).await? {
        AddOutcome::Added => {
            tracing::info!("User {} added '{}'", user_id, word);
            format!("The word '{word}' has been added to your dictionary.")
        }
        AddOutcome::AlreadyPresent => format!("The word '{word}' is already in your dictionary."),
    };

    Ok(OutgoingMessage::text(user_id, text))
}

pub async fn handle_remove(
    state: &AppState,
    user_id: UserId,
    word: Option<String>,
) -> anyhow::Result<OutgoingMessage> {
    let Some(word) = word else {
        return Ok(OutgoingMessage::text(
            user_id,
            "Tell me which word to remove: /remove <word>",
        ));
    };

    let text = if state.store.remove_word(user_id, &word).await? {
        tracing::info!("User {} removed '{}'", user_id, word);
        format!("The word '{word}' has been removed from your dictionary.")
    } else {
        format!("The word '{word}' is not present in your dictionary.")
    };

    Ok(OutgoingMessage::text(user_id, text))
}

pub async fn handle_words(
    state: &AppState,
    user_id: UserId,
    page: usize,
    alphabetical: bool,
) -> anyhow::Result<OutgoingMessage> {
    let per_page = state.config.chat.words_per_page.max(1);
    let total = state.store.count_words(user_id).await? as usize;

    if total == 0 {
        return Ok(OutgoingMessage::text(
            user_id,
            "Your dictionary is empty. Look up a word and save it with /add.",
        ));
    }

    let pages = total.div_ceil(per_page);
    if page > pages {
        return Ok(OutgoingMessage::text(
            user_id,
            format!("Page {page} does not exist, your dictionary has {pages} page(s)."),
        ));
    }

    let offset = (page - 1) * per_page;
    let words = state
        .store
        .list_words(user_id, per_page, offset, alphabetical)
        .await?;

    let mut text = String::from("Your dictionary:\n");
    for (i, word) in words.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", offset + i + 1, word.text));
    }
    text.push_str(&format!("\nPage {page}/{pages}"));

    // Sending a listed word back looks it up
    let mut options: Vec<String> = words.iter().map(|w| w.text.clone()).collect();
    let suffix = if alphabetical { " alpha" } else { "" };
    if page > 1 {
        options.push(format!("/words {}{suffix}", page - 1));
    }
    if page < pages {
        options.push(format!("/words {}{suffix}", page + 1));
    }

    Ok(OutgoingMessage {
        user_id,
        text,
        audio_path: None,
        options,
    })
}

pub async fn handle_count(state: &AppState, user_id: UserId) -> anyhow::Result<OutgoingMessage> {
    let count = state.store.count_words(user_id).await?;
    let text = match count {
        0 => "You have no saved words yet.".to_string(),
        1 => "You have 1 word in your dictionary.".to_string(),
        n => format!("You have {n} words in your dictionary."),
    };
    Ok(OutgoingMessage::text(user_id, text))
}
