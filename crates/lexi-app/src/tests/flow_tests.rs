use std::path::PathBuf;

use lexi_core::store::VocabularyStore;

use super::{WORDS, send, test_state};

#[tokio::test]
async fn lookup_reply_carries_links_and_audio() {
    let state = test_state(WORDS);

    let reply = send(&state, 1, "Ubiquitous").await;
    assert!(reply.text.contains("*ubiquitous*"));
    assert!(reply.text.contains("- present everywhere"));
    assert!(reply.text.contains("https://youglish.com/pronounce/ubiquitous/english"));
    assert!(reply.text.contains("/add ubiquitous"));
    assert_eq!(
        reply.audio_path,
        Some(PathBuf::from("audio_files/ubiquitous.wav"))
    );
    assert_eq!(reply.options, vec!["/add ubiquitous".to_string()]);
}

#[tokio::test]
async fn unknown_word_asks_to_check_spelling() {
    let state = test_state(WORDS);

    let reply = send(&state, 1, "qwzx").await;
    assert!(reply.text.contains("qwzx"));
    assert!(reply.text.contains("check the spelling"));
    assert!(reply.audio_path.is_none());
}

#[tokio::test]
async fn bare_add_saves_last_successful_lookup() {
    let state = test_state(WORDS);

    let reply = send(&state, 1, "/add").await;
    assert!(reply.text.contains("/add <word>"));

    send(&state, 1, "lexicon").await;
    send(&state, 1, "qwzx").await;

    let reply = send(&state, 1, "/add").await;
    assert_eq!(
        reply.text,
        "The word 'lexicon' has been added to your dictionary."
    );

    let reply = send(&state, 1, "/add Lexicon").await;
    assert_eq!(
        reply.text,
        "The word 'lexicon' is already in your dictionary."
    );

    let reply = send(&state, 1, "/count").await;
    assert_eq!(reply.text, "You have 1 word in your dictionary.");
}

#[tokio::test]
async fn remove_reports_presence() {
    let state = test_state(WORDS);
    send(&state, 1, "/add ephemeral").await;

    let reply = send(&state, 1, "/remove ephemeral").await;
    assert_eq!(
        reply.text,
        "The word 'ephemeral' has been removed from your dictionary."
    );

    let reply = send(&state, 1, "/remove ephemeral").await;
    assert_eq!(
        reply.text,
        "The word 'ephemeral' is not present in your dictionary."
    );

    let reply = send(&state, 1, "/remove").await;
    assert!(reply.text.contains("/remove <word>"));
}

#[tokio::test]
async fn words_are_paged() {
    let state = test_state(WORDS);
    for word in ["kiwi", "apple", "mango", "banana", "cherry", "date", "fig"] {
        send(&state, 1, &format!("/add {word}")).await;
    }

    let first = send(&state, 1, "/words").await;
    assert!(first.text.starts_with("Your dictionary:\n1. kiwi\n2. apple\n"));
    assert!(first.text.contains("5. cherry"));
    assert!(!first.text.contains("date"));
    assert!(first.text.ends_with("Page 1/2"));
    assert_eq!(
        first.options,
        vec!["kiwi", "apple", "mango", "banana", "cherry", "/words 2"]
    );

    let second = send(&state, 1, "/words 2").await;
    assert!(second.text.contains("6. date\n7. fig"));
    assert!(second.text.ends_with("Page 2/2"));
    assert_eq!(second.options, vec!["date", "fig", "/words 1"]);

    let sorted = send(&state, 1, "/words alpha").await;
    assert!(sorted.text.starts_with("Your dictionary:\n1. apple\n2. banana\n"));
    assert_eq!(sorted.options.first().map(String::as_str), Some("apple"));
    assert_eq!(sorted.options.last().map(String::as_str), Some("/words 2 alpha"));

    let missing = send(&state, 1, "/words 3").await;
    assert!(missing.text.contains("does not exist"));
}

#[tokio::test]
async fn empty_dictionary_is_explained() {
    let state = test_state(WORDS);

    assert!(send(&state, 1, "/words").await.text.contains("empty"));
    assert!(send(&state, 1, "/reminder").await.text.contains("empty"));
    assert_eq!(
        send(&state, 1, "/count").await.text,
        "You have no saved words yet."
    );
}

#[tokio::test]
async fn reminder_shows_word_and_definition() {
    let state = test_state(WORDS);
    send(&state, 1, "/add ephemeral").await;

    let reply = send(&state, 1, "/reminder").await;
    assert!(reply.text.starts_with("Here's a random word from your dictionary: ephemeral"));
    assert!(reply.text.contains("lasting a very short time"));
}

#[tokio::test]
async fn quiz_needs_two_words() {
    let state = test_state(WORDS);
    send(&state, 1, "/add lexicon").await;

    let reply = send(&state, 1, "/quiz").await;
    assert!(reply.text.contains("at least 2"));
    assert!(!state.sessions.has_pending(1).await);
}

#[tokio::test]
async fn quiz_round_trip_records_outcome() {
    let state = test_state(WORDS);
    for (word, _) in WORDS {
        send(&state, 1, &format!("/add {word}")).await;
    }

    let reply = send(&state, 1, "/quiz").await;
    assert_eq!(reply.options, vec!["1", "2", "3"]);

    let question = state.sessions.pending(1).await.unwrap();
    assert!(reply.text.contains(&format!("What does '{}' mean?", question.word)));
    assert_eq!(question.options.len(), 3);

    let correct = question
        .options
        .iter()
        .position(|o| *o == question.correct_definition_text)
        .unwrap()
        + 1;

    let reply = send(&state, 1, &correct.to_string()).await;
    assert!(reply.text.starts_with("Correct!"));
    assert!(!state.sessions.has_pending(1).await);

    // The quizzed word now ranks behind the never-quizzed ones
    let ranked = state.store.least_tested_words(1, 10).await.unwrap();
    assert_eq!(ranked.last(), Some(&question.word_id));
}

#[tokio::test]
async fn wrong_answer_reveals_meaning() {
    let state = test_state(WORDS);
    for (word, _) in WORDS {
        send(&state, 1, &format!("/add {word}")).await;
    }
    send(&state, 1, "/quiz").await;
    let question = state.sessions.pending(1).await.unwrap();

    let wrong = question
        .options
        .iter()
        .position(|o| *o != question.correct_definition_text)
        .unwrap()
        + 1;

    let reply = send(&state, 1, &format!("/answer {wrong}")).await;
    assert!(reply.text.starts_with("Not quite."));
    assert!(reply.text.contains(&question.correct_definition_text));

    let reply = send(&state, 1, "/answer 1").await;
    assert!(reply.text.contains("no active quiz question"));
}

#[tokio::test]
async fn out_of_range_answer_keeps_question() {
    let state = test_state(WORDS);
    for (word, _) in WORDS {
        send(&state, 1, &format!("/add {word}")).await;
    }
    send(&state, 1, "/quiz").await;

    let reply = send(&state, 1, "9").await;
    assert_eq!(reply.text, "Please choose a number between 1 and 3.");
    assert!(state.sessions.has_pending(1).await);

    let reply = send(&state, 1, "/answer x").await;
    assert!(reply.text.contains("/answer 2"));
    assert!(state.sessions.has_pending(1).await);
}

#[tokio::test]
async fn bare_number_without_quiz_is_a_lookup() {
    let state = test_state(WORDS);

    let reply = send(&state, 1, "1").await;
    assert!(reply.text.contains("No definition found for '1'"));
}

#[tokio::test]
async fn users_have_separate_dictionaries() {
    let state = test_state(WORDS);
    send(&state, 1, "/add lexicon").await;
    send(&state, 1, "/add ephemeral").await;

    assert_eq!(
        send(&state, 2, "/count").await.text,
        "You have no saved words yet."
    );
    assert_eq!(
        send(&state, 1, "/count").await.text,
        "You have 2 words in your dictionary."
    );

    send(&state, 1, "/quiz").await;
    assert!(state.sessions.has_pending(1).await);
    assert!(!state.sessions.has_pending(2).await);
}

#[tokio::test]
async fn fixed_replies() {
    let state = test_state(WORDS);

    assert!(send(&state, 1, "/start").await.text.starts_with("Welcome"));
    assert!(send(&state, 1, "/help").await.text.contains("/quiz"));
    assert_eq!(
        send(&state, 1, "/translate cat").await.text,
        "Unknown command /translate. Type /help to see what I can do."
    );
}

#[tokio::test]
async fn start_abandons_pending_question() {
    let state = test_state(WORDS);
    for (word, _) in WORDS {
        send(&state, 1, &format!("/add {word}")).await;
    }
    send(&state, 1, "/quiz").await;
    assert!(state.sessions.has_pending(1).await);

    send(&state, 1, "/start").await;
    assert!(!state.sessions.has_pending(1).await);

    let reply = send(&state, 1, "/answer 1").await;
    assert!(reply.text.contains("no active quiz question"));
}
