use std::collections::HashMap;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::{AppEvent, IncomingMessage, OutgoingMessage, UserId};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::commands::{Command, HELP, WELCOME, bare_choice};
use crate::state::AppState;

pub mod lookup;
pub mod quiz;
pub mod reminder;
pub mod vocabulary;

use lookup::handle_lookup;
use quiz::{handle_answer, handle_quiz};
use reminder::handle_reminder;
use vocabulary::{handle_add, handle_count, handle_remove, handle_words};

/// Messages a single user may have queued before the loop waits on them
const USER_QUEUE_CAPACITY: usize = 32;

/// App's main loop.
///
/// Each user gets one worker task fed by its own queue, so one user's
/// messages are handled in arrival order while different users run
/// concurrently.
pub async fn event_loop(
    state: Arc<AppState>,
    transport_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_transport_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for messages");
    let mut workers = JoinSet::new();
    let mut queues: HashMap<UserId, AsyncSender<IncomingMessage>> = HashMap::new();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = transport_to_app_rx.recv() => event?,
        };

        // Reap workers that died
        while let Some(result) = workers.try_join_next() {
            if let Err(e) = result {
                tracing::error!("User worker panicked: {}", e);
            }
        }

        match event {
            AppEvent::Incoming(message) => {
                let user_id = message.user_id;
                if queues.get(&user_id).is_some_and(|q| q.is_disconnected()) {
                    tracing::warn!("[EVENT_LOOP] Worker for user {} is gone, restarting", user_id);
                    queues.remove(&user_id);
                }

                let queue = queues.entry(user_id).or_insert_with(|| {
                    let (tx, rx) = kanal::bounded_async(USER_QUEUE_CAPACITY);
                    workers.spawn(user_worker(
                        Arc::clone(&state),
                        user_id,
                        rx,
                        app_to_transport_tx.clone(),
                    ));
                    tx
                });

                if let Err(e) = queue.send(message).await {
                    tracing::error!("Failed to queue message for user {}: {}", user_id, e);
                }
            }
            AppEvent::TransportClosed => {
                tracing::info!("[EVENT_LOOP] Transport closed, finishing pending replies");
                // Closing the queues lets each worker drain what it has and exit
                queues.clear();
                while let Some(result) = workers.join_next().await {
                    if let Err(e) = result {
                        tracing::error!("User worker panicked: {}", e);
                    }
                }
                app_to_transport_tx.send(AppEvent::TransportClosed).await?;
                break;
            }
            AppEvent::Reply(_) => {
                // Outbound only, never expected here
                tracing::warn!("[EVENT_LOOP] Ignoring reply event on inbound channel");
            }
        }
    }

    Ok(())
}

/// Handle one user's messages strictly one after another
async fn user_worker(
    state: Arc<AppState>,
    user_id: UserId,
    queue: AsyncReceiver<IncomingMessage>,
    app_to_transport_tx: AsyncSender<AppEvent>,
) {
    while let Ok(message) = queue.recv().await {
        let reply = handle_message(&state, message).await;
        if let Err(e) = app_to_transport_tx.send(AppEvent::Reply(reply)).await {
            tracing::error!("Failed to send reply to transport: {}", e);
            break;
        }
    }
    tracing::debug!("Worker for user {} finished", user_id);
}

/// Route one message; every message gets exactly one reply
pub async fn handle_message(state: &AppState, message: IncomingMessage) -> OutgoingMessage {
    let user_id = message.user_id;

    if let Err(e) = state
        .store
        .register_user(user_id, message.username.as_deref())
        .await
    {
        tracing::warn!("Failed to register user {}: {}", user_id, e);
    }

    match dispatch(state, &message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Handling '{}' for user {} failed: {:#}", message.text, user_id, e);
            OutgoingMessage::text(
                user_id,
                "Sorry, something went wrong on my side. Please try again later.",
            )
        }
    }
}

async fn dispatch(state: &AppState, message: &IncomingMessage) -> anyhow::Result<OutgoingMessage> {
    let user_id = message.user_id;

    if let Some(choice) = bare_choice(&message.text) {
        if state.sessions.has_pending(user_id).await {
            return handle_answer(state, user_id, Some(choice)).await;
        }
    }

    let command = Command::parse(&message.text);
    tracing::debug!("User {} sent {:?}", user_id, command);

    match command {
        Command::Start => {
            // A fresh start abandons any question left unanswered
            if state.sessions.clear(user_id).await.is_some() {
                tracing::debug!("Dropped pending quiz question of user {}", user_id);
            }
            Ok(OutgoingMessage::text(user_id, WELCOME))
        }
        Command::Help => Ok(OutgoingMessage::text(user_id, HELP)),
        Command::Add(word) => handle_add(state, user_id, word).await,
        Command::Remove(word) => handle_remove(state, user_id, word).await,
        Command::Words { page, alphabetical } => {
            handle_words(state, user_id, page, alphabetical).await
        }
        Command::Count => handle_count(state, user_id).await,
        Command::Reminder => handle_reminder(state, user_id).await,
        Command::Quiz => handle_quiz(state, user_id).await,
        Command::Answer(choice) => handle_answer(state, user_id, choice).await,
        Command::Lookup(word) => handle_lookup(state, user_id, &word).await,
        Command::Unknown(name) => Ok(OutgoingMessage::text(
            user_id,
            format!("Unknown command /{name}. Type /help to see what I can do."),
        )),
        Command::Empty => Ok(OutgoingMessage::text(
            user_id,
            "Send me an English word and I'll look it up.",
        )),
    }
}
