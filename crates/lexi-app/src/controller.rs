use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::AppEvent;
use tokio::io::BufReader;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{read_input, write_replies};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub transport_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub app_to_transport: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            transport_to_app: kanal::bounded_async(64), // typed messages
            app_to_transport: kanal::bounded_async(256), // replies, one per message
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Event loop plus the console transport on stdin/stdout
    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.transport_to_app.1.clone(),
            self.channels.app_to_transport.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Console input
        tasks.spawn(read_input(
            BufReader::new(tokio::io::stdin()),
            self.state.config.chat.user_id,
            self.cancel_token.child_token(),
            self.channels.transport_to_app.0.clone(),
        ));

        // Console output
        tasks.spawn(write_replies(
            tokio::io::stdout(),
            self.state.config.chat.max_message_length,
            self.cancel_token.child_token(),
            self.channels.app_to_transport.1.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
