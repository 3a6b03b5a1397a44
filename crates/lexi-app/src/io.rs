use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::{AppEvent, IncomingMessage, OutgoingMessage, UserId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Read chat lines from `input` as one user until EOF or cancellation
pub async fn read_input<R>(
    input: R,
    user_id: UserId,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let username = std::env::var("USER").ok();
    let mut lines = input.lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Console reader stopping");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let Some(text) = line else {
            tracing::info!("Console input closed");
            event_tx.send(AppEvent::TransportClosed).await?;
            return Ok(());
        };

        if text.trim().is_empty() {
            continue;
        }

        event_tx
            .send(AppEvent::Incoming(IncomingMessage {
                user_id,
                username: username.clone(),
                text,
            }))
            .await?;
    }
}

/// Print replies to `output`, splitting long texts
pub async fn write_replies<W>(
    mut output: W,
    max_length: usize,
    cancel: CancellationToken,
    event_rx: AsyncReceiver<AppEvent>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Console writer stopping");
                return Ok(());
            }
            event = event_rx.recv() => event?,
        };

        match event {
            AppEvent::Reply(message) => write_reply(&mut output, &message, max_length).await?,
            AppEvent::TransportClosed => {
                tracing::info!("Console writer done");
                return Ok(());
            }
            AppEvent::Incoming(_) => {}
        }
    }
}

pub async fn write_reply<W>(
    output: &mut W,
    message: &OutgoingMessage,
    max_length: usize,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for chunk in split_message(&message.text, max_length) {
        output.write_all(chunk.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
    }

    if let Some(path) = &message.audio_path {
        output
            .write_all(format!("🔊 {}\n", path.display()).as_bytes())
            .await?;
    }

    if !message.options.is_empty() {
        output
            .write_all(format!("[{}]\n", message.options.join("] [")).as_bytes())
            .await?;
    }

    output.flush().await
}

/// Split `text` into chunks of at most `max_length` characters, cutting after
/// the last line break in each window when there is one
pub fn split_message(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_length {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + max_length).min(chars.len());
        let cut = if end == chars.len() {
            end
        } else {
            chars[start..end]
                .iter()
                .rposition(|&c| c == '\n')
                .map(|i| start + i + 1)
                .filter(|&cut| cut > start)
                .unwrap_or(end)
        };

        chunks.push(chars[start..cut].iter().collect());
        start = cut;
    }

    chunks
}
