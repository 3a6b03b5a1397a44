use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lexi_audio::FileAudioCache;
use lexi_config::log::LogConfig;
use lexi_core::audio::AudioCache;
use lexi_core::lookup::DefinitionSource;
use lexi_core::store::VocabularyStore;
use lexi_storage::SqliteVocabularyStore;
use lexi_webster::WebsterClient;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "lexi", about = "Vocabulary assistant: definitions, a personal dictionary and quizzes")]
struct Cli {
    /// JSON config file; environment variables are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat user id the console speaks as
    #[arg(long)]
    user_id: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = profile::load_config(cli.config.as_deref())?;
    if let Some(user_id) = cli.user_id {
        config.chat.user_id = user_id;
    }
    init_tracing(&config.log);
    tracing::info!("Config loaded from {}", profile::config_source(cli.config.as_deref()));

    let store: Arc<dyn VocabularyStore> = Arc::new(
        SqliteVocabularyStore::open(&config.storage.db_path)
            .with_context(|| format!("opening database {}", config.storage.db_path))?,
    );
    let definitions: Arc<dyn DefinitionSource> = Arc::new(WebsterClient::new(&config.dictionary));
    let audio: Option<Arc<dyn AudioCache>> = if config.audio.enabled {
        Some(Arc::new(FileAudioCache::new(&config.audio, Arc::clone(&store))))
    } else {
        tracing::info!("Audio disabled");
        None
    };

    let state = Arc::new(AppState::new(config, store, definitions, audio));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tracing::info!("lexi is ready, type a word (Ctrl+D to quit)");

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("listening for ctrl+c")?;
            tracing::info!("Shutdown requested");
        }
        _ = async {
            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::error!("task exited with error: {:#}", e),
                    Err(e) => tracing::error!("task panicked: {e}"),
                }
            }
        } => {
            tracing::info!("All tasks finished");
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    Ok(())
}

fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
