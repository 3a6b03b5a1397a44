use std::collections::HashMap;
use std::sync::Arc;

use lexi_config::Config;
use lexi_core::audio::AudioCache;
use lexi_core::lookup::DefinitionSource;
use lexi_core::quiz::QuizEngine;
use lexi_core::session::QuizSessions;
use lexi_core::store::VocabularyStore;
use lexi_types::UserId;
use tokio::sync::Mutex;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn VocabularyStore>,
    pub definitions: Arc<dyn DefinitionSource>,
    pub quiz: QuizEngine,
    pub sessions: QuizSessions,
    /// `None` when audio is disabled
    pub audio: Option<Arc<dyn AudioCache>>,
    /// Last successfully looked-up word per user, for a bare /add
    pub last_lookup: Mutex<HashMap<UserId, String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn VocabularyStore>,
        definitions: Arc<dyn DefinitionSource>,
        audio: Option<Arc<dyn AudioCache>>,
    ) -> Self {
        let quiz = QuizEngine::new(
            Arc::clone(&definitions),
            Arc::clone(&store),
            config.quiz.clone(),
        );

        Self {
            config,
            store,
            definitions,
            quiz,
            sessions: QuizSessions::new(),
            audio,
            last_lookup: Mutex::new(HashMap::new()),
        }
    }

    pub async fn remember_lookup(&self, user_id: UserId, word: &str) {
        self.last_lookup
            .lock()
            .await
            .insert(user_id, word.to_string());
    }

    pub async fn last_lookup(&self, user_id: UserId) -> Option<String> {
        self.last_lookup.lock().await.get(&user_id).cloned()
    }
}
