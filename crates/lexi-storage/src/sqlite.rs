use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexi_core::preprocess::normalize_word;
use lexi_core::store::{AddOutcome, StoreError, VocabularyStore};
use lexi_types::{UserId, VocabularyWord, WordId};
use rusqlite::{Connection, OptionalExtension, params};

use crate::schema::init_schema;

/// Vocabulary store over one SQLite connection.
///
/// rusqlite is blocking, so every call runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteVocabularyStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteVocabularyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(backend)?;
        tracing::info!("Opened vocabulary database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn).map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::Task("connection lock poisoned".to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(Box::new(e))
}

fn now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

fn normalized(word: &str) -> Result<String, StoreError> {
    let word = normalize_word(word);
    if word.is_empty() {
        return Err(StoreError::InvalidWord(word));
    }
    Ok(word)
}

fn word_id(conn: &Connection, word: &str) -> rusqlite::Result<Option<WordId>> {
    conn.query_row(
        "SELECT word_id FROM words WHERE word = ?1",
        params![word],
        |row| row.get(0),
    )
    .optional()
}

#[async_trait]
impl VocabularyStore for SqliteVocabularyStore {
    async fn register_user(
        &self,
        user_id: UserId,
        username: Option<&str>,
    ) -> Result<(), StoreError> {
        let username = username.map(str::to_string);
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, username) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET username = COALESCE(excluded.username, users.username)",
                params![user_id, username],
            )
            .map_err(backend)?;
            Ok(())
        })
        .await
    }

    async fn add_word(&self, user_id: UserId, word: &str) -> Result<AddOutcome, StoreError> {
        let word = normalized(word)?;
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(backend)?;

            tx.execute(
                "INSERT OR IGNORE INTO users (user_id) VALUES (?1)",
                params![user_id],
            )
            .map_err(backend)?;
            tx.execute(
                "INSERT OR IGNORE INTO words (word) VALUES (?1)",
                params![word],
            )
            .map_err(backend)?;

            let word_id: WordId = tx
                .query_row(
                    "SELECT word_id FROM words WHERE word = ?1",
                    params![word],
                    |row| row.get(0),
                )
                .map_err(backend)?;

            let inserted = tx
                .execute(
                    "INSERT OR IGNORE INTO user_words (user_id, word_id, date_added) VALUES (?1, ?2, ?3)",
                    params![user_id, word_id, now()],
                )
                .map_err(backend)?;

            tx.commit().map_err(backend)?;

            if inserted == 1 {
                tracing::debug!("User {} saved '{}'", user_id, word);
                Ok(AddOutcome::Added)
            } else {
                Ok(AddOutcome::AlreadyPresent)
            }
        })
        .await
    }

    async fn remove_word(&self, user_id: UserId, word: &str) -> Result<bool, StoreError> {
        let word = normalized(word)?;
        self.with_conn(move |conn| {
            let Some(word_id) = word_id(conn, &word).map_err(backend)? else {
                return Ok(false);
            };

            // quiz_stats rows go with the association (ON DELETE CASCADE)
            let removed = conn
                .execute(
                    "DELETE FROM user_words WHERE user_id = ?1 AND word_id = ?2",
                    params![user_id, word_id],
                )
                .map_err(backend)?;

            Ok(removed > 0)
        })
        .await
    }

    async fn list_words(
        &self,
        user_id: UserId,
        limit: usize,
        offset: usize,
        sort_alphabetically: bool,
    ) -> Result<Vec<VocabularyWord>, StoreError> {
        self.with_conn(move |conn| {
            let query = if sort_alphabetically {
                "SELECT w.word_id, w.word FROM user_words uw
                 JOIN words w ON w.word_id = uw.word_id
                 WHERE uw.user_id = ?1
                 ORDER BY w.word ASC
                 LIMIT ?2 OFFSET ?3"
            } else {
                "SELECT w.word_id, w.word FROM user_words uw
                 JOIN words w ON w.word_id = uw.word_id
                 WHERE uw.user_id = ?1
                 ORDER BY uw.date_added ASC, uw.rowid ASC
                 LIMIT ?2 OFFSET ?3"
            };

            let mut stmt = conn.prepare(query).map_err(backend)?;
            let rows = stmt
                .query_map(params![user_id, limit as i64, offset as i64], |row| {
                    Ok(VocabularyWord {
                        word_id: row.get(0)?,
                        text: row.get(1)?,
                    })
                })
                .map_err(backend)?;

            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(backend)
        })
        .await
    }

    async fn count_words(&self, user_id: UserId) -> Result<u64, StoreError> {
        self.with_conn(move |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM user_words WHERE user_id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .map_err(backend)?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn least_tested_words(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<WordId>, StoreError> {
        self.with_conn(move |conn| {
            // Never quizzed first, then longest unseen, then worst ratio
            // (0/0 counts as 0), random among equals
            let mut stmt = conn
                .prepare(
                    "SELECT uw.word_id FROM user_words uw
                     LEFT JOIN quiz_stats qs
                       ON qs.user_id = uw.user_id AND qs.word_id = uw.word_id
                     WHERE uw.user_id = ?1
                     ORDER BY
                       qs.last_seen_in_quiz_at IS NOT NULL,
                       qs.last_seen_in_quiz_at ASC,
                       CASE
                         WHEN COALESCE(qs.times_correct, 0) + COALESCE(qs.times_incorrect, 0) = 0 THEN 0.0
                         ELSE CAST(qs.times_correct AS REAL) / (qs.times_correct + qs.times_incorrect)
                       END ASC,
                       RANDOM()
                     LIMIT ?2",
                )
                .map_err(backend)?;

            let rows = stmt
                .query_map(params![user_id, count as i64], |row| row.get(0))
                .map_err(backend)?;

            rows.collect::<rusqlite::Result<Vec<WordId>>>().map_err(backend)
        })
        .await
    }

    async fn record_quiz_outcome(
        &self,
        user_id: UserId,
        word_id: WordId,
        was_correct: bool,
    ) -> Result<(), StoreError> {
        let (correct, incorrect) = if was_correct { (1, 0) } else { (0, 1) };
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO quiz_stats (user_id, word_id, times_correct, times_incorrect, last_seen_in_quiz_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id, word_id) DO UPDATE SET
                   times_correct = times_correct + excluded.times_correct,
                   times_incorrect = times_incorrect + excluded.times_incorrect,
                   last_seen_in_quiz_at = excluded.last_seen_in_quiz_at",
                params![user_id, word_id, correct, incorrect, now()],
            )
            .map_err(backend)?;
            Ok(())
        })
        .await
    }

    async fn audio_path(&self, word: &str) -> Result<Option<PathBuf>, StoreError> {
        let word = normalized(word)?;
        self.with_conn(move |conn| {
            let path: Option<Option<String>> = conn
                .query_row(
                    "SELECT audio_path FROM words WHERE word = ?1",
                    params![word],
                    |row| row.get(0),
                )
                .optional()
                .map_err(backend)?;
            Ok(path.flatten().map(PathBuf::from))
        })
        .await
    }

    async fn set_audio_path(&self, word: &str, path: &Path) -> Result<(), StoreError> {
        let word = normalized(word)?;
        let path = path.to_string_lossy().to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO words (word, audio_path) VALUES (?1, ?2)
                 ON CONFLICT(word) DO UPDATE SET audio_path = excluded.audio_path",
                params![word, path],
            )
            .map_err(backend)?;
            Ok(())
        })
        .await
    }
}
