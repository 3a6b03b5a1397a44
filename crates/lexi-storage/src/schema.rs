use rusqlite::{Connection, Result as SqliteResult};

/// Create tables if missing
pub fn init_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT
        );

        CREATE TABLE IF NOT EXISTS words (
            word_id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL UNIQUE,
            audio_path TEXT
        );

        CREATE TABLE IF NOT EXISTS user_words (
            user_id INTEGER NOT NULL REFERENCES users(user_id),
            word_id INTEGER NOT NULL REFERENCES words(word_id),
            date_added TEXT NOT NULL,
            PRIMARY KEY (user_id, word_id)
        );

        CREATE TABLE IF NOT EXISTS quiz_stats (
            user_id INTEGER NOT NULL,
            word_id INTEGER NOT NULL,
            times_correct INTEGER NOT NULL DEFAULT 0 CHECK (times_correct >= 0),
            times_incorrect INTEGER NOT NULL DEFAULT 0 CHECK (times_incorrect >= 0),
            last_seen_in_quiz_at TEXT,
            PRIMARY KEY (user_id, word_id),
            FOREIGN KEY (user_id, word_id) REFERENCES user_words(user_id, word_id) ON DELETE CASCADE
        );",
    )
}
