//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local SQLite database.
pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS languages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Language-direction pairs (translate from -> to)
CREATE TABLE IF NOT EXISTS directions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_language INTEGER NOT NULL REFERENCES languages(id) ON DELETE CASCADE,
    to_language INTEGER NOT NULL REFERENCES languages(id) ON DELETE CASCADE,
    UNIQUE (from_language, to_language)
);

CREATE TABLE IF NOT EXISTS sheets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    direction_id INTEGER NOT NULL REFERENCES directions(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    UNIQUE (direction_id, name)
);

-- Items with their proficiency state
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    direction_id INTEGER NOT NULL REFERENCES directions(id) ON DELETE CASCADE,
    question TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    needed INTEGER NOT NULL DEFAULT 2,
    so_far INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    UNIQUE (direction_id, question)
);

-- Accepted answers; position 0 is the displayed one
CREATE TABLE IF NOT EXISTS answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    position INTEGER NOT NULL,
    UNIQUE (item_id, text)
);

-- Sheet membership
CREATE TABLE IF NOT EXISTS mentions (
    sheet_id INTEGER NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
    item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    PRIMARY KEY (sheet_id, item_id)
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_items_direction ON items(direction_id);
CREATE INDEX IF NOT EXISTS idx_items_completed ON items(completed_at);
CREATE INDEX IF NOT EXISTS idx_answers_item ON answers(item_id);
CREATE INDEX IF NOT EXISTS idx_mentions_item ON mentions(item_id);
"#;

/// Record the schema version if not yet recorded.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
