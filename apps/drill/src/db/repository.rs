//! Repository pattern for database access.

use crate::db::date_utils::{format_timestamp, read_timestamp};
use crate::db::error::DbError;
use drill_core::types::{validate_text, MAX_LANGUAGE_LEN, MAX_TEXT_LEN};
use drill_core::{Item, ItemId, NewItem, ProficiencyState, SheetId, Store, ValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// A language-direction pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Direction {
    pub id: i64,
    pub from: String,
    pub to: String,
}

/// A named sheet within a direction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Sheet {
    pub id: SheetId,
    pub direction_id: i64,
    pub name: String,
}

/// Item id with its question, for listings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub question: String,
}

/// Repository for language operations.
pub trait LanguageRepository {
    fn add_language(&self, name: &str) -> Result<i64>;
    fn rename_language(&self, old_name: &str, new_name: &str) -> Result<()>;
    /// Deletes the language with everything translated from or to it.
    fn delete_language(&self, name: &str) -> Result<()>;
    fn list_languages(&self) -> Result<Vec<String>>;
    fn find_language(&self, name: &str) -> Result<Option<i64>>;
}

/// Repository for language-direction pairs.
pub trait DirectionRepository {
    /// Get or create the direction between two named languages.
    fn direction(&self, from: &str, to: &str) -> Result<Direction>;
    fn direction_of_item(&self, item: ItemId) -> Result<Direction>;
}

/// Repository for sheet operations.
pub trait SheetRepository {
    fn create_sheet(&self, direction_id: i64, name: &str, questions: &[String]) -> Result<SheetId>;
    /// Rename a sheet and replace its membership with `questions`.
    fn update_sheet(&self, sheet: SheetId, name: &str, questions: &[String]) -> Result<()>;
    fn delete_sheet(&self, sheet: SheetId) -> Result<()>;
    fn list_sheets(&self, direction_id: i64) -> Result<Vec<Sheet>>;
    fn find_sheet(&self, direction_id: i64, name: &str) -> Result<Option<SheetId>>;
    fn sheets_for_item(&self, item: ItemId) -> Result<Vec<String>>;
    fn sheet_items(&self, sheet: SheetId) -> Result<Vec<ItemSummary>>;
}

/// Repository for item operations.
pub trait ItemRepository {
    fn add_item(&self, direction_id: i64, item: &NewItem) -> Result<ItemId>;
    /// Replace question, answers and sheets. Proficiency is kept.
    fn edit_item(&self, item: ItemId, changes: &NewItem) -> Result<()>;
    fn delete_item(&self, item: ItemId) -> Result<()>;
    fn find_item(&self, direction_id: i64, question: &str) -> Result<Option<ItemId>>;
    /// Items whose question or any answer contains `text`.
    fn search_items(&self, direction_id: i64, text: &str) -> Result<Vec<ItemSummary>>;
    fn get_item(&self, item: ItemId) -> Result<Item>;
}

/// Repository for progress statistics.
pub trait StatsRepository {
    fn total_points(&self) -> Result<u64>;
    /// True when every item in the sheet sits at `so_far == 2`.
    fn sheet_complete(&self, sheet: SheetId) -> Result<bool>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    fn row_to_state(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<ProficiencyState> {
        Ok(ProficiencyState {
            points: row.get(offset)?,
            needed: row.get(offset + 1)?,
            so_far: row.get(offset + 2)?,
            completed_at: read_timestamp(row, offset + 3)?,
        })
    }

    fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<ItemSummary> {
        Ok(ItemSummary {
            id: ItemId(row.get(0)?),
            question: row.get(1)?,
        })
    }

    fn ensure_sheet(&self, sheet: SheetId) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT direction_id FROM sheets WHERE id = ?1",
                params![sheet.0],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(DbError::SheetNotFound(sheet))
    }

    /// Item ids of a direction matching the given questions.
    fn item_ids_for_questions(&self, direction_id: i64, questions: &[String]) -> Result<BTreeSet<i64>> {
        questions
            .iter()
            .map(|question| {
                self.find_item(direction_id, question.trim())?
                    .map(|id| id.0)
                    .ok_or_else(|| DbError::InvalidData(format!("no item with question {question:?}")))
            })
            .collect()
    }

    /// Sheet ids of a direction matching the given names.
    fn sheet_ids_for_names(&self, direction_id: i64, names: &[String]) -> Result<BTreeSet<i64>> {
        names
            .iter()
            .map(|name| {
                self.find_sheet(direction_id, name)?
                    .map(|id| id.0)
                    .ok_or_else(|| DbError::InvalidData(format!("no sheet named {name:?}")))
            })
            .collect()
    }

    fn insert_answers(&self, item: ItemId, answers: &[String]) -> Result<()> {
        for (position, answer) in answers.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO answers (item_id, text, position) VALUES (?1, ?2, ?3)",
                params![item.0, answer, position as i64],
            )?;
        }
        Ok(())
    }

    fn load_state(&self, item: ItemId) -> Result<ProficiencyState> {
        self.conn
            .query_row(
                "SELECT points, needed, so_far, completed_at FROM items WHERE id = ?1",
                params![item.0],
                |row| Self::row_to_state(row, 0),
            )
            .optional()?
            .ok_or(DbError::ItemNotFound(item))
    }

    fn save_state(&self, item: ItemId, state: &ProficiencyState) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE items SET points = ?1, needed = ?2, so_far = ?3, completed_at = ?4 WHERE id = ?5",
            params![
                state.points,
                state.needed,
                state.so_far,
                state.completed_at.map(format_timestamp),
                item.0
            ],
        )?;
        if updated == 0 {
            return Err(DbError::ItemNotFound(item));
        }
        Ok(())
    }

    fn load_states(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<(ItemId, ProficiencyState)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let states = stmt
            .query_map(params, |row| Ok((ItemId(row.get(0)?), Self::row_to_state(row, 1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(states)
    }

    fn load_answers(&self, item: ItemId) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM answers WHERE item_id = ?1 ORDER BY position")?;
        let answers = stmt
            .query_map(params![item.0], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(answers)
    }
}

fn sort_case_insensitive(names: &mut [String]) {
    names.sort_by_key(|name| name.to_lowercase());
}

impl LanguageRepository for SqliteRepository {
    fn add_language(&self, name: &str) -> Result<i64> {
        let name = validate_text("language name", name, MAX_LANGUAGE_LEN)?;
        if self.find_language(&name)?.is_some() {
            return Err(DbError::Duplicate(format!("language {name}")));
        }
        self.conn
            .execute("INSERT INTO languages (name) VALUES (?1)", params![name])?;
        tracing::info!("Added language {}", name);
        Ok(self.conn.last_insert_rowid())
    }

    fn rename_language(&self, old_name: &str, new_name: &str) -> Result<()> {
        let new_name = validate_text("language name", new_name, MAX_LANGUAGE_LEN)?;
        let id = self
            .find_language(old_name)?
            .ok_or_else(|| DbError::LanguageNotFound(old_name.to_string()))?;
        if let Some(existing) = self.find_language(&new_name)? {
            if existing != id {
                return Err(DbError::Duplicate(format!("language {new_name}")));
            }
        }
        self.conn.execute(
            "UPDATE languages SET name = ?1 WHERE id = ?2",
            params![new_name, id],
        )?;
        Ok(())
    }

    fn delete_language(&self, name: &str) -> Result<()> {
        let id = self
            .find_language(name)?
            .ok_or_else(|| DbError::LanguageNotFound(name.to_string()))?;
        self.conn
            .execute("DELETE FROM languages WHERE id = ?1", params![id])?;
        tracing::info!("Deleted language {}", name.trim());
        Ok(())
    }

    fn list_languages(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM languages")?;
        let mut names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        sort_case_insensitive(&mut names);
        Ok(names)
    }

    fn find_language(&self, name: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM languages WHERE name = ?1",
                params![name.trim()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }
}

impl DirectionRepository for SqliteRepository {
    fn direction(&self, from: &str, to: &str) -> Result<Direction> {
        let (from, to) = (from.trim(), to.trim());
        if from == to {
            return Err(ValidationError::SameLanguage.into());
        }
        let from_id = self
            .find_language(from)?
            .ok_or_else(|| DbError::LanguageNotFound(from.to_string()))?;
        let to_id = self
            .find_language(to)?
            .ok_or_else(|| DbError::LanguageNotFound(to.to_string()))?;

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM directions WHERE from_language = ?1 AND to_language = ?2",
                params![from_id, to_id],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => id,
            None => {
                self.conn.execute(
                    "INSERT INTO directions (from_language, to_language) VALUES (?1, ?2)",
                    params![from_id, to_id],
                )?;
                self.conn.last_insert_rowid()
            }
        };

        Ok(Direction {
            id,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    fn direction_of_item(&self, item: ItemId) -> Result<Direction> {
        self.conn
            .query_row(
                "SELECT d.id, l1.name, l2.name
                 FROM items i
                 JOIN directions d ON d.id = i.direction_id
                 JOIN languages l1 ON l1.id = d.from_language
                 JOIN languages l2 ON l2.id = d.to_language
                 WHERE i.id = ?1",
                params![item.0],
                |row| {
                    Ok(Direction {
                        id: row.get(0)?,
                        from: row.get(1)?,
                        to: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or(DbError::ItemNotFound(item))
    }
}

impl SheetRepository for SqliteRepository {
    fn create_sheet(&self, direction_id: i64, name: &str, questions: &[String]) -> Result<SheetId> {
        let name = validate_text("sheet name", name, MAX_TEXT_LEN)?;
        if self.find_sheet(direction_id, &name)?.is_some() {
            return Err(DbError::Duplicate(format!("sheet {name}")));
        }

        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "INSERT INTO sheets (direction_id, name) VALUES (?1, ?2)",
            params![direction_id, name],
        )?;
        let sheet = SheetId(self.conn.last_insert_rowid());
        for item_id in self.item_ids_for_questions(direction_id, questions)? {
            self.conn.execute(
                "INSERT INTO mentions (sheet_id, item_id) VALUES (?1, ?2)",
                params![sheet.0, item_id],
            )?;
        }
        tx.commit()?;

        tracing::info!("Created sheet {} with {} items", name, questions.len());
        Ok(sheet)
    }

    fn update_sheet(&self, sheet: SheetId, name: &str, questions: &[String]) -> Result<()> {
        let direction_id = self.ensure_sheet(sheet)?;
        let name = validate_text("sheet name", name, MAX_TEXT_LEN)?;
        if let Some(existing) = self.find_sheet(direction_id, &name)? {
            if existing != sheet {
                return Err(DbError::Duplicate(format!("sheet {name}")));
            }
        }

        let wanted = self.item_ids_for_questions(direction_id, questions)?;
        let current: BTreeSet<i64> = {
            let mut stmt = self
                .conn
                .prepare("SELECT item_id FROM mentions WHERE sheet_id = ?1")?;
            let ids = stmt
                .query_map(params![sheet.0], |row| row.get(0))?
                .collect::<std::result::Result<BTreeSet<i64>, _>>()?;
            ids
        };

        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "UPDATE sheets SET name = ?1 WHERE id = ?2",
            params![name, sheet.0],
        )?;
        for item_id in wanted.difference(&current) {
            self.conn.execute(
                "INSERT INTO mentions (sheet_id, item_id) VALUES (?1, ?2)",
                params![sheet.0, item_id],
            )?;
        }
        for item_id in current.difference(&wanted) {
            self.conn.execute(
                "DELETE FROM mentions WHERE sheet_id = ?1 AND item_id = ?2",
                params![sheet.0, item_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_sheet(&self, sheet: SheetId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM sheets WHERE id = ?1", params![sheet.0])?;
        if deleted == 0 {
            return Err(DbError::SheetNotFound(sheet));
        }
        Ok(())
    }

    fn list_sheets(&self, direction_id: i64) -> Result<Vec<Sheet>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, direction_id, name FROM sheets WHERE direction_id = ?1")?;
        let mut sheets = stmt
            .query_map(params![direction_id], |row| {
                Ok(Sheet {
                    id: SheetId(row.get(0)?),
                    direction_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        sheets.sort_by_key(|sheet| sheet.name.to_lowercase());
        Ok(sheets)
    }

    fn find_sheet(&self, direction_id: i64, name: &str) -> Result<Option<SheetId>> {
        self.conn
            .query_row(
                "SELECT id FROM sheets WHERE direction_id = ?1 AND name = ?2",
                params![direction_id, name.trim()],
                |row| row.get(0).map(SheetId),
            )
            .optional()
            .map_err(Into::into)
    }

    fn sheets_for_item(&self, item: ItemId) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name FROM mentions m
             JOIN sheets s ON s.id = m.sheet_id
             WHERE m.item_id = ?1",
        )?;
        let mut names = stmt
            .query_map(params![item.0], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        sort_case_insensitive(&mut names);
        Ok(names)
    }

    fn sheet_items(&self, sheet: SheetId) -> Result<Vec<ItemSummary>> {
        self.ensure_sheet(sheet)?;
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.question FROM items i
             JOIN mentions m ON m.item_id = i.id
             WHERE m.sheet_id = ?1
             ORDER BY i.id",
        )?;
        let items = stmt
            .query_map(params![sheet.0], Self::row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

impl ItemRepository for SqliteRepository {
    fn add_item(&self, direction_id: i64, item: &NewItem) -> Result<ItemId> {
        let item = item.normalized()?;
        if self.find_item(direction_id, &item.question)?.is_some() {
            return Err(DbError::Duplicate(format!("question {}", item.question)));
        }
        let sheet_ids = self.sheet_ids_for_names(direction_id, &item.sheets)?;

        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "INSERT INTO items (direction_id, question) VALUES (?1, ?2)",
            params![direction_id, item.question],
        )?;
        let id = ItemId(self.conn.last_insert_rowid());
        self.insert_answers(id, &item.answers)?;
        for sheet_id in sheet_ids {
            self.conn.execute(
                "INSERT INTO mentions (sheet_id, item_id) VALUES (?1, ?2)",
                params![sheet_id, id.0],
            )?;
        }
        tx.commit()?;

        tracing::debug!(item = %id, question = %item.question, "added item");
        Ok(id)
    }

    fn edit_item(&self, item: ItemId, changes: &NewItem) -> Result<()> {
        let changes = changes.normalized()?;
        let direction = self.direction_of_item(item)?;
        if let Some(existing) = self.find_item(direction.id, &changes.question)? {
            if existing != item {
                return Err(DbError::Duplicate(format!("question {}", changes.question)));
            }
        }
        let wanted = self.sheet_ids_for_names(direction.id, &changes.sheets)?;
        let current = self.sheet_ids_for_names(direction.id, &self.sheets_for_item(item)?)?;

        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "UPDATE items SET question = ?1 WHERE id = ?2",
            params![changes.question, item.0],
        )?;
        self.conn
            .execute("DELETE FROM answers WHERE item_id = ?1", params![item.0])?;
        self.insert_answers(item, &changes.answers)?;
        for sheet_id in wanted.difference(&current) {
            self.conn.execute(
                "INSERT INTO mentions (sheet_id, item_id) VALUES (?1, ?2)",
                params![sheet_id, item.0],
            )?;
        }
        for sheet_id in current.difference(&wanted) {
            self.conn.execute(
                "DELETE FROM mentions WHERE sheet_id = ?1 AND item_id = ?2",
                params![sheet_id, item.0],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_item(&self, item: ItemId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![item.0])?;
        if deleted == 0 {
            return Err(DbError::ItemNotFound(item));
        }
        Ok(())
    }

    fn find_item(&self, direction_id: i64, question: &str) -> Result<Option<ItemId>> {
        self.conn
            .query_row(
                "SELECT id FROM items WHERE direction_id = ?1 AND question = ?2",
                params![direction_id, question],
                |row| row.get(0).map(ItemId),
            )
            .optional()
            .map_err(Into::into)
    }

    fn search_items(&self, direction_id: i64, text: &str) -> Result<Vec<ItemSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT i.id, i.question FROM items i
             LEFT JOIN answers a ON a.item_id = i.id
             WHERE i.direction_id = ?1
               AND (INSTR(i.question, ?2) > 0 OR INSTR(a.text, ?2) > 0)",
        )?;
        let mut items = stmt
            .query_map(params![direction_id, text], Self::row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        items.sort_by_key(|item| item.question.to_lowercase());
        Ok(items)
    }

    fn get_item(&self, item: ItemId) -> Result<Item> {
        let question: String = self
            .conn
            .query_row(
                "SELECT question FROM items WHERE id = ?1",
                params![item.0],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(DbError::ItemNotFound(item))?;

        Ok(Item {
            id: item,
            question,
            answers: self.load_answers(item)?,
        })
    }
}

impl StatsRepository for SqliteRepository {
    fn total_points(&self) -> Result<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(points), 0) + COALESCE(SUM(so_far = 2), 0) FROM items",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    fn sheet_complete(&self, sheet: SheetId) -> Result<bool> {
        self.ensure_sheet(sheet)?;
        let unfinished: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM mentions m
             JOIN items i ON i.id = m.item_id
             WHERE m.sheet_id = ?1 AND i.so_far != 2",
            params![sheet.0],
            |row| row.get(0),
        )?;
        Ok(unfinished == 0)
    }
}

impl Store for SqliteRepository {
    fn get_state(&self, item: ItemId) -> drill_core::Result<ProficiencyState> {
        Ok(self.load_state(item)?)
    }

    fn put_state(&mut self, item: ItemId, state: &ProficiencyState) -> drill_core::Result<()> {
        Ok(self.save_state(item, state)?)
    }

    fn put_states(&mut self, updates: &[(ItemId, ProficiencyState)]) -> drill_core::Result<()> {
        let tx = self.conn.unchecked_transaction().map_err(DbError::from)?;
        for (item, state) in updates {
            self.save_state(*item, state)?;
        }
        tx.commit().map_err(DbError::from)?;
        Ok(())
    }

    fn items_in_sheet(&self, sheet: SheetId) -> drill_core::Result<Vec<(ItemId, ProficiencyState)>> {
        self.ensure_sheet(sheet)?;
        Ok(self.load_states(
            "SELECT i.id, i.points, i.needed, i.so_far, i.completed_at
             FROM items i
             JOIN mentions m ON m.item_id = i.id
             WHERE m.sheet_id = ?1
             ORDER BY i.id",
            params![sheet.0],
        )?)
    }

    fn all_items_with_state(&self) -> drill_core::Result<Vec<(ItemId, ProficiencyState)>> {
        Ok(self.load_states(
            "SELECT id, points, needed, so_far, completed_at FROM items ORDER BY id",
            [],
        )?)
    }

    fn accepted_answers(&self, item: ItemId) -> drill_core::Result<Vec<String>> {
        self.load_state(item)?;
        Ok(self.load_answers(item)?)
    }

    fn item(&self, item: ItemId) -> drill_core::Result<Item> {
        Ok(self.get_item(item)?)
    }
}
