//! Log entry model
//!
//! A single recorded food or exercise event. Entries carry an opaque unique
//! identifier assigned at creation and a wall-clock millisecond timestamp
//! that drives newest-first ordering.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Entry type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Food,
    Exercise,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Food => "food",
            EntryType::Exercise => "exercise",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "exercise" => EntryType::Exercise,
            _ => EntryType::Food,
        }
    }
}

/// A recorded food or exercise event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub name: String,
    pub calories: i32,
    /// Macro breakdown for food ("Protein: 6g, Fat: 5g, Carbs: 0g") or a
    /// free-text detail summary for exercise
    pub macros: String,
    pub entry_type: EntryType,
    pub timestamp: i64,
}

impl LogEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let entry_type_str: String = row.get("entry_type")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            calories: row.get("calories")?,
            macros: row.get("macros")?,
            entry_type: EntryType::from_str(&entry_type_str),
            timestamp: row.get("timestamp")?,
        })
    }

    /// Insert an entry, replacing any existing entry with the same id
    pub fn upsert(conn: &Connection, entry: &LogEntry) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO log_entries (id, name, calories, macros, entry_type, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                calories = excluded.calories,
                macros = excluded.macros,
                entry_type = excluded.entry_type,
                timestamp = excluded.timestamp
            "#,
            params![
                entry.id,
                entry.name,
                entry.calories,
                entry.macros,
                entry.entry_type.as_str(),
                entry.timestamp,
            ],
        )?;
        Ok(())
    }

    /// Replace the entry matching the given id
    ///
    /// Returns false when no such entry exists (the update is a no-op).
    pub fn update(conn: &Connection, entry: &LogEntry) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE log_entries
            SET name = ?2, calories = ?3, macros = ?4, entry_type = ?5, timestamp = ?6
            WHERE id = ?1
            "#,
            params![
                entry.id,
                entry.name,
                entry.calories,
                entry.macros,
                entry.entry_type.as_str(),
                entry.timestamp,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Delete the entry with the given id
    ///
    /// Returns false when no such entry exists.
    pub fn delete_by_id(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM log_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Get an entry by id
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM log_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all entries, most recent first
    pub fn get_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM log_entries ORDER BY timestamp DESC, id")?;

        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn entry(id: &str, name: &str, timestamp: i64) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            name: name.to_string(),
            calories: 100,
            macros: "Protein: 5g, Fat: 2g, Carbs: 10g".to_string(),
            entry_type: EntryType::Food,
            timestamp,
        }
    }

    #[test]
    fn test_upsert_and_get_by_id() {
        let conn = test_conn();
        let e = entry("a", "Oatmeal", 1_000);
        LogEntry::upsert(&conn, &e).unwrap();

        let fetched = LogEntry::get_by_id(&conn, "a").unwrap().unwrap();
        assert_eq!(fetched, e);
    }

    #[test]
    fn test_upsert_same_id_replaces() {
        let conn = test_conn();
        LogEntry::upsert(&conn, &entry("a", "Oatmeal", 1_000)).unwrap();
        LogEntry::upsert(&conn, &entry("a", "Granola", 2_000)).unwrap();

        let all = LogEntry::get_all(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Granola");
        assert_eq!(all[0].timestamp, 2_000);
    }

    #[test]
    fn test_get_all_orders_newest_first() {
        let conn = test_conn();
        LogEntry::upsert(&conn, &entry("a", "Oatmeal", 1_000)).unwrap();
        LogEntry::upsert(&conn, &entry("b", "Lunch", 3_000)).unwrap();
        LogEntry::upsert(&conn, &entry("c", "Snack", 2_000)).unwrap();

        let names: Vec<_> = LogEntry::get_all(&conn)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Lunch", "Snack", "Oatmeal"]);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let conn = test_conn();
        let matched = LogEntry::update(&conn, &entry("missing", "Ghost", 1_000)).unwrap();
        assert!(!matched);
        assert!(LogEntry::get_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let conn = test_conn();
        LogEntry::upsert(&conn, &entry("a", "Oatmeal", 1_000)).unwrap();

        let deleted = LogEntry::delete_by_id(&conn, "missing").unwrap();
        assert!(!deleted);
        assert_eq!(LogEntry::get_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_existing_id() {
        let conn = test_conn();
        LogEntry::upsert(&conn, &entry("a", "Oatmeal", 1_000)).unwrap();

        assert!(LogEntry::delete_by_id(&conn, "a").unwrap());
        assert!(LogEntry::get_by_id(&conn, "a").unwrap().is_none());
    }
}
