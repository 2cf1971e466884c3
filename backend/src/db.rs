//! SQLite persistence of saved sections.
//!
//! One row per record. `fields` holds the section JSON with uploaded images
//! already replaced by their stored URLs.

use std::path::Path;

use common::model::section::SectionKind;
use common::requests::SectionRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ServiceError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sections (
        record_id  TEXT PRIMARY KEY,
        kind       TEXT NOT NULL,
        identifier TEXT NOT NULL,
        fields     TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS sections_by_identifier ON sections (kind, identifier);
";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Opens the database file, creating the table on first use.
pub fn open(path: &Path) -> Result<Connection, ServiceError> {
    let conn = Connection::open(path)?;
    init(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<(), ServiceError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn insert(
    conn: &Connection,
    kind: SectionKind,
    identifier: &str,
    fields: &Value,
) -> Result<SectionRecord, ServiceError> {
    let record_id = Uuid::new_v4().to_string();
    conn.execute(
        &format!(
            "INSERT INTO sections (record_id, kind, identifier, fields, updated_at)
             VALUES (?1, ?2, ?3, ?4, {NOW})"
        ),
        params![record_id, kind.as_str(), identifier, fields.to_string()],
    )?;
    get(conn, kind, &record_id)?.ok_or_else(|| ServiceError::NotFound(record_id))
}

/// Overwrites an existing record. `None` if there is no such record of `kind`.
pub fn update(
    conn: &Connection,
    kind: SectionKind,
    record_id: &str,
    identifier: &str,
    fields: &Value,
) -> Result<Option<SectionRecord>, ServiceError> {
    let changed = conn.execute(
        &format!(
            "UPDATE sections SET identifier = ?1, fields = ?2, updated_at = {NOW}
             WHERE record_id = ?3 AND kind = ?4"
        ),
        params![identifier, fields.to_string(), record_id, kind.as_str()],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, kind, record_id)
}

pub fn get(
    conn: &Connection,
    kind: SectionKind,
    record_id: &str,
) -> Result<Option<SectionRecord>, ServiceError> {
    let row = conn
        .query_row(
            "SELECT record_id, kind, identifier, fields, updated_at
             FROM sections WHERE record_id = ?1 AND kind = ?2",
            params![record_id, kind.as_str()],
            raw_row,
        )
        .optional()?;
    row.map(|raw| raw.into_record(kind)).transpose()
}

/// The most recently saved record with this identifier.
pub fn find_by_identifier(
    conn: &Connection,
    kind: SectionKind,
    identifier: &str,
) -> Result<Option<SectionRecord>, ServiceError> {
    let row = conn
        .query_row(
            "SELECT record_id, kind, identifier, fields, updated_at
             FROM sections WHERE kind = ?1 AND identifier = ?2
             ORDER BY updated_at DESC LIMIT 1",
            params![kind.as_str(), identifier],
            raw_row,
        )
        .optional()?;
    row.map(|raw| raw.into_record(kind)).transpose()
}

/// Returns `false` if there was nothing to delete.
pub fn delete(conn: &Connection, kind: SectionKind, record_id: &str) -> Result<bool, ServiceError> {
    let removed = conn.execute(
        "DELETE FROM sections WHERE record_id = ?1 AND kind = ?2",
        params![record_id, kind.as_str()],
    )?;
    Ok(removed > 0)
}

struct RawRow {
    record_id: String,
    identifier: String,
    fields: String,
    updated_at: String,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        record_id: row.get(0)?,
        identifier: row.get(2)?,
        fields: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl RawRow {
    fn into_record(self, kind: SectionKind) -> Result<SectionRecord, ServiceError> {
        Ok(SectionRecord {
            record_id: self.record_id,
            kind,
            identifier: self.identifier,
            fields: serde_json::from_str(&self.fields)?,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_then_get() {
        let conn = memory();
        let record = insert(&conn, SectionKind::Navbar, "site-1", &json!({ "color": "#fff" })).unwrap();
        let loaded = get(&conn, SectionKind::Navbar, &record.record_id).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.fields, json!({ "color": "#fff" }));
        assert!(loaded.updated_at.ends_with('Z'));
    }

    #[test]
    fn records_are_scoped_by_kind() {
        let conn = memory();
        let record = insert(&conn, SectionKind::Navbar, "site-1", &json!({})).unwrap();
        assert_eq!(get(&conn, SectionKind::Footer, &record.record_id).unwrap(), None);
        assert!(!delete(&conn, SectionKind::Footer, &record.record_id).unwrap());
    }

    #[test]
    fn update_overwrites_and_reports_missing_records() {
        let conn = memory();
        let record = insert(&conn, SectionKind::Team, "team", &json!({ "heading": "A" })).unwrap();
        let updated = update(&conn, SectionKind::Team, &record.record_id, "team", &json!({ "heading": "B" }))
            .unwrap()
            .unwrap();
        assert_eq!(updated.fields["heading"], "B");
        assert_eq!(update(&conn, SectionKind::Team, "missing", "team", &json!({})).unwrap(), None);
    }

    #[test]
    fn find_by_identifier_and_delete() {
        let conn = memory();
        let record = insert(&conn, SectionKind::Footer, "main-footer", &json!({})).unwrap();
        let found = find_by_identifier(&conn, SectionKind::Footer, "main-footer").unwrap();
        assert_eq!(found.map(|r| r.record_id), Some(record.record_id.clone()));
        assert!(delete(&conn, SectionKind::Footer, &record.record_id).unwrap());
        assert_eq!(find_by_identifier(&conn, SectionKind::Footer, "main-footer").unwrap(), None);
    }
}
