//! SQLite storage layer for document collections.
//!
//! Plain synchronous functions over a borrowed connection. They run inside
//! the executor thread (see [`crate::executor`]) and do SQL only.
//!
//! Documents of every collection share one table; the `seq` column keeps
//! insertion order so snapshots come back in the order records were added.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Result as SqliteResult};

use crate::types::{Document, DocumentId, Filter, Query, Student};

/// Creates the schema if it does not exist.
pub fn init_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            collection TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            age INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);
        CREATE INDEX IF NOT EXISTS idx_documents_name ON documents(collection, name);
        "#,
    )
}

/// Returns the current Unix timestamp in milliseconds.
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Inserts a document with a fresh id.
pub fn insert_document(
    conn: &Connection,
    collection: &str,
    student: &Student,
) -> SqliteResult<DocumentId> {
    let id = DocumentId::new();
    conn.execute(
        "INSERT INTO documents (id, collection, name, age, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id.as_str(), collection, student.name, student.age, now_millis()],
    )?;
    Ok(id)
}

/// Runs an equality query. Results are in insertion order.
pub fn query_documents(
    conn: &Connection,
    collection: &str,
    query: &Query,
) -> SqliteResult<Vec<Document>> {
    let mut sql = String::from("SELECT id, name, age FROM documents WHERE collection = ?");
    let mut values: Vec<Value> = vec![Value::Text(collection.to_string())];

    for filter in query.filters() {
        match filter {
            Filter::NameEq(name) => {
                sql.push_str(" AND name = ?");
                values.push(Value::Text(name.clone()));
            }
            Filter::AgeEq(age) => {
                sql.push_str(" AND age = ?");
                values.push(Value::Integer(i64::from(*age)));
            }
        }
    }
    sql.push_str(" ORDER BY seq");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(Document {
            id: DocumentId(row.get(0)?),
            data: Student {
                name: row.get(1)?,
                age: row.get(2)?,
            },
        })
    })?;

    let documents = rows.collect::<SqliteResult<Vec<_>>>()?;
    Ok(documents)
}

/// Deletes a document. Returns false when no such document existed.
pub fn delete_document(conn: &Connection, collection: &str, id: &DocumentId) -> SqliteResult<bool> {
    let changed = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id.as_str()],
    )?;
    Ok(changed > 0)
}

/// Sets the age field of a document. Returns false when no such document exists.
pub fn update_document_age(
    conn: &Connection,
    collection: &str,
    id: &DocumentId,
    age: i32,
) -> SqliteResult<bool> {
    let changed = conn.execute(
        "UPDATE documents SET age = ?1 WHERE collection = ?2 AND id = ?3",
        params![age, collection, id.as_str()],
    )?;
    Ok(changed > 0)
}

/// Returns `PRAGMA data_version`.
///
/// The value changes whenever another connection commits to the database,
/// which is how changes made by other processes are detected.
pub fn data_version(conn: &Connection) -> SqliteResult<i64> {
    conn.query_row("PRAGMA data_version", [], |row| row.get(0))
}
