//! SQLite document sink
//!
//! This module provides a SQLite-based implementation of the DocumentSink trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentSink, SinkResult};
use crate::storage::Document;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend for documents
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens or creates the document database at `path`
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Number of distinct URLs with at least one stored document
    pub fn count_distinct_urls(&self) -> SinkResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT url) FROM documents", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    /// All documents stored for a URL, oldest first
    pub fn documents_for_url(&self, url: &str) -> SinkResult<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, text FROM documents WHERE url = ?1 ORDER BY id ASC")?;

        let documents = stmt
            .query_map(params![url], |row| {
                Ok(Document {
                    url: row.get(0)?,
                    text: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    /// Stored URLs in insertion order
    pub fn stored_urls(&self) -> SinkResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT url FROM documents ORDER BY id ASC")?;
        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(urls)
    }
}

impl DocumentSink for SqliteSink {
    fn store(&mut self, document: &Document) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO documents (url, text, stored_at) VALUES (?1, ?2, ?3)",
            params![document.url, document.text, now],
        )?;
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
