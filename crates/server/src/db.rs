// Read-only access to the alias table in SQLite
//
// The table is created and filled by the ingestion pipeline. This layer only
// reads it: every operation opens its own short-lived read-only connection,
// which closes when the session is dropped.

use dataset_core::AliasRecord;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Table written by the ingestion process
pub const ALIAS_TABLE: &str = "FILE_ALIAS";

/// Aliases bound per `IN (...)` lookup
pub const IN_CHUNK_SIZE: usize = 900;

/// Handle on the alias database file. Cheap to clone; holds no connection.
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-only session. A missing file is an error, never created.
    pub fn session(&self) -> Result<StoreSession, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(StoreSession { conn })
    }

    /// Check that the database opens and answers a trivial query
    pub fn ping(&self) -> Result<(), rusqlite::Error> {
        let session = self.session()?;
        session.conn.query_row("SELECT 1", [], |_| Ok(()))
    }
}

/// One scoped connection to the alias table
pub struct StoreSession {
    conn: Connection,
}

impl StoreSession {
    /// Physical path stored for `alias`. Duplicate aliases resolve to the first row.
    pub fn find_path(&self, alias: &str) -> Result<Option<String>, rusqlite::Error> {
        let sql = format!(
            "SELECT PHYSICAL_FILE_PATH FROM {} WHERE ALIAS = ?1 LIMIT 1",
            ALIAS_TABLE
        );
        let found: Option<Option<String>> = self
            .conn
            .query_row(&sql, params![alias], |row| row.get(0))
            .optional()?;

        Ok(found.map(Option::unwrap_or_default))
    }

    /// Physical paths for every alias in `aliases` that exists.
    ///
    /// Runs one `IN (...)` query per `IN_CHUNK_SIZE` aliases so large batches
    /// stay under SQLite's bound-variable limit. Duplicates keep the first row.
    pub fn find_paths(&self, aliases: &[String]) -> Result<HashMap<String, String>, rusqlite::Error> {
        let mut found = HashMap::new();

        for chunk in aliases.chunks(IN_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!(
                "SELECT ALIAS, PHYSICAL_FILE_PATH FROM {} WHERE ALIAS IN ({})",
                ALIAS_TABLE, placeholders
            );

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                let alias: String = row.get(0)?;
                let path: Option<String> = row.get(1)?;
                found.entry(alias).or_insert_with(|| path.unwrap_or_default());
            }
        }
        Ok(found)
    }

    /// Number of records matching every tag in `filter`
    pub fn count_tagged(&self, filter: &TagFilter) -> Result<u64, rusqlite::Error> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            ALIAS_TABLE, filter.clause
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(filter.params.iter()), |r| r.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// One page of records matching `filter`, in store order
    pub fn page_tagged(
        &self,
        filter: &TagFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<AliasRecord>, rusqlite::Error> {
        let sql = format!(
            "SELECT ALIAS, PHYSICAL_FILE_PATH, TAGS FROM {} WHERE {} LIMIT ? OFFSET ?",
            ALIAS_TABLE, filter.clause
        );

        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        for p in &filter.params {
            params_vec.push(Box::new(p.clone()));
        }
        params_vec.push(Box::new(i64::from(limit)));
        params_vec.push(Box::new(i64::try_from(offset).unwrap_or(i64::MAX)));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_refs.as_slice())?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(AliasRecord {
                alias: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                physical_path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                tags: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

/// AND of literal substring tests against the `TAGS` column.
///
/// `LIKE` wildcards inside a tag are escaped, so `"50%"` only matches the
/// text `50%`. Matching stays ASCII case-insensitive, as `LIKE` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    clause: String,
    params: Vec<String>,
}

impl TagFilter {
    pub fn new(tags: &[String]) -> Self {
        let clause = if tags.is_empty() {
            // never reached through TagQuery, which rejects empty tag lists
            "1=0".to_string()
        } else {
            vec![r"TAGS LIKE ? ESCAPE '\'"; tags.len()].join(" AND ")
        };
        let params = tags
            .iter()
            .map(|t| format!("%{}%", escape_like(t)))
            .collect();
        Self { clause, params }
    }
}

fn escape_like(tag: &str) -> String {
    let mut escaped = String::with_capacity(tag.len());
    for c in tag.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::{params, Connection};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Create an alias database the way the ingestion process lays it out
    pub fn create_alias_db(dir: &TempDir, rows: &[(&str, &str, &str)]) -> PathBuf {
        let path = dir.path().join("Alias_Storage.db");
        write_rows(&path, rows);
        path
    }

    pub fn write_rows(path: &Path, rows: &[(&str, &str, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS FILE_ALIAS (
                ALIAS TEXT,
                PHYSICAL_FILE_PATH TEXT,
                TAGS TEXT
            );",
        )
        .unwrap();
        for (alias, path, tags) in rows {
            conn.execute(
                "INSERT INTO FILE_ALIAS (ALIAS, PHYSICAL_FILE_PATH, TAGS) VALUES (?1, ?2, ?3)",
                params![alias, path, tags],
            )
            .unwrap();
        }
    }
}
