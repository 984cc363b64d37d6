use super::models::{CatalogEntry, StepEdge};
use super::sqlite::Database;
use super::store::{Store, Table};
use crate::error::Error;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::debug;

impl Store for Database {
    fn save(&self, table: Table, columns: &[&str], rows: &[Vec<Value>]) -> Result<usize, Error> {
        table.validate(columns, rows)?;
        if rows.is_empty() {
            return Ok(0);
        }

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "{} INTO {} ({}) VALUES ({})",
            table.on_conflict().sql_verb(),
            table.name(),
            columns.join(", "),
            placeholders.join(", "),
        );

        let tx = self.connection().unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in rows {
                count += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        debug!("Saved {} of {} rows into {}", count, rows.len(), table);
        Ok(count)
    }

    fn fetch(&self, table: Table, columns: &[&str]) -> Result<Vec<Vec<Value>>, Error> {
        table.validate(columns, &[])?;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            columns.join(", "),
            table.name()
        );

        let mut stmt = self.connection().prepare(&sql)?;
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl Database {
    pub fn count(&self, table: Table) -> Result<i64, Error> {
        let count = self.connection().query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn step_edges_for_file(&self, file_id: i64) -> Result<Vec<StepEdge>, Error> {
        let mut stmt = self.connection().prepare(
            "SELECT filepath_id, parent, child FROM filesteps \
             WHERE filepath_id = ?1 ORDER BY parent, child",
        )?;
        let edges = stmt
            .query_map(params![file_id], |row| {
                Ok(StepEdge {
                    file_id: row.get(0)?,
                    parent: row.get(1)?,
                    child: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    /// Files that share a directory step, e.g. every file filed under `1080p`.
    pub fn file_ids_with_parent(&self, parent: &str) -> Result<Vec<i64>, Error> {
        let mut stmt = self.connection().prepare(
            "SELECT DISTINCT filepath_id FROM filesteps WHERE parent = ?1 ORDER BY filepath_id",
        )?;
        let ids = stmt
            .query_map(params![parent], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Stored files joined with their extracted details, ordered by id.
    pub fn catalog(&self, offset: i64, limit: i64) -> Result<Vec<CatalogEntry>, Error> {
        let mut stmt = self.connection().prepare(
            "SELECT fp.id, fp.filepath, fp.filename, COALESCE(fd.title, fp.filetitle), \
                    fd.year, fd.resolution, fd.codec \
             FROM filepaths fp \
             LEFT JOIN filedetails fd ON fd.file_id = fp.id \
             ORDER BY fp.id LIMIT ?1 OFFSET ?2",
        )?;
        let entries = stmt
            .query_map(params![limit, offset], |row| {
                Ok(CatalogEntry {
                    file_id: row.get(0)?,
                    path: row.get(1)?,
                    filename: row.get(2)?,
                    title: row.get(3)?,
                    year: row.get(4)?,
                    resolution: row.get(5)?,
                    codec: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}
