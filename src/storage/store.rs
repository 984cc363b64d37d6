use super::models::{FileDetails, FileRecord, NewFileRecord, StepEdge};
use crate::error::Error;
use rusqlite::types::Value;
use std::fmt;
use tracing::warn;

/// What happens when a saved row collides with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Ignore,
    Replace,
}

impl Conflict {
    pub fn sql_verb(&self) -> &'static str {
        match self {
            Conflict::Ignore => "INSERT OR IGNORE",
            Conflict::Replace => "INSERT OR REPLACE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    FilePaths,
    FileSteps,
    FileDetails,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::FilePaths => "filepaths",
            Table::FileSteps => "filesteps",
            Table::FileDetails => "filedetails",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::FilePaths => &["id", "filepath", "filename", "filetitle"],
            Table::FileSteps => &["filepath_id", "parent", "child"],
            Table::FileDetails => &["file_id", "title", "year", "resolution", "codec"],
        }
    }

    /// `filepaths` and `filesteps` only ever grow; `filedetails` keeps the latest extraction.
    pub fn on_conflict(&self) -> Conflict {
        match self {
            Table::FilePaths | Table::FileSteps => Conflict::Ignore,
            Table::FileDetails => Conflict::Replace,
        }
    }

    /// Check a batch against this table before anything is written.
    pub fn validate(&self, columns: &[&str], rows: &[Vec<Value>]) -> Result<(), Error> {
        if columns.is_empty() {
            return Err(Error::Other(format!("No columns given for table {}", self)));
        }
        if let Some(unknown) = columns.iter().find(|c| !self.columns().contains(*c)) {
            return Err(Error::UnknownColumn {
                table: self.name(),
                column: unknown.to_string(),
            });
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(Error::ColumnMismatch {
                table: self.name(),
                columns: columns.iter().map(|c| c.to_string()).collect(),
                expected: columns.len(),
                got: bad.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Table-level persistence the pipeline is written against.
///
/// `save` applies the table's conflict policy and either writes the whole
/// batch or nothing. `fetch` returns every row, oldest first.
pub trait Store {
    fn save(&self, table: Table, columns: &[&str], rows: &[Vec<Value>]) -> Result<usize, Error>;

    fn fetch(&self, table: Table, columns: &[&str]) -> Result<Vec<Vec<Value>>, Error>;

    fn save_file_records(&self, records: &[NewFileRecord]) -> Result<usize, Error> {
        let rows: Vec<Vec<Value>> = records
            .iter()
            .map(|r| {
                vec![
                    Value::Text(r.path.clone()),
                    Value::Text(r.filename.clone()),
                    Value::Text(r.title.clone()),
                ]
            })
            .collect();
        self.save(Table::FilePaths, &["filepath", "filename", "filetitle"], &rows)
    }

    /// All stored files. Rows that do not decode are logged and skipped.
    fn file_records(&self) -> Result<Vec<FileRecord>, Error> {
        let rows = self.fetch(Table::FilePaths, Table::FilePaths.columns())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [Value::Integer(id), Value::Text(path), Value::Text(filename), Value::Text(title)] => {
                    Some(FileRecord {
                        id: *id,
                        path: path.clone(),
                        filename: filename.clone(),
                        title: title.clone(),
                    })
                }
                other => {
                    warn!("Skipping malformed filepaths row: {:?}", other);
                    None
                }
            })
            .collect())
    }

    fn save_step_edges(&self, edges: &[StepEdge]) -> Result<usize, Error> {
        let rows: Vec<Vec<Value>> = edges
            .iter()
            .map(|e| {
                vec![
                    Value::Integer(e.file_id),
                    Value::Text(e.parent.clone()),
                    Value::Text(e.child.clone()),
                ]
            })
            .collect();
        self.save(Table::FileSteps, Table::FileSteps.columns(), &rows)
    }

    fn step_edges(&self) -> Result<Vec<StepEdge>, Error> {
        let rows = self.fetch(Table::FileSteps, Table::FileSteps.columns())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [Value::Integer(file_id), Value::Text(parent), Value::Text(child)] => {
                    Some(StepEdge {
                        file_id: *file_id,
                        parent: parent.clone(),
                        child: child.clone(),
                    })
                }
                other => {
                    warn!("Skipping malformed filesteps row: {:?}", other);
                    None
                }
            })
            .collect())
    }

    fn save_file_details(&self, details: &[FileDetails]) -> Result<usize, Error> {
        let rows: Vec<Vec<Value>> = details
            .iter()
            .map(|d| {
                vec![
                    Value::Integer(d.file_id),
                    Value::Text(d.title.clone()),
                    d.year.map_or(Value::Null, |y| Value::Integer(i64::from(y))),
                    d.resolution.clone().map_or(Value::Null, Value::Text),
                    d.codec
                        .map_or(Value::Null, |c| Value::Text(c.as_str().to_string())),
                ]
            })
            .collect();
        self.save(Table::FileDetails, Table::FileDetails.columns(), &rows)
    }

    fn file_details(&self) -> Result<Vec<FileDetails>, Error> {
        let rows = self.fetch(Table::FileDetails, Table::FileDetails.columns())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [Value::Integer(file_id), Value::Text(title), year, resolution, codec] => {
                    Some(FileDetails {
                        file_id: *file_id,
                        title: title.clone(),
                        year: match year {
                            Value::Integer(y) => u16::try_from(*y).ok(),
                            _ => None,
                        },
                        resolution: match resolution {
                            Value::Text(r) => Some(r.clone()),
                            _ => None,
                        },
                        codec: match codec {
                            Value::Text(c) => c.parse().ok(),
                            _ => None,
                        },
                    })
                }
                other => {
                    warn!("Skipping malformed filedetails row: {:?}", other);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_policy_per_table() {
        assert_eq!(Table::FilePaths.on_conflict(), Conflict::Ignore);
        assert_eq!(Table::FileSteps.on_conflict(), Conflict::Ignore);
        assert_eq!(Table::FileDetails.on_conflict(), Conflict::Replace);
    }

    #[test]
    fn test_validate_rejects_arity_mismatch() {
        let rows = vec![
            vec![Value::Integer(1), Value::Text("a".into()), Value::Text("b".into())],
            vec![Value::Integer(1), Value::Text("a".into())],
        ];
        let err = Table::FileSteps
            .validate(Table::FileSteps.columns(), &rows)
            .unwrap_err();
        match err {
            Error::ColumnMismatch { expected, got, .. } => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_column() {
        let err = Table::FilePaths
            .validate(&["filepath", "size"], &[])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { column, .. } if column == "size"));
    }

    #[test]
    fn test_validate_accepts_subset_of_columns() {
        let rows = vec![vec![Value::Text("/a/b.mkv".into())]];
        assert!(Table::FilePaths.validate(&["filepath"], &rows).is_ok());
    }
}
