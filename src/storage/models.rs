use crate::extract::Codec;
use serde::Serialize;

/// A media file discovered by the walker, as stored in `filepaths`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub path: String,
    pub filename: String,
    pub title: String,
}

/// A discovered file before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    pub path: String,
    pub filename: String,
    pub title: String,
}

/// Parsed filename metadata for one file, as stored in `filedetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub file_id: i64,
    pub title: String,
    pub year: Option<u16>,
    pub resolution: Option<String>,
    pub codec: Option<Codec>,
}

/// One directory step (parent → child) within a file's path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepEdge {
    pub file_id: i64,
    pub parent: String,
    pub child: String,
}

/// A file joined with its details, as handed to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub file_id: i64,
    pub path: String,
    pub filename: String,
    pub title: String,
    pub year: Option<u16>,
    pub resolution: Option<String>,
    pub codec: Option<String>,
}
