use media_finder::extract::Codec;
use media_finder::storage::models::*;
use media_finder::storage::{Database, Store, Table};
use media_finder::Error;
use rusqlite::types::Value;

fn make_record(path: &str, title: &str) -> NewFileRecord {
    NewFileRecord {
        path: path.to_string(),
        filename: path.rsplit('/').next().unwrap_or(path).to_string(),
        title: title.to_string(),
    }
}

fn seed_files(db: &Database) -> Vec<FileRecord> {
    let records = vec![
        make_record("/media/films/Heat.1995.mkv", "Heat"),
        make_record("/media/films/Alien.1979.mp4", "Alien"),
    ];
    db.save_file_records(&records).unwrap();
    db.file_records().unwrap()
}

#[test]
fn test_file_records_are_insert_or_ignore() {
    let db = Database::open_in_memory().unwrap();
    let records = vec![
        make_record("/media/films/Heat.1995.mkv", "Heat"),
        make_record("/media/films/Heat.1995.mkv", "Heat"),
        make_record("/media/films/Alien.1979.mp4", "Alien"),
    ];
    assert_eq!(db.save_file_records(&records).unwrap(), 2);
    assert_eq!(db.save_file_records(&records).unwrap(), 0);

    // An ignored duplicate still consumes an AUTOINCREMENT id.
    let stored = db.file_records().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].filename, "Heat.1995.mkv");
    assert_eq!(stored[1].filename, "Alien.1979.mp4");
    assert!(stored[0].id < stored[1].id);
}

#[test]
fn test_distinct_batch_gets_sequential_ids() {
    let db = Database::open_in_memory().unwrap();
    let files = seed_files(&db);
    assert_eq!(files[0].id, 1);
    assert_eq!(files[1].id, 2);
}

#[test]
fn test_step_edges_are_unique_per_file() {
    let db = Database::open_in_memory().unwrap();
    let files = seed_files(&db);

    let edge = |file_id: i64| StepEdge {
        file_id,
        parent: "media".to_string(),
        child: "films".to_string(),
    };
    let edges = vec![edge(files[0].id), edge(files[0].id), edge(files[1].id)];
    assert_eq!(db.save_step_edges(&edges).unwrap(), 2);
    assert_eq!(db.save_step_edges(&edges).unwrap(), 0);

    assert_eq!(db.step_edges().unwrap().len(), 2);
    assert_eq!(db.step_edges_for_file(files[0].id).unwrap(), vec![edge(files[0].id)]);
    assert_eq!(
        db.file_ids_with_parent("media").unwrap(),
        vec![files[0].id, files[1].id]
    );
}

#[test]
fn test_step_edge_requires_existing_file() {
    let db = Database::open_in_memory().unwrap();
    let orphan = StepEdge {
        file_id: 42,
        parent: "media".to_string(),
        child: "films".to_string(),
    };
    let err = db.save_step_edges(&[orphan]).unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert_eq!(db.count(Table::FileSteps).unwrap(), 0);
}

#[test]
fn test_file_details_are_replaced() {
    let db = Database::open_in_memory().unwrap();
    let files = seed_files(&db);

    let first = FileDetails {
        file_id: files[0].id,
        title: "Heat".to_string(),
        year: None,
        resolution: None,
        codec: None,
    };
    db.save_file_details(&[first]).unwrap();

    let second = FileDetails {
        file_id: files[0].id,
        title: "Heat".to_string(),
        year: Some(1995),
        resolution: Some("1080p".to_string()),
        codec: Some(Codec::X264),
    };
    db.save_file_details(&[second.clone()]).unwrap();

    let stored = db.file_details().unwrap();
    assert_eq!(stored, vec![second]);
}

#[test]
fn test_arity_mismatch_writes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let rows = vec![
        vec![
            Value::Text("/a/one.mkv".into()),
            Value::Text("one.mkv".into()),
            Value::Text("one".into()),
        ],
        vec![Value::Text("/a/two.mkv".into()), Value::Text("two.mkv".into())],
    ];
    let err = db
        .save(Table::FilePaths, &["filepath", "filename", "filetitle"], &rows)
        .unwrap_err();
    assert!(matches!(err, Error::ColumnMismatch { expected: 3, got: 2, .. }));
    assert_eq!(db.count(Table::FilePaths).unwrap(), 0);
}

#[test]
fn test_unknown_column_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = db.fetch(Table::FileDetails, &["file_id", "rating"]).unwrap_err();
    assert!(matches!(err, Error::UnknownColumn { .. }));
}

#[test]
fn test_fetch_selected_columns() {
    let db = Database::open_in_memory().unwrap();
    seed_files(&db);
    let rows = db.fetch(Table::FilePaths, &["id", "filename"]).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(1), Value::Text("Heat.1995.mkv".into())],
            vec![Value::Integer(2), Value::Text("Alien.1979.mp4".into())],
        ]
    );
}

#[test]
fn test_catalog_joins_details() {
    let db = Database::open_in_memory().unwrap();
    let files = seed_files(&db);
    db.save_file_details(&[FileDetails {
        file_id: files[1].id,
        title: "Alien".to_string(),
        year: Some(1979),
        resolution: None,
        codec: Some(Codec::DivX),
    }])
    .unwrap();

    let catalog = db.catalog(0, 10).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].title, "Heat");
    assert_eq!(catalog[0].year, None);
    assert_eq!(catalog[1].year, Some(1979));
    assert_eq!(catalog[1].codec.as_deref(), Some("DivX"));

    let page = db.catalog(1, 10).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].file_id, files[1].id);
}

#[test]
fn test_truncate_all_resets_ids() {
    let db = Database::open_in_memory().unwrap();
    seed_files(&db);
    db.truncate_all().unwrap();
    assert_eq!(db.count(Table::FilePaths).unwrap(), 0);

    let files = seed_files(&db);
    assert_eq!(files[0].id, 1);
}
