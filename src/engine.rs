use crate::config::{self, AppConfig};
use crate::error::Error;
use crate::extract::{self, StepGraph};
use crate::progress::{Pass, ProgressReporter};
use crate::scanner::PathWalker;
use crate::storage::models::{FileDetails, NewFileRecord, StepEdge};
use crate::storage::{Database, Store};
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct FinderEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct RunResult {
    pub scan_duration: Duration,
    pub steps_duration: Duration,
    pub details_duration: Duration,
    pub files_found: usize,
    pub files_recorded: usize,
    pub step_edges: usize,
    pub details_written: usize,
}

impl FinderEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_db_path(mut self, path: &str) -> Self {
        self.config.db_path = path.to_string();
        self
    }

    pub fn open_database(&self) -> Result<Database, Error> {
        Ok(Database::open(&self.config.db_path)?)
    }

    /// Run the full pipeline against the configured database:
    /// 1. Walk the roots and record matching files in `filepaths`
    /// 2. Derive directory steps for every stored file into `filesteps`
    /// 3. Parse every stored filename into `filedetails`
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        let db = self.open_database()?;

        // Phase 1: Scan
        let scan_start = Instant::now();
        let (files_found, files_recorded) = self.scan(&db, reporter)?;
        let scan_duration = scan_start.elapsed();
        info!("Files found and saved to database");

        // Phase 2: Steps
        let steps_start = Instant::now();
        let step_edges = extract_steps(&db, reporter)?;
        let steps_duration = steps_start.elapsed();
        info!("Directory steps extracted and saved to database");

        // Phase 3: Details
        let details_start = Instant::now();
        let details_written = extract_details(&db, reporter)?;
        let details_duration = details_start.elapsed();
        info!("Details extracted and saved to database");

        Ok(RunResult {
            scan_duration,
            steps_duration,
            details_duration,
            files_found,
            files_recorded,
            step_edges,
            details_written,
        })
    }

    /// Walk the configured roots and record what was found.
    /// Returns (files found, new rows written).
    pub fn scan<S: Store + ?Sized>(
        &self,
        store: &S,
        reporter: &dyn ProgressReporter,
    ) -> Result<(usize, usize), Error> {
        let roots = config::non_overlapping_directories(self.config.root_paths.clone());
        info!("Scanning directories: {:?}", roots);
        debug!("Extensions: {:?}", self.config.extensions);

        reporter.on_scan_start();
        let start = Instant::now();
        let walker = PathWalker::new(&self.config.extensions, &self.config.ignore_patterns);
        let paths = walker.find_all(&roots);
        reporter.on_scan_complete(paths.len(), start.elapsed().as_secs_f64());

        let recorded = record_files(store, &paths)?;
        debug!(
            "Scan completed in {:.2}s, {} files found, {} new",
            start.elapsed().as_secs_f64(),
            paths.len(),
            recorded
        );
        Ok((paths.len(), recorded))
    }
}

/// Store each path with its file name and parsed title. Paths that are not
/// valid UTF-8 are logged and left out.
pub fn record_files<S: Store + ?Sized>(store: &S, paths: &[PathBuf]) -> Result<usize, Error> {
    let records: Vec<NewFileRecord> = paths
        .iter()
        .filter_map(|path| match file_record(path) {
            Some(record) => Some(record),
            None => {
                warn!("Skipping path that is not valid UTF-8: {}", path.display());
                None
            }
        })
        .collect();

    store.save_file_records(&records)
}

fn file_record(path: &Path) -> Option<NewFileRecord> {
    let path_str = path.to_str()?;
    let filename = path.file_name()?.to_str()?;
    Some(NewFileRecord {
        path: path_str.to_string(),
        filename: filename.to_string(),
        title: extract::filename::title(filename),
    })
}

/// Build a fresh step graph for every stored file and save the tagged edges.
pub fn extract_steps<S: Store + ?Sized>(
    store: &S,
    reporter: &dyn ProgressReporter,
) -> Result<usize, Error> {
    let records = store.file_records()?;
    let total = records.len();
    reporter.on_extract_start(Pass::Steps, total);
    let start = Instant::now();

    let done = AtomicUsize::new(0);
    let edges: Vec<StepEdge> = records
        .par_iter()
        .flat_map_iter(|record| {
            let graph = StepGraph::from_segments(&extract::segments(&record.path));
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_extract_progress(Pass::Steps, finished, total);
            graph.tag(record.id)
        })
        .collect();

    let written = store.save_step_edges(&edges)?;
    debug!(
        "{} step edges derived from {} files, {} new",
        edges.len(),
        total,
        written
    );
    reporter.on_extract_complete(Pass::Steps, edges.len(), start.elapsed().as_secs_f64());
    Ok(edges.len())
}

/// Parse every stored filename and replace its `filedetails` row.
pub fn extract_details<S: Store + ?Sized>(
    store: &S,
    reporter: &dyn ProgressReporter,
) -> Result<usize, Error> {
    let records = store.file_records()?;
    let total = records.len();
    reporter.on_extract_start(Pass::Details, total);
    let start = Instant::now();

    let done = AtomicUsize::new(0);
    let details_map: DashMap<i64, FileDetails> = DashMap::new();
    records.par_iter().for_each(|record| {
        let parsed = extract::parse(&record.filename);
        details_map.insert(
            record.id,
            FileDetails {
                file_id: record.id,
                title: parsed.title,
                year: parsed.year,
                resolution: parsed.resolution,
                codec: parsed.codec,
            },
        );
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.on_extract_progress(Pass::Details, finished, total);
    });

    let mut details: Vec<FileDetails> = details_map.into_iter().map(|(_, d)| d).collect();
    details.sort_by_key(|d| d.file_id);

    let written = store.save_file_details(&details)?;
    reporter.on_extract_complete(Pass::Details, written, start.elapsed().as_secs_f64());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use crate::storage::Table;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_record_files_skips_duplicates() {
        let db = Database::open_in_memory().unwrap();
        let paths = vec![
            PathBuf::from("/media/films/Duck.Duck.Goose.2018.720p.BluRay.x264-[YTS.AM].mp4"),
            PathBuf::from("/media/films/Heat.1995.1080p.mkv"),
        ];
        assert_eq!(record_files(&db, &paths).unwrap(), 2);
        assert_eq!(record_files(&db, &paths).unwrap(), 0);

        let records = db.file_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "Duck.Duck.Goose.2018.720p.BluRay.x264-[YTS.AM].mp4");
        assert_eq!(records[0].title, "Duck Duck Goose");
        assert_eq!(records[1].title, "Heat");
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_extract_passes_over_stored_files() {
        let db = Database::open_in_memory().unwrap();
        let paths = vec![PathBuf::from("/media/films/1080p/Heat.1995.1080p.x265.mkv")];
        record_files(&db, &paths).unwrap();

        let edges = extract_steps(&db, &SilentReporter).unwrap();
        assert_eq!(edges, 2);
        let written = extract_details(&db, &SilentReporter).unwrap();
        assert_eq!(written, 1);

        let details = db.file_details().unwrap();
        assert_eq!(details[0].title, "Heat");
        assert_eq!(details[0].year, Some(1995));
        assert_eq!(details[0].codec, Some(extract::Codec::X265));
        assert_eq!(db.count(Table::FileSteps).unwrap(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_record_files_skips_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let db = Database::open_in_memory().unwrap();
        let paths = vec![
            Path::new("/media/films").join(OsStr::from_bytes(b"\xff.mkv")),
            PathBuf::from("/media/films/Heat.1995.mkv"),
        ];
        assert_eq!(record_files(&db, &paths).unwrap(), 1);

        let records = db.file_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "Heat.1995.mkv");

        let only_bad = vec![PathBuf::from(OsStr::from_bytes(b"/media/\xfe/x.mkv"))];
        assert_eq!(record_files(&db, &only_bad).unwrap(), 0);
    }

    #[test]
    fn test_extract_on_empty_store() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(extract_steps(&db, &SilentReporter).unwrap(), 0);
        assert_eq!(extract_details(&db, &SilentReporter).unwrap(), 0);
    }
}
