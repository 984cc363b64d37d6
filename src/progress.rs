use std::fmt;

/// The two derivation passes run over stored file records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Steps,
    Details,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Steps => f.write_str("directory steps"),
            Pass::Details => f.write_str("file details"),
        }
    }
}

/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _files_found: usize, _duration_secs: f64) {}
    fn on_extract_start(&self, _pass: Pass, _total_files: usize) {}
    fn on_extract_progress(&self, _pass: Pass, _files_done: usize, _total_files: usize) {}
    fn on_extract_complete(&self, _pass: Pass, _rows: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
