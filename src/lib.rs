pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use config::AppConfig;
pub use engine::{FinderEngine, RunResult};
pub use error::Error;
pub use progress::{Pass, ProgressReporter, SilentReporter};
