pub mod filename;
pub mod segments;
pub mod steps;

pub use filename::{parse, Codec, ParsedFilename};
pub use segments::segments;
pub use steps::StepGraph;
