//! Comparison pipeline components.
//!
//! - **discovery**: list the files of the input directory
//! - **loader**: read every file into memory
//! - **analyzer**: run both detectors per image and merge their results

pub mod analyzer;
pub mod discovery;
pub mod loader;

// Re-exports for convenient access
pub use analyzer::{AnalysisOutcome, AnalyzeOptions, Analyzer, BatchReport, ImageFailure};
pub use discovery::ImageSource;
pub use loader::load_images;
