//! Dataset Module - Offline Training Data
//!
//! Labeled CSV dataset cho training fallback của classifier.
//! Serving path KHÔNG BAO GIỜ đọc dataset.

pub mod record;
pub mod loader;
pub mod synth;


pub use record::{DatasetSummary, TrainingSet};
pub use loader::{load_csv, write_csv};
pub use synth::{synthesize, synthesize_with, EvidencePrior, DEFAULT_ROWS_PER_CELL};
