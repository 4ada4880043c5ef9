//! Batch orchestration for vecgen.
//!
//! Drives the parser and an emitter over a directory tree or a list of
//! files:
//!
//! ```text
//! *.svg ─> UsvgNormalizer ─┐
//!                          ├─> IconParser ─> Vector ─> SourceEmitter ─> GeneratedArtifact
//! *.xml ───────────────────┘
//! ```
//!
//! Each directory becomes a naming group (`Icons`, `Icons.sub`, ...). A file
//! that fails is reported and skipped; the rest of the batch still runs.
//!
//! # Example
//!
//! ```ignore
//! use vecgen_batch::{parse_directory, GenerateOptions};
//!
//! let report = parse_directory("res/icons", "Icons", GenerateOptions::default())?;
//! for artifact in &report.artifacts {
//!     println!("{} ({})", artifact.name, artifact.group);
//! }
//! ```

pub mod batch;
pub mod context;
pub mod normalize;
pub mod options;
pub mod report;

pub use batch::{
    parse_directory, parse_files, write_directory, write_files, Batch, BatchInput, MAX_DEPTH,
};
pub use context::RunContext;
pub use normalize::{SvgNormalizer, UsvgNormalizer};
pub use options::{GenerateOptions, OutputBackend, VectorType};
pub use report::{BatchReport, GeneratedArtifact, GeneratedGroup};
