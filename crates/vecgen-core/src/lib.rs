//! Core types for the vecgen code generator.
//!
//! This crate provides the foundational types shared by the other vecgen crates:
//! - The vector graphic IR (`Vector`, `VectorNode`, `PathNode`, `Fill`)
//! - `Icon`, the raw-text unit of work handed to the parser
//! - Error types for parsing, reference resolution, and batch processing

pub mod errors;
pub mod icon;
pub mod vector;

pub use errors::*;
pub use icon::Icon;
pub use vector::*;
