//! Parser for Android vector drawable documents.
//!
//! Turns vector drawable XML into the `vecgen_core::Vector` IR. Path data is
//! tokenized by a small `nom` grammar; the element tree is walked with
//! `roxmltree`.
//!
//! # Example
//!
//! ```ignore
//! use vecgen_parser::parse_drawable;
//!
//! let vector = parse_drawable(&xml)?;
//! println!("{} paths", vector.path_count());
//! ```

pub mod color;
pub mod drawable;
pub mod lexer;
pub mod path_data;
pub mod resources;
pub mod writer;

pub use color::{parse_color_literal, resolve_color};
pub use drawable::{parse_drawable, parse_drawable_with, IconParser, AAPT_NS, ANDROID_NS};
pub use path_data::parse_path_data;
pub use resources::{parse_color_resources, ColorTable};
pub use writer::{write_drawable, write_path_data};
