//! Source code generation for parsed vector graphics.
//!
//! Two backends share the [`SourceEmitter`] interface:
//! - [`ComposeEmitter`] writes Jetpack Compose `ImageVector` properties
//! - [`SwiftUiEmitter`] writes SwiftUI `Shape` structs (partial styling)
//!
//! [`naming`] turns file names into identifiers for either backend.

pub mod emitters;
pub mod error;
pub mod naming;

pub use emitters::{EmitOptions, GeneratedFile, GroupContext, GroupSummary, SourceEmitter};
#[cfg(feature = "compose")]
pub use emitters::ComposeEmitter;
#[cfg(feature = "swiftui")]
pub use emitters::SwiftUiEmitter;
pub use error::{CodegenError, Result};
pub use naming::{package_segment, to_identifier, to_identifier_with, NameAllocator};
