//! Error types for code generation.

use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    /// The requested symbol cannot be declared in the target language.
    #[error("'{symbol}' is not a valid {target} identifier")]
    InvalidSymbol { symbol: String, target: String },

    /// A coordinate or style value has no source representation.
    #[error("non-finite value {value} in {context}")]
    NonFiniteValue { value: f64, context: String },
}
