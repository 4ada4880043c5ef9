//! Icons: the raw-text unit of work handed from the orchestrator to the parser.

/// A named vector drawable document waiting to be parsed.
///
/// Created once per input file and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    /// Sanitized identifier used for the generated symbol.
    pub identifier: String,
    /// File name the drawable text was read from.
    pub file_name: String,
    /// Vector drawable XML text.
    pub drawable_xml: String,
}

impl Icon {
    pub fn new(
        identifier: impl Into<String>,
        file_name: impl Into<String>,
        drawable_xml: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            file_name: file_name.into(),
            drawable_xml: drawable_xml.into(),
        }
    }
}
