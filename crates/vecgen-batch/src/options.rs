//! Generation options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vecgen_codegen::EmitOptions;
use vecgen_core::{Result, VecgenError};

/// Code generation backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputBackend {
    /// Jetpack Compose `ImageVector`.
    #[default]
    #[serde(alias = "compose")]
    DeclarativeUi,
    /// SwiftUI `Shape`.
    #[serde(alias = "swiftui")]
    NativeShape,
}

/// Accepted input format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorType {
    #[default]
    Svg,
    #[serde(alias = "xml")]
    DrawableXml,
}

impl VectorType {
    pub fn extension(self) -> &'static str {
        match self {
            VectorType::Svg => "svg",
            VectorType::DrawableXml => "xml",
        }
    }

    /// Whether `path` carries this type's extension, ignoring case.
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Base package of generated Compose sources.
    pub package: String,
    /// Name of the root group.
    pub accessor_name: String,
    /// Name of the aggregate accessor in group files.
    pub all_assets_property_name: String,
    /// Include a preview scaffold in every icon.
    pub generate_preview: bool,
    pub backend: OutputBackend,
    pub vector_type: VectorType,
    /// Android `<resources>` file resolving `@color/` references.
    pub color_resources: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package: "com.example.icons".to_string(),
            accessor_name: "Icons".to_string(),
            all_assets_property_name: "AllAssets".to_string(),
            generate_preview: true,
            backend: OutputBackend::default(),
            vector_type: VectorType::default(),
            color_resources: None,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| VecgenError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| VecgenError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_accessor(mut self, name: impl Into<String>) -> Self {
        self.accessor_name = name.into();
        self
    }

    pub fn with_backend(mut self, backend: OutputBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_vector_type(mut self, vector_type: VectorType) -> Self {
        self.vector_type = vector_type;
        self
    }

    pub fn with_preview(mut self, generate_preview: bool) -> Self {
        self.generate_preview = generate_preview;
        self
    }

    pub fn with_color_resources(mut self, path: impl Into<PathBuf>) -> Self {
        self.color_resources = Some(path.into());
        self
    }

    /// Check the naming inputs before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.accessor_name) {
            return Err(VecgenError::Config(format!(
                "invalid accessor name '{}'",
                self.accessor_name
            )));
        }
        if self.backend == OutputBackend::DeclarativeUi
            && !self.package.split('.').all(is_identifier)
        {
            return Err(VecgenError::Config(format!(
                "invalid package name '{}'",
                self.package
            )));
        }
        if self.all_assets_property_name.is_empty()
            || !self
                .all_assets_property_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(VecgenError::Config(format!(
                "invalid accessor property name '{}'",
                self.all_assets_property_name
            )));
        }
        Ok(())
    }

    pub(crate) fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            generate_preview: self.generate_preview,
            all_assets_property_name: self.all_assets_property_name.clone(),
        }
    }
}

/// ASCII identifier usable as a type, package segment or directory name.
fn is_identifier(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
