//! Source emitters for the vector IR.

#[cfg(feature = "compose")]
mod compose;
#[cfg(feature = "swiftui")]
mod swiftui;

#[cfg(feature = "compose")]
pub use compose::ComposeEmitter;
#[cfg(feature = "swiftui")]
pub use swiftui::SwiftUiEmitter;

use std::path::PathBuf;

use vecgen_core::{Fill, PathNode, Vector, VectorNode};

use crate::error::{CodegenError, Result};
use crate::naming::{is_identifier, package_segment, to_identifier_with};

/// Common interface of the code generation backends.
pub trait SourceEmitter {
    /// Target framework name.
    fn backend_name(&self) -> &'static str;

    /// Extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Names that generated symbols must not take.
    fn reserved_words(&self) -> &'static [&'static str];

    /// Generate the source file declaring one icon.
    fn emit_icon(
        &self,
        vector: &Vector,
        symbol: &str,
        group: &GroupContext,
        options: &EmitOptions,
    ) -> Result<GeneratedFile>;

    /// Generate the accessor file of a group, listing its icons and child groups.
    fn emit_group(&self, summary: &GroupSummary, options: &EmitOptions) -> Result<GeneratedFile>;

    /// Identifier for a raw file or directory name in this backend.
    fn identifier(&self, raw: &str) -> String {
        to_identifier_with(raw, self.reserved_words())
    }
}

/// Options shared by all emitters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Append a preview declaration to every icon.
    pub generate_preview: bool,
    /// Name of the aggregate accessor in group files.
    pub all_assets_property_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            generate_preview: true,
            all_assets_property_name: "AllAssets".to_string(),
        }
    }
}

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File path relative to the output directory.
    pub path: PathBuf,
    /// File content.
    pub content: String,
}

/// Position of a group in the generated hierarchy.
///
/// The root group is named after the accessor; each nested directory adds
/// one more name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupContext {
    package: String,
    names: Vec<String>,
}

impl GroupContext {
    pub fn root(package: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            names: vec![accessor.into()],
        }
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut names = self.names.clone();
        names.push(name.into());
        Self {
            package: self.package.clone(),
            names,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            names: self.names[..self.names.len() - 1].to_vec(),
        })
    }

    /// This group's own name.
    pub fn name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or_default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_root(&self) -> bool {
        self.names.len() <= 1
    }

    pub fn base_package(&self) -> &str {
        &self.package
    }

    /// Display name: the accessor followed by lowercase segments, e.g.
    /// `Icons.sub`.
    pub fn qualified_name(&self) -> String {
        let mut parts = self.names.iter();
        let mut name = parts.next().cloned().unwrap_or_default();
        for part in parts {
            name.push('.');
            name.push_str(&package_segment(part));
        }
        name
    }

    /// Package declaring this group's object.
    pub fn group_package(&self) -> String {
        let ancestors = &self.names[..self.names.len().saturating_sub(1)];
        join_package(&self.package, ancestors)
    }

    /// Package declaring this group's icons.
    pub fn icons_package(&self) -> String {
        join_package(&self.package, &self.names)
    }

    /// Lowercase directory segments mirroring the group nesting.
    pub fn directory(&self) -> PathBuf {
        self.names.iter().map(|n| package_segment(n)).collect()
    }
}

fn join_package(base: &str, names: &[String]) -> String {
    let mut package = base.to_string();
    for name in names {
        if !package.is_empty() {
            package.push('.');
        }
        package.push_str(&package_segment(name));
    }
    package
}

/// Everything an emitter needs to write a group's accessor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub context: GroupContext,
    /// Icon symbols declared directly in this group, in generation order.
    pub icons: Vec<String>,
    /// Names of the child groups.
    pub children: Vec<String>,
}

/// Format a number in its shortest round-trip form, always with a decimal
/// point or exponent, and -0 as 0.
pub(crate) fn literal(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:?}", n)
}

pub(crate) fn check_symbol(symbol: &str, target: &str) -> Result<()> {
    if is_identifier(symbol) {
        Ok(())
    } else {
        Err(CodegenError::InvalidSymbol {
            symbol: symbol.to_string(),
            target: target.to_string(),
        })
    }
}

/// Reject graphics holding NaN or infinite numbers before any text is written.
pub(crate) fn check_finite(vector: &Vector) -> Result<()> {
    fn check(value: f64, context: &str) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(CodegenError::NonFiniteValue {
                value,
                context: context.to_string(),
            })
        }
    }

    fn walk(nodes: &[VectorNode]) -> Result<()> {
        for node in nodes {
            match node {
                VectorNode::Group(group) => {
                    let t = &group.transform;
                    for value in [
                        t.rotation,
                        t.pivot_x,
                        t.pivot_y,
                        t.scale_x,
                        t.scale_y,
                        t.translation_x,
                        t.translation_y,
                    ] {
                        check(value, "group transform")?;
                    }
                    walk(&group.children)?;
                }
                VectorNode::Path(path) => {
                    for command in &path.nodes {
                        for value in operands(command) {
                            check(value, "path data")?;
                        }
                    }
                    check(path.fill_alpha, "fill alpha")?;
                    check(path.stroke_alpha, "stroke alpha")?;
                    check(path.stroke_line_miter, "stroke miter")?;
                    if let Some(width) = &path.stroke_line_width {
                        check(width.value, "stroke width")?;
                    }
                    if let Some(fill) = &path.fill {
                        for stop in fill.stops() {
                            check(stop.offset, "gradient stop")?;
                        }
                        match *fill {
                            Fill::Color(_) => {}
                            Fill::LinearGradient {
                                start_x,
                                start_y,
                                end_x,
                                end_y,
                                ..
                            } => {
                                for value in [start_x, start_y, end_x, end_y] {
                                    check(value, "linear gradient")?;
                                }
                            }
                            Fill::RadialGradient {
                                center_x,
                                center_y,
                                radius,
                                ..
                            } => {
                                for value in [center_x, center_y, radius] {
                                    check(value, "radial gradient")?;
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    check(vector.width.value, "width")?;
    check(vector.height.value, "height")?;
    check(vector.viewport_width, "viewport")?;
    check(vector.viewport_height, "viewport")?;
    walk(&vector.nodes)
}

/// Numeric operands of a path command, flags excluded.
fn operands(node: &PathNode) -> Vec<f64> {
    match *node {
        PathNode::MoveTo { x, y, .. }
        | PathNode::LineTo { x, y, .. }
        | PathNode::SmoothQuadTo { x, y, .. } => vec![x, y],
        PathNode::HorizontalLineTo { x, .. } => vec![x],
        PathNode::VerticalLineTo { y, .. } => vec![y],
        PathNode::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            ..
        } => vec![x1, y1, x2, y2, x3, y3],
        PathNode::SmoothCurveTo { x2, y2, x3, y3, .. } => vec![x2, y2, x3, y3],
        PathNode::QuadTo { x1, y1, x2, y2, .. } => vec![x1, y1, x2, y2],
        PathNode::ArcTo {
            rx, ry, rotation, x, y, ..
        } => vec![rx, ry, rotation, x, y],
        PathNode::Close => Vec::new(),
    }
}
