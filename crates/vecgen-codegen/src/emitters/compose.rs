//! Jetpack Compose `ImageVector` generator.

use std::collections::BTreeSet;
use std::path::PathBuf;

use vecgen_core::{
    ColorStop, Fill, FillType, Group, Path, PathNode, StrokeCap, StrokeJoin, Transform, Vector,
    VectorNode,
};

use super::{
    check_finite, check_symbol, literal, EmitOptions, GeneratedFile, GroupContext, GroupSummary,
    SourceEmitter,
};
use crate::error::Result;

const RESERVED: &[&str] = &[
    "ImageVector",
    "Builder",
    "Color",
    "SolidColor",
    "Brush",
    "Offset",
    "Preview",
    "Composable",
    "AllAssets",
];

const IMAGE_VECTOR: &str = "androidx.compose.ui.graphics.vector.ImageVector";

/// Kotlin Compose code generator.
///
/// Each icon becomes an extension property on its group object, backed by a
/// lazily built `ImageVector`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeEmitter;

impl ComposeEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceEmitter for ComposeEmitter {
    fn backend_name(&self) -> &'static str {
        "Compose"
    }

    fn file_extension(&self) -> &'static str {
        "kt"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn emit_icon(
        &self,
        vector: &Vector,
        symbol: &str,
        group: &GroupContext,
        options: &EmitOptions,
    ) -> Result<GeneratedFile> {
        check_symbol(symbol, "Kotlin")?;
        check_finite(vector)?;

        let mut writer = IconWriter::default();
        let content = writer.write(vector, symbol, group, options);

        Ok(GeneratedFile {
            path: package_dir(&group.icons_package())
                .join(format!("{symbol}.{}", self.file_extension())),
            content,
        })
    }

    fn emit_group(&self, summary: &GroupSummary, options: &EmitOptions) -> Result<GeneratedFile> {
        let context = &summary.context;
        let name = context.name();
        let all_assets = &options.all_assets_property_name;

        check_symbol(name, "Kotlin")?;
        check_symbol(all_assets, "Kotlin")?;

        let mut imports = BTreeSet::new();
        imports.insert(IMAGE_VECTOR.to_string());

        let parent = context.parent();
        if let Some(parent) = &parent {
            imports.insert(qualified(&parent.group_package(), parent.name()));
        }
        let icons_package = context.icons_package();
        for icon in &summary.icons {
            imports.insert(qualified(&icons_package, icon));
        }
        for child in &summary.children {
            imports.insert(qualified(&icons_package, child));
        }
        if !summary.children.is_empty() {
            imports.insert(qualified(&icons_package, all_assets));
        }

        let mut lines = header(&context.group_package(), &imports);

        lines.push(format!("public object {name}"));
        lines.push(String::new());

        if let Some(parent) = &parent {
            lines.push(format!("public val {}.{name}: {name}", parent.name()));
            lines.push(format!("    get() = {name}"));
            lines.push(String::new());
        }

        let mut parts: Vec<String> = summary
            .children
            .iter()
            .map(|child| format!("{child}.{all_assets}"))
            .collect();
        if !summary.icons.is_empty() {
            let icons: Vec<String> = summary
                .icons
                .iter()
                .map(|icon| format!("{name}.{icon}"))
                .collect();
            parts.push(format!("listOf({})", icons.join(", ")));
        }
        let assets = if parts.is_empty() {
            "emptyList()".to_string()
        } else {
            parts.join(" + ")
        };

        let backing = format!("__{all_assets}");
        lines.push(format!("private var {backing}: List<ImageVector>? = null"));
        lines.push(String::new());
        lines.push(format!("public val {name}.{all_assets}: List<ImageVector>"));
        lines.push("    get() {".to_string());
        lines.push(format!("        if ({backing} != null) {{"));
        lines.push(format!("            return {backing}!!"));
        lines.push("        }".to_string());
        lines.push(format!("        {backing} = {assets}"));
        lines.push(format!("        return {backing}!!"));
        lines.push("    }".to_string());
        lines.push(String::new());

        Ok(GeneratedFile {
            path: package_dir(&context.group_package())
                .join(format!("{name}.{}", self.file_extension())),
            content: lines.join("\n"),
        })
    }
}

/// Builds one icon file while collecting the imports its body needs.
#[derive(Default)]
struct IconWriter {
    imports: BTreeSet<String>,
    body: Vec<String>,
}

impl IconWriter {
    fn write(
        &mut self,
        vector: &Vector,
        symbol: &str,
        group: &GroupContext,
        options: &EmitOptions,
    ) -> String {
        let receiver = group.name();
        let backing = backing_name(symbol);

        self.import(IMAGE_VECTOR);
        self.import("androidx.compose.ui.unit.dp");
        let group_package = group.group_package();
        if !group_package.is_empty() {
            self.import(&qualified(&group_package, receiver));
        }

        self.line(0, format!("public val {receiver}.{symbol}: ImageVector"));
        self.line(4, "get() {");
        self.line(8, format!("if ({backing} != null) {{"));
        self.line(12, format!("return {backing}!!"));
        self.line(8, "}");
        self.line(8, format!("{backing} = ImageVector.Builder("));
        self.line(12, format!("name = \"{}\",", kotlin_string(symbol)));
        self.line(12, format!("defaultWidth = {}.dp,", literal(vector.width.to_dp())));
        self.line(12, format!("defaultHeight = {}.dp,", literal(vector.height.to_dp())));
        self.line(12, format!("viewportWidth = {},", float(vector.viewport_width)));
        self.line(12, format!("viewportHeight = {},", float(vector.viewport_height)));
        self.line(8, ").apply {");
        self.nodes(&vector.nodes, 12);
        self.line(8, "}.build()");
        self.line(8, format!("return {backing}!!"));
        self.line(4, "}");
        self.line(0, "");
        self.line(0, format!("private var {backing}: ImageVector? = null"));

        if options.generate_preview {
            self.preview(receiver, symbol);
        }
        self.line(0, "");

        let mut lines = header(&group.icons_package(), &self.imports);
        lines.append(&mut self.body);
        lines.join("\n")
    }

    fn preview(&mut self, receiver: &str, symbol: &str) {
        for import in [
            "androidx.compose.foundation.Image",
            "androidx.compose.foundation.layout.Box",
            "androidx.compose.foundation.layout.padding",
            "androidx.compose.runtime.Composable",
            "androidx.compose.ui.Modifier",
            "androidx.compose.ui.tooling.preview.Preview",
        ] {
            self.import(import);
        }

        self.line(0, "");
        self.line(0, "@Preview");
        self.line(0, "@Composable");
        self.line(0, format!("private fun {symbol}Preview() {{"));
        self.line(4, "Box(modifier = Modifier.padding(12.dp)) {");
        self.line(
            8,
            format!("Image(imageVector = {receiver}.{symbol}, contentDescription = \"\")"),
        );
        self.line(4, "}");
        self.line(0, "}");
    }

    fn nodes(&mut self, nodes: &[VectorNode], indent: usize) {
        for node in nodes {
            match node {
                VectorNode::Group(group) => self.group(group, indent),
                VectorNode::Path(path) => self.path(path, indent),
            }
        }
    }

    fn group(&mut self, group: &Group, indent: usize) {
        let mut params = Vec::new();
        if let Some(name) = &group.name {
            params.push(format!("name = \"{}\"", kotlin_string(name)));
        }

        let t = &group.transform;
        let defaults = Transform::default();
        for (param, value, default) in [
            ("rotate", t.rotation, defaults.rotation),
            ("pivotX", t.pivot_x, defaults.pivot_x),
            ("pivotY", t.pivot_y, defaults.pivot_y),
            ("scaleX", t.scale_x, defaults.scale_x),
            ("scaleY", t.scale_y, defaults.scale_y),
            ("translationX", t.translation_x, defaults.translation_x),
            ("translationY", t.translation_y, defaults.translation_y),
        ] {
            if value != default {
                params.push(format!("{param} = {}", float(value)));
            }
        }

        // An unnamed identity group adds nothing; inline its children.
        if params.is_empty() {
            self.nodes(&group.children, indent);
            return;
        }

        self.import("androidx.compose.ui.graphics.vector.group");
        self.line(indent, format!("group({}) {{", params.join(", ")));
        self.nodes(&group.children, indent + 4);
        self.line(indent, "}");
    }

    fn path(&mut self, path: &Path, indent: usize) {
        self.import("androidx.compose.ui.graphics.vector.path");

        let params = self.path_params(path);
        if params.is_empty() {
            self.line(indent, "path {");
        } else {
            self.line(indent, "path(");
            for param in params {
                self.line(indent + 4, format!("{param},"));
            }
            self.line(indent, ") {");
        }

        for node in &path.nodes {
            self.line(indent + 4, command(node));
        }
        self.line(indent, "}");
    }

    /// Arguments of `path(...)` that differ from the builder defaults.
    fn path_params(&mut self, path: &Path) -> Vec<String> {
        let mut params = Vec::new();

        if let Some(name) = &path.name {
            params.push(format!("name = \"{}\"", kotlin_string(name)));
        }
        if let Some(fill) = &path.fill {
            let brush = self.brush(fill);
            params.push(format!("fill = {brush}"));
        }
        if path.fill_alpha != 1.0 {
            params.push(format!("fillAlpha = {}", float(path.fill_alpha)));
        }
        if let Some(color) = &path.stroke_color {
            let brush = self.solid_color(color);
            params.push(format!("stroke = {brush}"));
        }
        if path.stroke_alpha != 1.0 {
            params.push(format!("strokeAlpha = {}", float(path.stroke_alpha)));
        }
        if let Some(width) = &path.stroke_line_width {
            params.push(format!("strokeLineWidth = {}", float(width.value)));
        }
        if path.stroke_line_cap != StrokeCap::Butt {
            self.import("androidx.compose.ui.graphics.StrokeCap");
            let cap = match path.stroke_line_cap {
                StrokeCap::Butt => "Butt",
                StrokeCap::Round => "Round",
                StrokeCap::Square => "Square",
            };
            params.push(format!("strokeLineCap = StrokeCap.{cap}"));
        }
        if path.stroke_line_join != StrokeJoin::Miter {
            self.import("androidx.compose.ui.graphics.StrokeJoin");
            let join = match path.stroke_line_join {
                StrokeJoin::Miter => "Miter",
                StrokeJoin::Round => "Round",
                StrokeJoin::Bevel => "Bevel",
            };
            params.push(format!("strokeLineJoin = StrokeJoin.{join}"));
        }
        if path.stroke_line_miter != Path::DEFAULT_MITER {
            params.push(format!("strokeLineMiter = {}", float(path.stroke_line_miter)));
        }
        if path.fill_type == FillType::EvenOdd {
            self.import("androidx.compose.ui.graphics.PathFillType");
            params.push("pathFillType = PathFillType.EvenOdd".to_string());
        }

        params
    }

    fn brush(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Color(color) => self.solid_color(color),
            Fill::LinearGradient {
                stops,
                start_x,
                start_y,
                end_x,
                end_y,
            } => {
                self.import("androidx.compose.ui.graphics.Brush");
                self.import("androidx.compose.ui.geometry.Offset");
                format!(
                    "Brush.linearGradient({}, start = Offset({}, {}), end = Offset({}, {}))",
                    self.color_stops(stops),
                    float(*start_x),
                    float(*start_y),
                    float(*end_x),
                    float(*end_y)
                )
            }
            Fill::RadialGradient {
                stops,
                center_x,
                center_y,
                radius,
            } => {
                self.import("androidx.compose.ui.graphics.Brush");
                self.import("androidx.compose.ui.geometry.Offset");
                format!(
                    "Brush.radialGradient({}, center = Offset({}, {}), radius = {})",
                    self.color_stops(stops),
                    float(*center_x),
                    float(*center_y),
                    float(*radius)
                )
            }
        }
    }

    fn solid_color(&mut self, color: &str) -> String {
        self.import("androidx.compose.ui.graphics.SolidColor");
        self.import("androidx.compose.ui.graphics.Color");
        format!("SolidColor(Color(0x{color}))")
    }

    fn color_stops(&mut self, stops: &[ColorStop]) -> String {
        self.import("androidx.compose.ui.graphics.Color");
        stops
            .iter()
            .map(|stop| format!("{} to Color(0x{})", float(stop.offset), stop.color))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn import(&mut self, name: &str) {
        if !self.imports.contains(name) {
            self.imports.insert(name.to_string());
        }
    }

    fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.body.push(String::new());
        } else {
            self.body.push(format!("{}{}", " ".repeat(indent), text));
        }
    }
}

/// The `PathBuilder` call for one command.
fn command(node: &PathNode) -> String {
    let name = |base: &str, relative: bool| {
        if relative {
            format!("{base}Relative")
        } else {
            base.to_string()
        }
    };
    let args = |values: &[f64]| {
        values
            .iter()
            .map(|v| float(*v))
            .collect::<Vec<_>>()
            .join(", ")
    };

    match *node {
        PathNode::MoveTo { relative, x, y } => {
            format!("{}({})", name("moveTo", relative), args(&[x, y]))
        }
        PathNode::LineTo { relative, x, y } => {
            format!("{}({})", name("lineTo", relative), args(&[x, y]))
        }
        PathNode::HorizontalLineTo { relative, x } => {
            format!("{}({})", name("horizontalLineTo", relative), args(&[x]))
        }
        PathNode::VerticalLineTo { relative, y } => {
            format!("{}({})", name("verticalLineTo", relative), args(&[y]))
        }
        PathNode::CurveTo {
            relative,
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
        } => format!(
            "{}({})",
            name("curveTo", relative),
            args(&[x1, y1, x2, y2, x3, y3])
        ),
        PathNode::SmoothCurveTo {
            relative,
            x2,
            y2,
            x3,
            y3,
        } => format!(
            "{}({})",
            name("reflectiveCurveTo", relative),
            args(&[x2, y2, x3, y3])
        ),
        PathNode::QuadTo {
            relative,
            x1,
            y1,
            x2,
            y2,
        } => format!("{}({})", name("quadTo", relative), args(&[x1, y1, x2, y2])),
        PathNode::SmoothQuadTo { relative, x, y } => {
            format!("{}({})", name("reflectiveQuadTo", relative), args(&[x, y]))
        }
        PathNode::ArcTo {
            relative,
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x,
            y,
        } => format!(
            "{}({}, {}, {}, {})",
            name("arcTo", relative),
            args(&[rx, ry, rotation]),
            large_arc,
            sweep,
            args(&[x, y])
        ),
        PathNode::Close => "close()".to_string(),
    }
}

fn float(n: f64) -> String {
    format!("{}f", literal(n))
}

fn backing_name(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => format!("_{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => "_icon".to_string(),
    }
}

fn kotlin_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn qualified(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn package_dir(package: &str) -> PathBuf {
    package.split('.').filter(|s| !s.is_empty()).collect()
}

fn header(package: &str, imports: &BTreeSet<String>) -> Vec<String> {
    let mut lines = Vec::new();
    if !package.is_empty() {
        lines.push(format!("package {package}"));
        lines.push(String::new());
    }
    for import in imports {
        lines.push(format!("import {import}"));
    }
    if !imports.is_empty() {
        lines.push(String::new());
    }
    lines
}
