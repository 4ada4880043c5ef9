//! Vector drawable document parsing.
//!
//! The element tree is walked top-down; every `<group>` recurses with no
//! inherited state other than its position in the tree.

use roxmltree::{Document, Node};
use vecgen_core::{
    ColorStop, DimensionUnit, DrawableError, Fill, FillType, GraphicUnit, Group, Icon,
    ParseError, Path, ResolveError, StrokeCap, StrokeJoin, Transform, Vector, VectorNode,
};

use crate::color::resolve_color;
use crate::lexer::number;
use crate::path_data::parse_path_data;
use crate::resources::ColorTable;

/// Namespace of `android:` attributes.
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Namespace of inline `<aapt:attr>` complex values.
pub const AAPT_NS: &str = "http://schemas.android.com/aapt";

/// Parse a vector drawable document with no color resources.
pub fn parse_drawable(xml: &str) -> Result<Vector, DrawableError> {
    parse_drawable_with(xml, &ColorTable::default())
}

/// Parse a vector drawable document, resolving `@color/` references in
/// `colors`.
pub fn parse_drawable_with(xml: &str, colors: &ColorTable) -> Result<Vector, DrawableError> {
    let doc = Document::parse(xml).map_err(|e| ParseError::Xml(e.to_string()))?;
    DrawableReader { colors }.read_vector(doc.root_element())
}

/// Parses the drawable text carried by an [`Icon`].
pub struct IconParser<'a> {
    icon: &'a Icon,
    colors: Option<&'a ColorTable>,
}

impl<'a> IconParser<'a> {
    pub fn new(icon: &'a Icon) -> Self {
        Self { icon, colors: None }
    }

    pub fn with_colors(mut self, colors: &'a ColorTable) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn parse(&self) -> Result<Vector, DrawableError> {
        log::debug!("parsing {} as {}", self.icon.file_name, self.icon.identifier);

        let vector = match self.colors {
            Some(colors) => parse_drawable_with(&self.icon.drawable_xml, colors)?,
            None => parse_drawable(&self.icon.drawable_xml)?,
        };

        log::debug!(
            "{}: {} paths in a {}x{} viewport",
            self.icon.file_name,
            vector.path_count(),
            vector.viewport_width,
            vector.viewport_height
        );
        Ok(vector)
    }
}

struct DrawableReader<'c> {
    colors: &'c ColorTable,
}

impl DrawableReader<'_> {
    fn read_vector(&self, root: Node) -> Result<Vector, DrawableError> {
        if root.tag_name().name() != "vector" {
            return Err(ParseError::UnexpectedRoot {
                expected: "vector".into(),
                found: root.tag_name().name().into(),
            }
            .into());
        }

        let width = dimension(root, "width")?;
        let height = dimension(root, "height")?;

        let viewport_width = float(root, "viewportWidth")?
            .or(width.map(|w| w.value))
            .ok_or_else(|| missing(root, "viewportWidth"))?;
        let viewport_height = float(root, "viewportHeight")?
            .or(height.map(|h| h.value))
            .ok_or_else(|| missing(root, "viewportHeight"))?;

        if !(viewport_width > 0.0 && viewport_height > 0.0) {
            return Err(ParseError::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            }
            .into());
        }

        Ok(Vector {
            width: width.unwrap_or(GraphicUnit::unitless(viewport_width)),
            height: height.unwrap_or(GraphicUnit::unitless(viewport_height)),
            viewport_width,
            viewport_height,
            nodes: self.read_children(root)?,
        })
    }

    fn read_children(&self, parent: Node) -> Result<Vec<VectorNode>, DrawableError> {
        let mut nodes = Vec::new();

        for child in parent.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "group" => nodes.push(VectorNode::Group(self.read_group(child)?)),
                "path" => nodes.push(VectorNode::Path(self.read_path(child)?)),
                "clip-path" => log::warn!("clip paths are not supported, skipping"),
                "attr" if child.tag_name().namespace() == Some(AAPT_NS) => {}
                other => log::warn!("skipping unknown element <{other}>"),
            }
        }

        Ok(nodes)
    }

    fn read_group(&self, node: Node) -> Result<Group, DrawableError> {
        let defaults = Transform::default();
        let transform = Transform {
            rotation: float(node, "rotation")?.unwrap_or(defaults.rotation),
            pivot_x: float(node, "pivotX")?.unwrap_or(defaults.pivot_x),
            pivot_y: float(node, "pivotY")?.unwrap_or(defaults.pivot_y),
            scale_x: float(node, "scaleX")?.unwrap_or(defaults.scale_x),
            scale_y: float(node, "scaleY")?.unwrap_or(defaults.scale_y),
            translation_x: float(node, "translateX")?.unwrap_or(defaults.translation_x),
            translation_y: float(node, "translateY")?.unwrap_or(defaults.translation_y),
        };

        Ok(Group {
            name: android_attr(node, "name").map(str::to_string),
            transform,
            children: self.read_children(node)?,
        })
    }

    fn read_path(&self, node: Node) -> Result<Path, DrawableError> {
        let data = android_attr(node, "pathData").ok_or_else(|| missing(node, "pathData"))?;
        let mut path = Path::new(parse_path_data(data)?);

        path.name = android_attr(node, "name").map(str::to_string);
        path.fill = self.read_fill(node)?;
        path.stroke_color = self.read_stroke_color(node)?;

        if let Some(alpha) = alpha(node, "fillAlpha")? {
            path.fill_alpha = alpha;
        }
        if let Some(alpha) = alpha(node, "strokeAlpha")? {
            path.stroke_alpha = alpha;
        }
        if let Some(width) = float(node, "strokeWidth")? {
            path.stroke_line_width = Some(GraphicUnit::unitless(width));
        }
        if let Some(miter) = float(node, "strokeMiterLimit")? {
            path.stroke_line_miter = miter;
        }

        if let Some(cap) = android_attr(node, "strokeLineCap") {
            path.stroke_line_cap = match cap {
                "butt" => StrokeCap::Butt,
                "round" => StrokeCap::Round,
                "square" => StrokeCap::Square,
                _ => return Err(invalid_value("strokeLineCap", cap)),
            };
        }
        if let Some(join) = android_attr(node, "strokeLineJoin") {
            path.stroke_line_join = match join {
                "miter" => StrokeJoin::Miter,
                "round" => StrokeJoin::Round,
                "bevel" => StrokeJoin::Bevel,
                _ => return Err(invalid_value("strokeLineJoin", join)),
            };
        }
        if let Some(fill_type) = android_attr(node, "fillType") {
            path.fill_type = match fill_type {
                "nonZero" => FillType::NonZero,
                "evenOdd" => FillType::EvenOdd,
                _ => return Err(invalid_value("fillType", fill_type)),
            };
        }

        Ok(path)
    }

    fn read_fill(&self, node: Node) -> Result<Option<Fill>, DrawableError> {
        if let Some(gradient) = inline_gradient(node, "android:fillColor") {
            return self.read_gradient(gradient).map(Some);
        }

        match android_attr(node, "fillColor") {
            Some(value) => Ok(Some(Fill::Color(resolve_color(value, self.colors)?))),
            None => Ok(None),
        }
    }

    fn read_stroke_color(&self, node: Node) -> Result<Option<String>, DrawableError> {
        if inline_gradient(node, "android:strokeColor").is_some() {
            return Err(ParseError::Unsupported("gradient strokes".into()).into());
        }

        android_attr(node, "strokeColor")
            .map(|value| resolve_color(value, self.colors))
            .transpose()
    }

    fn read_gradient(&self, node: Node) -> Result<Fill, DrawableError> {
        let stops = self.read_stops(node)?;

        match android_attr(node, "type").unwrap_or("linear") {
            "linear" => Ok(Fill::LinearGradient {
                stops,
                start_x: float(node, "startX")?.unwrap_or(0.0),
                start_y: float(node, "startY")?.unwrap_or(0.0),
                end_x: float(node, "endX")?.unwrap_or(0.0),
                end_y: float(node, "endY")?.unwrap_or(0.0),
            }),
            "radial" => {
                let radius = float(node, "gradientRadius")?
                    .ok_or_else(|| missing(node, "gradientRadius"))?;
                if radius <= 0.0 {
                    return Err(ParseError::InvalidGradient(format!(
                        "radius must be positive, got {radius}"
                    ))
                    .into());
                }
                Ok(Fill::RadialGradient {
                    stops,
                    center_x: float(node, "centerX")?.unwrap_or(0.0),
                    center_y: float(node, "centerY")?.unwrap_or(0.0),
                    radius,
                })
            }
            "sweep" => Err(ParseError::Unsupported("sweep gradients".into()).into()),
            other => Err(invalid_value("type", other)),
        }
    }

    fn read_stops(&self, gradient: Node) -> Result<Vec<ColorStop>, DrawableError> {
        let items: Vec<Node> = gradient
            .children()
            .filter(|n| n.has_tag_name("item"))
            .collect();

        let mut stops = Vec::with_capacity(items.len().max(3));
        if items.is_empty() {
            for (attribute, offset) in [("startColor", 0.0), ("centerColor", 0.5), ("endColor", 1.0)] {
                if let Some(value) = android_attr(gradient, attribute) {
                    stops.push(ColorStop::new(offset, resolve_color(value, self.colors)?));
                }
            }
        } else {
            for item in items {
                let offset = float(item, "offset")?.ok_or_else(|| missing(item, "offset"))?;
                let color = android_attr(item, "color").ok_or_else(|| missing(item, "color"))?;
                stops.push(ColorStop::new(offset, resolve_color(color, self.colors)?));
            }
        }

        if stops.len() < 2 {
            return Err(ParseError::InvalidGradient(format!(
                "needs at least 2 color stops, found {}",
                stops.len()
            ))
            .into());
        }
        if let Some(stop) = stops.iter().find(|s| !(0.0..=1.0).contains(&s.offset)) {
            return Err(ParseError::InvalidGradient(format!(
                "stop offset {} is outside [0, 1]",
                stop.offset
            ))
            .into());
        }

        Ok(stops)
    }
}

fn android_attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((ANDROID_NS, name))
}

/// Find the `<gradient>` inside `<aapt:attr name="...">`.
fn inline_gradient<'a, 'i>(node: Node<'a, 'i>, attribute: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| {
            n.is_element()
                && n.tag_name().namespace() == Some(AAPT_NS)
                && n.tag_name().name() == "attr"
                && n.attribute("name") == Some(attribute)
        })
        .and_then(|attr| attr.children().find(|n| n.has_tag_name("gradient")))
}

fn float(node: Node, name: &str) -> Result<Option<f64>, ParseError> {
    android_attr(node, name)
        .map(|value| {
            value.trim().parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                attribute: name.to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}

/// Parse a dimension such as `24dp` or `1.5in`.
fn dimension(node: Node, name: &str) -> Result<Option<GraphicUnit>, DrawableError> {
    let Some(raw) = android_attr(node, name) else {
        return Ok(None);
    };
    let value = raw.trim();

    if value.starts_with('@') || value.starts_with('?') {
        return Err(ResolveError::UnsupportedReference {
            reference: value.to_string(),
        }
        .into());
    }

    let invalid = || ParseError::InvalidNumber {
        attribute: name.to_string(),
        value: raw.to_string(),
    };
    let (suffix, amount) = number(value).map_err(|_| invalid())?;
    let suffix = suffix.trim();
    let unit = if suffix.is_empty() {
        None
    } else {
        Some(DimensionUnit::from_suffix(suffix).ok_or_else(invalid)?)
    };

    Ok(Some(GraphicUnit::new(amount, unit)))
}

fn missing(node: Node, attribute: &str) -> ParseError {
    ParseError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: format!("android:{attribute}"),
    }
}

/// An opacity attribute, which must lie in [0, 1].
fn alpha(node: Node, name: &str) -> Result<Option<f64>, DrawableError> {
    match float(node, name)? {
        Some(alpha) if !(0.0..=1.0).contains(&alpha) => {
            Err(invalid_value(name, android_attr(node, name).unwrap_or_default()))
        }
        alpha => Ok(alpha),
    }
}

fn invalid_value(attribute: &str, value: &str) -> DrawableError {
    ParseError::InvalidValue {
        attribute: format!("android:{attribute}"),
        value: value.to_string(),
    }
    .into()
}
