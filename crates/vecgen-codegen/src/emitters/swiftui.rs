//! SwiftUI `Shape` generator.
//!
//! Path commands are replayed into absolute coordinates and written as
//! `Path` calls scaled to the drawing rectangle. Styling is partial: only a
//! single shared solid fill reaches the preview, everything else is drawn
//! unstyled.

use std::f64::consts::FRAC_PI_2;

use glam::{DAffine2, DVec2};
use vecgen_core::{Fill, PathNode, Vector, VectorNode};

use super::{
    check_finite, check_symbol, literal, EmitOptions, GeneratedFile, GroupContext, GroupSummary,
    SourceEmitter,
};
use crate::error::Result;

const RESERVED: &[&str] = &[
    "Self", "Type", "Protocol", "Any", "Path", "Shape", "Color", "CGRect", "CGPoint", "View",
];

const SWIFT_KEYWORDS: &[&str] = &[
    "as", "break", "case", "catch", "class", "continue", "default", "defer", "do", "else",
    "enum", "extension", "fallthrough", "false", "for", "func", "guard", "if", "import", "in",
    "init", "inout", "internal", "is", "let", "nil", "operator", "private", "protocol", "public",
    "repeat", "return", "self", "static", "struct", "subscript", "super", "switch", "throw",
    "throws", "true", "try", "var", "where", "while",
];

/// SwiftUI code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftUiEmitter;

impl SwiftUiEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceEmitter for SwiftUiEmitter {
    fn backend_name(&self) -> &'static str {
        "SwiftUI"
    }

    fn file_extension(&self) -> &'static str {
        "swift"
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
        check_symbol(symbol, "Swift")?;
        check_finite(vector)?;

        let viewport = DVec2::new(vector.viewport_width, vector.viewport_height);
        let mut lines = vec!["import SwiftUI".to_string(), String::new()];

        lines.push(format!("struct {symbol}: Shape {{"));
        lines.push("    func path(in rect: CGRect) -> Path {".to_string());
        lines.push("        var path = Path()".to_string());
        lines.push("        let width = rect.size.width".to_string());
        lines.push("        let height = rect.size.height".to_string());
        for segment in segments(&vector.nodes) {
            lines.push(format!("        {}", statement(&segment, viewport)));
        }
        lines.push("        return path".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());

        if options.generate_preview {
            lines.push(String::new());
            lines.extend(preview(vector, symbol));
        }
        lines.push(String::new());

        Ok(GeneratedFile {
            path: group.directory().join(format!("{symbol}.{}", self.file_extension())),
            content: lines.join("\n"),
        })
    }

    fn emit_group(&self, summary: &GroupSummary, options: &EmitOptions) -> Result<GeneratedFile> {
        let context = &summary.context;
        let name = context.name();
        check_symbol(name, "Swift")?;

        let all_assets = member_name(&options.all_assets_property_name);
        let (indent, opening, closing) = match context.parent() {
            Some(parent) => (
                "        ",
                vec![
                    format!("extension {} {{", parent.names().join(".")),
                    format!("    enum {name} {{"),
                ],
                vec!["    }".to_string(), "}".to_string()],
            ),
            None => ("    ", vec![format!("enum {name} {{")], vec!["}".to_string()]),
        };

        let mut lines = vec!["import SwiftUI".to_string(), String::new()];
        lines.extend(opening);

        let mut members = Vec::new();
        for icon in &summary.icons {
            let member = member_name(icon);
            lines.push(format!("{indent}static let {member} = {icon}()"));
            members.push(member);
        }
        if !summary.icons.is_empty() {
            lines.push(String::new());
        }

        let mut parts = Vec::new();
        if !members.is_empty() {
            parts.push(format!("[{}]", members.join(", ")));
        }
        for child in &summary.children {
            parts.push(format!("{child}.{all_assets}"));
        }
        let assets = if parts.is_empty() {
            "[]".to_string()
        } else {
            parts.join(" + ")
        };

        lines.push(format!("{indent}static var {all_assets}: [any Shape] {{"));
        lines.push(format!("{indent}    {assets}"));
        lines.push(format!("{indent}}}"));
        lines.extend(closing);
        lines.push(String::new());

        Ok(GeneratedFile {
            path: context
                .directory()
                .join(format!(
                    "{name}+{}.{}",
                    options.all_assets_property_name,
                    self.file_extension()
                )),
            content: lines.join("\n"),
        })
    }
}

/// A drawing call in absolute viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Move(DVec2),
    Line(DVec2),
    Quad { ctrl: DVec2, to: DVec2 },
    Cubic { ctrl1: DVec2, ctrl2: DVec2, to: DVec2 },
    Close,
}

impl Segment {
    fn transformed(self, m: &DAffine2) -> Self {
        let t = |p: DVec2| m.transform_point2(p);
        match self {
            Segment::Move(p) => Segment::Move(t(p)),
            Segment::Line(p) => Segment::Line(t(p)),
            Segment::Quad { ctrl, to } => Segment::Quad {
                ctrl: t(ctrl),
                to: t(to),
            },
            Segment::Cubic { ctrl1, ctrl2, to } => Segment::Cubic {
                ctrl1: t(ctrl1),
                ctrl2: t(ctrl2),
                to: t(to),
            },
            Segment::Close => Segment::Close,
        }
    }
}

/// Replay every path of the tree, applying the enclosing group transforms.
fn segments(nodes: &[VectorNode]) -> Vec<Segment> {
    fn walk(nodes: &[VectorNode], matrix: DAffine2, out: &mut Vec<Segment>) {
        for node in nodes {
            match node {
                VectorNode::Group(group) => {
                    walk(&group.children, matrix * group.transform.matrix(), out)
                }
                VectorNode::Path(path) => {
                    let mut replay = Replay::default();
                    for command in &path.nodes {
                        replay.apply(command, &mut |s| out.push(s.transformed(&matrix)));
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, DAffine2::IDENTITY, &mut out);
    out
}

/// Current-point state while resolving relative and smooth commands.
#[derive(Debug, Default)]
struct Replay {
    current: DVec2,
    start: DVec2,
    last_cubic_ctrl: Option<DVec2>,
    last_quad_ctrl: Option<DVec2>,
}

impl Replay {
    fn apply(&mut self, node: &PathNode, emit: &mut impl FnMut(Segment)) {
        let cur = self.current;
        let resolve = |relative: bool, x: f64, y: f64| {
            if relative {
                cur + DVec2::new(x, y)
            } else {
                DVec2::new(x, y)
            }
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match *node {
            PathNode::MoveTo { relative, x, y } => {
                let to = resolve(relative, x, y);
                self.start = to;
                self.current = to;
                emit(Segment::Move(to));
            }
            PathNode::LineTo { relative, x, y } => {
                self.line(resolve(relative, x, y), emit);
            }
            PathNode::HorizontalLineTo { relative, x } => {
                let x = if relative { cur.x + x } else { x };
                self.line(DVec2::new(x, cur.y), emit);
            }
            PathNode::VerticalLineTo { relative, y } => {
                let y = if relative { cur.y + y } else { y };
                self.line(DVec2::new(cur.x, y), emit);
            }
            PathNode::CurveTo {
                relative,
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => {
                let ctrl2 = resolve(relative, x2, y2);
                self.cubic(resolve(relative, x1, y1), ctrl2, resolve(relative, x3, y3), emit);
                cubic_ctrl = Some(ctrl2);
            }
            PathNode::SmoothCurveTo {
                relative,
                x2,
                y2,
                x3,
                y3,
            } => {
                let ctrl1 = self.last_cubic_ctrl.map_or(cur, |c| cur * 2.0 - c);
                let ctrl2 = resolve(relative, x2, y2);
                self.cubic(ctrl1, ctrl2, resolve(relative, x3, y3), emit);
                cubic_ctrl = Some(ctrl2);
            }
            PathNode::QuadTo {
                relative,
                x1,
                y1,
                x2,
                y2,
            } => {
                let ctrl = resolve(relative, x1, y1);
                self.quad(ctrl, resolve(relative, x2, y2), emit);
                quad_ctrl = Some(ctrl);
            }
            PathNode::SmoothQuadTo { relative, x, y } => {
                let ctrl = self.last_quad_ctrl.map_or(cur, |c| cur * 2.0 - c);
                self.quad(ctrl, resolve(relative, x, y), emit);
                quad_ctrl = Some(ctrl);
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
            } => {
                let to = resolve(relative, x, y);
                for segment in arc_to_cubics(cur, rx, ry, rotation, large_arc, sweep, to) {
                    emit(segment);
                }
                self.current = to;
            }
            PathNode::Close => {
                self.current = self.start;
                emit(Segment::Close);
            }
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
    }

    fn line(&mut self, to: DVec2, emit: &mut impl FnMut(Segment)) {
        self.current = to;
        emit(Segment::Line(to));
    }

    fn quad(&mut self, ctrl: DVec2, to: DVec2, emit: &mut impl FnMut(Segment)) {
        self.current = to;
        emit(Segment::Quad { ctrl, to });
    }

    fn cubic(&mut self, ctrl1: DVec2, ctrl2: DVec2, to: DVec2, emit: &mut impl FnMut(Segment)) {
        self.current = to;
        emit(Segment::Cubic { ctrl1, ctrl2, to });
    }
}

/// Approximate an elliptical arc with cubic Béziers of at most 90° each,
/// using the center parameterization of the SVG implementation notes.
fn arc_to_cubics(
    from: DVec2,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: DVec2,
) -> Vec<Segment> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        return vec![Segment::Line(to)];
    }

    let phi = rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let half = (from - to) / 2.0;
    let p = DVec2::new(
        cos_phi * half.x + sin_phi * half.y,
        -sin_phi * half.x + cos_phi * half.y,
    );

    // Scale up radii that cannot span the endpoints.
    let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * p.y * p.y - ry2 * p.x * p.x;
    let den = rx2 * p.y * p.y + ry2 * p.x * p.x;
    let coef = if den == 0.0 {
        0.0
    } else {
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        sign * (num / den).max(0.0).sqrt()
    };
    let center_p = DVec2::new(coef * rx * p.y / ry, -coef * ry * p.x / rx);
    let center = DVec2::new(
        cos_phi * center_p.x - sin_phi * center_p.y,
        sin_phi * center_p.x + cos_phi * center_p.y,
    ) + (from + to) / 2.0;

    let angle = |u: DVec2, v: DVec2| u.perp_dot(v).atan2(u.dot(v));
    let u = DVec2::new((p.x - center_p.x) / rx, (p.y - center_p.y) / ry);
    let v = DVec2::new((-p.x - center_p.x) / rx, (-p.y - center_p.y) / ry);

    let mut theta = angle(DVec2::X, u);
    let mut delta = angle(u, v);
    if !sweep && delta > 0.0 {
        delta -= 2.0 * std::f64::consts::PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * std::f64::consts::PI;
    }

    let count = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / count as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let map = |unit: DVec2| {
        let scaled = DVec2::new(unit.x * rx, unit.y * ry);
        DVec2::new(
            cos_phi * scaled.x - sin_phi * scaled.y,
            sin_phi * scaled.x + cos_phi * scaled.y,
        ) + center
    };

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let (s1, c1) = theta.sin_cos();
        let (s2, c2) = (theta + step).sin_cos();

        let ctrl1 = map(DVec2::new(c1 - k * s1, s1 + k * c1));
        let ctrl2 = map(DVec2::new(c2 + k * s2, s2 - k * c2));
        // Pin the last endpoint to avoid accumulated drift.
        let end = if i + 1 == count {
            to
        } else {
            map(DVec2::new(c2, s2))
        };

        out.push(Segment::Cubic {
            ctrl1,
            ctrl2,
            to: end,
        });
        theta += step;
    }
    out
}

fn point(p: DVec2, viewport: DVec2) -> String {
    format!(
        "CGPoint(x: rect.minX + {} * width, y: rect.minY + {} * height)",
        literal(p.x / viewport.x),
        literal(p.y / viewport.y)
    )
}

fn statement(segment: &Segment, viewport: DVec2) -> String {
    match *segment {
        Segment::Move(to) => format!("path.move(to: {})", point(to, viewport)),
        Segment::Line(to) => format!("path.addLine(to: {})", point(to, viewport)),
        Segment::Quad { ctrl, to } => format!(
            "path.addQuadCurve(to: {}, control: {})",
            point(to, viewport),
            point(ctrl, viewport)
        ),
        Segment::Cubic { ctrl1, ctrl2, to } => format!(
            "path.addCurve(to: {}, control1: {}, control2: {})",
            point(to, viewport),
            point(ctrl1, viewport),
            point(ctrl2, viewport)
        ),
        Segment::Close => "path.closeSubpath()".to_string(),
    }
}

fn preview(vector: &Vector, symbol: &str) -> Vec<String> {
    let mut lines = vec![
        "#if DEBUG".to_string(),
        format!("struct {symbol}_Previews: PreviewProvider {{"),
        "    static var previews: some View {".to_string(),
        format!("        {symbol}()"),
    ];

    match shared_fill(vector) {
        Some((color, alpha)) => lines.push(format!("            .fill({})", swift_color(&color, alpha))),
        None => log::debug!("{symbol}: no single solid fill, preview is unstyled"),
    }

    lines.push(format!(
        "            .frame(width: {}, height: {})",
        literal(vector.width.to_dp()),
        literal(vector.height.to_dp())
    ));
    lines.push("            .padding(12)".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("#endif".to_string());
    lines
}

/// The solid fill and alpha used by every path, if they all agree.
fn shared_fill(vector: &Vector) -> Option<(String, f64)> {
    let mut shared: Option<(String, f64)> = None;

    for path in vector.paths() {
        let Some(Fill::Color(color)) = &path.fill else {
            return None;
        };
        match &shared {
            None => shared = Some((color.clone(), path.fill_alpha)),
            Some((c, a)) if c == color && *a == path.fill_alpha => {}
            Some(_) => return None,
        }
    }

    shared
}

/// `Color(red:green:blue:opacity:)` for an `AARRGGBB` hex string.
fn swift_color(hex: &str, alpha: f64) -> String {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map_or(0.0, |v| f64::from(v) / 255.0)
    };

    format!(
        "Color(red: {}, green: {}, blue: {}, opacity: {})",
        literal(channel(2)),
        literal(channel(4)),
        literal(channel(6)),
        literal(channel(0) * alpha)
    )
}

/// lowerCamel member name, backquoted when it is a keyword.
fn member_name(name: &str) -> String {
    let mut chars = name.chars();
    let lowered = match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => String::new(),
    };

    if SWIFT_KEYWORDS.contains(&lowered.as_str()) {
        format!("`{lowered}`")
    } else {
        lowered
    }
}
