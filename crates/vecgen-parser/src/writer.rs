//! Serialization of the IR back to vector drawable XML.
//!
//! The SVG normalizer builds a `Vector` and hands it to the rest of the
//! pipeline through this writer, so the output must parse back to the same IR.

use std::fmt::Write;

use vecgen_core::{
    DimensionUnit, Fill, FillType, GraphicUnit, Group, Path, PathNode, StrokeCap, StrokeJoin,
    Vector, VectorNode,
};

use crate::drawable::{AAPT_NS, ANDROID_NS};

/// Format a number in its shortest round-trip form, treating -0 as 0.
fn num(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{}", n)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn dimension(unit: &GraphicUnit) -> String {
    let suffix = match unit.unit {
        None => "",
        Some(DimensionUnit::Dp) => "dp",
        Some(DimensionUnit::Px) => "px",
        Some(DimensionUnit::Pt) => "pt",
        Some(DimensionUnit::In) => "in",
        Some(DimensionUnit::Mm) => "mm",
    };
    format!("{}{}", num(unit.value), suffix)
}

/// Write path commands as path data, e.g. `M0 0L10 10Z`.
pub fn write_path_data(nodes: &[PathNode]) -> String {
    let mut d = String::new();

    for node in nodes {
        let operands: Vec<f64> = match *node {
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
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => vec![
                rx,
                ry,
                rotation,
                f64::from(u8::from(large_arc)),
                f64::from(u8::from(sweep)),
                x,
                y,
            ],
            PathNode::Close => Vec::new(),
        };

        d.push(node.command_letter());
        let operands: Vec<String> = operands.into_iter().map(num).collect();
        d.push_str(&operands.join(" "));
    }

    d
}

/// Write a complete `<vector>` document.
pub fn write_drawable(vector: &Vector) -> String {
    let mut xml = String::new();

    let _ = writeln!(
        xml,
        "<vector xmlns:android=\"{ANDROID_NS}\" xmlns:aapt=\"{AAPT_NS}\""
    );
    let _ = writeln!(
        xml,
        "    android:width=\"{}\" android:height=\"{}\"",
        dimension(&vector.width),
        dimension(&vector.height)
    );
    let _ = writeln!(
        xml,
        "    android:viewportWidth=\"{}\" android:viewportHeight=\"{}\">",
        num(vector.viewport_width),
        num(vector.viewport_height)
    );

    write_nodes(&mut xml, &vector.nodes, 1);
    xml.push_str("</vector>\n");
    xml
}

fn write_nodes(xml: &mut String, nodes: &[VectorNode], depth: usize) {
    for node in nodes {
        match node {
            VectorNode::Group(group) => write_group(xml, group, depth),
            VectorNode::Path(path) => write_path(xml, path, depth),
        }
    }
}

fn write_group(xml: &mut String, group: &Group, depth: usize) {
    let indent = "    ".repeat(depth);
    let t = &group.transform;

    xml.push_str(&indent);
    xml.push_str("<group");
    if let Some(name) = &group.name {
        let _ = write!(xml, " android:name=\"{}\"", escape(name));
    }
    for (attribute, value, default) in [
        ("rotation", t.rotation, 0.0),
        ("pivotX", t.pivot_x, 0.0),
        ("pivotY", t.pivot_y, 0.0),
        ("scaleX", t.scale_x, 1.0),
        ("scaleY", t.scale_y, 1.0),
        ("translateX", t.translation_x, 0.0),
        ("translateY", t.translation_y, 0.0),
    ] {
        if value != default {
            let _ = write!(xml, " android:{attribute}=\"{}\"", num(value));
        }
    }
    xml.push_str(">\n");

    write_nodes(xml, &group.children, depth + 1);

    xml.push_str(&indent);
    xml.push_str("</group>\n");
}

fn write_path(xml: &mut String, path: &Path, depth: usize) {
    let indent = "    ".repeat(depth);

    xml.push_str(&indent);
    xml.push_str("<path");
    if let Some(name) = &path.name {
        let _ = write!(xml, " android:name=\"{}\"", escape(name));
    }
    let _ = write!(
        xml,
        " android:pathData=\"{}\"",
        write_path_data(&path.nodes)
    );

    if let Some(Fill::Color(color)) = &path.fill {
        let _ = write!(xml, " android:fillColor=\"#{color}\"");
    }
    if path.fill_alpha != 1.0 {
        let _ = write!(xml, " android:fillAlpha=\"{}\"", num(path.fill_alpha));
    }
    if let Some(color) = &path.stroke_color {
        let _ = write!(xml, " android:strokeColor=\"#{color}\"");
    }
    if path.stroke_alpha != 1.0 {
        let _ = write!(xml, " android:strokeAlpha=\"{}\"", num(path.stroke_alpha));
    }
    if let Some(width) = &path.stroke_line_width {
        let _ = write!(xml, " android:strokeWidth=\"{}\"", num(width.value));
    }
    match path.stroke_line_cap {
        StrokeCap::Butt => {}
        StrokeCap::Round => xml.push_str(" android:strokeLineCap=\"round\""),
        StrokeCap::Square => xml.push_str(" android:strokeLineCap=\"square\""),
    }
    match path.stroke_line_join {
        StrokeJoin::Miter => {}
        StrokeJoin::Round => xml.push_str(" android:strokeLineJoin=\"round\""),
        StrokeJoin::Bevel => xml.push_str(" android:strokeLineJoin=\"bevel\""),
    }
    if path.stroke_line_miter != Path::DEFAULT_MITER {
        let _ = write!(
            xml,
            " android:strokeMiterLimit=\"{}\"",
            num(path.stroke_line_miter)
        );
    }
    if path.fill_type == FillType::EvenOdd {
        xml.push_str(" android:fillType=\"evenOdd\"");
    }

    match &path.fill {
        Some(gradient @ (Fill::LinearGradient { .. } | Fill::RadialGradient { .. })) => {
            xml.push_str(">\n");
            write_gradient(xml, gradient, depth + 1);
            xml.push_str(&indent);
            xml.push_str("</path>\n");
        }
        _ => xml.push_str("/>\n"),
    }
}

fn write_gradient(xml: &mut String, fill: &Fill, depth: usize) {
    let indent = "    ".repeat(depth);

    xml.push_str(&indent);
    xml.push_str("<aapt:attr name=\"android:fillColor\">\n");
    xml.push_str(&indent);
    xml.push_str("    <gradient");
    match *fill {
        Fill::LinearGradient {
            start_x,
            start_y,
            end_x,
            end_y,
            ..
        } => {
            let _ = write!(
                xml,
                " android:type=\"linear\" android:startX=\"{}\" android:startY=\"{}\" android:endX=\"{}\" android:endY=\"{}\"",
                num(start_x),
                num(start_y),
                num(end_x),
                num(end_y)
            );
        }
        Fill::RadialGradient {
            center_x,
            center_y,
            radius,
            ..
        } => {
            let _ = write!(
                xml,
                " android:type=\"radial\" android:centerX=\"{}\" android:centerY=\"{}\" android:gradientRadius=\"{}\"",
                num(center_x),
                num(center_y),
                num(radius)
            );
        }
        Fill::Color(_) => {}
    }
    xml.push_str(">\n");

    for stop in fill.stops() {
        xml.push_str(&indent);
        let _ = writeln!(
            xml,
            "        <item android:offset=\"{}\" android:color=\"#{}\"/>",
            num(stop.offset),
            stop.color
        );
    }

    xml.push_str(&indent);
    xml.push_str("    </gradient>\n");
    xml.push_str(&indent);
    xml.push_str("</aapt:attr>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_drawable, parse_path_data};
    use vecgen_core::{ColorStop, Transform};

    #[test]
    fn test_path_data_round_trip() {
        let data = "M1.5 -2L3 4h5V-6c1 2 3 4 5 6S7 8 9 10q1 1 2 2t3 3a5 5 30 1 0 9 9z";
        let nodes = parse_path_data(data).unwrap();
        let written = write_path_data(&nodes);
        assert_eq!(parse_path_data(&written).unwrap(), nodes);
    }

    #[test]
    fn test_negative_zero_is_written_as_zero() {
        let nodes = vec![PathNode::MoveTo {
            relative: false,
            x: -0.0,
            y: 0.25,
        }];
        assert_eq!(write_path_data(&nodes), "M0 0.25");
    }

    #[test]
    fn test_drawable_round_trip() {
        let mut stroked = Path::new(parse_path_data("M0,0L24,24").unwrap());
        stroked.name = Some("a \"quoted\" <name>".into());
        stroked.stroke_color = Some("FF112233".into());
        stroked.stroke_line_width = Some(GraphicUnit::unitless(1.5));
        stroked.stroke_line_cap = StrokeCap::Square;
        stroked.stroke_line_join = StrokeJoin::Round;
        stroked.stroke_line_miter = 2.0;
        stroked.fill_alpha = 0.5;

        let mut gradient = Path::new(parse_path_data("M0,0h24v24h-24z").unwrap());
        gradient.fill = Some(Fill::RadialGradient {
            stops: vec![
                ColorStop::new(0.0, "FFFF0000"),
                ColorStop::new(0.3, "8000FF00"),
                ColorStop::new(1.0, "FF0000FF"),
            ],
            center_x: 12.0,
            center_y: 12.0,
            radius: 10.0,
        });
        gradient.fill_type = FillType::EvenOdd;

        let vector = Vector {
            width: GraphicUnit::dp(48.0),
            height: GraphicUnit::new(0.5, Some(DimensionUnit::In)),
            viewport_width: 24.0,
            viewport_height: 24.0,
            nodes: vec![
                VectorNode::Path(stroked),
                VectorNode::Group(Group {
                    name: Some("g".into()),
                    transform: Transform {
                        rotation: -90.0,
                        pivot_x: 12.0,
                        pivot_y: 12.0,
                        ..Default::default()
                    },
                    children: vec![VectorNode::Path(gradient)],
                }),
            ],
        };

        let xml = write_drawable(&vector);
        assert_eq!(parse_drawable(&xml).unwrap(), vector);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = f64> {
            -1000.0..1000.0f64
        }

        fn color() -> impl Strategy<Value = String> {
            "[0-9A-F]{8}"
        }

        fn segment() -> impl Strategy<Value = PathNode> {
            prop_oneof![
                (any::<bool>(), coord(), coord())
                    .prop_map(|(relative, x, y)| PathNode::LineTo { relative, x, y }),
                (any::<bool>(), coord())
                    .prop_map(|(relative, x)| PathNode::HorizontalLineTo { relative, x }),
                (any::<bool>(), coord())
                    .prop_map(|(relative, y)| PathNode::VerticalLineTo { relative, y }),
                (any::<bool>(), prop::array::uniform6(coord())).prop_map(|(relative, c)| {
                    PathNode::CurveTo {
                        relative,
                        x1: c[0],
                        y1: c[1],
                        x2: c[2],
                        y2: c[3],
                        x3: c[4],
                        y3: c[5],
                    }
                }),
                (any::<bool>(), prop::array::uniform4(coord())).prop_map(|(relative, c)| {
                    PathNode::SmoothCurveTo {
                        relative,
                        x2: c[0],
                        y2: c[1],
                        x3: c[2],
                        y3: c[3],
                    }
                }),
                (any::<bool>(), prop::array::uniform4(coord())).prop_map(|(relative, c)| {
                    PathNode::QuadTo {
                        relative,
                        x1: c[0],
                        y1: c[1],
                        x2: c[2],
                        y2: c[3],
                    }
                }),
                (any::<bool>(), coord(), coord())
                    .prop_map(|(relative, x, y)| PathNode::SmoothQuadTo { relative, x, y }),
                (
                    any::<bool>(),
                    0.0..100.0f64,
                    0.0..100.0f64,
                    -360.0..360.0f64,
                    any::<(bool, bool)>(),
                    coord(),
                    coord(),
                )
                    .prop_map(|(relative, rx, ry, rotation, (large_arc, sweep), x, y)| {
                        PathNode::ArcTo {
                            relative,
                            rx,
                            ry,
                            rotation,
                            large_arc,
                            sweep,
                            x,
                            y,
                        }
                    }),
                Just(PathNode::Close),
            ]
        }

        fn nodes() -> impl Strategy<Value = Vec<PathNode>> {
            (
                any::<bool>(),
                coord(),
                coord(),
                prop::collection::vec(segment(), 0..12),
            )
                .prop_map(|(relative, x, y, rest)| {
                    let mut nodes = vec![PathNode::MoveTo { relative, x, y }];
                    nodes.extend(rest);
                    nodes
                })
        }

        fn stops() -> impl Strategy<Value = Vec<ColorStop>> {
            prop::collection::vec((0.0..=1.0f64, color()), 2..5).prop_map(|stops| {
                stops
                    .into_iter()
                    .map(|(offset, color)| ColorStop::new(offset, color))
                    .collect()
            })
        }

        fn fill() -> impl Strategy<Value = Option<Fill>> {
            prop_oneof![
                Just(None),
                color().prop_map(|c| Some(Fill::Color(c))),
                (stops(), prop::array::uniform4(coord())).prop_map(|(stops, c)| {
                    Some(Fill::LinearGradient {
                        stops,
                        start_x: c[0],
                        start_y: c[1],
                        end_x: c[2],
                        end_y: c[3],
                    })
                }),
                (stops(), coord(), coord(), 0.1..100.0f64).prop_map(
                    |(stops, center_x, center_y, radius)| {
                        Some(Fill::RadialGradient {
                            stops,
                            center_x,
                            center_y,
                            radius,
                        })
                    }
                ),
            ]
        }

        fn path() -> impl Strategy<Value = Path> {
            (
                nodes(),
                prop::option::of("[a-z_]{1,8}"),
                fill(),
                0.0..=1.0f64,
                prop::option::of((color(), 0.0..=1.0f64, 0.1..10.0f64)),
                prop_oneof![Just(StrokeCap::Butt), Just(StrokeCap::Round), Just(StrokeCap::Square)],
                prop_oneof![Just(StrokeJoin::Miter), Just(StrokeJoin::Round), Just(StrokeJoin::Bevel)],
                1.0..10.0f64,
                any::<bool>(),
            )
                .prop_map(
                    |(nodes, name, fill, fill_alpha, stroke, cap, join, miter, even_odd)| {
                        let mut path = Path::new(nodes);
                        path.name = name;
                        path.fill = fill;
                        path.fill_alpha = fill_alpha;
                        if let Some((color, alpha, width)) = stroke {
                            path.stroke_color = Some(color);
                            path.stroke_alpha = alpha;
                            path.stroke_line_width = Some(GraphicUnit::unitless(width));
                        }
                        path.stroke_line_cap = cap;
                        path.stroke_line_join = join;
                        path.stroke_line_miter = miter;
                        if even_odd {
                            path.fill_type = FillType::EvenOdd;
                        }
                        path
                    },
                )
        }

        fn node() -> impl Strategy<Value = VectorNode> {
            prop_oneof![
                3 => path().prop_map(VectorNode::Path),
                1 => (
                    prop::collection::vec(path(), 1..3),
                    prop::array::uniform3(coord()),
                    0.1..4.0f64,
                )
                    .prop_map(|(paths, [rotation, tx, ty], scale)| {
                        VectorNode::Group(Group {
                            name: None,
                            transform: Transform {
                                rotation,
                                scale_x: scale,
                                translation_x: tx,
                                translation_y: ty,
                                ..Default::default()
                            },
                            children: paths.into_iter().map(VectorNode::Path).collect(),
                        })
                    }),
            ]
        }

        fn vector() -> impl Strategy<Value = Vector> {
            (
                1.0..512.0f64,
                1.0..512.0f64,
                prop::collection::vec(node(), 1..4),
            )
                .prop_map(|(width, height, nodes)| Vector {
                    width: GraphicUnit::dp(width),
                    height: GraphicUnit::dp(height),
                    viewport_width: width,
                    viewport_height: height,
                    nodes,
                })
        }

        proptest! {
            #[test]
            fn path_data_parses_back(nodes in nodes()) {
                let written = write_path_data(&nodes);
                prop_assert_eq!(parse_path_data(&written).unwrap(), nodes);
            }

            #[test]
            fn drawable_parses_back(vector in vector()) {
                let xml = write_drawable(&vector);
                prop_assert_eq!(parse_drawable(&xml).unwrap(), vector, "{}", xml);
            }
        }
    }
}
