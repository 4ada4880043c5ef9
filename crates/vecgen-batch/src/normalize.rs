//! SVG to vector drawable normalization.
//!
//! `usvg` resolves styles, shapes, `use` references and transforms into plain
//! paths; those are flattened into a [`Vector`] with absolute coordinates and
//! written out as a vector drawable for the regular parsing pipeline.

use std::path::{Path, PathBuf};

use glam::{DAffine2, DVec2};
use usvg::tiny_skia_path::PathSegment;
use vecgen_core::{
    ColorStop, Fill, FillType, GraphicUnit, PathNode, Result, StrokeCap, StrokeJoin, VecgenError,
    Vector, VectorNode,
};
use vecgen_parser::write_drawable;

/// Converts an SVG file to a vector drawable file.
pub trait SvgNormalizer {
    /// Write the drawable equivalent of `svg` into `out_dir` and return its path.
    fn normalize(&self, svg: &Path, out_dir: &Path) -> Result<PathBuf>;
}

/// [`SvgNormalizer`] backed by `usvg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsvgNormalizer;

impl UsvgNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve SVG text into the vector IR.
    pub fn to_vector(&self, svg: &str) -> std::result::Result<Vector, usvg::Error> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg, &options)?;

        let size = tree.size();
        let width = f64::from(size.width());
        let height = f64::from(size.height());

        let mut nodes = Vec::new();
        collect(tree.root(), &mut nodes);

        Ok(Vector {
            width: GraphicUnit::dp(width),
            height: GraphicUnit::dp(height),
            viewport_width: width,
            viewport_height: height,
            nodes,
        })
    }
}

impl SvgNormalizer for UsvgNormalizer {
    fn normalize(&self, svg: &Path, out_dir: &Path) -> Result<PathBuf> {
        let text = std::fs::read_to_string(svg).map_err(|e| VecgenError::io(svg, e))?;
        let vector = self.to_vector(&text).map_err(|e| VecgenError::Normalize {
            path: svg.to_path_buf(),
            message: e.to_string(),
        })?;

        let stem = svg
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "drawable".to_string());
        let out = out_dir.join(format!("{stem}.xml"));
        std::fs::write(&out, write_drawable(&vector)).map_err(|e| VecgenError::io(&out, e))?;

        log::debug!(
            "normalized {} ({} paths)",
            svg.display(),
            vector.path_count()
        );
        Ok(out)
    }
}

fn collect(group: &usvg::Group, out: &mut Vec<VectorNode>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect(g, out),
            usvg::Node::Path(path) => {
                if path.is_visible() {
                    if let Some(path) = convert_path(path) {
                        out.push(VectorNode::Path(path));
                    }
                }
            }
            usvg::Node::Image(_) => log::warn!("skipping embedded image"),
            usvg::Node::Text(_) => log::warn!("skipping text, convert it to outlines first"),
        }
    }
}

fn affine(ts: usvg::Transform) -> DAffine2 {
    DAffine2::from_cols_array(&[
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ])
}

/// Mean scale factor of a transform, for lengths such as stroke widths.
fn scale_of(m: &DAffine2) -> f64 {
    m.matrix2.determinant().abs().sqrt()
}

fn convert_path(path: &usvg::Path) -> Option<vecgen_core::Path> {
    let matrix = affine(path.abs_transform());
    let map = |p: usvg::tiny_skia_path::Point| {
        matrix.transform_point2(DVec2::new(f64::from(p.x), f64::from(p.y)))
    };

    let nodes: Vec<PathNode> = path
        .data()
        .segments()
        .map(|segment| match segment {
            PathSegment::MoveTo(p) => {
                let p = map(p);
                PathNode::MoveTo {
                    relative: false,
                    x: p.x,
                    y: p.y,
                }
            }
            PathSegment::LineTo(p) => {
                let p = map(p);
                PathNode::LineTo {
                    relative: false,
                    x: p.x,
                    y: p.y,
                }
            }
            PathSegment::QuadTo(c, p) => {
                let (c, p) = (map(c), map(p));
                PathNode::QuadTo {
                    relative: false,
                    x1: c.x,
                    y1: c.y,
                    x2: p.x,
                    y2: p.y,
                }
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let (c1, c2, p) = (map(c1), map(c2), map(p));
                PathNode::CurveTo {
                    relative: false,
                    x1: c1.x,
                    y1: c1.y,
                    x2: c2.x,
                    y2: c2.y,
                    x3: p.x,
                    y3: p.y,
                }
            }
            PathSegment::Close => PathNode::Close,
        })
        .collect();

    if nodes.is_empty() {
        return None;
    }

    let mut out = vecgen_core::Path::new(nodes);
    if !path.id().is_empty() {
        out.name = Some(path.id().to_string());
    }

    if let Some(fill) = path.fill() {
        out.fill = paint(fill.paint(), &matrix);
        out.fill_alpha = f64::from(fill.opacity().get());
        out.fill_type = match fill.rule() {
            usvg::FillRule::NonZero => FillType::NonZero,
            usvg::FillRule::EvenOdd => FillType::EvenOdd,
        };
    }

    if let Some(stroke) = path.stroke() {
        out.stroke_color = match paint(stroke.paint(), &matrix) {
            Some(Fill::Color(color)) => Some(color),
            Some(gradient) => {
                log::warn!("gradient stroke flattened to its first stop color");
                gradient.stops().first().map(|stop| stop.color.clone())
            }
            None => None,
        };
        out.stroke_alpha = f64::from(stroke.opacity().get());
        out.stroke_line_width = Some(GraphicUnit::unitless(
            f64::from(stroke.width().get()) * scale_of(&matrix),
        ));
        out.stroke_line_cap = match stroke.linecap() {
            usvg::LineCap::Butt => StrokeCap::Butt,
            usvg::LineCap::Round => StrokeCap::Round,
            usvg::LineCap::Square => StrokeCap::Square,
        };
        out.stroke_line_join = match stroke.linejoin() {
            usvg::LineJoin::Miter | usvg::LineJoin::MiterClip => StrokeJoin::Miter,
            usvg::LineJoin::Round => StrokeJoin::Round,
            usvg::LineJoin::Bevel => StrokeJoin::Bevel,
        };
        out.stroke_line_miter = f64::from(stroke.miterlimit().get());
    }

    Some(out)
}

fn hex(color: usvg::Color, opacity: f32) -> String {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "{:02X}{:02X}{:02X}{:02X}",
        alpha, color.red, color.green, color.blue
    )
}

fn stops(stops: &[usvg::Stop]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|stop| {
            ColorStop::new(
                f64::from(stop.offset().get()),
                hex(stop.color(), stop.opacity().get()),
            )
        })
        .collect()
}

fn paint(paint: &usvg::Paint, matrix: &DAffine2) -> Option<Fill> {
    let fill = match paint {
        usvg::Paint::Color(color) => Fill::Color(hex(*color, 1.0)),
        usvg::Paint::LinearGradient(gradient) => {
            let m = *matrix * affine(gradient.transform());
            let start = m.transform_point2(DVec2::new(
                f64::from(gradient.x1()),
                f64::from(gradient.y1()),
            ));
            let end = m.transform_point2(DVec2::new(
                f64::from(gradient.x2()),
                f64::from(gradient.y2()),
            ));
            Fill::LinearGradient {
                stops: stops(gradient.stops()),
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
            }
        }
        usvg::Paint::RadialGradient(gradient) => {
            let m = *matrix * affine(gradient.transform());
            let center = m.transform_point2(DVec2::new(
                f64::from(gradient.cx()),
                f64::from(gradient.cy()),
            ));
            Fill::RadialGradient {
                stops: stops(gradient.stops()),
                center_x: center.x,
                center_y: center.y,
                radius: f64::from(gradient.r().get()) * scale_of(&m),
            }
        }
        usvg::Paint::Pattern(_) => {
            log::warn!("pattern paint is not supported, leaving the path unpainted");
            return None;
        }
    };

    // A gradient that cannot carry two stops degrades to its only color.
    match fill {
        Fill::LinearGradient { ref stops, .. } | Fill::RadialGradient { ref stops, .. }
            if stops.len() < 2 =>
        {
            stops.first().map(|stop| Fill::Color(stop.color.clone()))
        }
        fill => Some(fill),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecgen_parser::parse_drawable;

    fn svg(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">{body}</svg>"#
        )
    }

    #[test]
    fn test_solid_rect() {
        let vector = UsvgNormalizer::new()
            .to_vector(&svg(r#"<rect x="2" y="2" width="20" height="20" fill="red"/>"#))
            .unwrap();

        assert_eq!(vector.viewport_width, 24.0);
        let paths = vector.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].fill, Some(Fill::Color("FFFF0000".into())));
        assert_eq!(
            paths[0].nodes.first(),
            Some(&PathNode::MoveTo {
                relative: false,
                x: 2.0,
                y: 2.0
            })
        );
        assert_eq!(paths[0].nodes.last(), Some(&PathNode::Close));
    }

    #[test]
    fn test_group_transform_is_flattened() {
        let vector = UsvgNormalizer::new()
            .to_vector(&svg(
                r#"<g transform="translate(10,0)"><rect x="0" y="0" width="4" height="4"/></g>"#,
            ))
            .unwrap();

        assert_eq!(
            vector.paths()[0].nodes[0],
            PathNode::MoveTo {
                relative: false,
                x: 10.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn test_linear_gradient_stop_order() {
        let vector = UsvgNormalizer::new()
            .to_vector(&svg(
                r##"<defs><linearGradient id="g" x1="0" y1="0" x2="24" y2="0" gradientUnits="userSpaceOnUse">
                    <stop offset="0" stop-color="#f00"/><stop offset="1" stop-color="#00f"/>
                </linearGradient></defs>
                <rect width="24" height="24" fill="url(#g)"/>"##,
            ))
            .unwrap();

        let Some(Fill::LinearGradient { stops, end_x, .. }) = &vector.paths()[0].fill else {
            panic!("expected linear gradient");
        };
        assert_eq!(stops[0], ColorStop::new(0.0, "FFFF0000"));
        assert_eq!(stops[1], ColorStop::new(1.0, "FF0000FF"));
        assert_eq!(*end_x, 24.0);
    }

    #[test]
    fn test_stroke() {
        let vector = UsvgNormalizer::new()
            .to_vector(&svg(
                r##"<path d="M2 12H22" stroke="#000" stroke-width="2" stroke-linecap="round" fill="none"/>"##,
            ))
            .unwrap();

        let path = vector.paths()[0];
        assert_eq!(path.fill, None);
        assert_eq!(path.stroke_color.as_deref(), Some("FF000000"));
        assert_eq!(path.stroke_line_width, Some(GraphicUnit::unitless(2.0)));
        assert_eq!(path.stroke_line_cap, StrokeCap::Round);
    }

    #[test]
    fn test_normalize_writes_parseable_drawable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("heart.svg");
        std::fs::write(
            &input,
            svg(r##"<path d="M12 21l-1-1C5 15 2 12 2 8a5 5 0 0 1 10-2z" fill="#e91e63"/>"##),
        )
        .unwrap();
        let out_dir = tempfile::tempdir().unwrap();

        let out = UsvgNormalizer::new()
            .normalize(&input, out_dir.path())
            .unwrap();
        assert_eq!(out, out_dir.path().join("heart.xml"));

        let xml = std::fs::read_to_string(&out).unwrap();
        let vector = parse_drawable(&xml).unwrap();
        assert_eq!(vector.path_count(), 1);
        assert_eq!(
            vector.paths()[0].fill,
            Some(Fill::Color("FFE91E63".into()))
        );
    }

    #[test]
    fn test_malformed_svg() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.svg");
        std::fs::write(&input, "<svg").unwrap();

        let err = UsvgNormalizer::new()
            .normalize(&input, dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), vecgen_core::ErrorKind::MalformedVector);
    }
}
