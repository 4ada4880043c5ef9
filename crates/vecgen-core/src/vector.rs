//! Vector graphic IR.
//!
//! A [`Vector`] is built fresh for every input file by the drawable parser and
//! consumed by exactly one emitter call.

use glam::{DAffine2, DVec2};

/// A parsed vector graphic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub width: GraphicUnit,
    pub height: GraphicUnit,
    /// Width of the coordinate space path commands are expressed in.
    pub viewport_width: f64,
    /// Height of the coordinate space path commands are expressed in.
    pub viewport_height: f64,
    /// Root-level nodes in render order.
    pub nodes: Vec<VectorNode>,
}

impl Vector {
    /// Iterate over every path in the graphic, depth-first, in render order.
    pub fn paths(&self) -> Vec<&Path> {
        fn collect<'a>(nodes: &'a [VectorNode], out: &mut Vec<&'a Path>) {
            for node in nodes {
                match node {
                    VectorNode::Group(group) => collect(&group.children, out),
                    VectorNode::Path(path) => out.push(path),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    pub fn path_count(&self) -> usize {
        self.paths().len()
    }
}

/// A size, optionally tagged with the unit it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphicUnit {
    pub value: f64,
    pub unit: Option<DimensionUnit>,
}

impl GraphicUnit {
    pub fn new(value: f64, unit: Option<DimensionUnit>) -> Self {
        Self { value, unit }
    }

    pub fn dp(value: f64) -> Self {
        Self::new(value, Some(DimensionUnit::Dp))
    }

    pub fn unitless(value: f64) -> Self {
        Self::new(value, None)
    }

    /// Convert to density independent pixels at the baseline density.
    ///
    /// Unitless values are taken as dp.
    pub fn to_dp(&self) -> f64 {
        match self.unit {
            None | Some(DimensionUnit::Dp) | Some(DimensionUnit::Px) => self.value,
            Some(DimensionUnit::Pt) => self.value * 160.0 / 72.0,
            Some(DimensionUnit::In) => self.value * 160.0,
            Some(DimensionUnit::Mm) => self.value * 160.0 / 25.4,
        }
    }
}

/// Units accepted for vector drawable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionUnit {
    Dp,
    Px,
    Pt,
    In,
    Mm,
}

impl DimensionUnit {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "dp" | "dip" => Some(Self::Dp),
            "px" => Some(Self::Px),
            "pt" => Some(Self::Pt),
            "in" => Some(Self::In),
            "mm" => Some(Self::Mm),
            _ => None,
        }
    }
}

/// A node of the vector tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VectorNode {
    Group(Group),
    Path(Path),
}

/// A named, transformed container of child nodes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub name: Option<String>,
    pub transform: Transform,
    pub children: Vec<VectorNode>,
}

/// Group transform parameters, applied around the pivot point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Rotation in degrees.
    pub rotation: f64,
    pub pivot_x: f64,
    pub pivot_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub translation_x: f64,
    pub translation_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            translation_x: 0.0,
            translation_y: 0.0,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Local-to-parent matrix: translate(-pivot), scale, rotate, then
    /// translate(pivot + translation).
    pub fn matrix(&self) -> DAffine2 {
        let pivot = DVec2::new(self.pivot_x, self.pivot_y);
        let translation = DVec2::new(self.translation_x, self.translation_y);

        DAffine2::from_translation(pivot + translation)
            * DAffine2::from_angle(self.rotation.to_radians())
            * DAffine2::from_scale(DVec2::new(self.scale_x, self.scale_y))
            * DAffine2::from_translation(-pivot)
    }
}

/// A drawable path with its styling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub name: Option<String>,
    pub nodes: Vec<PathNode>,
    /// `None` means transparent.
    pub fill: Option<Fill>,
    pub fill_alpha: f64,
    /// Stroke color as `AARRGGBB` hex.
    pub stroke_color: Option<String>,
    pub stroke_alpha: f64,
    pub stroke_line_width: Option<GraphicUnit>,
    pub stroke_line_cap: StrokeCap,
    pub stroke_line_join: StrokeJoin,
    pub stroke_line_miter: f64,
    pub fill_type: FillType,
}

impl Path {
    pub const DEFAULT_MITER: f64 = 4.0;

    pub fn new(nodes: Vec<PathNode>) -> Self {
        Self {
            name: None,
            nodes,
            fill: None,
            fill_alpha: 1.0,
            stroke_color: None,
            stroke_alpha: 1.0,
            stroke_line_width: None,
            stroke_line_cap: StrokeCap::default(),
            stroke_line_join: StrokeJoin::default(),
            stroke_line_miter: Self::DEFAULT_MITER,
            fill_type: FillType::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillType {
    #[default]
    NonZero,
    EvenOdd,
}

/// How a path's interior is painted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fill {
    /// Solid color as `AARRGGBB` hex.
    Color(String),
    LinearGradient {
        stops: Vec<ColorStop>,
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
    },
    RadialGradient {
        stops: Vec<ColorStop>,
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
}

impl Fill {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Fill::Color(_) => &[],
            Fill::LinearGradient { stops, .. } | Fill::RadialGradient { stops, .. } => stops,
        }
    }
}

/// A gradient color stop. `offset` is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorStop {
    pub offset: f64,
    /// `AARRGGBB` hex.
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// A single path drawing command.
///
/// `relative` commands are expressed relative to the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathNode {
    MoveTo {
        relative: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        relative: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        relative: bool,
        x: f64,
    },
    VerticalLineTo {
        relative: bool,
        y: f64,
    },
    CurveTo {
        relative: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    SmoothCurveTo {
        relative: bool,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    QuadTo {
        relative: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    SmoothQuadTo {
        relative: bool,
        x: f64,
        y: f64,
    },
    ArcTo {
        relative: bool,
        rx: f64,
        ry: f64,
        /// X axis rotation in degrees.
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathNode {
    pub fn is_relative(&self) -> bool {
        match *self {
            PathNode::MoveTo { relative, .. }
            | PathNode::LineTo { relative, .. }
            | PathNode::HorizontalLineTo { relative, .. }
            | PathNode::VerticalLineTo { relative, .. }
            | PathNode::CurveTo { relative, .. }
            | PathNode::SmoothCurveTo { relative, .. }
            | PathNode::QuadTo { relative, .. }
            | PathNode::SmoothQuadTo { relative, .. }
            | PathNode::ArcTo { relative, .. } => relative,
            PathNode::Close => false,
        }
    }

    /// The path-data letter for this command, lowercase when relative.
    pub fn command_letter(&self) -> char {
        let letter = match self {
            PathNode::MoveTo { .. } => 'M',
            PathNode::LineTo { .. } => 'L',
            PathNode::HorizontalLineTo { .. } => 'H',
            PathNode::VerticalLineTo { .. } => 'V',
            PathNode::CurveTo { .. } => 'C',
            PathNode::SmoothCurveTo { .. } => 'S',
            PathNode::QuadTo { .. } => 'Q',
            PathNode::SmoothQuadTo { .. } => 'T',
            PathNode::ArcTo { .. } => 'A',
            PathNode::Close => 'Z',
        };

        if self.is_relative() {
            letter.to_ascii_lowercase()
        } else {
            letter
        }
    }
}
