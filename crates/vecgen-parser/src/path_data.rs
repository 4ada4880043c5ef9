//! Path data grammar.
//!
//! A command letter is followed by one or more operand groups. Extra groups
//! repeat the command, except that extra `M`/`m` groups become `L`/`l`.

use smallvec::SmallVec;
use vecgen_core::{ParseError, PathNode};

use crate::lexer::{comma_wsp, flag, number, starts_number};

/// Parse a path data string into drawing commands.
pub fn parse_path_data(data: &str) -> Result<Vec<PathNode>, ParseError> {
    PathDataParser::new(data).parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    QuadTo,
    SmoothQuadTo,
    ArcTo,
    Close,
}

impl Command {
    fn from_letter(letter: char) -> Option<Self> {
        let command = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo,
            'L' => Self::LineTo,
            'H' => Self::HorizontalLineTo,
            'V' => Self::VerticalLineTo,
            'C' => Self::CurveTo,
            'S' => Self::SmoothCurveTo,
            'Q' => Self::QuadTo,
            'T' => Self::SmoothQuadTo,
            'A' => Self::ArcTo,
            'Z' => Self::Close,
            _ => return None,
        };
        Some(command)
    }

    fn arity(self) -> usize {
        match self {
            Self::Close => 0,
            Self::HorizontalLineTo | Self::VerticalLineTo => 1,
            Self::MoveTo | Self::LineTo | Self::SmoothQuadTo => 2,
            Self::SmoothCurveTo | Self::QuadTo => 4,
            Self::CurveTo => 6,
            Self::ArcTo => 7,
        }
    }

    /// Operand positions that hold a single-character flag.
    fn is_flag(self, index: usize) -> bool {
        self == Self::ArcTo && (index == 3 || index == 4)
    }

    fn build(self, relative: bool, a: &[f64]) -> PathNode {
        match self {
            Self::MoveTo => PathNode::MoveTo {
                relative,
                x: a[0],
                y: a[1],
            },
            Self::LineTo => PathNode::LineTo {
                relative,
                x: a[0],
                y: a[1],
            },
            Self::HorizontalLineTo => PathNode::HorizontalLineTo { relative, x: a[0] },
            Self::VerticalLineTo => PathNode::VerticalLineTo { relative, y: a[0] },
            Self::CurveTo => PathNode::CurveTo {
                relative,
                x1: a[0],
                y1: a[1],
                x2: a[2],
                y2: a[3],
                x3: a[4],
                y3: a[5],
            },
            Self::SmoothCurveTo => PathNode::SmoothCurveTo {
                relative,
                x2: a[0],
                y2: a[1],
                x3: a[2],
                y3: a[3],
            },
            Self::QuadTo => PathNode::QuadTo {
                relative,
                x1: a[0],
                y1: a[1],
                x2: a[2],
                y2: a[3],
            },
            Self::SmoothQuadTo => PathNode::SmoothQuadTo {
                relative,
                x: a[0],
                y: a[1],
            },
            Self::ArcTo => PathNode::ArcTo {
                relative,
                rx: a[0],
                ry: a[1],
                rotation: a[2],
                large_arc: a[3] != 0.0,
                sweep: a[4] != 0.0,
                x: a[5],
                y: a[6],
            },
            Self::Close => PathNode::Close,
        }
    }
}

/// Stateful parser that tracks the unconsumed remainder of the input.
struct PathDataParser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> PathDataParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn skip_separators(&mut self) {
        if let Ok((rest, ())) = comma_wsp(self.rest) {
            self.rest = rest;
        }
    }

    fn parse(mut self) -> Result<Vec<PathNode>, ParseError> {
        let mut nodes = Vec::new();

        self.skip_whitespace();
        while let Some(letter) = self.rest.chars().next() {
            let offset = self.offset();

            if !letter.is_alphabetic() {
                return Err(ParseError::UnexpectedPathData {
                    found: self.rest.chars().take(12).collect(),
                    offset,
                });
            }

            let command =
                Command::from_letter(letter).ok_or(ParseError::UnknownCommand {
                    command: letter,
                    offset,
                })?;
            self.rest = &self.rest[letter.len_utf8()..];

            self.parse_command(command, letter, offset, &mut nodes)?;
            self.skip_whitespace();
        }

        Ok(nodes)
    }

    fn parse_command(
        &mut self,
        command: Command,
        letter: char,
        offset: usize,
        nodes: &mut Vec<PathNode>,
    ) -> Result<(), ParseError> {
        let relative = letter.is_ascii_lowercase();

        if command == Command::Close {
            nodes.push(PathNode::Close);
            return Ok(());
        }

        self.skip_whitespace();
        let operands = self.operands(command, letter, offset)?;
        nodes.push(command.build(relative, &operands));

        let repeated = match command {
            Command::MoveTo => Command::LineTo,
            other => other,
        };

        loop {
            self.skip_separators();
            if !starts_number(self.rest) {
                break;
            }
            let operands = self.operands(command, letter, self.offset())?;
            nodes.push(repeated.build(relative, &operands));
        }

        Ok(())
    }

    fn operands(
        &mut self,
        command: Command,
        letter: char,
        offset: usize,
    ) -> Result<SmallVec<[f64; 7]>, ParseError> {
        let missing = ParseError::MissingOperands {
            command: letter,
            offset,
        };
        let mut operands = SmallVec::new();

        for index in 0..command.arity() {
            if index > 0 {
                self.skip_separators();
            }

            let value = if command.is_flag(index) {
                flag(self.rest).map(|(rest, f)| (rest, if f { 1.0 } else { 0.0 }))
            } else {
                number(self.rest)
            };

            match value {
                Ok((rest, v)) => {
                    self.rest = rest;
                    operands.push(v);
                }
                Err(_) => return Err(missing),
            }
        }

        Ok(operands)
    }
}
