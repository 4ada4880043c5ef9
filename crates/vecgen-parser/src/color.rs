//! Color literal parsing and resource reference resolution.

use vecgen_core::{DrawableError, ParseError, ResolveError};

use crate::resources::ColorTable;

/// Nesting limit for `@color/a -> @color/b -> ...` chains.
const MAX_REFERENCE_DEPTH: usize = 8;

/// Parse a `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB` literal into uppercase
/// `AARRGGBB` hex.
pub fn parse_color_literal(value: &str) -> Result<String, ParseError> {
    let invalid = || ParseError::InvalidColor {
        value: value.to_string(),
    };

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let hex = hex.to_ascii_uppercase();
    let expanded = match hex.len() {
        3 => format!("FF{}", double_digits(&hex)),
        4 => double_digits(&hex),
        6 => format!("FF{hex}"),
        8 => hex,
        _ => return Err(invalid()),
    };

    Ok(expanded)
}

fn double_digits(hex: &str) -> String {
    hex.chars().flat_map(|c| [c, c]).collect()
}

/// Resolve an attribute color value: a literal, a framework color, or a
/// `@color/` reference looked up in `colors`.
pub fn resolve_color(value: &str, colors: &ColorTable) -> Result<String, DrawableError> {
    resolve_at_depth(value.trim(), colors, 0)
}

fn resolve_at_depth(value: &str, colors: &ColorTable, depth: usize) -> Result<String, DrawableError> {
    if value.starts_with('#') {
        return Ok(parse_color_literal(value)?);
    }

    if value.starts_with('?') {
        return Err(ResolveError::ThemeAttribute {
            reference: value.to_string(),
        }
        .into());
    }

    if let Some(name) = value.strip_prefix("@android:color/") {
        return framework_color(name).map(str::to_string).ok_or_else(|| {
            ResolveError::UndefinedColor {
                reference: value.to_string(),
            }
            .into()
        });
    }

    if let Some(name) = value.strip_prefix("@color/") {
        let target = colors.get(name).ok_or_else(|| ResolveError::UndefinedColor {
            reference: value.to_string(),
        })?;
        if depth >= MAX_REFERENCE_DEPTH {
            return Err(ResolveError::UnsupportedReference {
                reference: value.to_string(),
            }
            .into());
        }
        return resolve_at_depth(target, colors, depth + 1);
    }

    if value.starts_with('@') {
        return Err(ResolveError::UnsupportedReference {
            reference: value.to_string(),
        }
        .into());
    }

    Err(ParseError::InvalidColor {
        value: value.to_string(),
    }
    .into())
}

fn framework_color(name: &str) -> Option<&'static str> {
    match name {
        "black" => Some("FF000000"),
        "white" => Some("FFFFFFFF"),
        "transparent" => Some("00000000"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_forms() {
        assert_eq!(parse_color_literal("#f00").unwrap(), "FFFF0000");
        assert_eq!(parse_color_literal("#8f00").unwrap(), "88FF0000");
        assert_eq!(parse_color_literal("#00ff00").unwrap(), "FF00FF00");
        assert_eq!(parse_color_literal("#800000ff").unwrap(), "800000FF");
    }

    #[test]
    fn test_invalid_literals() {
        for bad in ["f00", "#12", "#12345", "#GG0000", "#"] {
            assert!(parse_color_literal(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_resource_reference() {
        let table = ColorTable::from_iter([
            ("brand".to_string(), "@color/red".to_string()),
            ("red".to_string(), "#FF0000".to_string()),
        ]);
        assert_eq!(resolve_color("@color/brand", &table).unwrap(), "FFFF0000");
        assert_eq!(
            resolve_color("@android:color/white", &table).unwrap(),
            "FFFFFFFF"
        );
    }

    #[test]
    fn test_unresolvable_references() {
        let table = ColorTable::default();
        assert!(matches!(
            resolve_color("@color/missing", &table),
            Err(DrawableError::Resolve(ResolveError::UndefinedColor { .. }))
        ));
        assert!(matches!(
            resolve_color("?attr/colorPrimary", &table),
            Err(DrawableError::Resolve(ResolveError::ThemeAttribute { .. }))
        ));
        assert!(matches!(
            resolve_color("@drawable/thing", &table),
            Err(DrawableError::Resolve(ResolveError::UnsupportedReference { .. }))
        ));
    }

    #[test]
    fn test_reference_cycle_terminates() {
        let table = ColorTable::from_iter([
            ("a".to_string(), "@color/b".to_string()),
            ("b".to_string(), "@color/a".to_string()),
        ]);
        assert!(matches!(
            resolve_color("@color/a", &table),
            Err(DrawableError::Resolve(ResolveError::UnsupportedReference { .. }))
        ));
    }
}
