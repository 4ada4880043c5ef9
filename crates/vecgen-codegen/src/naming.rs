//! Identifiers for generated symbols.
//!
//! Every function here is total: any input, including an empty string or a
//! name made only of symbols, maps to a usable identifier.

use std::collections::HashSet;

use convert_case::{Boundary, Case, Converter};

/// Identifier used when nothing usable is left of the raw name.
pub const UNNAMED: &str = "_Unnamed";

/// Kotlin hard keywords, which cannot appear as package segments.
const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Convert a file or icon name to an UpperCamelCase identifier.
///
/// `ic_arrow-back.svg` becomes `IcArrowBack`.
pub fn to_identifier(raw: &str) -> String {
    to_identifier_with(raw, &[])
}

/// Like [`to_identifier`], escaping any result found in `reserved`.
pub fn to_identifier_with(raw: &str, reserved: &[&str]) -> String {
    let stem = strip_extension(file_name(raw.trim()));

    let words: Vec<&str> = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return UNNAMED.to_string();
    }

    let name = Converter::new()
        .set_boundaries(&[
            Boundary::Underscore,
            Boundary::Hyphen,
            Boundary::Space,
            Boundary::LowerUpper,
        ])
        .to_case(Case::Pascal)
        .convert(words.join(" "));

    if name.is_empty() {
        UNNAMED.to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) || reserved.contains(&name.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Lowercase package or directory segment for a group name.
pub fn package_segment(name: &str) -> String {
    let segment: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if segment.is_empty() {
        "_unnamed".to_string()
    } else if segment.starts_with(|c: char| c.is_ascii_digit())
        || KOTLIN_KEYWORDS.contains(&segment.as_str())
    {
        format!("_{segment}")
    } else {
        segment
    }
}

/// Whether `name` can be declared as-is: a letter or `_` followed by letters,
/// digits or `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Hands out distinct names within one group.
///
/// The first request for a name gets it unchanged; later requests get `2`,
/// `3`, ... appended, in the order they are made.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let mut suffix = 2usize;
        loop {
            let candidate = format!("{name}{suffix}");
            if self.taken.insert(candidate.clone()) {
                log::debug!("renamed duplicate '{name}' to '{candidate}'");
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

fn file_name(raw: &str) -> &str {
    raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw)
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_identifier("ic_arrow_back.svg"), "IcArrowBack");
        assert_eq!(to_identifier("arrow-forward.xml"), "ArrowForward");
        assert_eq!(to_identifier("shopping cart"), "ShoppingCart");
        assert_eq!(to_identifier("addCircle"), "AddCircle");
        assert_eq!(to_identifier("icons/sub/star.svg"), "Star");
        assert_eq!(to_identifier("Add"), "Add");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(to_identifier("24px_home.svg"), "_24pxHome");
        assert_eq!(to_identifier(""), UNNAMED);
        assert_eq!(to_identifier("!!!.svg"), UNNAMED);
        assert_eq!(to_identifier(".svg"), "Svg");
        assert_eq!(to_identifier_with("path.svg", &["Path", "Shape"]), "_Path");
    }

    #[test]
    fn test_name_allocator_suffixes() {
        let mut names = NameAllocator::new();
        let allocated: Vec<String> = ["Add", "Add", "Remove", "Add"]
            .iter()
            .map(|n| names.allocate(n))
            .collect();
        assert_eq!(allocated, vec!["Add", "Add2", "Remove", "Add3"]);
        assert!(names.contains("Add2"));
    }

    #[test]
    fn test_allocator_skips_taken_suffix() {
        let mut names = NameAllocator::new();
        assert_eq!(names.allocate("Add2"), "Add2");
        assert_eq!(names.allocate("Add"), "Add");
        assert_eq!(names.allocate("Add"), "Add3");
    }

    #[test]
    fn test_package_segment() {
        assert_eq!(package_segment("Sub"), "sub");
        assert_eq!(package_segment("MyIcons2"), "myicons2");
        assert_eq!(package_segment("Object"), "_object");
        assert_eq!(package_segment("3d"), "_3d");
        assert_eq!(package_segment("---"), "_unnamed");
    }

    proptest! {
        #[test]
        fn identifier_is_deterministic(raw in ".*") {
            prop_assert_eq!(to_identifier(&raw), to_identifier(&raw));
        }

        #[test]
        fn identifier_is_always_valid(raw in ".*") {
            let name = to_identifier(&raw);
            prop_assert!(is_identifier(&name), "{:?} -> {:?}", raw, name);
        }

        #[test]
        fn reserved_words_are_never_returned(raw in "[a-z_ -]{0,12}") {
            let reserved = ["Path", "Shape", "Color"];
            let name = to_identifier_with(&raw, &reserved);
            prop_assert!(!reserved.contains(&name.as_str()));
        }

        #[test]
        fn allocator_never_repeats(names in prop::collection::vec("[A-C][0-9]?", 0..24)) {
            let mut allocator = NameAllocator::new();
            let mut seen = HashSet::new();
            for name in &names {
                prop_assert!(seen.insert(allocator.allocate(name)));
            }
        }
    }
}
