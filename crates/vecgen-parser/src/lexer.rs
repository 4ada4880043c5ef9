//! Token-level parsers shared by the path data grammar and attribute parsing.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize, value},
    sequence::{pair, tuple},
    IResult,
};

/// Parse a number: optional sign, integer and/or fraction, optional exponent.
///
/// A second decimal point ends the number, so `"0.5.5"` yields `0.5` and
/// leaves `".5"`.
pub fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Parse a single arc flag character.
pub fn flag(input: &str) -> IResult<&str, bool> {
    map(one_of("01"), |c| c == '1')(input)
}

/// Skip whitespace with at most one comma.
pub fn comma_wsp(input: &str) -> IResult<&str, ()> {
    value((), tuple((multispace0, opt(char(',')), multispace0)))(input)
}

/// Whether `input` starts with something that can begin a number.
pub fn starts_number(input: &str) -> bool {
    matches!(
        input.chars().next(),
        Some(c) if c.is_ascii_digit() || c == '.' || c == '-' || c == '+'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_forms() {
        assert_eq!(number("12"), Ok(("", 12.0)));
        assert_eq!(number("-3.5,"), Ok((",", -3.5)));
        assert_eq!(number(".5"), Ok(("", 0.5)));
        assert_eq!(number("+2e3"), Ok(("", 2000.0)));
        assert_eq!(number("1.5E-1"), Ok(("", 0.15)));
        assert_eq!(number("7."), Ok(("", 7.0)));
    }

    #[test]
    fn test_number_stops_at_second_point_and_sign() {
        assert_eq!(number("0.5.5"), Ok((".5", 0.5)));
        assert_eq!(number("1-2"), Ok(("-2", 1.0)));
    }

    #[test]
    fn test_number_rejects_non_numbers() {
        assert!(number("abc").is_err());
        assert!(number("-").is_err());
        assert!(number(".").is_err());
    }

    #[test]
    fn test_exponent_needs_digits() {
        // A dangling exponent marker is left for the caller.
        assert_eq!(number("2e"), Ok(("e", 2.0)));
    }

    #[test]
    fn test_flag_and_separators() {
        assert_eq!(flag("01"), Ok(("1", false)));
        assert_eq!(flag("1 "), Ok((" ", true)));
        assert!(flag("2").is_err());
        assert_eq!(comma_wsp("  ,  5"), Ok(("5", ())));
        assert_eq!(comma_wsp("5"), Ok(("5", ())));
    }

    #[test]
    fn test_starts_number() {
        assert!(starts_number("-1"));
        assert!(starts_number(".5"));
        assert!(!starts_number("L1"));
        assert!(!starts_number(""));
    }
}
