//! Builtin rule evaluators.
//!
//! Each evaluator parses its param before looking at the value, so a bad
//! param reports `InvalidTagSyntax` even on an unsupported kind. String
//! lengths are byte lengths.

use crate::error::ErrorKind;
use crate::reflect::FieldValue;

fn parse_int(param: &str) -> Result<i64, ErrorKind> {
    param.parse().map_err(|_| ErrorKind::InvalidTagSyntax)
}

fn byte_len(value: &str) -> i64 {
    i64::try_from(value.len()).unwrap_or(i64::MAX)
}

/// `len:N` - string length must equal `N`.
pub fn len(value: &FieldValue<'_>, param: &str) -> Result<(), ErrorKind> {
    let expected = parse_int(param)?;

    match value {
        FieldValue::Str(s) if byte_len(s) != expected => {
            Err(ErrorKind::LengthMismatch { expected })
        }
        FieldValue::Str(_) => Ok(()),
        _ => Err(ErrorKind::UnsupportedKind { rule: Some("len") }),
    }
}

/// `in:a,b,c` - value must equal one of the comma-separated entries.
///
/// For integers the entries are parsed in order until one matches; an
/// unparsable entry reached before a match is a syntax error.
pub fn in_set(value: &FieldValue<'_>, param: &str) -> Result<(), ErrorKind> {
    if param.is_empty() {
        return Err(ErrorKind::InvalidTagSyntax);
    }
    let mut allowed = param.split(',');

    match value {
        FieldValue::Str(s) => {
            if allowed.any(|entry| entry == *s) {
                return Ok(());
            }
        }
        FieldValue::Int(v) => {
            for entry in allowed {
                if parse_int(entry)? == *v {
                    return Ok(());
                }
            }
        }
        _ => return Err(ErrorKind::UnsupportedKind { rule: Some("in") }),
    }

    Err(ErrorKind::NotInSet)
}

/// `min:N` - string length or integer value must be at least `N`.
pub fn min(value: &FieldValue<'_>, param: &str) -> Result<(), ErrorKind> {
    let min = parse_int(param)?;

    match value {
        FieldValue::Str(s) if byte_len(s) < min => Err(ErrorKind::TooShort { min }),
        FieldValue::Int(v) if *v < min => Err(ErrorKind::TooSmall { min }),
        FieldValue::Str(_) | FieldValue::Int(_) => Ok(()),
        _ => Err(ErrorKind::UnsupportedKind { rule: Some("min") }),
    }
}

/// `max:N` - string length or integer value must not exceed `N`.
///
/// Strings must also be non-empty.
pub fn max(value: &FieldValue<'_>, param: &str) -> Result<(), ErrorKind> {
    let max = parse_int(param)?;

    match value {
        FieldValue::Str(s) if byte_len(s) > max => Err(ErrorKind::TooLong { max }),
        FieldValue::Str(s) if s.is_empty() => Err(ErrorKind::EmptyString),
        FieldValue::Int(v) if *v > max => Err(ErrorKind::TooLarge { max }),
        FieldValue::Str(_) | FieldValue::Int(_) => Ok(()),
        _ => Err(ErrorKind::UnsupportedKind { rule: Some("max") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> FieldValue<'_> {
        FieldValue::Str(value)
    }

    #[test]
    fn len_matches_exact_length() {
        assert!(len(&s("abcde"), "5").is_ok());
        assert_eq!(
            len(&s("abcd"), "5"),
            Err(ErrorKind::LengthMismatch { expected: 5 })
        );
        assert_eq!(
            len(&s("abcdef"), "5"),
            Err(ErrorKind::LengthMismatch { expected: 5 })
        );
    }

    #[test]
    fn len_counts_bytes() {
        assert!(len(&s("é"), "2").is_ok());
    }

    #[test]
    fn len_rejects_bad_param_before_kind() {
        assert_eq!(len(&s("abc"), "three"), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(len(&FieldValue::Int(3), "x"), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(
            len(&FieldValue::Int(3), "3"),
            Err(ErrorKind::UnsupportedKind { rule: Some("len") })
        );
    }

    #[test]
    fn in_set_for_strings() {
        assert!(in_set(&s("b"), "a,b,c").is_ok());
        assert_eq!(in_set(&s("d"), "a,b,c"), Err(ErrorKind::NotInSet));
        assert_eq!(in_set(&s("b"), "a, b"), Err(ErrorKind::NotInSet));
        assert!(in_set(&s(""), "a,,b").is_ok());
    }

    #[test]
    fn in_set_empty_param_is_syntax_error() {
        assert_eq!(in_set(&s("a"), ""), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(in_set(&FieldValue::Int(1), ""), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(in_set(&FieldValue::Other, ""), Err(ErrorKind::InvalidTagSyntax));
    }

    #[test]
    fn in_set_for_integers() {
        assert!(in_set(&FieldValue::Int(200), "200,404,500").is_ok());
        assert!(in_set(&FieldValue::Int(-1), "-1,0").is_ok());
        assert_eq!(
            in_set(&FieldValue::Int(201), "200,404,500"),
            Err(ErrorKind::NotInSet)
        );
    }

    #[test]
    fn in_set_integer_entries_parse_lazily() {
        assert!(in_set(&FieldValue::Int(1), "1,x").is_ok());
        assert_eq!(
            in_set(&FieldValue::Int(2), "1,x"),
            Err(ErrorKind::InvalidTagSyntax)
        );
        assert_eq!(
            in_set(&FieldValue::Int(2), "a,b"),
            Err(ErrorKind::InvalidTagSyntax)
        );
    }

    #[test]
    fn in_set_unsupported_kind() {
        assert_eq!(
            in_set(&FieldValue::Other, "a"),
            Err(ErrorKind::UnsupportedKind { rule: Some("in") })
        );
    }

    #[test]
    fn min_bounds_length_and_value() {
        assert!(min(&s("abc"), "3").is_ok());
        assert_eq!(min(&s("ab"), "3"), Err(ErrorKind::TooShort { min: 3 }));
        assert!(min(&s(""), "0").is_ok());
        assert!(min(&FieldValue::Int(0), "0").is_ok());
        assert_eq!(
            min(&FieldValue::Int(-1), "0"),
            Err(ErrorKind::TooSmall { min: 0 })
        );
        assert!(min(&FieldValue::Int(5), "-10").is_ok());
    }

    #[test]
    fn min_rejects_non_numeric_param() {
        assert_eq!(min(&FieldValue::Int(5), ""), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(min(&FieldValue::Int(5), " 3"), Err(ErrorKind::InvalidTagSyntax));
        assert_eq!(
            min(&FieldValue::Int(5), "2,max:5"),
            Err(ErrorKind::InvalidTagSyntax)
        );
    }

    #[test]
    fn max_bounds_length_and_value() {
        assert!(max(&s("abcde"), "5").is_ok());
        assert_eq!(max(&s("abcdef"), "5"), Err(ErrorKind::TooLong { max: 5 }));
        assert!(max(&FieldValue::Int(120), "120").is_ok());
        assert_eq!(
            max(&FieldValue::Int(121), "120"),
            Err(ErrorKind::TooLarge { max: 120 })
        );
    }

    #[test]
    fn max_requires_non_empty_string() {
        assert_eq!(max(&s(""), "5"), Err(ErrorKind::EmptyString));
        assert_eq!(max(&s(""), "0"), Err(ErrorKind::EmptyString));
        assert!(max(&FieldValue::Int(0), "5").is_ok());
    }

    #[test]
    fn min_and_max_reject_other_kinds() {
        assert_eq!(
            min(&FieldValue::Other, "1"),
            Err(ErrorKind::UnsupportedKind { rule: Some("min") })
        );
        let seq = FieldValue::Seq {
            elem: crate::reflect::Kind::Int,
            items: vec![FieldValue::Int(1)],
        };
        assert_eq!(
            max(&seq, "1"),
            Err(ErrorKind::UnsupportedKind { rule: Some("max") })
        );
    }
}
