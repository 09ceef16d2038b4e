//! Parser for the `rule:param` tag grammar.

use crate::error::ErrorKind;

/// Key under which field tags are declared: `#[validate("min:3")]`.
pub const TAG_KEY: &str = "validate";

/// A parsed validation tag.
///
/// Splits on the first `:` only; the param keeps any further `:` or `,`
/// verbatim, with no trimming or unescaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub rule: &'a str,
    pub param: &'a str,
}

impl<'a> Tag<'a> {
    /// Parse a raw, non-empty tag.
    ///
    /// An empty tag means "no validation" and must be filtered out by the
    /// caller; handed in here it fails like any tag lacking a separator.
    pub fn parse(raw: &'a str) -> Result<Self, ErrorKind> {
        raw.split_once(':')
            .map(|(rule, param)| Tag { rule, param })
            .ok_or(ErrorKind::InvalidTagSyntax)
    }
}
