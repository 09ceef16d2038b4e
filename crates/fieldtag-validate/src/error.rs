//! Error types: per-field causes, the aggregated error and its JSON envelope.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Cause of a single field failure.
///
/// Declaration errors (`InvalidTagSyntax`, `UnexportedFieldValidation`,
/// `UnsupportedKind`) describe a malformed or inapplicable tag. The remaining
/// variants are data failures: the value did not satisfy a well-formed rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The tag is not `rule:param`, names an unknown rule, or carries a param
    /// the rule cannot parse.
    #[error("invalid validator syntax")]
    InvalidTagSyntax,

    /// A tag was placed on a field that is not `pub`.
    #[error("validation for unexported field is not allowed")]
    UnexportedFieldValidation,

    /// The rule does not apply to the field's kind. `rule` is `None` when the
    /// field is a sequence whose element kind is neither string nor integer.
    #[error("{}", unsupported_message(.rule))]
    UnsupportedKind { rule: Option<&'static str> },

    #[error("length must be {expected}")]
    LengthMismatch { expected: i64 },

    #[error("value not in the allowed set")]
    NotInSet,

    #[error("length must be at least {min}")]
    TooShort { min: i64 },

    #[error("value must be at least {min}")]
    TooSmall { min: i64 },

    #[error("length must not exceed {max}")]
    TooLong { max: i64 },

    #[error("value must not exceed {max}")]
    TooLarge { max: i64 },

    /// Raised by `max` on strings: the upper bound also requires a non-empty value.
    #[error("value must be at least 1")]
    EmptyString,
}

fn unsupported_message(rule: &Option<&'static str>) -> String {
    match rule {
        Some(rule) => format!("unsupported type for {rule} validator"),
        None => "unsupported element type in slice".to_string(),
    }
}

impl ErrorKind {
    /// Stable machine-readable code for this cause.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidTagSyntax => "invalid_tag_syntax",
            ErrorKind::UnexportedFieldValidation => "unexported_field",
            ErrorKind::UnsupportedKind { .. } => "unsupported_kind",
            ErrorKind::LengthMismatch { .. } => "len",
            ErrorKind::NotInSet => "in",
            ErrorKind::TooShort { .. } | ErrorKind::TooSmall { .. } => "min",
            ErrorKind::TooLong { .. } | ErrorKind::TooLarge { .. } | ErrorKind::EmptyString => {
                "max"
            }
        }
    }

    /// Whether this cause points at the tag declaration rather than the data.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidTagSyntax
                | ErrorKind::UnexportedFieldValidation
                | ErrorKind::UnsupportedKind { .. }
        )
    }

    /// Causes rendered without their `path: ` prefix.
    fn renders_bare(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidTagSyntax | ErrorKind::UnexportedFieldValidation
        )
    }
}

/// One recorded violation tied to a field (or element) path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name, `name[index]` for a sequence element, or empty for a
    /// whole-sequence element-kind failure.
    pub path: String,
    /// What went wrong
    pub kind: ErrorKind,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create an error for element `index` of sequence field `field`.
    pub fn element(field: &str, index: usize, kind: ErrorKind) -> Self {
        Self::new(format!("{field}[{index}]"), kind)
    }

    /// Check whether this error carries the given cause.
    pub fn is(&self, kind: &ErrorKind) -> bool {
        &self.kind == kind
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.renders_bare() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Ordered collection of every field failure found in one validation pass.
///
/// Order is field declaration order, then element index order. The
/// collection is never handed out as an empty `Err`; see [`into_result`].
///
/// [`into_result`]: ValidationErrors::into_result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Append an error.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Append an error for `path`.
    pub fn add(&mut self, path: impl Into<String>, kind: ErrorKind) {
        self.push(FieldError::new(path, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Get every error recorded under `path`, in order.
    pub fn get(&self, path: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.path == path).collect()
    }

    /// Check whether any error carries the given cause.
    pub fn contains(&self, kind: &ErrorKind) -> bool {
        self.errors.iter().any(|e| e.is(kind))
    }

    /// Convert to Result - Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert to the JSON error envelope.
    pub fn to_api_error(&self) -> ApiValidationError {
        let fields = self
            .errors
            .iter()
            .map(|e| FieldErrorResponse {
                field: e.path.clone(),
                code: e.kind.code().to_string(),
                message: e.kind.to_string(),
            })
            .collect();

        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                fields,
            },
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_api_error().serialize(serializer)
    }
}

/// Error returned by [`validate`](crate::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// The value handed to `validate` is not a struct. Nothing was inspected.
    #[error("wrong argument given, should be a struct")]
    NotAStruct,

    /// One or more fields failed.
    #[error(transparent)]
    Fields(#[from] ValidationErrors),
}

impl ValidateError {
    /// Get the field errors, if the value was a struct.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidateError::NotAStruct => None,
            ValidateError::Fields(errors) => Some(errors),
        }
    }

    /// Check whether any field error carries the given cause.
    pub fn contains(&self, kind: &ErrorKind) -> bool {
        self.field_errors().is_some_and(|e| e.contains(kind))
    }
}

/// API response format for validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Error body in API response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// Single field error in API response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
}
