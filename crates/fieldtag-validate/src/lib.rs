//! # fieldtag
//!
//! Tag-driven struct validation. Each field that wants checking carries one
//! tag of the form `rule:param`; [`validate`] walks the struct's fields in
//! declaration order, runs the named rule and collects every failure into a
//! single [`ValidationErrors`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use fieldtag_validate::{Reflect, Validate};
//!
//! #[derive(Reflect)]
//! pub struct CreateUser {
//!     #[validate("min:3")]
//!     pub username: String,
//!
//!     #[validate("in:admin,member")]
//!     pub role: String,
//!
//!     #[validate("min:18")]
//!     pub age: i32,
//!
//!     #[validate("len:2")]
//!     pub languages: Vec<String>,
//! }
//! ```
//!
//! ## Rules
//!
//! - `len:N` - string length equals `N`
//! - `in:a,b,c` - value is one of the listed strings or integers
//! - `min:N` - string length or integer value is at least `N`
//! - `max:N` - string length or integer value is at most `N`; strings must
//!   also be non-empty
//!
//! ## Error Format
//!
//! `ValidationErrors` renders as `"; "`-joined failures. Data failures are
//! prefixed with their path (`Age: value must be at least 18`); tag syntax
//! and unexported-field errors are rendered bare. Serialized, it uses the
//! JSON envelope:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "Validation failed",
//!     "fields": [
//!       {"field": "Age", "code": "min", "message": "value must be at least 18"}
//!     ]
//!   }
//! }
//! ```

#[macro_use]
mod tracing_macros;

mod error;
mod reflect;
pub mod rules;
mod string;
mod tag;
mod validate;


pub use error::{
    ApiValidationError, ErrorBody, ErrorKind, FieldError, FieldErrorResponse, ValidateError,
    ValidationErrors,
};
pub use reflect::{Field, FieldValue, Kind, Reflect, Shape};
pub use string::validate_string;
pub use tag::{Tag, TAG_KEY};
pub use validate::{validate, Validate};

#[cfg(feature = "derive")]
pub use fieldtag_macros::Reflect;

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::{ErrorKind, FieldError, ValidateError, ValidationErrors};
    pub use crate::reflect::{Field, FieldValue, Kind, Reflect, Shape};
    pub use crate::validate::{validate, Validate};

    #[cfg(feature = "derive")]
    pub use fieldtag_macros::Reflect;
}
