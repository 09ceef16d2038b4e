//! The field walker: one flat pass over a struct's declared fields.

use crate::error::{ErrorKind, FieldError, ValidateError, ValidationErrors};
use crate::reflect::{Field, FieldValue, Kind, Reflect, Shape};
use crate::rules::{self, Evaluator};
use crate::tag::Tag;

/// Validate every tagged field of `value`.
///
/// Fields are visited in declaration order. Untagged fields are skipped;
/// every other problem, declaration or data, is collected rather than
/// returned early, so the caller sees all violations at once. The only
/// early exit is a non-struct `value`.
///
/// Sequence fields of strings or integers are checked element by element
/// under the path `name[index]`. Nested structs are not descended into.
pub fn validate<T: Reflect + ?Sized>(value: &T) -> Result<(), ValidateError> {
    let fields = match value.reflect() {
        Shape::Struct(fields) => fields,
        Shape::Value(_) => {
            trace_debug!(kind = ?T::KIND, "validation target is not a struct");
            return Err(ValidateError::NotAStruct);
        }
    };

    let mut errors = ValidationErrors::new();
    for field in &fields {
        validate_field(field, &mut errors);
    }

    trace_debug!(
        fields = fields.len(),
        failures = errors.len(),
        "validation pass complete"
    );
    errors.into_result().map_err(ValidateError::from)
}

fn validate_field(field: &Field<'_>, errors: &mut ValidationErrors) {
    if field.tag.is_empty() {
        return;
    }

    if !field.exported {
        record(errors, FieldError::new(field.name, ErrorKind::UnexportedFieldValidation));
        return;
    }

    let (tag, evaluator) = match resolve(field.tag) {
        Ok(resolved) => resolved,
        Err(kind) => {
            record(errors, FieldError::new(field.name, kind));
            return;
        }
    };

    match &field.value {
        FieldValue::Seq {
            elem: Kind::Str | Kind::Int,
            items,
        } => {
            for (index, item) in items.iter().enumerate() {
                if let Err(kind) = evaluator(item, tag.param) {
                    record(errors, FieldError::element(field.name, index, kind));
                }
            }
        }
        // Reported without a path, once for the whole field.
        FieldValue::Seq { .. } => {
            record(errors, FieldError::new("", ErrorKind::UnsupportedKind { rule: None }));
        }
        value => {
            if let Err(kind) = evaluator(value, tag.param) {
                record(errors, FieldError::new(field.name, kind));
            }
        }
    }
}

fn resolve(raw: &str) -> Result<(Tag<'_>, Evaluator), ErrorKind> {
    let tag = Tag::parse(raw)?;
    let evaluator = rules::lookup(tag.rule)?;
    Ok((tag, evaluator))
}

fn record(errors: &mut ValidationErrors, error: FieldError) {
    if error.kind.is_declaration() {
        trace_warn!(path = %error.path, cause = %error.kind, "malformed validation tag");
    }
    errors.push(error);
}

/// Trait for validatable types.
///
/// Implemented for every [`Reflect`] type, so `#[derive(Reflect)]` is all a
/// struct needs.
///
/// ## Example
///
/// ```rust
/// use fieldtag_validate::{Field, FieldValue, Kind, Reflect, Shape, Validate};
///
/// struct Order {
///     status: String,
/// }
///
/// impl Reflect for Order {
///     const KIND: Kind = Kind::Struct;
///
///     fn reflect(&self) -> Shape<'_> {
///         Shape::Struct(vec![
///             Field::new("Status", FieldValue::of(&self.status)).tag("in:open,closed"),
///         ])
///     }
/// }
///
/// let order = Order { status: "pending".into() };
/// let err = order.validate().unwrap_err();
/// assert_eq!(err.to_string(), "Status: value not in the allowed set");
/// ```
pub trait Validate: Reflect {
    /// Validate the value and return every field failure on error.
    fn validate(&self) -> Result<(), ValidateError> {
        validate(self)
    }

    /// Validate and return the value if valid, error otherwise.
    fn validated(self) -> Result<Self, ValidateError>
    where
        Self: Sized,
    {
        validate(&self)?;
        Ok(self)
    }
}

impl<T: Reflect + ?Sized> Validate for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Profile {
        name: String,
        age: i32,
        nickname: String,
    }

    impl Reflect for Profile {
        const KIND: Kind = Kind::Struct;

        fn reflect(&self) -> Shape<'_> {
            Shape::Struct(vec![
                Field::new("Name", FieldValue::of(&self.name)).tag("len:5"),
                Field::new("Age", FieldValue::of(&self.age)).tag("min:18"),
                Field::new("Nickname", FieldValue::of(&self.nickname)),
                Field::unexported("secret").tag("max:3"),
            ])
        }
    }

    // Fields built from explicit descriptors, for exercising odd tags.
    struct Raw<'a>(Vec<Field<'a>>);

    impl Reflect for Raw<'_> {
        const KIND: Kind = Kind::Struct;

        fn reflect(&self) -> Shape<'_> {
            Shape::Struct(self.0.clone())
        }
    }

    fn profile() -> Profile {
        Profile {
            name: "alice".into(),
            age: 30,
            nickname: String::new(),
        }
    }

    #[test]
    fn non_struct_is_rejected() {
        assert_eq!(validate("text"), Err(ValidateError::NotAStruct));
        assert_eq!(validate(&42i64), Err(ValidateError::NotAStruct));
        assert_eq!(validate(&vec![1, 2]), Err(ValidateError::NotAStruct));
    }

    #[test]
    fn struct_without_tags_passes() {
        let raw = Raw(vec![
            Field::new("A", FieldValue::Int(1)),
            Field::new("B", FieldValue::Other),
            Field::unexported("c"),
        ]);
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn collects_unexported_and_data_failures_in_order() {
        let mut p = profile();
        p.age = 12;

        let err = validate(&p).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].path, "Age");
        assert_eq!(errors.errors()[0].kind, ErrorKind::TooSmall { min: 18 });
        assert_eq!(errors.errors()[1].path, "secret");
        assert_eq!(errors.errors()[1].kind, ErrorKind::UnexportedFieldValidation);
        assert_eq!(
            err.to_string(),
            "Age: value must be at least 18; validation for unexported field is not allowed"
        );
    }

    #[test]
    fn unexported_field_fails_regardless_of_tag() {
        let raw = Raw(vec![
            Field::unexported("a").tag("nonsense"),
            Field::unexported("b").tag("min:0"),
        ]);
        let err = validate(&raw).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ErrorKind::UnexportedFieldValidation));
    }

    #[test]
    fn bad_tags_are_collected_per_field() {
        let raw = Raw(vec![
            Field::new("A", FieldValue::Int(1)).tag("min"),
            Field::new("B", FieldValue::Int(1)).tag("between:1"),
            Field::new("C", FieldValue::Int(1)).tag("min:2,max:5"),
            Field::new("D", FieldValue::Str("x")).tag("in:"),
            Field::new("E", FieldValue::Int(0)).tag("max:5"),
        ]);
        let err = validate(&raw).unwrap_err();
        let errors = err.field_errors().unwrap();

        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["A", "B", "C", "D"]);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::InvalidTagSyntax));
        assert_eq!(
            err.to_string(),
            "invalid validator syntax; invalid validator syntax; \
             invalid validator syntax; invalid validator syntax"
        );
    }

    #[test]
    fn sequence_elements_get_indexed_paths() {
        let values = vec![3i32, -1, 0, -7];
        let raw = Raw(vec![Field::new("Scores", FieldValue::of(&values)).tag("min:0")]);

        let err = validate(&raw).unwrap_err();
        let errors = err.field_errors().unwrap();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["Scores[1]", "Scores[3]"]);
        assert_eq!(
            err.to_string(),
            "Scores[1]: value must be at least 0; Scores[3]: value must be at least 0"
        );
    }

    #[test]
    fn empty_sequence_passes() {
        let values: Vec<String> = Vec::new();
        let raw = Raw(vec![Field::new("Tags", FieldValue::of(&values)).tag("len:3")]);
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn unsupported_sequence_fails_once_without_path() {
        let flags = vec![true, false, true];
        let raw = Raw(vec![Field::new("Flags", FieldValue::of(&flags)).tag("min:1")]);

        let err = validate(&raw).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].path, "");
        assert_eq!(
            errors.errors()[0].kind,
            ErrorKind::UnsupportedKind { rule: None }
        );
        assert_eq!(err.to_string(), ": unsupported element type in slice");
    }

    #[test]
    fn unknown_rule_wins_over_unsupported_sequence() {
        let flags = vec![true];
        let raw = Raw(vec![Field::new("Flags", FieldValue::of(&flags)).tag("nope:1")]);
        let err = validate(&raw).unwrap_err();
        assert!(err.contains(&ErrorKind::InvalidTagSyntax));
    }

    #[test]
    fn scalar_of_other_kind_fails_with_path() {
        let raw = Raw(vec![Field::new("Ratio", FieldValue::Other).tag("min:1")]);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Ratio: unsupported type for min validator");
    }

    #[test]
    fn validated_returns_value_on_success() {
        let p = profile();
        let mut tagged = Raw(Vec::new());
        tagged.0.push(Field::new("Name", FieldValue::of(&p.name)).tag("len:5"));
        assert!(tagged.validated().is_ok());
    }

    #[test]
    fn trait_method_matches_free_function() {
        let p = Profile {
            name: "bob".into(),
            ..profile()
        };
        assert_eq!(p.validate(), validate(&p));
        let err = p.validate().unwrap_err();
        assert!(err.contains(&ErrorKind::LengthMismatch { expected: 5 }));
        assert!(err.contains(&ErrorKind::UnexportedFieldValidation));
    }
}
