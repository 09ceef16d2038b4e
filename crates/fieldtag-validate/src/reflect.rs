//! Static shape inspection for values handed to the validator.
//!
//! Instead of a general runtime type system, every value is classified into
//! a closed [`Kind`] set. Structs expose their declared fields through
//! [`Reflect::reflect`]; everything else reflects as a single [`FieldValue`].
//!
//! `#[derive(Reflect)]` (feature `derive`) writes the struct impl for you.
//! A manual impl looks like this:
//!
//! ```rust
//! use fieldtag_validate::{Field, FieldValue, Kind, Reflect, Shape};
//!
//! struct Signup {
//!     username: String,
//!     age: i32,
//! }
//!
//! impl Reflect for Signup {
//!     const KIND: Kind = Kind::Struct;
//!
//!     fn reflect(&self) -> Shape<'_> {
//!         Shape::Struct(vec![
//!             Field::new("Username", FieldValue::of(&self.username)).tag("min:3"),
//!             Field::new("Age", FieldValue::of(&self.age)).tag("min:18"),
//!         ])
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::collections::VecDeque;

/// Closed set of value kinds the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// String-like: `str`, `String`, `Cow<str>`, `Box<str>`
    Str,
    /// Integer-like, widened into `i64`
    Int,
    /// Sequence of some element kind
    Seq,
    /// A struct with named, ordered fields
    Struct,
    /// Anything else
    Other,
}

/// Runtime value of one field, unwrapped to its concrete kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    /// A sequence. `items` is only populated when `elem` is `Str` or `Int`.
    Seq {
        elem: Kind,
        items: Vec<FieldValue<'a>>,
    },
    Other,
}

impl<'a> FieldValue<'a> {
    /// Reflect `value` as a field value. Structs collapse to `Other`: fields
    /// are never inspected recursively.
    pub fn of<T: Reflect + ?Sized>(value: &'a T) -> Self {
        value.reflect().into_value()
    }

    /// Build a sequence value from borrowed elements of kind `T::KIND`.
    pub fn sequence<T, I>(items: I) -> Self
    where
        T: Reflect + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let items = match T::KIND {
            Kind::Str | Kind::Int => items.into_iter().map(FieldValue::of).collect(),
            _ => Vec::new(),
        };
        FieldValue::Seq {
            elem: T::KIND,
            items,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            FieldValue::Str(_) => Kind::Str,
            FieldValue::Int(_) => Kind::Int,
            FieldValue::Seq { .. } => Kind::Seq,
            FieldValue::Other => Kind::Other,
        }
    }
}

/// Field descriptor of a struct, computed fresh on every reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    /// Declared field name
    pub name: &'a str,
    /// Whether the field is `pub`
    pub exported: bool,
    /// Raw validation tag, empty when the field carries none
    pub tag: &'a str,
    /// Field value; always `Other` for unexported fields
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    /// Create an exported, untagged field.
    pub fn new(name: &'a str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            exported: true,
            tag: "",
            value,
        }
    }

    /// Create an unexported field. Its value is never exposed.
    pub fn unexported(name: &'a str) -> Self {
        Self {
            name,
            exported: false,
            tag: "",
            value: FieldValue::Other,
        }
    }

    /// Set the raw validation tag.
    pub fn tag(mut self, tag: &'a str) -> Self {
        self.tag = tag;
        self
    }
}

/// Result of reflecting a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<'a> {
    Struct(Vec<Field<'a>>),
    Value(FieldValue<'a>),
}

impl<'a> Shape<'a> {
    /// Collapse to a field value; a struct becomes `Other`.
    pub fn into_value(self) -> FieldValue<'a> {
        match self {
            Shape::Struct(_) => FieldValue::Other,
            Shape::Value(value) => value,
        }
    }
}

/// Types the validator can inspect.
pub trait Reflect {
    /// Static kind of the type, used to decide a sequence's element kind
    /// without looking at any element.
    const KIND: Kind;

    fn reflect(&self) -> Shape<'_>;
}

impl Reflect for str {
    const KIND: Kind = Kind::Str;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::Str(self))
    }
}

impl Reflect for String {
    const KIND: Kind = Kind::Str;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::Str(self.as_str()))
    }
}

impl Reflect for Cow<'_, str> {
    const KIND: Kind = Kind::Str;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::Str(self.as_ref()))
    }
}

// Only types that widen into i64 without loss count as integers.
macro_rules! impl_reflect_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                const KIND: Kind = Kind::Int;

                fn reflect(&self) -> Shape<'_> {
                    Shape::Value(FieldValue::Int(*self as i64))
                }
            }
        )*
    };
}

impl_reflect_int!(i8, i16, i32, i64, isize, u8, u16, u32);

macro_rules! impl_reflect_other {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                const KIND: Kind = Kind::Other;

                fn reflect(&self) -> Shape<'_> {
                    Shape::Value(FieldValue::Other)
                }
            }
        )*
    };
}

impl_reflect_other!(bool, char, f32, f64, u64, usize, i128, u128, ());

impl<T> Reflect for Option<T> {
    const KIND: Kind = Kind::Other;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::Other)
    }
}

impl<T: Reflect> Reflect for [T] {
    const KIND: Kind = Kind::Seq;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::sequence(self))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    const KIND: Kind = Kind::Seq;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::sequence(self))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    const KIND: Kind = Kind::Seq;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::sequence(self))
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    const KIND: Kind = Kind::Seq;

    fn reflect(&self) -> Shape<'_> {
        Shape::Value(FieldValue::sequence(self))
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    const KIND: Kind = T::KIND;

    fn reflect(&self) -> Shape<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    const KIND: Kind = T::KIND;

    fn reflect(&self) -> Shape<'_> {
        (**self).reflect()
    }
}
