//! The builtin rule set and its registry.
//!
//! The registry is a fixed table built once on first use and never mutated
//! afterwards, so concurrent lookups need no synchronization beyond the
//! one-time initialization.

mod builtin;

pub use builtin::{in_set, len, max, min};

use crate::error::ErrorKind;
use crate::reflect::FieldValue;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A rule evaluator: checks one scalar value against the rule's raw param.
pub type Evaluator = fn(&FieldValue<'_>, &str) -> Result<(), ErrorKind>;

static REGISTRY: OnceLock<HashMap<&'static str, Evaluator>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, Evaluator> {
    REGISTRY.get_or_init(|| {
        HashMap::from([
            ("len", len as Evaluator),
            ("in", in_set as Evaluator),
            ("min", min as Evaluator),
            ("max", max as Evaluator),
        ])
    })
}

/// Resolve a rule name. Unknown names are a declaration error.
pub fn lookup(rule: &str) -> Result<Evaluator, ErrorKind> {
    registry()
        .get(rule)
        .copied()
        .ok_or(ErrorKind::InvalidTagSyntax)
}

/// Names of every registered rule, sorted.
pub fn rule_names() -> Vec<&'static str> {
    let mut names: Vec<_> = registry().keys().copied().collect();
    names.sort_unstable();
    names
}
