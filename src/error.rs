//! Declaration errors
//!
//! Validation failures are data: they end up in a model's [`Errors`](crate::Errors) and are
//! never returned as `Err`. [`DeclarationError`] covers the other kind of failure, a model
//! class or validator that was declared incorrectly. These surface when the class is
//! registered, before any model exists.

use crate::validator::RuleKind;

/// A model class or validator was declared incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    /// A class with this name is already registered.
    #[error("model class `{0}` is already registered")]
    DuplicateClass(String),

    /// The declared parent class is not registered.
    #[error("model class `{class}` extends unknown class `{parent}`")]
    UnknownParent {
        /// Class being registered
        class: String,
        /// Missing parent
        parent: String,
    },

    /// No rule kind has this name.
    #[error("unknown validation rule `{0}`")]
    UnknownRule(String),

    /// A rule kind was declared without an option it needs.
    #[error("`{kind}` validation on `{attribute}` requires {option}")]
    MissingOption {
        /// Rule kind
        kind: RuleKind,
        /// Attribute the rule targets
        attribute: String,
        /// Description of the missing option
        option: &'static str,
    },

    /// A format pattern failed to compile.
    #[error("invalid format pattern `{pattern}` on `{attribute}`")]
    InvalidPattern {
        /// Attribute the rule targets
        attribute: String,
        /// The pattern as declared
        pattern: String,
        /// Compiler error
        #[source]
        source: regex::Error,
    },

    /// A validator's condition names a predicate the class does not declare.
    #[error("validation on `{attribute}` refers to unknown predicate `{name}`")]
    UnknownPredicate {
        /// Attribute the rule targets
        attribute: String,
        /// Predicate name
        name: String,
    },
}
