//! Composable predicates and validator conditions
//!
//! A validator may carry a condition: it only runs when the condition holds for the model
//! being validated. Conditions are [`Predicate`]s over [`Model`], so a plain closure works,
//! and so do the `and`/`or`/`not` combinators.
//!
//! # Example
//!
//! ```rust
//! use tidewater::predicate::*;
//! use tidewater::{Model, Registry, ClassBuilder, Value};
//!
//! let is_business = attribute_equals("kind", "business");
//! let has_vat = attribute_present("vat_number");
//! let needs_review = is_business.and(has_vat.not());
//!
//! let mut registry = Registry::new();
//! let class = registry.register(ClassBuilder::new("Customer")).unwrap();
//! let customer = Model::new(&class, [("kind", Value::from("business"))]);
//!
//! assert!(needs_review.check(&customer));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{Model, Value};

/// A composable predicate over values of type T.
///
/// Predicates can be combined using logical operators:
/// - `and`: Both predicates must be true
/// - `or`: Either predicate must be true
/// - `not`: Inverts the predicate
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &T) -> bool;
}

// Blanket impl for closures
impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// Extension trait for predicate combinators.
pub trait PredicateExt<T: ?Sized>: Predicate<T> + Sized {
    /// Combine with AND logic.
    fn and<P: Predicate<T>>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// Combine with OR logic.
    fn or<P: Predicate<T>>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Invert the predicate.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, P: Predicate<T>> PredicateExt<T> for P {}

/// AND combinator - both predicates must be true.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for And<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) && self.1.check(value)
    }
}

/// OR combinator - either predicate must be true.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for Or<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) || self.1.check(value)
    }
}

/// NOT combinator - inverts the predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}

/// Predicate that holds when an attribute loosely equals a value.
#[derive(Clone, Debug)]
pub struct AttributeEquals {
    attribute: String,
    expected: Value,
}

impl Predicate<Model> for AttributeEquals {
    fn check(&self, model: &Model) -> bool {
        model
            .get(&self.attribute)
            .is_some_and(|value| value.loosely_eq(&self.expected))
    }
}

/// Create a predicate that holds when `attribute` loosely equals `expected`.
pub fn attribute_equals(attribute: impl Into<String>, expected: impl Into<Value>) -> AttributeEquals {
    AttributeEquals {
        attribute: attribute.into(),
        expected: expected.into(),
    }
}

/// Predicate that holds when an attribute is not blank.
#[derive(Clone, Debug)]
pub struct AttributePresent(String);

impl Predicate<Model> for AttributePresent {
    fn check(&self, model: &Model) -> bool {
        !model.is_blank(&[self.0.as_str()])
    }
}

/// Create a predicate that holds when `attribute` is set to something other than null or
/// the empty string.
pub fn attribute_present(attribute: impl Into<String>) -> AttributePresent {
    AttributePresent(attribute.into())
}

/// Condition attached to a validator.
///
/// Either a predicate supplied directly, or the name of a predicate declared on the model
/// class with [`ClassBuilder::predicate`](crate::ClassBuilder::predicate). Named conditions
/// are resolved to the class's predicate when the class is registered.
#[derive(Clone)]
pub enum Condition {
    /// A predicate over the model.
    Predicate(Arc<dyn Predicate<Model>>),
    /// A predicate declared on the model class, looked up by name.
    Named(String),
}

impl Condition {
    /// Wrap a predicate.
    pub fn new<P: Predicate<Model> + 'static>(predicate: P) -> Self {
        Condition::Predicate(Arc::new(predicate))
    }

    /// Evaluate the condition against a model.
    ///
    /// A named condition whose predicate the model's class does not declare never holds.
    /// Registered classes resolve names up front, so this only happens for validators run
    /// outside of their class.
    pub fn holds(&self, model: &Model) -> bool {
        match self {
            Condition::Predicate(predicate) => predicate.check(model),
            Condition::Named(name) => match model.class().predicate(name) {
                Some(predicate) => predicate.check(model),
                None => {
                    tracing::warn!(
                        class = %model.class().name(),
                        predicate = %name,
                        "unknown named condition, treating as not met"
                    );
                    false
                }
            },
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Predicate(_) => f.write_str("Condition::Predicate(..)"),
            Condition::Named(name) => f.debug_tuple("Condition::Named").field(name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassBuilder, Registry};

    fn customer(kind: &str) -> Model {
        let mut registry = Registry::new();
        let class = registry
            .register(ClassBuilder::new("Customer").predicate("is_business", |m: &Model| {
                m.get("kind").and_then(Value::as_str) == Some("business")
            }))
            .unwrap();
        Model::new(&class, [("kind", Value::from(kind))])
    }

    #[test]
    fn test_and_or_not() {
        let gt = |x: &i32| *x > 0;
        let lt = |x: &i32| *x < 10;

        assert!(gt.and(lt).check(&5));
        assert!(!gt.and(lt).check(&10));
        assert!(gt.or(lt).check(&50));
        assert!(gt.not().check(&-1));
    }

    #[test]
    fn test_attribute_equals() {
        assert!(attribute_equals("kind", "business").check(&customer("business")));
        assert!(!attribute_equals("kind", "business").check(&customer("private")));
        assert!(!attribute_equals("missing", "x").check(&customer("private")));
    }

    #[test]
    fn test_attribute_present() {
        assert!(attribute_present("kind").check(&customer("private")));
        assert!(!attribute_present("kind").check(&customer("")));
        assert!(!attribute_present("vat").check(&customer("private")));
    }

    #[test]
    fn test_named_condition_looks_up_class_predicate() {
        let condition = Condition::Named("is_business".into());
        assert!(condition.holds(&customer("business")));
        assert!(!condition.holds(&customer("private")));
    }

    #[test]
    fn test_unknown_named_condition_does_not_hold() {
        assert!(!Condition::Named("is_vip".into()).holds(&customer("business")));
    }

    #[test]
    fn test_closure_condition() {
        let condition = Condition::new(|m: &Model| m.get("kind").is_some());
        assert!(condition.holds(&customer("x")));
    }
}
