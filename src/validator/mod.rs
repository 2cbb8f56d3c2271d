//! Declarative validation rules
//!
//! A [`Validator`] binds one [`Rule`] to one attribute, optionally guarded by a
//! [`Condition`]. Rules are declared by kind ([`RuleKind`]) plus [`Options`], the same way
//! a model class declares them:
//!
//! ```
//! use tidewater::validator::{Options, RuleKind, Validator};
//! use tidewater::{ClassBuilder, Model, Registry, Value};
//!
//! let mut registry = Registry::new();
//! let class = registry.register(ClassBuilder::new("Product")).unwrap();
//! let product = Model::new(&class, [("price", Value::from(12))]);
//!
//! let validator = Validator::new(
//!     RuleKind::Range,
//!     "price",
//!     Options::new().min(1).max(10),
//! )
//! .unwrap();
//!
//! let errors = validator.validate(&product).now_or_never().unwrap();
//! assert_eq!(errors.on("price"), ["must be less than or equal to 10"]);
//! ```
//!
//! Every rule except [`Remote`] settles immediately. A remote rule returns a pending
//! [`Outcome`] that the model joins with all the others.

mod acceptance;
mod confirmation;
mod format;
mod length;
mod presence;
mod range;
mod remote;

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use indexmap::IndexMap;

use crate::error::DeclarationError;
use crate::messages::{DefaultMessages, MessageLookup};
use crate::predicate::{Condition, Predicate};
use crate::{Errors, Model, Value};

pub use acceptance::Acceptance;
pub use confirmation::Confirmation;
pub use format::Format;
pub use length::Length;
pub use presence::Presence;
pub use range::{Bound, Range};
pub use remote::{Remote, RemoteCheck};

/// A synchronous check against a model.
///
/// Every built-in synchronous rule implements it, and so can user-defined rules passed to
/// [`Validator::custom`].
///
/// ```
/// use tidewater::validator::{Check, Validator};
/// use tidewater::{ClassBuilder, Errors, Model, Registry, Value};
///
/// struct NoShouting;
///
/// impl Check for NoShouting {
///     fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
///         if let Some(text) = subject.get(attribute).and_then(Value::as_str) {
///             if !text.is_empty() && text == text.to_uppercase() {
///                 errors.add(attribute, "must not be all caps");
///             }
///         }
///     }
/// }
///
/// let mut registry = Registry::new();
/// let class = registry
///     .register(ClassBuilder::new("Comment").add_validation(Validator::custom("body", NoShouting)))
///     .unwrap();
/// let mut comment = Model::new(&class, [("body", Value::from("HELLO"))]);
///
/// assert!(!comment.is_valid(Default::default()));
/// ```
pub trait Check: Send + Sync {
    /// Record zero or more errors for `attribute` of `subject`.
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors);
}

/// The rule kinds that can be declared by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Value must be present and non-empty.
    Presence,
    /// Value must match a pattern.
    Format,
    /// Value must lie within bounds.
    Range,
    /// Value must equal the accepted value.
    Acceptance,
    /// String form must respect length limits.
    Length,
    /// Value must equal a companion attribute.
    Confirmation,
    /// An asynchronous external check must pass.
    Remote,
}

impl RuleKind {
    /// Every declarable kind.
    pub const ALL: [RuleKind; 7] = [
        RuleKind::Presence,
        RuleKind::Format,
        RuleKind::Range,
        RuleKind::Acceptance,
        RuleKind::Length,
        RuleKind::Confirmation,
        RuleKind::Remote,
    ];

    /// The declaration name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Presence => "presence",
            RuleKind::Format => "format",
            RuleKind::Range => "range",
            RuleKind::Acceptance => "acceptance",
            RuleKind::Length => "length",
            RuleKind::Confirmation => "confirmation",
            RuleKind::Remote => "remote",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = DeclarationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| DeclarationError::UnknownRule(name.to_string()))
    }
}

/// Declaration options for a validator.
///
/// Only the options relevant to the declared [`RuleKind`] are read; the rest are ignored.
#[derive(Clone, Default)]
pub struct Options {
    pub(crate) message: Option<String>,
    pub(crate) condition: Option<Condition>,
    pub(crate) pattern: Option<String>,
    pub(crate) min: Option<Bound>,
    pub(crate) max: Option<Bound>,
    pub(crate) accept: Option<Value>,
    pub(crate) minimum: Option<usize>,
    pub(crate) maximum: Option<usize>,
    pub(crate) is: Option<usize>,
    pub(crate) too_long: Option<String>,
    pub(crate) too_short: Option<String>,
    pub(crate) wrong_length: Option<String>,
    pub(crate) companion: Option<String>,
    pub(crate) remote: Option<RemoteCheck>,
}

impl Options {
    /// No options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Only run when `predicate` holds for the model.
    pub fn when<P: Predicate<Model> + 'static>(mut self, predicate: P) -> Self {
        self.condition = Some(Condition::new(predicate));
        self
    }

    /// Only run when the class predicate called `name` holds for the model.
    pub fn when_method(mut self, name: impl Into<String>) -> Self {
        self.condition = Some(Condition::Named(name.into()));
        self
    }

    /// Pattern the string form must match (format).
    pub fn with(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Inclusive lower bound (range).
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(Bound::Fixed(min.into()));
        self
    }

    /// Inclusive upper bound (range).
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(Bound::Fixed(max.into()));
        self
    }

    /// Lower bound computed from the model at validation time (range).
    pub fn min_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Model) -> Value + Send + Sync + 'static,
    {
        self.min = Some(Bound::Computed(Arc::new(f)));
        self
    }

    /// Upper bound computed from the model at validation time (range).
    pub fn max_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Model) -> Value + Send + Sync + 'static,
    {
        self.max = Some(Bound::Computed(Arc::new(f)));
        self
    }

    /// Value that counts as accepted; defaults to `"1"` (acceptance).
    pub fn accept(mut self, value: impl Into<Value>) -> Self {
        self.accept = Some(value.into());
        self
    }

    /// Minimum character count (length).
    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Maximum character count (length).
    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Exact character count (length).
    pub fn is(mut self, is: usize) -> Self {
        self.is = Some(is);
        self
    }

    /// Message when longer than the maximum (length).
    pub fn too_long(mut self, message: impl Into<String>) -> Self {
        self.too_long = Some(message.into());
        self
    }

    /// Message when shorter than the minimum (length).
    pub fn too_short(mut self, message: impl Into<String>) -> Self {
        self.too_short = Some(message.into());
        self
    }

    /// Message when not the exact length (length).
    pub fn wrong_length(mut self, message: impl Into<String>) -> Self {
        self.wrong_length = Some(message.into());
        self
    }

    /// Companion attribute name; defaults to `<attribute>_confirmation` (confirmation).
    pub fn companion(mut self, name: impl Into<String>) -> Self {
        self.companion = Some(name.into());
        self
    }

    /// Asynchronous check that resolves `true` when the value is acceptable (remote).
    pub fn remote<F, Fut>(mut self, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let remote: RemoteCheck = Arc::new(move |value: Value| check(value).boxed());
        self.remote = Some(remote);
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("message", &self.message)
            .field("condition", &self.condition)
            .field("pattern", &self.pattern)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("accept", &self.accept)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("is", &self.is)
            .field("companion", &self.companion)
            .field("remote", &self.remote.is_some())
            .finish_non_exhaustive()
    }
}

/// The check a validator performs.
#[derive(Clone)]
pub enum Rule {
    /// See [`Presence`].
    Presence(Presence),
    /// See [`Format`].
    Format(Format),
    /// See [`Range`].
    Range(Range),
    /// See [`Acceptance`].
    Acceptance(Acceptance),
    /// See [`Length`].
    Length(Length),
    /// See [`Confirmation`].
    Confirmation(Confirmation),
    /// See [`Remote`].
    Remote(Remote),
    /// A user-defined [`Check`].
    Custom(Arc<dyn Check>),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Presence(rule) => fmt::Debug::fmt(rule, f),
            Rule::Format(rule) => fmt::Debug::fmt(rule, f),
            Rule::Range(rule) => fmt::Debug::fmt(rule, f),
            Rule::Acceptance(rule) => fmt::Debug::fmt(rule, f),
            Rule::Length(rule) => fmt::Debug::fmt(rule, f),
            Rule::Confirmation(rule) => fmt::Debug::fmt(rule, f),
            Rule::Remote(rule) => fmt::Debug::fmt(rule, f),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Result of running one validator.
pub enum Outcome<'a> {
    /// The condition did not hold; nothing ran.
    Skipped,
    /// The rule ran to completion.
    Settled(Errors),
    /// The rule is waiting on an external check.
    Pending(BoxFuture<'a, Errors>),
}

impl<'a> Outcome<'a> {
    /// Whether the outcome still has to be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    /// Future that settles on the errors this validator recorded.
    pub fn settle(self) -> BoxFuture<'a, Errors> {
        match self {
            Outcome::Skipped => future::ready(Errors::new()).boxed(),
            Outcome::Settled(errors) => future::ready(errors).boxed(),
            Outcome::Pending(pending) => pending,
        }
    }

    /// The recorded errors if the outcome can settle without waiting.
    ///
    /// A pending outcome is polled exactly once; if it is not ready it is dropped.
    pub fn now_or_never(self) -> Option<Errors> {
        match self {
            Outcome::Skipped => Some(Errors::new()),
            Outcome::Settled(errors) => Some(errors),
            Outcome::Pending(pending) => pending.now_or_never(),
        }
    }
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped => f.write_str("Skipped"),
            Outcome::Settled(errors) => f.debug_tuple("Settled").field(errors).finish(),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A rule bound to an attribute.
#[derive(Debug, Clone)]
pub struct Validator {
    attribute: String,
    condition: Option<Condition>,
    rule: Rule,
}

impl Validator {
    /// Build a validator with the default English messages.
    ///
    /// Messages are resolved here, so a registry's message lookup does not apply to a
    /// validator built this way. Use [`Validator::with_messages`] to pick the lookup.
    pub fn new(
        kind: RuleKind,
        attribute: impl Into<String>,
        options: Options,
    ) -> Result<Self, DeclarationError> {
        Self::with_messages(kind, attribute, options, &DefaultMessages::new())
    }

    /// Build a validator, resolving default messages through `messages`.
    pub fn with_messages(
        kind: RuleKind,
        attribute: impl Into<String>,
        options: Options,
        messages: &dyn MessageLookup,
    ) -> Result<Self, DeclarationError> {
        let attribute = attribute.into();
        let rule = match kind {
            RuleKind::Presence => Rule::Presence(Presence::from_options(&options, messages)),
            RuleKind::Format => {
                Rule::Format(Format::from_options(&attribute, &options, messages)?)
            }
            RuleKind::Range => Rule::Range(Range::from_options(&attribute, &options, messages)?),
            RuleKind::Acceptance => {
                Rule::Acceptance(Acceptance::from_options(&options, messages))
            }
            RuleKind::Length => {
                Rule::Length(Length::from_options(&attribute, &options, messages)?)
            }
            RuleKind::Confirmation => {
                Rule::Confirmation(Confirmation::from_options(&attribute, &options, messages))
            }
            RuleKind::Remote => {
                Rule::Remote(Remote::from_options(&attribute, &options, messages)?)
            }
        };

        Ok(Self {
            attribute,
            condition: options.condition,
            rule,
        })
    }

    /// Wrap a user-defined check.
    pub fn custom<C: Check + 'static>(attribute: impl Into<String>, check: C) -> Self {
        Self {
            attribute: attribute.into(),
            condition: None,
            rule: Rule::Custom(Arc::new(check)),
        }
    }

    /// Guard the validator with a predicate.
    pub fn when<P: Predicate<Model> + 'static>(mut self, predicate: P) -> Self {
        self.condition = Some(Condition::new(predicate));
        self
    }

    /// The attribute this validator targets.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The declared kind, or `None` for custom checks.
    pub fn kind(&self) -> Option<RuleKind> {
        match self.rule {
            Rule::Presence(_) => Some(RuleKind::Presence),
            Rule::Format(_) => Some(RuleKind::Format),
            Rule::Range(_) => Some(RuleKind::Range),
            Rule::Acceptance(_) => Some(RuleKind::Acceptance),
            Rule::Length(_) => Some(RuleKind::Length),
            Rule::Confirmation(_) => Some(RuleKind::Confirmation),
            Rule::Remote(_) => Some(RuleKind::Remote),
            Rule::Custom(_) => None,
        }
    }

    /// The rule this validator applies.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The guard condition, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Run the validator against `subject`.
    ///
    /// When a condition is present the rule only runs if it holds.
    pub fn validate<'a>(&'a self, subject: &'a Model) -> Outcome<'a> {
        if let Some(condition) = &self.condition {
            if !condition.holds(subject) {
                tracing::trace!(
                    attribute = %self.attribute,
                    rule = ?self.kind(),
                    "condition not met, skipping validator"
                );
                return Outcome::Skipped;
            }
        }

        let check: &dyn Check = match &self.rule {
            Rule::Remote(remote) => return remote.start(&self.attribute, subject),
            Rule::Presence(rule) => rule,
            Rule::Format(rule) => rule,
            Rule::Range(rule) => rule,
            Rule::Acceptance(rule) => rule,
            Rule::Length(rule) => rule,
            Rule::Confirmation(rule) => rule,
            Rule::Custom(rule) => rule.as_ref(),
        };

        let mut errors = Errors::new();
        check.run(&self.attribute, subject, &mut errors);
        Outcome::Settled(errors)
    }

    /// Swap a named condition for the class predicate it refers to.
    pub(crate) fn resolve_condition(
        &mut self,
        predicates: &IndexMap<String, Arc<dyn Predicate<Model>>>,
    ) -> Result<(), DeclarationError> {
        if let Some(Condition::Named(name)) = &self.condition {
            let predicate = predicates.get(name).cloned().ok_or_else(|| {
                DeclarationError::UnknownPredicate {
                    attribute: self.attribute.clone(),
                    name: name.clone(),
                }
            })?;
            self.condition = Some(Condition::Predicate(predicate));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::subject;
    use super::*;

    #[test]
    fn test_rule_kind_names_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str().parse::<RuleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_rule_kind() {
        let err = "uniqueness".parse::<RuleKind>().unwrap_err();
        assert!(matches!(err, DeclarationError::UnknownRule(name) if name == "uniqueness"));
    }

    #[test]
    fn test_condition_true_runs_rule() {
        let validator = Validator::new(
            RuleKind::Presence,
            "name",
            Options::new().when(|_: &Model| true),
        )
        .unwrap();

        let errors = validator.validate(&subject([])).now_or_never().unwrap();
        assert_eq!(errors.on("name").len(), 1);
    }

    #[test]
    fn test_condition_false_skips_rule() {
        let validator = Validator::new(
            RuleKind::Presence,
            "name",
            Options::new().when(|_: &Model| false),
        )
        .unwrap();

        let model = subject([]);
        let outcome = validator.validate(&model);
        assert!(matches!(outcome, Outcome::Skipped));
    }

    #[test]
    fn test_without_condition_always_runs() {
        let validator = Validator::new(RuleKind::Presence, "name", Options::new()).unwrap();
        assert!(validator.condition().is_none());

        let errors = validator.validate(&subject([])).now_or_never().unwrap();
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_custom_check() {
        struct AlwaysBase;
        impl Check for AlwaysBase {
            fn run(&self, _attribute: &str, _subject: &Model, errors: &mut Errors) {
                errors.add_to_base("nope");
            }
        }

        let validator = Validator::custom("anything", AlwaysBase);
        assert_eq!(validator.kind(), None);

        let errors = validator.validate(&subject([])).now_or_never().unwrap();
        assert_eq!(errors.base(), ["nope"]);
    }

    #[test]
    fn test_resolve_named_condition() {
        let mut validator = Validator::new(
            RuleKind::Presence,
            "name",
            Options::new().when_method("never"),
        )
        .unwrap();

        let mut predicates: IndexMap<String, Arc<dyn Predicate<Model>>> = IndexMap::new();
        predicates.insert("never".into(), Arc::new(|_: &Model| false));

        validator.resolve_condition(&predicates).unwrap();
        assert!(matches!(validator.condition(), Some(Condition::Predicate(_))));
        assert!(matches!(validator.validate(&subject([])), Outcome::Skipped));
    }

    #[test]
    fn test_resolve_unknown_named_condition() {
        let mut validator = Validator::new(
            RuleKind::Presence,
            "name",
            Options::new().when_method("missing"),
        )
        .unwrap();

        let err = validator.resolve_condition(&IndexMap::new()).unwrap_err();
        assert!(matches!(err, DeclarationError::UnknownPredicate { name, .. } if name == "missing"));
    }

    #[test]
    fn test_settle_ready_outcomes() {
        let mut errors = Errors::new();
        errors.add("x", "bad");

        let settled = futures::executor::block_on(Outcome::Settled(errors.clone()).settle());
        assert_eq!(settled, errors);

        let skipped = futures::executor::block_on(Outcome::Skipped.settle());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_now_or_never_drops_unready_pending() {
        let outcome = Outcome::Pending(futures::future::pending().boxed());
        assert!(outcome.is_pending());
        assert!(outcome.now_or_never().is_none());
    }
}
