//! Range rule

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::{Check, Options, RuleKind};
use crate::error::DeclarationError;
use crate::messages::{self, interpolate, MessageLookup};
use crate::{Errors, Model, Value};

/// A range limit: fixed at declaration, or computed from the model being validated.
#[derive(Clone)]
pub enum Bound {
    /// Fixed value
    Fixed(Value),
    /// Value computed from the model at validation time
    Computed(Arc<dyn Fn(&Model) -> Value + Send + Sync>),
}

impl Bound {
    /// The limit for this model.
    pub fn resolve(&self, subject: &Model) -> Value {
        match self {
            Bound::Fixed(value) => value.clone(),
            Bound::Computed(f) => f(subject),
        }
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Bound::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Fails when a present value is below `min` or above `max` (both inclusive).
///
/// Numbers, numeric text and date-times are all ordered by [`Value::compare`]; a value that
/// cannot be ordered against a bound passes that bound.
#[derive(Debug, Clone)]
pub struct Range {
    min: Option<Bound>,
    max: Option<Bound>,
    too_low: String,
    too_high: String,
}

impl Range {
    pub(crate) fn from_options(
        attribute: &str,
        options: &Options,
        lookup: &dyn MessageLookup,
    ) -> Result<Self, DeclarationError> {
        if options.min.is_none() && options.max.is_none() {
            return Err(DeclarationError::MissingOption {
                kind: RuleKind::Range,
                attribute: attribute.to_string(),
                option: "a `min` or `max` bound",
            });
        }

        let message = |key: &str| {
            options
                .message
                .clone()
                .unwrap_or_else(|| messages::resolve(lookup, key))
        };

        Ok(Self {
            min: options.min.clone(),
            max: options.max.clone(),
            too_low: message(messages::GREATER_THAN_OR_EQUAL_TO),
            too_high: message(messages::LESS_THAN_OR_EQUAL_TO),
        })
    }
}

impl Check for Range {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        let value = match subject.get(attribute) {
            None | Some(Value::Null) => return,
            Some(value) => value,
        };

        let below = self.min.as_ref().map(|min| min.resolve(subject)).filter(|min| {
            value.compare(min) == Some(Ordering::Less)
        });
        if let Some(min) = below {
            let count = min.to_string();
            errors.add(attribute, interpolate(&self.too_low, &[("count", &count)]));
            return;
        }

        let above = self.max.as_ref().map(|max| max.resolve(subject)).filter(|max| {
            value.compare(max) == Some(Ordering::Greater)
        });
        if let Some(max) = above {
            let count = max.to_string();
            errors.add(attribute, interpolate(&self.too_high, &[("count", &count)]));
        }
    }
}
