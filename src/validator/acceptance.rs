//! Acceptance rule

use super::{Check, Options};
use crate::messages::{self, MessageLookup};
use crate::{Errors, Model, Value};

/// Fails unless the value loosely equals the accepted value (`"1"` by default).
///
/// Meant for terms-of-service style checkboxes; an absent value is not accepted.
#[derive(Debug, Clone)]
pub struct Acceptance {
    accept: Value,
    message: String,
}

impl Acceptance {
    pub(crate) fn from_options(options: &Options, lookup: &dyn MessageLookup) -> Self {
        Self {
            accept: options.accept.clone().unwrap_or_else(|| Value::from("1")),
            message: options
                .message
                .clone()
                .unwrap_or_else(|| messages::resolve(lookup, messages::ACCEPTED)),
        }
    }

    /// The value that counts as accepted.
    pub fn accepted_value(&self) -> &Value {
        &self.accept
    }
}

impl Check for Acceptance {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        let accepted = subject
            .get(attribute)
            .is_some_and(|value| value.loosely_eq(&self.accept));
        if !accepted {
            errors.add(attribute, self.message.as_str());
        }
    }
}
