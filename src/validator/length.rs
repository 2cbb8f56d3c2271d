//! Length rule

use super::{Check, Options, RuleKind};
use crate::error::DeclarationError;
use crate::messages::{self, interpolate, MessageLookup};
use crate::{Errors, Model};

/// Fails when the string form's character count breaks a limit.
///
/// Each limit has its own message. Absent values are not exempted: they are measured as
/// the empty string, so a `minimum` above zero rejects them.
#[derive(Debug, Clone)]
pub struct Length {
    maximum: Option<usize>,
    minimum: Option<usize>,
    is: Option<usize>,
    too_long: String,
    too_short: String,
    wrong_length: String,
}

impl Length {
    pub(crate) fn from_options(
        attribute: &str,
        options: &Options,
        lookup: &dyn MessageLookup,
    ) -> Result<Self, DeclarationError> {
        if options.maximum.is_none() && options.minimum.is_none() && options.is.is_none() {
            return Err(DeclarationError::MissingOption {
                kind: RuleKind::Length,
                attribute: attribute.to_string(),
                option: "a `maximum`, `minimum` or `is` limit",
            });
        }

        let message = |specific: &Option<String>, key: &str| {
            specific
                .clone()
                .or_else(|| options.message.clone())
                .unwrap_or_else(|| messages::resolve(lookup, key))
        };

        Ok(Self {
            maximum: options.maximum,
            minimum: options.minimum,
            is: options.is,
            too_long: message(&options.too_long, messages::TOO_LONG),
            too_short: message(&options.too_short, messages::TOO_SHORT),
            wrong_length: message(&options.wrong_length, messages::WRONG_LENGTH),
        })
    }
}

impl Check for Length {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        let length = subject
            .get(attribute)
            .map_or(0, |value| value.to_string().chars().count());

        let mut fail = |template: &str, limit: usize| {
            let count = limit.to_string();
            errors.add(attribute, interpolate(template, &[("count", &count)]));
        };

        if let Some(maximum) = self.maximum.filter(|&maximum| length > maximum) {
            fail(self.too_long.as_str(), maximum);
        }
        if let Some(minimum) = self.minimum.filter(|&minimum| length < minimum) {
            fail(self.too_short.as_str(), minimum);
        }
        if let Some(is) = self.is.filter(|&is| length != is) {
            fail(self.wrong_length.as_str(), is);
        }
    }
}
