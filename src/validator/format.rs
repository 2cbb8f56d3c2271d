//! Format rule

use regex::Regex;

use super::{Check, Options, RuleKind};
use crate::error::DeclarationError;
use crate::messages::{self, MessageLookup};
use crate::{Errors, Model, Value};

/// Fails when a present value's string form does not match a pattern.
///
/// Absent and null values pass; pair with [`Presence`](super::Presence) to require them.
#[derive(Debug, Clone)]
pub struct Format {
    pattern: Regex,
    message: String,
}

impl Format {
    pub(crate) fn from_options(
        attribute: &str,
        options: &Options,
        lookup: &dyn MessageLookup,
    ) -> Result<Self, DeclarationError> {
        let source = options
            .pattern
            .as_deref()
            .ok_or_else(|| DeclarationError::MissingOption {
                kind: RuleKind::Format,
                attribute: attribute.to_string(),
                option: "a pattern (`with`)",
            })?;
        let pattern = Regex::new(source).map_err(|source_err| DeclarationError::InvalidPattern {
            attribute: attribute.to_string(),
            pattern: source.to_string(),
            source: source_err,
        })?;

        Ok(Self {
            pattern,
            message: options
                .message
                .clone()
                .unwrap_or_else(|| messages::resolve(lookup, messages::INVALID)),
        })
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Check for Format {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        match subject.get(attribute) {
            None | Some(Value::Null) => {}
            Some(value) => {
                if !self.pattern.is_match(&value.to_string()) {
                    errors.add(attribute, self.message.as_str());
                }
            }
        }
    }
}
