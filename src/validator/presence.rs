//! Presence rule

use super::{Check, Options};
use crate::messages::{self, MessageLookup};
use crate::{Errors, Model, Value};

/// Fails when the value is absent, null, or its string form is empty.
#[derive(Debug, Clone)]
pub struct Presence {
    message: String,
}

impl Presence {
    pub(crate) fn from_options(options: &Options, lookup: &dyn MessageLookup) -> Self {
        Self {
            message: options
                .message
                .clone()
                .unwrap_or_else(|| messages::resolve(lookup, messages::EMPTY)),
        }
    }

    /// The message recorded on failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Check for Presence {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        let missing = match subject.get(attribute) {
            None | Some(Value::Null) => true,
            Some(value) => value.to_string().is_empty(),
        };
        if missing {
            errors.add(attribute, self.message.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::test_support::subject;
    use crate::validator::{RuleKind, Validator};

    fn run(model: &Model) -> Errors {
        let validator = Validator::new(RuleKind::Presence, "name", Options::new()).unwrap();
        validator.validate(model).now_or_never().unwrap()
    }

    #[test]
    fn test_missing_values_add_one_error() {
        for model in [
            subject([]),
            subject([("name", Value::Null)]),
            subject([("name", Value::from(""))]),
        ] {
            assert_eq!(run(&model).on("name"), ["can't be empty"]);
        }
    }

    #[test]
    fn test_present_values_pass() {
        for value in [Value::from("x"), Value::from(0), Value::from(false)] {
            assert!(run(&subject([("name", value)])).is_empty());
        }
    }

    #[test]
    fn test_empty_list_counts_as_missing() {
        let errors = run(&subject([("name", Value::List(vec![]))]));
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_custom_message() {
        let validator = Validator::new(
            RuleKind::Presence,
            "name",
            Options::new().message("is required"),
        )
        .unwrap();

        let errors = validator.validate(&subject([])).now_or_never().unwrap();
        assert_eq!(errors.on("name"), ["is required"]);
    }
}
