//! Confirmation rule

use super::{Check, Options};
use crate::errors::humanize;
use crate::messages::{self, interpolate, MessageLookup};
use crate::{Errors, Model, Value};

/// Fails when a present value differs from its companion attribute.
///
/// The error is recorded on the companion (`password_confirmation` for `password`), since
/// that is the field the user has to fix.
#[derive(Debug, Clone)]
pub struct Confirmation {
    companion: String,
    message: String,
}

impl Confirmation {
    /// Suffix appended to the attribute name to form the default companion name.
    pub const SUFFIX: &'static str = "_confirmation";

    pub(crate) fn from_options(
        attribute: &str,
        options: &Options,
        lookup: &dyn MessageLookup,
    ) -> Self {
        let template = options
            .message
            .clone()
            .unwrap_or_else(|| messages::resolve(lookup, messages::CONFIRMATION));

        Self {
            companion: options
                .companion
                .clone()
                .unwrap_or_else(|| format!("{}{}", attribute, Self::SUFFIX)),
            message: interpolate(&template, &[("attribute", &humanize(attribute))]),
        }
    }

    /// The attribute that must match.
    pub fn companion(&self) -> &str {
        &self.companion
    }
}

impl Check for Confirmation {
    fn run(&self, attribute: &str, subject: &Model, errors: &mut Errors) {
        let value = match subject.get(attribute) {
            None | Some(Value::Null) => return,
            Some(value) => value,
        };
        let confirmed = subject
            .get(&self.companion)
            .is_some_and(|companion| value.loosely_eq(companion));
        if !confirmed {
            errors.add(self.companion.as_str(), self.message.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::test_support::subject;
    use crate::validator::{RuleKind, Validator};

    fn password_confirmation() -> Validator {
        Validator::new(RuleKind::Confirmation, "password", Options::new()).unwrap()
    }

    #[test]
    fn test_mismatch_is_keyed_by_companion() {
        let model = subject([
            ("password", Value::from("x")),
            ("password_confirmation", Value::from("y")),
        ]);

        let errors = password_confirmation().validate(&model).now_or_never().unwrap();
        assert!(!errors.contains("password"));
        assert_eq!(
            errors.on("password_confirmation"),
            ["doesn't match Password"]
        );
    }

    #[test]
    fn test_match_passes() {
        let model = subject([
            ("password", Value::from("secret")),
            ("password_confirmation", Value::from("secret")),
        ]);
        assert!(password_confirmation()
            .validate(&model)
            .now_or_never()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_large_integer_mismatch_fails() {
        let pin = 1_i64 << 53;
        let model = subject([
            ("pin", Value::from(pin + 1)),
            ("pin_confirmation", Value::from(pin)),
        ]);
        let validator = Validator::new(RuleKind::Confirmation, "pin", Options::new()).unwrap();
        let errors = validator.validate(&model).now_or_never().unwrap();
        assert!(errors.contains("pin_confirmation"));
    }

    #[test]
    fn test_missing_companion_fails() {
        let model = subject([("password", Value::from("secret"))]);
        let errors = password_confirmation().validate(&model).now_or_never().unwrap();
        assert!(errors.contains("password_confirmation"));
    }

    #[test]
    fn test_absent_value_passes() {
        let model = subject([("password_confirmation", Value::from("y"))]);
        assert!(password_confirmation()
            .validate(&model)
            .now_or_never()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_custom_companion() {
        let validator = Validator::new(
            RuleKind::Confirmation,
            "email",
            Options::new().companion("email_again"),
        )
        .unwrap();
        let model = subject([
            ("email", Value::from("a@b.c")),
            ("email_again", Value::from("a@b.d")),
        ]);

        let errors = validator.validate(&model).now_or_never().unwrap();
        assert_eq!(errors.on("email_again"), ["doesn't match Email"]);
    }
}
