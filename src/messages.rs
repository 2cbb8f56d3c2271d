//! Default error messages
//!
//! Validators resolve their default message once, at construction, by looking up a dotted
//! key such as `errors.messages.empty` through a [`MessageLookup`]. Messages may contain
//! `%{count}` and `%{attribute}` placeholders that are filled in when an error is recorded.
//!
//! ```
//! use tidewater::messages::{DefaultMessages, MessageLookup, interpolate};
//!
//! let messages = DefaultMessages::new().with("errors.messages.empty", "is required");
//! assert_eq!(messages.lookup("errors.messages.empty").as_deref(), Some("is required"));
//!
//! let template = messages.lookup("errors.messages.too_long").unwrap();
//! assert_eq!(
//!     interpolate(&template, &[("count", "8")]),
//!     "is too long (maximum is 8 characters)"
//! );
//! ```

use std::collections::HashMap;

pub(crate) const EMPTY: &str = "errors.messages.empty";
pub(crate) const INVALID: &str = "errors.messages.invalid";
pub(crate) const ACCEPTED: &str = "errors.messages.accepted";
pub(crate) const CONFIRMATION: &str = "errors.messages.confirmation";
pub(crate) const TOO_LONG: &str = "errors.messages.too_long";
pub(crate) const TOO_SHORT: &str = "errors.messages.too_short";
pub(crate) const WRONG_LENGTH: &str = "errors.messages.wrong_length";
pub(crate) const GREATER_THAN_OR_EQUAL_TO: &str = "errors.messages.greater_than_or_equal_to";
pub(crate) const LESS_THAN_OR_EQUAL_TO: &str = "errors.messages.less_than_or_equal_to";
pub(crate) const TAKEN: &str = "errors.messages.taken";

/// Look up a localized message by dotted key.
pub trait MessageLookup: Send + Sync {
    /// The message for `key`, if one is known.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// English defaults, with per-key overrides.
#[derive(Debug, Clone, Default)]
pub struct DefaultMessages {
    overrides: HashMap<String, String>,
}

impl DefaultMessages {
    /// The built-in English messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the message for one key.
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), message.into());
        self
    }
}

impl MessageLookup for DefaultMessages {
    fn lookup(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| builtin(key).map(str::to_string))
    }
}

fn builtin(key: &str) -> Option<&'static str> {
    let message = match key {
        EMPTY => "can't be empty",
        INVALID => "is invalid",
        ACCEPTED => "must be accepted",
        CONFIRMATION => "doesn't match %{attribute}",
        TOO_LONG => "is too long (maximum is %{count} characters)",
        TOO_SHORT => "is too short (minimum is %{count} characters)",
        WRONG_LENGTH => "is the wrong length (should be %{count} characters)",
        GREATER_THAN_OR_EQUAL_TO => "must be greater than or equal to %{count}",
        LESS_THAN_OR_EQUAL_TO => "must be less than or equal to %{count}",
        TAKEN => "has already been taken",
        _ => return None,
    };
    Some(message)
}

/// Resolve a key, falling back to the key itself when the lookup has no entry.
pub(crate) fn resolve(lookup: &dyn MessageLookup, key: &str) -> String {
    lookup.lookup(key).unwrap_or_else(|| key.to_string())
}

/// Replace `%{name}` placeholders with their values.
pub fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_messages() {
        let messages = DefaultMessages::new();
        assert_eq!(messages.lookup(EMPTY).as_deref(), Some("can't be empty"));
        assert_eq!(messages.lookup(ACCEPTED).as_deref(), Some("must be accepted"));
        assert_eq!(messages.lookup("errors.messages.unknown"), None);
    }

    #[test]
    fn test_override_wins() {
        let messages = DefaultMessages::new().with(INVALID, "looks wrong");
        assert_eq!(messages.lookup(INVALID).as_deref(), Some("looks wrong"));
        assert_eq!(messages.lookup(EMPTY).as_deref(), Some("can't be empty"));
    }

    #[test]
    fn test_resolve_falls_back_to_key() {
        let messages = DefaultMessages::new();
        assert_eq!(resolve(&messages, "custom.key"), "custom.key");
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("doesn't match %{attribute}", &[("attribute", "Password")]),
            "doesn't match Password"
        );
        assert_eq!(interpolate("no placeholders", &[("count", "3")]), "no placeholders");
        assert_eq!(
            interpolate("%{count} and %{count}", &[("count", "2")]),
            "2 and 2"
        );
    }
}
