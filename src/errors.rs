//! Per-attribute error mapping
//!
//! [`Errors`] maps an attribute name to the ordered list of messages recorded against it.
//! Whole-object errors live under the reserved [`BASE`] key.
//!
//! # Examples
//!
//! ```
//! use tidewater::Errors;
//!
//! let mut errors = Errors::new();
//! errors.add("password_confirmation", "doesn't match Password");
//! errors.add_to_base("Order cannot be empty");
//!
//! assert_eq!(errors.len(), 2);
//! assert_eq!(
//!     errors.full_messages(),
//!     vec![
//!         "Password confirmation doesn't match Password".to_string(),
//!         "Order cannot be empty".to_string(),
//!     ]
//! );
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::Semigroup;

/// Reserved key for errors that belong to the whole object rather than one attribute.
pub const BASE: &str = "base";

/// Ordered mapping from attribute name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    entries: IndexMap<String, Vec<String>>,
}

impl Errors {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to an attribute's list.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// Append a whole-object message.
    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    /// Messages for an attribute, if it has any.
    pub fn get(&self, attribute: &str) -> Option<&[String]> {
        self.entries.get(attribute).map(Vec::as_slice)
    }

    /// Messages for an attribute; empty when it has none.
    pub fn on(&self, attribute: &str) -> &[String] {
        self.get(attribute).unwrap_or(&[])
    }

    /// Whole-object messages.
    pub fn base(&self) -> &[String] {
        self.on(BASE)
    }

    /// Whether the attribute has at least one message.
    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    /// True when no attribute has errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attributes with errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of messages across all attributes.
    pub fn count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Attributes with errors, in the order their first error was recorded.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(attribute, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(attribute, messages)| (attribute.as_str(), messages.as_slice()))
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Messages prefixed with their humanized attribute name; base messages stay verbatim.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(attribute, messages)| {
                messages.iter().map(move |message| {
                    if attribute == BASE {
                        message.clone()
                    } else {
                        format!("{} {}", humanize(attribute), message)
                    }
                })
            })
            .collect()
    }
}

impl Semigroup for Errors {
    fn combine(mut self, other: Self) -> Self {
        for (attribute, messages) in other.entries {
            let existing = self.entries.entry(attribute).or_default();
            *existing = std::mem::take(existing).combine(messages);
        }
        self
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Turn an attribute name into a label: `password_confirmation` becomes
/// `Password confirmation`, `country_id` becomes `Country`.
pub fn humanize(attribute: &str) -> String {
    let trimmed = attribute.strip_suffix("_id").unwrap_or(attribute);
    let spaced = trimmed.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
