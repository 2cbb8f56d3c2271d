//! Named event emission
//!
//! A minimal observer facility: handlers subscribe by event name and receive the emitted
//! [`Event`]. Models use it to announce lifecycle and validation progress.
//!
//! | Event | Name |
//! |---|---|
//! | construction finished | `initialized` |
//! | validation pass started | `validate` |
//! | pass finished without errors | `valid` |
//! | pass finished with errors | `invalid` |
//! | one attribute has errors | `invalid:{attribute}` |
//! | attribute marked touched | `touched:{attribute}` |
//! | attribute marked untouched | `untouched:{attribute}` |
//! | attribute set | `change:{attribute}`, then `change` |
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use tidewater::events::{Emitter, Event};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut emitter = Emitter::new();
//! emitter.on("touched:email", move |event: &Event<'_>| {
//!     sink.lock().unwrap().push(event.name());
//! });
//!
//! emitter.emit(&Event::Touched("email"));
//! emitter.emit(&Event::Touched("name"));
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["touched:email".to_string()]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{Errors, Value};

/// Something that happened to a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// The model finished construction.
    Initialized,
    /// A non-silent validation pass started.
    Validate,
    /// A non-silent validation pass finished without errors.
    Valid,
    /// A non-silent validation pass finished with errors.
    Invalid(&'a Errors),
    /// An attribute has errors after a non-silent pass.
    InvalidAttribute {
        /// The attribute
        attribute: &'a str,
        /// Its messages
        messages: &'a [String],
    },
    /// An attribute was marked touched.
    Touched(&'a str),
    /// An attribute was marked untouched.
    Untouched(&'a str),
    /// An attribute was set outside of construction.
    AttributeChanged {
        /// The attribute
        attribute: &'a str,
        /// Its new value
        value: &'a Value,
    },
    /// Any attribute was set outside of construction.
    Changed,
}

impl Event<'_> {
    /// The name handlers subscribe to.
    pub fn name(&self) -> String {
        match self {
            Event::Initialized => "initialized".to_string(),
            Event::Validate => "validate".to_string(),
            Event::Valid => "valid".to_string(),
            Event::Invalid(_) => "invalid".to_string(),
            Event::InvalidAttribute { attribute, .. } => format!("invalid:{}", attribute),
            Event::Touched(attribute) => format!("touched:{}", attribute),
            Event::Untouched(attribute) => format!("untouched:{}", attribute),
            Event::AttributeChanged { attribute, .. } => format!("change:{}", attribute),
            Event::Changed => "change".to_string(),
        }
    }
}

/// Event handler.
pub type Handler = Arc<dyn Fn(&Event<'_>) + Send + Sync>;

/// Subscribe-by-name, emit-by-name observer registry.
#[derive(Clone, Default)]
pub struct Emitter {
    handlers: HashMap<String, Vec<Handler>>,
}

impl Emitter {
    /// Create an emitter with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event name.
    pub fn on<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.handlers
            .entry(name.into())
            .or_default()
            .push(Arc::new(handler));
        self
    }

    /// Remove every handler for an event name, returning how many were removed.
    pub fn off(&mut self, name: &str) -> usize {
        self.handlers.remove(name).map_or(0, |handlers| handlers.len())
    }

    /// Number of handlers registered for an event name.
    pub fn listener_count(&self, name: &str) -> usize {
        self.handlers.get(name).map_or(0, Vec::len)
    }

    /// Call every handler registered for the event's name, in registration order.
    pub fn emit(&self, event: &Event<'_>) {
        if let Some(handlers) = self.handlers.get(&event.name()) {
            for handler in handlers {
                handler(event);
            }
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(name, handlers)| (name.as_str(), handlers.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Emitter").field("handlers", &counts).finish()
    }
}
