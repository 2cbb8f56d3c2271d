//! The model: attributes, validation, touched tracking and events
//!
//! A [`Model`] is an instance of a [`ModelClass`]. It owns its attributes, runs the class's
//! validators and keeps the resulting [`Errors`] until the next pass.
//!
//! # Validation passes
//!
//! [`Model::validate`] resets the errors, runs every validator of the class (inherited
//! first), waits for all of them to settle, merges their errors in declaration order and
//! announces the result through events. It always completes with a [`Validity`]; failing
//! validation is reported through state and events, never as an error.
//!
//! ```
//! use tidewater::validator::Options;
//! use tidewater::{ClassBuilder, Model, Registry, ValidateOptions, Validity, Value};
//!
//! # tokio_test::block_on(async {
//! let mut registry = Registry::new();
//! let product = registry
//!     .register(
//!         ClassBuilder::new("Product")
//!             .validates("name", "presence", Options::new())
//!             .validates("price", "range", Options::new().min(0)),
//!     )
//!     .unwrap();
//!
//! let mut model = Model::new(&product, [("name", Value::from("")), ("price", Value::from(-1))]);
//! assert_eq!(model.validate(ValidateOptions::default()).await, Validity::Invalid);
//! assert_eq!(model.errors().on("name"), ["can't be empty"]);
//! assert_eq!(model.errors().on("price"), ["must be greater than or equal to 0"]);
//! # });
//! ```

use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;

use crate::events::{Emitter, Event};
use crate::registry::ModelClass;
use crate::value::ToJson;
use crate::{Errors, Semigroup, Value};

/// Options for a validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Update errors without emitting any event.
    pub silent: bool,
}

impl ValidateOptions {
    /// A pass that emits no events.
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Options for setting an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Store the value without marking it touched or emitting change events.
    pub clean: bool,
}

impl SetOptions {
    /// Set without side effects.
    pub fn clean() -> Self {
        Self { clean: true }
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// No attribute has errors.
    Valid,
    /// At least one attribute has errors.
    Invalid,
}

impl Validity {
    /// True for [`Validity::Valid`].
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// An instance of a model class.
#[derive(Debug, Clone)]
pub struct Model {
    class: Arc<ModelClass>,
    attributes: IndexMap<String, Value>,
    errors: Errors,
    touched: IndexMap<String, bool>,
    events: Emitter,
}

impl Model {
    /// Create a model with initial attributes.
    ///
    /// Initial attributes are stored clean: nothing is touched and no change event fires.
    pub fn new<I, K, V>(class: &Arc<ModelClass>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_events(class, attributes, Emitter::new())
    }

    /// Create a model whose handlers are registered before construction finishes, so they
    /// observe `initialized`.
    pub fn with_events<I, K, V>(class: &Arc<ModelClass>, attributes: I, events: Emitter) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut model = Self {
            class: Arc::clone(class),
            attributes: IndexMap::new(),
            errors: Errors::new(),
            touched: IndexMap::new(),
            events,
        };
        for (name, value) in attributes {
            model.set(name, value, SetOptions::clean());
        }
        model.events.emit(&Event::Initialized);
        model
    }

    /// The model's class.
    pub fn class(&self) -> &Arc<ModelClass> {
        &self.class
    }

    /// An attribute's value; `None` when it was never set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Every stored attribute, in the order first set.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Store an attribute.
    ///
    /// Unless `options.clean` is set, the attribute is marked touched and `change:{name}`
    /// then `change` are emitted.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>, options: SetOptions) {
        let name = name.into();
        self.attributes.insert(name.clone(), value.into());
        if options.clean {
            return;
        }

        self.touch(&name);
        if let Some(value) = self.attributes.get(&name) {
            self.events.emit(&Event::AttributeChanged {
                attribute: &name,
                value,
            });
        }
        self.events.emit(&Event::Changed);
    }

    /// Mass-assign external input. Only attributes the class declares accessible are set;
    /// the names actually assigned are returned.
    pub fn assign<I, K, V>(&mut self, attributes: I) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut assigned = Vec::new();
        for (name, value) in attributes {
            let name = name.into();
            if self.class.is_accessible(&name) {
                self.set(name.clone(), value, SetOptions::default());
                assigned.push(name);
            } else {
                tracing::debug!(
                    class = %self.class.name(),
                    attribute = %name,
                    "ignoring assignment to attribute that is not accessible"
                );
            }
        }
        assigned
    }

    /// Subscribe to a model event.
    pub fn on<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.events.on(name, handler);
        self
    }

    /// Drop every handler for an event name.
    pub fn off(&mut self, name: &str) -> usize {
        self.events.off(name)
    }

    /// Run every validator of the class and wait for all of them to settle.
    ///
    /// Unless the pass is silent, `validate` is emitted first, then `invalid:{attribute}`
    /// for each attribute with errors, then a single `valid` or `invalid`.
    ///
    /// A validator whose pending outcome never settles keeps this future from completing;
    /// there is no timeout.
    pub async fn validate(&mut self, options: ValidateOptions) -> Validity {
        self.begin(options);

        let class = Arc::clone(&self.class);
        let results = {
            let subject: &Model = self;
            join_all(
                class
                    .validators()
                    .iter()
                    .map(|validator| validator.validate(subject).settle()),
            )
            .await
        };

        self.finish(results, options)
    }

    /// Run a validation pass without waiting.
    ///
    /// Pending outcomes are polled once; any that are not ready are dropped, so the answer
    /// only reflects asynchronous rules that settle immediately. Use [`Model::validate`]
    /// when a class has remote rules.
    pub fn is_valid(&mut self, options: ValidateOptions) -> bool {
        self.begin(options);

        let class = Arc::clone(&self.class);
        let results: Vec<Errors> = {
            let subject: &Model = self;
            class
                .validators()
                .iter()
                .filter_map(|validator| {
                    let settled = validator.validate(subject).now_or_never();
                    if settled.is_none() {
                        tracing::warn!(
                            class = %class.name(),
                            attribute = %validator.attribute(),
                            "dropping unsettled validator in synchronous validity check"
                        );
                    }
                    settled
                })
                .collect()
        };

        self.finish(results, options).is_valid()
    }

    fn begin(&mut self, options: ValidateOptions) {
        self.errors = Errors::new();
        tracing::debug!(
            class = %self.class.name(),
            validators = self.class.validators().len(),
            silent = options.silent,
            "validation pass started"
        );
        if !options.silent {
            self.events.emit(&Event::Validate);
        }
    }

    fn finish(&mut self, results: Vec<Errors>, options: ValidateOptions) -> Validity {
        self.errors = results.into_iter().fold(Errors::new(), Semigroup::combine);

        let validity = if self.errors.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        tracing::debug!(
            class = %self.class.name(),
            invalid_attributes = self.errors.len(),
            ?validity,
            "validation pass finished"
        );

        if !options.silent {
            for (attribute, messages) in self.errors.iter() {
                self.events.emit(&Event::InvalidAttribute {
                    attribute,
                    messages,
                });
            }
            match validity {
                Validity::Valid => self.events.emit(&Event::Valid),
                Validity::Invalid => self.events.emit(&Event::Invalid(&self.errors)),
            }
        }

        validity
    }

    /// Errors from the latest pass, plus any added since.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Messages recorded against one attribute.
    pub fn errors_on(&self, name: &str) -> &[String] {
        self.errors.on(name)
    }

    /// Every message, prefixed with its humanized attribute name.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }

    /// Record an error against an attribute.
    pub fn add_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    /// Record an error against the whole model.
    pub fn add_error_to_base(&mut self, message: impl Into<String>) {
        self.errors.add_to_base(message);
    }

    /// Drop every recorded error.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// True when every named attribute (every stored attribute, if `names` is empty) is
    /// absent, null or the empty string.
    pub fn is_blank(&self, names: &[&str]) -> bool {
        fn blank(value: Option<&Value>) -> bool {
            match value {
                None | Some(Value::Null) => true,
                Some(Value::Text(text)) => text.is_empty(),
                Some(_) => false,
            }
        }

        if names.is_empty() {
            self.attributes.values().all(|value| blank(Some(value)))
        } else {
            names.iter().all(|name| blank(self.get(name)))
        }
    }

    /// Mark an attribute as modified by the user.
    pub fn touch(&mut self, name: &str) {
        self.touched.insert(name.to_string(), true);
        self.events.emit(&Event::Touched(name));
    }

    /// Clear an attribute's touched flag.
    pub fn untouch(&mut self, name: &str) {
        self.touched.insert(name.to_string(), false);
        self.events.emit(&Event::Untouched(name));
    }

    /// Whether an attribute has been touched.
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.get(name).copied().unwrap_or(false)
    }

    /// Names of touched attributes.
    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.touched
            .iter()
            .filter(|(_, touched)| **touched)
            .map(|(name, _)| name.as_str())
    }

    /// Untouch an attribute and set it to null.
    pub fn reset(&mut self, name: &str) {
        self.untouch(name);
        self.set(name, Value::Null, SetOptions::clean());
    }

    /// JSON snapshot of every stored attribute. Nested values contribute their own
    /// snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl ToJson for Model {
    fn to_json(&self) -> serde_json::Value {
        Model::to_json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Options;
    use crate::{ClassBuilder, Registry};
    use serde_json::json;
    use std::sync::Mutex;

    fn signup() -> Arc<ModelClass> {
        let mut registry = Registry::new();
        registry
            .register(
                ClassBuilder::new("Signup")
                    .accessible(["email", "password", "password_confirmation"])
                    .validates("email", "presence", Options::new())
                    .validates("password", "confirmation", Options::new()),
            )
            .unwrap()
    }

    fn recorder(model: &mut Model, names: &[&str]) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in names {
            let log = Arc::clone(&log);
            model.on(*name, move |event: &Event<'_>| {
                log.lock().unwrap().push(event.name());
            });
        }
        log
    }

    #[test]
    fn test_construction_is_clean() {
        let model = Model::new(&signup(), [("email", "a@b.c"), ("password", "x")]);

        assert_eq!(model.get("email"), Some(&Value::from("a@b.c")));
        assert_eq!(model.get("password"), Some(&Value::from("x")));
        assert!(!model.is_touched("email"));
        assert_eq!(model.touched().count(), 0);
    }

    #[test]
    fn test_initialized_is_observable_with_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut events = Emitter::new();
        events.on("initialized", move |event: &Event<'_>| {
            sink.lock().unwrap().push(event.name());
        });
        events.on("change", |_: &Event<'_>| panic!("construction must not emit change"));

        Model::with_events(&signup(), [("email", "a@b.c")], events);

        assert_eq!(*log.lock().unwrap(), vec!["initialized"]);
    }

    #[test]
    fn test_set_touches_and_emits_change() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());
        let log = recorder(&mut model, &["touched:email", "change:email", "change"]);

        model.set("email", "a@b.c", SetOptions::default());

        assert!(model.is_touched("email"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["touched:email", "change:email", "change"]
        );
    }

    #[test]
    fn test_clean_set_has_no_side_effects() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());
        let log = recorder(&mut model, &["touched:email", "change:email", "change"]);

        model.set("email", "a@b.c", SetOptions::clean());

        assert!(!model.is_touched("email"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_assign_respects_accessible_list() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());

        let assigned = model.assign([("email", "a@b.c"), ("admin", "true")]);

        assert_eq!(assigned, vec!["email".to_string()]);
        assert!(model.get("admin").is_none());
        assert!(model.is_touched("email"));
    }

    #[test]
    fn test_is_valid_matches_errors() {
        let mut invalid = Model::new(&signup(), [("password", "x")]);
        assert!(!invalid.is_valid(ValidateOptions::default()));
        assert!(!invalid.errors().is_empty());

        let mut valid = Model::new(
            &signup(),
            [
                ("email", "a@b.c"),
                ("password", "x"),
                ("password_confirmation", "x"),
            ],
        );
        assert!(valid.is_valid(ValidateOptions::default()));
        assert!(valid.errors().is_empty());
    }

    #[test]
    fn test_errors_reset_each_pass() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());
        model.add_error_to_base("stale");
        assert!(!model.is_valid(ValidateOptions::default()));
        assert!(model.errors().base().is_empty());

        model.set("email", "a@b.c", SetOptions::default());
        assert!(model.is_valid(ValidateOptions::default()));
    }

    #[test]
    fn test_add_error_appends() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());
        model.add_error("email", "first");
        model.add_error("email", "second");
        model.add_error_to_base("whole");

        assert_eq!(model.errors().on("email"), ["first", "second"]);
        assert_eq!(model.errors().base(), ["whole"]);

        model.clear_errors();
        assert!(model.errors().is_empty());
    }

    #[test]
    fn test_is_blank() {
        let model = Model::new(
            &signup(),
            [
                ("email", Value::from("")),
                ("password", Value::Null),
                ("password_confirmation", Value::from("x")),
            ],
        );

        assert!(model.is_blank(&["email", "password", "missing"]));
        assert!(!model.is_blank(&["email", "password_confirmation"]));
        assert!(!model.is_blank(&[]));

        let empty = Model::new(&signup(), [("email", "")]);
        assert!(empty.is_blank(&[]));
    }

    #[test]
    fn test_touch_untouch_reset() {
        let mut model = Model::new(&signup(), [("email", "a@b.c")]);
        let log = recorder(&mut model, &["touched:email", "untouched:email"]);

        model.touch("email");
        assert!(model.is_touched("email"));

        model.reset("email");
        assert!(!model.is_touched("email"));
        assert_eq!(model.get("email"), Some(&Value::Null));
        assert_eq!(*log.lock().unwrap(), vec!["touched:email", "untouched:email"]);
    }

    #[test]
    fn test_touched_survives_validation() {
        let mut model = Model::new(&signup(), Vec::<(String, Value)>::new());
        model.touch("email");
        model.is_valid(ValidateOptions::default());
        assert!(model.is_touched("email"));
    }

    #[test]
    fn test_to_json_snapshot() {
        let model = Model::new(
            &signup(),
            [("email", Value::from("a@b.c")), ("age", Value::from(30))],
        );
        assert_eq!(model.to_json(), json!({ "email": "a@b.c", "age": 30 }));
    }

    #[test]
    fn test_to_json_ignores_accessible_list() {
        let model = Model::new(&signup(), [("internal", 1)]);
        assert_eq!(model.to_json(), json!({ "internal": 1 }));
    }

    #[test]
    fn test_nested_model_serializes_as_snapshot() {
        let inner = Model::new(&signup(), [("email", "inner@b.c")]);
        let outer = Model::new(&signup(), [("owner", Value::nested(inner))]);

        assert_eq!(
            outer.to_json(),
            json!({ "owner": { "email": "inner@b.c" } })
        );
    }
}
