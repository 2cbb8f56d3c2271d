//! Model classes and their inheritance-aware registry
//!
//! A model class is declared with a [`ClassBuilder`] and resolved exactly once, when it is
//! registered: its effective validator sequence is the parent's resolved sequence followed
//! by its own declarations, and the same goes for accessible attributes and named
//! predicates. Registration never touches the parent, so a validator declared on a class is
//! visible to that class and its subclasses only.
//!
//! ```
//! use tidewater::validator::Options;
//! use tidewater::{ClassBuilder, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         ClassBuilder::new("User")
//!             .accessible(["email"])
//!             .validates("email", "presence", Options::new()),
//!     )
//!     .unwrap();
//! registry
//!     .register(
//!         ClassBuilder::new("Admin")
//!             .extends("User")
//!             .accessible(["email", "role"])
//!             .validates("role", "presence", Options::new()),
//!     )
//!     .unwrap();
//!
//! assert_eq!(registry.validators_for("User").unwrap().len(), 1);
//! assert_eq!(registry.validators_for("Admin").unwrap().len(), 2);
//!
//! let admin = registry.get("Admin").unwrap();
//! assert_eq!(admin.accessible().collect::<Vec<_>>(), vec!["email", "role"]);
//! assert!(admin.is_a("User"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::DeclarationError;
use crate::messages::{DefaultMessages, MessageLookup};
use crate::predicate::Predicate;
use crate::validator::{Options, RuleKind, Validator};
use crate::Model;

enum Declaration {
    Built(Validator),
    ByName {
        attribute: String,
        kind: String,
        options: Options,
    },
}

/// Declaration of a model class, resolved by [`Registry::register`].
pub struct ClassBuilder {
    name: String,
    parent: Option<String>,
    declarations: Vec<Declaration>,
    accessible: Vec<String>,
    predicates: IndexMap<String, Arc<dyn Predicate<Model>>>,
}

impl ClassBuilder {
    /// Start declaring a class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            declarations: Vec::new(),
            accessible: Vec::new(),
            predicates: IndexMap::new(),
        }
    }

    /// Inherit from a registered class.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Append a validator to this class's own declarations.
    ///
    /// The validator keeps the messages it was built with. A validator from
    /// [`Validator::new`] uses the built-in English defaults, not the lookup passed to
    /// [`Registry::with_messages`]; build it with [`Validator::with_messages`] to use that
    /// lookup, or declare it by name with [`ClassBuilder::validates`].
    pub fn add_validation(mut self, validator: Validator) -> Self {
        self.declarations.push(Declaration::Built(validator));
        self
    }

    /// Declare a validator by rule name, e.g. `"presence"` or `"format"`.
    ///
    /// The name is looked up when the class is registered; an unknown name fails
    /// registration with [`DeclarationError::UnknownRule`].
    pub fn validates(
        mut self,
        attribute: impl Into<String>,
        kind: impl Into<String>,
        options: Options,
    ) -> Self {
        self.declarations.push(Declaration::ByName {
            attribute: attribute.into(),
            kind: kind.into(),
            options,
        });
        self
    }

    /// Declare attributes as externally settable. Names already declared, here or on an
    /// ancestor, are ignored.
    pub fn accessible<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.accessible.contains(&name) {
                self.accessible.push(name);
            }
        }
        self
    }

    /// Declare a named predicate that validators can refer to with
    /// [`Options::when_method`]. A subclass may override a parent's predicate by name.
    pub fn predicate<P>(mut self, name: impl Into<String>, predicate: P) -> Self
    where
        P: Predicate<Model> + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    fn resolve(
        self,
        parent: Option<Arc<ModelClass>>,
        messages: &dyn MessageLookup,
    ) -> Result<ModelClass, DeclarationError> {
        let mut predicates = parent
            .as_ref()
            .map(|p| p.predicates.clone())
            .unwrap_or_default();
        predicates.extend(self.predicates);

        let mut validators = parent
            .as_ref()
            .map(|p| p.validators.clone())
            .unwrap_or_default();
        let inherited = validators.len();

        for declaration in self.declarations {
            let mut validator = match declaration {
                Declaration::Built(validator) => validator,
                Declaration::ByName {
                    attribute,
                    kind,
                    options,
                } => {
                    let kind: RuleKind = kind.parse()?;
                    Validator::with_messages(kind, attribute, options, messages)?
                }
            };
            validator.resolve_condition(&predicates)?;
            validators.push(Arc::new(validator));
        }

        let mut accessible = parent
            .as_ref()
            .map(|p| p.accessible.clone())
            .unwrap_or_default();
        accessible.extend(self.accessible);

        Ok(ModelClass {
            name: self.name,
            parent,
            validators,
            inherited,
            accessible,
            predicates,
        })
    }
}

impl fmt::Debug for ClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("declarations", &self.declarations.len())
            .field("accessible", &self.accessible)
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A resolved model class.
pub struct ModelClass {
    name: String,
    parent: Option<Arc<ModelClass>>,
    validators: Vec<Arc<Validator>>,
    inherited: usize,
    accessible: IndexSet<String>,
    predicates: IndexMap<String, Arc<dyn Predicate<Model>>>,
}

impl ModelClass {
    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class, if any.
    pub fn parent(&self) -> Option<&Arc<ModelClass>> {
        self.parent.as_ref()
    }

    /// Parent, grandparent and so on.
    pub fn ancestors(&self) -> impl Iterator<Item = &ModelClass> {
        std::iter::successors(self.parent.as_deref(), |class| class.parent.as_deref())
    }

    /// Whether this class is `name` or inherits from it.
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.ancestors().any(|class| class.name == name)
    }

    /// Effective validator sequence: inherited validators first, then this class's own.
    pub fn validators(&self) -> &[Arc<Validator>] {
        &self.validators
    }

    /// Validators declared on this class itself.
    pub fn own_validators(&self) -> &[Arc<Validator>] {
        &self.validators[self.inherited..]
    }

    /// Externally settable attribute names, inherited first.
    pub fn accessible(&self) -> impl Iterator<Item = &str> {
        self.accessible.iter().map(String::as_str)
    }

    /// Whether an attribute is externally settable.
    pub fn is_accessible(&self, name: &str) -> bool {
        self.accessible.contains(name)
    }

    /// A named predicate declared on this class or inherited.
    pub fn predicate(&self, name: &str) -> Option<&Arc<dyn Predicate<Model>>> {
        self.predicates.get(name)
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("validators", &self.validators)
            .field("accessible", &self.accessible)
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registered model classes, keyed by name.
pub struct Registry {
    classes: IndexMap<String, Arc<ModelClass>>,
    messages: Arc<dyn MessageLookup>,
}

impl Registry {
    /// Empty registry using the default English messages.
    pub fn new() -> Self {
        Self::with_messages(DefaultMessages::new())
    }

    /// Empty registry resolving default messages through `messages`.
    pub fn with_messages<M: MessageLookup + 'static>(messages: M) -> Self {
        Self {
            classes: IndexMap::new(),
            messages: Arc::new(messages),
        }
    }

    /// Resolve and register a class.
    ///
    /// The parent, when declared, must already be registered.
    pub fn register(&mut self, builder: ClassBuilder) -> Result<Arc<ModelClass>, DeclarationError> {
        if self.classes.contains_key(&builder.name) {
            return Err(DeclarationError::DuplicateClass(builder.name));
        }

        let parent = match &builder.parent {
            Some(parent) => Some(self.classes.get(parent).cloned().ok_or_else(|| {
                DeclarationError::UnknownParent {
                    class: builder.name.clone(),
                    parent: parent.clone(),
                }
            })?),
            None => None,
        };

        let class = Arc::new(builder.resolve(parent, self.messages.as_ref())?);
        tracing::debug!(
            class = %class.name,
            parent = ?class.parent.as_ref().map(|p| p.name()),
            validators = class.validators.len(),
            own = class.own_validators().len(),
            "registered model class"
        );

        self.classes
            .insert(class.name.clone(), Arc::clone(&class));
        Ok(class)
    }

    /// A registered class.
    pub fn get(&self, name: &str) -> Option<&Arc<ModelClass>> {
        self.classes.get(name)
    }

    /// Effective validator sequence of a registered class.
    pub fn validators_for(&self, name: &str) -> Option<&[Arc<Validator>]> {
        self.get(name).map(|class| class.validators())
    }

    /// Names of registered classes, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
