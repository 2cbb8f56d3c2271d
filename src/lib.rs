//! # Tidewater
//!
//! Declarative, inheritable validation for dynamically typed models.
//!
//! A model class declares its validators once, through a [`Registry`]. Subclasses extend
//! their parent's validator list without touching it. Each [`Model`] instance holds its
//! attributes, runs the class's validators on demand and reports the result through its
//! [`Errors`] and named events.
//!
//! Validators can be synchronous (presence, format, range, acceptance, length,
//! confirmation, custom checks) or asynchronous (remote checks). A validation pass waits
//! for all of them and merges their errors in declaration order.
//!
//! ## Quick Example
//!
//! ```rust
//! use tidewater::validator::Options;
//! use tidewater::{ClassBuilder, Model, Registry, ValidateOptions, Value};
//!
//! # tokio_test::block_on(async {
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         ClassBuilder::new("User")
//!             .accessible(["email", "password", "password_confirmation"])
//!             .validates("email", "presence", Options::new())
//!             .validates("email", "format", Options::new().with(r"^[^@\s]+@[^@\s]+$"))
//!             .validates("password", "confirmation", Options::new()),
//!     )
//!     .unwrap();
//! let admin = registry
//!     .register(
//!         ClassBuilder::new("Admin")
//!             .extends("User")
//!             .validates("role", "presence", Options::new()),
//!     )
//!     .unwrap();
//!
//! let mut model = Model::new(&admin, Vec::<(String, Value)>::new());
//! model.assign([
//!     ("email", "ada@example.com"),
//!     ("password", "secret"),
//!     ("password_confirmation", "secret"),
//! ]);
//!
//! let validity = model.validate(ValidateOptions::default()).await;
//! assert!(!validity.is_valid());
//! assert_eq!(model.full_messages(), vec!["Role can't be empty"]);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod errors;
pub mod events;
pub mod messages;
pub mod model;
pub mod predicate;
pub mod registry;
pub mod semigroup;
pub mod testing;
pub mod validator;
pub mod value;

// Re-exports
pub use error::DeclarationError;
pub use errors::{Errors, BASE};
pub use events::{Emitter, Event};
pub use model::{Model, SetOptions, ValidateOptions, Validity};
pub use registry::{ClassBuilder, ModelClass, Registry};
pub use semigroup::Semigroup;
pub use validator::{Options, RuleKind, Validator};
pub use value::{ToJson, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::DeclarationError;
    pub use crate::errors::Errors;
    pub use crate::events::Event;
    pub use crate::model::{Model, SetOptions, ValidateOptions, Validity};
    pub use crate::predicate::{Predicate, PredicateExt};
    pub use crate::registry::{ClassBuilder, Registry};
    pub use crate::validator::{Check, Options};
    pub use crate::value::Value;
}
