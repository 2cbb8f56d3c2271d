//! Assertion macros for model tests
//!
//! The macros inspect a model's current errors; run a validation pass first.
//!
//! ```rust
//! use tidewater::validator::Options;
//! use tidewater::{assert_errors, assert_invalid, assert_valid};
//! use tidewater::{ClassBuilder, Model, Registry, ValidateOptions, Value};
//!
//! let mut registry = Registry::new();
//! let class = registry
//!     .register(ClassBuilder::new("Post").validates("title", "presence", Options::new()))
//!     .unwrap();
//!
//! let mut post = Model::new(&class, [("title", "")]);
//! post.is_valid(ValidateOptions::default());
//! assert_invalid!(post, "title");
//! assert_errors!(post, "title", ["can't be empty"]);
//!
//! post.set("title", Value::from("Hello"), Default::default());
//! post.is_valid(ValidateOptions::default());
//! assert_valid!(post);
//! ```

/// Assert that a model has no errors.
///
/// # Example
///
/// ```rust
/// use tidewater::{assert_valid, ClassBuilder, Model, Registry};
///
/// let mut registry = Registry::new();
/// let class = registry.register(ClassBuilder::new("Empty")).unwrap();
/// let model = Model::new(&class, [("name", "x")]);
/// assert_valid!(model);
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($model:expr) => {{
        let model = &$model;
        let errors = model.errors();
        if !errors.is_empty() {
            panic!("Expected valid model, got errors: {:?}", errors);
        }
    }};
}

/// Assert that a model has errors, optionally on a specific attribute.
///
/// # Example
///
/// ```rust
/// use tidewater::{assert_invalid, ClassBuilder, Model, Registry};
///
/// let mut registry = Registry::new();
/// let class = registry.register(ClassBuilder::new("Empty")).unwrap();
/// let mut model = Model::new(&class, [("name", "x")]);
/// model.add_error("name", "is reserved");
/// assert_invalid!(model);
/// assert_invalid!(model, "name");
/// ```
#[macro_export]
macro_rules! assert_invalid {
    ($model:expr) => {{
        if $model.errors().is_empty() {
            panic!("Expected invalid model, got no errors");
        }
    }};
    ($model:expr, $attribute:expr) => {{
        let model = &$model;
        let errors = model.errors();
        if !errors.contains($attribute) {
            panic!(
                "Expected errors on `{}`, got: {:?}",
                $attribute, errors
            );
        }
    }};
}

/// Assert the exact messages recorded against one attribute.
///
/// # Example
///
/// ```rust
/// use tidewater::{assert_errors, ClassBuilder, Model, Registry};
///
/// let mut registry = Registry::new();
/// let class = registry.register(ClassBuilder::new("Empty")).unwrap();
/// let mut model = Model::new(&class, [("name", "x")]);
/// model.add_error("name", "is reserved");
/// assert_errors!(model, "name", ["is reserved"]);
/// ```
#[macro_export]
macro_rules! assert_errors {
    ($model:expr, $attribute:expr, $expected:expr) => {{
        let actual: Vec<String> = $model.errors().on($attribute).to_vec();
        let expected: Vec<String> = $expected.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            actual, expected,
            "messages on `{}` did not match",
            $attribute
        );
    }};
}

#[cfg(test)]
mod tests {
    use crate::validator::Options;
    use crate::{ClassBuilder, Model, Registry, ValidateOptions};

    fn post(title: &str) -> Model {
        let mut registry = Registry::new();
        let class = registry
            .register(
                ClassBuilder::new("Post")
                    .validates("title", "presence", Options::new())
                    .validates("title", "length", Options::new().minimum(3)),
            )
            .unwrap();
        let mut model = Model::new(&class, [("title", title)]);
        model.is_valid(ValidateOptions::default());
        model
    }

    #[test]
    fn assert_valid_macro() {
        assert_valid!(post("Hello"));
    }

    #[test]
    fn assert_invalid_macro() {
        let model = post("");
        assert_invalid!(model);
        assert_invalid!(model, "title");
    }

    #[test]
    fn assert_errors_macro() {
        assert_errors!(
            post(""),
            "title",
            [
                "can't be empty",
                "is too short (minimum is 3 characters)"
            ]
        );
    }

    #[test]
    #[should_panic(expected = "Expected valid model")]
    fn assert_valid_panics_on_errors() {
        assert_valid!(post(""));
    }

    #[test]
    #[should_panic(expected = "Expected invalid model")]
    fn assert_invalid_panics_when_valid() {
        assert_invalid!(post("Hello"));
    }

    #[test]
    #[should_panic(expected = "Expected errors on `body`")]
    fn assert_invalid_panics_on_clean_attribute() {
        assert_invalid!(post(""), "body");
    }

    #[test]
    #[should_panic(expected = "messages on `title` did not match")]
    fn assert_errors_panics_on_mismatch() {
        assert_errors!(post("Hi"), "title", ["can't be empty"]);
    }
}
