//! Semigroup trait for associative operations
//!
//! A Semigroup is a type with an associative binary operation. Validation passes use it to
//! merge the error mappings produced by independent validators: each validator settles on
//! its own [`Errors`](crate::Errors), and the model folds them together in declaration order.
//!
//! # Mathematical Properties
//!
//! For a type to be a valid Semigroup, the `combine` operation must be associative:
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```
//! use tidewater::{Errors, Semigroup};
//!
//! let mut left = Errors::new();
//! left.add("name", "can't be empty");
//!
//! let mut right = Errors::new();
//! right.add("name", "is invalid");
//! right.add("email", "is invalid");
//!
//! let merged = left.combine(right);
//! assert_eq!(merged.on("name"), ["can't be empty", "is invalid"]);
//! assert_eq!(merged.on("email"), ["is invalid"]);
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// Implementations must satisfy the associativity law:
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
///
/// # Note on Ownership
///
/// The `combine` method takes `self` by value, not by reference. If you need to
/// preserve the original values, you must clone them before combining.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}
