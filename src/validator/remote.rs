//! Remote rule
//!
//! Checks that need an external answer, such as a server-side uniqueness lookup, run as
//! futures. The model joins them with every other validator's outcome before it reports.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::{Options, Outcome, RuleKind};
use crate::error::DeclarationError;
use crate::messages::{self, MessageLookup};
use crate::{Errors, Model, Value};

/// Asynchronous check; resolves `true` when the value is acceptable.
pub type RemoteCheck = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;

/// Fails when the asynchronous check resolves `false`.
///
/// Absent and null values are not sent to the check.
#[derive(Clone)]
pub struct Remote {
    check: RemoteCheck,
    message: String,
}

impl Remote {
    pub(crate) fn from_options(
        attribute: &str,
        options: &Options,
        lookup: &dyn MessageLookup,
    ) -> Result<Self, DeclarationError> {
        let check = options
            .remote
            .clone()
            .ok_or_else(|| DeclarationError::MissingOption {
                kind: RuleKind::Remote,
                attribute: attribute.to_string(),
                option: "a check (`remote`)",
            })?;

        Ok(Self {
            check,
            message: options
                .message
                .clone()
                .unwrap_or_else(|| messages::resolve(lookup, messages::TAKEN)),
        })
    }

    pub(crate) fn start(&self, attribute: &str, subject: &Model) -> Outcome<'static> {
        let value = match subject.get(attribute) {
            None | Some(Value::Null) => return Outcome::Skipped,
            Some(value) => value.clone(),
        };

        let pending = (self.check)(value);
        let attribute = attribute.to_string();
        let message = self.message.clone();
        Outcome::Pending(
            async move {
                let mut errors = Errors::new();
                if !pending.await {
                    errors.add(attribute, message);
                }
                errors
            }
            .boxed(),
        )
    }
}

impl fmt::Debug for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remote")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
