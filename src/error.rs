//! Error types used by subjects, registries and subscribers.
//!
//! This module defines three error families:
//!
//! - [`ValidationError`]: a value was rejected by [`Subject::set_state`](crate::Subject::set_state).
//! - [`NotFoundError`]: a subscriber was not registered when asked to leave.
//! - [`ReactionError`]: a subscriber's reaction failed during fan-out.
//!
//! All of them provide `as_label` (stable snake_case) for logs and diagnostic events.

use thiserror::Error;

/// # Errors produced when a value cannot enter the state domain.
///
/// The state is left untouched and no notification happens.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Text input is not an integer literal.
    #[error("not an integer: {input:?}")]
    NotAnInteger {
        /// The rejected input, as given.
        input: String,
    },

    /// Floating point input is NaN or infinite.
    #[error("non-finite number: {value}")]
    NonFinite {
        /// The rejected input.
        value: f64,
    },

    /// Input does not fit the 64-bit signed domain.
    #[error("value {value} does not fit into i64")]
    Overflow {
        /// Textual form of the rejected input.
        value: String,
    },

    /// Input is integral but outside the configured bounds.
    #[error("value {value} outside bounds [{min}, {max}]")]
    OutOfRange {
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl ValidationError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use statecast::ValidationError;
    ///
    /// let err = ValidationError::NotAnInteger { input: "abc".into() };
    /// assert_eq!(err.as_label(), "validation_not_an_integer");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ValidationError::NotAnInteger { .. } => "validation_not_an_integer",
            ValidationError::NonFinite { .. } => "validation_non_finite",
            ValidationError::Overflow { .. } => "validation_overflow",
            ValidationError::OutOfRange { .. } => "validation_out_of_range",
        }
    }

    /// Returns the rejected input and the reason, without a category prefix.
    ///
    /// Used as the reason of `ValidationRejected` diagnostic events.
    pub fn as_message(&self) -> String {
        match self {
            ValidationError::NotAnInteger { input } => format!("{input:?} is not an integer"),
            ValidationError::NonFinite { value } => format!("{value} is not finite"),
            ValidationError::Overflow { value } => format!("{value} does not fit into i64"),
            ValidationError::OutOfRange { value, min, max } => {
                format!("{value} outside bounds [{min}, {max}]")
            }
        }
    }
}

/// A subscriber was asked to leave a registry it is not a member of.
///
/// Recoverable: the caller decides whether to log or ignore it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("subscriber {subscriber:?} is not registered")]
pub struct NotFoundError {
    /// Name of the subscriber (see [`Subscribe::name`](crate::Subscribe::name)).
    pub subscriber: &'static str,
}

impl NotFoundError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        "subscriber_not_found"
    }
}

/// # Errors produced by a subscriber reaction.
///
/// A reaction error never escapes the fan-out: it is logged, published to the
/// subject's [`Bus`](crate::Bus), and delivery continues with the next subscriber.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReactionError {
    /// The subscriber reported a failure.
    #[error("reaction failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The subscriber panicked; the panic was caught at the fan-out boundary.
    #[error("reaction panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl ReactionError {
    /// Shorthand for [`ReactionError::Failed`].
    ///
    /// # Example
    /// ```
    /// use statecast::ReactionError;
    ///
    /// let err = ReactionError::fail("disk full");
    /// assert_eq!(err.to_string(), "reaction failed: disk full");
    /// ```
    pub fn fail(reason: impl Into<String>) -> Self {
        ReactionError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReactionError::Failed { .. } => "reaction_failed",
            ReactionError::Panicked { .. } => "reaction_panicked",
        }
    }

    /// Returns the bare reason without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            ReactionError::Failed { reason } => reason,
            ReactionError::Panicked { info } => info,
        }
    }
}
