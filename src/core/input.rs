//! # Raw inputs accepted by `set_state`.
//!
//! [`StateInput`] is whatever a caller hands to
//! [`Subject::set_state`](crate::Subject::set_state) before it is coerced into
//! the integral state domain.
//!
//! ## Coercion rules
//! ```text
//! Int(i64)    → as is
//! Unsigned    → must fit i64, else Overflow
//! Float(f64)  → NaN/inf → NonFinite; truncated toward zero; must fit i64
//! Text        → surrounding whitespace trimmed; optional sign + digits;
//!               digits that overflow i64 → Overflow; anything else → NotAnInteger
//! ```
//! Bounds from [`SubjectConfig`](crate::SubjectConfig) are checked after coercion.

use std::num::IntErrorKind;
use std::ops::RangeInclusive;

use crate::error::ValidationError;

/// Raw value offered to a subject.
#[derive(Debug, Clone, PartialEq)]
pub enum StateInput {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// Textual integer literal.
    Text(String),
}

impl StateInput {
    /// Coerces into `i64` and checks `bounds`.
    pub(crate) fn validate(self, bounds: &RangeInclusive<i64>) -> Result<i64, ValidationError> {
        let value = self.coerce()?;
        if bounds.contains(&value) {
            Ok(value)
        } else {
            Err(ValidationError::OutOfRange {
                value,
                min: *bounds.start(),
                max: *bounds.end(),
            })
        }
    }

    fn coerce(self) -> Result<i64, ValidationError> {
        match self {
            StateInput::Int(v) => Ok(v),
            StateInput::Unsigned(v) => i64::try_from(v).map_err(|_| ValidationError::Overflow {
                value: v.to_string(),
            }),
            StateInput::Float(v) => {
                if !v.is_finite() {
                    return Err(ValidationError::NonFinite { value: v });
                }
                let t = v.trunc();
                // i64::MAX is not representable as f64; 2^63 is the first value out of range.
                if t >= -(2f64.powi(63)) && t < 2f64.powi(63) {
                    Ok(t as i64)
                } else {
                    Err(ValidationError::Overflow {
                        value: v.to_string(),
                    })
                }
            }
            StateInput::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(v) => Ok(v),
                    Err(e)
                        if matches!(
                            e.kind(),
                            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                        ) =>
                    {
                        Err(ValidationError::Overflow {
                            value: trimmed.to_string(),
                        })
                    }
                    Err(_) => Err(ValidationError::NotAnInteger { input: s.clone() }),
                }
            }
        }
    }
}

impl From<i64> for StateInput {
    fn from(v: i64) -> Self {
        StateInput::Int(v)
    }
}

impl From<i32> for StateInput {
    fn from(v: i32) -> Self {
        StateInput::Int(i64::from(v))
    }
}

impl From<u32> for StateInput {
    fn from(v: u32) -> Self {
        StateInput::Int(i64::from(v))
    }
}

impl From<u64> for StateInput {
    fn from(v: u64) -> Self {
        StateInput::Unsigned(v)
    }
}

impl From<usize> for StateInput {
    fn from(v: usize) -> Self {
        StateInput::Unsigned(v as u64)
    }
}

impl From<f64> for StateInput {
    fn from(v: f64) -> Self {
        StateInput::Float(v)
    }
}

impl From<&str> for StateInput {
    fn from(v: &str) -> Self {
        StateInput::Text(v.to_owned())
    }
}

impl From<String> for StateInput {
    fn from(v: String) -> Self {
        StateInput::Text(v)
    }
}
