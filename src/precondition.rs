//! Argument checks shared by every value constructor.
//!
//! Each check fails on the first violated condition and names the
//! parameter it was checking. Callers attach element context later.

use thiserror::Error;

/// A violated constructor precondition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// A required value was absent.
    #[error("{param} is required")]
    Null {
        /// Parameter that was absent.
        param: &'static str,
    },

    /// A required string was empty.
    #[error("{param} must not be empty")]
    Empty {
        /// Parameter that was empty.
        param: &'static str,
    },

    /// A value fell outside its inclusive range.
    #[error("{param} = {value} is outside [{lower}, {upper}]")]
    OutOfRange {
        /// Parameter that was out of range.
        param: &'static str,
        /// The offending value.
        value: f64,
        /// Inclusive lower bound.
        lower: f64,
        /// Inclusive upper bound.
        upper: f64,
    },

    /// The caller asked for a range whose lower bound exceeds its upper bound.
    #[error("range check on {param} has lower bound {lower} above upper bound {upper}")]
    InvalidRange {
        /// Parameter the check was for.
        param: &'static str,
        /// Requested lower bound.
        lower: f64,
        /// Requested upper bound.
        upper: f64,
    },
}

/// Unwrap a required value.
pub fn not_null<T>(value: Option<T>, param: &'static str) -> Result<T, ValueError> {
    value.ok_or(ValueError::Null { param })
}

/// Require a non-empty string.
pub fn not_empty<'a>(value: &'a str, param: &'static str) -> Result<&'a str, ValueError> {
    if value.is_empty() {
        return Err(ValueError::Empty { param });
    }
    Ok(value)
}

/// Require `lower <= value <= upper`.
///
/// NaN is never within range. A `lower > upper` request is reported as
/// [`ValueError::InvalidRange`] regardless of `value`.
pub fn within_range(
    value: f64,
    lower: f64,
    upper: f64,
    param: &'static str,
) -> Result<f64, ValueError> {
    if lower > upper {
        return Err(ValueError::InvalidRange {
            param,
            lower,
            upper,
        });
    }
    if !(lower..=upper).contains(&value) {
        return Err(ValueError::OutOfRange {
            param,
            value,
            lower,
            upper,
        });
    }
    Ok(value)
}

/// Require a finite value.
pub fn finite(value: f64, param: &'static str) -> Result<f64, ValueError> {
    within_range(value, f64::MIN, f64::MAX, param)
}

/// Require a finite, non-negative value.
pub fn non_negative(value: f64, param: &'static str) -> Result<f64, ValueError> {
    within_range(value, 0.0, f64::MAX, param)
}
