//! Editor validation
//!
//! A column's [`Validation`] is rendered onto the editor element as HTML5
//! constraint attributes and checked before every commit, mirroring native
//! constraint validation. `min`, `max` and `step` only apply to numeric
//! columns and are checked against the parsed number.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::column::ColumnType;
use crate::numeric::parse_numeric;

/// Validation rules for an editable column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Validation {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub step: Option<f64>,
}

/// Why a value failed validation. Display text matches the browser's
/// validity messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidityError {
    #[error("Please fill out this field.")]
    ValueMissing,
    #[error("Value must be greater than or equal to {0}.")]
    RangeUnderflow(f64),
    #[error("Value must be less than or equal to {0}.")]
    RangeOverflow(f64),
    #[error("Please lengthen this text to {min} characters or more (you are currently using {len} characters).")]
    TooShort { min: usize, len: usize },
    #[error("Please shorten this text to {max} characters or less (you are currently using {len} characters).")]
    TooLong { max: usize, len: usize },
    #[error("Please match the requested format.")]
    PatternMismatch,
    #[error("Please enter a valid value.")]
    StepMismatch,
}

/// HTML attributes for the editor element, in a stable order
pub type ValidationAttrs = Vec<(&'static str, String)>;

impl Validation {
    /// Attributes to place on the editor `<input>`/`<textarea>`
    pub fn attributes(&self) -> ValidationAttrs {
        let mut attrs = Vec::new();
        if self.required {
            attrs.push(("required", String::new()));
        }
        if let Some(min) = self.min {
            attrs.push(("min", min.to_string()));
        }
        if let Some(max) = self.max {
            attrs.push(("max", max.to_string()));
        }
        if let Some(n) = self.min_length {
            attrs.push(("minlength", n.to_string()));
        }
        if let Some(n) = self.max_length {
            attrs.push(("maxlength", n.to_string()));
        }
        if let Some(pattern) = &self.pattern {
            attrs.push(("pattern", pattern.clone()));
        }
        if let Some(step) = self.step {
            attrs.push(("step", step.to_string()));
        }
        attrs
    }

    /// Check `value` the way native constraint validation would
    pub fn check(&self, value: &str, column_type: ColumnType) -> Result<(), ValidityError> {
        if value.is_empty() {
            return if self.required {
                Err(ValidityError::ValueMissing)
            } else {
                Ok(())
            };
        }

        let len = value.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(ValidityError::TooShort { min, len });
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(ValidityError::TooLong { max, len });
            }
        }

        if let Some(pattern) = &self.pattern {
            match Regex::new(&format!("^(?:{})$", pattern)) {
                Ok(re) => {
                    if !re.is_match(value) {
                        return Err(ValidityError::PatternMismatch);
                    }
                }
                Err(e) => {
                    tracing::warn!(pattern = %pattern, "Ignoring invalid pattern: {}", e);
                }
            }
        }

        if column_type.is_numeric() {
            let n = parse_numeric(value);
            if let Some(min) = self.min {
                if n < min {
                    return Err(ValidityError::RangeUnderflow(min));
                }
            }
            if let Some(max) = self.max {
                if n > max {
                    return Err(ValidityError::RangeOverflow(max));
                }
            }
            if let Some(step) = self.step.filter(|s| *s > 0.0) {
                let base = self.min.unwrap_or(0.0);
                let steps = (n - base) / step;
                if (steps - steps.round()).abs() > 1e-9 {
                    return Err(ValidityError::StepMismatch);
                }
            }
        }

        Ok(())
    }
}
