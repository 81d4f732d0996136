use serde::Deserialize;
use serde_json::{Number, Value};

use super::error::{ConstraintError, ErrorCode, SchemaError};

const DIVISIBILITY_PRECISION: f64 = 0.000_000_000_1;

/// Numeric keywords of a schema node. `exclusiveMinimum` and
/// `exclusiveMaximum` are the boolean modifiers of draft 3/4. Bounds keep
/// their JSON form so errors echo them as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSchema {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    /// Draft 3
    pub divisible_by: Option<Number>,
    /// Draft 4
    pub multiple_of: Option<Number>,
}

#[derive(Debug, Clone)]
pub struct NumberConstraint {
    schema: NumberSchema,
}

impl NumberConstraint {
    pub fn new(schema: NumberSchema) -> Self {
        NumberConstraint { schema }
    }

    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        Ok(Self::new(NumberSchema::deserialize(schema)?))
    }

    pub fn check(&self, value: f64, path: &str) -> Vec<ConstraintError> {
        let s = &self.schema;
        let mut errors = Vec::new();

        match (s.exclusive_minimum, bound(&s.minimum)) {
            (Some(exclusive), Some((min, raw))) => {
                if exclusive && value <= min {
                    errors.push(minimum_error(path, raw, ErrorCode::ExclusiveMinimum));
                } else if value < min {
                    errors.push(minimum_error(path, raw, ErrorCode::Minimum));
                }
            }
            (Some(_), None) => errors.push(ConstraintError::new(
                path,
                "Use of exclusiveMinimum requires presence of minimum",
                ErrorCode::MissingMinimum,
            )),
            (None, Some((min, raw))) if value < min => {
                errors.push(minimum_error(path, raw, ErrorCode::Minimum))
            }
            (None, _) => {}
        }

        match (s.exclusive_maximum, bound(&s.maximum)) {
            (Some(exclusive), Some((max, raw))) => {
                if exclusive && value >= max {
                    errors.push(maximum_error(path, raw, ErrorCode::ExclusiveMaximum));
                } else if value > max {
                    errors.push(maximum_error(path, raw, ErrorCode::Maximum));
                }
            }
            (Some(_), None) => errors.push(ConstraintError::new(
                path,
                "Use of exclusiveMaximum requires presence of maximum",
                ErrorCode::MissingMaximum,
            )),
            (None, Some((max, raw))) if value > max => {
                errors.push(maximum_error(path, raw, ErrorCode::Maximum))
            }
            (None, _) => {}
        }

        if let Some((divisor, raw)) = bound(&s.divisible_by) {
            if fmod(value, divisor) != 0.0 {
                errors.push(
                    ConstraintError::new(
                        path,
                        format!("Is not divisible by {raw}"),
                        ErrorCode::DivisibleBy,
                    )
                    .with_context("divisibleBy", raw.clone()),
                );
            }
        }

        if let Some((divisor, raw)) = bound(&s.multiple_of) {
            if fmod(value, divisor) != 0.0 {
                errors.push(
                    ConstraintError::new(
                        path,
                        format!("Must be a multiple of {raw}"),
                        ErrorCode::MultipleOf,
                    )
                    .with_context("multipleOf", raw.clone()),
                );
            }
        }

        errors
    }
}

fn bound(keyword: &Option<Number>) -> Option<(f64, &Number)> {
    let raw = keyword.as_ref()?;
    Some((raw.as_f64()?, raw))
}

fn minimum_error(path: &str, min: &Number, code: ErrorCode) -> ConstraintError {
    ConstraintError::new(path, format!("Must have a minimum value of {min}"), code)
        .with_context("minimum", min.clone())
}

fn maximum_error(path: &str, max: &Number, code: ErrorCode) -> ConstraintError {
    ConstraintError::new(path, format!("Must have a maximum value of {max}"), code)
        .with_context("maximum", max.clone())
}

/// Remainder against the nearest multiple, snapped to zero within
/// [`DIVISIBILITY_PRECISION`]. A zero divisor yields NaN, which never passes.
fn fmod(value: f64, divisor: f64) -> f64 {
    let modulus = value - (value / divisor).round() * divisor;
    if -DIVISIBILITY_PRECISION < modulus && modulus < DIVISIBILITY_PRECISION {
        return 0.0;
    }
    modulus
}
