//! Schema keyword checks that consume the tag filter.
//!
//! [`StringConstraint`] can rewrite a string with a [`TagFilter`](crate::TagFilter)
//! before its length and pattern checks. [`NumberConstraint`] covers the
//! numeric range and divisibility keywords. Both report [`ConstraintError`]s
//! rather than failing.

pub use self::error::{ConstraintError, ErrorCode, SchemaError};
pub use self::number::{NumberConstraint, NumberSchema};
pub use self::strip::strip_tags;
pub use self::string::{StringConstraint, StringSchema};

use serde_json::Value;

mod error;
mod number;
mod strip;
mod string;


/// A compiled constraint selected by the schema's `type` keyword.
#[derive(Debug, Clone)]
pub enum Constraint {
    String(StringConstraint),
    Number(NumberConstraint),
}

impl Constraint {
    /// Compiles a schema node whose `type` is `string`, `number` or `integer`.
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaError> {
        let kind = schema.get("type").and_then(Value::as_str).unwrap_or("string");
        match kind {
            "string" => Ok(Constraint::String(StringConstraint::from_value(schema)?)),
            "number" | "integer" => Ok(Constraint::Number(NumberConstraint::from_value(schema)?)),
            other => Err(SchemaError::UnsupportedType(other.to_string())),
        }
    }

    /// Checks `value` if it has the constraint's type and ignores it
    /// otherwise. String values may be rewritten in place.
    pub fn validate(&self, value: &mut Value, path: &str) -> Vec<ConstraintError> {
        match (self, value) {
            (Constraint::String(c), Value::String(s)) => c.check(s, path),
            (Constraint::Number(c), Value::Number(n)) => match n.as_f64() {
                Some(n) => c.check(n, path),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
