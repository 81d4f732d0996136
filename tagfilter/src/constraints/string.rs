use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::{ConstraintError, ErrorCode, SchemaError};
use super::strip::strip_tags;
use crate::filter::{AllowPolicy, TagFilter};

/// String keywords of a schema node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    /// Measure length after removing all markup.
    #[serde(default)]
    pub ignore_html_tags_length: bool,
    /// `[pattern, replacement]`, applied as a rewrite before `pattern` is
    /// checked. Any other shape is ignored.
    pub preg_replace: Option<Value>,
    pub pattern: Option<String>,
    /// Allowlist filter applied to the value before any check.
    pub filter_tags: Option<AllowPolicy>,
}

/// Compiled string constraint. Build once per schema node, check many values.
#[derive(Debug, Clone)]
pub struct StringConstraint {
    max_length: Option<usize>,
    min_length: Option<usize>,
    ignore_html_tags_length: bool,
    replace: Option<(Regex, String)>,
    pattern: Option<(String, Regex)>,
    filter: Option<TagFilter>,
}

impl StringConstraint {
    pub fn new(schema: StringSchema) -> Result<Self, SchemaError> {
        let replace = match schema.preg_replace.as_ref().and_then(replace_pair) {
            Some((pattern, replacement)) => {
                let regex = compile_delimited(pattern).map_err(|err| match err {
                    SchemaError::InvalidPattern { pattern, source } => {
                        SchemaError::InvalidReplacePattern { pattern, source }
                    }
                    other => other,
                })?;
                Some((regex, replacement.to_string()))
            }
            None => {
                if let Some(value) = &schema.preg_replace {
                    debug!(%value, "ignoring pregReplace that is not a [pattern, replacement] pair");
                }
                None
            }
        };

        let pattern = match schema.pattern {
            Some(pattern) => {
                let regex = Regex::new(&pattern).map_err(|source| SchemaError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                Some((pattern, regex))
            }
            None => None,
        };

        Ok(StringConstraint {
            max_length: schema.max_length,
            min_length: schema.min_length,
            ignore_html_tags_length: schema.ignore_html_tags_length,
            replace,
            pattern,
            filter: schema.filter_tags.map(TagFilter::with_policy),
        })
    }

    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        Self::new(StringSchema::deserialize(schema)?)
    }

    /// Validates `value`, rewriting it in place first with the tag filter and
    /// later with `pregReplace`. Length is counted in characters.
    pub fn check(&self, value: &mut String, path: &str) -> Vec<ConstraintError> {
        let mut errors = Vec::new();

        if let Some(filter) = &self.filter {
            *value = filter.filter(value.as_str());
        }

        if self.max_length.is_some() || self.min_length.is_some() {
            let length = self.length(value.as_str());
            if let Some(max) = self.max_length {
                if length > max {
                    errors.push(
                        ConstraintError::new(
                            path,
                            format!("Must be at most {max} characters long"),
                            ErrorCode::MaxLength,
                        )
                        .with_context("maxLength", max),
                    );
                }
            }
            if let Some(min) = self.min_length {
                if length < min {
                    errors.push(
                        ConstraintError::new(
                            path,
                            format!("Must be at least {min} characters long"),
                            ErrorCode::MinLength,
                        )
                        .with_context("minLength", min),
                    );
                }
            }
        }

        if let Some((regex, replacement)) = &self.replace {
            let replaced = regex.replace_all(value.as_str(), replacement.as_str()).into_owned();
            *value = replaced;
        }

        if let Some((pattern, regex)) = &self.pattern {
            if !regex.is_match(value.as_str()) {
                errors.push(
                    ConstraintError::new(
                        path,
                        format!("Does not match the regex pattern {pattern}"),
                        ErrorCode::Pattern,
                    )
                    .with_context("pattern", pattern.as_str()),
                );
            }
        }

        errors
    }

    fn length(&self, value: &str) -> usize {
        if self.ignore_html_tags_length {
            strip_tags(value).chars().count()
        } else {
            value.chars().count()
        }
    }
}

fn replace_pair(value: &Value) -> Option<(&str, &str)> {
    match value.as_array()?.as_slice() {
        [pattern, replacement] => Some((pattern.as_str()?, replacement.as_str()?)),
        _ => None,
    }
}

/// Compiles `/body/flags` style patterns; anything else is taken as a bare
/// regex. Supported flags are `i`, `m`, `s`, `x`, `u` and `U`.
fn compile_delimited(pattern: &str) -> Result<Regex, SchemaError> {
    let invalid = |source| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };

    let Some((body, flags)) = split_delimiters(pattern) else {
        return Regex::new(pattern).map_err(invalid);
    };

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            'u' => builder.unicode(true),
            _ => {
                return Err(SchemaError::UnknownRegexFlag {
                    pattern: pattern.to_string(),
                    flag,
                })
            }
        };
    }
    builder.build().map_err(invalid)
}

fn split_delimiters(pattern: &str) -> Option<(&str, &str)> {
    let open = pattern.chars().next()?;
    if open == '\\' || !open.is_ascii_punctuation() {
        return None;
    }
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    };
    let inner = &pattern[open.len_utf8()..];
    let end = inner.rfind(close)?;
    let flags = &inner[end + close.len_utf8()..];
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((&inner[..end], flags))
}
