#![doc = include_str!("../README.md")]
//!
//! ## API Guide
//!
//! ### For End Users
//!
//! - [`TagFilter`] - build once from an allowlist, then call
//!   [`TagFilter::filter`] on every untrusted string
//! - [`filter_tags`] - one-shot filtering against an [`AllowPolicy`]
//! - [`strip_tags`] - remove all markup, keeping text only
//! - [`Constraint`] - schema string/number checks, with optional tag filtering
//!   as a rewrite step
//!
//! ### For Advanced Users and Debugging
//!
//! The stages of the filter are public so that their boundary behavior can be
//! inspected directly:
//!
//! - [`Scanner`] - splits input into text and tag-candidate [`Segment`]s
//! - [`ParsedTag`] - splits one candidate into delimiters, name and attributes
//! - [`AttributeScanner`] - extracts quoted attributes from the raw attribute text
//!
//! The tokenization is deliberately loose. It is not an HTML parser, so a
//! stray `<` swallows text up to the next `>`, and a stray `>` in text is
//! removed.

pub mod constraints;
pub mod filter;


pub use constraints::{
    strip_tags, Constraint, ConstraintError, ErrorCode, NumberConstraint, NumberSchema,
    SchemaError, StringConstraint, StringSchema,
};
pub use filter::{
    AllowPolicy, Attribute, AttributeList, AttributeScanner, ParsedTag, PolicyConfig, Quote,
    Scanner, Segment, TagEnd, TagFilter, TagSpec, TagStart, DATA_WILDCARD,
};

/// Filters `value` against `policy` without keeping a [`TagFilter`] around.
///
/// # Examples
///
/// ```
/// use tagfilter::{filter_tags, AllowPolicy, TagSpec};
///
/// let policy = AllowPolicy::new([TagSpec::with_attribute("div", "class")], ["data-*"]);
/// assert_eq!(
///     filter_tags(&policy, r#"<DIV CLASS="x" data-k="v" style="y">a > b</div><br/>"#),
///     r#"<div class="x" data-k="v">a  b</div>"#
/// );
/// ```
pub fn filter_tags(policy: &AllowPolicy, value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    filter::filter_with(policy, value, &mut out);
    out
}

/// Returns the version of the tagfilter library.
///
/// # Examples
///
/// ```
/// use tagfilter::version;
///
/// println!("tagfilter version: {}", version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
