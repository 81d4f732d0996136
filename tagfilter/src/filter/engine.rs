use serde_json::Value;
use smallvec::SmallVec;
use tracing::trace;

use super::attributes::{Attribute, AttributeScanner};
use super::charclass::trim_legacy;
use super::policy::{AllowPolicy, TagSpec};
use super::scanner::{Scanner, Segment};
use super::tag::ParsedTag;

/// Strips every tag and attribute not on the allowlist.
///
/// Filtering never fails. Text outside tags is copied through with any `>`
/// removed. A tag candidate is either rebuilt from its allowed parts or
/// dropped whole. The filter holds only its immutable [`AllowPolicy`] and can
/// be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    policy: AllowPolicy,
}

impl TagFilter {
    pub fn new<T, I, A, S>(allow_tags: T, allow_attributes: A) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<TagSpec>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_policy(AllowPolicy::new(allow_tags, allow_attributes))
    }

    pub fn with_policy(policy: AllowPolicy) -> Self {
        TagFilter { policy }
    }

    /// See [`AllowPolicy::from_json`].
    pub fn from_json(allow_tags: &Value, allow_attributes: &Value) -> Self {
        Self::with_policy(AllowPolicy::from_json(allow_tags, allow_attributes))
    }

    pub fn policy(&self) -> &AllowPolicy {
        &self.policy
    }

    /// Returns the filtered value.
    ///
    /// ```
    /// use tagfilter::{TagFilter, TagSpec};
    ///
    /// let filter = TagFilter::new([TagSpec::with_attribute("a", "href")], ["data-*"]);
    /// assert_eq!(
    ///     filter.filter(r#"<a href="/x" onclick="y()" data-id="1">go</a><script>z</script>"#),
    ///     r#"<a href="/x" data-id="1">go</a>z"#
    /// );
    /// ```
    pub fn filter(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        self.filter_into(value, &mut out);
        out
    }

    /// Appends the filtered value to `out`.
    pub fn filter_into(&self, value: &str, out: &mut String) {
        filter_with(&self.policy, value, out);
    }
}

pub(crate) fn filter_with(policy: &AllowPolicy, value: &str, out: &mut String) {
    for segment in Scanner::new(value) {
        match segment {
            Segment::Text(text) => {
                for piece in text.split('>') {
                    out.push_str(piece);
                }
            }
            Segment::Tag(candidate) => filter_tag(policy, candidate, out),
        }
    }
}

fn filter_tag(policy: &AllowPolicy, candidate: &str, out: &mut String) {
    let Some(tag) = ParsedTag::parse(candidate) else {
        trace!(len = candidate.len(), "dropping malformed tag candidate");
        return;
    };

    let name = tag.name.to_ascii_lowercase();
    if !policy.is_tag_allowed(&name) {
        trace!(tag = %name, "dropping disallowed tag");
        return;
    }

    let mut accepted: SmallVec<[Attribute<'_>; 4]> = SmallVec::new();
    let raw_attributes = trim_legacy(tag.raw_attributes);
    if !raw_attributes.is_empty() {
        for attr in AttributeScanner::new(raw_attributes) {
            let attr_name = attr.name.to_ascii_lowercase();
            if policy.is_attribute_allowed(&name, &attr_name) {
                accepted.push(attr);
            } else {
                trace!(tag = %name, attribute = %attr_name, "dropping disallowed attribute");
            }
        }
    }

    tag.write_to(&accepted, out);
}

impl From<AllowPolicy> for TagFilter {
    fn from(policy: AllowPolicy) -> Self {
        TagFilter::with_policy(policy)
    }
}
