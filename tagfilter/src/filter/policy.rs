use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Global attribute entry that permits every `data-` prefixed attribute.
pub const DATA_WILDCARD: &str = "data-*";

const DATA_PREFIX: &str = "data-";

/// Attribute names declared for a single tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeList {
    One(String),
    Many(Vec<String>),
}

impl AttributeList {
    fn names(&self) -> &[String] {
        match self {
            AttributeList::One(name) => core::slice::from_ref(name),
            AttributeList::Many(names) => names,
        }
    }
}

/// One entry of the tag allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSpec {
    /// Tag allowed with the global attributes only.
    Bare(String),
    /// Tag allowed with its own attributes on top of the global ones.
    WithAttributes(String, AttributeList),
}

impl TagSpec {
    pub fn bare(name: impl Into<String>) -> Self {
        TagSpec::Bare(name.into())
    }

    pub fn with_attribute(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        TagSpec::WithAttributes(name.into(), AttributeList::One(attribute.into()))
    }

    pub fn with_attributes<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagSpec::WithAttributes(
            name.into(),
            AttributeList::Many(attributes.into_iter().map(Into::into).collect()),
        )
    }

    fn name(&self) -> &str {
        match self {
            TagSpec::Bare(name) | TagSpec::WithAttributes(name, _) => name,
        }
    }
}

impl From<&str> for TagSpec {
    fn from(name: &str) -> Self {
        TagSpec::bare(name)
    }
}

impl From<String> for TagSpec {
    fn from(name: String) -> Self {
        TagSpec::Bare(name)
    }
}

/// Immutable allowlist of tags and attributes.
///
/// All names are stored lower-cased. The `data-*` wildcard stays a literal
/// member of the global attribute set; [`AllowPolicy::allows_data_attributes`]
/// exposes it as a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PolicyConfig")]
pub struct AllowPolicy {
    tags: HashMap<String, HashSet<String>>,
    attributes: HashSet<String>,
    data_wildcard: bool,
}

impl AllowPolicy {
    /// Builds a policy. Declaring the same tag twice keeps the last attribute
    /// set only.
    pub fn new<T, I, A, S>(allow_tags: T, allow_attributes: A) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<TagSpec>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = HashMap::new();
        for spec in allow_tags.into_iter().map(Into::into) {
            let attributes = match &spec {
                TagSpec::Bare(_) => HashSet::new(),
                TagSpec::WithAttributes(_, list) => {
                    list.names().iter().map(|a| a.to_ascii_lowercase()).collect()
                }
            };
            tags.insert(spec.name().to_ascii_lowercase(), attributes);
        }

        let attributes: HashSet<String> = allow_attributes
            .into_iter()
            .map(|a| a.as_ref().to_ascii_lowercase())
            .collect();
        let data_wildcard = attributes.contains(DATA_WILDCARD);

        AllowPolicy {
            tags,
            attributes,
            data_wildcard,
        }
    }

    /// Policy allowing the given tags with no attributes at all.
    pub fn tags<T, I>(allow_tags: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<TagSpec>,
    {
        Self::new(allow_tags, core::iter::empty::<&str>())
    }

    /// Builds a policy from loosely typed JSON configuration.
    ///
    /// `allow_tags` is either an array of tag names and `{tag: attrs}` objects,
    /// or a single `{tag: attrs}` object, where `attrs` is a string or an array
    /// of strings. Entries of any other shape are ignored.
    pub fn from_json(allow_tags: &Value, allow_attributes: &Value) -> Self {
        let mut specs = Vec::new();
        match allow_tags {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(name) => specs.push(TagSpec::bare(name.as_str())),
                        Value::Object(map) => {
                            specs.extend(map.iter().filter_map(|(k, v)| tag_entry(k, v)))
                        }
                        _ => {}
                    }
                }
            }
            Value::Object(map) => specs.extend(map.iter().filter_map(|(k, v)| tag_entry(k, v))),
            _ => {}
        }

        let attributes: Vec<&str> = match allow_attributes {
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        Self::new(specs, attributes)
    }

    /// Attributes declared for `tag` (lower-case), if the tag is allowed.
    pub fn tag_attributes(&self, tag: &str) -> Option<&HashSet<String>> {
        self.tags.get(tag)
    }

    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Checks a lower-case attribute name against the tag's own set, then the
    /// global set, then the `data-*` wildcard.
    pub fn is_attribute_allowed(&self, tag: &str, attribute: &str) -> bool {
        if self
            .tags
            .get(tag)
            .is_some_and(|attrs| attrs.contains(attribute))
        {
            return true;
        }
        if self.attributes.contains(attribute) {
            return true;
        }
        self.data_wildcard && attribute.starts_with(DATA_PREFIX)
    }

    pub fn global_attributes(&self) -> &HashSet<String> {
        &self.attributes
    }

    pub fn allows_data_attributes(&self) -> bool {
        self.data_wildcard
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn tag_entry(name: &str, attributes: &Value) -> Option<TagSpec> {
    match attributes {
        Value::String(attr) => Some(TagSpec::with_attribute(name, attr.as_str())),
        Value::Array(list) => Some(TagSpec::with_attributes(
            name,
            list.iter().filter_map(Value::as_str),
        )),
        _ => None,
    }
}

/// Serialized form of a policy, as found in schemas and policy files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    #[serde(default)]
    pub allow_tags: Value,
    #[serde(default)]
    pub allow_attributes: Value,
}

impl From<PolicyConfig> for AllowPolicy {
    fn from(config: PolicyConfig) -> Self {
        AllowPolicy::from_json(&config.allow_tags, &config.allow_attributes)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_are_lowercased() {
        let policy = AllowPolicy::new(
            [TagSpec::with_attributes("DIV", ["Class", "ID"])],
            ["Title"],
        );
        assert!(policy.is_tag_allowed("div"));
        assert!(!policy.is_tag_allowed("DIV"));
        assert!(policy.is_attribute_allowed("div", "class"));
        assert!(policy.is_attribute_allowed("div", "id"));
        assert!(policy.is_attribute_allowed("div", "title"));
    }

    #[test]
    fn test_redeclared_tag_replaces_attributes() {
        let policy = AllowPolicy::new(
            [
                TagSpec::with_attributes("a", ["href", "title"]),
                TagSpec::with_attribute("a", "rel"),
            ],
            core::iter::empty::<&str>(),
        );
        let attrs = policy.tag_attributes("a").unwrap();
        assert_eq!(attrs.len(), 1);
        assert!(attrs.contains("rel"));
        assert!(!policy.is_attribute_allowed("a", "href"));
    }

    #[test]
    fn test_bare_redeclaration_clears_attributes() {
        let policy = AllowPolicy::new(
            [TagSpec::with_attribute("a", "href"), TagSpec::bare("a")],
            core::iter::empty::<&str>(),
        );
        assert!(policy.tag_attributes("a").unwrap().is_empty());
    }

    #[test]
    fn test_data_wildcard() {
        let policy = AllowPolicy::new(["a"], [DATA_WILDCARD]);
        assert!(policy.allows_data_attributes());
        assert!(policy.global_attributes().contains("data-*"));
        assert!(policy.is_attribute_allowed("a", "data-foo"));
        assert!(policy.is_attribute_allowed("a", "data-"));
        assert!(!policy.is_attribute_allowed("a", "datafoo"));

        let without = AllowPolicy::tags(["a"]);
        assert!(!without.allows_data_attributes());
        assert!(!without.is_attribute_allowed("a", "data-foo"));
    }

    #[test]
    fn test_from_json_ignores_malformed_entries() {
        let tags = json!(["b", 7, null, {"a": ["href", 3, "TITLE"]}, {"img": "src"}, {"bad": 1}, ["nested"]]);
        let attrs = json!(["class", false, "DATA-*"]);
        let policy = AllowPolicy::from_json(&tags, &attrs);

        assert!(policy.is_tag_allowed("b"));
        assert!(policy.is_tag_allowed("a"));
        assert!(policy.is_tag_allowed("img"));
        assert!(!policy.is_tag_allowed("bad"));
        assert!(!policy.is_tag_allowed("nested"));
        assert_eq!(policy.tag_attributes("a").unwrap().len(), 2);
        assert!(policy.is_attribute_allowed("a", "title"));
        assert!(policy.is_attribute_allowed("img", "src"));
        assert!(policy.is_attribute_allowed("b", "class"));
        assert!(policy.allows_data_attributes());
    }

    #[test]
    fn test_from_json_object_form() {
        let policy = AllowPolicy::from_json(&json!({"p": [], "a": "href"}), &json!("class"));
        assert!(policy.is_tag_allowed("p"));
        assert!(policy.is_attribute_allowed("a", "href"));
        // a non-array attribute list is ignored as a whole
        assert!(policy.global_attributes().is_empty());
    }

    #[test]
    fn test_deserialize_policy_config() {
        let policy: AllowPolicy = serde_json::from_value(json!({
            "allowTags": ["br", {"a": ["href"]}],
            "allowAttributes": ["data-*"]
        }))
        .unwrap();
        assert!(policy.is_tag_allowed("br"));
        assert!(policy.is_attribute_allowed("a", "href"));
        assert!(policy.allows_data_attributes());

        let empty: AllowPolicy = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }
}
