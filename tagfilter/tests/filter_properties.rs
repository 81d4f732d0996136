use pretty_assertions::assert_eq;
use tagfilter::{filter_tags, strip_tags, AllowPolicy, Constraint, TagFilter, TagSpec};

const ALPHABET: &[&str] = &[
    "<", ">", "/", "=", "\"", "'", " ", "\n", "a", "b", "br", "href", "data-x", "x", "é", "<a ",
    "</a>", "<br/>", "href=\"1\"", "onclick='2'",
];

/// Deterministic xorshift so failures reproduce.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next() % items.len() as u64) as usize]
    }
}

fn random_inputs(count: usize) -> Vec<String> {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|_| {
            let len = (rng.next() % 24) as usize;
            (0..len).map(|_| rng.pick(ALPHABET)).collect()
        })
        .collect()
}

#[test]
fn empty_policy_leaves_no_markup_delimiters() {
    let filter = TagFilter::default();
    for input in random_inputs(2_000) {
        let out = filter.filter(&input);
        assert!(
            !out.contains('<') && !out.contains('>'),
            "input {input:?} produced {out:?}"
        );
    }
}

#[test]
fn filtering_is_idempotent() {
    let empty = TagFilter::default();
    let allowlist = TagFilter::new(
        [
            TagSpec::bare("b"),
            TagSpec::bare("br"),
            TagSpec::with_attributes("a", ["href"]),
        ],
        ["data-*", "x"],
    );
    for input in random_inputs(2_000) {
        for filter in [&empty, &allowlist] {
            let once = filter.filter(&input);
            assert_eq!(filter.filter(&once), once, "input {input:?}");
        }
    }
}

#[test]
fn well_formed_allowed_markup_is_a_fixed_point() {
    let filter = TagFilter::new(
        [
            TagSpec::bare("p"),
            TagSpec::bare("br"),
            TagSpec::with_attributes("a", ["href", "title"]),
        ],
        ["class"],
    );
    let inputs = [
        r#"<p class="intro">Hello <a href="/x" title='T'>x</a><br /></p>"#,
        "<p>plain</p>",
        r#"<a href="">empty</a>"#,
    ];
    for input in inputs {
        assert_eq!(filter.filter(input), input);
        let once = filter.filter(input);
        assert_eq!(filter.filter(&once), once);
    }
}

#[test]
fn documented_boundary_cases() {
    let link = AllowPolicy::new([TagSpec::with_attributes("a", ["href"])], ["data-*"]);
    assert_eq!(filter_tags(&link, r#"<a href="x" onclick="y">"#), r#"<a href="x">"#);
    assert_eq!(filter_tags(&link, r#"<a data-foo="1">"#), r#"<a data-foo="1">"#);
    assert_eq!(filter_tags(&link, r#"<a href="x"#), "<a");
    assert_eq!(filter_tags(&link, "a > b"), "a  b");

    let div = AllowPolicy::new([TagSpec::with_attribute("div", "class")], [] as [&str; 0]);
    assert_eq!(filter_tags(&div, r#"<DIV CLASS="x">"#), r#"<div class="x">"#);
    assert_eq!(filter_tags(&div, r#"<div data-foo="1">"#), "<div>");

    let br = AllowPolicy::tags(["br"]);
    assert_eq!(filter_tags(&br, "<br/>"), "<br />");
    assert_eq!(filter_tags(&br, "<x>inner</x>"), "inner");
}

#[test]
fn filter_and_strip_agree_on_text_for_simple_markup() {
    let input = "<p>Hello <b>world</b></p>";
    assert_eq!(TagFilter::default().filter(input), strip_tags(input));
}

#[test]
fn schema_string_field_is_sanitized_before_checks() {
    let constraint = Constraint::from_schema(&serde_json::json!({
        "type": "string",
        "maxLength": 12,
        "filterTags": {"allowTags": ["em"]}
    }))
    .expect("schema compiles");

    let mut value = serde_json::json!("<em>hi</em><img src=x onerror=alert(1)>");
    let errors = constraint.validate(&mut value, "/bio");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(value, serde_json::json!("<em>hi</em>"));

    let mut long = serde_json::json!("<em>far too long</em>");
    let errors = constraint.validate(&mut long, "/bio");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "/bio: Must be at most 12 characters long");
}
