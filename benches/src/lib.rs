//! Shared inputs for the filter benchmarks.

use tagfilter::{TagFilter, TagSpec};

pub const TYPICAL_CASES: &[(&str, &str)] = &[
    ("plain_text", "Hello world, nothing to see here."),
    ("allowed_markup", r#"<p class="lead">Hi <a href="/x" title="t">there</a><br/></p>"#),
    ("disallowed_markup", r#"<script>alert(1)</script><iframe src="x"></iframe>"#),
    ("attribute_soup", r#"<a href="/x" onclick="y()" style="z" data-id="1" target=_blank>x</a>"#),
    ("stray_brackets", "1 < 2 > 0 and a >> b"),
];

/// Filter used by every benchmark: a small blog-comment style allowlist.
pub fn comment_filter() -> TagFilter {
    TagFilter::new(
        [
            TagSpec::bare("p"),
            TagSpec::bare("br"),
            TagSpec::bare("em"),
            TagSpec::bare("strong"),
            TagSpec::with_attributes("a", ["href", "title"]),
        ],
        ["class", "data-*"],
    )
}

/// Inputs that would backtrack badly in a naive regex translation.
pub fn adversarial(size: usize) -> Vec<(&'static str, String)> {
    vec![
        ("unclosed_lt", "<".repeat(size)),
        ("unclosed_quote", format!("<a {}", "x=\"".repeat(size / 3))),
        ("unclosed_attr_names", format!("<a {}>", "href = ".repeat(size / 7))),
    ]
}
