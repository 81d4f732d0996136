use core::fmt;

use super::attributes::Attribute;
use super::charclass::is_word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStart {
    /// `<`
    Open,
    /// `</`
    Close,
}

impl TagStart {
    pub fn as_str(self) -> &'static str {
        match self {
            TagStart::Open => "<",
            TagStart::Close => "</",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEnd {
    /// `/>`, written back as ` />`
    SelfClose,
    /// `>`
    Close,
    /// no terminator before end of input
    Unterminated,
}

impl TagEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            TagEnd::SelfClose => "/>",
            TagEnd::Close => ">",
            TagEnd::Unterminated => "",
        }
    }
}

/// A tag candidate split into its delimiters, name and raw attribute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTag<'a> {
    pub start: TagStart,
    /// Word characters directly after the start delimiter, original case. May be empty.
    pub name: &'a str,
    pub raw_attributes: &'a str,
    pub end: TagEnd,
}

impl<'a> ParsedTag<'a> {
    /// Splits a candidate such as `<a href="x">`. Returns `None` when the
    /// candidate does not begin with `<`. Text after the first `>` is ignored.
    pub fn parse(candidate: &'a str) -> Option<Self> {
        let rest = candidate.strip_prefix('<')?;
        let (start, rest) = match rest.strip_prefix('/') {
            Some(rest) => (TagStart::Close, rest),
            None => (TagStart::Open, rest),
        };

        let name_len = rest.bytes().take_while(|&b| is_word(b)).count();
        let (name, rest) = rest.split_at(name_len);

        let (raw_attributes, end) = match rest.find('>') {
            Some(gt_pos) => {
                let body = &rest[..gt_pos];
                match body.strip_suffix('/') {
                    Some(body) => (body, TagEnd::SelfClose),
                    None => (body, TagEnd::Close),
                }
            }
            None => (rest, TagEnd::Unterminated),
        };

        Some(ParsedTag {
            start,
            name,
            raw_attributes,
            end,
        })
    }

    /// Writes the tag back with a lower-cased name and the given attributes.
    /// A self-closing end always gets a leading space.
    pub fn write_to(&self, attributes: &[Attribute<'_>], out: &mut String) {
        out.push_str(self.start.as_str());
        out.extend(self.name.chars().map(|c| c.to_ascii_lowercase()));
        for attr in attributes {
            attr.write_to(out);
        }
        if self.end == TagEnd::SelfClose {
            out.push(' ');
        }
        out.push_str(self.end.as_str());
    }
}

impl fmt::Display for ParsedTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.start.as_str(),
            self.name,
            self.raw_attributes,
            self.end.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::super::attributes::Quote;
    use super::*;

    fn parse(candidate: &str) -> (TagStart, &str, &str, TagEnd) {
        let tag = ParsedTag::parse(candidate).unwrap();
        (tag.start, tag.name, tag.raw_attributes, tag.end)
    }

    #[test]
    fn test_open_tag_with_attributes() {
        assert_eq!(
            parse(r#"<a href="x">"#),
            (TagStart::Open, "a", r#" href="x""#, TagEnd::Close)
        );
    }

    #[test]
    fn test_close_tag() {
        assert_eq!(parse("</DIV>"), (TagStart::Close, "DIV", "", TagEnd::Close));
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(parse("<br/>"), (TagStart::Open, "br", "", TagEnd::SelfClose));
        assert_eq!(
            parse("<img src='a' />"),
            (TagStart::Open, "img", " src='a' ", TagEnd::SelfClose)
        );
    }

    #[test]
    fn test_slash_not_before_gt_stays_in_attributes() {
        assert_eq!(parse("<a/b>"), (TagStart::Open, "a", "/b", TagEnd::Close));
        assert_eq!(parse("<//>"), (TagStart::Close, "", "", TagEnd::SelfClose));
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            parse(r#"<a href="x"#),
            (TagStart::Open, "a", r#" href="x"#, TagEnd::Unterminated)
        );
        assert_eq!(parse("<br/"), (TagStart::Open, "br", "/", TagEnd::Unterminated));
        assert_eq!(parse("<"), (TagStart::Open, "", "", TagEnd::Unterminated));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(parse("< b>"), (TagStart::Open, "", " b", TagEnd::Close));
        assert_eq!(parse("<!-- c -->"), (TagStart::Open, "", "!-- c --", TagEnd::Close));
    }

    #[test]
    fn test_requires_leading_lt() {
        assert!(ParsedTag::parse("a>").is_none());
        assert!(ParsedTag::parse("").is_none());
    }

    #[test]
    fn test_write_normalizes_self_close() {
        let tag = ParsedTag::parse("<BR/>").unwrap();
        let mut out = String::new();
        tag.write_to(&[], &mut out);
        assert_eq!(out, "<br />");

        let tag = ParsedTag::parse("<IMG a='1'/>").unwrap();
        let attrs = [Attribute {
            name: "ALT",
            quote: Quote::Double,
            value: "x",
        }];
        let mut out = String::new();
        tag.write_to(&attrs, &mut out);
        assert_eq!(out, "<img alt=\"x\" />");
    }

    #[test]
    fn test_write_keeps_unterminated() {
        let tag = ParsedTag::parse("<A").unwrap();
        let mut out = String::new();
        tag.write_to(&[], &mut out);
        assert_eq!(out, "<a");
    }

    #[test]
    fn test_display_round_trips_candidate() {
        let candidate = "</p class='x'/>";
        assert_eq!(ParsedTag::parse(candidate).unwrap().to_string(), candidate);
    }
}
