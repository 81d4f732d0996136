use crate::filter::Quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StripState {
    Text,
    Tag { depth: usize, quote: Option<Quote> },
    Comment,
}

/// Removes every markup region and keeps only the text.
///
/// Unlike [`TagFilter`](crate::TagFilter) this allows nothing. A `<`
/// followed by whitespace is kept as text. `<!-- ... -->` is removed up to
/// its closing `-->`. Inside a tag, quoted `>` does not close it and nested
/// `<...>` pairs are balanced. An unclosed region runs to the end of input.
pub fn strip_tags(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut state = StripState::Text;
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(&b) = bytes.get(pos) {
        match state {
            StripState::Text => {
                if b == b'<' && !bytes.get(pos + 1).is_some_and(u8::is_ascii_whitespace) {
                    out.push_str(&value[text_start..pos]);
                    if bytes[pos..].starts_with(b"<!--") {
                        state = StripState::Comment;
                        pos += 4;
                        continue;
                    }
                    state = StripState::Tag {
                        depth: 0,
                        quote: None,
                    };
                }
            }
            StripState::Tag { depth, quote } => match (b, quote) {
                (b'"', None) => state = StripState::Tag { depth, quote: Some(Quote::Double) },
                (b'\'', None) => state = StripState::Tag { depth, quote: Some(Quote::Single) },
                (b'"', Some(Quote::Double)) | (b'\'', Some(Quote::Single)) => {
                    state = StripState::Tag { depth, quote: None }
                }
                (b'<', None) => {
                    state = StripState::Tag {
                        depth: depth + 1,
                        quote,
                    }
                }
                (b'>', None) if depth > 0 => {
                    state = StripState::Tag {
                        depth: depth - 1,
                        quote,
                    }
                }
                (b'>', None) => {
                    state = StripState::Text;
                    text_start = pos + 1;
                }
                _ => {}
            },
            StripState::Comment => {
                if bytes[pos..].starts_with(b"-->") {
                    state = StripState::Text;
                    pos += 3;
                    text_start = pos;
                    continue;
                }
            }
        }
        pos += 1;
    }

    if state == StripState::Text {
        out.push_str(&value[text_start..]);
    }
    out
}
