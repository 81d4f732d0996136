use super::charclass::{is_attr_name, is_space};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }

    fn byte(self) -> u8 {
        match self {
            Quote::Double => b'"',
            Quote::Single => b'\'',
        }
    }
}

/// A well-formed `name="value"` or `name='value'` pair. The value is the raw
/// text between the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub quote: Quote,
    pub value: &'a str,
}

impl Attribute<'_> {
    /// Appends ` name=<q>value<q>` with the name lower-cased.
    pub fn write_to(&self, out: &mut String) {
        let q = self.quote.as_char();
        out.push(' ');
        out.extend(self.name.chars().map(|c| c.to_ascii_lowercase()));
        out.push('=');
        out.push(q);
        out.push_str(self.value);
        out.push(q);
    }
}

/// Extracts quoted attributes from a raw attribute blob, left to right.
///
/// A name is a run of `[A-Za-z0-9_-]`, followed by optional whitespace, `=`,
/// optional whitespace and a quoted value ending at the first matching quote.
/// Anything that does not fit is skipped. Once a quote character is found
/// missing from the remainder, later attempts with that quote fail
/// immediately, keeping the scan linear.
pub struct AttributeScanner<'a> {
    s: &'a str,
    len: usize,
    pos: usize,
    no_double: bool,
    no_single: bool,
}

impl<'a> AttributeScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        AttributeScanner {
            s: input,
            len: input.len(),
            pos: 0,
            no_double: false,
            no_single: false,
        }
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.s.as_bytes().get(pos).copied()
    }

    fn skip_space(&self, mut pos: usize) -> usize {
        while self.byte_at(pos).is_some_and(is_space) {
            pos += 1;
        }
        pos
    }

    fn quote_missing(&mut self, quote: Quote) -> &mut bool {
        match quote {
            Quote::Double => &mut self.no_double,
            Quote::Single => &mut self.no_single,
        }
    }

    fn match_value(&mut self, name_start: usize, name_end: usize) -> Option<Attribute<'a>> {
        let eq_pos = self.skip_space(name_end);
        if self.byte_at(eq_pos) != Some(b'=') {
            return None;
        }

        let quote_pos = self.skip_space(eq_pos + 1);
        let quote = match self.byte_at(quote_pos)? {
            b'"' => Quote::Double,
            b'\'' => Quote::Single,
            _ => return None,
        };
        if *self.quote_missing(quote) {
            return None;
        }

        let value_start = quote_pos + 1;
        let close = self.s.as_bytes().get(value_start..).and_then(|rest| {
            rest.iter()
                .position(|&b| b == quote.byte())
                .map(|i| value_start + i)
        });

        match close {
            Some(close_pos) => {
                self.pos = close_pos + 1;
                Some(Attribute {
                    name: &self.s[name_start..name_end],
                    quote,
                    value: &self.s[value_start..close_pos],
                })
            }
            None => {
                *self.quote_missing(quote) = true;
                None
            }
        }
    }
}

impl<'a> Iterator for AttributeScanner<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while self.byte_at(self.pos).is_some_and(|b| !is_attr_name(b)) {
                self.pos += 1;
            }
            if self.pos >= self.len {
                return None;
            }

            let name_start = self.pos;
            while self.byte_at(self.pos).is_some_and(is_attr_name) {
                self.pos += 1;
            }
            let name_end = self.pos;

            if let Some(attr) = self.match_value(name_start, name_end) {
                return Some(attr);
            }
        }
    }
}
