use core::fmt;

/// A slice of the input as cut by [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Run of text containing no `<`. May contain stray `>`.
    Text(&'a str),
    /// Tag candidate: `<`, everything up to the next `>`, and that `>` if present.
    Tag(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Segment::Text(s) | Segment::Tag(s) => s,
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Text(s) => write!(f, "TEXT,{},{}", s.len(), s),
            Segment::Tag(s) => write!(f, "TAG,{},{}", s.len(), s),
        }
    }
}

/// Splits input into alternating text and tag-candidate segments.
///
/// This is not a markup parser. A candidate runs from `<` to the first
/// following `>` and may itself contain `<`. A `<` with no later `>` yields a
/// candidate reaching the end of input. Concatenating all segments gives back
/// the input. Every byte is visited once.
pub struct Scanner<'a> {
    s: &'a str,
    len: usize,
    pos: usize,
    state_fn: fn(&mut Scanner<'a>) -> Option<Segment<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            s: input,
            len: input.len(),
            pos: 0,
            state_fn: Self::state_text,
        }
    }

    fn find_byte(&self, byte: u8, start: usize) -> Option<usize> {
        self.s
            .as_bytes()
            .get(start..)?
            .iter()
            .position(|&b| b == byte)
            .map(|i| start + i)
    }

    fn state_eof(&mut self) -> Option<Segment<'a>> {
        None
    }

    fn state_text(&mut self) -> Option<Segment<'a>> {
        let start = self.pos;

        match self.find_byte(b'<', start) {
            Some(lt_pos) if lt_pos > start => {
                self.pos = lt_pos;
                self.state_fn = Self::state_tag;
                Some(Segment::Text(&self.s[start..lt_pos]))
            }
            Some(_) => {
                self.state_fn = Self::state_tag;
                (self.state_fn)(self)
            }
            None if self.len > start => {
                self.pos = self.len;
                self.state_fn = Self::state_eof;
                Some(Segment::Text(&self.s[start..]))
            }
            None => {
                self.state_fn = Self::state_eof;
                None
            }
        }
    }

    // pos is on a '<'
    fn state_tag(&mut self) -> Option<Segment<'a>> {
        let start = self.pos;
        let end = match self.find_byte(b'>', start + 1) {
            Some(gt_pos) => gt_pos + 1,
            None => self.len,
        };

        self.pos = end;
        self.state_fn = if end < self.len {
            Self::state_text
        } else {
            Self::state_eof
        };
        Some(Segment::Tag(&self.s[start..end]))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        (self.state_fn)(self)
    }
}
