use bitflags::bitflags;

bitflags! {
    /// Byte classes used by the tag and attribute scanners.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharClass: u8 {
        /// `[A-Za-z0-9_]`
        const WORD = 1 << 0;
        /// `-`, allowed inside attribute names only
        const DASH = 1 << 1;
        /// ` \t\n\x0B\x0C\r`
        const SPACE = 1 << 2;
        /// ` \t\n\r\0\x0B`, the legacy trim set (no form feed, but NUL)
        const TRIM = 1 << 3;
    }
}

const fn classify(b: u8) -> u8 {
    let mut bits = 0;
    if b.is_ascii_alphanumeric() || b == b'_' {
        bits |= CharClass::WORD.bits();
    }
    if b == b'-' {
        bits |= CharClass::DASH.bits();
    }
    if matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r') {
        bits |= CharClass::SPACE.bits();
    }
    if matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x00 | 0x0B) {
        bits |= CharClass::TRIM.bits();
    }
    bits
}

const fn build_map() -> [u8; 256] {
    let mut map = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        map[i] = classify(i as u8);
        i += 1;
    }
    map
}

// Bytes >= 0x80 never classify, so multi-byte UTF-8 sequences are never split.
static CHAR_CLASS_MAP: [u8; 256] = build_map();

#[inline]
pub fn char_class(b: u8) -> CharClass {
    CharClass::from_bits_retain(CHAR_CLASS_MAP[b as usize])
}

#[inline]
pub fn is_word(b: u8) -> bool {
    char_class(b).contains(CharClass::WORD)
}

#[inline]
pub fn is_attr_name(b: u8) -> bool {
    char_class(b).intersects(CharClass::WORD | CharClass::DASH)
}

#[inline]
pub fn is_space(b: u8) -> bool {
    char_class(b).contains(CharClass::SPACE)
}

/// Trims the legacy whitespace set from both ends.
pub fn trim_legacy(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii() && char_class(c as u8).contains(CharClass::TRIM))
}
