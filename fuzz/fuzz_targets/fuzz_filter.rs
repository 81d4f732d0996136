#![no_main]
use libfuzzer_sys::fuzz_target;
use tagfilter::{Scanner, TagFilter, TagSpec};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Segments must cover the input exactly
    let joined: String = Scanner::new(input).map(|s| s.as_str()).collect();
    assert_eq!(joined, input);

    // With nothing allowed, no markup delimiter survives
    let empty = TagFilter::default();
    let out = empty.filter(input);
    assert!(!out.contains('<') && !out.contains('>'));
    assert_eq!(empty.filter(&out), out);

    let filter = TagFilter::new(
        [TagSpec::bare("b"), TagSpec::with_attributes("a", ["href"])],
        ["data-*"],
    );
    let out = filter.filter(input);
    assert_eq!(filter.filter(&out), out);
});
