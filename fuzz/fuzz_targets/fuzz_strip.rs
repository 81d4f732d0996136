#![no_main]
use libfuzzer_sys::fuzz_target;
use tagfilter::strip_tags;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let out = strip_tags(input);
        assert!(out.len() <= input.len());
    }
});
