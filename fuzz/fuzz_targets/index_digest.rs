#![no_main]
use keygrip::Keygrip;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, regardless of the digest bytes.
    let kg = Keygrip::new(["tree.xie", "vicanso"]).expect("keygrip");
    if let Some(pos) = kg.index(b"payload", data).position() {
        // Only the exact signature of one of the keys can match.
        let key = &kg.keys()[pos];
        let expected = Keygrip::new([key]).expect("keygrip").sign(b"payload").expect("sign");
        assert_eq!(data, expected.as_bytes());
    }
});
