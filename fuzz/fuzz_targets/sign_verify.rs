#![no_main]
use keygrip::{KeyIndex, Keygrip};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, &[u8])| {
    let (old_key, new_key, payload) = input;
    let mut kg = Keygrip::new([old_key]).expect("keygrip");
    let sig = kg.sign(payload).expect("sign");
    assert_eq!(kg.index(payload, &sig), KeyIndex::Found(0));

    // Rotation must keep the old signature valid until the old key is removed.
    kg.add_key(new_key);
    assert!(kg.verify(payload, &sig));
    if !new_key.is_empty() && new_key != old_key {
        kg.remove_key(old_key);
        // HMAC zero-pads short keys, so "k" and "k\0" sign identically.
        let collides = Keygrip::new([new_key]).expect("keygrip").verify(payload, &sig);
        assert_eq!(kg.verify(payload, &sig), collides);
    }
});
