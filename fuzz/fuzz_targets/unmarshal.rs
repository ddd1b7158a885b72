// fuzz_targets/unmarshal.rs
#![no_main]

use go125_astjson::{marshal, to_json, unmarshal, Options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    // Shared nodes can make the printed tree exponentially larger than the
    // document, so with references on only decoding is exercised.
    let _ = unmarshal(json, &Options::new().with_references(true).with_comments(true));

    // Whatever decodes must encode and decode again to the same source.
    let opts = Options::new().with_comments(true).with_positions(true);
    if let Ok(sf) = unmarshal(json, &opts) {
        let printed = sf.print();
        let again = to_json(&marshal(&sf, &opts), 0).expect("mirror serializes");
        let sf2 = unmarshal(&again, &opts).expect("own output decodes");
        assert_eq!(sf2.print(), printed);
    }
});
