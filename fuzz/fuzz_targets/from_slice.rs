#![no_main]

use binpack::Encoding;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let _ = binpack::from_slice(data, &Encoding::AnyPackedTypeTagBytePrefix);

    let strings = Encoding::FloorTypedArray {
        minimum: 0,
        encoding: Arc::new(Encoding::FloorVarintPrefixUtf8StringShared { minimum: 0 }),
        prefix_encodings: vec![],
    };
    let _ = binpack::from_slice(data, &strings);
});
