#![no_main]

use binpack::Encoding;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoding = Encoding::AnyPackedTypeTagBytePrefix;
    let value = match binpack::from_slice(data, &encoding) {
        Ok(value) => value,
        Err(_) => return,
    };

    // reals with too many integral digits decode but cannot be encoded again
    let bytes = match binpack::to_vec(&value, &encoding) {
        Ok(bytes) => bytes,
        Err(_) => return,
    };
    assert_eq!(binpack::from_slice(&bytes, &encoding).unwrap(), value);
});
