#![no_main]

use binpack::Encoding;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = binpack::from_reader(data, &Encoding::AnyPackedTypeTagBytePrefix);
});
