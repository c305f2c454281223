#![no_main]

use huffpack::compress;
use huffpack::decompress;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let compressed = compress(data).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), data);
});
