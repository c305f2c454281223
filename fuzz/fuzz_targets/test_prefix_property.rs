#![no_main]

use hufftree::build_tree;
use hufftree::test_prefix_property;
use hufftree::CodeTable;
use hufftree::FrequencyTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let counts = FrequencyTable::from_bytes(data);
    let tree = build_tree(&counts).unwrap();
    test_prefix_property(&CodeTable::from_tree(&tree));
});
