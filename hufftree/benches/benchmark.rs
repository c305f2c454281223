extern crate criterion;

use self::criterion::*;
use hufftree::build_tree;
use hufftree::CodeTable;
use hufftree::FrequencyTable;

const TEXT: &[u8] = include_bytes!("../../test_data/lorem_10k.txt");
const JSON: &[u8] = include_bytes!("../../test_data/records_json.txt");

const ALL: &[&[u8]] = &[TEXT, JSON];

fn tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    for input in ALL.iter() {
        let input_bytes = input.len() as u64;
        group.throughput(Throughput::Bytes(input_bytes));
        group.bench_with_input(
            BenchmarkId::new("build_tree", input_bytes),
            &input,
            |b, i| {
                let counts = FrequencyTable::from_bytes(i);
                b.iter(|| build_tree(&counts));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("build_tree_complete", input_bytes),
            &input,
            |b, i| {
                b.iter(|| {
                    let counts = FrequencyTable::from_bytes(i);
                    build_tree(&counts)
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("code_table", input_bytes),
            &input,
            |b, i| {
                let counts = FrequencyTable::from_bytes(i);
                let tree = build_tree(&counts).unwrap();
                b.iter(|| CodeTable::from_tree(&tree));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, tree);
criterion_main!(benches);
