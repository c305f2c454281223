use huffpack::compress;
use huffpack::decompress;

fn main() {
    const RECORDS: &[u8] = include_bytes!("../../test_data/records_json.txt");
    let mut len = 0;
    for _ in 0..10 {
        let compressed = compress(RECORDS).unwrap();
        len += decompress(&compressed).unwrap().len();
        len += compressed.len();
    }
    println!("{:?}", len);
}
