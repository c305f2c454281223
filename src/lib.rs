/*!
huffpack is a static Huffman compressor for byte streams.

The whole input is counted first, the counts build one Huffman tree and every byte is replaced by
its prefix code. Frequent bytes get short codes, rare bytes long ones, so the output shrinks when
the byte distribution is skewed. A uniform distribution of all 256 values doesn't compress.

```text
input -> FrequencyTable -> build_tree -> CodeTable -> BitWriter -> | header | payload |
```

Decompression reads the tree from the header and walks it bit by bit, see [`decompress`].

```
let data = b"this is an example of a huffman tree";
let compressed = huffpack::compress(data).unwrap();
assert_eq!(huffpack::decompress(&compressed).unwrap(), data.to_vec());
```

The building blocks live in their own crates: `common` for counting and errors, `bitstream` for
bit level io and `hufftree` for the heap, the tree and the code table.
*/

pub mod compress;
pub mod decompress;
pub mod header;
pub mod verify;

pub use crate::compress::compress;
pub use crate::compress::compress_stream;
pub use crate::compress::encode_bytes;
pub use crate::compress::write_encoded;
pub use crate::compress::CompressInfo;
pub use crate::compress::EncodedStream;
pub use crate::decompress::decode_bits;
pub use crate::decompress::decompress;
pub use crate::decompress::decompress_stream;
pub use crate::decompress::read_decoded;
pub use crate::header::Header;
pub use crate::verify::bytes_equal;
pub use crate::verify::streams_equal;
pub use crate::verify::verify_round_trip;
pub use bitstream::BitReader;
pub use bitstream::BitWriter;
pub use common::FrequencyTable;
pub use common::HuffError;
pub use common::Result;
pub use hufftree::build_tree;
pub use hufftree::Code;
pub use hufftree::CodeTable;
pub use hufftree::Tree;
