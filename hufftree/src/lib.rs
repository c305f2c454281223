/*!
Huffman tree construction and prefix code generation for a single byte alphabet.

```text
FrequencyTable -> build_tree (MinHeap) -> Tree -> CodeTable::from_tree -> CodeTable
```

The tree is an arena, see [`Tree`]. Decoders walk it directly, encoders use the [`CodeTable`].
*/

pub mod code;
pub mod heap;
pub mod tree;

pub use crate::code::test_prefix_property;
pub use crate::code::Code;
pub use crate::code::CodeTable;
pub use crate::heap::MinHeap;
pub use crate::heap::Weighted;
pub use crate::tree::build_tree;
pub use crate::tree::minimum_tree_depth;
pub use crate::tree::Node;
pub use crate::tree::Tree;
pub use common::FrequencyTable;

/// Longest possible code. 256 symbols give at most 255 parents stacked on top of each other.
pub const MAX_CODE_LENGTH: usize = 255;
