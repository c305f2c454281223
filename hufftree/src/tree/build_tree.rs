use common::FrequencyTable;
use common::HuffError;
use common::Result;
use log::*;

use crate::heap::MinHeap;
use crate::tree::tree_node::Node;
use crate::tree::tree_node::NodeHandle;
use crate::tree::Tree;

/// creates a huffman tree
///
/// Leaves are placed first in the node array in ascending symbol order, parents are appended in
/// the order they are created, so the root is always the last node. The two nodes extracted from
/// the heap become the left (first) and right (second) child of their parent.
///
/// An input with a single distinct symbol returns a tree consisting only of that leaf.
pub fn build_tree(counts: &FrequencyTable) -> Result<Tree> {
    let num_symbols = counts.num_symbols();
    if num_symbols == 0 {
        return Err(HuffError::EmptyInput);
    }

    let mut nodes: Vec<Node> = Vec::new();
    nodes.try_reserve(2 * num_symbols - 1)?;
    nodes.extend(counts.symbols().map(|(symbol, count)| Node::leaf(symbol, count)));

    if num_symbols == 1 {
        debug!("single symbol tree");
        return Ok(Tree {
            nodes,
            root_node: 0,
        });
    }

    let handles = nodes
        .iter()
        .enumerate()
        .map(|(pos, node)| NodeHandle {
            count: node.count,
            pos: pos as u32,
        })
        .collect();
    let mut heap = MinHeap::from_vec(handles);

    let mut root_node = 0;
    while let (Some(first), second) = (heap.extract_min(), heap.extract_min()) {
        if let Some(second) = second {
            let pos = nodes.len() as u32;
            let count = first.count + second.count;
            // add internal Node with aggregated count
            nodes.push(Node {
                count,
                left: Some(first.pos),
                right: Some(second.pos),
                ..Default::default()
            });
            heap.insert(NodeHandle { count, pos });
        } else {
            // last node, which will be the root node
            root_node = first.pos as usize;
        }
    }

    let tree = Tree { nodes, root_node };
    debug!(
        "built tree with {} symbols, {} nodes, depth {}",
        num_symbols,
        tree.num_nodes(),
        tree.get_depth()
    );
    Ok(tree)
}
