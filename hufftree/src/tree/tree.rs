use std::io::Read;
use std::io::Write;

use bitstream::BitReader;
use bitstream::BitWriter;
use common::HuffError;
use common::Result;
use common::ALPHABET_SIZE;

use super::tree_node::Node;
use crate::code::Code;

/// Huffman tree stored as an arena, children are referenced by their position in `nodes`.
///
/// Dropping the tree drops all nodes at once.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    /// position of the root. For a single symbol the root is that symbols leaf
    pub(crate) root_node: usize,
}

impl Tree {
    #[inline]
    pub fn get_node(&self, node_pos: u32) -> &Node {
        &self.nodes[node_pos as usize]
    }

    #[inline]
    pub fn root_node(&self) -> u32 {
        self.root_node as u32
    }

    #[inline]
    pub fn get_root_node(&self) -> &Node {
        &self.nodes[self.root_node]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// true for the degenerate tree of an input with one distinct symbol
    pub fn is_single_leaf(&self) -> bool {
        self.get_root_node().is_leaf()
    }

    /// returns all nodes in the tree containing a symbol, excluding intermediate parent nodes
    pub fn get_symbol_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn get_num_symbol_nodes(&self) -> usize {
        self.get_symbol_nodes().count()
    }

    /// length of the longest path from the root to a leaf
    pub fn get_depth(&self) -> u32 {
        let mut depth = 0;
        self.walk_tree(&mut |_node, code| depth = depth.max(code.len()));
        depth
    }

    /// Calls `fun` for every node below the root, depth first, left before right.
    ///
    /// The code passed along is the path from the root to that node.
    pub(crate) fn walk_tree<F>(&self, fun: &mut F)
    where
        F: FnMut(&Node, &Code),
    {
        self.walk_tree_internal(self.root_node, Code::default(), fun);
    }

    fn walk_tree_internal<F>(&self, start_node_pos: usize, path: Code, fun: &mut F)
    where
        F: FnMut(&Node, &Code),
    {
        let node = &self.nodes[start_node_pos];
        if let Some(left) = node.left {
            let left_path = path.with_bit(false);
            fun(&self.nodes[left as usize], &left_path);
            self.walk_tree_internal(left as usize, left_path, fun);
        }
        if let Some(right) = node.right {
            let right_path = path.with_bit(true);
            fun(&self.nodes[right as usize], &right_path);
            self.walk_tree_internal(right as usize, right_path, fun);
        }
    }

    /// number of bits `write_shape` produces for a tree with `num_symbols` leaves
    pub fn shape_bit_count(num_symbols: usize) -> u64 {
        let num_nodes = (2 * num_symbols as u64).saturating_sub(1);
        num_nodes + 8 * num_symbols as u64
    }

    /// Writes the tree in pre-order: `1` followed by the 8 symbol bits for a leaf, `0` for a
    /// parent followed by its left and then its right subtree. Counts are not written.
    pub fn write_shape<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        self.write_shape_internal(self.root_node, writer)
    }

    fn write_shape_internal<W: Write>(&self, node_pos: usize, writer: &mut BitWriter<W>) -> Result<()> {
        let node = &self.nodes[node_pos];
        match (node.symbol, node.left, node.right) {
            (Some(symbol), None, None) => {
                writer.add_bit(true)?;
                writer.add_bits(symbol as u64, 8)?;
            }
            (None, Some(left), Some(right)) => {
                writer.add_bit(false)?;
                self.write_shape_internal(left as usize, writer)?;
                self.write_shape_internal(right as usize, writer)?;
            }
            _ => return Err(HuffError::corrupt(writer.bits_written(), "malformed tree node")),
        }
        Ok(())
    }

    /// Reads a tree written by `write_shape`.
    ///
    /// The result has the same shape and symbols, all counts are 0. A shape that doesn't have
    /// exactly `num_symbols` distinct leaves is reported as `CorruptStream`.
    pub fn read_shape<R: Read>(reader: &mut BitReader<R>, num_symbols: usize) -> Result<Tree> {
        if num_symbols == 0 || num_symbols > ALPHABET_SIZE {
            return Err(HuffError::InvalidHeader("symbol count out of range"));
        }
        let mut shape = ShapeReader {
            nodes: Vec::new(),
            seen: [false; ALPHABET_SIZE],
            leaves_left: num_symbols,
            parents_left: num_symbols - 1,
        };
        shape.nodes.try_reserve(2 * num_symbols - 1)?;
        let root_node = shape.read_node(reader)? as usize;
        if shape.leaves_left != 0 {
            return Err(HuffError::corrupt(
                reader.bits_consumed(),
                "tree shape has fewer leaves than symbols",
            ));
        }
        Ok(Tree {
            nodes: shape.nodes,
            root_node,
        })
    }
}

struct ShapeReader {
    nodes: Vec<Node>,
    seen: [bool; ALPHABET_SIZE],
    leaves_left: usize,
    /// a full binary tree with n leaves has n - 1 parents, this also bounds the recursion
    parents_left: usize,
}

impl ShapeReader {
    fn read_node<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u32> {
        let is_leaf = reader.read_bit()?.ok_or_else(|| {
            HuffError::corrupt(reader.bits_consumed(), "tree shape ends early")
        })?;
        let pos = self.nodes.len() as u32;
        if is_leaf {
            if self.leaves_left == 0 {
                return Err(HuffError::corrupt(
                    reader.bits_consumed(),
                    "tree shape has more leaves than symbols",
                ));
            }
            let symbol = reader.read_bits(8)? as u8;
            if self.seen[symbol as usize] {
                return Err(HuffError::corrupt(
                    reader.bits_consumed(),
                    "symbol appears twice in tree shape",
                ));
            }
            self.seen[symbol as usize] = true;
            self.leaves_left -= 1;
            self.nodes.push(Node::leaf(symbol, 0));
        } else {
            if self.parents_left == 0 {
                return Err(HuffError::corrupt(
                    reader.bits_consumed(),
                    "tree shape has too many parents",
                ));
            }
            self.parents_left -= 1;
            self.nodes.push(Node::default());
            let left = self.read_node(reader)?;
            let right = self.read_node(reader)?;
            let node = &mut self.nodes[pos as usize];
            node.left = Some(left);
            node.right = Some(right);
        }
        Ok(pos)
    }
}
