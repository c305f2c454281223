use crate::heap::Weighted;

#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    /// the symbol, limited to single byte alphabet. Only leaves have one
    pub(crate) symbol: Option<u8>,
    /// the number of occurences, sum of both children for parents
    pub(crate) count: u64,
    /// position of the left node in the array
    pub(crate) left: Option<u32>,
    /// position of the right node in the array
    pub(crate) right: Option<u32>,
}

impl Node {
    pub(crate) fn leaf(symbol: u8, count: u64) -> Self {
        Node {
            symbol: Some(symbol),
            count,
            ..Default::default()
        }
    }

    #[inline]
    pub fn symbol(&self) -> Option<u8> {
        self.symbol
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn left(&self) -> Option<u32> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<u32> {
        self.right
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl core::fmt::Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "Node{{ symbol:{:?} count:{} left:{:?} right:{:?} }}",
            self.symbol, self.count, self.left, self.right
        ))
    }
}

/// What the heap holds while building the tree, the nodes stay in the arena.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeHandle {
    pub(crate) count: u64,
    pub(crate) pos: u32,
}

impl Weighted for NodeHandle {
    #[inline]
    fn weight(&self) -> u64 {
        self.count
    }
}
