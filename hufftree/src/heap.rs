/// Anything the heap can order, smaller weight has higher priority.
pub trait Weighted {
    fn weight(&self) -> u64;
}

/// Array backed binary min-heap.
///
/// Elements with equal weight come out in an order that depends only on their positions in the
/// backing array. That order is deterministic for the same sequence of operations, but it is not
/// insertion order.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        MinHeap { elements: vec![] }
    }
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left(i: usize) -> usize {
    2 * i + 1
}

impl<T: Weighted> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// heapify bottom-up, starting at the last parent
    pub fn from_vec(elements: Vec<T>) -> Self {
        let mut heap = MinHeap { elements };
        let n = heap.len();
        if n > 1 {
            for i in (0..=parent(n - 1)).rev() {
                heap.sift_down(i);
            }
        }
        heap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        self.sift_down(0);
        min
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if self.elements[p].weight() <= self.elements[i].weight() {
                break;
            }
            self.elements.swap(p, i);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let l = left(i);
            let r = l + 1;
            let mut smallest = i;
            if l < n && self.elements[l].weight() < self.elements[smallest].weight() {
                smallest = l;
            }
            if r < n && self.elements[r].weight() < self.elements[smallest].weight() {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn is_valid_min_heap(&self) -> bool {
        (1..self.len()).all(|i| self.elements[parent(i)].weight() <= self.elements[i].weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Weighted for u64 {
        fn weight(&self) -> u64 {
            *self
        }
    }

    #[derive(Debug, PartialEq)]
    struct Item {
        weight: u64,
        id: usize,
    }

    impl Weighted for Item {
        fn weight(&self) -> u64 {
            self.weight
        }
    }

    fn drain(mut heap: MinHeap<u64>) -> Vec<u64> {
        let mut out = vec![];
        while let Some(el) = heap.extract_min() {
            assert!(heap.is_valid_min_heap());
            out.push(el);
        }
        out
    }

    #[test]
    fn test_empty() {
        let mut heap: MinHeap<u64> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_insert_extract_sorted() {
        let mut heap = MinHeap::with_capacity(16);
        for val in &[5_u64, 3, 9, 1, 1, 7, 0, 12, 4] {
            heap.insert(*val);
            assert!(heap.is_valid_min_heap());
        }
        assert_eq!(heap.peek(), Some(&0));
        assert_eq!(drain(heap), vec![0, 1, 1, 3, 4, 5, 7, 9, 12]);
    }

    #[test]
    fn test_from_vec_heapifies() {
        let values: Vec<u64> = (0..100).map(|i| (i * 7919) % 101).collect();
        let heap = MinHeap::from_vec(values.clone());
        assert!(heap.is_valid_min_heap());
        assert_eq!(heap.len(), 100);

        let mut sorted = values;
        sorted.sort_unstable();
        assert_eq!(drain(heap), sorted);
    }

    #[test]
    fn test_from_vec_small() {
        assert_eq!(drain(MinHeap::from_vec(vec![])), Vec::<u64>::new());
        assert_eq!(drain(MinHeap::from_vec(vec![3])), vec![3]);
        assert_eq!(drain(MinHeap::from_vec(vec![3, 2])), vec![2, 3]);
    }

    #[test]
    fn test_equal_weights_all_come_out() {
        let items = (0..10).map(|id| Item { weight: 1, id }).collect();
        let mut heap = MinHeap::from_vec(items);
        let mut ids = vec![];
        while let Some(item) = heap.extract_min() {
            assert_eq!(item.weight, 1);
            ids.push(item.id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }
}
