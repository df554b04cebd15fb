//! Array-backed binary min-heap.
//!
//! Node `i` has children `2i + 1` and `2i + 2`; every non-root node compares
//! greater than or equal to its parent. Ties are resolved entirely by `T`'s
//! `Ord`, so callers that need stable ordering put a sequence number in it.

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    nodes: Vec<T>,
}

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

fn left_child(index: usize) -> usize {
    2 * index + 1
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add `item`, sifting it up past every parent that compares greater
    pub fn insert(&mut self, item: T) {
        self.nodes.push(item);
        self.sift_up(self.nodes.len() - 1);
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.nodes.first()
    }

    /// Remove the minimum. The last leaf takes the root's place and sinks
    /// toward the smaller child until the heap property holds again.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let min = self.nodes.swap_remove(0);
        self.sift_down(0);
        Some(min)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Elements in heap (not sorted) order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let up = parent(index);
            if self.nodes[up] <= self.nodes[index] {
                break;
            }
            self.nodes.swap(up, index);
            index = up;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = left_child(index);
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.nodes[right] < self.nodes[left] {
                right
            } else {
                left
            };
            if self.nodes[index] <= self.nodes[smaller] {
                break;
            }
            self.nodes.swap(index, smaller);
            index = smaller;
        }
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn assert_heap_property<T: Ord + std::fmt::Debug>(heap: &MinHeap<T>) {
        for index in 1..heap.nodes.len() {
            assert!(
                heap.nodes[parent(index)] <= heap.nodes[index],
                "node {} ({:?}) sorts before its parent",
                index,
                heap.nodes[index]
            );
        }
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: MinHeap<i32> = MinHeap::new();
        assert_eq!(heap.peek_min(), None);
        assert_eq!(heap.extract_min(), None);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_peek_does_not_change_size() {
        let mut heap = MinHeap::new();
        heap.insert(5);
        heap.insert(2);
        heap.insert(9);

        assert_eq!(heap.peek_min(), Some(&2));
        assert_eq!(heap.peek_min(), Some(&2));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_shuffled_permutations_extract_sorted() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in [1usize, 2, 3, 10, 257, 1000] {
            let mut values: Vec<u32> = (0..size as u32).collect();
            values.shuffle(&mut rng);

            let mut heap = MinHeap::with_capacity(size);
            for value in values {
                heap.insert(value);
            }
            assert_heap_property(&heap);

            let mut drained = Vec::with_capacity(size);
            while let Some(value) = heap.extract_min() {
                drained.push(value);
                assert_heap_property(&heap);
            }
            assert_eq!(drained, (0..size as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_ties_come_out_in_insertion_order() {
        // (priority, insertion order)
        let mut heap = MinHeap::new();
        let priorities = [3, 1, 3, 2, 1, 3, 1];
        for (order, priority) in priorities.iter().enumerate() {
            heap.insert((*priority, order));
        }

        let drained: Vec<(i32, usize)> = std::iter::from_fn(|| heap.extract_min()).collect();
        assert_eq!(
            drained,
            vec![(1, 1), (1, 4), (1, 6), (2, 3), (3, 0), (3, 2), (3, 5)]
        );
    }

    #[test]
    fn test_clear() {
        let mut heap = MinHeap::new();
        heap.insert('x');
        heap.insert('y');
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.peek_min(), None);

        heap.insert('z');
        assert_eq!(heap.extract_min(), Some('z'));
    }
}
