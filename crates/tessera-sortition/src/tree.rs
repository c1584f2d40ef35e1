//! Indexed weight-sum tree.
//!
//! A Fenwick tree over leaf weights. Leaves are appended in insertion order
//! and never removed; a departed member is a zero-weight leaf.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | push      | O(log n) |
//! | set       | O(log n) |
//! | prefix    | O(log n) |
//! | find      | O(log n) |

#[derive(Debug, Clone)]
pub struct WeightTree {
    leaves: Vec<u64>,
    /// 1-indexed partial sums; `nodes[i]` covers leaves `(i - lowbit(i), i]`.
    nodes: Vec<u64>,
}

#[inline]
const fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl Default for WeightTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightTree {
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            nodes: vec![0],
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Weight of leaf `index`.
    pub fn get(&self, index: usize) -> u64 {
        self.leaves.get(index).copied().unwrap_or(0)
    }

    /// Append a leaf, returning its index.
    pub fn push(&mut self, weight: u64) -> usize {
        let index = self.leaves.len();
        let i = index + 1;
        let node = weight + self.prefix(index) - self.prefix(i - lowbit(i));
        self.leaves.push(weight);
        self.nodes.push(node);
        index
    }

    /// Overwrite the weight of leaf `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, weight: u64) {
        let Some(old) = self.leaves.get(index).copied() else {
            return;
        };
        if old == weight {
            return;
        }
        self.leaves[index] = weight;

        let n = self.leaves.len();
        let mut i = index + 1;
        while i <= n {
            if weight > old {
                self.nodes[i] += weight - old;
            } else {
                self.nodes[i] -= old - weight;
            }
            i += lowbit(i);
        }
    }

    /// Sum of the first `count` leaves.
    pub fn prefix(&self, count: usize) -> u64 {
        let mut i = count.min(self.leaves.len());
        let mut sum = 0;
        while i > 0 {
            sum += self.nodes[i];
            i -= lowbit(i);
        }
        sum
    }

    pub fn total(&self) -> u64 {
        self.prefix(self.leaves.len())
    }

    /// Index of the first leaf whose cumulative weight exceeds `target`.
    ///
    /// `None` when `target >= total()`. Zero-weight leaves are never returned.
    pub fn find(&self, target: u64) -> Option<usize> {
        let n = self.leaves.len();
        if target >= self.total() {
            return None;
        }

        let mut pos = 0;
        let mut remaining = target;
        let mut step = if n == 0 { 0 } else { 1 << (usize::BITS - 1 - n.leading_zeros()) };
        while step > 0 {
            let next = pos + step;
            if next <= n && self.nodes[next] <= remaining {
                pos = next;
                remaining -= self.nodes[next];
            }
            step >>= 1;
        }
        Some(pos)
    }
}
