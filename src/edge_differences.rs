use crate::EdgesetId;
use crate::EdgesetTable;
use crate::NodeId;
use crate::NodeTable;
use crate::Position;
use crate::Time;
use crate::TreeSequence;

/// One edgeset entering or leaving the active set at a breakpoint.
///
/// Carries the parent node, its time, and the children it holds over
/// the interval; the children borrow from the store's pool.
#[derive(Debug, Clone, Copy)]
pub struct DiffRecord<'ts> {
    node: NodeId,
    time: Time,
    children: &'ts [NodeId],
}

impl<'ts> DiffRecord<'ts> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn children(&self) -> &'ts [NodeId] {
        self.children
    }
}

impl<'ts> std::fmt::Display for DiffRecord<'ts> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node: {}, time: {}, children: {:?}",
            self.node(),
            self.time(),
            self.children()
        )
    }
}

/// The edgeset differences between one local tree and its predecessor.
///
/// Yielded by [`EdgeDifferencesIterator`].  `removals` are the
/// edgesets that end at the tree's left coordinate, `insertions` the
/// ones that begin there; for the first tree the removals are empty.
#[derive(Clone)]
pub struct TreeDiffs<'ts> {
    edgesets: &'ts EdgesetTable,
    nodes: &'ts NodeTable,
    insertion_order: &'ts [EdgesetId],
    removal_order: &'ts [EdgesetId],
    removals: (usize, usize),
    insertions: (usize, usize),
    left: f64,
    right: f64,
}

impl<'ts> TreeDiffs<'ts> {
    fn record(&self, k: EdgesetId) -> DiffRecord<'ts> {
        let j = k.as_usize();
        let node = self.edgesets.parent_column()[j];
        let (offset, len) = self.edgesets.children_range(j);
        DiffRecord {
            node,
            time: self.nodes.time_column()[node.as_usize()],
            children: &self.edgesets.children_mem()[offset..offset + len],
        }
    }

    /// The edgesets leaving the active set at this tree's left edge.
    pub fn removals(&self) -> impl Iterator<Item = DiffRecord<'ts>> + '_ {
        self.removal_order[self.removals.0..self.removals.1]
            .iter()
            .map(move |&k| self.record(k))
    }

    /// The edgesets entering the active set at this tree's left edge.
    pub fn insertions(&self) -> impl Iterator<Item = DiffRecord<'ts>> + '_ {
        self.insertion_order[self.insertions.0..self.insertions.1]
            .iter()
            .map(move |&k| self.record(k))
    }

    /// The `[left, right)` coordinates of the tree.
    pub fn interval(&self) -> (Position, Position) {
        (self.left.into(), self.right.into())
    }

    /// The length of the tree's interval.
    pub fn length(&self) -> Position {
        (self.right - self.left).into()
    }
}

/// Streams the per-tree edgeset differences left-to-right.
///
/// The iterator is finite and not restartable; call
/// [`TreeSequence::edge_differences_iter`] again to restart.
pub struct EdgeDifferencesIterator<'ts> {
    edgesets: &'ts EdgesetTable,
    nodes: &'ts NodeTable,
    insertion_order: &'ts [EdgesetId],
    removal_order: &'ts [EdgesetId],
    num_trees: usize,
    tree_left: f64,
    tree_index: usize,
    insertion_index: usize,
    removal_index: usize,
}

impl<'ts> EdgeDifferencesIterator<'ts> {
    pub(crate) fn new(treeseq: &'ts TreeSequence) -> Self {
        Self {
            edgesets: treeseq.edgesets(),
            nodes: treeseq.nodes(),
            insertion_order: treeseq.edge_insertion_order(),
            removal_order: treeseq.edge_removal_order(),
            num_trees: treeseq.num_trees(),
            tree_left: 0.,
            tree_index: 0,
            insertion_index: 0,
            removal_index: 0,
        }
    }
}

impl<'ts> Iterator for EdgeDifferencesIterator<'ts> {
    type Item = TreeDiffs<'ts>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.tree_index >= self.num_trees {
            return None;
        }
        let left_col = self.edgesets.left_column();
        let right_col = self.edgesets.right_column();
        let removals_start = self.removal_index;
        while self.removal_index < self.removal_order.len()
            && f64::from(right_col[self.removal_order[self.removal_index].as_usize()])
                == self.tree_left
        {
            self.removal_index += 1;
        }
        let insertions_start = self.insertion_index;
        while self.insertion_index < self.insertion_order.len()
            && f64::from(left_col[self.insertion_order[self.insertion_index].as_usize()])
                == self.tree_left
        {
            self.insertion_index += 1;
        }
        // The next breakpoint is the smallest right coordinate still
        // active, which is where the removal cursor now points.
        debug_assert!(self.removal_index < self.removal_order.len());
        let right = f64::from(right_col[self.removal_order[self.removal_index].as_usize()]);
        let diffs = TreeDiffs {
            edgesets: self.edgesets,
            nodes: self.nodes,
            insertion_order: self.insertion_order,
            removal_order: self.removal_order,
            removals: (removals_start, self.removal_index),
            insertions: (insertions_start, self.insertion_index),
            left: self.tree_left,
            right,
        };
        self.tree_left = right;
        self.tree_index += 1;
        Some(diffs)
    }
}
