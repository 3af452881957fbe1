use streaming_iterator::DoubleEndedStreamingIterator;
use streaming_iterator::StreamingIterator;

use crate::NodeId;
use crate::PopulationId;
use crate::Position;
use crate::SiteTableRow;
use crate::Time;
use crate::TreeFlags;
use crate::TreeSequence;
use crate::TreeSequenceError;

const NULL_INDEX: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// One entry of the preallocated leaf-list pool: the sample it stands
/// for and the pool index of the next entry in its list.
#[derive(Debug, Clone, Copy)]
struct LeafListNode {
    node: NodeId,
    next: i32,
}

/// One local tree of a [`TreeSequence`], materialised over the full
/// node space.
///
/// The tree is repositioned in place by [`first`](Self::first),
/// [`last`](Self::last), [`next`](Self::next) and [`prev`](Self::prev);
/// one advance routine serves both directions, so forward and reverse
/// steps can be mixed freely.  Children are ranges into the store's
/// children pool, so moving between trees allocates nothing.
///
/// Optional state is selected by [`TreeFlags`] at creation:
/// `LEAF_COUNTS` maintains per-node leaf and tracked-leaf counts,
/// `LEAF_LISTS` maintains per-node linked lists of leaf descendants
/// drawn from a pool sized to the sample count.
pub struct SparseTree<'ts> {
    tree_sequence: &'ts TreeSequence,
    flags: TreeFlags,
    parent: Vec<NodeId>,
    population: Vec<PopulationId>,
    time: Vec<Time>,
    /// Per node: `(offset, length)` into the store's children pool.
    children: Vec<(usize, usize)>,
    root: NodeId,
    left: f64,
    right: f64,
    /// Tree index along the sequence; -1 before positioning.
    pub(crate) index: i64,
    /// `(first site row, number of sites)` for the current tree.
    sites: (usize, usize),
    direction: Direction,
    left_index: i64,
    right_index: i64,
    mark: u8,
    num_leaves: Vec<u32>,
    num_tracked_leaves: Vec<u32>,
    marked: Vec<u8>,
    leaf_list_head: Vec<i32>,
    leaf_list_tail: Vec<i32>,
    leaf_list_node_mem: Vec<LeafListNode>,
}

impl<'ts> SparseTree<'ts> {
    /// Create a tree over `tree_sequence`, positioned nowhere.
    pub fn new(tree_sequence: &'ts TreeSequence, flags: TreeFlags) -> Self {
        let num_nodes = tree_sequence.num_nodes();
        let num_samples = tree_sequence.num_samples();
        let counts = flags.contains(TreeFlags::LEAF_COUNTS);
        let lists = flags.contains(TreeFlags::LEAF_LISTS);
        let mut tree = Self {
            tree_sequence,
            flags,
            parent: vec![NodeId::NULL; num_nodes],
            population: vec![PopulationId::NULL; num_nodes],
            time: vec![Time::from(0.); num_nodes],
            children: vec![(0, 0); num_nodes],
            root: NodeId(0),
            left: 0.,
            right: 0.,
            index: -1,
            sites: (0, 0),
            direction: Direction::Forward,
            left_index: 0,
            right_index: 0,
            mark: 0,
            num_leaves: if counts { vec![0; num_nodes] } else { vec![] },
            num_tracked_leaves: if counts { vec![0; num_nodes] } else { vec![] },
            marked: if counts { vec![0; num_nodes] } else { vec![] },
            leaf_list_head: if lists { vec![NULL_INDEX; num_nodes] } else { vec![] },
            leaf_list_tail: if lists { vec![NULL_INDEX; num_nodes] } else { vec![] },
            leaf_list_node_mem: if lists {
                vec![
                    LeafListNode {
                        node: NodeId::NULL,
                        next: NULL_INDEX
                    };
                    num_samples
                ]
            } else {
                vec![]
            },
        };
        tree.clear();
        tree
    }

    fn clear(&mut self) {
        let ts = self.tree_sequence;
        self.left = 0.;
        self.right = 0.;
        self.root = NodeId(0);
        self.index = -1;
        self.sites = (0, 0);
        self.parent.fill(NodeId::NULL);
        self.population.fill(PopulationId::NULL);
        self.time.fill(Time::from(0.));
        self.children.fill((0, 0));
        if self.flags.contains(TreeFlags::LEAF_COUNTS) {
            self.num_leaves.fill(0);
            self.marked.fill(0);
            // Tracked-leaf counts at the samples survive repositioning;
            // only interior residue is cleared.
            for j in 0..self.num_tracked_leaves.len() {
                if !ts.is_sample(NodeId(j as i32)) {
                    self.num_tracked_leaves[j] = 0;
                }
            }
        }
        if self.flags.contains(TreeFlags::LEAF_LISTS) {
            self.leaf_list_head.fill(NULL_INDEX);
            self.leaf_list_tail.fill(NULL_INDEX);
        }
        let nodes = ts.nodes();
        for (j, &u) in ts.samples().iter().enumerate() {
            let ui = u.as_usize();
            self.population[ui] = nodes.population_column()[ui];
            self.time[ui] = nodes.time_column()[ui];
            if self.flags.contains(TreeFlags::LEAF_COUNTS) {
                self.num_leaves[ui] = 1;
            }
            if self.flags.contains(TreeFlags::LEAF_LISTS) {
                self.leaf_list_node_mem[j] = LeafListNode {
                    node: u,
                    next: NULL_INDEX,
                };
                self.leaf_list_head[ui] = j as i32;
                self.leaf_list_tail[ui] = j as i32;
            }
        }
    }

    /// Move one breakpoint in `direction`.  The same routine serves
    /// both directions; when the direction flips, the in/out cursors
    /// are shifted one step to compensate for "about to leave going
    /// forward" meaning "already left going backward".
    fn advance(&mut self, direction: Direction) {
        let ts = self.tree_sequence;
        let edgesets = ts.edgesets();
        let nodes = ts.nodes();
        let pool = edgesets.children_mem();
        let parent_col = edgesets.parent_column();
        let (out_breaks, out_order, in_breaks, in_order) = match direction {
            Direction::Forward => (
                edgesets.right_column(),
                ts.edge_removal_order(),
                edgesets.left_column(),
                ts.edge_insertion_order(),
            ),
            Direction::Reverse => (
                edgesets.left_column(),
                ts.edge_insertion_order(),
                edgesets.right_column(),
                ts.edge_removal_order(),
            ),
        };
        let step = direction.step();
        let direction_change = match direction == self.direction {
            true => 0,
            false => step,
        };
        let (mut in_idx, mut out_idx) = match direction {
            Direction::Forward => (
                self.left_index + direction_change,
                self.right_index + direction_change,
            ),
            Direction::Reverse => (
                self.right_index + direction_change,
                self.left_index + direction_change,
            ),
        };
        let num_records = edgesets.num_rows() as i64;
        debug_assert!(in_idx >= 0 && in_idx < num_records);
        let x = f64::from(in_breaks[in_order[in_idx as usize].as_usize()]);

        while out_idx >= 0
            && out_idx < num_records
            && f64::from(out_breaks[out_order[out_idx as usize].as_usize()]) == x
        {
            let k = out_order[out_idx as usize];
            let u = parent_col[k.as_usize()];
            let ui = u.as_usize();
            let (offset, len) = self.children[ui];
            let mut oldest_child = NodeId(0);
            let mut oldest_child_time = -1.0;
            for &c in &pool[offset..offset + len] {
                self.parent[c.as_usize()] = NodeId::NULL;
                if f64::from(self.time[c.as_usize()]) > oldest_child_time {
                    oldest_child = c;
                    oldest_child_time = self.time[c.as_usize()].into();
                }
            }
            self.children[ui] = (0, 0);
            self.time[ui] = Time::from(0.);
            self.population[ui] = PopulationId::NULL;
            if u == self.root {
                self.root = oldest_child;
            }
            if self.flags.contains(TreeFlags::LEAF_COUNTS) {
                self.propagate_leaf_count_loss(u);
            }
            if self.flags.contains(TreeFlags::LEAF_LISTS) {
                self.update_leaf_lists(u);
            }
            out_idx += step;
        }

        while in_idx >= 0
            && in_idx < num_records
            && f64::from(in_breaks[in_order[in_idx as usize].as_usize()]) == x
        {
            let k = in_order[in_idx as usize];
            let ki = k.as_usize();
            let u = parent_col[ki];
            let ui = u.as_usize();
            let (offset, len) = edgesets.children_range(ki);
            for &c in &pool[offset..offset + len] {
                self.parent[c.as_usize()] = u;
            }
            self.children[ui] = (offset, len);
            self.time[ui] = nodes.time_column()[ui];
            self.population[ui] = nodes.population_column()[ui];
            if f64::from(self.time[ui]) > f64::from(self.time[self.root.as_usize()]) {
                self.root = u;
            }
            if self.flags.contains(TreeFlags::LEAF_COUNTS) {
                self.propagate_leaf_count_gain(u);
            }
            if self.flags.contains(TreeFlags::LEAF_LISTS) {
                self.update_leaf_lists(u);
            }
            in_idx += step;
        }

        // In rare situations the root must be corrected by walking
        // upwards.
        while !self.parent[self.root.as_usize()].is_null() {
            self.root = self.parent[self.root.as_usize()];
        }

        debug_assert!(out_idx >= 0 && out_idx < num_records);
        let out_break = f64::from(out_breaks[out_order[out_idx as usize].as_usize()]);
        match direction {
            Direction::Forward => {
                self.left = x;
                self.right = out_break;
            }
            Direction::Reverse => {
                self.left = out_break;
                self.right = x;
            }
        }
        self.direction = direction;
        self.index += step;
        match direction {
            Direction::Forward => {
                self.left_index = in_idx;
                self.right_index = out_idx;
            }
            Direction::Reverse => {
                self.right_index = in_idx;
                self.left_index = out_idx;
            }
        }
        if ts.num_sites() > 0 {
            self.sites = ts.tree_site_bounds(self.index as usize);
        }
    }

    /// Position at the first tree.  Returns `false` when the sequence
    /// has no trees.
    pub fn first(&mut self) -> bool {
        if self.tree_sequence.num_edgesets() > 0 {
            self.clear();
            self.left_index = 0;
            self.right_index = 0;
            self.direction = Direction::Forward;
            self.advance(Direction::Forward);
            true
        } else {
            false
        }
    }

    /// Position at the last tree.  Returns `false` when the sequence
    /// has no trees.
    pub fn last(&mut self) -> bool {
        let num_edgesets = self.tree_sequence.num_edgesets();
        if num_edgesets > 0 {
            self.clear();
            self.left_index = num_edgesets as i64 - 1;
            self.right_index = num_edgesets as i64 - 1;
            self.direction = Direction::Reverse;
            self.index = self.tree_sequence.num_trees() as i64;
            self.advance(Direction::Reverse);
            true
        } else {
            false
        }
    }

    /// Advance to the next tree.  Returns `false` at the last tree.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::NotInitialised`] before
    /// [`first`](Self::first) or [`last`](Self::last).
    pub fn next(&mut self) -> Result<bool, TreeSequenceError> {
        if self.index < 0 {
            return Err(TreeSequenceError::NotInitialised);
        }
        if self.index + 1 < self.tree_sequence.num_trees() as i64 {
            self.advance(Direction::Forward);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Step back to the previous tree.  Returns `false` at the first
    /// tree.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::NotInitialised`] before
    /// [`first`](Self::first) or [`last`](Self::last).
    pub fn prev(&mut self) -> Result<bool, TreeSequenceError> {
        if self.index < 0 {
            return Err(TreeSequenceError::NotInitialised);
        }
        if self.index > 0 {
            self.advance(Direction::Reverse);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn propagate_leaf_count_loss(&mut self, u: NodeId) {
        let all_leaves_diff = self.num_leaves[u.as_usize()];
        let tracked_leaves_diff = self.num_tracked_leaves[u.as_usize()];
        let mark = self.mark;
        // propagate this loss up as far as we can
        let mut v = u;
        while !v.is_null() {
            let vi = v.as_usize();
            self.num_leaves[vi] -= all_leaves_diff;
            self.num_tracked_leaves[vi] -= tracked_leaves_diff;
            self.marked[vi] = mark;
            v = self.parent[vi];
        }
    }

    fn propagate_leaf_count_gain(&mut self, u: NodeId) {
        let ts = self.tree_sequence;
        let pool = ts.edgesets().children_mem();
        let (offset, len) = self.children[u.as_usize()];
        let mut all_leaves_diff = 0;
        let mut tracked_leaves_diff = 0;
        for &c in &pool[offset..offset + len] {
            all_leaves_diff += self.num_leaves[c.as_usize()];
            tracked_leaves_diff += self.num_tracked_leaves[c.as_usize()];
        }
        let mark = self.mark;
        // propagate this gain up as far as we can
        let mut v = u;
        while !v.is_null() {
            let vi = v.as_usize();
            self.num_leaves[vi] += all_leaves_diff;
            self.num_tracked_leaves[vi] += tracked_leaves_diff;
            self.marked[vi] = mark;
            v = self.parent[vi];
        }
    }

    /// Rebuild the leaf lists of `node` and its ancestors by
    /// concatenating their children's lists.
    fn update_leaf_lists(&mut self, node: NodeId) {
        let ts = self.tree_sequence;
        let pool = ts.edgesets().children_mem();
        let mut u = node;
        while !u.is_null() {
            let ui = u.as_usize();
            self.leaf_list_head[ui] = NULL_INDEX;
            self.leaf_list_tail[ui] = NULL_INDEX;
            let (offset, len) = self.children[ui];
            for &v in &pool[offset..offset + len] {
                let vi = v.as_usize();
                let head_v = self.leaf_list_head[vi];
                if head_v != NULL_INDEX {
                    debug_assert!(self.leaf_list_tail[vi] != NULL_INDEX);
                    if self.leaf_list_head[ui] == NULL_INDEX {
                        self.leaf_list_head[ui] = head_v;
                        self.leaf_list_tail[ui] = self.leaf_list_tail[vi];
                    } else {
                        let tail_u = self.leaf_list_tail[ui] as usize;
                        self.leaf_list_node_mem[tail_u].next = head_v;
                        self.leaf_list_tail[ui] = self.leaf_list_tail[vi];
                    }
                }
            }
            u = self.parent[ui];
        }
    }

    fn check_node(&self, u: NodeId) -> Result<(), TreeSequenceError> {
        if u.0 < 0 || u.as_usize() >= self.parent.len() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(())
        }
    }

    /// Replace the set of tracked leaves.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::UnsupportedOperation`] without
    ///   [`TreeFlags::LEAF_COUNTS`].
    /// * [`TreeSequenceError::OutOfBounds`] on an invalid node id.
    /// * [`TreeSequenceError::BadSamples`] on a non-sample node.
    /// * [`TreeSequenceError::DuplicateSample`] on a repeated node.
    pub fn set_tracked_leaves(&mut self, leaves: &[NodeId]) -> Result<(), TreeSequenceError> {
        if !self.flags.contains(TreeFlags::LEAF_COUNTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        self.num_tracked_leaves.fill(0);
        for &u in leaves {
            self.check_node(u)?;
            if !self.tree_sequence.is_sample(u) {
                return Err(TreeSequenceError::BadSamples);
            }
            if self.num_tracked_leaves[u.as_usize()] != 0 {
                return Err(TreeSequenceError::DuplicateSample);
            }
            let mut v = u;
            while !v.is_null() {
                self.num_tracked_leaves[v.as_usize()] += 1;
                v = self.parent[v.as_usize()];
            }
        }
        Ok(())
    }

    /// The most recent common ancestor of `u` and `v`, or NULL when
    /// they have none in this tree.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if either node is invalid.
    pub fn mrca(&self, u: NodeId, v: NodeId) -> Result<NodeId, TreeSequenceError> {
        self.check_node(u)?;
        self.check_node(v)?;
        let root_path = |start: NodeId| {
            let mut stack = vec![];
            let mut j = start;
            while !j.is_null() {
                stack.push(j);
                j = self.parent[j.as_usize()];
            }
            stack.push(NodeId::NULL);
            stack
        };
        let s1 = root_path(u);
        let s2 = root_path(v);
        let mut l1 = (s1.len() - 1) as i64;
        let mut l2 = (s2.len() - 1) as i64;
        let mut w;
        loop {
            w = s1[l1 as usize];
            l1 -= 1;
            l2 -= 1;
            if !(l1 >= 0 && l2 >= 0 && s1[l1 as usize] == s2[l2 as usize]) {
                break;
            }
        }
        Ok(w)
    }

    fn num_leaves_by_traversal(&self, u: NodeId) -> usize {
        let ts = self.tree_sequence;
        let pool = ts.edgesets().children_mem();
        let mut stack = vec![u];
        let mut count = 0;
        while let Some(v) = stack.pop() {
            if ts.is_sample(v) {
                count += 1;
            }
            let (offset, len) = self.children[v.as_usize()];
            stack.extend_from_slice(&pool[offset..offset + len]);
        }
        count
    }

    /// The number of leaves (sample descendants) below `u`.
    ///
    /// O(1) with [`TreeFlags::LEAF_COUNTS`], otherwise a traversal.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    pub fn num_leaves(&self, u: NodeId) -> Result<usize, TreeSequenceError> {
        self.check_node(u)?;
        if self.flags.contains(TreeFlags::LEAF_COUNTS) {
            Ok(self.num_leaves[u.as_usize()] as usize)
        } else {
            Ok(self.num_leaves_by_traversal(u))
        }
    }

    /// The number of tracked leaves below `u`.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    /// * [`TreeSequenceError::UnsupportedOperation`] without
    ///   [`TreeFlags::LEAF_COUNTS`].
    pub fn num_tracked_leaves(&self, u: NodeId) -> Result<usize, TreeSequenceError> {
        self.check_node(u)?;
        if !self.flags.contains(TreeFlags::LEAF_COUNTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        Ok(self.num_tracked_leaves[u.as_usize()] as usize)
    }

    /// Set the mark stamped onto every node whose leaf counts change
    /// during subsequent advances.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::UnsupportedOperation`] without
    /// [`TreeFlags::LEAF_COUNTS`].
    pub fn set_mark(&mut self, mark: u8) -> Result<(), TreeSequenceError> {
        if !self.flags.contains(TreeFlags::LEAF_COUNTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        self.mark = mark;
        Ok(())
    }

    /// The mark last stamped onto `u` by leaf-count propagation.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    /// * [`TreeSequenceError::UnsupportedOperation`] without
    ///   [`TreeFlags::LEAF_COUNTS`].
    pub fn mark(&self, u: NodeId) -> Result<u8, TreeSequenceError> {
        self.check_node(u)?;
        if !self.flags.contains(TreeFlags::LEAF_COUNTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        Ok(self.marked[u.as_usize()])
    }

    /// Iterate over the leaves below `u` using the maintained lists.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    /// * [`TreeSequenceError::UnsupportedOperation`] without
    ///   [`TreeFlags::LEAF_LISTS`].
    pub fn leaves(&self, u: NodeId) -> Result<LeafIterator<'_>, TreeSequenceError> {
        self.check_node(u)?;
        if !self.flags.contains(TreeFlags::LEAF_LISTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        Ok(LeafIterator {
            pool: &self.leaf_list_node_mem,
            next: self.leaf_list_head[u.as_usize()],
            tail: self.leaf_list_tail[u.as_usize()],
        })
    }

    /// Assign `source`'s position and topology to `self`.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::BadParamValue`] when the trees belong to
    ///   different stores.
    /// * [`TreeSequenceError::UnsupportedOperation`] when `self`
    ///   maintains state that `source` does not.
    pub fn copy_from(&mut self, source: &SparseTree<'ts>) -> Result<(), TreeSequenceError> {
        if !std::ptr::eq(self.tree_sequence, source.tree_sequence) {
            return Err(TreeSequenceError::BadParamValue);
        }
        if self.flags.contains(TreeFlags::LEAF_LISTS) {
            return Err(TreeSequenceError::UnsupportedOperation);
        }
        if self.flags.contains(TreeFlags::LEAF_COUNTS) {
            if !source.flags.contains(TreeFlags::LEAF_COUNTS) {
                return Err(TreeSequenceError::UnsupportedOperation);
            }
            self.num_leaves.copy_from_slice(&source.num_leaves);
        }
        self.left = source.left;
        self.right = source.right;
        self.root = source.root;
        self.index = source.index;
        self.sites = source.sites;
        self.parent.copy_from_slice(&source.parent);
        self.population.copy_from_slice(&source.population);
        self.time.copy_from_slice(&source.time);
        self.children.copy_from_slice(&source.children);
        Ok(())
    }

    /// Topological equality: position, root, and the per-node
    /// parent/population/time/children state.  Optional counts and
    /// leaf lists are not considered.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::BadParamValue`] when the trees belong to
    /// different stores.
    pub fn equal(&self, other: &SparseTree<'ts>) -> Result<bool, TreeSequenceError> {
        if !std::ptr::eq(self.tree_sequence, other.tree_sequence) {
            return Err(TreeSequenceError::BadParamValue);
        }
        Ok(self.index == other.index
            && self.left == other.left
            && self.right == other.right
            && self.root == other.root
            && self.sites == other.sites
            && self.parent == other.parent
            && self.population == other.population
            && self.time == other.time
            && self.children == other.children)
    }

    /// The root of the current tree.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `[left, right)` coordinates of the current tree.
    pub fn interval(&self) -> (Position, Position) {
        (self.left.into(), self.right.into())
    }

    /// The length of the genome for which this tree is the ancestry.
    pub fn span(&self) -> Position {
        Position::from(self.right - self.left)
    }

    /// The current tree's index along the sequence, or `None` before
    /// positioning.
    pub fn index(&self) -> Option<usize> {
        match self.index {
            i if i < 0 => None,
            i => Some(i as usize),
        }
    }

    pub fn flags(&self) -> TreeFlags {
        self.flags
    }

    /// The tree sequence this tree belongs to.
    pub fn tree_sequence(&self) -> &'ts TreeSequence {
        self.tree_sequence
    }

    /// Get the parent of node `u`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    pub fn parent(&self, u: NodeId) -> Result<NodeId, TreeSequenceError> {
        self.check_node(u).map(|_| self.parent[u.as_usize()])
    }

    /// Get the time of node `u` in the current tree; isolated nodes
    /// read as zero.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    pub fn time(&self, u: NodeId) -> Result<Time, TreeSequenceError> {
        self.check_node(u).map(|_| self.time[u.as_usize()])
    }

    /// Get the children of node `u` in the current tree.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    pub fn children(&self, u: NodeId) -> Result<&'ts [NodeId], TreeSequenceError> {
        self.check_node(u)?;
        let (offset, len) = self.children[u.as_usize()];
        Ok(&self.tree_sequence.edgesets().children_mem()[offset..offset + len])
    }

    /// Get the number of children of node `u` in the current tree.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is invalid.
    pub fn num_children(&self, u: NodeId) -> Result<usize, TreeSequenceError> {
        self.check_node(u).map(|_| self.children[u.as_usize()].1)
    }

    /// Iterate over the sites falling inside the current tree's
    /// interval.
    pub fn sites(&self) -> impl Iterator<Item = SiteTableRow> + '_ {
        let (start, len) = self.sites;
        self.tree_sequence.sites().iter().skip(start).take(len)
    }

    /// The number of sites inside the current tree's interval.
    pub fn num_sites(&self) -> usize {
        self.sites.1
    }

    pub(crate) fn site_bounds(&self) -> (usize, usize) {
        self.sites
    }
}

/// Iterates the leaf list of one node; see [`SparseTree::leaves`].
pub struct LeafIterator<'a> {
    pool: &'a [LeafListNode],
    next: i32,
    tail: i32,
}

impl<'a> Iterator for LeafIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NULL_INDEX {
            None
        } else {
            let record = self.pool[self.next as usize];
            self.next = match self.next == self.tail {
                true => NULL_INDEX,
                false => record.next,
            };
            Some(record.node)
        }
    }
}

/// A streaming iterator over the trees of a [`TreeSequence`].
///
/// Forward iteration goes through [`StreamingIterator`], reverse
/// through [`DoubleEndedStreamingIterator`]; both lend out the same
/// in-place [`SparseTree`].
pub struct TreeIterator<'ts> {
    tree: SparseTree<'ts>,
    advanced: bool,
}

impl<'ts> TreeIterator<'ts> {
    pub(crate) fn new(tree: SparseTree<'ts>) -> Self {
        Self {
            tree,
            advanced: false,
        }
    }
}

impl<'ts> StreamingIterator for TreeIterator<'ts> {
    type Item = SparseTree<'ts>;

    fn advance(&mut self) {
        self.advanced = match self.tree.index {
            i if i < 0 => self.tree.first(),
            _ => self.tree.next().unwrap_or(false),
        };
    }

    fn get(&self) -> Option<&SparseTree<'ts>> {
        match self.advanced {
            true => Some(&self.tree),
            false => None,
        }
    }
}

impl<'ts> DoubleEndedStreamingIterator for TreeIterator<'ts> {
    fn advance_back(&mut self) {
        self.advanced = match self.tree.index {
            i if i < 0 => self.tree.last(),
            _ => self.tree.prev().unwrap_or(false),
        };
    }
}
