use crate::EdgeDifferencesIterator;
use crate::EdgesetId;
use crate::EdgesetTable;
use crate::EdgesetTableRow;
use crate::MigrationTable;
use crate::MigrationTableRow;
use crate::MutationId;
use crate::MutationTable;
use crate::MutationTableRow;
use crate::NodeId;
use crate::NodeTable;
use crate::NodeTableRow;
use crate::Position;
use crate::ProvenanceTable;
use crate::SimplificationOptions;
use crate::SiteId;
use crate::SiteTable;
use crate::SiteTableRow;
use crate::SparseTree;
use crate::TableCollection;
use crate::TreeFlags;
use crate::TreeIterator;
use crate::TreeSequenceError;

/// Classification of the allelic states carried by a tree sequence.
///
/// `Binary` means every ancestral state is `"0"` and every derived
/// state is `"0"` or `"1"`; anything else is `Ascii`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    Binary,
    Ascii,
}

/// The insertion and removal permutations over the edgeset table.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgesetIndexes {
    pub(crate) insertion_order: Vec<EdgesetId>,
    pub(crate) removal_order: Vec<EdgesetId>,
}

/// A validated, indexed, immutable tree sequence.
///
/// The input tables are moved into the `TreeSequence` and never
/// mutated afterwards.  Iteration ([`tree_iterator`](Self::tree_iterator),
/// [`edge_differences_iter`](Self::edge_differences_iter)) and
/// [`simplify`](Self::simplify) are read-only observers of the store.
///
/// # Examples
///
/// ```
/// use treeseq::NodeId;
///
/// let mut tables = treeseq::TableCollection::new();
/// let s0 = tables.add_node(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
/// let s1 = tables.add_node(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
/// let parent = tables.add_node(treeseq::NodeFlags::default(), 1.0, -1, b"");
/// tables.add_edgeset(0.0, 10.0, parent, &[s0, s1]);
/// let ts = tables.tree_sequence().unwrap();
/// assert_eq!(ts.num_trees(), 1);
/// assert_eq!(ts.sequence_length(), 10.0);
/// assert_eq!(ts.samples(), &[s0, s1]);
/// ```
pub struct TreeSequence {
    tables: TableCollection,
    sequence_length: Position,
    alphabet: Alphabet,
    samples: Vec<NodeId>,
    sample_index_map: Vec<NodeId>,
    indexes: EdgesetIndexes,
    /// Per site: `(first mutation row, number of mutations)`.
    site_mutations: Vec<(usize, usize)>,
    /// Per tree: `(first site row, number of sites)`.
    tree_sites: Vec<(usize, usize)>,
    num_trees: usize,
}

impl TreeSequence {
    /// Validate `tables` and build the store.
    ///
    /// The sequence length is `max(right)` over the edgesets.  On
    /// success the tables are owned by the returned store; any
    /// failure discards them.  There is no partial load.
    ///
    /// # Errors
    ///
    /// Any structural variant of [`TreeSequenceError`].
    pub fn load_from_tables(tables: TableCollection) -> Result<Self, TreeSequenceError> {
        let mut sequence_length = Position::from(0.0);
        for r in tables.edgesets().right_column() {
            if *r > sequence_length {
                sequence_length = *r;
            }
        }
        Self::check(&tables, sequence_length)?;

        let nodes = tables.nodes();
        let mut samples = vec![];
        let mut sample_index_map = vec![NodeId::NULL; nodes.num_rows()];
        for (j, f) in nodes.flags_column().iter().enumerate() {
            if f.is_sample() {
                sample_index_map[j] = NodeId(samples.len() as i32);
                samples.push(NodeId(j as i32));
            }
        }

        let indexes = Self::build_indexes(tables.edgesets());

        let mut binary = true;
        for j in 0..tables.mutations().num_rows() {
            let state = tables.mutations().derived_state(MutationId(j as i32))?;
            if state != b"0" && state != b"1" {
                binary = false;
            }
        }
        for j in 0..tables.sites().num_rows() {
            if tables.sites().ancestral_state(SiteId(j as i32))? != b"0" {
                binary = false;
            }
        }
        let alphabet = match binary {
            true => Alphabet::Binary,
            false => Alphabet::Ascii,
        };

        // Mutations are sorted by site, so each site owns one
        // contiguous run of rows.
        let num_sites = tables.sites().num_rows();
        let site_col = tables.mutations().site_column();
        let mut site_mutations = Vec::with_capacity(num_sites);
        let mut k = 0;
        for j in 0..num_sites {
            let start = k;
            while k < site_col.len() && site_col[k].as_usize() == j {
                k += 1;
            }
            site_mutations.push((start, k - start));
        }

        // A new tree starts at every distinct left coordinate in
        // insertion order; each tree then owns the contiguous run of
        // sites positioned inside its interval.
        let left_col = tables.edgesets().left_column();
        let mut num_trees = 0;
        let mut last_x = -1.0;
        for e in &indexes.insertion_order {
            let x = f64::from(left_col[e.as_usize()]);
            if x != last_x {
                num_trees += 1;
                last_x = x;
            }
        }
        let positions = tables.sites().position_column();
        let mut tree_sites = vec![(0usize, 0usize); num_trees];
        if num_trees > 0 {
            let mut tree_index = 0;
            let mut last_x = 0.0;
            let mut site = 0;
            for e in &indexes.insertion_order {
                let x = f64::from(left_col[e.as_usize()]);
                if x != last_x {
                    let start = site;
                    while site < num_sites && f64::from(positions[site]) < x {
                        site += 1;
                    }
                    tree_sites[tree_index] = (start, site - start);
                    tree_index += 1;
                    last_x = x;
                }
            }
            let start = site;
            while site < num_sites && f64::from(positions[site]) < f64::from(sequence_length) {
                site += 1;
            }
            tree_sites[tree_index] = (start, site - start);
            debug_assert_eq!(site, num_sites);
        }

        Ok(Self {
            tables,
            sequence_length,
            alphabet,
            samples,
            sample_index_map,
            indexes,
            site_mutations,
            tree_sites,
            num_trees,
        })
    }

    /// Enforce the structural invariants on the input tables.
    fn check(
        tables: &TableCollection,
        sequence_length: Position,
    ) -> Result<(), TreeSequenceError> {
        use TreeSequenceError::*;

        let nodes = tables.nodes();
        let edgesets = tables.edgesets();
        let num_nodes = nodes.num_rows();
        let num_edgesets = edgesets.num_rows();
        let time = nodes.time_column();
        let flags = nodes.flags_column();
        let left_col = edgesets.left_column();
        let right_col = edgesets.right_column();
        let parent_col = edgesets.parent_column();

        let num_samples = flags.iter().filter(|f| f.is_sample()).count();
        if num_nodes > 0 && num_samples < 2 {
            return Err(InsufficientSamples);
        }

        // The candidate breakpoints are {left} ∪ {L}.  Every right
        // coordinate must be a member, which is equivalent to
        // requiring that the breakpoints exactly tile [0, L).
        let mut coordinates: Vec<f64> = left_col.iter().map(|p| f64::from(*p)).collect();
        coordinates.push(sequence_length.into());
        coordinates.sort_by(f64::total_cmp);
        if coordinates[0] != 0.0 {
            return Err(BadEdgesetNoLeftAtZero);
        }

        let mut min_left = f64::MAX;
        for j in 0..num_edgesets {
            let parent = parent_col[j];
            if parent.is_null() {
                return Err(NullNodeInRecord);
            }
            if parent.0 < 0 || parent.as_usize() >= num_nodes {
                return Err(NodeOutOfBounds);
            }
            if flags[parent.as_usize()].is_sample() {
                return Err(NodeSampleInternal);
            }
            let (off, len) = edgesets.children_range(j);
            let children = &edgesets.children_mem()[off..off + len];
            if children.is_empty() {
                return Err(ZeroChildren);
            }
            if j > 0 {
                // Input data must be time sorted.
                let prev = parent_col[j - 1];
                if f64::from(time[parent.as_usize()]) < f64::from(time[prev.as_usize()]) {
                    return Err(RecordsNotTimeSorted);
                }
            }
            min_left = min_left.min(f64::from(left_col[j]));
            for (k, &child) in children.iter().enumerate() {
                if child.is_null() {
                    return Err(NullNodeInRecord);
                }
                if child.0 < 0 || child.as_usize() >= num_nodes {
                    return Err(NodeOutOfBounds);
                }
                if k + 1 < children.len() && child >= children[k + 1] {
                    return Err(UnsortedChildren);
                }
                if f64::from(time[child.as_usize()]) >= f64::from(time[parent.as_usize()]) {
                    return Err(BadNodeTimeOrdering);
                }
            }
            if left_col[j] >= right_col[j] {
                return Err(BadRecordInterval);
            }
            let right = f64::from(right_col[j]);
            if coordinates
                .binary_search_by(|probe| probe.total_cmp(&right))
                .is_err()
            {
                return Err(BadEdgesetNonmatchingRight);
            }
        }
        if num_edgesets > 0 && min_left != 0.0 {
            return Err(BadEdgesetNoLeftAtZero);
        }

        let sites = tables.sites();
        let positions = sites.position_column();
        for j in 0..sites.num_rows() {
            if sites.ancestral_state(SiteId(j as i32))?.len() != 1 {
                return Err(BadAlphabet);
            }
            let position = f64::from(positions[j]);
            if position < 0.0 || position >= f64::from(sequence_length) {
                return Err(BadSitePosition);
            }
            if j > 0 && positions[j - 1] >= positions[j] {
                return Err(UnsortedSites);
            }
        }

        let mutations = tables.mutations();
        let site_col = mutations.site_column();
        let node_col = mutations.node_column();
        for j in 0..mutations.num_rows() {
            if mutations.derived_state(MutationId(j as i32))?.len() != 1 {
                return Err(BadAlphabet);
            }
            if site_col[j].0 < 0 || site_col[j].as_usize() >= sites.num_rows() {
                return Err(SiteOutOfBounds);
            }
            if node_col[j].0 < 0 || node_col[j].as_usize() >= num_nodes {
                return Err(NodeOutOfBounds);
            }
            // Mutations within a site are deliberately not checked for
            // time order or node uniqueness; simplified sequences can
            // legitimately stack mutations along a path.
            if j > 0 && site_col[j - 1] > site_col[j] {
                return Err(UnsortedMutations);
            }
        }

        Ok(())
    }

    fn build_indexes(edgesets: &EdgesetTable) -> EdgesetIndexes {
        struct IndexSortRecord {
            value: f64,
            time: i64,
            index: usize,
        }
        fn cmp(a: &IndexSortRecord, b: &IndexSortRecord) -> std::cmp::Ordering {
            a.value.total_cmp(&b.value).then_with(|| a.time.cmp(&b.time))
        }

        let num_rows = edgesets.num_rows();
        // Sort by left and increasing time to get the order in which
        // records are inserted.  Records are required to arrive in the
        // order they happened, so when left values tie the row index
        // stands in for the event time and keeps the result
        // independent of sort stability.
        let mut sort_buff: Vec<IndexSortRecord> = (0..num_rows)
            .map(|j| IndexSortRecord {
                value: edgesets.left_column()[j].into(),
                time: j as i64,
                index: j,
            })
            .collect();
        sort_buff.sort_by(cmp);
        let insertion_order = sort_buff.iter().map(|s| EdgesetId(s.index as i32)).collect();

        // Sort by right and decreasing time to get the order in which
        // records are removed.
        let mut sort_buff: Vec<IndexSortRecord> = (0..num_rows)
            .map(|j| IndexSortRecord {
                value: edgesets.right_column()[j].into(),
                time: -(j as i64),
                index: j,
            })
            .collect();
        sort_buff.sort_by(cmp);
        let removal_order = sort_buff.iter().map(|s| EdgesetId(s.index as i32)).collect();

        EdgesetIndexes {
            insertion_order,
            removal_order,
        }
    }

    delegate::delegate! {
        to self.tables {
            /// Get reference to the [`NodeTable`].
            pub fn nodes(&self) -> &NodeTable;
            /// Get reference to the [`EdgesetTable`].
            pub fn edgesets(&self) -> &EdgesetTable;
            /// Get reference to the [`MigrationTable`].
            pub fn migrations(&self) -> &MigrationTable;
            /// Get reference to the [`SiteTable`].
            pub fn sites(&self) -> &SiteTable;
            /// Get reference to the [`MutationTable`].
            pub fn mutations(&self) -> &MutationTable;
            /// Get reference to the [`ProvenanceTable`].
            pub fn provenances(&self) -> &ProvenanceTable;
        }
    }

    /// The owned, validated tables.
    pub fn tables(&self) -> &TableCollection {
        &self.tables
    }

    /// Copy the store back out into a fresh [`TableCollection`].
    pub fn dump_to_tables(&self) -> TableCollection {
        self.tables.clone()
    }

    /// The sequence length `L`, `max(right)` over the edgesets.
    pub fn sequence_length(&self) -> Position {
        self.sequence_length
    }

    /// The allelic-state classification of the sites and mutations.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn num_nodes(&self) -> usize {
        self.tables.nodes().num_rows()
    }

    pub fn num_edgesets(&self) -> usize {
        self.tables.edgesets().num_rows()
    }

    pub fn num_sites(&self) -> usize {
        self.tables.sites().num_rows()
    }

    pub fn num_mutations(&self) -> usize {
        self.tables.mutations().num_rows()
    }

    pub fn num_migrations(&self) -> usize {
        self.tables.migrations().num_rows()
    }

    pub fn num_provenances(&self) -> usize {
        self.tables.provenances().num_rows()
    }

    /// The number of local trees along `[0, L)`.
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// The number of sample nodes.
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// The sample nodes, in node-id order.
    pub fn samples(&self) -> &[NodeId] {
        &self.samples
    }

    /// For each node, its position in [`samples`](Self::samples), or
    /// NULL for non-samples.
    pub fn sample_index_map(&self) -> &[NodeId] {
        &self.sample_index_map
    }

    /// Is `u` a valid node with the sample flag set?
    pub fn is_sample(&self, u: NodeId) -> bool {
        u.0 >= 0
            && u.as_usize() < self.num_nodes()
            && self.tables.nodes().flags_column()[u.as_usize()].is_sample()
    }

    /// Return node `u`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `u` is out of range.
    pub fn node(&self, u: NodeId) -> Result<NodeTableRow, TreeSequenceError> {
        self.tables.nodes().row(u)
    }

    /// Return edgeset `e`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `e` is out of range.
    pub fn edgeset(&self, e: EdgesetId) -> Result<EdgesetTableRow, TreeSequenceError> {
        self.tables.edgesets().row(e)
    }

    /// Return site `s`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `s` is out of range.
    pub fn site(&self, s: SiteId) -> Result<SiteTableRow, TreeSequenceError> {
        self.tables.sites().row(s)
    }

    /// Return mutation `m`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `m` is out of range.
    pub fn mutation(&self, m: MutationId) -> Result<MutationTableRow, TreeSequenceError> {
        self.tables.mutations().row(m)
    }

    /// Return migration record `index`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `index` is out of range.
    pub fn migration(&self, index: usize) -> Result<MigrationTableRow, TreeSequenceError> {
        self.tables.migrations().row(index)
    }

    /// The order in which edgesets enter the active set during a
    /// left-to-right sweep.
    pub fn edge_insertion_order(&self) -> &[EdgesetId] {
        &self.indexes.insertion_order
    }

    /// The order in which edgesets leave the active set during a
    /// left-to-right sweep.
    pub fn edge_removal_order(&self) -> &[EdgesetId] {
        &self.indexes.removal_order
    }

    /// Iterate over the mutations at site `s`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if `s` is out of range.
    pub fn mutations_at_site(
        &self,
        s: SiteId,
    ) -> Result<impl Iterator<Item = MutationTableRow> + '_, TreeSequenceError> {
        if s.0 < 0 || s.as_usize() >= self.num_sites() {
            return Err(TreeSequenceError::OutOfBounds);
        }
        let (start, len) = self.site_mutations[s.as_usize()];
        Ok(self.tables.mutations().iter().skip(start).take(len))
    }

    pub(crate) fn site_mutation_bounds(&self, site: usize) -> (usize, usize) {
        self.site_mutations[site]
    }

    pub(crate) fn tree_site_bounds(&self, tree: usize) -> (usize, usize) {
        self.tree_sites[tree]
    }

    /// Create a streaming iterator over the local trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use treeseq::StreamingIterator;
    /// # use treeseq::NodeId;
    /// # let mut tables = treeseq::TableCollection::new();
    /// # let s0 = tables.add_node(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
    /// # let s1 = tables.add_node(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
    /// # let p = tables.add_node(treeseq::NodeFlags::default(), 1.0, -1, b"");
    /// # tables.add_edgeset(0.0, 1.0, p, &[s0, s1]);
    /// # let ts = tables.tree_sequence().unwrap();
    /// let mut ntrees = 0;
    /// let mut tree_iter = ts.tree_iterator(treeseq::TreeFlags::default());
    /// while let Some(tree) = tree_iter.next() {
    ///     ntrees += 1;
    ///     assert!(tree.interval().0 < tree.interval().1);
    /// }
    /// assert_eq!(ntrees, ts.num_trees());
    /// ```
    pub fn tree_iterator(&self, flags: TreeFlags) -> TreeIterator<'_> {
        TreeIterator::new(SparseTree::new(self, flags))
    }

    /// Create an iterator over the per-tree edgeset differences.
    pub fn edge_differences_iter(&self) -> EdgeDifferencesIterator<'_> {
        EdgeDifferencesIterator::new(self)
    }

    /// Project the tree sequence onto `samples`, producing a new store
    /// holding exactly their genealogy in dense node-id space:
    /// `0..samples.len()` are the samples in the given order and
    /// interior nodes get fresh ids in order of appearance.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::BadParamValue`] on fewer than two samples.
    /// * [`TreeSequenceError::OutOfBounds`] on an invalid node id.
    /// * [`TreeSequenceError::BadSamples`] on a non-sample input node.
    /// * [`TreeSequenceError::DuplicateSample`] on a repeated sample.
    /// * [`TreeSequenceError::CannotSimplify`] when nothing coalesces.
    pub fn simplify(
        &self,
        samples: &[NodeId],
        options: SimplificationOptions,
    ) -> Result<TreeSequence, TreeSequenceError> {
        let tables = crate::simplify::simplify_tables(self, samples, options)?;
        TreeSequence::load_from_tables(tables)
    }

    /// The mean number of pairwise differences between `samples`,
    /// `Σ count·(n−count) / (n·(n−1)/2)` over all sites.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::BadParamValue`] unless
    ///   `2 <= samples.len() <= num_samples`.
    /// * [`TreeSequenceError::UnsupportedOperation`] when a site is not
    ///   biallelic.
    pub fn pairwise_diversity(&self, samples: &[NodeId]) -> Result<f64, TreeSequenceError> {
        if samples.len() < 2 || samples.len() > self.samples.len() {
            return Err(TreeSequenceError::BadParamValue);
        }
        let n = samples.len() as f64;
        let mut tree = SparseTree::new(self, TreeFlags::LEAF_COUNTS);
        tree.set_tracked_leaves(samples)?;
        let node_col = self.tables.mutations().node_column();
        let mut result = 0.0;
        let mut more = tree.first();
        while more {
            let (site_start, site_len) = tree.site_bounds();
            for site in site_start..site_start + site_len {
                let (mutation_start, mutation_len) = self.site_mutation_bounds(site);
                if mutation_len != 1 {
                    return Err(TreeSequenceError::UnsupportedOperation);
                }
                for m in mutation_start..mutation_start + mutation_len {
                    let count = tree.num_tracked_leaves(node_col[m])? as f64;
                    result += count * (n - count);
                }
            }
            more = tree.next()?;
        }
        let denom = n * (n - 1.0) / 2.0;
        Ok(result / denom)
    }
}
