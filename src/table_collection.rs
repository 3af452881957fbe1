use crate::EdgesetId;
use crate::EdgesetTable;
use crate::MigrationTable;
use crate::MutationId;
use crate::MutationTable;
use crate::NodeFlags;
use crate::NodeId;
use crate::NodeTable;
use crate::PopulationId;
use crate::Position;
use crate::ProvenanceTable;
use crate::SiteId;
use crate::SiteTable;
use crate::Time;
use crate::TreeSequence;
use crate::TreeSequenceError;

/// A collection of the six input tables.
///
/// The collection is the mutable staging area for tree-sequence data:
/// rows are appended here, then the whole collection is moved into a
/// [`TreeSequence`] which validates it and never mutates it again.
///
/// # Examples
///
/// ```
/// use treeseq::NodeId;
///
/// let mut tables = treeseq::TableCollection::new();
/// for _ in 0..2 {
///     tables.add_node(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
/// }
/// let parent = tables.add_node(treeseq::NodeFlags::default(), 1.0, -1, b"");
/// tables.add_edgeset(0.0, 1.0, parent, &[NodeId::from(0), NodeId::from(1)]);
/// let ts = tables.tree_sequence().unwrap();
/// assert_eq!(ts.num_trees(), 1);
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TableCollection {
    nodes: NodeTable,
    edgesets: EdgesetTable,
    migrations: MigrationTable,
    sites: SiteTable,
    mutations: MutationTable,
    provenances: ProvenanceTable,
}

impl TableCollection {
    /// Create an empty table collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to the [`NodeTable`].
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Get reference to the [`EdgesetTable`].
    pub fn edgesets(&self) -> &EdgesetTable {
        &self.edgesets
    }

    /// Get reference to the [`MigrationTable`].
    pub fn migrations(&self) -> &MigrationTable {
        &self.migrations
    }

    /// Get reference to the [`SiteTable`].
    pub fn sites(&self) -> &SiteTable {
        &self.sites
    }

    /// Get reference to the [`MutationTable`].
    pub fn mutations(&self) -> &MutationTable {
        &self.mutations
    }

    /// Get reference to the [`ProvenanceTable`].
    pub fn provenances(&self) -> &ProvenanceTable {
        &self.provenances
    }

    /// Add a row to the node table.
    pub fn add_node<T: Into<Time>, P: Into<PopulationId>>(
        &mut self,
        flags: NodeFlags,
        time: T,
        population: P,
        name: &[u8],
    ) -> NodeId {
        self.nodes.add_row(flags, time, population, name)
    }

    /// Add a row to the edgeset table.
    pub fn add_edgeset<L, R, P>(
        &mut self,
        left: L,
        right: R,
        parent: P,
        children: &[NodeId],
    ) -> EdgesetId
    where
        L: Into<Position>,
        R: Into<Position>,
        P: Into<NodeId>,
    {
        self.edgesets.add_row(left, right, parent, children)
    }

    /// Add a row to the site table.
    pub fn add_site<P: Into<Position>>(&mut self, position: P, ancestral_state: &[u8]) -> SiteId {
        self.sites.add_row(position, ancestral_state)
    }

    /// Add a row to the mutation table.
    pub fn add_mutation<S: Into<SiteId>, N: Into<NodeId>>(
        &mut self,
        site: S,
        node: N,
        derived_state: &[u8],
    ) -> MutationId {
        self.mutations.add_row(site, node, derived_state)
    }

    /// Add a row to the migration table.
    #[allow(clippy::too_many_arguments)]
    pub fn add_migration<L, R, N, S, D, T>(
        &mut self,
        left: L,
        right: R,
        node: N,
        source: S,
        dest: D,
        time: T,
    ) -> usize
    where
        L: Into<Position>,
        R: Into<Position>,
        N: Into<NodeId>,
        S: Into<PopulationId>,
        D: Into<PopulationId>,
        T: Into<Time>,
    {
        self.migrations.add_row(left, right, node, source, dest, time)
    }

    /// Add a provenance record.
    pub fn add_provenance(&mut self, record: &[u8]) -> usize {
        self.provenances.add_row(record)
    }

    /// Empty every table without freeing capacity.
    pub fn reset(&mut self) {
        self.nodes.reset();
        self.edgesets.reset();
        self.migrations.reset();
        self.sites.reset();
        self.mutations.reset();
        self.provenances.reset();
    }

    /// Validate the tables and move them into a [`TreeSequence`].
    ///
    /// # Errors
    ///
    /// Any structural variant of [`TreeSequenceError`]; the tables are
    /// consumed either way.
    pub fn tree_sequence(self) -> Result<TreeSequence, TreeSequenceError> {
        TreeSequence::load_from_tables(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reset_all() {
        let mut tables = TableCollection::new();
        tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
        tables.add_edgeset(0.0, 1.0, 1, &[NodeId::from(0)]);
        tables.add_site(0.5, b"0");
        tables.add_mutation(0, 0, b"1");
        tables.add_migration(0.0, 1.0, 0, 0, 1, 0.5);
        tables.add_provenance(b"p");
        tables.reset();
        assert_eq!(tables, TableCollection::new());
    }
}
