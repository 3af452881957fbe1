use crate::NodeFlags;
use crate::NodeId;
use crate::PopulationId;
use crate::Time;
use crate::TreeSequenceError;

/// Row of a [`NodeTable`]
#[derive(Debug, Clone)]
pub struct NodeTableRow {
    pub id: NodeId,
    pub time: Time,
    pub flags: NodeFlags,
    pub population: PopulationId,
    pub name: Vec<u8>,
}

impl PartialEq for NodeTableRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.flags == other.flags
            && self.population == other.population
            && crate::util::partial_cmp_equal(&self.time, &other.time)
            && self.name == other.name
    }
}

/// An append-only builder for node data.
///
/// Node ids are dense: a node's id is its insertion index.
/// No validation happens here beyond what the column types enforce;
/// structural invariants are checked when the tables are loaded into a
/// [`TreeSequence`](crate::TreeSequence).
///
/// # Examples
///
/// ```
/// let mut nodes = treeseq::NodeTable::new();
/// let id = nodes.add_row(treeseq::NodeFlags::new_sample(), 0.0, -1, b"");
/// assert_eq!(id, 0);
/// assert_eq!(nodes.num_rows(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTable {
    time: Vec<Time>,
    flags: Vec<NodeFlags>,
    population: Vec<PopulationId>,
    name: Vec<u8>,
    name_offset: Vec<usize>,
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTable {
    pub fn new() -> Self {
        Self {
            time: vec![],
            flags: vec![],
            population: vec![],
            name: vec![],
            name_offset: vec![0],
        }
    }

    /// Return the number of rows.
    pub fn num_rows(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Append one row, returning its id.
    pub fn add_row<T: Into<Time>, P: Into<PopulationId>>(
        &mut self,
        flags: NodeFlags,
        time: T,
        population: P,
        name: &[u8],
    ) -> NodeId {
        self.time.push(time.into());
        self.flags.push(flags);
        self.population.push(population.into());
        self.name.extend_from_slice(name);
        self.name_offset.push(self.name.len());
        NodeId((self.time.len() - 1) as i32)
    }

    /// Empty the table without freeing capacity.
    pub fn reset(&mut self) {
        self.time.clear();
        self.flags.clear();
        self.population.clear();
        self.name.clear();
        self.name_offset.truncate(1);
    }

    fn row_index<N: Into<NodeId>>(&self, row: N) -> Result<usize, TreeSequenceError> {
        let row = row.into();
        if row.0 < 0 || row.as_usize() >= self.num_rows() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(row.as_usize())
        }
    }

    /// Return the ``time`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn time<N: Into<NodeId>>(&self, row: N) -> Result<Time, TreeSequenceError> {
        self.row_index(row).map(|j| self.time[j])
    }

    /// Return the ``flags`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn flags<N: Into<NodeId>>(&self, row: N) -> Result<NodeFlags, TreeSequenceError> {
        self.row_index(row).map(|j| self.flags[j])
    }

    /// Return the ``population`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn population<N: Into<NodeId>>(&self, row: N) -> Result<PopulationId, TreeSequenceError> {
        self.row_index(row).map(|j| self.population[j])
    }

    /// Return the ``name`` bytes from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn name<N: Into<NodeId>>(&self, row: N) -> Result<&[u8], TreeSequenceError> {
        self.row_index(row)
            .map(|j| &self.name[self.name_offset[j]..self.name_offset[j + 1]])
    }

    fn make_row(&self, j: usize) -> NodeTableRow {
        NodeTableRow {
            id: NodeId(j as i32),
            time: self.time[j],
            flags: self.flags[j],
            population: self.population[j],
            name: self.name[self.name_offset[j]..self.name_offset[j + 1]].to_vec(),
        }
    }

    /// Return row `row` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn row<N: Into<NodeId>>(&self, row: N) -> Result<NodeTableRow, TreeSequenceError> {
        self.row_index(row).map(|j| self.make_row(j))
    }

    /// Return an iterator over rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = NodeTableRow> + '_ {
        (0..self.num_rows()).map(|j| self.make_row(j))
    }

    pub fn time_column(&self) -> &[Time] {
        &self.time
    }

    pub fn flags_column(&self) -> &[NodeFlags] {
        &self.flags
    }

    pub fn population_column(&self) -> &[PopulationId] {
        &self.population
    }

    pub(crate) fn name_mem(&self) -> &[u8] {
        &self.name
    }

    pub(crate) fn name_lengths(&self) -> Vec<usize> {
        self.name_offset.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Obtain a vector containing the ids of all nodes for which
    /// [`NodeFlags::is_sample`] is `true`.
    pub fn samples_as_vector(&self) -> Vec<NodeId> {
        let mut samples: Vec<NodeId> = vec![];
        for row in self.iter() {
            if row.flags.is_sample() {
                samples.push(row.id);
            }
        }
        samples
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_row_and_access() {
        let mut nodes = NodeTable::new();
        let a = nodes.add_row(NodeFlags::new_sample(), 0.0, 0, b"a");
        let b = nodes.add_row(NodeFlags::default(), 1.5, PopulationId::NULL, b"bc");
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(nodes.num_rows(), 2);
        assert_eq!(nodes.time(b).unwrap(), Time::from(1.5));
        assert_eq!(nodes.name(a).unwrap(), b"a");
        assert_eq!(nodes.name(b).unwrap(), b"bc");
        assert!(nodes.flags(a).unwrap().is_sample());
        assert_eq!(nodes.population(b).unwrap(), PopulationId::NULL);
        assert_eq!(nodes.time(2), Err(TreeSequenceError::OutOfBounds));
        assert_eq!(nodes.row(-1), Err(TreeSequenceError::OutOfBounds));
    }

    #[test]
    fn test_reset_keeps_nothing() {
        let mut nodes = NodeTable::new();
        nodes.add_row(NodeFlags::new_sample(), 0.0, 0, b"xyz");
        nodes.reset();
        assert_eq!(nodes.num_rows(), 0);
        assert!(nodes.name_lengths().is_empty());
        let id = nodes.add_row(NodeFlags::new_sample(), 2.0, 0, b"q");
        assert_eq!(id, 0);
        assert_eq!(nodes.name(id).unwrap(), b"q");
    }

    #[test]
    fn test_samples_as_vector() {
        let mut nodes = NodeTable::new();
        nodes.add_row(NodeFlags::new_sample(), 0.0, 0, b"");
        nodes.add_row(NodeFlags::default(), 1.0, 0, b"");
        nodes.add_row(NodeFlags::new_sample(), 0.0, 0, b"");
        assert_eq!(
            nodes.samples_as_vector(),
            vec![NodeId::from(0), NodeId::from(2)]
        );
    }
}
