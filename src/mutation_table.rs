use crate::MutationId;
use crate::NodeId;
use crate::SiteId;
use crate::TreeSequenceError;

/// Row of a [`MutationTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTableRow {
    pub id: MutationId,
    pub site: SiteId,
    pub node: NodeId,
    pub derived_state: Vec<u8>,
}

/// An append-only builder for mutation data.
///
/// Rows must arrive sorted by ``site``; the requirement is enforced at
/// load time, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTable {
    site: Vec<SiteId>,
    node: Vec<NodeId>,
    derived_state: Vec<u8>,
    derived_state_offset: Vec<usize>,
}

impl Default for MutationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationTable {
    pub fn new() -> Self {
        Self {
            site: vec![],
            node: vec![],
            derived_state: vec![],
            derived_state_offset: vec![0],
        }
    }

    /// Return the number of rows.
    pub fn num_rows(&self) -> usize {
        self.site.len()
    }

    pub fn is_empty(&self) -> bool {
        self.site.is_empty()
    }

    /// Append one row, returning its id.
    pub fn add_row<S: Into<SiteId>, N: Into<NodeId>>(
        &mut self,
        site: S,
        node: N,
        derived_state: &[u8],
    ) -> MutationId {
        self.site.push(site.into());
        self.node.push(node.into());
        self.derived_state.extend_from_slice(derived_state);
        self.derived_state_offset.push(self.derived_state.len());
        MutationId((self.site.len() - 1) as i32)
    }

    /// Empty the table without freeing capacity.
    pub fn reset(&mut self) {
        self.site.clear();
        self.node.clear();
        self.derived_state.clear();
        self.derived_state_offset.truncate(1);
    }

    fn row_index<M: Into<MutationId>>(&self, row: M) -> Result<usize, TreeSequenceError> {
        let row = row.into();
        if row.0 < 0 || row.as_usize() >= self.num_rows() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(row.as_usize())
        }
    }

    /// Return the ``site`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn site<M: Into<MutationId>>(&self, row: M) -> Result<SiteId, TreeSequenceError> {
        self.row_index(row).map(|j| self.site[j])
    }

    /// Return the ``node`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn node<M: Into<MutationId>>(&self, row: M) -> Result<NodeId, TreeSequenceError> {
        self.row_index(row).map(|j| self.node[j])
    }

    /// Return the ``derived_state`` bytes from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn derived_state<M: Into<MutationId>>(&self, row: M) -> Result<&[u8], TreeSequenceError> {
        self.row_index(row).map(|j| {
            &self.derived_state[self.derived_state_offset[j]..self.derived_state_offset[j + 1]]
        })
    }

    fn make_row(&self, j: usize) -> MutationTableRow {
        MutationTableRow {
            id: MutationId(j as i32),
            site: self.site[j],
            node: self.node[j],
            derived_state: self.derived_state
                [self.derived_state_offset[j]..self.derived_state_offset[j + 1]]
                .to_vec(),
        }
    }

    /// Return row `row` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn row<M: Into<MutationId>>(&self, row: M) -> Result<MutationTableRow, TreeSequenceError> {
        self.row_index(row).map(|j| self.make_row(j))
    }

    /// Return an iterator over rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = MutationTableRow> + '_ {
        (0..self.num_rows()).map(|j| self.make_row(j))
    }

    pub fn site_column(&self) -> &[SiteId] {
        &self.site
    }

    pub fn node_column(&self) -> &[NodeId] {
        &self.node
    }

    pub(crate) fn derived_state_mem(&self) -> &[u8] {
        &self.derived_state
    }

    pub(crate) fn derived_state_lengths(&self) -> Vec<usize> {
        self.derived_state_offset
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_row_and_access() {
        let mut mutations = MutationTable::new();
        let m0 = mutations.add_row(0, 3, b"1");
        let m1 = mutations.add_row(1, 4, b"T");
        assert_eq!(mutations.num_rows(), 2);
        assert_eq!(mutations.site(m0).unwrap(), 0);
        assert_eq!(mutations.node(m1).unwrap(), 4);
        assert_eq!(mutations.derived_state(m1).unwrap(), b"T");
        assert_eq!(mutations.site(5), Err(TreeSequenceError::OutOfBounds));
    }

    #[test]
    fn test_reset() {
        let mut mutations = MutationTable::new();
        mutations.add_row(0, 1, b"1");
        mutations.reset();
        assert!(mutations.is_empty());
    }
}
