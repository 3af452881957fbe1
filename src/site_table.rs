use crate::Position;
use crate::SiteId;
use crate::TreeSequenceError;

/// Row of a [`SiteTable`]
#[derive(Debug, Clone)]
pub struct SiteTableRow {
    pub id: SiteId,
    pub position: Position,
    pub ancestral_state: Vec<u8>,
}

impl PartialEq for SiteTableRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && crate::util::partial_cmp_equal(&self.position, &other.position)
            && self.ancestral_state == other.ancestral_state
    }
}

/// An append-only builder for site data.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTable {
    position: Vec<Position>,
    ancestral_state: Vec<u8>,
    ancestral_state_offset: Vec<usize>,
}

impl Default for SiteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteTable {
    pub fn new() -> Self {
        Self {
            position: vec![],
            ancestral_state: vec![],
            ancestral_state_offset: vec![0],
        }
    }

    /// Return the number of rows.
    pub fn num_rows(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Append one row, returning its id.
    pub fn add_row<P: Into<Position>>(&mut self, position: P, ancestral_state: &[u8]) -> SiteId {
        self.position.push(position.into());
        self.ancestral_state.extend_from_slice(ancestral_state);
        self.ancestral_state_offset.push(self.ancestral_state.len());
        SiteId((self.position.len() - 1) as i32)
    }

    /// Empty the table without freeing capacity.
    pub fn reset(&mut self) {
        self.position.clear();
        self.ancestral_state.clear();
        self.ancestral_state_offset.truncate(1);
    }

    fn row_index<S: Into<SiteId>>(&self, row: S) -> Result<usize, TreeSequenceError> {
        let row = row.into();
        if row.0 < 0 || row.as_usize() >= self.num_rows() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(row.as_usize())
        }
    }

    /// Return the ``position`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn position<S: Into<SiteId>>(&self, row: S) -> Result<Position, TreeSequenceError> {
        self.row_index(row).map(|j| self.position[j])
    }

    /// Return the ``ancestral_state`` bytes from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn ancestral_state<S: Into<SiteId>>(&self, row: S) -> Result<&[u8], TreeSequenceError> {
        self.row_index(row).map(|j| {
            &self.ancestral_state
                [self.ancestral_state_offset[j]..self.ancestral_state_offset[j + 1]]
        })
    }

    fn make_row(&self, j: usize) -> SiteTableRow {
        SiteTableRow {
            id: SiteId(j as i32),
            position: self.position[j],
            ancestral_state: self.ancestral_state
                [self.ancestral_state_offset[j]..self.ancestral_state_offset[j + 1]]
                .to_vec(),
        }
    }

    /// Return row `row` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn row<S: Into<SiteId>>(&self, row: S) -> Result<SiteTableRow, TreeSequenceError> {
        self.row_index(row).map(|j| self.make_row(j))
    }

    /// Return an iterator over rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = SiteTableRow> + '_ {
        (0..self.num_rows()).map(|j| self.make_row(j))
    }

    pub fn position_column(&self) -> &[Position] {
        &self.position
    }

    pub(crate) fn ancestral_state_mem(&self) -> &[u8] {
        &self.ancestral_state
    }

    pub(crate) fn ancestral_state_lengths(&self) -> Vec<usize> {
        self.ancestral_state_offset
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
        let mut sites = SiteTable::new();
        let s0 = sites.add_row(0.125, b"0");
        let s1 = sites.add_row(0.25, b"A");
        assert_eq!(sites.num_rows(), 2);
        assert_eq!(sites.position(s0).unwrap(), 0.125);
        assert_eq!(sites.ancestral_state(s1).unwrap(), b"A");
        assert_eq!(sites.position(2), Err(TreeSequenceError::OutOfBounds));
    }

    #[test]
    fn test_reset() {
        let mut sites = SiteTable::new();
        sites.add_row(0.5, b"0");
        sites.reset();
        assert!(sites.is_empty());
        assert_eq!(sites.ancestral_state_mem().len(), 0);
    }
}
