use crate::EdgesetId;
use crate::NodeId;
use crate::Position;
use crate::TreeSequenceError;

/// Row of an [`EdgesetTable`]
#[derive(Debug, Clone)]
pub struct EdgesetTableRow {
    pub id: EdgesetId,
    pub left: Position,
    pub right: Position,
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}

impl PartialEq for EdgesetTableRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.parent == other.parent
            && crate::util::partial_cmp_equal(&self.left, &other.left)
            && crate::util::partial_cmp_equal(&self.right, &other.right)
            && self.children == other.children
    }
}

/// An append-only builder for edgeset data.
///
/// A row asserts that on `[left, right)` the node `parent` has exactly
/// the listed children.  The children of all rows live in one
/// contiguous pool; each row owns a range of it.
///
/// # Examples
///
/// ```
/// use treeseq::NodeId;
/// let mut edgesets = treeseq::EdgesetTable::new();
/// let id = edgesets.add_row(0.0, 1.0, 2, &[NodeId::from(0), NodeId::from(1)]);
/// assert_eq!(id, 0);
/// assert_eq!(edgesets.children(id).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgesetTable {
    left: Vec<Position>,
    right: Vec<Position>,
    parent: Vec<NodeId>,
    children: Vec<NodeId>,
    children_offset: Vec<usize>,
}

impl Default for EdgesetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgesetTable {
    pub fn new() -> Self {
        Self {
            left: vec![],
            right: vec![],
            parent: vec![],
            children: vec![],
            children_offset: vec![0],
        }
    }

    /// Return the number of rows.
    pub fn num_rows(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Total number of children across all rows.
    pub fn total_children_length(&self) -> usize {
        self.children.len()
    }

    /// Append one row, returning its id.
    pub fn add_row<L: Into<Position>, R: Into<Position>, P: Into<NodeId>>(
        &mut self,
        left: L,
        right: R,
        parent: P,
        children: &[NodeId],
    ) -> EdgesetId {
        self.left.push(left.into());
        self.right.push(right.into());
        self.parent.push(parent.into());
        self.children.extend_from_slice(children);
        self.children_offset.push(self.children.len());
        EdgesetId((self.left.len() - 1) as i32)
    }

    /// Empty the table without freeing capacity.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.parent.clear();
        self.children.clear();
        self.children_offset.truncate(1);
    }

    fn row_index<E: Into<EdgesetId>>(&self, row: E) -> Result<usize, TreeSequenceError> {
        let row = row.into();
        if row.0 < 0 || row.as_usize() >= self.num_rows() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(row.as_usize())
        }
    }

    /// Return the ``left`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn left<E: Into<EdgesetId>>(&self, row: E) -> Result<Position, TreeSequenceError> {
        self.row_index(row).map(|j| self.left[j])
    }

    /// Return the ``right`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn right<E: Into<EdgesetId>>(&self, row: E) -> Result<Position, TreeSequenceError> {
        self.row_index(row).map(|j| self.right[j])
    }

    /// Return the ``parent`` value from row ``row`` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn parent<E: Into<EdgesetId>>(&self, row: E) -> Result<NodeId, TreeSequenceError> {
        self.row_index(row).map(|j| self.parent[j])
    }

    /// Return the children of row ``row`` as a slice of the pool.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn children<E: Into<EdgesetId>>(&self, row: E) -> Result<&[NodeId], TreeSequenceError> {
        self.row_index(row).map(|j| {
            &self.children[self.children_offset[j]..self.children_offset[j + 1]]
        })
    }

    fn make_row(&self, j: usize) -> EdgesetTableRow {
        EdgesetTableRow {
            id: EdgesetId(j as i32),
            left: self.left[j],
            right: self.right[j],
            parent: self.parent[j],
            children: self.children[self.children_offset[j]..self.children_offset[j + 1]]
                .to_vec(),
        }
    }

    /// Return row `row` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn row<E: Into<EdgesetId>>(&self, row: E) -> Result<EdgesetTableRow, TreeSequenceError> {
        self.row_index(row).map(|j| self.make_row(j))
    }

    /// Return an iterator over rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = EdgesetTableRow> + '_ {
        (0..self.num_rows()).map(|j| self.make_row(j))
    }

    pub fn left_column(&self) -> &[Position] {
        &self.left
    }

    pub fn right_column(&self) -> &[Position] {
        &self.right
    }

    pub fn parent_column(&self) -> &[NodeId] {
        &self.parent
    }

    /// The contiguous pool holding the children of every row.
    pub(crate) fn children_mem(&self) -> &[NodeId] {
        &self.children
    }

    /// The `(offset, length)` of row `j`'s slice of the children pool.
    pub(crate) fn children_range(&self, j: usize) -> (usize, usize) {
        (
            self.children_offset[j],
            self.children_offset[j + 1] - self.children_offset[j],
        )
    }

    pub(crate) fn children_lengths(&self) -> Vec<usize> {
        self.children_offset
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn children(ids: &[i32]) -> Vec<NodeId> {
        ids.iter().map(|&i| NodeId::from(i)).collect()
    }

    #[test]
    fn test_add_row_and_access() {
        let mut edgesets = EdgesetTable::new();
        let e0 = edgesets.add_row(0.0, 0.5, 4, &children(&[0, 1]));
        let e1 = edgesets.add_row(0.5, 1.0, 5, &children(&[2, 3, 4]));
        assert_eq!(edgesets.num_rows(), 2);
        assert_eq!(edgesets.total_children_length(), 5);
        assert_eq!(edgesets.left(e0).unwrap(), 0.0);
        assert_eq!(edgesets.right(e1).unwrap(), 1.0);
        assert_eq!(edgesets.parent(e1).unwrap(), 5);
        assert_eq!(edgesets.children(e0).unwrap(), children(&[0, 1]).as_slice());
        assert_eq!(edgesets.children_range(1), (2, 3));
        assert_eq!(edgesets.children(7), Err(TreeSequenceError::OutOfBounds));
    }

    #[test]
    fn test_iter_rows() {
        let mut edgesets = EdgesetTable::new();
        edgesets.add_row(0.0, 1.0, 2, &children(&[0, 1]));
        let rows: Vec<_> = edgesets.iter().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], edgesets.row(0).unwrap());
    }

    #[test]
    fn test_reset() {
        let mut edgesets = EdgesetTable::new();
        edgesets.add_row(0.0, 1.0, 2, &children(&[0, 1]));
        edgesets.reset();
        assert_eq!(edgesets.num_rows(), 0);
        assert_eq!(edgesets.total_children_length(), 0);
    }
}
