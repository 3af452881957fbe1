use crate::NodeId;
use crate::PopulationId;
use crate::Position;
use crate::Time;
use crate::TreeSequenceError;

/// Row of a [`MigrationTable`]
#[derive(Debug, Clone)]
pub struct MigrationTableRow {
    pub left: Position,
    pub right: Position,
    pub node: NodeId,
    pub source: PopulationId,
    pub dest: PopulationId,
    pub time: Time,
}

impl PartialEq for MigrationTableRow {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
            && self.source == other.source
            && self.dest == other.dest
            && crate::util::partial_cmp_equal(&self.left, &other.left)
            && crate::util::partial_cmp_equal(&self.right, &other.right)
            && crate::util::partial_cmp_equal(&self.time, &other.time)
    }
}

/// An append-only builder for migration data.
///
/// Migration records are opaque to the tree-iteration core; they are
/// carried through loads and dumps unchanged.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MigrationTable {
    left: Vec<Position>,
    right: Vec<Position>,
    node: Vec<NodeId>,
    source: Vec<PopulationId>,
    dest: Vec<PopulationId>,
    time: Vec<Time>,
}

impl MigrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of rows.
    pub fn num_rows(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Append one row, returning its index.
    #[allow(clippy::too_many_arguments)]
    pub fn add_row<L, R, N, S, D, T>(
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
        self.left.push(left.into());
        self.right.push(right.into());
        self.node.push(node.into());
        self.source.push(source.into());
        self.dest.push(dest.into());
        self.time.push(time.into());
        self.left.len() - 1
    }

    /// Empty the table without freeing capacity.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.node.clear();
        self.source.clear();
        self.dest.clear();
        self.time.clear();
    }

    fn make_row(&self, j: usize) -> MigrationTableRow {
        MigrationTableRow {
            left: self.left[j],
            right: self.right[j],
            node: self.node[j],
            source: self.source[j],
            dest: self.dest[j],
            time: self.time[j],
        }
    }

    /// Return row `row` of the table.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::OutOfBounds`] if ``row`` is out of range.
    pub fn row(&self, row: usize) -> Result<MigrationTableRow, TreeSequenceError> {
        if row >= self.num_rows() {
            Err(TreeSequenceError::OutOfBounds)
        } else {
            Ok(self.make_row(row))
        }
    }

    /// Return an iterator over rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = MigrationTableRow> + '_ {
        (0..self.num_rows()).map(|j| self.make_row(j))
    }

    pub fn left_column(&self) -> &[Position] {
        &self.left
    }

    pub fn right_column(&self) -> &[Position] {
        &self.right
    }

    pub fn node_column(&self) -> &[NodeId] {
        &self.node
    }

    pub fn source_column(&self) -> &[PopulationId] {
        &self.source
    }

    pub fn dest_column(&self) -> &[PopulationId] {
        &self.dest
    }

    pub fn time_column(&self) -> &[Time] {
        &self.time
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_row_and_access() {
        let mut migrations = MigrationTable::new();
        let row = migrations.add_row(0.0, 0.5, 3, 0, 1, 2.5);
        assert_eq!(row, 0);
        assert_eq!(migrations.num_rows(), 1);
        let r = migrations.row(0).unwrap();
        assert_eq!(r.node, 3);
        assert_eq!(r.source, 0);
        assert_eq!(r.dest, 1);
        assert_eq!(r.time, Time::from(2.5));
        assert_eq!(migrations.row(1), Err(TreeSequenceError::OutOfBounds));
    }
}
