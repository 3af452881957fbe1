use crate::RawFlags;
use bitflags::bitflags;

bitflags! {
    /// Per-node bit flags stored in the node table.
    ///
    /// The only defined bit marks a node as a sample.
    ///
    /// # Examples
    ///
    /// ```
    /// let f = treeseq::NodeFlags::new_sample();
    /// assert!(f.is_sample());
    /// assert!(!treeseq::NodeFlags::default().is_sample());
    /// ```
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct NodeFlags: RawFlags {
        /// The node is a sample and is observed in every local tree.
        const IS_SAMPLE = 1 << 0;
    }
}

impl NodeFlags {
    /// Create a new flags instance with `IS_SAMPLE` set.
    pub fn new_sample() -> Self {
        Self::IS_SAMPLE
    }

    /// Is the `IS_SAMPLE` bit set?
    pub fn is_sample(&self) -> bool {
        self.contains(Self::IS_SAMPLE)
    }
}

bitflags! {
    /// Control the state maintained by a
    /// [`SparseTree`](crate::SparseTree).
    ///
    /// The default maintains topology only.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct TreeFlags: RawFlags {
        /// Default behavior.
        const NONE = 0;
        /// Maintain per-node counts of leaves and tracked leaves,
        /// making count queries O(1).
        const LEAF_COUNTS = 1 << 0;
        /// Maintain per-node linked lists of leaf descendants,
        /// making leaf enumeration O(number of leaves).
        const LEAF_LISTS = 1 << 1;
    }
}

bitflags! {
    /// Control the behavior of
    /// [`TreeSequence::simplify`](crate::TreeSequence::simplify).
    ///
    /// Inclusion of values sets an option to `true`.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct SimplificationOptions: RawFlags {
        /// Default behavior.
        const NONE = 0;
        /// Drop sites that carry no mutations after simplification and
        /// renumber the site references of the surviving mutations.
        const FILTER_INVARIANT_SITES = 1 << 0;
    }
}

bitflags! {
    /// Control the storage policy used when dumping to a container.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub struct TableOutputOptions: RawFlags {
        /// Default behavior.
        const NONE = 0;
        /// Compress datasets with zlib level 9 and a byte shuffle.
        const ZLIB_COMPRESSION = 1 << 0;
    }
}

impl_from_for_flag_types!(NodeFlags);
impl_from_for_flag_types!(TreeFlags);
impl_from_for_flag_types!(SimplificationOptions);
impl_from_for_flag_types!(TableOutputOptions);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_node_flags_roundtrip() {
        let f = NodeFlags::new_sample();
        assert_eq!(NodeFlags::from(f.bits()), f);
        assert_eq!(NodeFlags::from(0), NodeFlags::default());
    }

    #[test]
    fn test_tree_flags() {
        let f = TreeFlags::LEAF_COUNTS | TreeFlags::LEAF_LISTS;
        assert!(f.contains(TreeFlags::LEAF_COUNTS));
        assert!(f.contains(TreeFlags::LEAF_LISTS));
        assert_eq!(TreeFlags::default(), TreeFlags::NONE);
    }
}
