//! Storage and traversal of succinct tree sequences.
//!
//! A tree sequence is a compact representation of the correlated
//! genealogical trees describing the ancestry of a set of sampled
//! genomes along a genomic interval `[0, L)`.  Rather than storing
//! each local tree separately, the sequence stores a table of
//! *edgesets*: assertions that a parent node has a given set of
//! children over a half-open interval.  Local trees are materialised
//! by sweeping the edgesets left-to-right (or right-to-left) using a
//! pair of precomputed orderings.
//!
//! The main entry points are:
//!
//! * [`TableCollection`]: append-only builders for the input tables.
//! * [`TreeSequence`]: the validated, indexed, immutable store.
//! * [`TreeSequence::tree_iterator`]: streaming iteration over
//!   [`SparseTree`]s, via [`StreamingIterator`].
//! * [`TreeSequence::simplify`]: project a tree sequence onto a subset
//!   of its samples.
//! * [`persistence`]: the typed columnar-container boundary used by
//!   [`TreeSequence::dump`](persistence) and `TreeSequence::load`.

mod _macros;

mod edge_differences;
mod edgeset_table;
mod error;
mod flags;
mod migration_table;
mod mutation_table;
mod newtypes;
mod node_table;
pub mod persistence;
mod provenance;
mod simplify;
mod site_table;
mod sparse_tree;
mod table_collection;
mod trees;
mod util;

/// The raw integer type of all flags bitfields.
pub type RawFlags = u32;

pub use edge_differences::DiffRecord;
pub use edge_differences::EdgeDifferencesIterator;
pub use edge_differences::TreeDiffs;
pub use edgeset_table::{EdgesetTable, EdgesetTableRow};
pub use error::TreeSequenceError;
pub use flags::NodeFlags;
pub use flags::SimplificationOptions;
pub use flags::TableOutputOptions;
pub use flags::TreeFlags;
pub use migration_table::{MigrationTable, MigrationTableRow};
pub use mutation_table::{MutationTable, MutationTableRow};
pub use newtypes::{EdgesetId, MutationId, NodeId, PopulationId, Position, SiteId, Time};
pub use node_table::{NodeTable, NodeTableRow};
pub use provenance::{ProvenanceTable, ProvenanceTableRow};
pub use site_table::{SiteTable, SiteTableRow};
pub use sparse_tree::{LeafIterator, SparseTree, TreeIterator};
pub use table_collection::TableCollection;
pub use trees::{Alphabet, TreeSequence};

// Streaming iteration over trees requires these traits in scope.
pub use streaming_iterator::DoubleEndedStreamingIterator;
pub use streaming_iterator::StreamingIterator;
