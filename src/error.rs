//! Error handling

use thiserror::Error;

/// The closed set of error kinds returned by every fallible operation
/// in this crate.
///
/// Structural variants are produced by table validation during
/// [`TreeSequence::load_from_tables`](crate::TreeSequence::load_from_tables);
/// any of them is fatal to the load.  Operational variants indicate a
/// caller error on an otherwise valid store.  Resource variants are
/// produced at the persistence boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSequenceError {
    /// Generic edgeset failure.
    #[error("bad edgeset")]
    BadEdgeset,
    /// No edgeset has a left coordinate of zero.
    #[error("no edgeset has left coordinate zero")]
    BadEdgesetNoLeftAtZero,
    /// A right coordinate matches neither another edgeset's left
    /// coordinate nor the sequence length.
    #[error("edgeset right coordinate matches no left coordinate or the sequence length")]
    BadEdgesetNonmatchingRight,
    /// A record references the NULL node.
    #[error("NULL node in record")]
    NullNodeInRecord,
    /// A node reference is outside the node table.
    #[error("node out of bounds")]
    NodeOutOfBounds,
    /// An edgeset has an empty children list.
    #[error("edgeset has no children")]
    ZeroChildren,
    /// Edgeset children are not strictly ascending.
    #[error("edgeset children are not sorted")]
    UnsortedChildren,
    /// A child is not younger than its parent.
    #[error("node times along an edgeset are not ordered")]
    BadNodeTimeOrdering,
    /// An edgeset interval is empty or inverted.
    #[error("bad record interval")]
    BadRecordInterval,
    /// Edgesets are not sorted by parent time.
    #[error("records are not sorted in time order")]
    RecordsNotTimeSorted,
    /// A site position lies outside `[0, L)`.
    #[error("bad site position")]
    BadSitePosition,
    /// Site positions are not strictly ascending.
    #[error("sites are not sorted by position")]
    UnsortedSites,
    /// A site reference is outside the site table.
    #[error("site out of bounds")]
    SiteOutOfBounds,
    /// Mutations are not sorted by site.
    #[error("mutations are not sorted by site")]
    UnsortedMutations,
    /// A state column holds something other than a single character.
    #[error("unsupported allelic state")]
    BadAlphabet,
    /// Fewer than two samples in a non-empty node table.
    #[error("fewer than two samples")]
    InsufficientSamples,
    /// A sample node appears as the parent of an edgeset.
    #[error("sample node is internal")]
    NodeSampleInternal,
    /// The sum of a length column does not match its flattened column.
    #[error("sum of lengths does not match flattened column length")]
    LengthMismatch,

    /// A parameter value is invalid.
    #[error("bad parameter value")]
    BadParamValue,
    /// An index is out of range.
    #[error("out of bounds")]
    OutOfBounds,
    /// The object has not been positioned or initialised.
    #[error("not initialised")]
    NotInitialised,
    /// An input node is not a sample.
    #[error("bad sample node")]
    BadSamples,
    /// An input sample is repeated.
    #[error("duplicate sample")]
    DuplicateSample,
    /// Simplification produced an empty genealogy.
    #[error("cannot simplify")]
    CannotSimplify,
    /// The operation is not supported with the current options.
    #[error("unsupported operation")]
    UnsupportedOperation,

    /// An allocation failed.
    #[error("out of memory")]
    NoMemory,
    /// The persistent container is malformed.
    #[error("file format error")]
    FileFormat,
    /// The container's major format version predates this library.
    #[error("file format version too old")]
    FileVersionTooOld,
    /// The container's major format version postdates this library.
    #[error("file format version too new")]
    FileVersionTooNew,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_formatting() {
        let e = TreeSequenceError::NodeOutOfBounds;
        assert_eq!(format!("{}", e), "node out of bounds");
        let e = TreeSequenceError::FileVersionTooOld;
        assert_eq!(format!("{}", e), "file format version too old");
    }
}
