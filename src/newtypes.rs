/// A node id.
///
/// This is an integer referring to a row of a [`NodeTable`](crate::NodeTable).
/// Nodes are dense: the id of a node is its insertion index.
///
/// # Examples
///
/// ```
/// use treeseq::NodeId;
///
/// // The default value is null:
/// assert_eq!(NodeId::default(), NodeId::NULL);
///
/// let y: NodeId = NodeId::from(1);
/// assert_eq!(1, y);
/// assert_eq!(y, 1);
/// assert!(y < 2);
///
/// assert_eq!(format!("{}", y), "1".to_string());
/// assert_eq!(format!("{}", NodeId::NULL), "NULL");
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct NodeId(pub(crate) i32);

/// An edgeset id.
///
/// This is an integer referring to a row of an
/// [`EdgesetTable`](crate::EdgesetTable).
///
/// The features of this type follow the same pattern as for [`NodeId`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct EdgesetId(pub(crate) i32);

/// A population id.
///
/// The features of this type follow the same pattern as for [`NodeId`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct PopulationId(pub(crate) i32);

/// A site id.
///
/// This is an integer referring to a row of a [`SiteTable`](crate::SiteTable).
///
/// The features of this type follow the same pattern as for [`NodeId`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct SiteId(pub(crate) i32);

/// A mutation id.
///
/// This is an integer referring to a row of a
/// [`MutationTable`](crate::MutationTable).
///
/// The features of this type follow the same pattern as for [`NodeId`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct MutationId(pub(crate) i32);

impl_id_traits!(NodeId);
impl_id_traits!(EdgesetId);
impl_id_traits!(PopulationId);
impl_id_traits!(SiteId);
impl_id_traits!(MutationId);

/// A newtype for the concept of "genomic position".
/// A `Position` can represent either a locus or a
/// distance between loci.
///
/// Wraps [`f64`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Position(pub(crate) f64);

/// A newtype for the concept of time.
/// A `Time` value can represent either a point in time
/// or the output of arithmetic involving time.
///
/// Wraps [`f64`].
///
/// # Examples
///
/// ```
/// let t0 = treeseq::Time::from(2.0);
/// let t1 = treeseq::Time::from(10.0);
/// assert_eq!(t0 + t1, 12.0);
/// assert!(t0 < t1);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub(crate) f64);

impl_f64_newtypes!(Position);
impl_f64_newtypes!(Time);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_id_display() {
        let n = NodeId::from(11);
        assert_eq!(format!("{}", n), "11".to_string());
        assert_eq!(format!("{:?}", n), "NodeId(11)".to_string());
        let n = NodeId::NULL;
        assert_eq!(format!("{}", n), "NULL");
        assert_eq!(format!("{:?}", n), "NodeId(-1)");
    }

    #[test]
    fn test_id_conversions() {
        let x = 2;
        let y = NodeId::from(x);
        assert_eq!(y, 2);
        assert_eq!(2, i32::from(y));
        assert_eq!(NodeId::try_from(2_usize).unwrap(), y);
        assert!(NodeId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn test_f64_newtype_display() {
        let x = Position::from(1.0);
        assert_eq!(format!("{}", x), "1".to_string());
        let x = Time::from(1.0);
        assert_eq!(format!("{}", x), "1".to_string());
    }

    #[test]
    fn test_position_arithmetic() {
        let mut p = Position::from(1.5);
        p += Position::from(0.5);
        assert_eq!(p, 2.0);
        assert_eq!(p - Position::from(1.0), Position::from(1.0));
    }
}
