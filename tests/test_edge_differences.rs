#[path = "./test_fixtures.rs"]
mod test_fixtures;

use test_fixtures::{node_vec, single_tree_treeseq, two_tree_treeseq};
use treeseq::NodeId;
use treeseq::Position;

#[test]
fn test_single_tree_differences() {
    let ts = single_tree_treeseq();
    let diffs: Vec<_> = ts.edge_differences_iter().collect();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].interval().0, 0.0);
    assert_eq!(diffs[0].interval().1, 1.0);
    assert_eq!(diffs[0].removals().count(), 0);
    let insertions: Vec<_> = diffs[0].insertions().collect();
    assert_eq!(insertions.len(), 1);
    assert_eq!(insertions[0].node(), 4);
    assert_eq!(insertions[0].time(), 1.0);
    assert_eq!(insertions[0].children(), node_vec(&[0, 1, 2, 3]).as_slice());
}

#[test]
fn test_two_tree_differences() {
    let ts = two_tree_treeseq();
    let diffs: Vec<_> = ts.edge_differences_iter().collect();
    assert_eq!(diffs.len(), ts.num_trees());

    assert_eq!(diffs[0].interval().0, 0.0);
    assert_eq!(diffs[0].interval().1, 0.5);
    assert_eq!(diffs[0].removals().count(), 0);
    let inserted: Vec<NodeId> = diffs[0].insertions().map(|r| r.node()).collect();
    assert_eq!(inserted, node_vec(&[4, 5, 6]));

    assert_eq!(diffs[1].interval().0, 0.5);
    assert_eq!(diffs[1].interval().1, 1.0);
    // Newer records leave first at an equal right coordinate.
    let removed: Vec<NodeId> = diffs[1].removals().map(|r| r.node()).collect();
    assert_eq!(removed, node_vec(&[6, 5]));
    let inserted: Vec<NodeId> = diffs[1].insertions().map(|r| r.node()).collect();
    assert_eq!(inserted, node_vec(&[7, 6]));
}

#[test]
fn test_lengths_tile_sequence() {
    let ts = two_tree_treeseq();
    let total: f64 = ts
        .edge_differences_iter()
        .map(|d| f64::from(d.length()))
        .sum();
    assert_eq!(Position::from(total), ts.sequence_length());
}

#[test]
fn test_every_record_inserted_and_removed_once() {
    let ts = two_tree_treeseq();
    let diffs: Vec<_> = ts.edge_differences_iter().collect();
    let insertions: usize = diffs.iter().map(|d| d.insertions().count()).sum();
    let removals: usize = diffs.iter().map(|d| d.removals().count()).sum();
    assert_eq!(insertions, ts.num_edgesets());
    // Records still active at L are never emitted as removals.
    assert_eq!(removals, 2);
}

#[test]
fn test_iterator_is_finite() {
    let ts = two_tree_treeseq();
    let mut iter = ts.edge_differences_iter();
    assert!(iter.next().is_some());
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn test_collected_records_outlive_iterator() {
    // Items borrow the store, not the iterator, so they are
    // collectible and usable after the iterator is dropped.
    let ts = two_tree_treeseq();
    let children: Vec<&[NodeId]> = ts
        .edge_differences_iter()
        .flat_map(|d| d.insertions().map(|r| r.children()).collect::<Vec<_>>())
        .collect();
    assert_eq!(children.len(), ts.num_edgesets());
    assert_eq!(children[0], node_vec(&[0, 1]).as_slice());
}
