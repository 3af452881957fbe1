#[path = "./test_fixtures.rs"]
mod test_fixtures;

use rand::Rng;
use rand::SeedableRng;
use test_fixtures::{
    make_two_tree_tables_with_sites, n, node_vec, single_tree_treeseq, two_tree_treeseq,
};
use treeseq::DoubleEndedStreamingIterator;
use treeseq::NodeFlags;
use treeseq::NodeId;
use treeseq::SparseTree;
use treeseq::StreamingIterator;
use treeseq::TableCollection;
use treeseq::TreeFlags;
use treeseq::TreeSequenceError;

#[test]
fn test_single_tree_topology() {
    let ts = single_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    assert_eq!(tree.index(), Some(0));
    assert_eq!(tree.interval().0, 0.0);
    assert_eq!(tree.interval().1, 1.0);
    assert_eq!(tree.root(), 4);
    for sample in 0..4 {
        assert_eq!(tree.parent(n(sample)).unwrap(), 4);
    }
    assert_eq!(tree.children(n(4)).unwrap(), node_vec(&[0, 1, 2, 3]).as_slice());
    assert_eq!(tree.num_children(n(4)).unwrap(), 4);
    assert_eq!(tree.mrca(n(0), n(3)).unwrap(), 4);
    assert_eq!(tree.mrca(n(2), n(2)).unwrap(), 2);
    // Counts fall back to traversal without LEAF_COUNTS.
    assert_eq!(tree.num_leaves(n(4)).unwrap(), 4);
    assert_eq!(tree.num_leaves(n(1)).unwrap(), 1);
    assert!(!tree.next().unwrap());
}

#[test]
fn test_two_tree_intervals_tile() {
    let ts = two_tree_treeseq();
    assert_eq!(ts.num_trees(), 2);
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    assert_eq!(tree.interval().0, 0.0);
    assert_eq!(tree.interval().1, 0.5);
    assert_eq!(tree.root(), 6);
    assert_eq!(tree.mrca(n(0), n(2)).unwrap(), 6);
    assert_eq!(tree.mrca(n(2), n(3)).unwrap(), 5);
    assert!(tree.next().unwrap());
    assert_eq!(tree.interval().0, 0.5);
    assert_eq!(tree.interval().1, 1.0);
    assert_eq!(tree.index(), Some(1));
    assert_eq!(tree.root(), 6);
    assert_eq!(tree.mrca(n(2), n(3)).unwrap(), 7);
    assert_eq!(tree.parent(n(7)).unwrap(), 6);
    assert!(!tree.next().unwrap());
}

#[test]
fn test_reverse_iteration_matches_forward() {
    let ts = two_tree_treeseq();
    let mut forward = vec![];
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    let mut more = tree.first();
    while more {
        let parents: Vec<NodeId> = (0..ts.num_nodes() as i32)
            .map(|u| tree.parent(n(u)).unwrap())
            .collect();
        forward.push((tree.index(), tree.interval(), tree.root(), parents));
        more = tree.next().unwrap();
    }
    let mut reverse = vec![];
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    let mut more = tree.last();
    while more {
        let parents: Vec<NodeId> = (0..ts.num_nodes() as i32)
            .map(|u| tree.parent(n(u)).unwrap())
            .collect();
        reverse.push((tree.index(), tree.interval(), tree.root(), parents));
        more = tree.prev().unwrap();
    }
    reverse.reverse();
    assert_eq!(forward, reverse);
}

#[test]
fn test_direction_reversal_returns_to_same_tree() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    assert!(tree.next().unwrap());
    assert!(tree.prev().unwrap());

    let mut reference = SparseTree::new(&ts, TreeFlags::default());
    assert!(reference.first());
    assert!(tree.equal(&reference).unwrap());

    // And forward again after the flip.
    assert!(tree.next().unwrap());
    let mut reference = SparseTree::new(&ts, TreeFlags::default());
    assert!(reference.last());
    assert!(tree.equal(&reference).unwrap());
}

#[test]
fn test_copy_and_equal() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    let mut copy = SparseTree::new(&ts, TreeFlags::default());
    copy.copy_from(&tree).unwrap();
    assert!(copy.equal(&tree).unwrap());
    assert_eq!(copy.root(), tree.root());
    assert!(tree.next().unwrap());
    assert!(!copy.equal(&tree).unwrap());
}

#[test]
fn test_streaming_iteration() {
    let ts = two_tree_treeseq();
    let mut ntrees = 0;
    let mut tree_iter = ts.tree_iterator(TreeFlags::default());
    while let Some(tree) = tree_iter.next() {
        assert_eq!(tree.index(), Some(ntrees));
        ntrees += 1;
    }
    assert_eq!(ntrees, ts.num_trees());

    let mut ntrees = 0;
    let mut tree_iter = ts.tree_iterator(TreeFlags::default());
    while let Some(tree) = tree_iter.next_back() {
        ntrees += 1;
        assert_eq!(tree.index(), Some(ts.num_trees() - ntrees));
    }
    assert_eq!(ntrees, ts.num_trees());
}

#[test]
fn test_leaf_counts_match_traversal() {
    let ts = two_tree_treeseq();
    let mut counted = SparseTree::new(&ts, TreeFlags::LEAF_COUNTS);
    let mut plain = SparseTree::new(&ts, TreeFlags::default());
    let mut more = counted.first();
    assert!(plain.first());
    while more {
        for u in 0..ts.num_nodes() as i32 {
            assert_eq!(
                counted.num_leaves(n(u)).unwrap(),
                plain.num_leaves(n(u)).unwrap(),
            );
        }
        assert_eq!(counted.num_leaves(counted.root()).unwrap(), 4);
        more = counted.next().unwrap();
        if more {
            assert!(plain.next().unwrap());
        }
    }
}

#[test]
fn test_tracked_leaves() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::LEAF_COUNTS);
    tree.set_tracked_leaves(&node_vec(&[0, 2])).unwrap();
    assert!(tree.first());
    assert_eq!(tree.num_tracked_leaves(n(4)).unwrap(), 1);
    assert_eq!(tree.num_tracked_leaves(n(5)).unwrap(), 1);
    assert_eq!(tree.num_tracked_leaves(tree.root()).unwrap(), 2);
    assert_eq!(tree.num_tracked_leaves(n(1)).unwrap(), 0);
    assert!(tree.next().unwrap());
    assert_eq!(tree.num_tracked_leaves(n(7)).unwrap(), 1);
    assert_eq!(tree.num_tracked_leaves(tree.root()).unwrap(), 2);
}

#[test]
fn test_tracked_leaves_errors() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::LEAF_COUNTS);
    assert_eq!(
        tree.set_tracked_leaves(&node_vec(&[0, 0])),
        Err(TreeSequenceError::DuplicateSample)
    );
    assert_eq!(
        tree.set_tracked_leaves(&node_vec(&[0, 4])),
        Err(TreeSequenceError::BadSamples)
    );
    assert_eq!(
        tree.set_tracked_leaves(&node_vec(&[0, 50])),
        Err(TreeSequenceError::OutOfBounds)
    );
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert_eq!(
        tree.set_tracked_leaves(&node_vec(&[0, 1])),
        Err(TreeSequenceError::UnsupportedOperation)
    );
    assert_eq!(
        tree.num_tracked_leaves(n(0)),
        Err(TreeSequenceError::UnsupportedOperation)
    );
}

#[test]
fn test_leaf_lists() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::LEAF_LISTS);
    assert!(tree.first());
    let leaves: Vec<NodeId> = tree.leaves(tree.root()).unwrap().collect();
    assert_eq!(leaves, node_vec(&[0, 1, 2, 3]));
    let leaves: Vec<NodeId> = tree.leaves(n(4)).unwrap().collect();
    assert_eq!(leaves, node_vec(&[0, 1]));
    let leaves: Vec<NodeId> = tree.leaves(n(0)).unwrap().collect();
    assert_eq!(leaves, node_vec(&[0]));
    assert!(tree.next().unwrap());
    let leaves: Vec<NodeId> = tree.leaves(n(7)).unwrap().collect();
    assert_eq!(leaves, node_vec(&[2, 3]));
    let leaves: Vec<NodeId> = tree.leaves(tree.root()).unwrap().collect();
    assert_eq!(leaves, node_vec(&[0, 1, 2, 3]));

    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    assert!(matches!(
        tree.leaves(n(0)),
        Err(TreeSequenceError::UnsupportedOperation)
    ));
}

#[test]
fn test_marks() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::LEAF_COUNTS);
    assert!(tree.first());
    tree.set_mark(1).unwrap();
    assert_eq!(tree.mark(n(6)).unwrap(), 0);
    assert!(tree.next().unwrap());
    // Node 6 lost and regained children across the breakpoint.
    assert_eq!(tree.mark(n(6)).unwrap(), 1);

    let mut plain = SparseTree::new(&ts, TreeFlags::default());
    assert_eq!(plain.set_mark(1), Err(TreeSequenceError::UnsupportedOperation));
    assert_eq!(plain.mark(n(0)), Err(TreeSequenceError::UnsupportedOperation));
}

#[test]
fn test_not_initialised() {
    let ts = two_tree_treeseq();
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert_eq!(tree.next(), Err(TreeSequenceError::NotInitialised));
    assert_eq!(tree.prev(), Err(TreeSequenceError::NotInitialised));
    assert_eq!(tree.index(), None);
}

#[test]
fn test_sites_per_tree() {
    let ts = make_two_tree_tables_with_sites().tree_sequence().unwrap();
    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    assert!(tree.first());
    assert_eq!(tree.num_sites(), 1);
    let sites: Vec<_> = tree.sites().collect();
    assert_eq!(sites[0].position, 0.2);
    assert!(tree.next().unwrap());
    assert_eq!(tree.num_sites(), 1);
    let sites: Vec<_> = tree.sites().collect();
    assert_eq!(sites[0].position, 0.7);

    let mutations: Vec<_> = ts.mutations_at_site(sites[0].id).unwrap().collect();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].node, 7);
}

#[test]
fn test_random_interval_chain_tiles() {
    // A chain of single-parent trees over random breakpoints; the
    // sweep must visit each interval exactly once in both directions.
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut breakpoints: Vec<f64> = (0..20).map(|_| rng.gen_range(0.01..0.99)).collect();
    breakpoints.push(0.0);
    breakpoints.push(1.0);
    breakpoints.sort_by(f64::total_cmp);
    breakpoints.dedup();

    let mut tables = TableCollection::new();
    tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
    tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
    for window in breakpoints.windows(2) {
        let parent = tables.add_node(NodeFlags::default(), 1.0, 0, b"");
        tables.add_edgeset(window[0], window[1], parent, &node_vec(&[0, 1]));
    }
    let ts = tables.tree_sequence().unwrap();
    assert_eq!(ts.num_trees(), breakpoints.len() - 1);

    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    let mut intervals = vec![];
    let mut more = tree.first();
    while more {
        let (left, right) = tree.interval();
        intervals.push((f64::from(left), f64::from(right)));
        more = tree.next().unwrap();
    }
    let expected: Vec<(f64, f64)> = breakpoints.windows(2).map(|w| (w[0], w[1])).collect();
    assert_eq!(intervals, expected);

    let mut tree = SparseTree::new(&ts, TreeFlags::default());
    let mut reversed = vec![];
    let mut more = tree.last();
    while more {
        let (left, right) = tree.interval();
        reversed.push((f64::from(left), f64::from(right)));
        more = tree.prev().unwrap();
    }
    reversed.reverse();
    assert_eq!(reversed, expected);
}
