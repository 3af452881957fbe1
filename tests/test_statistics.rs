#[path = "./test_fixtures.rs"]
mod test_fixtures;

use test_fixtures::{
    make_single_tree_tables, node_vec, single_tree_treeseq, two_tree_treeseq_with_sites,
};
use treeseq::NodeFlags;
use treeseq::TableCollection;
use treeseq::TreeSequenceError;

#[test]
fn test_pairwise_diversity_two_trees() {
    // Site at 0.2 with a mutation on sample 0: for the pair {0, 1}
    // the single segregating site contributes 1·1, and the denominator
    // is one pair.
    let ts = two_tree_treeseq_with_sites();
    let pi = ts.pairwise_diversity(&node_vec(&[0, 1])).unwrap();
    assert!((pi - 1.0).abs() < 1e-12);
}

#[test]
fn test_pairwise_diversity_all_samples() {
    // Site 0 has one carrier out of four; site 1 (on node 7) has two.
    // Σ count·(n − count) = 1·3 + 2·2 = 7 over n·(n−1)/2 = 6 pairs.
    let ts = two_tree_treeseq_with_sites();
    let pi = ts
        .pairwise_diversity(&node_vec(&[0, 1, 2, 3]))
        .unwrap();
    assert!((pi - 7.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_pairwise_diversity_no_sites_is_zero() {
    let ts = single_tree_treeseq();
    let pi = ts.pairwise_diversity(&node_vec(&[0, 1])).unwrap();
    assert_eq!(pi, 0.0);
}

#[test]
fn test_pairwise_diversity_sample_count_bounds() {
    let ts = single_tree_treeseq();
    assert_eq!(
        ts.pairwise_diversity(&node_vec(&[0])),
        Err(TreeSequenceError::BadParamValue)
    );
    assert_eq!(
        ts.pairwise_diversity(&node_vec(&[0, 1, 2, 3, 3])),
        Err(TreeSequenceError::BadParamValue)
    );
}

#[test]
fn test_pairwise_diversity_rejects_non_samples() {
    let ts = single_tree_treeseq();
    assert_eq!(
        ts.pairwise_diversity(&node_vec(&[0, 4])),
        Err(TreeSequenceError::BadSamples)
    );
    assert_eq!(
        ts.pairwise_diversity(&node_vec(&[0, 0])),
        Err(TreeSequenceError::DuplicateSample)
    );
}

#[test]
fn test_pairwise_diversity_requires_biallelic_sites() {
    let mut tables = make_single_tree_tables();
    tables.add_site(0.2, b"0");
    tables.add_mutation(0, 0, b"1");
    tables.add_mutation(0, 1, b"1");
    let ts = tables.tree_sequence().unwrap();
    assert_eq!(
        ts.pairwise_diversity(&node_vec(&[0, 1])),
        Err(TreeSequenceError::UnsupportedOperation)
    );
}

#[test]
fn test_pairwise_diversity_pair_without_the_carrier() {
    // Neither tracked sample carries the mutation, so no tracked
    // pair differs.
    let mut tables = TableCollection::new();
    for _ in 0..4 {
        tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
    }
    tables.add_node(NodeFlags::default(), 1.0, 0, b"");
    tables.add_edgeset(0.0, 1.0, 4, &node_vec(&[0, 1, 2, 3]));
    tables.add_site(0.2, b"0");
    tables.add_mutation(0, 0, b"1");
    let ts = tables.tree_sequence().unwrap();
    let pi = ts.pairwise_diversity(&node_vec(&[2, 3])).unwrap();
    assert_eq!(pi, 0.0);
}
