// Shared fixtures for the integration tests; not every test file uses
// every builder.
#![allow(dead_code)]

use treeseq::NodeFlags;
use treeseq::NodeId;
use treeseq::TableCollection;
use treeseq::TreeSequence;

pub fn n(id: i32) -> NodeId {
    NodeId::from(id)
}

pub fn node_vec(ids: &[i32]) -> Vec<NodeId> {
    ids.iter().map(|&i| NodeId::from(i)).collect()
}

/// Four samples coalescing into a single root over `[0, 1)`:
/// node 4 has children `[0, 1, 2, 3]` everywhere.
pub fn make_single_tree_tables() -> TableCollection {
    let mut tables = TableCollection::new();
    for _ in 0..4 {
        tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
    }
    tables.add_node(NodeFlags::default(), 1.0, 0, b"");
    tables.add_edgeset(0.0, 1.0, 4, &node_vec(&[0, 1, 2, 3]));
    tables
}

pub fn single_tree_treeseq() -> TreeSequence {
    make_single_tree_tables().tree_sequence().unwrap()
}

/// Four samples and two trees split at 0.5.
///
/// Tree 0 on `[0, 0.5)`:   6 = (4 = (0, 1), 5 = (2, 3))
/// Tree 1 on `[0.5, 1)`:   6 = (4 = (0, 1), 7 = (2, 3))
///
/// Node times: samples 0; 4 → 1.0; 5 → 2.0; 7 → 2.5; 6 → 3.0.
pub fn make_two_tree_tables() -> TableCollection {
    let mut tables = TableCollection::new();
    for _ in 0..4 {
        tables.add_node(NodeFlags::new_sample(), 0.0, 0, b"");
    }
    tables.add_node(NodeFlags::default(), 1.0, 0, b"");
    tables.add_node(NodeFlags::default(), 2.0, 0, b"");
    tables.add_node(NodeFlags::default(), 3.0, 0, b"");
    tables.add_node(NodeFlags::default(), 2.5, 0, b"");
    tables.add_edgeset(0.0, 1.0, 4, &node_vec(&[0, 1]));
    tables.add_edgeset(0.0, 0.5, 5, &node_vec(&[2, 3]));
    tables.add_edgeset(0.5, 1.0, 7, &node_vec(&[2, 3]));
    tables.add_edgeset(0.0, 0.5, 6, &node_vec(&[4, 5]));
    tables.add_edgeset(0.5, 1.0, 6, &node_vec(&[4, 7]));
    tables
}

pub fn two_tree_treeseq() -> TreeSequence {
    make_two_tree_tables().tree_sequence().unwrap()
}

/// The two-tree tables plus a site in each tree:
/// site 0 at 0.2 with a mutation on node 0, site 1 at 0.7 with a
/// mutation on node 7.
pub fn make_two_tree_tables_with_sites() -> TableCollection {
    let mut tables = make_two_tree_tables();
    tables.add_site(0.2, b"0");
    tables.add_site(0.7, b"0");
    tables.add_mutation(0, 0, b"1");
    tables.add_mutation(1, 7, b"1");
    tables
}

pub fn two_tree_treeseq_with_sites() -> TreeSequence {
    make_two_tree_tables_with_sites().tree_sequence().unwrap()
}
