//! Projection of a tree sequence onto a sample subset.
//!
//! A single left-to-right sweep over the shared indexes maintains, for
//! every input node, the nearest descendant-or-self whose subtree is
//! non-degenerate in the subset genealogy (`mapping`).  Whenever a
//! node's set of mapped children changes, its open output record is
//! closed and a new one may be activated; mutations are re-hung on the
//! mapped node below them, or folded into the ancestral state when
//! they land above the simplified root.

use std::collections::BTreeSet;

use crate::MutationId;
use crate::NodeFlags;
use crate::NodeId;
use crate::PopulationId;
use crate::Position;
use crate::SimplificationOptions;
use crate::SiteId;
use crate::TableCollection;
use crate::Time;
use crate::TreeSequence;
use crate::TreeSequenceError;

struct ActiveRecord {
    active: bool,
    left: f64,
    mapped_children: Vec<NodeId>,
}

struct OutputRecord {
    left: f64,
    right: f64,
    node: NodeId,
    children: Vec<NodeId>,
    time: Time,
    population: PopulationId,
}

struct OutputSite {
    position: Position,
    ancestral_state: Vec<u8>,
}

struct OutputMutation {
    site: usize,
    node: NodeId,
    derived_state: Vec<u8>,
}

fn mapped_children(
    children: (usize, usize),
    pool: &[NodeId],
    mapping: &[NodeId],
) -> Vec<NodeId> {
    let (offset, len) = children;
    pool[offset..offset + len]
        .iter()
        .filter(|c| !mapping[c.as_usize()].is_null())
        .map(|c| mapping[c.as_usize()])
        .collect()
}

/// Recompute `mapping` along the path from `start` to the root,
/// registering every node touched.
fn propagate_mapping(
    mapping: &mut [NodeId],
    visited: &mut BTreeSet<NodeId>,
    parent: &[NodeId],
    children: &[(usize, usize)],
    pool: &[NodeId],
    start: NodeId,
) {
    let mut u = start;
    while !u.is_null() {
        visited.insert(u);
        let (offset, len) = children[u.as_usize()];
        let mut w = NodeId::NULL;
        for v in &pool[offset..offset + len] {
            if !mapping[v.as_usize()].is_null() {
                w = match w.is_null() {
                    true => mapping[v.as_usize()],
                    false => u,
                };
            }
        }
        mapping[u.as_usize()] = w;
        u = parent[u.as_usize()];
    }
}

fn compress_sites(
    sites: Vec<OutputSite>,
    mut mutations: Vec<OutputMutation>,
) -> (Vec<OutputSite>, Vec<OutputMutation>) {
    let mut output_sites = vec![];
    let mut k = 0;
    for (j, site) in sites.into_iter().enumerate() {
        let mut invariant_site = true;
        while k < mutations.len() && mutations[k].site == j {
            mutations[k].site = output_sites.len();
            invariant_site = false;
            k += 1;
        }
        if !invariant_site {
            output_sites.push(site);
        }
    }
    (output_sites, mutations)
}

pub(crate) fn simplify_tables(
    ts: &TreeSequence,
    samples: &[NodeId],
    options: SimplificationOptions,
) -> Result<TableCollection, TreeSequenceError> {
    if samples.len() < 2 {
        return Err(TreeSequenceError::BadParamValue);
    }
    let tables = ts.tables();
    let edgesets = tables.edgesets();
    let nodes = tables.nodes();
    let mutations = tables.mutations();
    let sites = tables.sites();
    let pool = edgesets.children_mem();
    let left_col = edgesets.left_column();
    let right_col = edgesets.right_column();
    let parent_col = edgesets.parent_column();
    let position_col = sites.position_column();
    let time_col = nodes.time_column();
    let population_col = nodes.population_column();
    let insertion = ts.edge_insertion_order();
    let removal = ts.edge_removal_order();
    let num_nodes = ts.num_nodes();
    let num_records = edgesets.num_rows();

    let mut parent = vec![NodeId::NULL; num_nodes];
    let mut children: Vec<(usize, usize)> = vec![(0, 0); num_nodes];
    let mut mapping = vec![NodeId::NULL; num_nodes];
    let mut active: Vec<ActiveRecord> = (0..num_nodes)
        .map(|_| ActiveRecord {
            active: false,
            left: 0.,
            mapped_children: vec![],
        })
        .collect();

    for &u in samples {
        if u.0 < 0 || u.as_usize() >= num_nodes {
            return Err(TreeSequenceError::OutOfBounds);
        }
        if !ts.is_sample(u) {
            return Err(TreeSequenceError::BadSamples);
        }
        if !mapping[u.as_usize()].is_null() {
            return Err(TreeSequenceError::DuplicateSample);
        }
        mapping[u.as_usize()] = u;
    }

    let mut output_records: Vec<OutputRecord> = vec![];
    let mut output_mutations: Vec<OutputMutation> = vec![];
    let mut output_sites: Vec<OutputSite> = Vec::with_capacity(ts.num_sites());
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();

    let mut j = 0;
    let mut k = 0;
    let mut l = 0;
    while j < num_records {
        let x = f64::from(left_col[insertion[j].as_usize()]);
        visited.clear();

        // Records out
        while k < num_records && f64::from(right_col[removal[k].as_usize()]) == x {
            let h = removal[k];
            k += 1;
            let u = parent_col[h.as_usize()];
            let (offset, len) = children[u.as_usize()];
            for c in &pool[offset..offset + len] {
                parent[c.as_usize()] = NodeId::NULL;
            }
            children[u.as_usize()] = (0, 0);
            propagate_mapping(&mut mapping, &mut visited, &parent, &children, pool, u);
        }

        // Records in
        while j < num_records && f64::from(left_col[insertion[j].as_usize()]) == x {
            let h = insertion[j];
            j += 1;
            let u = parent_col[h.as_usize()];
            children[u.as_usize()] = edgesets.children_range(h.as_usize());
            let (offset, len) = children[u.as_usize()];
            for c in &pool[offset..offset + len] {
                parent[c.as_usize()] = u;
            }
            propagate_mapping(&mut mapping, &mut visited, &parent, &children, pool, u);
        }

        // Examine the visited nodes, in ascending id order, and update
        // the active records.
        for &u in visited.iter() {
            let ui = u.as_usize();
            let mut activate_record = false;
            if active[ui].active {
                let mut current = mapped_children(children[ui], pool, &mapping);
                current.sort_unstable();
                if current != active[ui].mapped_children {
                    let left = active[ui].left;
                    let closed_children = std::mem::take(&mut active[ui].mapped_children);
                    active[ui].active = false;
                    output_records.push(OutputRecord {
                        left,
                        right: x,
                        node: u,
                        children: closed_children,
                        time: time_col[ui],
                        population: population_col[ui],
                    });
                    if mapping[ui] == u {
                        activate_record = true;
                    }
                }
            } else if mapping[ui] == u {
                activate_record = true;
            }
            if activate_record {
                let mut current = mapped_children(children[ui], pool, &mapping);
                current.sort_unstable();
                active[ui] = ActiveRecord {
                    active: true,
                    left: x,
                    mapped_children: current,
                };
            }
        }

        // Process the sites inside the just-finished interval.
        debug_assert!(k < num_records);
        let right = f64::from(right_col[removal[k].as_usize()]);
        while l < ts.num_sites() && f64::from(position_col[l]) < right {
            let mut site_out = OutputSite {
                position: position_col[l],
                ancestral_state: sites.ancestral_state(SiteId(l as i32))?.to_vec(),
            };
            let (mutation_start, mutation_len) = ts.site_mutation_bounds(l);
            for m in mutation_start..mutation_start + mutation_len {
                let u = mutations.node_column()[m];
                if !mapping[u.as_usize()].is_null() {
                    // Walk up until we find either another node of the
                    // subset tree or the root.
                    let mut v = parent[u.as_usize()];
                    while !v.is_null() && mapping[v.as_usize()] != v {
                        v = parent[v.as_usize()];
                    }
                    let derived_state = mutations.derived_state(MutationId(m as i32))?;
                    if v.is_null() {
                        // The mutation sits above the simplified root,
                        // so it changes the site's ancestral state
                        // instead.
                        site_out.ancestral_state = derived_state.to_vec();
                    } else {
                        output_mutations.push(OutputMutation {
                            site: l,
                            node: mapping[u.as_usize()],
                            derived_state: derived_state.to_vec(),
                        });
                    }
                }
            }
            output_sites.push(site_out);
            l += 1;
        }
    }

    // Terminate all the records that remain open at the end of the
    // sweep.
    let x = f64::from(ts.sequence_length());
    for ui in 0..num_nodes {
        if active[ui].active {
            let left = active[ui].left;
            let closed_children = std::mem::take(&mut active[ui].mapped_children);
            output_records.push(OutputRecord {
                left,
                right: x,
                node: NodeId(ui as i32),
                children: closed_children,
                time: time_col[ui],
                population: population_col[ui],
            });
        }
    }

    if output_records.is_empty() {
        return Err(TreeSequenceError::CannotSimplify);
    }

    // Sort the records by time, node, and left coordinate so the
    // output honors the input ordering contract.
    output_records.sort_by(|a, b| {
        f64::from(a.time)
            .total_cmp(&f64::from(b.time))
            .then(a.node.cmp(&b.node))
            .then(a.left.total_cmp(&b.left))
    });

    // Compress the node space: samples first, in the given order, then
    // interior nodes in order of appearance in the sorted records.
    let mut node_map = vec![NodeId::NULL; num_nodes];
    for (index, &s) in samples.iter().enumerate() {
        node_map[s.as_usize()] = NodeId(index as i32);
    }
    let mut next_node = samples.len();
    for record in output_records.iter_mut() {
        if node_map[record.node.as_usize()].is_null() {
            node_map[record.node.as_usize()] = NodeId(next_node as i32);
            next_node += 1;
        }
        record.node = node_map[record.node.as_usize()];
        for c in record.children.iter_mut() {
            *c = node_map[c.as_usize()];
        }
        record.children.sort_unstable();
    }
    for mutation in output_mutations.iter_mut() {
        debug_assert!(!node_map[mutation.node.as_usize()].is_null());
        mutation.node = node_map[mutation.node.as_usize()];
    }

    let (output_sites, output_mutations) =
        match options.contains(SimplificationOptions::FILTER_INVARIANT_SITES) {
            true => compress_sites(output_sites, output_mutations),
            false => (output_sites, output_mutations),
        };

    // Lay out the output tables; loading them revalidates everything.
    let mut reverse = vec![NodeId::NULL; next_node];
    for (old, &new) in node_map.iter().enumerate() {
        if !new.is_null() {
            reverse[new.as_usize()] = NodeId(old as i32);
        }
    }
    let mut output = TableCollection::new();
    for &s in samples {
        output.add_node(
            NodeFlags::new_sample(),
            time_col[s.as_usize()],
            population_col[s.as_usize()],
            b"",
        );
    }
    for new_id in samples.len()..next_node {
        let old = reverse[new_id];
        output.add_node(
            NodeFlags::default(),
            time_col[old.as_usize()],
            population_col[old.as_usize()],
            b"",
        );
    }
    for record in &output_records {
        output.add_edgeset(record.left, record.right, record.node, &record.children);
    }
    for site in &output_sites {
        output.add_site(site.position, &site.ancestral_state);
    }
    for mutation in &output_mutations {
        output.add_mutation(
            SiteId(mutation.site as i32),
            mutation.node,
            &mutation.derived_state,
        );
    }
    Ok(output)
}
