//! The typed columnar-container boundary.
//!
//! The persistent file format is a hierarchical container of groups,
//! root attributes, and one-dimensional typed datasets.  The core does
//! not own that container; it reads and writes through the
//! [`ColumnarStore`] trait and leaves compression, checksumming, and
//! actual I/O to the backend.  The storage policy (scale-offset for
//! integer data, optional zlib level 9 with a byte shuffle, Fletcher32
//! everywhere, whole-dataset chunks) travels with every dataset as
//! [`DatasetOptions`] so a backend can honor it.
//!
//! Every backend error surfaces as
//! [`TreeSequenceError::FileFormat`], except the format-version
//! mismatches which have their own kinds.
//!
//! [`MemoryStore`] is an in-memory backend used by the round-trip
//! tests.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::NodeFlags;
use crate::NodeId;
use crate::TableCollection;
use crate::TableOutputOptions;
use crate::TreeSequence;
use crate::TreeSequenceError;

/// Version stamp written to the root of every container.
///
/// The major number gates loading: smaller is
/// [`TreeSequenceError::FileVersionTooOld`], larger is
/// [`TreeSequenceError::FileVersionTooNew`].  The minor number is
/// advisory.
pub const FILE_FORMAT_VERSION: [u32; 2] = [3, 0];

/// The zlib level requested by
/// [`TableOutputOptions::ZLIB_COMPRESSION`].
pub const ZLIB_LEVEL: u8 = 9;

const REQUIRED_GROUPS: [&str; 6] = [
    "/nodes",
    "/edgesets",
    "/edgesets/indexes",
    "/sites",
    "/mutations",
    "/migrations",
];

/// A root attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attribute {
    VersionPair([u32; 2]),
    U32(u32),
    F64(f64),
}

/// A one-dimensional typed dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    U32(Vec<u32>),
    I32(Vec<i32>),
    F64(Vec<f64>),
    I8(Vec<i8>),
    /// Variable-length byte strings (the provenance dataset).
    VarStrings(Vec<Vec<u8>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::U32(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::I8(v) => v.len(),
            ColumnData::VarStrings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_u32(&self) -> Result<&[u32], TreeSequenceError> {
        match self {
            ColumnData::U32(v) => Ok(v),
            _ => Err(TreeSequenceError::FileFormat),
        }
    }

    fn as_i32(&self) -> Result<&[i32], TreeSequenceError> {
        match self {
            ColumnData::I32(v) => Ok(v),
            _ => Err(TreeSequenceError::FileFormat),
        }
    }

    fn as_f64(&self) -> Result<&[f64], TreeSequenceError> {
        match self {
            ColumnData::F64(v) => Ok(v),
            _ => Err(TreeSequenceError::FileFormat),
        }
    }

    fn as_i8(&self) -> Result<&[i8], TreeSequenceError> {
        match self {
            ColumnData::I8(v) => Ok(v),
            _ => Err(TreeSequenceError::FileFormat),
        }
    }

    fn as_var_strings(&self) -> Result<&[Vec<u8>], TreeSequenceError> {
        match self {
            ColumnData::VarStrings(v) => Ok(v),
            _ => Err(TreeSequenceError::FileFormat),
        }
    }
}

/// The storage policy for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Scale-offset compression; applied to integer datasets.
    pub scale_offset: bool,
    /// zlib compression at [`ZLIB_LEVEL`] with a byte shuffle.
    pub zlib_shuffle: bool,
    /// Fletcher32 checksums; always on.
    pub fletcher32: bool,
    /// Chunk size equals the dataset length so reads are
    /// whole-dataset.
    pub chunk_len: usize,
}

fn integer_options(len: usize, zlib: bool) -> DatasetOptions {
    DatasetOptions {
        scale_offset: true,
        zlib_shuffle: zlib,
        fletcher32: true,
        chunk_len: len,
    }
}

fn float_options(len: usize, zlib: bool) -> DatasetOptions {
    DatasetOptions {
        scale_offset: false,
        zlib_shuffle: zlib,
        fletcher32: true,
        chunk_len: len,
    }
}

/// Error raised by a container backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("container error: {0}")]
pub struct ContainerError(pub String);

impl From<ContainerError> for TreeSequenceError {
    fn from(_: ContainerError) -> Self {
        TreeSequenceError::FileFormat
    }
}

/// The read/write interface a container backend provides.
pub trait ColumnarStore {
    fn put_attribute(&mut self, name: &str, value: Attribute) -> Result<(), ContainerError>;
    fn attribute(&self, name: &str) -> Result<Attribute, ContainerError>;
    fn create_group(&mut self, path: &str) -> Result<(), ContainerError>;
    fn has_group(&self, path: &str) -> bool;
    fn put_dataset(
        &mut self,
        path: &str,
        data: ColumnData,
        options: DatasetOptions,
    ) -> Result<(), ContainerError>;
    /// Read a dataset; `None` when it is absent.  Zero-length datasets
    /// are omitted on write, so absence reads as empty.
    fn dataset(&self, path: &str) -> Result<Option<&ColumnData>, ContainerError>;
}

fn put<S: ColumnarStore>(
    store: &mut S,
    path: &str,
    data: ColumnData,
    options: DatasetOptions,
) -> Result<(), ContainerError> {
    // Zero-length datasets are omitted; old container versions
    // malfunction on them.
    if data.is_empty() {
        return Ok(());
    }
    store.put_dataset(path, data, options)
}

fn read_u32<S: ColumnarStore>(store: &S, path: &str) -> Result<Vec<u32>, TreeSequenceError> {
    match store.dataset(path)? {
        None => Ok(vec![]),
        Some(data) => Ok(data.as_u32()?.to_vec()),
    }
}

fn read_i32<S: ColumnarStore>(store: &S, path: &str) -> Result<Vec<i32>, TreeSequenceError> {
    match store.dataset(path)? {
        None => Ok(vec![]),
        Some(data) => Ok(data.as_i32()?.to_vec()),
    }
}

fn read_f64<S: ColumnarStore>(store: &S, path: &str) -> Result<Vec<f64>, TreeSequenceError> {
    match store.dataset(path)? {
        None => Ok(vec![]),
        Some(data) => Ok(data.as_f64()?.to_vec()),
    }
}

fn read_i8<S: ColumnarStore>(store: &S, path: &str) -> Result<Vec<i8>, TreeSequenceError> {
    match store.dataset(path)? {
        None => Ok(vec![]),
        Some(data) => Ok(data.as_i8()?.to_vec()),
    }
}

fn read_var_strings<S: ColumnarStore>(
    store: &S,
    path: &str,
) -> Result<Vec<Vec<u8>>, TreeSequenceError> {
    match store.dataset(path)? {
        None => Ok(vec![]),
        Some(data) => Ok(data.as_var_strings()?.to_vec()),
    }
}

fn check_lengths(lengths: &[u32], total: usize) -> Result<(), TreeSequenceError> {
    let sum: usize = lengths.iter().map(|l| *l as usize).sum();
    match sum == total {
        true => Ok(()),
        false => Err(TreeSequenceError::LengthMismatch),
    }
}

impl TreeSequence {
    /// Write the store into a container through `store`.
    ///
    /// # Errors
    ///
    /// [`TreeSequenceError::FileFormat`] when the backend fails.
    pub fn dump<S: ColumnarStore>(
        &self,
        store: &mut S,
        options: TableOutputOptions,
    ) -> Result<(), TreeSequenceError> {
        let zlib = options.contains(TableOutputOptions::ZLIB_COMPRESSION);
        store.put_attribute("format_version", Attribute::VersionPair(FILE_FORMAT_VERSION))?;
        // Vestigial attributes, present so that much older readers
        // fail with a sensible message.
        store.put_attribute("sample_size", Attribute::U32(0))?;
        store.put_attribute("sequence_length", Attribute::F64(0.))?;
        for group in REQUIRED_GROUPS {
            store.create_group(group)?;
        }

        let nodes = self.nodes();
        let num_nodes = nodes.num_rows();
        put(
            store,
            "/nodes/flags",
            ColumnData::U32(nodes.flags_column().iter().map(|f| f.bits()).collect()),
            integer_options(num_nodes, zlib),
        )?;
        put(
            store,
            "/nodes/population",
            ColumnData::I32(nodes.population_column().iter().map(|p| i32::from(*p)).collect()),
            integer_options(num_nodes, zlib),
        )?;
        put(
            store,
            "/nodes/time",
            ColumnData::F64(nodes.time_column().iter().map(|t| f64::from(*t)).collect()),
            float_options(num_nodes, zlib),
        )?;
        put(
            store,
            "/nodes/name",
            ColumnData::I8(nodes.name_mem().iter().map(|b| *b as i8).collect()),
            integer_options(nodes.name_mem().len(), zlib),
        )?;
        put(
            store,
            "/nodes/name_length",
            ColumnData::U32(nodes.name_lengths().iter().map(|l| *l as u32).collect()),
            integer_options(num_nodes, zlib),
        )?;

        let edgesets = self.edgesets();
        let num_edgesets = edgesets.num_rows();
        put(
            store,
            "/edgesets/left",
            ColumnData::F64(edgesets.left_column().iter().map(|p| f64::from(*p)).collect()),
            float_options(num_edgesets, zlib),
        )?;
        put(
            store,
            "/edgesets/right",
            ColumnData::F64(edgesets.right_column().iter().map(|p| f64::from(*p)).collect()),
            float_options(num_edgesets, zlib),
        )?;
        put(
            store,
            "/edgesets/parent",
            ColumnData::I32(edgesets.parent_column().iter().map(|n| i32::from(*n)).collect()),
            integer_options(num_edgesets, zlib),
        )?;
        put(
            store,
            "/edgesets/children",
            ColumnData::I32(edgesets.children_mem().iter().map(|n| i32::from(*n)).collect()),
            integer_options(edgesets.total_children_length(), zlib),
        )?;
        put(
            store,
            "/edgesets/children_length",
            ColumnData::U32(edgesets.children_lengths().iter().map(|l| *l as u32).collect()),
            integer_options(num_edgesets, zlib),
        )?;
        put(
            store,
            "/edgesets/indexes/insertion_order",
            ColumnData::I32(self.edge_insertion_order().iter().map(|e| i32::from(*e)).collect()),
            integer_options(num_edgesets, zlib),
        )?;
        put(
            store,
            "/edgesets/indexes/removal_order",
            ColumnData::I32(self.edge_removal_order().iter().map(|e| i32::from(*e)).collect()),
            integer_options(num_edgesets, zlib),
        )?;

        let sites = self.sites();
        let num_sites = sites.num_rows();
        put(
            store,
            "/sites/position",
            ColumnData::F64(sites.position_column().iter().map(|p| f64::from(*p)).collect()),
            float_options(num_sites, zlib),
        )?;
        put(
            store,
            "/sites/ancestral_state",
            ColumnData::I8(sites.ancestral_state_mem().iter().map(|b| *b as i8).collect()),
            integer_options(sites.ancestral_state_mem().len(), zlib),
        )?;
        put(
            store,
            "/sites/ancestral_state_length",
            ColumnData::U32(sites.ancestral_state_lengths().iter().map(|l| *l as u32).collect()),
            integer_options(num_sites, zlib),
        )?;

        let mutations = self.mutations();
        let num_mutations = mutations.num_rows();
        put(
            store,
            "/mutations/site",
            ColumnData::I32(mutations.site_column().iter().map(|s| i32::from(*s)).collect()),
            integer_options(num_mutations, zlib),
        )?;
        put(
            store,
            "/mutations/node",
            ColumnData::I32(mutations.node_column().iter().map(|n| i32::from(*n)).collect()),
            integer_options(num_mutations, zlib),
        )?;
        put(
            store,
            "/mutations/derived_state",
            ColumnData::I8(mutations.derived_state_mem().iter().map(|b| *b as i8).collect()),
            integer_options(mutations.derived_state_mem().len(), zlib),
        )?;
        put(
            store,
            "/mutations/derived_state_length",
            ColumnData::U32(
                mutations.derived_state_lengths().iter().map(|l| *l as u32).collect(),
            ),
            integer_options(num_mutations, zlib),
        )?;

        let migrations = self.migrations();
        let num_migrations = migrations.num_rows();
        put(
            store,
            "/migrations/left",
            ColumnData::F64(migrations.left_column().iter().map(|p| f64::from(*p)).collect()),
            float_options(num_migrations, zlib),
        )?;
        put(
            store,
            "/migrations/right",
            ColumnData::F64(migrations.right_column().iter().map(|p| f64::from(*p)).collect()),
            float_options(num_migrations, zlib),
        )?;
        put(
            store,
            "/migrations/node",
            ColumnData::I32(migrations.node_column().iter().map(|n| i32::from(*n)).collect()),
            integer_options(num_migrations, zlib),
        )?;
        put(
            store,
            "/migrations/source",
            ColumnData::I32(migrations.source_column().iter().map(|p| i32::from(*p)).collect()),
            integer_options(num_migrations, zlib),
        )?;
        put(
            store,
            "/migrations/dest",
            ColumnData::I32(migrations.dest_column().iter().map(|p| i32::from(*p)).collect()),
            integer_options(num_migrations, zlib),
        )?;
        put(
            store,
            "/migrations/time",
            ColumnData::F64(migrations.time_column().iter().map(|t| f64::from(*t)).collect()),
            float_options(num_migrations, zlib),
        )?;

        let provenances = self.provenances();
        put(
            store,
            "/provenance",
            ColumnData::VarStrings(provenances.iter().map(|r| r.record).collect()),
            float_options(provenances.num_rows(), zlib),
        )?;
        Ok(())
    }

    /// Read a container through `store` and rebuild the tree sequence,
    /// revalidating everything.
    ///
    /// # Errors
    ///
    /// * [`TreeSequenceError::FileVersionTooOld`] /
    ///   [`TreeSequenceError::FileVersionTooNew`] on a major version
    ///   mismatch.
    /// * [`TreeSequenceError::FileFormat`] on a missing group, a
    ///   dimension mismatch, or any backend failure.
    /// * [`TreeSequenceError::LengthMismatch`] when a length column
    ///   does not sum to its flattened column's length.
    /// * Any structural validation error.
    pub fn load<S: ColumnarStore>(store: &S) -> Result<TreeSequence, TreeSequenceError> {
        match store.attribute("format_version")? {
            Attribute::VersionPair([major, _minor]) => {
                if major < FILE_FORMAT_VERSION[0] {
                    return Err(TreeSequenceError::FileVersionTooOld);
                }
                if major > FILE_FORMAT_VERSION[0] {
                    return Err(TreeSequenceError::FileVersionTooNew);
                }
            }
            _ => return Err(TreeSequenceError::FileFormat),
        }
        for group in REQUIRED_GROUPS {
            if !store.has_group(group) {
                return Err(TreeSequenceError::FileFormat);
            }
        }

        let node_flags = read_u32(store, "/nodes/flags")?;
        let node_population = read_i32(store, "/nodes/population")?;
        let node_time = read_f64(store, "/nodes/time")?;
        let node_name = read_i8(store, "/nodes/name")?;
        let node_name_length = read_u32(store, "/nodes/name_length")?;
        let num_nodes = node_time.len();
        if node_flags.len() != num_nodes
            || node_population.len() != num_nodes
            || node_name_length.len() != num_nodes
        {
            return Err(TreeSequenceError::FileFormat);
        }
        check_lengths(&node_name_length, node_name.len())?;

        let edgeset_left = read_f64(store, "/edgesets/left")?;
        let edgeset_right = read_f64(store, "/edgesets/right")?;
        let edgeset_parent = read_i32(store, "/edgesets/parent")?;
        let edgeset_children = read_i32(store, "/edgesets/children")?;
        let edgeset_children_length = read_u32(store, "/edgesets/children_length")?;
        let insertion_order = read_i32(store, "/edgesets/indexes/insertion_order")?;
        let removal_order = read_i32(store, "/edgesets/indexes/removal_order")?;
        let num_edgesets = edgeset_left.len();
        if edgeset_right.len() != num_edgesets
            || edgeset_parent.len() != num_edgesets
            || edgeset_children_length.len() != num_edgesets
            || insertion_order.len() != num_edgesets
            || removal_order.len() != num_edgesets
        {
            return Err(TreeSequenceError::FileFormat);
        }
        check_lengths(&edgeset_children_length, edgeset_children.len())?;

        let site_position = read_f64(store, "/sites/position")?;
        let site_ancestral_state = read_i8(store, "/sites/ancestral_state")?;
        let site_ancestral_state_length = read_u32(store, "/sites/ancestral_state_length")?;
        let num_sites = site_position.len();
        if site_ancestral_state_length.len() != num_sites {
            return Err(TreeSequenceError::FileFormat);
        }
        check_lengths(&site_ancestral_state_length, site_ancestral_state.len())?;

        let mutation_site = read_i32(store, "/mutations/site")?;
        let mutation_node = read_i32(store, "/mutations/node")?;
        let mutation_derived_state = read_i8(store, "/mutations/derived_state")?;
        let mutation_derived_state_length = read_u32(store, "/mutations/derived_state_length")?;
        let num_mutations = mutation_site.len();
        if mutation_node.len() != num_mutations
            || mutation_derived_state_length.len() != num_mutations
        {
            return Err(TreeSequenceError::FileFormat);
        }
        check_lengths(&mutation_derived_state_length, mutation_derived_state.len())?;

        let migration_left = read_f64(store, "/migrations/left")?;
        let migration_right = read_f64(store, "/migrations/right")?;
        let migration_node = read_i32(store, "/migrations/node")?;
        let migration_source = read_i32(store, "/migrations/source")?;
        let migration_dest = read_i32(store, "/migrations/dest")?;
        let migration_time = read_f64(store, "/migrations/time")?;
        let num_migrations = migration_left.len();
        if migration_right.len() != num_migrations
            || migration_node.len() != num_migrations
            || migration_source.len() != num_migrations
            || migration_dest.len() != num_migrations
            || migration_time.len() != num_migrations
        {
            return Err(TreeSequenceError::FileFormat);
        }

        let provenance = read_var_strings(store, "/provenance")?;

        let mut tables = TableCollection::new();
        let mut offset = 0;
        for j in 0..num_nodes {
            let len = node_name_length[j] as usize;
            let name: Vec<u8> = node_name[offset..offset + len].iter().map(|b| *b as u8).collect();
            offset += len;
            tables.add_node(
                NodeFlags::from(node_flags[j]),
                node_time[j],
                node_population[j],
                &name,
            );
        }
        let mut offset = 0;
        for j in 0..num_edgesets {
            let len = edgeset_children_length[j] as usize;
            let children: Vec<NodeId> = edgeset_children[offset..offset + len]
                .iter()
                .map(|n| NodeId::from(*n))
                .collect();
            offset += len;
            tables.add_edgeset(
                edgeset_left[j],
                edgeset_right[j],
                edgeset_parent[j],
                &children,
            );
        }
        let mut offset = 0;
        for j in 0..num_sites {
            let len = site_ancestral_state_length[j] as usize;
            let state: Vec<u8> = site_ancestral_state[offset..offset + len]
                .iter()
                .map(|b| *b as u8)
                .collect();
            offset += len;
            tables.add_site(site_position[j], &state);
        }
        let mut offset = 0;
        for j in 0..num_mutations {
            let len = mutation_derived_state_length[j] as usize;
            let state: Vec<u8> = mutation_derived_state[offset..offset + len]
                .iter()
                .map(|b| *b as u8)
                .collect();
            offset += len;
            tables.add_mutation(mutation_site[j], mutation_node[j], &state);
        }
        for j in 0..num_migrations {
            tables.add_migration(
                migration_left[j],
                migration_right[j],
                migration_node[j],
                migration_source[j],
                migration_dest[j],
                migration_time[j],
            );
        }
        for record in &provenance {
            tables.add_provenance(record);
        }

        // The stored index permutations are required and dimension
        // checked above, then rebuilt deterministically by the load.
        TreeSequence::load_from_tables(tables)
    }
}

/// An in-memory [`ColumnarStore`], used by the round-trip tests.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MemoryStore {
    attributes: HashMap<String, Attribute>,
    groups: HashSet<String>,
    datasets: HashMap<String, (ColumnData, DatasetOptions)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The options a dataset was written with.
    pub fn dataset_options(&self, path: &str) -> Option<DatasetOptions> {
        self.datasets.get(path).map(|(_, options)| *options)
    }

    /// Drop a group, for tests of malformed containers.
    pub fn remove_group(&mut self, path: &str) -> bool {
        self.groups.remove(path)
    }
}

impl ColumnarStore for MemoryStore {
    fn put_attribute(&mut self, name: &str, value: Attribute) -> Result<(), ContainerError> {
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn attribute(&self, name: &str) -> Result<Attribute, ContainerError> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| ContainerError(format!("missing attribute {}", name)))
    }

    fn create_group(&mut self, path: &str) -> Result<(), ContainerError> {
        self.groups.insert(path.to_string());
        Ok(())
    }

    fn has_group(&self, path: &str) -> bool {
        self.groups.contains(path)
    }

    fn put_dataset(
        &mut self,
        path: &str,
        data: ColumnData,
        options: DatasetOptions,
    ) -> Result<(), ContainerError> {
        self.datasets.insert(path.to_string(), (data, options));
        Ok(())
    }

    fn dataset(&self, path: &str) -> Result<Option<&ColumnData>, ContainerError> {
        Ok(self.datasets.get(path).map(|(data, _)| data))
    }
}
