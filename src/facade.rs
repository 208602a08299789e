//! Read-only data facade shared by every plugin.
//!
//! Owns the query graph, the edge-based geometry, the spatial index and
//! the node mapping for the process lifetime. Built once at startup,
//! immutable afterwards, shared across workers behind an `Arc` without
//! locking. Plugins hold a borrow of this facade; the facade holds no
//! reverse pointers.

use std::ops::Range;
use std::path::{Path, PathBuf};

use rstar::{primitives::GeomWithData, RTree};

use crate::error::{Error, Result};
use crate::formats::{edge_nodes, expanded, node_map};
use crate::graph::StaticGraph;
use crate::spatial::SpatialIndex;
use crate::types::{
    EdgeBasedNode, EdgeData, EdgeID, FixedPointCoordinate, NodeID, PhantomNode, INVALID_NODE,
};

pub struct DataFacade {
    graph: StaticGraph,
    check_sum: u32,
    /// Edge-based node id to the coordinate of the segment endpoint it
    /// runs towards; used to render route geometry.
    edge_coordinates: Vec<FixedPointCoordinate>,
    spatial: SpatialIndex,
    node_map: Vec<node_map::NodeMapEntry>,
    node_tree: RTree<GeomWithData<[f64; 2], u32>>,
}

fn sibling_file(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl DataFacade {
    /// Loads `<base>.expanded`, `<base>.ebnodes` and `<base>.nodes`.
    pub fn load(base: &Path) -> Result<Self> {
        let expanded_path = sibling_file(base, ".expanded");
        let ebnodes_path = sibling_file(base, ".ebnodes");
        let nodes_path = sibling_file(base, ".nodes");

        tracing::info!("loading graph from {}", expanded_path.display());
        let graph = expanded::read(&expanded_path)?;
        let edge_based_nodes = edge_nodes::read(&ebnodes_path)?;
        let entries = node_map::read(&nodes_path)?;

        let recomputed = edge_nodes::checksum(&edge_based_nodes);
        if recomputed != graph.check_sum {
            return Err(Error::InputCorrupt(format!(
                "checksum mismatch: expanded graph carries {:#010x}, edge-based nodes hash to {:#010x}",
                graph.check_sum, recomputed
            )));
        }
        tracing::info!("CRC32: {}", graph.check_sum);

        Self::from_parts(graph, edge_based_nodes, entries)
    }

    /// Assembles a facade from already-loaded pieces.
    pub fn from_parts(
        graph: expanded::ExpandedGraph,
        edge_based_nodes: Vec<EdgeBasedNode>,
        entries: Vec<node_map::NodeMapEntry>,
    ) -> Result<Self> {
        let node_count = graph.node_count;
        let check_sum = graph.check_sum;

        let mut edge_coordinates = vec![FixedPointCoordinate::default(); node_count as usize];
        for record in &edge_based_nodes {
            if record.forward_edge_id != INVALID_NODE {
                if record.forward_edge_id >= node_count {
                    return Err(Error::InputCorrupt(format!(
                        "edge-based node id {} out of range",
                        record.forward_edge_id
                    )));
                }
                edge_coordinates[record.forward_edge_id as usize] = record.v;
            }
            if record.reverse_edge_id != INVALID_NODE {
                if record.reverse_edge_id >= node_count {
                    return Err(Error::InputCorrupt(format!(
                        "edge-based node id {} out of range",
                        record.reverse_edge_id
                    )));
                }
                edge_coordinates[record.reverse_edge_id as usize] = record.u;
            }
        }

        let node_tree = RTree::bulk_load(
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    GeomWithData::new(
                        [
                            entry.coordinate.lon_degrees(),
                            entry.coordinate.lat_degrees(),
                        ],
                        index as u32,
                    )
                })
                .collect(),
        );

        Ok(Self {
            graph: StaticGraph::new(node_count, graph.edges),
            check_sum,
            edge_coordinates,
            spatial: SpatialIndex::build(edge_based_nodes),
            node_map: entries,
            node_tree,
        })
    }

    pub fn node_count(&self) -> u32 {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count()
    }

    pub fn check_sum(&self) -> u32 {
        self.check_sum
    }

    pub fn adjacent_edge_range(&self, node: NodeID) -> Range<EdgeID> {
        self.graph.adjacent_edge_range(node)
    }

    pub fn edge_data(&self, edge: EdgeID) -> &EdgeData {
        self.graph.edge_data(edge)
    }

    pub fn target(&self, edge: EdgeID) -> NodeID {
        self.graph.target(edge)
    }

    pub fn find_smallest_edge(&self, source: NodeID, target: NodeID) -> Option<EdgeID> {
        self.graph.find_smallest_edge(source, target)
    }

    pub fn edge_based_coordinate(&self, node: NodeID) -> FixedPointCoordinate {
        self.edge_coordinates[node as usize]
    }

    pub fn nearest_phantom(&self, coord: FixedPointCoordinate) -> Option<PhantomNode> {
        self.spatial.nearest_phantom(coord)
    }

    /// Nearest node of the original node-based graph, with its mapping
    /// entry.
    pub fn nearest_graph_node(
        &self,
        coord: FixedPointCoordinate,
    ) -> Option<(NodeID, &node_map::NodeMapEntry)> {
        let hit = self
            .node_tree
            .nearest_neighbor(&[coord.lon_degrees(), coord.lat_degrees()])?;
        Some((hit.data, &self.node_map[hit.data as usize]))
    }
}
