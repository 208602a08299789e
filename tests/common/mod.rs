//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use wayfarer::facade::DataFacade;
use wayfarer::formats::expanded::ExpandedGraph;
use wayfarer::formats::node_map::NodeMapEntry;
use wayfarer::formats::{edge_nodes, Fingerprint};
use wayfarer::types::{
    EdgeBasedNode, EdgeData, FixedPointCoordinate, QueryEdge, INVALID_NODE,
};

pub struct OsrmNode {
    pub external_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub barrier: bool,
    pub traffic_light: bool,
}

pub struct OsrmEdge {
    pub source: u32,
    pub target: u32,
    pub length: i32,
    /// 0 = open both ways, 1 = forward only, 2 = backward only
    pub dir: i16,
    pub weight: i32,
}

/// Writes a `.osrm` file in the wire format the loader expects.
pub fn write_osrm(path: &Path, nodes: &[OsrmNode], edges: &[OsrmEdge]) {
    let mut out = Vec::new();
    out.extend_from_slice(&Fingerprint::current().to_bytes());
    out.extend_from_slice(&(nodes.len() as u32).to_le_bytes());
    for node in nodes {
        let coord = FixedPointCoordinate::from_degrees(node.lat, node.lon);
        out.extend_from_slice(&node.external_id.to_le_bytes());
        out.extend_from_slice(&coord.lat.to_le_bytes());
        out.extend_from_slice(&coord.lon.to_le_bytes());
        out.push(node.barrier as u8);
        out.push(node.traffic_light as u8);
    }
    out.extend_from_slice(&(edges.len() as u32).to_le_bytes());
    for edge in edges {
        out.extend_from_slice(&edge.source.to_le_bytes());
        out.extend_from_slice(&edge.target.to_le_bytes());
        out.extend_from_slice(&edge.length.to_le_bytes());
        out.extend_from_slice(&edge.dir.to_le_bytes());
        out.extend_from_slice(&edge.weight.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // name_id
        out.push(0); // is_roundabout
        out.push(0); // ignore_in_grid
        out.push(0); // access_restricted
        out.push(0); // travel_mode
        out.push(0); // is_split
    }
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&out).unwrap();
}

/// Writes a `.osrm.restrictions` file; node ids are external.
pub fn write_restrictions(path: &Path, restrictions: &[(u32, u32, u32, bool)]) {
    let mut out = Vec::new();
    out.extend_from_slice(&Fingerprint::current().to_bytes());
    out.extend_from_slice(&(restrictions.len() as u32).to_le_bytes());
    for &(from, via, to, is_only) in restrictions {
        out.extend_from_slice(&from.to_le_bytes());
        out.extend_from_slice(&via.to_le_bytes());
        out.extend_from_slice(&to.to_le_bytes());
        out.push(is_only as u8);
    }
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&out).unwrap();
}

fn forward_edge(source: u32, target: u32, distance: i32) -> QueryEdge {
    QueryEdge {
        source,
        target,
        data: EdgeData {
            distance,
            id: source,
            shortcut: false,
            forward: true,
            backward: false,
        },
    }
}

/// A facade whose query graph is a plain line 0-1-2-3 with unit weights.
///
/// Each query-graph node doubles as a west-to-east road segment starting
/// at longitude 8.000 + 0.001 * id, so coordinates snap predictably: a
/// point near longitude 8.0 resolves to phantom node 0, a point near
/// 8.0035 to phantom node 3.
pub fn line_facade() -> DataFacade {
    line_facade_with_edges(vec![
        forward_edge(0, 1, 1),
        forward_edge(1, 2, 1),
        forward_edge(2, 3, 1),
    ])
}

/// Same geometry as `line_facade`, but with the 2-3 link missing, leaving
/// node 3 unreachable.
pub fn broken_line_facade() -> DataFacade {
    line_facade_with_edges(vec![forward_edge(0, 1, 1), forward_edge(1, 2, 1)])
}

fn line_facade_with_edges(edges: Vec<QueryEdge>) -> DataFacade {
    let mut records = Vec::new();
    let mut entries = Vec::new();
    for id in 0..4u32 {
        let west = FixedPointCoordinate::from_degrees(50.0, 8.0 + 0.001 * id as f64);
        let east = FixedPointCoordinate::from_degrees(50.0, 8.001 + 0.001 * id as f64);
        records.push(EdgeBasedNode {
            forward_edge_id: id,
            reverse_edge_id: INVALID_NODE,
            u: west,
            v: east,
            name_id: 0,
            forward_weight: 1,
            reverse_weight: 1,
        });
        entries.push(NodeMapEntry {
            coordinate: west,
            external_id: 100 + id as u64,
        });
    }

    let check_sum = edge_nodes::checksum(&records);
    DataFacade::from_parts(
        ExpandedGraph {
            check_sum,
            node_count: 4,
            edges,
        },
        records,
        entries,
    )
    .unwrap()
}
