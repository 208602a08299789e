//! Edge-expansion engine.
//!
//! Turns the node-based graph (nodes are intersections, edges are road
//! segments) into the edge-based graph the query engine runs on: every
//! traversable directed segment becomes a node, every permitted turn
//! between two segments meeting at an intersection becomes an edge whose
//! weight is the incoming segment weight plus the turn cost.
//!
//! Turn legality at a via node:
//! - a matching no-turn restriction forbids the turn;
//! - an only-turn restriction forbids every other turn from its segment;
//! - at barrier nodes only the u-turn back onto the entry road survives.
//!
//! Turn cost on top of the segment weight: the profile's angle-dependent
//! penalty, the traffic-signal penalty when the via node carries a light,
//! and the u-turn penalty when doubling back.

pub mod restriction_map;

use std::collections::HashSet;

use crate::error::Result;
use crate::formats::node_graph::NodeGraphData;
use crate::geo;
use crate::profile::Profile;
use crate::types::{EdgeBasedEdge, EdgeBasedNode, NodeID, INVALID_NODE};

use restriction_map::RestrictionMap;

/// One traversable direction of a canonical import edge.
#[derive(Debug, Clone, Copy)]
struct DirectedSegment {
    source: NodeID,
    target: NodeID,
    weight: i32,
    id: NodeID,
}

#[derive(Debug)]
pub struct ExpansionResult {
    /// One record per surviving import edge, with per-direction ids.
    pub edge_based_nodes: Vec<EdgeBasedNode>,
    /// Unsorted turn edges; the caller sorts before serializing.
    pub edge_based_edges: Vec<EdgeBasedEdge>,
    /// Number of edge-based nodes (directed segments).
    pub node_count: u32,
}

pub fn expand(data: &NodeGraphData, profile: &dyn Profile) -> Result<ExpansionResult> {
    let properties = profile.properties();
    let restriction_map = RestrictionMap::new(&data.restrictions);
    let barriers: HashSet<NodeID> = data.barrier_nodes.iter().copied().collect();
    let traffic_lights: HashSet<NodeID> = data.traffic_lights.iter().copied().collect();

    // Directed segments get their edge-based node ids by insertion order:
    // canonical edge order, forward direction before reverse.
    let mut segments: Vec<DirectedSegment> = Vec::new();
    let mut edge_based_nodes = Vec::with_capacity(data.edges.len());

    for edge in &data.edges {
        let mut forward_edge_id = INVALID_NODE;
        let mut reverse_edge_id = INVALID_NODE;
        if edge.forward {
            forward_edge_id = segments.len() as NodeID;
            segments.push(DirectedSegment {
                source: edge.source,
                target: edge.target,
                weight: edge.weight,
                id: forward_edge_id,
            });
        }
        if edge.backward {
            reverse_edge_id = segments.len() as NodeID;
            segments.push(DirectedSegment {
                source: edge.target,
                target: edge.source,
                weight: edge.weight,
                id: reverse_edge_id,
            });
        }
        edge_based_nodes.push(EdgeBasedNode {
            forward_edge_id,
            reverse_edge_id,
            u: data.coordinates[edge.source as usize],
            v: data.coordinates[edge.target as usize],
            name_id: edge.name_id,
            forward_weight: edge.weight,
            reverse_weight: edge.weight,
        });
    }

    let mut outgoing: Vec<Vec<u32>> = vec![Vec::new(); data.node_count as usize];
    let mut incoming: Vec<Vec<u32>> = vec![Vec::new(); data.node_count as usize];
    for (index, segment) in segments.iter().enumerate() {
        outgoing[segment.source as usize].push(index as u32);
        incoming[segment.target as usize].push(index as u32);
    }

    let mut edge_based_edges = Vec::new();

    for via in 0..data.node_count {
        let via_is_barrier = barriers.contains(&via);
        let via_has_light = traffic_lights.contains(&via);

        for &e1 in &incoming[via as usize] {
            let entry = segments[e1 as usize];
            let u = entry.source;

            let only_target = restriction_map.only_turn_target(u, via);

            for &e2 in &outgoing[via as usize] {
                if e1 == e2 {
                    continue;
                }
                let exit = segments[e2 as usize];
                let w = exit.target;

                if via_is_barrier && u != w {
                    continue;
                }
                match only_target {
                    Some(only) if w != only => continue,
                    None if restriction_map.is_restricted(u, via, w) => continue,
                    _ => {}
                }

                let mut distance = entry.weight;
                if via_has_light {
                    distance += properties.traffic_signal_penalty;
                }
                if u == w {
                    distance += properties.u_turn_penalty;
                }
                let angle = geo::turn_angle(
                    data.coordinates[u as usize],
                    data.coordinates[via as usize],
                    data.coordinates[w as usize],
                );
                distance += profile.turn_penalty(angle);

                let edge_id = edge_based_edges.len() as u32;
                edge_based_edges.push(EdgeBasedEdge {
                    source: entry.id,
                    target: exit.id,
                    edge_id,
                    weight: distance,
                    forward: true,
                    backward: false,
                });
            }
        }
    }

    tracing::info!(
        "expanded {} segments into {} edge-based nodes and {} turn edges",
        data.edges.len(),
        segments.len(),
        edge_based_edges.len()
    );

    Ok(ExpansionResult {
        edge_based_nodes,
        node_count: segments.len() as u32,
        edge_based_edges,
    })
}
