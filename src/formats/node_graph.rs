//! Reader for the node-based input graph (`.osrm`).
//!
//! Wire layout: `Fingerprint(16) | n(u32) | n node records | m(u32) |
//! m edge records`. A node record is `external_id u64 | lat i32 | lon i32 |
//! barrier u8 | traffic_light u8` (18 bytes). An edge record is
//! `source u32 | target u32 | length i32 | dir i16 | weight i32 |
//! name_id u32 | is_roundabout u8 | ignore_in_grid u8 |
//! access_restricted u8 | travel_mode u8 | is_split u8` (25 bytes).
//! `dir`: 0 = open both ways, 1 = forward only, 2 = backward only.
//!
//! Loading renumbers external ids to dense internal ids in insertion
//! order, renumbers restrictions (dropping those with unknown endpoints),
//! canonicalizes every edge to `source <= target`, and deduplicates
//! parallel edges.

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{
    ExternalNode, FixedPointCoordinate, ImportEdge, NodeID, TurnRestriction, INVALID_NODE,
};

use super::{read_i16, read_i32, read_u32, read_u64, read_u8, Fingerprint};

/// Everything the expansion stage needs from the input graph.
#[derive(Debug)]
pub struct NodeGraphData {
    pub node_count: u32,
    /// Internal node id to coordinate.
    pub coordinates: Vec<FixedPointCoordinate>,
    /// Internal node id back to the external id it was imported from.
    pub external_ids: Vec<u64>,
    pub barrier_nodes: Vec<NodeID>,
    pub traffic_lights: Vec<NodeID>,
    /// Canonicalized, deduplicated edges sorted by (source, target).
    pub edges: Vec<ImportEdge>,
    /// Restrictions renumbered to internal ids; unmappable ones dropped.
    pub restrictions: Vec<TurnRestriction>,
}

fn read_node<R: Read>(reader: &mut R) -> std::io::Result<ExternalNode> {
    Ok(ExternalNode {
        external_id: read_u64(reader)?,
        lat: read_i32(reader)?,
        lon: read_i32(reader)?,
        is_barrier: read_u8(reader)? != 0,
        has_traffic_light: read_u8(reader)? != 0,
    })
}

/// Reads the graph and folds the given restrictions (still on external
/// ids) into internal numbering.
pub fn read<P: AsRef<Path>>(
    path: P,
    restrictions: Vec<TurnRestriction>,
) -> Result<NodeGraphData> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    let mut reader = BufReader::new(File::open(path)?);

    let loaded = Fingerprint::read_from(&mut reader)?;
    if !loaded.test_graph_io(&Fingerprint::current()) {
        tracing::warn!(
            "{} was prepared with a different build, reprocess to get rid of this warning",
            path.display()
        );
    }

    let node_count = read_u32(&mut reader)?;
    tracing::info!("importing {} nodes", node_count);

    let mut ext_to_int: HashMap<u64, NodeID> = HashMap::with_capacity(node_count as usize);
    let mut coordinates = Vec::with_capacity(node_count as usize);
    let mut external_ids = Vec::with_capacity(node_count as usize);
    let mut barrier_nodes = Vec::new();
    let mut traffic_lights = Vec::new();

    for internal_id in 0..node_count {
        let node = read_node(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("node record {internal_id}: {e}")))?;
        coordinates.push(FixedPointCoordinate::new(node.lat, node.lon));
        external_ids.push(node.external_id);
        ext_to_int.insert(node.external_id, internal_id);
        if node.is_barrier {
            barrier_nodes.push(internal_id);
        }
        if node.has_traffic_light {
            traffic_lights.push(internal_id);
        }
    }

    let restrictions = renumber_restrictions(restrictions, &ext_to_int);

    let edge_count = read_u32(&mut reader)?;
    tracing::info!("and {} edges", edge_count);

    let mut edges = Vec::with_capacity(edge_count as usize);
    let mut unresolved_endpoints = 0usize;

    for i in 0..edge_count {
        let source_ext = read_u32(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("edge record {i}: {e}")))?;
        let target_ext = read_u32(&mut reader)?;
        let length = read_i32(&mut reader)?;
        let dir = read_i16(&mut reader)?;
        let weight = read_i32(&mut reader)?;
        let name_id = read_u32(&mut reader)?;
        let is_roundabout = read_u8(&mut reader)? != 0;
        let ignore_in_grid = read_u8(&mut reader)? != 0;
        let access_restricted = read_u8(&mut reader)? != 0;
        let travel_mode = read_u8(&mut reader)?;
        let is_split = read_u8(&mut reader)? != 0;

        if length <= 0 {
            return Err(Error::InputCorrupt(format!("edge record {i} has null length")));
        }
        if weight <= 0 {
            return Err(Error::InputCorrupt(format!("edge record {i} has null weight")));
        }
        if !(0..=2).contains(&dir) {
            return Err(Error::InputCorrupt(format!(
                "edge record {i} has bogus direction {dir}"
            )));
        }

        let mut forward = true;
        let mut backward = true;
        if dir == 1 {
            backward = false;
        }
        if dir == 2 {
            forward = false;
        }

        let (Some(&source), Some(&target)) = (
            ext_to_int.get(&(source_ext as u64)),
            ext_to_int.get(&(target_ext as u64)),
        ) else {
            unresolved_endpoints += 1;
            continue;
        };

        // canonical orientation, flags swap in lockstep
        let (source, target, forward, backward) = if source > target {
            (target, source, backward, forward)
        } else {
            (source, target, forward, backward)
        };

        edges.push(ImportEdge {
            source,
            target,
            name_id,
            weight,
            forward,
            backward,
            is_roundabout,
            ignore_in_grid,
            access_restricted,
            travel_mode,
            is_split,
        });
    }

    if unresolved_endpoints > 0 {
        tracing::debug!(
            "skipped {} edges with unresolved endpoints",
            unresolved_endpoints
        );
    }

    edges.par_sort_unstable_by_key(|e| (e.source, e.target, e.weight));
    deduplicate_edges(&mut edges);

    if edges.is_empty() {
        return Err(Error::EmptyGraph);
    }
    tracing::info!("graph loaded ok and has {} edges", edges.len());

    Ok(NodeGraphData {
        node_count,
        coordinates,
        external_ids,
        barrier_nodes,
        traffic_lights,
        edges,
        restrictions,
    })
}

fn renumber_restrictions(
    restrictions: Vec<TurnRestriction>,
    ext_to_int: &HashMap<u64, NodeID>,
) -> Vec<TurnRestriction> {
    let mut dropped = 0usize;
    let renumbered: Vec<TurnRestriction> = restrictions
        .into_iter()
        .filter_map(|r| {
            let from = ext_to_int.get(&(r.from as u64));
            let via = ext_to_int.get(&(r.via as u64));
            let to = ext_to_int.get(&(r.to as u64));
            match (from, via, to) {
                (Some(&from), Some(&via), Some(&to)) => Some(TurnRestriction {
                    from,
                    via,
                    to,
                    is_only: r.is_only,
                }),
                _ => {
                    dropped += 1;
                    None
                }
            }
        })
        .collect();
    if dropped > 0 {
        tracing::debug!("dropped {} restrictions with unmapped endpoints", dropped);
    }
    renumbered
}

/// Collapses edges sharing (source, target). Assumes the list is sorted.
///
/// Policy for each adjacent duplicate pair:
/// - equivalent direction flags: keep one copy with the minimum weight;
/// - one side open both ways and at most as expensive: drop the
///   unidirectional neighbour;
/// - one side open both ways but strictly slower: close the bidirectional
///   edge in the direction the cheaper one covers.
fn deduplicate_edges(edges: &mut Vec<ImportEdge>) {
    for i in 1..edges.len() {
        if edges[i - 1].source != edges[i].source || edges[i - 1].target != edges[i].target {
            continue;
        }

        let flags_equivalent = edges[i - 1].forward == edges[i].forward
            && edges[i - 1].backward == edges[i].backward;
        let first_is_superset = edges[i - 1].forward
            && edges[i - 1].backward
            && edges[i].forward != edges[i].backward;
        let second_is_superset = edges[i].forward
            && edges[i].backward
            && edges[i - 1].forward != edges[i - 1].backward;

        if flags_equivalent {
            edges[i].weight = edges[i - 1].weight.min(edges[i].weight);
            edges[i - 1].source = INVALID_NODE;
        } else if first_is_superset {
            if edges[i - 1].weight <= edges[i].weight {
                // the bidirectional edge wins outright
                edges[i].source = INVALID_NODE;
            } else {
                // cheaper one-way edge covers one direction, close the
                // bidirectional edge there
                edges[i - 1].forward = !edges[i].forward;
                edges[i - 1].backward = !edges[i].backward;
            }
        } else if second_is_superset {
            if edges[i - 1].weight <= edges[i].weight {
                edges[i].forward = !edges[i - 1].forward;
                edges[i].backward = !edges[i - 1].backward;
            } else {
                edges[i - 1].source = INVALID_NODE;
            }
        }
    }
    edges.retain(|edge| edge.source != INVALID_NODE && edge.target != INVALID_NODE);
}
