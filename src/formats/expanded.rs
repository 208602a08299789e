//! Writer and reader for the edge-expanded graph (`.osrm.expanded`).
//!
//! Wire layout: `crc32(u32) | node_count(u32) | edge_count(u32) |
//! edge_count x (source u32 | target u32 | id u32 | distance u32 |
//! flags u8)` with flags bit 0 = forward, bit 1 = backward.
//!
//! The file intentionally carries no fingerprint; downstream consumers
//! guard with the CRC32 over the edge-based-node records alone.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{EdgeBasedEdge, EdgeData, QueryEdge};

use super::{read_u32, read_u8, write_u32, write_u8};

const FLAG_FORWARD: u8 = 0b01;
const FLAG_BACKWARD: u8 = 0b10;

#[derive(Debug)]
pub struct ExpandedGraph {
    pub check_sum: u32,
    pub node_count: u32,
    pub edges: Vec<QueryEdge>,
}

/// Serializes the expanded edge list. Edges must already be sorted by
/// (source, target); weights are clamped to at least 1 on the way out.
pub fn write<P: AsRef<Path>>(
    path: P,
    check_sum: u32,
    node_count: u32,
    edges: &[EdgeBasedEdge],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);

    write_u32(&mut writer, check_sum)?;
    write_u32(&mut writer, node_count)?;
    write_u32(&mut writer, edges.len() as u32)?;

    for edge in edges {
        write_u32(&mut writer, edge.source)?;
        write_u32(&mut writer, edge.target)?;
        write_u32(&mut writer, edge.edge_id)?;
        write_u32(&mut writer, edge.weight.max(1) as u32)?;
        let mut flags = 0u8;
        if edge.forward {
            flags |= FLAG_FORWARD;
        }
        if edge.backward {
            flags |= FLAG_BACKWARD;
        }
        write_u8(&mut writer, flags)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<ExpandedGraph> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    if path.metadata()?.len() == 0 {
        return Err(Error::InputCorrupt(format!(
            "expanded graph file {} is empty",
            path.display()
        )));
    }
    let mut reader = BufReader::new(File::open(path)?);

    let check_sum = read_u32(&mut reader)?;
    let node_count = read_u32(&mut reader)?;
    let edge_count = read_u32(&mut reader)?;
    if node_count == 0 {
        return Err(Error::EmptyGraph);
    }
    if edge_count == 0 {
        return Err(Error::EmptyGraph);
    }
    tracing::info!(
        "number_of_nodes: {}, number_of_edges: {}",
        node_count,
        edge_count
    );

    let mut edges = Vec::with_capacity(edge_count as usize);
    for i in 0..edge_count {
        let source = read_u32(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("expanded edge record {i}: {e}")))?;
        let target = read_u32(&mut reader)?;
        let id = read_u32(&mut reader)?;
        let distance = read_u32(&mut reader)?;
        let flags = read_u8(&mut reader)?;

        if source == target {
            return Err(Error::InputCorrupt(format!(
                "expanded edge record {i} is a self loop at node {source}"
            )));
        }
        if source >= node_count || target >= node_count {
            return Err(Error::InputCorrupt(format!(
                "expanded edge record {i} references node beyond {node_count}"
            )));
        }

        edges.push(QueryEdge {
            source,
            target,
            data: EdgeData {
                distance: distance as i32,
                id,
                shortcut: false,
                forward: flags & FLAG_FORWARD != 0,
                backward: flags & FLAG_BACKWARD != 0,
            },
        });
    }

    Ok(ExpandedGraph {
        check_sum,
        node_count,
        edges,
    })
}
