//! Edge-based node records (`.osrm.ebnodes`), the geometry source for the
//! spatial index.
//!
//! Wire layout: `count(u32) | count x (forward_edge_id u32 |
//! reverse_edge_id u32 | u_lat i32 | u_lon i32 | v_lat i32 | v_lon i32 |
//! name_id u32 | forward_weight i32 | reverse_weight i32)` (37 bytes per
//! record). The expanded-graph CRC32 is computed over exactly these packed
//! records.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{EdgeBasedNode, FixedPointCoordinate};

use super::{crc, read_i32, read_u32, write_u32};

/// Packs one record into `out` in wire order.
pub fn pack(node: &EdgeBasedNode, out: &mut Vec<u8>) {
    out.extend_from_slice(&node.forward_edge_id.to_le_bytes());
    out.extend_from_slice(&node.reverse_edge_id.to_le_bytes());
    out.extend_from_slice(&node.u.lat.to_le_bytes());
    out.extend_from_slice(&node.u.lon.to_le_bytes());
    out.extend_from_slice(&node.v.lat.to_le_bytes());
    out.extend_from_slice(&node.v.lon.to_le_bytes());
    out.extend_from_slice(&node.name_id.to_le_bytes());
    out.extend_from_slice(&node.forward_weight.to_le_bytes());
    out.extend_from_slice(&node.reverse_weight.to_le_bytes());
}

/// CRC32 over the packed record list, the integrity guard of the expanded
/// graph file.
pub fn checksum(nodes: &[EdgeBasedNode]) -> u32 {
    let mut digest = crc::Digest::new();
    let mut buffer = Vec::with_capacity(64);
    for node in nodes {
        buffer.clear();
        pack(node, &mut buffer);
        digest.update(&buffer);
    }
    digest.finalize()
}

pub fn write<P: AsRef<Path>>(path: P, nodes: &[EdgeBasedNode]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_u32(&mut writer, nodes.len() as u32)?;
    let mut buffer = Vec::with_capacity(64);
    for node in nodes {
        buffer.clear();
        pack(node, &mut buffer);
        writer.write_all(&buffer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<EdgeBasedNode>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    let mut reader = BufReader::new(File::open(path)?);
    let count = read_u32(&mut reader)?;
    let mut nodes = Vec::with_capacity(count as usize);
    for i in 0..count {
        let forward_edge_id = read_u32(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("edge-based node record {i}: {e}")))?;
        let reverse_edge_id = read_u32(&mut reader)?;
        let u_lat = read_i32(&mut reader)?;
        let u_lon = read_i32(&mut reader)?;
        let v_lat = read_i32(&mut reader)?;
        let v_lon = read_i32(&mut reader)?;
        let name_id = read_u32(&mut reader)?;
        let forward_weight = read_i32(&mut reader)?;
        let reverse_weight = read_i32(&mut reader)?;
        nodes.push(EdgeBasedNode {
            forward_edge_id,
            reverse_edge_id,
            u: FixedPointCoordinate::new(u_lat, u_lon),
            v: FixedPointCoordinate::new(v_lat, v_lon),
            name_id,
            forward_weight,
            reverse_weight,
        });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INVALID_NODE;

    fn sample() -> Vec<EdgeBasedNode> {
        vec![
            EdgeBasedNode {
                forward_edge_id: 0,
                reverse_edge_id: 1,
                u: FixedPointCoordinate::new(50_000_000, 8_000_000),
                v: FixedPointCoordinate::new(50_001_000, 8_001_000),
                name_id: 3,
                forward_weight: 10,
                reverse_weight: 10,
            },
            EdgeBasedNode {
                forward_edge_id: 2,
                reverse_edge_id: INVALID_NODE,
                u: FixedPointCoordinate::new(50_001_000, 8_001_000),
                v: FixedPointCoordinate::new(50_002_000, 8_002_000),
                name_id: 3,
                forward_weight: 15,
                reverse_weight: 15,
            },
        ]
    }

    #[test]
    fn test_roundtrip_and_checksum_stability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.osrm.ebnodes");
        let nodes = sample();

        write(&path, &nodes).unwrap();
        let restored = read(&path).unwrap();

        assert_eq!(restored.len(), nodes.len());
        assert_eq!(restored[1].reverse_edge_id, INVALID_NODE);
        assert_eq!(restored[0].v, nodes[0].v);
        // checksum must not depend on the detour through disk
        assert_eq!(checksum(&restored), checksum(&nodes));
    }

    #[test]
    fn test_checksum_sensitive_to_geometry() {
        let nodes = sample();
        let mut tweaked = nodes.clone();
        tweaked[0].v.lat += 1;
        assert_ne!(checksum(&nodes), checksum(&tweaked));
    }
}
