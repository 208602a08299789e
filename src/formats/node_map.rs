//! Mapping from internal node ids back to coordinates and external ids
//! (`.osrm.nodes`).
//!
//! Wire layout: `count(u32) | count x (lat i32 | lon i32 | external_id u64)`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FixedPointCoordinate;

use super::{read_i32, read_u32, read_u64, write_i32, write_u32, write_u64};

#[derive(Debug, Clone, Copy)]
pub struct NodeMapEntry {
    pub coordinate: FixedPointCoordinate,
    pub external_id: u64,
}

pub fn write<P: AsRef<Path>>(path: P, entries: &[NodeMapEntry]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_u32(&mut writer, entries.len() as u32)?;
    for entry in entries {
        write_i32(&mut writer, entry.coordinate.lat)?;
        write_i32(&mut writer, entry.coordinate.lon)?;
        write_u64(&mut writer, entry.external_id)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<NodeMapEntry>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    let mut reader = BufReader::new(File::open(path)?);
    let count = read_u32(&mut reader)?;
    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let lat = read_i32(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("node map record {i}: {e}")))?;
        let lon = read_i32(&mut reader)?;
        let external_id = read_u64(&mut reader)?;
        entries.push(NodeMapEntry {
            coordinate: FixedPointCoordinate::new(lat, lon),
            external_id,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.osrm.nodes");
        let entries = vec![
            NodeMapEntry {
                coordinate: FixedPointCoordinate::new(52_000_000, 13_000_000),
                external_id: 1001,
            },
            NodeMapEntry {
                coordinate: FixedPointCoordinate::new(-33_500_000, 151_200_000),
                external_id: 42,
            },
        ];
        write(&path, &entries).unwrap();
        let restored = read(&path).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].external_id, 1001);
        assert_eq!(restored[1].coordinate.lat, -33_500_000);
    }
}
