//! Binary file formats of the preprocessing pipeline.
//!
//! All multi-byte fields are little-endian and written field by field, so
//! record sizes are platform stable:
//!
//! - `.osrm`              node-based input graph (fingerprinted)
//! - `.osrm.restrictions` turn restrictions (fingerprinted)
//! - `.osrm.expanded`     edge-expanded graph, guarded by CRC32 only
//! - `.osrm.nodes`        internal to external node mapping
//! - `.osrm.ebnodes`      edge-based node geometry for the spatial index

pub mod crc;
pub mod edge_nodes;
pub mod expanded;
pub mod fingerprint;
pub mod node_graph;
pub mod node_map;
pub mod restrictions;

pub use fingerprint::Fingerprint;

use std::io::{self, Read, Write};

pub(crate) fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub(crate) fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn read_i16<R: Read>(reader: &mut R) -> io::Result<i16> {
    Ok(read_u16(reader)? as i16)
}

pub(crate) fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    Ok(read_u32(reader)? as i32)
}

pub(crate) fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub(crate) fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    write_u32(writer, value as u32)
}

pub(crate) fn write_u64<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}
