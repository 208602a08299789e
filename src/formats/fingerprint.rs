//! 16-byte build-identity token embedded in data files.
//!
//! Detects mismatched producer/consumer binaries. A mismatch is reported
//! as a warning and never fails the load; stale files keep working until
//! the operator reprocesses them.

use std::io::{self, Read, Write};

pub const FINGERPRINT_SIZE: usize = 16;

const MAGIC: u32 = 0x5746_5250; // "WFRP"

/// Bumped whenever the record layout of the graph files changes.
const GRAPH_IO_REVISION: &str = "wayfarer-graph-io-3";

/// Ties restriction files to the preprocessor that wrote them.
const PREPARE_REVISION: &str = concat!("wayfarer-prepare-", env!("CARGO_PKG_VERSION"));

fn fnv1a(input: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in input.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    magic: u32,
    graph_io: u32,
    prepare: u32,
    mix: u32,
}

impl Fingerprint {
    /// The fingerprint of the running binary.
    pub fn current() -> Self {
        let graph_io = fnv1a(GRAPH_IO_REVISION);
        let prepare = fnv1a(PREPARE_REVISION);
        Self {
            magic: MAGIC,
            graph_io,
            prepare,
            mix: MAGIC ^ graph_io ^ prepare,
        }
    }

    /// Whether `self` (loaded from a file) matches the graph-I/O revision
    /// of `other` (the running binary).
    pub fn test_graph_io(&self, other: &Fingerprint) -> bool {
        self.magic == other.magic && self.graph_io == other.graph_io
    }

    /// Whether `self` matches the preprocessor revision of `other`.
    pub fn test_prepare(&self, other: &Fingerprint) -> bool {
        self.magic == other.magic && self.prepare == other.prepare
    }

    pub fn to_bytes(&self) -> [u8; FINGERPRINT_SIZE] {
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.graph_io.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.prepare.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.mix.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; FINGERPRINT_SIZE]) -> Self {
        let word = |i: usize| {
            u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
        };
        Self {
            magic: word(0),
            graph_io: word(4),
            prepare: word(8),
            mix: word(12),
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }
}
