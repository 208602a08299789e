//! Reader for the turn-restriction file (`.osrm.restrictions`).
//!
//! Wire layout: `Fingerprint(16) | count(u32) | count x (from u32 |
//! via u32 | to u32 | is_only u8)`. Node ids are external at this point;
//! the graph loader renumbers them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::TurnRestriction;

use super::{read_u32, read_u8, Fingerprint};

pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<TurnRestriction>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    let mut reader = BufReader::new(File::open(path)?);

    let loaded = Fingerprint::read_from(&mut reader)?;
    if !loaded.test_prepare(&Fingerprint::current()) {
        tracing::warn!(
            "{} was prepared with a different build, reprocess to get rid of this warning",
            path.display()
        );
    }

    let count = read_u32(&mut reader)?;
    let mut restrictions = Vec::with_capacity(count as usize);
    for i in 0..count {
        let from = read_u32(&mut reader)
            .map_err(|e| Error::InputCorrupt(format!("restriction record {i}: {e}")))?;
        let via = read_u32(&mut reader)?;
        let to = read_u32(&mut reader)?;
        let is_only = read_u8(&mut reader)? != 0;
        restrictions.push(TurnRestriction {
            from,
            via,
            to,
            is_only,
        });
    }
    Ok(restrictions)
}
