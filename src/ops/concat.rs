//! `concat`: merge several files' top-level IFD chains into a single
//! root list for re-emission (spec §4.4, "concatenate top-level IFD
//! chains in order into a single root list").

use std::sync::Arc;

use crate::error::{RetiffResult, UsageError};
use crate::model::{Ifd, TiffInfo};

/// Merge `inputs` (in order) into one [`TiffInfo`] whose top-level IFD
/// list is the concatenation of every input's top-level IFDs.
///
/// Each merged IFD keeps its own [`crate::model::ByteSource`] handle, so
/// [`crate::writer::write_tiff`] streams each strip/tile straight from
/// whichever input file it actually came from; original source offsets
/// and chain pointers are discarded and reassigned entirely by the
/// writer (spec §4.4).
///
/// All inputs must share the same byte order: a directory entry's raw
/// payload bytes are only meaningful together with the byte order they
/// were read with, and [`TiffInfo`] carries one byte order for its whole
/// tree. Mixed-endian concatenation is rejected rather than silently
/// misread.
pub fn concat(inputs: Vec<TiffInfo>) -> RetiffResult<TiffInfo> {
    let mut inputs = inputs.into_iter();
    let first = inputs
        .next()
        .ok_or_else(|| UsageError::ConflictingDirectives("concat requires at least one input".into()))?;

    let byte_order = first.byte_order;
    let mut ifds: Vec<Ifd> = clear_chain_pointers(first.ifds);
    let mut big_tiff = first.big_tiff;
    let mut source = Arc::clone(&first.source);

    for input in inputs {
        if input.byte_order != byte_order {
            return Err(UsageError::ConflictingDirectives(
                "all concat inputs must share the same byte order".into(),
            )
            .into());
        }
        big_tiff = big_tiff || input.big_tiff;
        ifds.extend(clear_chain_pointers(input.ifds));
        source = Arc::clone(&input.source); // keep the last input's source alive too; each IFD holds its own.
    }

    Ok(TiffInfo {
        byte_order,
        big_tiff,
        version: if big_tiff { 43 } else { 42 },
        ifds,
        warnings: Vec::new(),
        source,
    })
}

fn clear_chain_pointers(ifds: Vec<Ifd>) -> Vec<Ifd> {
    ifds.into_iter()
        .map(|mut ifd| {
            ifd.next_ifd_offset = None;
            ifd.source_offset = None;
            ifd
        })
        .collect()
}
