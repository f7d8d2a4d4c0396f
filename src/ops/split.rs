//! `split`: project each top-level IFD (and optionally each SubIFD) of a
//! [`TiffInfo`] into its own single-IFD [`TiffInfo`].

use std::sync::Arc;

use crate::model::{ByteSource, EntryValue, Ifd, TiffInfo};

/// A single IFD lifted out of its source file, ready to be written as its
/// own standalone TIFF.
fn as_root(mut ifd: Ifd, keep_subifds: bool) -> Ifd {
    ifd.source_offset = None;
    ifd.next_ifd_offset = None;
    if !keep_subifds {
        let subifd_tags: Vec<u16> = ifd
            .entries
            .iter()
            .filter(|(_, e)| matches!(e.value, EntryValue::SubIfds(_)))
            .map(|(&tag, _)| tag)
            .collect();
        for tag in subifd_tags {
            ifd.remove(tag);
        }
    }
    ifd
}

/// Recursively collect `ifd` itself, followed by every SubIFD reachable
/// from it (depth-first), each projected as a standalone root.
fn collect(ifd: &Ifd, include_subifds: bool, out: &mut Vec<Ifd>) {
    out.push(as_root(ifd.clone(), include_subifds));
    if include_subifds {
        for entry in ifd.entries.values() {
            if let EntryValue::SubIfds(children) = &entry.value {
                for child in children {
                    collect(child, include_subifds, out);
                }
            }
        }
    }
}

/// Split `info` into one [`TiffInfo`] per top-level IFD, and (when
/// `include_subifds` is true) one additional [`TiffInfo`] per SubIFD
/// reachable from any of them, in depth-first order.
///
/// Each returned [`TiffInfo`] is a complete, self-contained single-IFD
/// file sharing the original [`ByteSource`], so image-payload bytes are
/// still streamed (never copied into memory) when the caller writes it
/// out through [`crate::writer::write_tiff`].
pub fn split(info: &TiffInfo, include_subifds: bool) -> Vec<TiffInfo> {
    let mut roots = Vec::new();
    for ifd in &info.ifds {
        collect(ifd, include_subifds, &mut roots);
    }

    roots
        .into_iter()
        .map(|ifd| TiffInfo {
            byte_order: info.byte_order,
            big_tiff: info.big_tiff,
            version: info.version,
            ifds: vec![ifd],
            warnings: Vec::new(),
            source: Arc::clone(&info.source),
        })
        .collect()
}

/// Whether `ifd` still carries any `EntryValue::SubIfds` entry.
pub fn has_subifds(ifd: &Ifd) -> bool {
    ifd.entries.values().any(|e| matches!(e.value, EntryValue::SubIfds(_)))
}
