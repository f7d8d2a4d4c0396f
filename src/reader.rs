//! Parses a classic or BigTIFF stream into a [`crate::model::TiffInfo`],
//! preserving every tag — known or not — byte for byte.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::error::{FormatError, RetiffResult, Warning};
use crate::model::{ByteSource, EntryValue, Ifd, TagEntry, TiffInfo};
use crate::registry::{self, TagSet};
use crate::types::{ByteOrder, Datatype};

/// SubIFD nesting deeper than this is treated as malformed input rather
/// than followed indefinitely.
const MAX_IFD_DEPTH: u32 = 16;

const CLASSIC_VERSION: u16 = 42;
const BIGTIFF_VERSION: u16 = 43;

/// Parse a complete TIFF/BigTIFF stream backed by `source`.
pub fn read_tiff(source: Arc<dyn ByteSource>) -> RetiffResult<TiffInfo> {
    let header = source.read_range(0, 8)?;
    let byte_order = match &header[0..2] {
        b"II" => ByteOrder::LittleEndian,
        b"MM" => ByteOrder::BigEndian,
        other => {
            let mut magic = [0u8; 2];
            magic.copy_from_slice(other);
            return Err(FormatError::BadHeaderMagic(magic).into());
        }
    };

    let version = byte_order.read_u16(&header[2..4]);
    let big_tiff = match version {
        CLASSIC_VERSION => false,
        BIGTIFF_VERSION => true,
        other => return Err(FormatError::UnknownTiffVersion(other).into()),
    };

    let (first_ifd_offset, offset_size_fields) = if big_tiff {
        let rest = source.read_range(4, 12)?;
        let offset_byte_size = byte_order.read_u16(&rest[0..2]);
        let const_zero = byte_order.read_u16(&rest[2..4]);
        if offset_byte_size != 8 || const_zero != 0 {
            return Err(FormatError::TruncatedFile.into());
        }
        (byte_order.read_u64(&rest[4..12]), 8u16)
    } else {
        (byte_order.read_u32(&header[4..8]) as u64, 4u16)
    };
    debug!(
        "header parsed: byte_order={byte_order:?} big_tiff={big_tiff} offset_size={offset_size_fields}"
    );

    let mut warnings = Vec::new();
    let mut visited = HashSet::new();
    let mut ifds = Vec::new();
    let mut next_offset = Some(first_ifd_offset);

    while let Some(offset) = next_offset {
        if offset == 0 {
            break;
        }
        let ifd = read_ifd(
            &source,
            offset,
            byte_order,
            big_tiff,
            TagSet::Tiff,
            0,
            &mut visited,
            &mut warnings,
        )?;
        next_offset = ifd.next_ifd_offset;
        ifds.push(ifd);
    }

    if ifds.is_empty() {
        warn!("file contains a valid header but no top-level IFDs");
    }

    Ok(TiffInfo {
        byte_order,
        big_tiff,
        version,
        ifds,
        warnings,
        source,
    })
}

/// Reads one IFD at `offset`, recursively resolving any SubIFD pointer
/// tags it contains, and applying the NDPI classic-header fix-up
/// (spec.md §9) when the heuristic triggers.
#[allow(clippy::too_many_arguments)]
fn read_ifd(
    source: &Arc<dyn ByteSource>,
    offset: u64,
    byte_order: ByteOrder,
    big_tiff: bool,
    tag_set: TagSet,
    depth: u32,
    visited: &mut HashSet<u64>,
    warnings: &mut Vec<Warning>,
) -> RetiffResult<Ifd> {
    if depth > MAX_IFD_DEPTH {
        return Err(FormatError::MaxIfdDepthExceeded.into());
    }
    if !visited.insert(offset) {
        return Err(FormatError::CircularIfdReference.into());
    }

    let entry_count_size = if big_tiff { 8 } else { 2 };
    let entry_size: u64 = if big_tiff { 20 } else { 12 };
    let offset_size: u64 = if big_tiff { 8 } else { 4 };

    let count_bytes = source.read_range(offset, entry_count_size)?;
    let entry_count = if big_tiff {
        byte_order.read_u64(&count_bytes)
    } else {
        byte_order.read_u16(&count_bytes) as u64
    };

    let table_offset = offset + entry_count_size;
    let table = source.read_range(table_offset, entry_count * entry_size)?;

    let mut ifd = Ifd::new(tag_set, Arc::clone(source));
    ifd.source_offset = Some(offset);

    let ndpi_fixup = !big_tiff && source.len() > 0xFFFF_FFFF;
    if ndpi_fixup {
        trace!("classic header with file size > 4GiB at IFD {offset}; NDPI offset fix-up armed");
    }

    for i in 0..entry_count {
        let raw = &table[(i * entry_size) as usize..((i + 1) * entry_size) as usize];
        let tag = byte_order.read_u16(&raw[0..2]);
        let datatype_code = byte_order.read_u16(&raw[2..4]);

        let datatype = match Datatype::from_code(datatype_code) {
            Ok(dt) => dt,
            Err(_) => {
                warnings.push(Warning::UnknownTagUnknownDatatype {
                    ifd_offset: offset,
                    tag,
                    datatype_code,
                });
                continue;
            }
        };

        let count = if big_tiff {
            byte_order.read_u64(&raw[4..12])
        } else {
            byte_order.read_u32(&raw[4..8]) as u64
        };

        let value_field = if big_tiff { &raw[12..20] } else { &raw[8..12] };
        let payload_len = count.saturating_mul(datatype.element_size());

        let inline_capacity = if big_tiff { 8 } else { 4 };
        let raw_bytes = if payload_len <= inline_capacity {
            value_field[..payload_len as usize].to_vec()
        } else {
            let payload_offset = if big_tiff {
                byte_order.read_u64(value_field)
            } else {
                byte_order.read_u32(value_field) as u64
            };
            source.read_range(payload_offset, payload_len)?
        };

        let descriptor = registry::lookup_by_id(tag_set, tag);
        let treat_as_ifd = datatype.is_offset_sized() || descriptor.map_or(false, |d| d.is_ifd);

        if treat_as_ifd {
            let child_tag_set = descriptor.map(|d| child_tag_set_for(tag_set, d)).unwrap_or(tag_set);
            let pointers = decode_offsets(datatype, &raw_bytes, byte_order);
            let mut children = Vec::with_capacity(pointers.len());
            for pointer in pointers {
                let child = read_ifd(
                    source,
                    pointer,
                    byte_order,
                    big_tiff,
                    child_tag_set,
                    depth + 1,
                    visited,
                    warnings,
                )?;
                children.push(child);
            }
            ifd.insert(TagEntry::new_subifds(tag, datatype, children));
        } else {
            let (datatype, raw_bytes) = if ndpi_fixup && is_ndpi_offset_tag(tag) {
                match repair_ndpi_array(&raw_bytes, byte_order, source.len()) {
                    Some(repaired) => {
                        trace!("tag 0x{tag:04x}: NDPI offset values repaired, widened to LONG8");
                        (Datatype::Long8, repaired)
                    }
                    None => (datatype, raw_bytes),
                }
            } else {
                (datatype, raw_bytes)
            };

            if datatype.is_ascii() && std::str::from_utf8(&raw_bytes).is_err() {
                warnings.push(Warning::InvalidAsciiUtf8 { ifd_offset: offset, tag });
            }
            ifd.insert(TagEntry::new_bytes(tag, datatype, count, raw_bytes));
        }
    }

    let next_ptr = source.read_range(table_offset + entry_count * entry_size, offset_size)?;
    let next = if big_tiff {
        byte_order.read_u64(&next_ptr)
    } else {
        byte_order.read_u32(&next_ptr) as u64
    };
    ifd.next_ifd_offset = if next == 0 { None } else { Some(next) };

    Ok(ifd)
}

/// Decides which tag-set a SubIFD's own entries belong to, based on the
/// pointer tag that led to it.
fn child_tag_set_for(parent: TagSet, descriptor: &registry::TagDescriptor) -> TagSet {
    match (parent, descriptor.id) {
        (TagSet::Tiff, 34665) => TagSet::Exif, // ExifIFD
        (TagSet::Tiff, 34853) => TagSet::Gps,  // GPSIFD
        (TagSet::Exif, 0xa005) => TagSet::Interop,
        // SubIFDs (330) and vendor SubIFD-style tags inherit the parent's
        // tag-set: they describe pages/resolutions of the same image, not
        // a different metadata namespace.
        _ => parent,
    }
}

fn decode_offsets(datatype: Datatype, bytes: &[u8], byte_order: ByteOrder) -> Vec<u64> {
    match datatype {
        Datatype::Ifd8 | Datatype::Long8 => bytes.chunks_exact(8).map(|c| byte_order.read_u64(c)).collect(),
        _ => bytes
            .chunks_exact(4)
            .map(|c| byte_order.read_u32(c) as u64)
            .collect(),
    }
}

/// NDPI's classic-header quirk (spec.md §9): some offset *values* held by
/// `StripOffsets`/`TileOffsets` (and the vendor `McuStarts`/`ReferenceFrame`
/// tags) for files larger than 4 GiB are stored as if the upper bits
/// silently wrapped, producing a value that reads as negative when
/// reinterpreted as a signed 32-bit integer. This is a narrow, reversible
/// heuristic: only armed for classic (non-BigTIFF) files whose total size
/// exceeds 4 GiB, and only applied to the decoded array elements of those
/// specific tags — never to a tag's own out-of-line array location, which
/// is an ordinary 32-bit file offset and not subject to the quirk.
fn looks_like_truncated_offset(offset: u64, file_len: u64) -> bool {
    (offset as i64 as i32) < 0 && file_len > 0xFFFF_FFFF
}

fn repair_ndpi_offset(offset: u64, file_len: u64) -> u64 {
    let high_bits = file_len & !0xFFFF_FFFFu64;
    (offset & 0xFFFF_FFFF) | high_bits
}

/// Whether `tag` is one of the offset tags known to carry NDPI's
/// classic-header wraparound quirk. NDPI stores its vendor tags (65426,
/// 65427) alongside baseline TIFF tags in the same directory rather than
/// under their own `TagSet::Ndpi`-tagged IFD, so this matches on tag ID
/// alone; the registry's `TagSet::Ndpi` descriptors for these tags exist
/// only for symbol lookup/pretty-printing, not to select a different IFD.
fn is_ndpi_offset_tag(tag: u16) -> bool {
    matches!(tag, 273 | 324 | 65426 | 65427) // StripOffsets, TileOffsets, McuStarts, ReferenceFrame
}

/// Repairs a LONG array's decoded elements in place, widening to LONG8
/// (returning the re-encoded bytes) if any element needed repair.
/// Returns `None` if no element looked truncated, leaving the original
/// bytes and datatype untouched.
fn repair_ndpi_array(raw_bytes: &[u8], byte_order: ByteOrder, file_len: u64) -> Option<Vec<u8>> {
    let mut repaired_any = false;
    let mut values = Vec::with_capacity(raw_bytes.len() / 4);
    for chunk in raw_bytes.chunks_exact(4) {
        let value = byte_order.read_u32(chunk) as u64;
        if looks_like_truncated_offset(value, file_len) {
            values.push(repair_ndpi_offset(value, file_len));
            repaired_any = true;
        } else {
            values.push(value);
        }
    }
    if !repaired_any {
        return None;
    }
    let mut out = Vec::with_capacity(values.len() * 8);
    for value in values {
        out.extend_from_slice(&byte_order.write_u64(value));
    }
    Some(out)
}
