//! Lays out and emits a [`crate::model::TiffInfo`] as a classic TIFF or
//! BigTIFF stream.
//!
//! Writing is two passes: [`plan_file`] computes every offset in the
//! output before a single byte is written, then [`emit_file`] streams the
//! planned bytes out in strictly increasing file-position order. Unlike
//! the seek-back-and-patch style of directory encoding, nothing is ever
//! rewritten once emitted — there is no path by which a reader of partial
//! output could see a dangling offset pointing past the bytes written so
//! far.

use std::collections::BTreeMap;
use std::io::{self, Write};

use log::debug;

use crate::error::{FormatError, RetiffError, RetiffResult};
use crate::model::{ByteSource, EntryValue, Ifd, TagEntry, TiffInfo};
use crate::registry::{self, TagDescriptor};
use crate::types::{ByteOrder, Datatype};

/// Controls forced BigTIFF layout and the two supported top-level emission
/// orders (spec.md §4.3's Open Question on emission order).
#[derive(Debug, Clone, Copy, Default)]
pub struct WriterOptions {
    /// Force BigTIFF layout even when classic would fit.
    pub force_big_tiff: bool,
    /// Force classic layout; writing fails with [`RetiffError::BigTiffRequired`]
    /// if the data does not fit.
    pub force_classic: bool,
    /// Emit every top-level IFD's directory before any of their payloads,
    /// instead of the default depth-first "directory, then payloads and
    /// children, then next IFD" order.
    pub ifds_first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Classic,
    Big,
}

impl Kind {
    fn version(self) -> u16 {
        match self {
            Kind::Classic => 42,
            Kind::Big => 43,
        }
    }

    fn offset_size(self) -> u64 {
        match self {
            Kind::Classic => 4,
            Kind::Big => 8,
        }
    }

    fn entry_count_size(self) -> u64 {
        match self {
            Kind::Classic => 2,
            Kind::Big => 8,
        }
    }

    fn entry_size(self) -> u64 {
        4 + 2 * self.offset_size()
    }

    fn inline_capacity(self) -> u64 {
        self.offset_size()
    }

    fn header_size(self) -> u64 {
        match self {
            Kind::Classic => 8,
            Kind::Big => 16,
        }
    }

    /// Widen or narrow an offset-family datatype to match this layout kind.
    /// Non-offset datatypes pass through unchanged.
    fn effective_datatype(self, datatype: Datatype) -> Datatype {
        match (self, datatype) {
            (Kind::Big, Datatype::Long) => Datatype::Long8,
            (Kind::Big, Datatype::Ifd) => Datatype::Ifd8,
            (Kind::Classic, Datatype::Long8) => Datatype::Long,
            (Kind::Classic, Datatype::Ifd8) => Datatype::Ifd,
            (_, other) => other,
        }
    }

    fn write_offset(self, byte_order: ByteOrder, value: u64) -> Vec<u8> {
        match self {
            Kind::Classic => {
                debug_assert!(value <= u32::MAX as u64, "classic offset overflowed u32; decide_kind should have promoted to BigTIFF");
                byte_order.write_u32(value as u32).to_vec()
            }
            Kind::Big => byte_order.write_u64(value).to_vec(),
        }
    }
}

/// Safety margin subtracted from `u32::MAX` when judging whether a
/// projected classic layout fits: the boundary itself is still a valid
/// 32-bit offset, but leaving no headroom makes every alignment-padding
/// byte a potential tip into BigTIFF territory after the decision was
/// already made.
const CLASSIC_SAFE_MARGIN: u64 = 4096;

/// Decide whether `info` can be written as classic TIFF or needs BigTIFF,
/// honoring any caller override in `options`.
fn decide_kind(info: &TiffInfo, options: &WriterOptions) -> RetiffResult<Kind> {
    if options.force_big_tiff {
        return Ok(Kind::Big);
    }

    let needs_big = info.big_tiff || requires_big_tiff(info)?;

    if options.force_classic {
        if needs_big {
            return Err(RetiffError::BigTiffRequired);
        }
        return Ok(Kind::Classic);
    }

    Ok(if needs_big { Kind::Big } else { Kind::Classic })
}

/// Check for whether classic (32-bit-offset) layout can hold `info`: any
/// single offset-sized array element, entry count, or declared byte
/// length that does not fit a `u32` forces BigTIFF, as does a source file
/// already larger than 4 GiB. Beyond those per-entry checks, the only way
/// to know the *projected* classic file size is to actually run the
/// planner in `Kind::Classic` and see where the cursor ends up, since
/// relocated strip/tile payloads (copied verbatim, often the bulk of the
/// file) are summed there and nowhere else (spec.md §4.3's trigger (iii)).
fn requires_big_tiff(info: &TiffInfo) -> RetiffResult<bool> {
    if info.source.len() > u32::MAX as u64 {
        return Ok(true);
    }
    for ifd in info.walk() {
        if ifd.entries.len() > u16::MAX as usize {
            return Ok(true);
        }
        for entry in ifd.entries.values() {
            if entry.count > u32::MAX as u64 {
                return Ok(true);
            }
            if let EntryValue::Bytes(bytes) = &entry.value {
                if bytes.len() as u64 > u32::MAX as u64 {
                    return Ok(true);
                }
            }
            if matches!(entry.datatype, Datatype::Long8 | Datatype::SLong8 | Datatype::Ifd8) {
                return Ok(true);
            }
        }
    }

    let mut cursor = Kind::Classic.header_size();
    for ifd in &info.ifds {
        plan_ifd(ifd, Kind::Classic, info.byte_order, &mut cursor)?;
    }
    Ok(cursor > u32::MAX as u64 - CLASSIC_SAFE_MARGIN)
}

/// How one entry's payload is positioned in the output.
#[derive(Debug, Clone)]
enum PayloadLayout {
    /// Fits inline in the directory entry's value field.
    Inline,
    /// Stored out-of-line at this offset.
    OutOfLine(u64),
}

/// A relocated offset/bytecount pair element: the new position and length
/// of one strip or tile's payload bytes, copied verbatim from the source.
#[derive(Debug, Clone, Copy)]
struct RelocatedRegion {
    old_offset: u64,
    new_offset: u64,
    len: u64,
}

#[derive(Debug, Clone)]
struct EntryLayout {
    payload: PayloadLayout,
    /// Present only for entries whose tag is a registered offset tag with
    /// a paired bytecount tag: the image-payload regions each element
    /// used to point at, relocated to their new output position.
    relocations: Option<Vec<RelocatedRegion>>,
    /// Present only for `EntryValue::SubIfds` entries.
    children: Option<Vec<IfdLayout>>,
}

#[derive(Debug, Clone)]
struct IfdLayout {
    directory_offset: u64,
    entries: BTreeMap<u16, EntryLayout>,
}

fn align_up(cursor: u64) -> u64 {
    cursor + (cursor % 2)
}

fn plan_ifd(ifd: &Ifd, kind: Kind, byte_order: ByteOrder, cursor: &mut u64) -> RetiffResult<IfdLayout> {
    *cursor = align_up(*cursor);
    let directory_offset = *cursor;
    *cursor += kind.entry_count_size() + ifd.entries.len() as u64 * kind.entry_size() + kind.offset_size();

    // Pass 1: every entry's own payload (relocated strip/tile bytes, plain
    // out-of-line values, and a SubIFDs entry's own pointer array), in tag
    // order. Pass 2 below places every child IFD afterwards. This mirrors
    // emit_ifd's two separate loops exactly; interleaving children into
    // this pass would place them before later tags' payloads here but
    // after them there, and the emitter would then try to write a later
    // tag's payload behind a position it already passed.
    let mut entries = BTreeMap::new();
    for (&tag, entry) in &ifd.entries {
        let descriptor = registry::lookup_by_id(ifd.tag_set, tag);
        let layout = match &entry.value {
            EntryValue::Bytes(_) => plan_bytes_entry(ifd, entry, descriptor, kind, byte_order, cursor)?,
            EntryValue::SubIfds(children) => {
                let array_len = children.len() as u64 * kind.effective_datatype(entry.datatype).element_size();
                let payload = if array_len <= kind.inline_capacity() {
                    PayloadLayout::Inline
                } else {
                    *cursor = align_up(*cursor);
                    let offset = *cursor;
                    *cursor += array_len;
                    PayloadLayout::OutOfLine(offset)
                };
                EntryLayout {
                    payload,
                    relocations: None,
                    children: None,
                }
            }
        };
        entries.insert(tag, layout);
    }

    // Pass 2: child IFDs, in tag order, after every sibling entry's own
    // payload has been placed.
    for (&tag, entry) in &ifd.entries {
        if let EntryValue::SubIfds(children) = &entry.value {
            let mut child_layouts = Vec::with_capacity(children.len());
            for child in children {
                child_layouts.push(plan_ifd(child, kind, byte_order, cursor)?);
            }
            entries.get_mut(&tag).expect("inserted in pass 1").children = Some(child_layouts);
        }
    }

    Ok(IfdLayout {
        directory_offset,
        entries,
    })
}

fn plan_bytes_entry(
    ifd: &Ifd,
    entry: &TagEntry,
    descriptor: Option<&'static TagDescriptor>,
    kind: Kind,
    byte_order: ByteOrder,
    cursor: &mut u64,
) -> RetiffResult<EntryLayout> {
    let effective_dt = kind.effective_datatype(entry.datatype);

    if let Some(bytecount_tag) = descriptor.and_then(|d| d.bytecounts) {
        let offsets = entry.as_u64s(byte_order)?;
        let bytecounts_entry = ifd
            .get(bytecount_tag)
            .ok_or(FormatError::MissingPairedBytecount {
                offset_tag: entry.tag,
                bytecount_tag,
            })?;
        let lens = bytecounts_entry.as_u64s(byte_order)?;
        if offsets.len() != lens.len() {
            return Err(FormatError::InconsistentBytecountPair {
                offset_tag: entry.tag,
                bytecount_tag,
            }
            .into());
        }

        let mut relocations = Vec::with_capacity(offsets.len());
        for (old_offset, len) in offsets.into_iter().zip(lens) {
            *cursor = align_up(*cursor);
            let new_offset = *cursor;
            *cursor += len;
            relocations.push(RelocatedRegion {
                old_offset,
                new_offset,
                len,
            });
        }

        let array_len = relocations.len() as u64 * effective_dt.element_size();
        let payload = if array_len <= kind.inline_capacity() {
            PayloadLayout::Inline
        } else {
            *cursor = align_up(*cursor);
            let offset = *cursor;
            *cursor += array_len;
            PayloadLayout::OutOfLine(offset)
        };

        return Ok(EntryLayout {
            payload,
            relocations: Some(relocations),
            children: None,
        });
    }

    let payload_len = match &entry.value {
        EntryValue::Bytes(bytes) => {
            if effective_dt.element_size() == entry.datatype.element_size() {
                bytes.len() as u64
            } else {
                entry.count * effective_dt.element_size()
            }
        }
        EntryValue::SubIfds(_) => unreachable!("handled by caller"),
    };

    let payload = if payload_len <= kind.inline_capacity() {
        PayloadLayout::Inline
    } else {
        *cursor = align_up(*cursor);
        let offset = *cursor;
        *cursor += payload_len;
        PayloadLayout::OutOfLine(offset)
    };

    Ok(EntryLayout {
        payload,
        relocations: None,
        children: None,
    })
}

/// Plan the full output layout for `info`.
struct Plan {
    kind: Kind,
    top_level: Vec<IfdLayout>,
}

fn plan_file(info: &TiffInfo, options: &WriterOptions) -> RetiffResult<Plan> {
    let kind = decide_kind(info, options)?;
    debug!("writer: selected {kind:?} layout");
    let mut cursor = kind.header_size();
    let mut top_level = Vec::with_capacity(info.ifds.len());
    for ifd in &info.ifds {
        top_level.push(plan_ifd(ifd, kind, info.byte_order, &mut cursor)?);
    }
    Ok(Plan { kind, top_level })
}

/// Write `info` out through `writer` in classic or BigTIFF form.
pub fn write_tiff<W: Write>(
    info: &TiffInfo,
    writer: &mut W,
    options: &WriterOptions,
) -> RetiffResult<()> {
    if options.ifds_first {
        return Err(crate::error::UsageError::ConflictingDirectives(
            "ifds_first layout is not yet implemented; only the default depth-first order is supported".into(),
        )
        .into());
    }
    let plan = plan_file(info, options)?;
    let mut pos = 0u64;
    emit_header(writer, info.byte_order, plan.kind, &plan, &mut pos)?;

    for (i, (ifd, layout)) in info.ifds.iter().zip(plan.top_level.iter()).enumerate() {
        let next_offset = plan.top_level.get(i + 1).map(|l| l.directory_offset).unwrap_or(0);
        emit_ifd(writer, info.byte_order, ifd, layout, plan.kind, next_offset, &mut pos)?;
    }

    Ok(())
}

fn pad_to<W: Write>(writer: &mut W, pos: &mut u64, target: u64) -> io::Result<()> {
    if target < *pos {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "writer layout moved backwards; this is a planner bug",
        ));
    }
    let pad = (target - *pos) as usize;
    if pad > 0 {
        writer.write_all(&vec![0u8; pad])?;
        *pos += pad as u64;
    }
    Ok(())
}

fn emit_header<W: Write>(
    writer: &mut W,
    byte_order: ByteOrder,
    kind: Kind,
    plan: &Plan,
    pos: &mut u64,
) -> RetiffResult<()> {
    let magic: &[u8; 2] = match byte_order {
        ByteOrder::LittleEndian => b"II",
        ByteOrder::BigEndian => b"MM",
    };
    writer.write_all(magic)?;
    writer.write_all(&byte_order.write_u16(kind.version()))?;

    let first_ifd_offset = plan.top_level.first().map(|l| l.directory_offset).unwrap_or(0);
    match kind {
        Kind::Classic => {
            writer.write_all(&byte_order.write_u32(first_ifd_offset as u32))?;
        }
        Kind::Big => {
            writer.write_all(&byte_order.write_u16(8))?;
            writer.write_all(&byte_order.write_u16(0))?;
            writer.write_all(&byte_order.write_u64(first_ifd_offset))?;
        }
    }
    *pos = kind.header_size();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn emit_ifd<W: Write>(
    writer: &mut W,
    byte_order: ByteOrder,
    ifd: &Ifd,
    layout: &IfdLayout,
    kind: Kind,
    next_ifd_offset: u64,
    pos: &mut u64,
) -> RetiffResult<()> {
    pad_to(writer, pos, layout.directory_offset)?;

    match kind {
        Kind::Classic => writer.write_all(&byte_order.write_u16(ifd.entries.len() as u16))?,
        Kind::Big => writer.write_all(&byte_order.write_u64(ifd.entries.len() as u64))?,
    }
    *pos += kind.entry_count_size();

    for (&tag, entry) in &ifd.entries {
        let entry_layout = &layout.entries[&tag];
        write_directory_entry(writer, byte_order, kind, tag, entry, entry_layout, pos)?;
    }

    writer.write_all(&kind.write_offset(byte_order, next_ifd_offset))?;
    *pos += kind.offset_size();

    for (&tag, entry) in &ifd.entries {
        let entry_layout = &layout.entries[&tag];
        emit_entry_payload(writer, byte_order, ifd.source.as_ref(), entry, entry_layout, kind, pos)?;
    }

    for (&tag, entry) in &ifd.entries {
        let _ = tag;
        let entry_layout = &layout.entries[&tag];
        if let (EntryValue::SubIfds(children), Some(child_layouts)) = (&entry.value, &entry_layout.children) {
            for (i, (child, child_layout)) in children.iter().zip(child_layouts.iter()).enumerate() {
                let child_next = child_layouts.get(i + 1).map(|l| l.directory_offset).unwrap_or(0);
                emit_ifd(writer, byte_order, child, child_layout, kind, child_next, pos)?;
            }
        }
    }

    Ok(())
}

fn write_directory_entry<W: Write>(
    writer: &mut W,
    byte_order: ByteOrder,
    kind: Kind,
    tag: u16,
    entry: &TagEntry,
    layout: &EntryLayout,
    pos: &mut u64,
) -> RetiffResult<()> {
    let effective_dt = kind.effective_datatype(entry.datatype);
    writer.write_all(&byte_order.write_u16(tag))?;
    writer.write_all(&byte_order.write_u16(effective_dt.code()))?;

    let count = if let Some(relocations) = &layout.relocations {
        relocations.len() as u64
    } else {
        entry.count
    };
    match kind {
        Kind::Classic => writer.write_all(&byte_order.write_u32(count as u32))?,
        Kind::Big => writer.write_all(&byte_order.write_u64(count))?,
    }

    let value_field_len = kind.offset_size() as usize;
    let mut value_field = vec![0u8; value_field_len];

    match &layout.payload {
        PayloadLayout::Inline => {
            let inline_bytes = inline_value_bytes(entry, layout, effective_dt, byte_order)?;
            value_field[..inline_bytes.len()].copy_from_slice(&inline_bytes);
        }
        PayloadLayout::OutOfLine(offset) => {
            value_field.copy_from_slice(&kind.write_offset(byte_order, *offset));
        }
    }
    writer.write_all(&value_field)?;

    *pos += kind.entry_size();
    Ok(())
}

/// Build the bytes for a value small enough to live in the directory
/// entry's value field instead of being stored out-of-line.
fn inline_value_bytes(
    entry: &TagEntry,
    layout: &EntryLayout,
    effective_dt: Datatype,
    byte_order: ByteOrder,
) -> RetiffResult<Vec<u8>> {
    if let Some(relocations) = &layout.relocations {
        let mut out = Vec::with_capacity(relocations.len() * effective_dt.element_size() as usize);
        for region in relocations {
            out.extend_from_slice(&write_offset_element(effective_dt, byte_order, region.new_offset));
        }
        return Ok(out);
    }

    match &entry.value {
        EntryValue::Bytes(bytes) => {
            if effective_dt.element_size() == entry.datatype.element_size() {
                Ok(bytes.clone())
            } else {
                // Datatype was widened/narrowed (LONG <-> LONG8) with no
                // payload relocation involved (e.g. a bare offset tag with
                // no registered bytecount pairing): re-encode each element.
                let decoded = entry.as_u64s(byte_order)?;
                let mut out = Vec::with_capacity(decoded.len() * effective_dt.element_size() as usize);
                for value in decoded {
                    out.extend_from_slice(&write_offset_element(effective_dt, byte_order, value));
                }
                Ok(out)
            }
        }
        EntryValue::SubIfds(_) => {
            let child_layouts = layout
                .children
                .as_ref()
                .ok_or(FormatError::NotAPlainValue(entry.tag))?;
            let mut out = Vec::with_capacity(child_layouts.len() * effective_dt.element_size() as usize);
            for child in child_layouts {
                out.extend_from_slice(&write_offset_element(effective_dt, byte_order, child.directory_offset));
            }
            Ok(out)
        }
    }
}

fn write_offset_element(datatype: Datatype, byte_order: ByteOrder, value: u64) -> Vec<u8> {
    match datatype {
        Datatype::Long8 | Datatype::Ifd8 => byte_order.write_u64(value).to_vec(),
        _ => byte_order.write_u32(value as u32).to_vec(),
    }
}

/// Largest single chunk copied from source to destination while streaming
/// a relocated strip/tile payload. Keeps memory use bounded regardless of
/// how large any individual strip is.
const STREAM_CHUNK_SIZE: u64 = 1 << 20;

#[allow(clippy::too_many_arguments)]
fn emit_entry_payload<W: Write>(
    writer: &mut W,
    byte_order: ByteOrder,
    source: &dyn ByteSource,
    entry: &TagEntry,
    layout: &EntryLayout,
    kind: Kind,
    pos: &mut u64,
) -> RetiffResult<()> {
    if let Some(relocations) = &layout.relocations {
        for region in relocations {
            pad_to(writer, pos, region.new_offset)?;
            stream_copy(writer, source, region.old_offset, region.len)?;
            *pos += region.len;
        }
    }

    let PayloadLayout::OutOfLine(offset) = layout.payload else {
        return Ok(());
    };
    pad_to(writer, pos, offset)?;

    if let Some(relocations) = &layout.relocations {
        let effective_dt = kind.effective_datatype(entry.datatype);
        for region in relocations {
            writer.write_all(&write_offset_element(effective_dt, byte_order, region.new_offset))?;
        }
        *pos += relocations.len() as u64 * effective_dt.element_size();
        return Ok(());
    }

    match &entry.value {
        EntryValue::Bytes(bytes) => {
            let effective_dt = kind.effective_datatype(entry.datatype);
            if effective_dt.element_size() == entry.datatype.element_size() {
                writer.write_all(bytes)?;
                *pos += bytes.len() as u64;
            } else {
                let decoded = entry.as_u64s(byte_order)?;
                for value in decoded {
                    writer.write_all(&write_offset_element(effective_dt, byte_order, value))?;
                    *pos += effective_dt.element_size();
                }
            }
        }
        EntryValue::SubIfds(_) => {
            let effective_dt = kind.effective_datatype(entry.datatype);
            let child_layouts = layout
                .children
                .as_ref()
                .ok_or(FormatError::NotAPlainValue(entry.tag))?;
            for child in child_layouts {
                writer.write_all(&write_offset_element(effective_dt, byte_order, child.directory_offset))?;
                *pos += effective_dt.element_size();
            }
        }
    }
    Ok(())
}

/// Copy `len` bytes starting at `old_offset` in `source` to `writer`, in
/// bounded chunks, so relocating a strip or tile never requires holding
/// the whole region in memory at once. The bytes are copied verbatim;
/// this is the one place pixel sample data crosses from input to output,
/// and it is never decoded, interpreted, or re-encoded.
fn stream_copy<W: Write>(writer: &mut W, source: &dyn ByteSource, old_offset: u64, len: u64) -> RetiffResult<()> {
    let mut remaining = len;
    let mut cursor = old_offset;
    while remaining > 0 {
        let chunk_len = remaining.min(STREAM_CHUNK_SIZE);
        let chunk = source.read_range(cursor, chunk_len)?;
        writer.write_all(&chunk)?;
        cursor += chunk_len;
        remaining -= chunk_len;
    }
    Ok(())
}
