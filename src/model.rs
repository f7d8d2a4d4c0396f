//! The in-memory representation every reader produces and every writer and
//! `ops` transform consumes: a tree of IFDs carrying every tag verbatim,
//! whether this implementation recognizes it or not.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{FormatError, RetiffResult, Warning};
use crate::registry::TagSet;
use crate::types::{ByteOrder, Datatype};

/// A source of image-payload bytes an offset tag (`StripOffsets`,
/// `TileOffsets`, ...) may point into. Reading happens lazily and by
/// range, so a multi-gigabyte strip is never pulled into memory except
/// while it is actively being copied from source to destination.
pub trait ByteSource: fmt::Debug + Send + Sync {
    /// Read exactly `len` bytes starting at `offset`. Must error rather
    /// than short-read if the range runs past the end of the source.
    fn read_range(&self, offset: u64, len: u64) -> io::Result<Vec<u8>>;

    /// Total size of the source, in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`ByteSource`] backed by an open file. Cloning the handle under a
/// mutex rather than reopening the path, so the source keeps working for
/// files already unlinked from their directory entry.
pub struct FileSource {
    file: Mutex<File>,
    len: u64,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(FileSource {
            file: Mutex::new(file),
            len,
        })
    }

    pub fn from_file(file: File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(FileSource {
            file: Mutex::new(file),
            len,
        })
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSource").field("len", &self.len).finish()
    }
}

impl ByteSource for FileSource {
    fn read_range(&self, offset: u64, len: u64) -> io::Result<Vec<u8>> {
        let mut file = self.file.lock().expect("file source mutex poisoned");
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn len(&self) -> u64 {
        self.len
    }
}

/// A [`ByteSource`] backed by an in-memory buffer, used for tests and for
/// callers who already hold the whole file in memory.
#[derive(Debug)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        MemorySource { bytes: bytes.into() }
    }
}

impl ByteSource for MemorySource {
    fn read_range(&self, offset: u64, len: u64) -> io::Result<Vec<u8>> {
        let start = offset as usize;
        let end = start
            .checked_add(len as usize)
            .filter(|&e| e <= self.bytes.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "range past end of buffer"))?;
        Ok(self.bytes[start..end].to_vec())
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A typed, decoded view of a tag's payload, produced on demand from the
/// raw bytes an entry carries. Kept separate from [`EntryValue`] because
/// decoding is lossy in ways storage must not be (e.g. an ASCII tag's
/// trailing NUL is dropped when decoded to a [`String`] but must survive
/// byte-for-byte in storage).
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Unsigned(Vec<u64>),
    Signed(Vec<i64>),
    Rational(Vec<(u32, u32)>),
    SRational(Vec<(i32, i32)>),
    Float(Vec<f64>),
    Ascii(String),
}

/// The payload of one directory entry.
#[derive(Debug, Clone)]
pub enum EntryValue {
    /// Raw element bytes, stored in the file's native byte order, exactly
    /// as read (or as about to be written). `len` is always
    /// `count * datatype.element_size()` for non-IFD-pointer datatypes.
    Bytes(Vec<u8>),
    /// A tag whose datatype is `IFD`/`IFD8` (or which is registered as
    /// `is_ifd` despite a LONG/LONG8 datatype, e.g. `ExifIFD`): the
    /// resolved subtree, one [`Ifd`] per pointer in the array.
    SubIfds(Vec<Ifd>),
}

/// One directory entry: tag ID, datatype, element count and payload.
#[derive(Debug, Clone)]
pub struct TagEntry {
    pub tag: u16,
    pub datatype: Datatype,
    pub count: u64,
    pub value: EntryValue,
}

impl TagEntry {
    pub fn new_bytes(tag: u16, datatype: Datatype, count: u64, bytes: Vec<u8>) -> Self {
        TagEntry {
            tag,
            datatype,
            count,
            value: EntryValue::Bytes(bytes),
        }
    }

    pub fn new_subifds(tag: u16, datatype: Datatype, ifds: Vec<Ifd>) -> Self {
        let count = ifds.len() as u64;
        TagEntry {
            tag,
            datatype,
            count,
            value: EntryValue::SubIfds(ifds),
        }
    }

    /// Raw bytes backing this entry, if it is not a resolved SubIFD
    /// pointer. SubIFD pointers re-derive their on-wire bytes from the
    /// children's offsets at write time instead.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            EntryValue::Bytes(b) => Some(b),
            EntryValue::SubIfds(_) => None,
        }
    }

    /// Decode this entry's payload into a typed value, honoring the
    /// declared datatype.
    pub fn decode(&self, byte_order: ByteOrder) -> RetiffResult<DecodedValue> {
        let bytes = self
            .raw_bytes()
            .ok_or(FormatError::NotAPlainValue(self.tag))?;
        decode_bytes(self.datatype, bytes, byte_order)
    }

    pub fn as_u64s(&self, byte_order: ByteOrder) -> RetiffResult<Vec<u64>> {
        match self.decode(byte_order)? {
            DecodedValue::Unsigned(v) => Ok(v),
            DecodedValue::Signed(v) => Ok(v.into_iter().map(|n| n as u64).collect()),
            other => Err(FormatError::DecodedValueMismatch(other).into()),
        }
    }

    pub fn as_string(&self, byte_order: ByteOrder) -> RetiffResult<String> {
        match self.decode(byte_order)? {
            DecodedValue::Ascii(s) => Ok(s),
            other => Err(FormatError::DecodedValueMismatch(other).into()),
        }
    }
}

fn decode_bytes(datatype: Datatype, bytes: &[u8], byte_order: ByteOrder) -> RetiffResult<DecodedValue> {
    if datatype.is_ascii() {
        let trimmed = bytes.split(|&b| b == 0).next().unwrap_or(bytes);
        return Ok(DecodedValue::Ascii(String::from_utf8_lossy(trimmed).into_owned()));
    }

    let size = datatype.element_size() as usize;
    if size == 0 || bytes.len() % size != 0 {
        return Err(FormatError::TruncatedFile.into());
    }
    let chunks = bytes.chunks_exact(size);

    match datatype {
        Datatype::Byte | Datatype::Undefined => {
            Ok(DecodedValue::Unsigned(bytes.iter().map(|&b| b as u64).collect()))
        }
        Datatype::SByte => Ok(DecodedValue::Signed(bytes.iter().map(|&b| b as i8 as i64).collect())),
        Datatype::Short => Ok(DecodedValue::Unsigned(
            chunks.map(|c| byte_order.read_u16(c) as u64).collect(),
        )),
        Datatype::SShort => Ok(DecodedValue::Signed(
            chunks.map(|c| byte_order.read_i16(c) as i64).collect(),
        )),
        Datatype::Long | Datatype::Ifd => Ok(DecodedValue::Unsigned(
            chunks.map(|c| byte_order.read_u32(c) as u64).collect(),
        )),
        Datatype::SLong => Ok(DecodedValue::Signed(
            chunks.map(|c| byte_order.read_i32(c) as i64).collect(),
        )),
        Datatype::Long8 | Datatype::Ifd8 => {
            Ok(DecodedValue::Unsigned(chunks.map(|c| byte_order.read_u64(c)).collect()))
        }
        Datatype::SLong8 => Ok(DecodedValue::Signed(chunks.map(|c| byte_order.read_i64(c)).collect())),
        Datatype::Float => Ok(DecodedValue::Float(
            chunks.map(|c| byte_order.read_f32(c) as f64).collect(),
        )),
        Datatype::Double => Ok(DecodedValue::Float(chunks.map(|c| byte_order.read_f64(c)).collect())),
        Datatype::Rational => Ok(DecodedValue::Rational(
            chunks
                .map(|c| (byte_order.read_u32(&c[..4]), byte_order.read_u32(&c[4..])))
                .collect(),
        )),
        Datatype::SRational => Ok(DecodedValue::SRational(
            chunks
                .map(|c| (byte_order.read_i32(&c[..4]), byte_order.read_i32(&c[4..])))
                .collect(),
        )),
        Datatype::Ascii => unreachable!("handled above"),
    }
}

/// One Image File Directory: an ordered set of entries plus the chain
/// pointer to the next top-level IFD, if any.
///
/// Entries iterate in ascending tag-ID order (a [`BTreeMap`], not a
/// [`std::collections::HashMap`]), matching the on-wire requirement that a
/// well-formed TIFF directory's entries are sorted by tag.
#[derive(Clone)]
pub struct Ifd {
    /// Which tag-set this directory's entries are drawn from. A SubIFD
    /// reached through `ExifIFD` has `tag_set == TagSet::Exif`; everything
    /// else defaults to `TagSet::Tiff`.
    pub tag_set: TagSet,
    pub entries: BTreeMap<u16, TagEntry>,
    /// Byte offset this directory was read from, `None` for directories
    /// built in memory that have never been on disk.
    pub source_offset: Option<u64>,
    /// Offset of the next top-level IFD in the chain, as read from disk.
    /// Always `None` for a SubIFD (SubIFDs do not chain).
    pub next_ifd_offset: Option<u64>,
    /// The file this directory's offset/bytecount payload regions are
    /// streamed from. Carried per-IFD rather than only once on
    /// [`TiffInfo`] so that `concat`, which merges top-level chains from
    /// several distinct input files into one tree, keeps each subtree
    /// reading its image-payload bytes from the file it actually came
    /// from (spec.md §4.4's "concat... all image-data offsets are
    /// reassigned by the writer").
    pub source: Arc<dyn ByteSource>,
}

impl fmt::Debug for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ifd")
            .field("tag_set", &self.tag_set)
            .field("entries", &self.entries)
            .field("source_offset", &self.source_offset)
            .field("next_ifd_offset", &self.next_ifd_offset)
            .finish()
    }
}

impl Ifd {
    pub fn new(tag_set: TagSet, source: Arc<dyn ByteSource>) -> Self {
        Ifd {
            tag_set,
            entries: BTreeMap::new(),
            source_offset: None,
            next_ifd_offset: None,
            source,
        }
    }

    pub fn get(&self, tag: u16) -> Option<&TagEntry> {
        self.entries.get(&tag)
    }

    pub fn get_mut(&mut self, tag: u16) -> Option<&mut TagEntry> {
        self.entries.get_mut(&tag)
    }

    pub fn insert(&mut self, entry: TagEntry) -> Option<TagEntry> {
        self.entries.insert(entry.tag, entry)
    }

    pub fn remove(&mut self, tag: u16) -> Option<TagEntry> {
        self.entries.remove(&tag)
    }

    /// Iterate over every directly nested SubIFD tree reachable from this
    /// directory (`SubIFDs`, `ExifIFD`, `GPSIFD`, `InteropIFD`, or any
    /// other tag resolved as `EntryValue::SubIfds`).
    pub fn child_ifds(&self) -> impl Iterator<Item = &Ifd> {
        self.entries
            .values()
            .filter_map(|entry| match &entry.value {
                EntryValue::SubIfds(ifds) => Some(ifds.iter()),
                EntryValue::Bytes(_) => None,
            })
            .flatten()
    }

    pub fn child_ifds_mut(&mut self) -> impl Iterator<Item = &mut Ifd> {
        self.entries
            .values_mut()
            .filter_map(|entry| match &mut entry.value {
                EntryValue::SubIfds(ifds) => Some(ifds.iter_mut()),
                EntryValue::Bytes(_) => None,
            })
            .flatten()
    }
}

/// The fully parsed contents of one TIFF or BigTIFF stream: the header
/// fields plus the top-level IFD chain, every SubIFD resolved inline, and
/// any non-fatal warnings accumulated while reading.
pub struct TiffInfo {
    pub byte_order: ByteOrder,
    pub big_tiff: bool,
    /// The on-wire version word (42 for classic, 43 for BigTIFF).
    pub version: u16,
    /// Top-level IFDs, in chain order.
    pub ifds: Vec<Ifd>,
    pub warnings: Vec<Warning>,
    /// Backing store for any strip/tile offset tags' payload bytes.
    pub source: Arc<dyn ByteSource>,
}

impl fmt::Debug for TiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiffInfo")
            .field("byte_order", &self.byte_order)
            .field("big_tiff", &self.big_tiff)
            .field("version", &self.version)
            .field("ifds", &self.ifds.len())
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl TiffInfo {
    /// Recursively visit every IFD in the file: top-level chain followed
    /// depth-first into each one's SubIFD subtree.
    pub fn walk(&self) -> impl Iterator<Item = &Ifd> {
        fn recurse<'a>(ifd: &'a Ifd, out: &mut Vec<&'a Ifd>) {
            out.push(ifd);
            for child in ifd.child_ifds() {
                recurse(child, out);
            }
        }
        let mut out = Vec::new();
        for ifd in &self.ifds {
            recurse(ifd, &mut out);
        }
        out.into_iter()
    }

    pub fn ifd_count(&self) -> usize {
        self.walk().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_reads_exact_range() {
        let source = MemorySource::new(vec![1u8, 2, 3, 4, 5]);
        assert_eq!(source.read_range(1, 3).unwrap(), vec![2, 3, 4]);
        assert!(source.read_range(3, 10).is_err());
    }

    #[test]
    fn decodes_short_array_respecting_byte_order() {
        let entry = TagEntry::new_bytes(256, Datatype::Short, 2, vec![0x01, 0x00, 0x00, 0x02]);
        match entry.decode(ByteOrder::LittleEndian).unwrap() {
            DecodedValue::Unsigned(v) => assert_eq!(v, vec![1, 512]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decodes_ascii_dropping_trailing_nul() {
        let entry = TagEntry::new_bytes(271, Datatype::Ascii, 5, b"Acme\0".to_vec());
        assert_eq!(entry.as_string(ByteOrder::LittleEndian).unwrap(), "Acme");
    }

    #[test]
    fn child_ifds_walks_subifd_tree() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(Vec::<u8>::new()));
        let mut root = Ifd::new(TagSet::Tiff, source.clone());
        let child = Ifd::new(TagSet::Exif, source);
        root.insert(TagEntry::new_subifds(0x8769, Datatype::Long, vec![child]));
        assert_eq!(root.child_ifds().count(), 1);
    }
}
