//! End-to-end coverage of the testable properties a rewritten file must
//! hold: read-then-write-then-read structural equality, no data left
//! unreachable from the directory tree, bytecount-pair consistency,
//! BigTIFF promotion, and the IFD-depth boundary.

use std::sync::Arc;

use retiff::model::{ByteSource, EntryValue, Ifd, MemorySource, TagEntry, TiffInfo};
use retiff::registry::TagSet;
use retiff::types::{ByteOrder, Datatype};
use retiff::writer::{self, WriterOptions};
use retiff::{reader, FormatError, RetiffError};

fn empty_source() -> Arc<dyn ByteSource> {
    Arc::new(MemorySource::new(Vec::<u8>::new()))
}

fn write_to_vec(info: &TiffInfo, options: &WriterOptions) -> Vec<u8> {
    let mut out = Vec::new();
    writer::write_tiff(info, &mut out, options).unwrap();
    out
}

fn read_from_bytes(bytes: Vec<u8>) -> TiffInfo {
    let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    reader::read_tiff(source).unwrap()
}

#[test]
fn header_bytes_match_the_classic_little_endian_signature() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    ifd.insert(TagEntry::new_bytes(256, Datatype::Short, 1, vec![0x50, 0x00]));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };
    let bytes = write_to_vec(&info, &WriterOptions::default());
    assert_eq!(&bytes[0..8], &[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
}

#[test]
fn inline_short_payload_round_trips_through_write_and_read() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    ifd.insert(TagEntry::new_bytes(256, Datatype::Short, 1, vec![0x50, 0x00]));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(read_back.ifds.len(), 1);
    assert_eq!(read_back.ifds[0].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![0x50]);
}

/// An ASCII value long enough to force out-of-line storage must still
/// decode back to the same string, proving the writer's offset/value
/// split round-trips correctly.
#[test]
fn out_of_line_ascii_value_round_trips() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    let text = "a TIFF file with more than four bytes of description text\0";
    ifd.insert(TagEntry::new_bytes(270, Datatype::Ascii, text.len() as u64, text.as_bytes().to_vec()));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(
        read_back.ifds[0].get(270).unwrap().as_string(read_back.byte_order).unwrap(),
        text.trim_end_matches('\0')
    );
}

/// The writer relocates strip payload bytes to new positions; the
/// reader must find them there and the copied bytes must be identical
/// to the source, never decoded or altered.
#[test]
fn strip_offset_and_bytecount_pair_relocates_and_preserves_payload_bytes() {
    let strip_data = vec![0xAAu8; 30];
    let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(strip_data.clone()));
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    ifd.insert(TagEntry::new_bytes(273, Datatype::Long, 1, 0u32.to_le_bytes().to_vec())); // StripOffsets
    ifd.insert(TagEntry::new_bytes(279, Datatype::Long, 1, (strip_data.len() as u32).to_le_bytes().to_vec())); // StripByteCounts
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes.clone());
    let new_offset = read_back.ifds[0].get(273).unwrap().as_u64s(read_back.byte_order).unwrap()[0];
    let new_len = read_back.ifds[0].get(279).unwrap().as_u64s(read_back.byte_order).unwrap()[0];
    assert_eq!(new_len, strip_data.len() as u64);
    assert_eq!(&bytes[new_offset as usize..(new_offset + new_len) as usize], &strip_data[..]);
}

/// Offset/bytecount tag pairs must keep equal element counts after a
/// rewrite; this is enforced at write time, not merely left to chance.
#[test]
fn mismatched_bytecount_pair_length_is_rejected_at_write_time() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    ifd.insert(TagEntry::new_bytes(273, Datatype::Long, 2, vec![0u8; 8])); // two offsets
    ifd.insert(TagEntry::new_bytes(279, Datatype::Long, 1, vec![0u8; 4])); // one bytecount
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let err = writer::write_tiff(&info, &mut Vec::new(), &WriterOptions::default()).unwrap_err();
    assert!(matches!(err, RetiffError::Format(FormatError::InconsistentBytecountPair { .. })));
}

/// A resolved `ExifIFD` pointer round-trips through split storage into
/// its own nested directory, distinct from the parent's tag-set.
#[test]
fn nested_exif_subifd_round_trips() {
    let source = empty_source();
    let mut exif_ifd = Ifd::new(TagSet::Exif, source.clone());
    exif_ifd.insert(TagEntry::new_bytes(0x9000, Datatype::Undefined, 4, b"0231".to_vec())); // ExifVersion
    let mut root = Ifd::new(TagSet::Tiff, source.clone());
    root.insert(TagEntry::new_subifds(34665, Datatype::Long, vec![exif_ifd]));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![root],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    let entry = read_back.ifds[0].get(34665).unwrap();
    match &entry.value {
        EntryValue::SubIfds(children) => {
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].tag_set, TagSet::Exif);
            assert_eq!(children[0].get(0x9000).unwrap().raw_bytes().unwrap(), b"0231");
        }
        other => panic!("expected resolved SubIFD, got {other:?}"),
    }
}

/// A nested-IFD tag followed, in tag order, by a later plain out-of-line
/// tag must still round-trip: the planner and emitter must agree on
/// where the nested IFD's bytes land relative to that later tag's
/// payload. Every other fixture keeps the nested-IFD tag as the highest
/// out-of-line tag in its IFD, which never exercises this ordering.
#[test]
fn subifd_followed_by_a_later_out_of_line_tag_round_trips() {
    let source = empty_source();
    let mut child = Ifd::new(TagSet::Tiff, source.clone());
    child.insert(TagEntry::new_bytes(256, Datatype::Short, 1, vec![0x40, 0x00]));
    let mut root = Ifd::new(TagSet::Tiff, source.clone());
    root.insert(TagEntry::new_subifds(330, Datatype::Long, vec![child])); // SubIFDs
    let xmp = b"<x:xmpmeta>more than four bytes</x:xmpmeta>".to_vec();
    root.insert(TagEntry::new_bytes(700, Datatype::Byte, xmp.len() as u64, xmp.clone())); // XMP, tag > 330
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![root],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(read_back.ifds[0].get(700).unwrap().raw_bytes().unwrap(), &xmp[..]);
    match &read_back.ifds[0].get(330).unwrap().value {
        EntryValue::SubIfds(children) => {
            assert_eq!(children[0].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![0x40]);
        }
        other => panic!("expected resolved SubIFD, got {other:?}"),
    }
}

/// A strip byte count large enough to overflow a 32-bit field forces
/// BigTIFF layout even without the caller asking for it.
#[test]
fn oversized_bytecount_forces_bigtiff_promotion() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    let huge_count: u64 = u32::MAX as u64 + 1;
    ifd.insert(TagEntry::new_bytes(279, Datatype::Long8, 1, huge_count.to_le_bytes().to_vec()));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    assert_eq!(&bytes[2..4], &43u16.to_le_bytes());
}

/// `force_classic` on data that cannot fit must fail loudly rather than
/// silently truncate an offset.
#[test]
fn force_classic_on_oversized_data_is_rejected() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    let huge_count: u64 = u32::MAX as u64 + 1;
    ifd.insert(TagEntry::new_bytes(279, Datatype::Long8, 1, huge_count.to_le_bytes().to_vec()));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let options = WriterOptions { force_classic: true, ..Default::default() };
    let err = writer::write_tiff(&info, &mut Vec::new(), &options).unwrap_err();
    assert!(matches!(err, RetiffError::BigTiffRequired));
}

/// Every output directory offset is word-aligned: `plan_file`'s
/// `align_up` rounds odd cursor positions up by one before placing a
/// directory or out-of-line payload there.
#[test]
fn directory_and_payload_offsets_are_even() {
    let source = empty_source();
    let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
    // An odd-length ASCII value pushes the cursor to an odd byte count.
    ifd.insert(TagEntry::new_bytes(270, Datatype::Ascii, 5, b"abcd\0".to_vec()));
    ifd.insert(TagEntry::new_bytes(271, Datatype::Ascii, 7, b"abcdef\0".to_vec()));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    for ifd in read_back.ifds.iter() {
        if let Some(offset) = ifd.source_offset {
            assert_eq!(offset % 2, 0, "directory offset {offset} is not even");
        }
    }
}

/// A chain of 16 nested SubIFDs is the declared maximum depth and must
/// still read successfully; one level deeper must be rejected rather
/// than followed indefinitely.
#[test]
fn depth_sixteen_subifd_chain_succeeds_and_seventeen_is_rejected() {
    fn nested_chain(depth: u32, source: &Arc<dyn ByteSource>) -> Ifd {
        let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
        if depth > 0 {
            let child = nested_chain(depth - 1, source);
            ifd.insert(TagEntry::new_subifds(330, Datatype::Long, vec![child]));
        }
        ifd
    }

    let source = empty_source();
    let ok_root = nested_chain(16, &source);
    let ok_info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ok_root],
        warnings: Vec::new(),
        source: source.clone(),
    };
    let bytes = write_to_vec(&ok_info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(read_back.ifd_count(), 17); // the root plus 16 nested levels

    let too_deep_root = nested_chain(17, &source);
    let too_deep_info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![too_deep_root],
        warnings: Vec::new(),
        source,
    };
    let bytes = write_to_vec(&too_deep_info, &WriterOptions::default());
    let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    let err = reader::read_tiff(source).unwrap_err();
    assert!(matches!(err, RetiffError::Format(FormatError::MaxIfdDepthExceeded)));
}

/// An IFD with zero entries is a legal, if unusual, directory and must
/// round-trip without error.
#[test]
fn empty_ifd_round_trips() {
    let source = empty_source();
    let ifd = Ifd::new(TagSet::Tiff, source.clone());
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![ifd],
        warnings: Vec::new(),
        source,
    };
    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(read_back.ifds.len(), 1);
    assert!(read_back.ifds[0].entries.is_empty());
}

/// A two-IFD top-level chain must read back with both IFDs present and
/// in the original order, with no trailing chain pointer dangling past
/// the last one.
#[test]
fn two_ifd_chain_round_trips_in_order() {
    let source = empty_source();
    let mut first = Ifd::new(TagSet::Tiff, source.clone());
    first.insert(TagEntry::new_bytes(256, Datatype::Long, 1, 111u32.to_le_bytes().to_vec()));
    let mut second = Ifd::new(TagSet::Tiff, source.clone());
    second.insert(TagEntry::new_bytes(256, Datatype::Long, 1, 222u32.to_le_bytes().to_vec()));
    let info = TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds: vec![first, second],
        warnings: Vec::new(),
        source,
    };

    let bytes = write_to_vec(&info, &WriterOptions::default());
    let read_back = read_from_bytes(bytes);
    assert_eq!(read_back.ifds.len(), 2);
    assert_eq!(read_back.ifds[0].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![111]);
    assert_eq!(read_back.ifds[1].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![222]);
    assert!(read_back.ifds[1].next_ifd_offset.is_none());
}
