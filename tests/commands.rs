//! End-to-end coverage of the four command operations (`dump`, `split`,
//! `concat`, `set`) chained through real writes and reads, matching the
//! worked scenarios a user actually runs them for.

use std::sync::Arc;

use retiff::model::{ByteSource, EntryValue, Ifd, MemorySource, TagEntry, TiffInfo};
use retiff::ops::{self, Directive, DumpFormat};
use retiff::registry::TagSet;
use retiff::types::{ByteOrder, Datatype};
use retiff::writer::WriterOptions;

fn source() -> Arc<dyn ByteSource> {
    Arc::new(MemorySource::new(Vec::<u8>::new()))
}

fn image_ifd(src: &Arc<dyn ByteSource>, width: u32, description: &str) -> Ifd {
    let mut ifd = Ifd::new(TagSet::Tiff, Arc::clone(src));
    ifd.insert(TagEntry::new_bytes(256, Datatype::Long, 1, width.to_le_bytes().to_vec()));
    let mut desc = description.as_bytes().to_vec();
    desc.push(0);
    ifd.insert(TagEntry::new_bytes(270, Datatype::Ascii, desc.len() as u64, desc));
    ifd
}

fn info_with(ifds: Vec<Ifd>, src: Arc<dyn ByteSource>) -> TiffInfo {
    TiffInfo {
        byte_order: ByteOrder::LittleEndian,
        big_tiff: false,
        version: 42,
        ifds,
        warnings: Vec::new(),
        source: src,
    }
}

/// A rewritten file never carries a secret string once `set` replaces it:
/// the full command pipeline, not just the in-module unit test.
#[test]
fn set_then_write_then_read_no_longer_contains_the_secret() {
    let src = source();
    let mut info = info_with(vec![image_ifd(&src, 640, "internal build, do not ship")], src);

    ops::apply_directives(
        &mut info,
        &[Directive::Set {
            tag: "ImageDescription".into(),
            datatype: None,
            ifd_index: 0,
            value: "release build".into(),
        }],
    )
    .unwrap();

    let mut bytes = Vec::new();
    retiff::writer::write_tiff(&info, &mut bytes, &WriterOptions::default()).unwrap();

    assert!(!bytes.windows(8).any(|w| w == b"internal"));
    let read_back_source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    let read_back = retiff::reader::read_tiff(read_back_source).unwrap();
    assert_eq!(
        read_back.ifds[0].get(270).unwrap().as_string(read_back.byte_order).unwrap(),
        "release build"
    );
}

/// Concatenating two single-IFD files in order produces one file whose
/// top-level chain holds both IFDs, back to back.
#[test]
fn concat_then_write_then_read_yields_two_ifds_in_order() {
    let src_a = source();
    let src_b = source();
    let a = info_with(vec![image_ifd(&src_a, 100, "first")], src_a);
    let b = info_with(vec![image_ifd(&src_b, 200, "second")], src_b);

    let merged = ops::concat(vec![a, b]).unwrap();
    let mut bytes = Vec::new();
    retiff::writer::write_tiff(&merged, &mut bytes, &WriterOptions::default()).unwrap();

    let read_source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    let read_back = retiff::reader::read_tiff(read_source).unwrap();
    assert_eq!(read_back.ifds.len(), 2);
    assert_eq!(read_back.ifds[0].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![100]);
    assert_eq!(read_back.ifds[1].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![200]);
}

/// Splitting a file with N SubIFDs under a single root, with
/// `include_subifds` true, yields one file for the root and one for each
/// SubIFD: N+1 total, each independently writable and readable.
#[test]
fn split_with_subifds_yields_n_plus_one_independently_writable_files() {
    let src = source();
    let child_a = image_ifd(&src, 50, "page 2");
    let child_b = image_ifd(&src, 25, "page 3");
    let mut root = image_ifd(&src, 100, "page 1");
    root.insert(TagEntry::new_subifds(330, Datatype::Ifd, vec![child_a, child_b]));
    let info = info_with(vec![root], src);

    let parts = ops::split(&info, true);
    assert_eq!(parts.len(), 3);

    for part in &parts {
        let mut bytes = Vec::new();
        retiff::writer::write_tiff(part, &mut bytes, &WriterOptions::default()).unwrap();
        let read_source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
        let read_back = retiff::reader::read_tiff(read_source).unwrap();
        assert_eq!(read_back.ifds.len(), 1);
    }
}

/// Text dump output names every tag by its registered symbol and shows
/// the decoded value, not just the raw tag ID.
#[test]
fn dump_text_names_the_image_width_tag() {
    let src = source();
    let info = info_with(vec![image_ifd(&src, 1024, "a scan")], src);
    let text = ops::dump(&info, DumpFormat::Text).unwrap();
    assert!(text.contains("ImageWidth"));
    assert!(text.contains("1024"));
    assert!(text.contains("a scan"));
}

/// JSON dump output is valid, parseable JSON carrying the same data as
/// the text rendering.
#[test]
fn dump_json_round_trips_through_a_json_parser() {
    let src = source();
    let info = info_with(vec![image_ifd(&src, 1024, "a scan")], src);
    let text = ops::dump(&info, DumpFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["ifds"][0]["entries"][0]["name"], "ImageWidth");
    assert_eq!(parsed["ifds"][0]["entries"][0]["value"], "1024");
}

/// `setfrom` copies one file's tag value into another's IFD, independent
/// of whatever that tag already held (or didn't).
#[test]
fn setfrom_then_write_then_read_carries_the_copied_value() {
    let src_dest = source();
    let src_source = source();
    let mut dest = info_with(vec![image_ifd(&src_dest, 10, "untitled")], src_dest);
    let source_file = info_with(vec![image_ifd(&src_source, 20, "the real title")], src_source);

    ops::apply_directives(
        &mut dest,
        &[Directive::SetFrom {
            tag: "ImageDescription".into(),
            ifd_index: 0,
            source: source_file,
        }],
    )
    .unwrap();

    let mut bytes = Vec::new();
    retiff::writer::write_tiff(&dest, &mut bytes, &WriterOptions::default()).unwrap();
    let read_source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    let read_back = retiff::reader::read_tiff(read_source).unwrap();
    assert_eq!(
        read_back.ifds[0].get(270).unwrap().as_string(read_back.byte_order).unwrap(),
        "the real title"
    );
}

/// `unset` followed by a write must leave no trace of the removed tag,
/// including in its no-longer-present raw bytes.
#[test]
fn unset_then_write_leaves_no_trace_of_the_tag() {
    let src = source();
    let mut info = info_with(vec![image_ifd(&src, 10, "classified")], src);
    ops::apply_directives(&mut info, &[Directive::Unset { tag: "ImageDescription".into(), ifd_index: 0 }]).unwrap();

    let mut bytes = Vec::new();
    retiff::writer::write_tiff(&info, &mut bytes, &WriterOptions::default()).unwrap();
    assert!(!bytes.windows(10).any(|w| w == b"classified"));

    let read_source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(bytes));
    let read_back = retiff::reader::read_tiff(read_source).unwrap();
    assert!(read_back.ifds[0].get(270).is_none());
}

/// Splitting without `include_subifds` drops the `SubIFDs` entry
/// entirely rather than leaving a dangling pointer in the projected root.
#[test]
fn split_without_subifds_drops_the_subifds_entry_cleanly() {
    let src = source();
    let child = image_ifd(&src, 50, "hidden page");
    let mut root = image_ifd(&src, 100, "visible page");
    root.insert(TagEntry::new_subifds(330, Datatype::Ifd, vec![child]));
    let info = info_with(vec![root], src);

    let parts = ops::split(&info, false);
    assert_eq!(parts.len(), 1);
    assert!(!matches!(parts[0].ifds[0].get(330).map(|e| &e.value), Some(EntryValue::SubIfds(_))));
    assert!(parts[0].ifds[0].get(330).is_none());
}
