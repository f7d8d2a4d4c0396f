//! `dump`: render a [`TiffInfo`] as a tree of human-readable lines, or as
//! JSON/YAML for machine consumption.
//!
//! Formatting itself is out of core scope per spec §1 ("pretty-printing...
//! thin layers above the core"); what belongs to the core is the
//! guarantee that every IFD, tag, datatype and decoded value is reachable
//! from the rendered tree, which is why this module builds its tree from
//! the model rather than duplicating any of [`crate::reader`] or
//! [`crate::writer`].

use serde::Serialize;

use crate::error::RetiffResult;
use crate::model::{DecodedValue, EntryValue, Ifd, TiffInfo};
use crate::registry::{self, TagSet};

/// Output rendering selected by the CLI's `--json`/`--yaml` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Text,
    Json,
    Yaml,
}

/// One decoded directory entry, shaped for rendering.
#[derive(Debug, Serialize)]
pub struct DumpEntry {
    pub tag_id: u16,
    pub tag_hex: String,
    pub name: String,
    pub datatype: &'static str,
    pub count: u64,
    pub value: String,
    pub enum_name: Option<&'static str>,
    pub bitfield_names: Vec<&'static str>,
}

/// One rendered IFD, with its nested SubIFDs inline.
#[derive(Debug, Serialize)]
pub struct DumpIfd {
    pub tag_set: &'static str,
    pub source_offset: Option<u64>,
    pub entries: Vec<DumpEntry>,
    pub children: Vec<DumpIfd>,
}

/// The whole rendered file: header fields, top-level IFD chain, and any
/// warnings accumulated while reading.
#[derive(Debug, Serialize)]
pub struct DumpTree {
    pub byte_order: &'static str,
    pub big_tiff: bool,
    pub version: u16,
    pub ifds: Vec<DumpIfd>,
    pub warnings: Vec<String>,
}

fn datatype_name(datatype: crate::types::Datatype) -> &'static str {
    use crate::types::Datatype::*;
    match datatype {
        Byte => "BYTE",
        Ascii => "ASCII",
        Short => "SHORT",
        Long => "LONG",
        Rational => "RATIONAL",
        SByte => "SBYTE",
        Undefined => "UNDEFINED",
        SShort => "SSHORT",
        SLong => "SLONG",
        SRational => "SRATIONAL",
        Float => "FLOAT",
        Double => "DOUBLE",
        Ifd => "IFD",
        Long8 => "LONG8",
        SLong8 => "SLONG8",
        Ifd8 => "IFD8",
    }
}

fn render_entry(tag_set: TagSet, entry: &crate::model::TagEntry, byte_order: crate::types::ByteOrder) -> DumpEntry {
    let descriptor = registry::lookup_by_id(tag_set, entry.tag);
    let name = descriptor.map(|d| d.name.to_string()).unwrap_or_else(|| format!("0x{:04x}", entry.tag));

    let decoded = entry.decode(byte_order);
    let value = match &decoded {
        Ok(DecodedValue::Ascii(s)) => s.clone(),
        Ok(DecodedValue::Unsigned(v)) => format_numbers(v),
        Ok(DecodedValue::Signed(v)) => format_numbers(v),
        Ok(DecodedValue::Float(v)) => format_numbers(v),
        Ok(DecodedValue::Rational(v)) => v.iter().map(|(n, d)| format!("{n}/{d}")).collect::<Vec<_>>().join(", "),
        Ok(DecodedValue::SRational(v)) => v.iter().map(|(n, d)| format!("{n}/{d}")).collect::<Vec<_>>().join(", "),
        Err(_) => "<unreadable>".to_string(),
    };

    let first_u32 = match &decoded {
        Ok(DecodedValue::Unsigned(v)) => v.first().map(|&n| n as u32),
        Ok(DecodedValue::Signed(v)) => v.first().map(|&n| n as u32),
        _ => None,
    };

    let enum_name = descriptor.zip(first_u32).and_then(|(d, v)| d.enum_name(v));
    let bitfield_names = descriptor.zip(first_u32).map(|(d, v)| d.bitfield_names(v)).unwrap_or_default();

    DumpEntry {
        tag_id: entry.tag,
        tag_hex: format!("0x{:04x}", entry.tag),
        name,
        datatype: datatype_name(entry.datatype),
        count: entry.count,
        value,
        enum_name,
        bitfield_names,
    }
}

fn format_numbers<T: std::fmt::Display>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

fn render_ifd(ifd: &Ifd, byte_order: crate::types::ByteOrder) -> DumpIfd {
    let mut entries = Vec::new();
    let mut children = Vec::new();
    for entry in ifd.entries.values() {
        match &entry.value {
            EntryValue::Bytes(_) => entries.push(render_entry(ifd.tag_set, entry, byte_order)),
            EntryValue::SubIfds(subs) => {
                for sub in subs {
                    children.push(render_ifd(sub, byte_order));
                }
            }
        }
    }
    DumpIfd {
        tag_set: ifd.tag_set.name(),
        source_offset: ifd.source_offset,
        entries,
        children,
    }
}

/// Build the rendered tree for `info` without committing to a text format
/// yet, so callers (tests, alternate front-ends) can inspect it directly.
pub fn render_tree(info: &TiffInfo) -> DumpTree {
    DumpTree {
        byte_order: match info.byte_order {
            crate::types::ByteOrder::LittleEndian => "little-endian",
            crate::types::ByteOrder::BigEndian => "big-endian",
        },
        big_tiff: info.big_tiff,
        version: info.version,
        ifds: info.ifds.iter().map(|ifd| render_ifd(ifd, info.byte_order)).collect(),
        warnings: info.warnings.iter().map(|w| w.to_string()).collect(),
    }
}

fn write_text_ifd(out: &mut String, ifd: &DumpIfd, depth: usize, index: &mut usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}IFD #{} [{}] (offset={:?})\n", index, ifd.tag_set, ifd.source_offset));
    *index += 1;
    for entry in &ifd.entries {
        out.push_str(&format!(
            "{indent}  {} ({}) {} x{} = {}",
            entry.name, entry.tag_hex, entry.datatype, entry.count, entry.value
        ));
        if let Some(name) = entry.enum_name {
            out.push_str(&format!("  ; {name}"));
        }
        if !entry.bitfield_names.is_empty() {
            out.push_str(&format!("  ; {}", entry.bitfield_names.join("|")));
        }
        out.push('\n');
    }
    for child in &ifd.children {
        write_text_ifd(out, child, depth + 1, index);
    }
}

fn render_text(tree: &DumpTree) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "TIFF ({}, {}), {} top-level IFD(s)\n",
        if tree.big_tiff { "BigTIFF" } else { "classic" },
        tree.byte_order,
        tree.ifds.len()
    ));
    let mut index = 0usize;
    for ifd in &tree.ifds {
        write_text_ifd(&mut out, ifd, 0, &mut index);
    }
    for warning in &tree.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out
}

/// Render `info` in the requested format.
pub fn dump(info: &TiffInfo, format: DumpFormat) -> RetiffResult<String> {
    let tree = render_tree(info);
    Ok(match format {
        DumpFormat::Text => render_text(&tree),
        DumpFormat::Json => serde_json::to_string_pretty(&tree).expect("DumpTree serializes"),
        DumpFormat::Yaml => serde_yaml::to_string(&tree).expect("DumpTree serializes"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemorySource, TagEntry, TiffInfo};
    use crate::types::{ByteOrder, Datatype};
    use std::sync::Arc;

    fn sample_info() -> TiffInfo {
        let source: Arc<dyn crate::model::ByteSource> = Arc::new(MemorySource::new(Vec::<u8>::new()));
        let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
        ifd.insert(TagEntry::new_bytes(256, Datatype::Long, 1, vec![100, 0, 0, 0]));
        ifd.insert(TagEntry::new_bytes(259, Datatype::Short, 1, vec![7, 0]));
        TiffInfo {
            byte_order: ByteOrder::LittleEndian,
            big_tiff: false,
            version: 42,
            ifds: vec![ifd],
            warnings: Vec::new(),
            source,
        }
    }

    #[test]
    fn text_dump_includes_tag_name_and_enum() {
        let text = dump(&sample_info(), DumpFormat::Text).unwrap();
        assert!(text.contains("ImageWidth"));
        assert!(text.contains("100"));
        assert!(text.contains("JPEG"));
    }

    #[test]
    fn json_dump_is_valid_json() {
        let text = dump(&sample_info(), DumpFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["ifds"][0]["entries"][0]["name"], "ImageWidth");
    }

    #[test]
    fn yaml_dump_round_trips_through_the_yaml_parser() {
        let text = dump(&sample_info(), DumpFormat::Yaml).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert!(parsed.get("ifds").is_some());
    }
}
