//! The tag-constants registry: numeric tag IDs to semantic metadata.
//!
//! The registry is read-only, process-wide data. It never drives whether a
//! tag survives a round-trip — unknown tags are preserved regardless of
//! whether the registry has ever heard of them (see [`crate::model`]) — it
//! only drives *decoding*, *pretty-printing* and *symbolic lookup* for the
//! tags it does recognize.

mod exif;
mod geotiff;
mod gps;
mod interop;
mod tiff;
mod vendor;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use phf::phf_map;

use crate::types::Datatype;

/// One named tag namespace. A tag ID is only unambiguous together with the
/// tag-set it is being resolved in (EXIF tag 0x0100 and TIFF baseline tag
/// 0x0100 do not mean the same thing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSet {
    Tiff,
    Exif,
    Gps,
    Interop,
    GeoTiff,
    Aperio,
    Ndpi,
    ImageJ,
}

impl TagSet {
    pub fn name(self) -> &'static str {
        match self {
            TagSet::Tiff => "tiff",
            TagSet::Exif => "exif",
            TagSet::Gps => "gps",
            TagSet::Interop => "interop",
            TagSet::GeoTiff => "geotiff",
            TagSet::Aperio => "aperio",
            TagSet::Ndpi => "ndpi",
            TagSet::ImageJ => "imagej",
        }
    }

    /// Every registered tag-set, in the fallback order used for symbol
    /// resolution (spec.md §4.1: "searching the current tag-set then
    /// registered tag-sets").
    pub fn all() -> &'static [TagSet] {
        &[
            TagSet::Tiff,
            TagSet::Exif,
            TagSet::Gps,
            TagSet::Interop,
            TagSet::GeoTiff,
            TagSet::Aperio,
            TagSet::Ndpi,
            TagSet::ImageJ,
        ]
    }

    fn descriptors(self) -> &'static [TagDescriptor] {
        match self {
            TagSet::Tiff => tiff::TAGS,
            TagSet::Exif => exif::TAGS,
            TagSet::Gps => gps::TAGS,
            TagSet::Interop => interop::TAGS,
            TagSet::GeoTiff => geotiff::TAGS,
            TagSet::Aperio => vendor::APERIO_TAGS,
            TagSet::Ndpi => vendor::NDPI_TAGS,
            TagSet::ImageJ => vendor::IMAGEJ_TAGS,
        }
    }
}

/// A single bit or multi-bit field within a bitmask-valued tag, e.g. the
/// `NewSubfileType` flags.
#[derive(Debug, Clone, Copy)]
pub struct BitfieldEntry {
    pub mask: u32,
    pub name: &'static str,
}

/// Semantic metadata for one tag ID within one [`TagSet`].
#[derive(Debug, Clone, Copy)]
pub struct TagDescriptor {
    pub name: &'static str,
    pub id: u16,
    pub tag_set: TagSet,
    pub default_datatype: Datatype,
    pub altnames: &'static [&'static str],
    pub enum_values: &'static [(u32, &'static str)],
    pub bitfield: &'static [BitfieldEntry],
    pub is_ifd: bool,
    /// Tag ID of the paired bytecount tag, if this tag is an offset tag in
    /// an offset/bytecount pair (spec.md §3's "Invariants").
    pub bytecounts: Option<u16>,
    pub lossy: bool,
    pub signature: bool,
}

impl TagDescriptor {
    /// Look up the human-readable name for an enumerated value, if any.
    pub fn enum_name(&self, value: u32) -> Option<&'static str> {
        self.enum_values
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    /// Decompose a bitmask value into the names of every set flag this
    /// descriptor knows about.
    pub fn bitfield_names(&self, value: u32) -> Vec<&'static str> {
        self.bitfield
            .iter()
            .filter(|entry| value & entry.mask == entry.mask && entry.mask != 0)
            .map(|entry| entry.name)
            .collect()
    }
}

/// `(tag_set_name, id) -> &TagDescriptor` index, built once from the
/// compile-time per-tag-set tables. A `HashMap` rather than repeated linear
/// scans over the `phf`-style static tables, since several tag-sets (EXIF,
/// the vendor sets) are large enough that O(1) lookup matters once a file
/// has hundreds of tags spread across nested IFDs.
static BY_ID: Lazy<HashMap<(TagSet, u16), &'static TagDescriptor>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &set in TagSet::all() {
        for descriptor in set.descriptors() {
            map.insert((set, descriptor.id), descriptor);
        }
    }
    map
});

/// Look up a tag descriptor by numeric ID within a specific tag-set.
pub fn lookup_by_id(tag_set: TagSet, id: u16) -> Option<&'static TagDescriptor> {
    BY_ID.get(&(tag_set, id)).copied()
}

/// The small set of unqualified baseline-TIFF tag names resolvable at
/// compile time without building the full cross-tag-set index. This mirrors
/// the way a perfect-hash generated table is used elsewhere in the crate
/// (see `photostructure-exif-oxide`'s `printconv_patterns.rs`): a static
/// `phf::Map` for the common case, with a lazily built fallback index (see
/// [`BY_NAME`]) covering synonyms and every other tag-set.
static COMMON_BASELINE_NAMES: phf::Map<&'static str, u16> = phf_map! {
    "imagewidth" => 256,
    "imagelength" => 257,
    "bitspersample" => 258,
    "compression" => 259,
    "photometricinterpretation" => 262,
    "imagedescription" => 270,
    "make" => 271,
    "model" => 272,
    "stripoffsets" => 273,
    "orientation" => 274,
    "samplesperpixel" => 277,
    "rowsperstrip" => 278,
    "stripbytecounts" => 279,
    "xresolution" => 282,
    "yresolution" => 283,
    "planarconfiguration" => 284,
    "resolutionunit" => 296,
    "software" => 305,
    "datetime" => 306,
    "artist" => 315,
    "predictor" => 317,
    "tilewidth" => 322,
    "tilelength" => 323,
    "tileoffsets" => 324,
    "tilebytecounts" => 325,
    "subifds" => 330,
    "samplesformat" => 339,
};

/// Case-insensitive `name -> (tag_set, descriptor)` index across every
/// tag-set, including synonyms (`altnames`). Built once on first use.
static BY_NAME: Lazy<HashMap<String, (TagSet, &'static TagDescriptor)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &set in TagSet::all() {
        for descriptor in set.descriptors() {
            map.entry(descriptor.name.to_ascii_lowercase())
                .or_insert((set, descriptor));
            for alt in descriptor.altnames {
                map.entry(alt.to_ascii_lowercase())
                    .or_insert((set, descriptor));
            }
        }
    }
    map
});

/// Result of resolving a symbolic tag reference (spec.md §4.1's "Lookup").
#[derive(Debug, Clone, Copy)]
pub enum Resolved {
    /// The symbol matched a registered tag in some tag-set.
    Known(TagSet, &'static TagDescriptor),
    /// The symbol parsed as a bare numeric tag ID (`0xABCD` or decimal) with
    /// no registry entry; it is still a legal tag, just an unrecognized
    /// one, per spec.md §4.1 ("Unknown numeric tags ... are preserved").
    Numeric(u16),
}

/// Resolve a symbolic tag name the way `set`'s directive parser does:
/// search the preferred tag-set first, then every other registered
/// tag-set, then fall back to parsing the symbol as a bare number.
pub fn resolve_symbol(symbol: &str, preferred: TagSet) -> Option<Resolved> {
    let lower = symbol.to_ascii_lowercase();

    if let Some(&id) = COMMON_BASELINE_NAMES.get(lower.as_str()) {
        if let Some(descriptor) = lookup_by_id(TagSet::Tiff, id) {
            return Some(Resolved::Known(TagSet::Tiff, descriptor));
        }
    }

    for descriptor in preferred.descriptors() {
        if descriptor.name.eq_ignore_ascii_case(symbol)
            || descriptor.altnames.iter().any(|a| a.eq_ignore_ascii_case(symbol))
        {
            return Some(Resolved::Known(preferred, descriptor));
        }
    }

    if let Some(&(set, descriptor)) = BY_NAME.get(&lower) {
        return Some(Resolved::Known(set, descriptor));
    }

    parse_numeric_tag(symbol).map(Resolved::Numeric)
}

/// Parse `0xABCD` or a plain decimal string as a bare tag ID.
pub fn parse_numeric_tag(symbol: &str) -> Option<u16> {
    if let Some(hex) = symbol
        .strip_prefix("0x")
        .or_else(|| symbol.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16).ok()
    } else {
        symbol.parse::<u16>().ok()
    }
}

pub use exif::TAGS as EXIF_TAGS;
pub use geotiff::TAGS as GEOTIFF_KEYS;
pub use gps::TAGS as GPS_TAGS;
pub use interop::TAGS as INTEROP_TAGS;
pub use tiff::TAGS as TIFF_TAGS;
pub use vendor::{APERIO_TAGS, IMAGEJ_TAGS, NDPI_TAGS};
