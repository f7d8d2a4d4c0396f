//! Vendor whole-slide-imaging and scientific-TIFF extensions.
//!
//! These tag-sets are intentionally a representative subset, not an
//! exhaustive transcription of each vendor's private tag block (see
//! DESIGN.md's "Vendor tag-set completeness" decision) — round-trip
//! preservation of a tag never depends on the registry recognizing it,
//! only decoding and pretty-printing do.

use super::{TagDescriptor, TagSet};
use crate::types::Datatype;

const NONE_ALT: &[&str] = &[];
const NONE_ENUM: &[(u32, &str)] = &[];
const NONE_BITFIELD: &[crate::registry::BitfieldEntry] = &[];

macro_rules! tag {
    ($set:expr, $name:expr, $id:expr, $dt:expr) => {
        TagDescriptor {
            name: $name,
            id: $id,
            tag_set: $set,
            default_datatype: $dt,
            altnames: NONE_ALT,
            enum_values: NONE_ENUM,
            bitfield: NONE_BITFIELD,
            is_ifd: false,
            bytecounts: None,
            lossy: false,
            signature: false,
        }
    };
}

/// Leica/Aperio `.svs` private tags, interleaved with baseline TIFF tags in
/// the same IFDs rather than nested in their own SubIFD.
pub static APERIO_TAGS: &[TagDescriptor] = &[
    tag!(TagSet::Aperio, "ImageDepth", 32997, Datatype::Long),
    tag!(TagSet::Aperio, "TileDepth", 32998, Datatype::Long),
];

/// Hamamatsu NDPI private tags. `SourceLens`, `XOffsetFromSlideCentre` and
/// `YOffsetFromSlideCentre` are the tags most commonly read by downstream
/// tools; `McuStarts` and `ReferenceFrame` are the ones whose offsets are
/// affected by the classic-header > 4 GiB quirk (spec.md §9).
pub static NDPI_TAGS: &[TagDescriptor] = &[
    tag!(TagSet::Ndpi, "Magnification", 65420, Datatype::Short),
    tag!(TagSet::Ndpi, "SourceLens", 65421, Datatype::Rational),
    tag!(TagSet::Ndpi, "XOffsetFromSlideCentre", 65422, Datatype::SRational),
    tag!(TagSet::Ndpi, "YOffsetFromSlideCentre", 65423, Datatype::SRational),
    tag!(TagSet::Ndpi, "ZOffsetFromSlideCentre", 65424, Datatype::SRational),
    TagDescriptor {
        bytecounts: None,
        ..tag!(TagSet::Ndpi, "McuStarts", 65426, Datatype::Long)
    },
    tag!(TagSet::Ndpi, "ReferenceFrame", 65427, Datatype::Long),
    tag!(TagSet::Ndpi, "PropertyMap", 65449, Datatype::Ascii),
    tag!(TagSet::Ndpi, "ScannerSerialNumber", 65439, Datatype::Ascii),
];

/// ImageJ's convention of packing a small `key=value\n` text block into the
/// baseline `ImageDescription` tag (270), plus its own metadata tags used
/// by multi-slice hyperstacks.
pub static IMAGEJ_TAGS: &[TagDescriptor] = &[
    tag!(TagSet::ImageJ, "ImageJMetadataByteCounts", 50838, Datatype::Long),
    tag!(TagSet::ImageJ, "ImageJMetadata", 50839, Datatype::Byte),
];
