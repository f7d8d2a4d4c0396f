//! Interoperability IFD tags (reachable through the EXIF IFD's
//! `InteroperabilityIFD` pointer, tag 0xa005).

use super::{TagDescriptor, TagSet};
use crate::types::Datatype;

const NONE_ALT: &[&str] = &[];
const NONE_ENUM: &[(u32, &str)] = &[];
const NONE_BITFIELD: &[crate::registry::BitfieldEntry] = &[];

macro_rules! tag {
    ($name:expr, $id:expr, $dt:expr) => {
        TagDescriptor {
            name: $name,
            id: $id,
            tag_set: TagSet::Interop,
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

pub static TAGS: &[TagDescriptor] = &[
    tag!("InteroperabilityIndex", 0x0001, Datatype::Ascii),
    tag!("InteroperabilityVersion", 0x0002, Datatype::Undefined),
    tag!("RelatedImageFileFormat", 0x1000, Datatype::Ascii),
    tag!("RelatedImageWidth", 0x1001, Datatype::Long),
    tag!("RelatedImageLength", 0x1002, Datatype::Long),
];
