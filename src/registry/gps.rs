//! GPS IFD tags (reachable through the TIFF baseline's `GPSIFD` SubIFD
//! pointer, tag 0x8825).

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
            tag_set: TagSet::Gps,
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
    tag!("GPSVersionID", 0x0000, Datatype::Byte),
    tag!("GPSLatitudeRef", 0x0001, Datatype::Ascii),
    tag!("GPSLatitude", 0x0002, Datatype::Rational),
    tag!("GPSLongitudeRef", 0x0003, Datatype::Ascii),
    tag!("GPSLongitude", 0x0004, Datatype::Rational),
    TagDescriptor {
        enum_values: &[(0, "SeaLevel"), (1, "BelowSeaLevel")],
        ..tag!("GPSAltitudeRef", 0x0005, Datatype::Byte)
    },
    tag!("GPSAltitude", 0x0006, Datatype::Rational),
    tag!("GPSTimeStamp", 0x0007, Datatype::Rational),
    tag!("GPSSatellites", 0x0008, Datatype::Ascii),
    tag!("GPSStatus", 0x0009, Datatype::Ascii),
    tag!("GPSMeasureMode", 0x000a, Datatype::Ascii),
    tag!("GPSDOP", 0x000b, Datatype::Rational),
    tag!("GPSSpeedRef", 0x000c, Datatype::Ascii),
    tag!("GPSSpeed", 0x000d, Datatype::Rational),
    tag!("GPSTrackRef", 0x000e, Datatype::Ascii),
    tag!("GPSTrack", 0x000f, Datatype::Rational),
    tag!("GPSImgDirectionRef", 0x0010, Datatype::Ascii),
    tag!("GPSImgDirection", 0x0011, Datatype::Rational),
    tag!("GPSMapDatum", 0x0012, Datatype::Ascii),
    tag!("GPSDestLatitudeRef", 0x0013, Datatype::Ascii),
    tag!("GPSDestLatitude", 0x0014, Datatype::Rational),
    tag!("GPSDestLongitudeRef", 0x0015, Datatype::Ascii),
    tag!("GPSDestLongitude", 0x0016, Datatype::Rational),
    tag!("GPSDestBearingRef", 0x0017, Datatype::Ascii),
    tag!("GPSDestBearing", 0x0018, Datatype::Rational),
    tag!("GPSDestDistanceRef", 0x0019, Datatype::Ascii),
    tag!("GPSDestDistance", 0x001a, Datatype::Rational),
    tag!("GPSProcessingMethod", 0x001b, Datatype::Undefined),
    tag!("GPSAreaInformation", 0x001c, Datatype::Undefined),
    tag!("GPSDateStamp", 0x001d, Datatype::Ascii),
    tag!("GPSDifferential", 0x001e, Datatype::Short),
    tag!("GPSHPositioningError", 0x001f, Datatype::Rational),
];
