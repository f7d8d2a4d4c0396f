//! GeoTIFF GeoKeys: the second-level pseudo-tag directory packed inside the
//! `GeoKeyDirectoryTag` payload (tiff tag 34735). GeoKey IDs occupy their
//! own namespace, disjoint from ordinary TIFF tag IDs, which is why they
//! get their own [`super::TagSet`] rather than being folded into `tiff`.
//!
//! `default_datatype` here is nominal: GeoKeys are stored as SHORT,
//! DOUBLE (via `GeoDoubleParamsTag`) or ASCII (via `GeoAsciiParamsTag`)
//! depending on the key, resolved at parse time rather than fixed per key.

use super::{TagDescriptor, TagSet};
use crate::types::Datatype;

const NONE_ALT: &[&str] = &[];
const NONE_ENUM: &[(u32, &str)] = &[];
const NONE_BITFIELD: &[crate::registry::BitfieldEntry] = &[];

macro_rules! key {
    ($name:expr, $id:expr) => {
        TagDescriptor {
            name: $name,
            id: $id,
            tag_set: TagSet::GeoTiff,
            default_datatype: Datatype::Short,
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
    key!("GTModelTypeGeoKey", 1024),
    key!("GTRasterTypeGeoKey", 1025),
    key!("GTCitationGeoKey", 1026),
    key!("GeographicTypeGeoKey", 2048),
    key!("GeogCitationGeoKey", 2049),
    key!("GeogGeodeticDatumGeoKey", 2050),
    key!("GeogPrimeMeridianGeoKey", 2051),
    key!("GeogLinearUnitsGeoKey", 2052),
    key!("GeogAngularUnitsGeoKey", 2054),
    key!("GeogEllipsoidGeoKey", 2056),
    key!("GeogSemiMajorAxisGeoKey", 2057),
    key!("GeogSemiMinorAxisGeoKey", 2058),
    key!("GeogInvFlatteningGeoKey", 2059),
    key!("ProjectedCSTypeGeoKey", 3072),
    key!("PCSCitationGeoKey", 3073),
    key!("ProjectionGeoKey", 3074),
    key!("ProjCoordTransGeoKey", 3075),
    key!("ProjLinearUnitsGeoKey", 3076),
    key!("ProjStdParallel1GeoKey", 3078),
    key!("ProjStdParallel2GeoKey", 3079),
    key!("ProjNatOriginLongGeoKey", 3080),
    key!("ProjNatOriginLatGeoKey", 3081),
    key!("ProjFalseEastingGeoKey", 3082),
    key!("ProjFalseNorthingGeoKey", 3083),
    key!("ProjScaleAtNatOriginGeoKey", 3092),
    key!("VerticalCSTypeGeoKey", 4096),
    key!("VerticalCitationGeoKey", 4097),
    key!("VerticalDatumGeoKey", 4098),
    key!("VerticalUnitsGeoKey", 4099),
];
