//! EXIF IFD tags (the tag-set reachable through the TIFF baseline's
//! `ExifIFD` SubIFD pointer, tag 0x8769).

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
            tag_set: TagSet::Exif,
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
    tag!("ExposureTime", 0x829a, Datatype::Rational),
    tag!("FNumber", 0x829d, Datatype::Rational),
    TagDescriptor {
        enum_values: &[
            (0, "NotDefined"),
            (1, "Manual"),
            (2, "NormalProgram"),
            (3, "AperturePriority"),
            (4, "ShutterPriority"),
            (5, "CreativeProgram"),
            (6, "ActionProgram"),
            (7, "PortraitMode"),
            (8, "LandscapeMode"),
        ],
        ..tag!("ExposureProgram", 0x8822, Datatype::Short)
    },
    tag!("SpectralSensitivity", 0x8824, Datatype::Ascii),
    tag!("ISOSpeedRatings", 0x8827, Datatype::Short),
    tag!("OECF", 0x8828, Datatype::Undefined),
    tag!("SensitivityType", 0x8830, Datatype::Short),
    tag!("ExifVersion", 0x9000, Datatype::Undefined),
    tag!("DateTimeOriginal", 0x9003, Datatype::Ascii),
    tag!("DateTimeDigitized", 0x9004, Datatype::Ascii),
    tag!("ComponentsConfiguration", 0x9101, Datatype::Undefined),
    tag!("CompressedBitsPerPixel", 0x9102, Datatype::Rational),
    tag!("ShutterSpeedValue", 0x9201, Datatype::SRational),
    tag!("ApertureValue", 0x9202, Datatype::Rational),
    tag!("BrightnessValue", 0x9203, Datatype::SRational),
    tag!("ExposureBiasValue", 0x9204, Datatype::SRational),
    tag!("MaxApertureValue", 0x9205, Datatype::Rational),
    tag!("SubjectDistance", 0x9206, Datatype::Rational),
    TagDescriptor {
        enum_values: &[
            (0, "Unknown"),
            (1, "AverageMetering"),
            (2, "CenterWeightedAverage"),
            (3, "Spot"),
            (4, "MultiSpot"),
            (5, "Pattern"),
            (6, "Partial"),
            (255, "Other"),
        ],
        ..tag!("MeteringMode", 0x9207, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[
            (0, "Unknown"),
            (1, "Daylight"),
            (2, "Fluorescent"),
            (3, "Tungsten"),
            (4, "Flash"),
            (9, "FineWeather"),
            (10, "CloudyWeather"),
            (255, "Other"),
        ],
        ..tag!("LightSource", 0x9208, Datatype::Short)
    },
    TagDescriptor {
        bitfield: &[
            crate::registry::BitfieldEntry { mask: 0x1, name: "Fired" },
            crate::registry::BitfieldEntry { mask: 0x40, name: "RedEyeMode" },
        ],
        ..tag!("Flash", 0x9209, Datatype::Short)
    },
    tag!("FocalLength", 0x920a, Datatype::Rational),
    tag!("SubjectArea", 0x9214, Datatype::Short),
    tag!("MakerNote", 0x927c, Datatype::Undefined),
    tag!("UserComment", 0x9286, Datatype::Undefined),
    tag!("SubSecTime", 0x9290, Datatype::Ascii),
    tag!("SubSecTimeOriginal", 0x9291, Datatype::Ascii),
    tag!("SubSecTimeDigitized", 0x9292, Datatype::Ascii),
    tag!("FlashpixVersion", 0xa000, Datatype::Undefined),
    TagDescriptor {
        enum_values: &[(1, "sRGB"), (0xffff, "Uncalibrated")],
        ..tag!("ColorSpace", 0xa001, Datatype::Short)
    },
    tag!("PixelXDimension", 0xa002, Datatype::Long),
    tag!("PixelYDimension", 0xa003, Datatype::Long),
    TagDescriptor {
        is_ifd: true,
        ..tag!("InteroperabilityIFD", 0xa005, Datatype::Ifd)
    },
    tag!("FlashEnergy", 0xa20b, Datatype::Rational),
    tag!("FocalPlaneXResolution", 0xa20e, Datatype::Rational),
    tag!("FocalPlaneYResolution", 0xa20f, Datatype::Rational),
    TagDescriptor {
        enum_values: &[(1, "NoUnit"), (2, "Inch"), (3, "Centimeter")],
        ..tag!("FocalPlaneResolutionUnit", 0xa210, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[
            (0, "Unknown"),
            (1, "OneChipColorArea"),
            (2, "TwoChipColorArea"),
            (3, "ThreeChipColorArea"),
            (4, "ColorSequentialArea"),
            (5, "Trilinear"),
            (6, "ColorSequentialLinear"),
        ],
        ..tag!("SensingMethod", 0xa217, Datatype::Short)
    },
    tag!("FileSource", 0xa300, Datatype::Undefined),
    tag!("SceneType", 0xa301, Datatype::Undefined),
    tag!("CFAPattern", 0xa302, Datatype::Undefined),
    TagDescriptor {
        enum_values: &[(0, "Normal"), (1, "Custom")],
        ..tag!("CustomRendered", 0xa401, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(0, "Auto"), (1, "Manual")],
        ..tag!("ExposureMode", 0xa402, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(0, "Auto"), (1, "Manual")],
        ..tag!("WhiteBalance", 0xa403, Datatype::Short)
    },
    tag!("DigitalZoomRatio", 0xa404, Datatype::Rational),
    tag!("FocalLengthIn35mmFilm", 0xa405, Datatype::Short),
    TagDescriptor {
        enum_values: &[(0, "Standard"), (1, "Landscape"), (2, "Portrait"), (3, "Night")],
        ..tag!("SceneCaptureType", 0xa406, Datatype::Short)
    },
    tag!("GainControl", 0xa407, Datatype::Short),
    TagDescriptor {
        enum_values: &[(0, "Normal"), (1, "Soft"), (2, "Hard")],
        ..tag!("Contrast", 0xa408, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(0, "Normal"), (1, "Low"), (2, "High")],
        ..tag!("Saturation", 0xa409, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(0, "Normal"), (1, "Soft"), (2, "Hard")],
        ..tag!("Sharpness", 0xa40a, Datatype::Short)
    },
    tag!("SubjectDistanceRange", 0xa40c, Datatype::Short),
    TagDescriptor {
        signature: true,
        ..tag!("ImageUniqueID", 0xa420, Datatype::Ascii)
    },
    tag!("LensSpecification", 0xa432, Datatype::Rational),
    tag!("LensMake", 0xa433, Datatype::Ascii),
    tag!("LensModel", 0xa434, Datatype::Ascii),
];
