//! Baseline TIFF 6.0 tags plus the widely-deployed extensions (tiling,
//! SubIFDs, the `Predictor`/`SampleFormat` pair) that most real-world files
//! carry even though they postdate the original 6.0 spec.

use super::{BitfieldEntry, TagDescriptor, TagSet};
use crate::types::Datatype;

const NONE_BITFIELD: &[BitfieldEntry] = &[];
const NONE_ENUM: &[(u32, &str)] = &[];
const NONE_ALT: &[&str] = &[];

macro_rules! tag {
    ($name:expr, $id:expr, $dt:expr) => {
        TagDescriptor {
            name: $name,
            id: $id,
            tag_set: TagSet::Tiff,
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
    TagDescriptor {
        bitfield: &[
            BitfieldEntry { mask: 1, name: "ReducedImage" },
            BitfieldEntry { mask: 2, name: "Page" },
            BitfieldEntry { mask: 4, name: "Mask" },
        ],
        ..tag!("NewSubfileType", 254, Datatype::Long)
    },
    tag!("SubfileType", 255, Datatype::Short),
    tag!("ImageWidth", 256, Datatype::Long),
    tag!("ImageLength", 257, Datatype::Long),
    tag!("BitsPerSample", 258, Datatype::Short),
    TagDescriptor {
        enum_values: &[
            (1, "NoCompression"),
            (2, "CCITTModifiedHuffmanRLE"),
            (3, "CCITTGroup3Fax"),
            (4, "CCITTGroup4Fax"),
            (5, "LZW"),
            (6, "JPEGOld"),
            (7, "JPEG"),
            (8, "Deflate"),
            (32773, "PackBits"),
            (32946, "DeflateAdobe"),
        ],
        ..tag!("Compression", 259, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[
            (0, "WhiteIsZero"),
            (1, "BlackIsZero"),
            (2, "RGB"),
            (3, "PaletteColor"),
            (4, "TransparencyMask"),
            (5, "CMYK"),
            (6, "YCbCr"),
            (8, "CIELab"),
        ],
        ..tag!("PhotometricInterpretation", 262, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(1, "NoDithering"), (2, "FloydSteinberg")],
        ..tag!("Threshholding", 263, Datatype::Short)
    },
    tag!("CellWidth", 264, Datatype::Short),
    tag!("CellLength", 265, Datatype::Short),
    TagDescriptor {
        enum_values: &[(1, "MSB2LSB"), (2, "LSB2MSB")],
        ..tag!("FillOrder", 266, Datatype::Short)
    },
    tag!("DocumentName", 269, Datatype::Ascii),
    tag!("ImageDescription", 270, Datatype::Ascii),
    tag!("Make", 271, Datatype::Ascii),
    tag!("Model", 272, Datatype::Ascii),
    TagDescriptor {
        bytecounts: Some(279),
        ..tag!("StripOffsets", 273, Datatype::Long)
    },
    TagDescriptor {
        enum_values: &[
            (1, "TopLeft"),
            (2, "TopRight"),
            (3, "BottomRight"),
            (4, "BottomLeft"),
            (5, "LeftTop"),
            (6, "RightTop"),
            (7, "RightBottom"),
            (8, "LeftBottom"),
        ],
        ..tag!("Orientation", 274, Datatype::Short)
    },
    tag!("SamplesPerPixel", 277, Datatype::Short),
    tag!("RowsPerStrip", 278, Datatype::Long),
    tag!("StripByteCounts", 279, Datatype::Long),
    tag!("MinSampleValue", 280, Datatype::Short),
    tag!("MaxSampleValue", 281, Datatype::Short),
    tag!("XResolution", 282, Datatype::Rational),
    tag!("YResolution", 283, Datatype::Rational),
    TagDescriptor {
        enum_values: &[(1, "Chunky"), (2, "Planar")],
        ..tag!("PlanarConfiguration", 284, Datatype::Short)
    },
    tag!("PageName", 285, Datatype::Ascii),
    tag!("XPosition", 286, Datatype::Rational),
    tag!("YPosition", 287, Datatype::Rational),
    tag!("FreeOffsets", 288, Datatype::Long),
    tag!("FreeByteCounts", 289, Datatype::Long),
    tag!("GrayResponseUnit", 290, Datatype::Short),
    tag!("GrayResponseCurve", 291, Datatype::Short),
    tag!("T4Options", 292, Datatype::Long),
    tag!("T6Options", 293, Datatype::Long),
    TagDescriptor {
        enum_values: &[(1, "NoUnit"), (2, "Inch"), (3, "Centimeter")],
        ..tag!("ResolutionUnit", 296, Datatype::Short)
    },
    tag!("PageNumber", 297, Datatype::Short),
    tag!("TransferFunction", 301, Datatype::Short),
    tag!("Software", 305, Datatype::Ascii),
    tag!("DateTime", 306, Datatype::Ascii),
    tag!("Artist", 315, Datatype::Ascii),
    tag!("HostComputer", 316, Datatype::Ascii),
    TagDescriptor {
        enum_values: &[(1, "None"), (2, "HorizontalDifferencing"), (3, "FloatingPoint")],
        ..tag!("Predictor", 317, Datatype::Short)
    },
    tag!("WhitePoint", 318, Datatype::Rational),
    tag!("PrimaryChromaticities", 319, Datatype::Rational),
    tag!("ColorMap", 320, Datatype::Short),
    tag!("HalftoneHints", 321, Datatype::Short),
    tag!("TileWidth", 322, Datatype::Long),
    tag!("TileLength", 323, Datatype::Long),
    TagDescriptor {
        bytecounts: Some(325),
        ..tag!("TileOffsets", 324, Datatype::Long)
    },
    tag!("TileByteCounts", 325, Datatype::Long),
    tag!("BadFaxLines", 326, Datatype::Long),
    tag!("CleanFaxData", 327, Datatype::Short),
    tag!("ConsecutiveBadFaxLines", 328, Datatype::Long),
    TagDescriptor {
        is_ifd: true,
        ..tag!("SubIFDs", 330, Datatype::Ifd)
    },
    tag!("InkSet", 332, Datatype::Short),
    tag!("InkNames", 333, Datatype::Ascii),
    tag!("NumberOfInks", 334, Datatype::Short),
    tag!("DotRange", 336, Datatype::Byte),
    tag!("TargetPrinter", 337, Datatype::Ascii),
    TagDescriptor {
        bitfield: &[
            BitfieldEntry { mask: 1, name: "UnassociatedAlpha" },
        ],
        ..tag!("ExtraSamples", 338, Datatype::Short)
    },
    TagDescriptor {
        enum_values: &[(1, "UnsignedInteger"), (2, "SignedInteger"), (3, "IEEEFloat"), (4, "Undefined")],
        ..tag!("SampleFormat", 339, Datatype::Short)
    },
    tag!("SMinSampleValue", 340, Datatype::Double),
    tag!("SMaxSampleValue", 341, Datatype::Double),
    tag!("TransferRange", 342, Datatype::Short),
    tag!("JPEGTables", 347, Datatype::Undefined),
    tag!("JPEGProc", 512, Datatype::Short),
    tag!("JPEGInterchangeFormat", 513, Datatype::Long),
    tag!("JPEGInterchangeFormatLength", 514, Datatype::Long),
    tag!("JPEGRestartInterval", 515, Datatype::Short),
    tag!("JPEGLosslessPredictors", 517, Datatype::Short),
    tag!("JPEGPointTransforms", 518, Datatype::Short),
    tag!("JPEGQTables", 519, Datatype::Long),
    tag!("JPEGDCTables", 520, Datatype::Long),
    tag!("JPEGACTables", 521, Datatype::Long),
    tag!("YCbCrCoefficients", 529, Datatype::Rational),
    tag!("YCbCrSubSampling", 530, Datatype::Short),
    TagDescriptor {
        enum_values: &[(1, "Centered"), (2, "Cosited")],
        ..tag!("YCbCrPositioning", 531, Datatype::Short)
    },
    tag!("ReferenceBlackWhite", 532, Datatype::Rational),
    tag!("XMP", 700, Datatype::Byte),
    TagDescriptor {
        altnames: &["Copyright", "CopyrightNotice"],
        ..tag!("Copyright", 33432, Datatype::Ascii)
    },
    TagDescriptor {
        signature: true,
        ..tag!("IPTC", 33723, Datatype::Byte)
    },
    TagDescriptor {
        signature: true,
        ..tag!("ICCProfile", 34675, Datatype::Undefined)
    },
    TagDescriptor {
        is_ifd: true,
        ..tag!("ExifIFD", 34665, Datatype::Ifd)
    },
    TagDescriptor {
        is_ifd: true,
        ..tag!("GPSIFD", 34853, Datatype::Ifd)
    },
    TagDescriptor {
        is_ifd: true,
        ..tag!("InteropIFD", 40965, Datatype::Ifd)
    },
    tag!("ModelPixelScaleTag", 33550, Datatype::Double),
    tag!("ModelTiepointTag", 33922, Datatype::Double),
    tag!("ModelTransformationTag", 34264, Datatype::Double),
    TagDescriptor {
        is_ifd: false,
        ..tag!("GeoKeyDirectoryTag", 34735, Datatype::Short)
    },
    tag!("GeoDoubleParamsTag", 34736, Datatype::Double),
    tag!("GeoAsciiParamsTag", 34737, Datatype::Ascii),
    TagDescriptor {
        signature: true,
        ..tag!("PhotoshopImageResources", 34377, Datatype::Byte)
    },
];
