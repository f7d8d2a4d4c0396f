//! The fixed TIFF field datatype table.
//!
//! TIFF 6.0 defines field types 1-12; type 13 (IFD) was added by the TIFF
//! Tech Note and is treated as a baseline type here since the spec calls
//! for native SubIFD handling. Types 16-18 are the BigTIFF-only 64-bit
//! additions (LONG8, SLONG8, IFD8).

use crate::error::FormatError;

macro_rules! datatypes {
    ($($(#[$doc:meta])* $variant:ident = $code:expr => ($size:expr, $ascii:expr, $rational:expr, $big_only:expr),)*) => {
        /// One of the 13 baseline TIFF field types, or a BigTIFF 64-bit
        /// extension (16-18).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Datatype {
            $($(#[$doc])* $variant,)*
        }

        impl Datatype {
            /// Reconstruct a datatype from its on-wire numeric code.
            pub fn from_code(code: u16) -> Result<Self, FormatError> {
                match code {
                    $($code => Ok(Datatype::$variant),)*
                    other => Err(FormatError::UnknownDatatype(other)),
                }
            }

            /// The on-wire numeric code for this datatype.
            pub fn code(self) -> u16 {
                match self {
                    $(Datatype::$variant => $code,)*
                }
            }

            /// Size in bytes of a single element of this type.
            ///
            /// RATIONAL/SRATIONAL types are a pair of 4-byte words (8 bytes
            /// total); this is the size used for `count * element_size`
            /// invariant checks, matching spec.md §3.
            pub fn element_size(self) -> u64 {
                match self {
                    $(Datatype::$variant => $size,)*
                }
            }

            /// Whether this type's payload is interpreted as ASCII/UTF-8
            /// text rather than a numeric array.
            pub fn is_ascii(self) -> bool {
                match self {
                    $(Datatype::$variant => $ascii,)*
                }
            }

            /// Whether this type packs two machine words per element
            /// (a fraction).
            pub fn is_rational(self) -> bool {
                match self {
                    $(Datatype::$variant => $rational,)*
                }
            }

            /// Whether this type only exists in BigTIFF files.
            pub fn is_bigtiff_only(self) -> bool {
                match self {
                    $(Datatype::$variant => $big_only,)*
                }
            }
        }
    };
}

datatypes! {
    /// 8-bit unsigned integer.
    Byte = 1 => (1, false, false, false),
    /// 7-bit ASCII, NUL-terminated.
    Ascii = 2 => (1, true, false, false),
    /// 16-bit unsigned integer.
    Short = 3 => (2, false, false, false),
    /// 32-bit unsigned integer.
    Long = 4 => (4, false, false, false),
    /// Unsigned fraction: two 32-bit unsigned words.
    Rational = 5 => (8, false, true, false),
    /// 8-bit signed integer.
    SByte = 6 => (1, false, false, false),
    /// Arbitrary untyped byte.
    Undefined = 7 => (1, false, false, false),
    /// 16-bit signed integer.
    SShort = 8 => (2, false, false, false),
    /// 32-bit signed integer.
    SLong = 9 => (4, false, false, false),
    /// Signed fraction: two 32-bit signed words.
    SRational = 10 => (8, false, true, false),
    /// 32-bit IEEE float.
    Float = 11 => (4, false, false, false),
    /// 64-bit IEEE float.
    Double = 12 => (8, false, false, false),
    /// 32-bit unsigned offset to a nested IFD.
    Ifd = 13 => (4, false, false, false),
    /// BigTIFF 64-bit unsigned integer.
    Long8 = 16 => (8, false, false, true),
    /// BigTIFF 64-bit signed integer.
    SLong8 = 17 => (8, false, false, true),
    /// BigTIFF 64-bit unsigned offset to a nested IFD.
    Ifd8 = 18 => (8, false, false, true),
}

impl Datatype {
    /// Whether this datatype's payload is a series of offset-sized words
    /// (used for nested-IFD tag payloads).
    pub fn is_offset_sized(self) -> bool {
        matches!(self, Datatype::Ifd | Datatype::Ifd8)
    }
}

/// Byte order of a TIFF file, read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        let b: [u8; 2] = bytes[..2].try_into().expect("2 bytes");
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(b),
            ByteOrder::BigEndian => u16::from_be_bytes(b),
        }
    }

    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        let b: [u8; 4] = bytes[..4].try_into().expect("4 bytes");
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(b),
            ByteOrder::BigEndian => u32::from_be_bytes(b),
        }
    }

    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        let b: [u8; 8] = bytes[..8].try_into().expect("8 bytes");
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes(b),
            ByteOrder::BigEndian => u64::from_be_bytes(b),
        }
    }

    pub fn read_i16(self, bytes: &[u8]) -> i16 {
        self.read_u16(bytes) as i16
    }

    pub fn read_i32(self, bytes: &[u8]) -> i32 {
        self.read_u32(bytes) as i32
    }

    pub fn read_i64(self, bytes: &[u8]) -> i64 {
        self.read_u64(bytes) as i64
    }

    pub fn read_f32(self, bytes: &[u8]) -> f32 {
        f32::from_bits(self.read_u32(bytes))
    }

    pub fn read_f64(self, bytes: &[u8]) -> f64 {
        f64::from_bits(self.read_u64(bytes))
    }

    pub fn write_u16(self, n: u16) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => n.to_le_bytes(),
            ByteOrder::BigEndian => n.to_be_bytes(),
        }
    }

    pub fn write_u32(self, n: u32) -> [u8; 4] {
        match self {
            ByteOrder::LittleEndian => n.to_le_bytes(),
            ByteOrder::BigEndian => n.to_be_bytes(),
        }
    }

    pub fn write_u64(self, n: u64) -> [u8; 8] {
        match self {
            ByteOrder::LittleEndian => n.to_le_bytes(),
            ByteOrder::BigEndian => n.to_be_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes_match_spec() {
        assert_eq!(Datatype::Byte.element_size(), 1);
        assert_eq!(Datatype::Ascii.element_size(), 1);
        assert_eq!(Datatype::Short.element_size(), 2);
        assert_eq!(Datatype::Long.element_size(), 4);
        assert_eq!(Datatype::Rational.element_size(), 8);
        assert_eq!(Datatype::Double.element_size(), 8);
        assert_eq!(Datatype::Long8.element_size(), 8);
    }

    #[test]
    fn bigtiff_only_types_are_flagged() {
        assert!(Datatype::Long8.is_bigtiff_only());
        assert!(Datatype::SLong8.is_bigtiff_only());
        assert!(Datatype::Ifd8.is_bigtiff_only());
        assert!(!Datatype::Long.is_bigtiff_only());
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(matches!(
            Datatype::from_code(99),
            Err(FormatError::UnknownDatatype(99))
        ));
    }

    #[test]
    fn round_trip_code() {
        for code in [1u16, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 16, 17, 18] {
            let dt = Datatype::from_code(code).unwrap();
            assert_eq!(dt.code(), code);
        }
    }

    #[test]
    fn byte_order_round_trips() {
        let le = ByteOrder::LittleEndian;
        let be = ByteOrder::BigEndian;
        assert_eq!(le.read_u32(&le.write_u32(0x0102_0304)), 0x0102_0304);
        assert_eq!(be.read_u32(&be.write_u32(0x0102_0304)), 0x0102_0304);
        assert_ne!(le.write_u32(1), be.write_u32(1));
    }
}
