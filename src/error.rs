//! Error and warning types produced by the reader, writer and commands.

use std::fmt;
use std::io;

use crate::model::DecodedValue;

/// Top level error type returned by every fallible `retiff` operation.
#[derive(Debug)]
pub enum RetiffError {
    /// The input bytes are not a well-formed TIFF or BigTIFF stream.
    Format(FormatError),
    /// Caller forced classic layout but the data does not fit in it.
    BigTiffRequired,
    /// Caller asked for something the tool cannot do with the given input.
    Usage(UsageError),
    /// Underlying read, write or seek failure.
    Io(io::Error),
}

/// The input is not formatted the way the TIFF/BigTIFF specs require.
///
/// New variants may be added; exhaustive matching is not guaranteed.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FormatError {
    BadHeaderMagic([u8; 2]),
    UnknownTiffVersion(u16),
    TruncatedFile,
    UnknownDatatype(u16),
    CircularIfdReference,
    InvalidOffset(u64),
    MissingPairedBytecount { offset_tag: u16, bytecount_tag: u16 },
    InconsistentBytecountPair { offset_tag: u16, bytecount_tag: u16 },
    MaxIfdDepthExceeded,
    DecodedValueMismatch(DecodedValue),
    /// Tried to decode a resolved SubIFD pointer entry as a plain value.
    NotAPlainValue(u16),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FormatError::*;
        match self {
            BadHeaderMagic(bytes) => write!(f, "bad TIFF byte-order magic: {bytes:02x?}"),
            UnknownTiffVersion(v) => write!(f, "unknown TIFF version word {v}"),
            TruncatedFile => write!(f, "file ended before the declared structure was fully read"),
            UnknownDatatype(code) => write!(f, "tag declares unknown datatype code {code}"),
            CircularIfdReference => write!(f, "IFD chain or SubIFD tree contains a cycle"),
            InvalidOffset(off) => write!(f, "offset {off} lies outside the file"),
            MissingPairedBytecount {
                offset_tag,
                bytecount_tag,
            } => write!(
                f,
                "tag 0x{offset_tag:04x} requires its paired bytecount tag 0x{bytecount_tag:04x}, which is missing"
            ),
            InconsistentBytecountPair {
                offset_tag,
                bytecount_tag,
            } => write!(
                f,
                "tag 0x{offset_tag:04x} and its paired bytecount tag 0x{bytecount_tag:04x} disagree on element count"
            ),
            MaxIfdDepthExceeded => write!(f, "SubIFD nesting exceeded the maximum supported depth"),
            DecodedValueMismatch(v) => write!(f, "value {v:?} cannot be decoded as the requested type"),
            NotAPlainValue(tag) => write!(f, "tag 0x{tag:04x} is a resolved SubIFD pointer, not a plain value"),
        }
    }
}

/// The caller asked for an operation the tool cannot perform on this input.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum UsageError {
    UnknownTagName(String),
    UnparseableValue { tag: String, value: String },
    ConflictingDirectives(String),
    OutputExists(std::path::PathBuf),
    NoSuchIfd(usize),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UsageError::*;
        match self {
            UnknownTagName(name) => write!(f, "unknown tag name `{name}`"),
            UnparseableValue { tag, value } => {
                write!(f, "cannot parse `{value}` as a value for tag `{tag}`")
            }
            ConflictingDirectives(msg) => write!(f, "conflicting directives: {msg}"),
            OutputExists(path) => write!(
                f,
                "output path {} already exists (pass --overwrite to replace it)",
                path.display()
            ),
            NoSuchIfd(idx) => write!(f, "no IFD at index {idx}"),
        }
    }
}

impl fmt::Display for RetiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetiffError::Format(e) => write!(f, "format error: {e}"),
            RetiffError::BigTiffRequired => write!(
                f,
                "classic TIFF layout was requested but the data requires BigTIFF"
            ),
            RetiffError::Usage(e) => write!(f, "usage error: {e}"),
            RetiffError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for RetiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetiffError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RetiffError {
    fn from(e: io::Error) -> Self {
        RetiffError::Io(e)
    }
}

impl From<FormatError> for RetiffError {
    fn from(e: FormatError) -> Self {
        RetiffError::Format(e)
    }
}

impl From<UsageError> for RetiffError {
    fn from(e: UsageError) -> Self {
        RetiffError::Usage(e)
    }
}

impl From<std::num::TryFromIntError> for RetiffError {
    fn from(_: std::num::TryFromIntError) -> Self {
        RetiffError::BigTiffRequired
    }
}

/// A non-fatal condition encountered while reading a file.
///
/// Warnings never abort an operation; they are accumulated on
/// [`crate::model::TiffInfo::warnings`] for the caller to inspect or log.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// An unknown tag used a datatype code this implementation does not
    /// recognize at all; the entry was dropped rather than preserved.
    UnknownTagUnknownDatatype { ifd_offset: u64, tag: u16, datatype_code: u16 },
    /// An ASCII tag's payload was not valid UTF-8; the raw bytes are kept
    /// verbatim for round-trip but decoding falls back to a lossy display.
    InvalidAsciiUtf8 { ifd_offset: u64, tag: u16 },
    /// A GeoKeyDirectory entry referenced a key ID this implementation does
    /// not have a descriptor for.
    UnknownGeoKey { key_id: u16 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownTagUnknownDatatype {
                ifd_offset,
                tag,
                datatype_code,
            } => write!(
                f,
                "dropped tag 0x{tag:04x} in IFD at {ifd_offset}: unrecognized datatype code {datatype_code}"
            ),
            Warning::InvalidAsciiUtf8 { ifd_offset, tag } => write!(
                f,
                "tag 0x{tag:04x} in IFD at {ifd_offset} is not valid UTF-8; kept as raw bytes"
            ),
            Warning::UnknownGeoKey { key_id } => {
                write!(f, "GeoKeyDirectory references unknown GeoKey {key_id}")
            }
        }
    }
}

/// Result alias used throughout the crate.
pub type RetiffResult<T> = Result<T, RetiffError>;
