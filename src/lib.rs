//! `retiff`: a tag-preserving reader, writer and rewrite toolkit for
//! classic TIFF and BigTIFF files.
//!
//! This crate is not an image codec. It never decodes, re-encodes or
//! otherwise interprets pixel sample data; strip and tile payload bytes
//! are copied verbatim between files. What it does do is parse the full
//! IFD/SubIFD tree of a TIFF file — including tags this crate has never
//! heard of — into an in-memory [`model::TiffInfo`], let that tree be
//! inspected or rewritten, and re-emit it as a compact, fully
//! self-consistent file that contains no data unreachable from its own
//! directory structure.
//!
//! # Related links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - the TIFF 6.0 specification
//! * <https://www.awaresystems.be/imaging/tiff/bigtiff.html> - the BigTIFF extension

pub mod api;
pub mod error;
pub mod model;
pub mod ops;
pub mod reader;
pub mod registry;
pub mod types;
pub mod writer;

pub use api::{read_tiff, write_tiff};
pub use error::{FormatError, RetiffError, RetiffResult, UsageError, Warning};
pub use model::{ByteSource, DecodedValue, EntryValue, FileSource, Ifd, MemorySource, TagEntry, TiffInfo};
pub use registry::{Resolved, TagDescriptor, TagSet};
pub use types::{ByteOrder, Datatype};
pub use writer::WriterOptions;
