//! Command operations: pure tree-to-tree transforms over [`crate::model::TiffInfo`].
//!
//! Each operation here is the library-side implementation backing one of
//! the CLI subcommands named in spec §6 (`dump`, `split`, `concat`,
//! `set`). None of them touch pixel samples; they only rearrange,
//! project, merge or edit the IFD/tag tree, leaving the final re-emission
//! to [`crate::writer`].

pub mod concat;
pub mod dump;
pub mod set;
pub mod split;

pub use concat::concat;
pub use dump::{dump, DumpFormat};
pub use set::{apply_directives, Directive};
pub use split::split;
