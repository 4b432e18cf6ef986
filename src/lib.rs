//! A compressed full-text self-index: build it once from a byte slice, then
//! count, locate, extract, and regex-search against it without ever
//! materializing the original text again.
//!
//! ```
//! use succinct_file::SuccinctFileConfig;
//!
//! let index = SuccinctFileConfig::new()
//!     .sample_rate(4)
//!     .build(b"mississippi")
//!     .unwrap();
//!
//! assert_eq!(index.count(b"issi"), 2);
//! assert_eq!(index.search(b"issi"), vec![1, 4]);
//! assert_eq!(index.extract(1, 4).unwrap(), b"issi");
//! ```
//!
//! # Layout
//!
//! - [`bitpack`] -- fixed-width integer packing, the storage primitive for
//!   every other structure.
//! - [`rank_select`] -- O(1) rank/select over a plain bit vector.
//! - [`wavelet`] -- a wavelet tree over the Burrows-Wheeler transform.
//! - [`sais`] -- suffix array / BWT construction.
//! - [`sampled_sa`] -- compressed SA/ISA sampling.
//! - [`succinct_file`] -- the `SuccinctFile` index itself: navigation,
//!   search, extraction, serialization.
//! - [`regex`] -- regular expression search directly over suffix-array
//!   ranges.
//! - [`indexed_file`] -- a thin record-offset layer over `SuccinctFile` for
//!   line- or record-oriented text.
//! - [`config`] -- the builder used to construct a `SuccinctFile`.
//! - [`error`] -- the crate's error type.

pub mod bitpack;
pub mod config;
pub mod error;
pub mod indexed_file;
pub mod rank_select;
pub mod regex;
pub mod sais;
pub mod sampled_sa;
pub mod succinct_file;
pub mod wavelet;

pub use config::SuccinctFileConfig;
pub use error::{RegexParseError, Result, SuccinctFileError};
pub use indexed_file::IndexedFile;
pub use succinct_file::SuccinctFile;
