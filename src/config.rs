//! Builder-style configuration for constructing a [`SuccinctFile`](crate::succinct_file::SuccinctFile).

use crate::error::{Result, SuccinctFileError};
use crate::succinct_file::SuccinctFile;

/// A builder-like API to configure and construct a [`SuccinctFile`].
///
/// Mirrors the canonical construction path named in spec §9: exactly one
/// byte-slice entry point (`build`), with any non-byte input adapted to
/// bytes before reaching it.
#[derive(Debug, Clone, Copy)]
pub struct SuccinctFileConfig {
    sample_rate: usize,
}

impl SuccinctFileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample rate `s` (spec §3/§4.4). Every `s`-th entry of `SA`/`ISA`
    /// is retained; the rest are recovered by walking LF/ψ. Must be a
    /// positive power of two. Default is `32`.
    pub fn sample_rate(mut self, sample_rate: usize) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Builds the index over `text`.
    pub fn build(self, text: &[u8]) -> Result<SuccinctFile> {
        if self.sample_rate == 0 || !self.sample_rate.is_power_of_two() {
            return Err(SuccinctFileError::Build(format!(
                "sample rate must be a positive power of two, got {}",
                self.sample_rate
            )));
        }

        SuccinctFile::build_with_rate(text, self.sample_rate)
    }
}

impl Default for SuccinctFileConfig {
    fn default() -> Self {
        Self { sample_rate: 32 }
    }
}
