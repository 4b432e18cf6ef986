//! The core self-index: a bidirectional FM-index over a single byte text.
//!
//! `SuccinctFile` ties together the suffix array construction (`sais`), the
//! rank/select-equipped wavelet tree over the BWT (`wavelet`), and the
//! sampled SA/ISA (`sampled_sa`) into the navigation primitives (`LF`, `ψ`)
//! and the search/extract/serialize surface described by the module.
//!
//! Internally every array (SA, ISA, BWT, the wavelet tree) covers `n + 1`
//! rows: a sentinel row for the unique symbol smaller than every byte,
//! never dropped. Backward search never asks for that symbol (no real
//! pattern byte can equal it), so it sits inertly at the bottom of the SA
//! order -- but it is what stops the LF/ψ recurrences from wrapping a match
//! past the start of the text and splicing the end of `T` onto its
//! beginning. `len()` and every public offset still refer to the `n`
//! original bytes; the sentinel row is purely an internal bookkeeping
//! device.
//!
//! Construction also builds a second wavelet tree over the BWT of the
//! reversed text. This mirrors the bidirectional-index layout the teacher
//! crate uses for its own forward/backward cursors: extending a match to the
//! right (`fwd_search`) is exactly backward search over the reversed text,
//! fed the pattern in its original left-to-right order.

use std::cmp::Ordering;
use std::ops::Range;

use tracing::{debug, info};

use crate::error::{Result, SuccinctFileError};
use crate::sais;
use crate::sampled_sa::SampledSuffixArray;
use crate::wavelet::WaveletTree;

const MAGIC: &[u8; 4] = b"SFI1";

/// A compressed, queryable self-index over an immutable byte text.
///
/// Every query method takes `&self`: once built, an index is read-only and
/// safe to share across threads.
#[derive(Debug)]
pub struct SuccinctFile {
    n: usize,
    alphabet: Vec<u8>,
    cum_counts: Vec<u64>,
    wavelet: WaveletTree,
    sampled: SampledSuffixArray,
    rev_wavelet: WaveletTree,
    rev_sampled: SampledSuffixArray,
    rate: usize,
}

/// A half-open range `[lo, hi)` of suffix-array rows matching some pattern.
/// `lo >= hi` means no match.
pub type SaRange = Range<usize>;

impl SuccinctFile {
    /// Builds an index over `text` with the default sample rate (`32`).
    ///
    /// For more control over the space/time tradeoff use
    /// [`crate::config::SuccinctFileConfig`].
    pub fn build(text: &[u8]) -> Result<Self> {
        Self::build_with_rate(text, 32)
    }

    pub(crate) fn build_with_rate(text: &[u8], rate: usize) -> Result<Self> {
        if text.len() >= u32::MAX as usize {
            return Err(SuccinctFileError::Build(format!(
                "text of {} bytes exceeds the maximum indexable size",
                text.len()
            )));
        }

        info!(n = text.len(), rate, "building succinct file index");

        let n = text.len();

        let mut alphabet: Vec<u8> = text.to_vec();
        alphabet.sort_unstable();
        alphabet.dedup();
        let sigma = alphabet.len();
        debug!(sigma, "derived alphabet");

        let cum_counts = build_cum_counts(text, &alphabet);

        let forward_data = sais::build(text);
        let wavelet = build_wavelet(&forward_data.bwt, &alphabet, sigma);
        let sampled = SampledSuffixArray::build(&forward_data.sa, &forward_data.isa, rate);

        let reversed: Vec<u8> = text.iter().rev().copied().collect();
        let rev_data = sais::build(&reversed);
        let rev_wavelet = build_wavelet(&rev_data.bwt, &alphabet, sigma);
        let rev_sampled = SampledSuffixArray::build(&rev_data.sa, &rev_data.isa, rate);

        debug!("index construction complete");

        Ok(Self {
            n,
            alphabet,
            cum_counts,
            wavelet,
            sampled,
            rev_wavelet,
            rev_sampled,
            rate,
        })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn sample_rate(&self) -> usize {
        self.rate
    }

    /// The distinct bytes occurring in the text, in sorted order.
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    /// Number of suffix-array rows, `n + 1` (the `+ 1` is the sentinel row).
    fn total_rows(&self) -> usize {
        self.wavelet.len()
    }

    /// Dense symbol for a real text byte. `0` is reserved for the sentinel,
    /// so real bytes are never assigned it -- a pattern can never match the
    /// sentinel row.
    fn dense(&self, byte: u8) -> Option<u16> {
        dense_of(&self.alphabet, byte).map(|d| (d + 1) as u16)
    }

    // ---- forward (primary) navigation -------------------------------

    /// `LF(i)`: the array index whose suffix-array value is one less than
    /// `SA[i]` (the sentinel row guarantees this is always well-defined).
    pub fn lookup_lf(&self, i: usize) -> usize {
        lf_step(&self.wavelet, &self.cum_counts, i)
    }

    /// `ψ(i)`: the array index whose suffix-array value is one more than
    /// `SA[i]`.
    pub fn lookup_psi(&self, i: usize) -> usize {
        psi_step(&self.wavelet, &self.cum_counts, i)
    }

    /// Recovers `SA[i]`, the text offset at suffix-array row `i`. Only
    /// rows outside the sentinel's own (internal) row resolve to an
    /// offset `<= n`; those are the only ones a real match ever visits.
    pub fn lookup_sa(&self, i: usize) -> usize {
        recover_sa(&self.wavelet, &self.cum_counts, &self.sampled, i)
    }

    /// Recovers `ISA[p]`, the suffix-array row of the suffix starting at
    /// text offset `p` (`p` may be `n`, the one-past-the-end sentinel
    /// position, which always resolves to row `0`).
    pub fn lookup_isa(&self, p: usize) -> usize {
        recover_isa(&self.wavelet, &self.cum_counts, &self.sampled, p)
    }

    /// Extends a backward-search range by prepending `c`.
    pub fn continue_bwd_search(&self, range: SaRange, c: u8) -> SaRange {
        continue_search(&self.wavelet, &self.cum_counts, self.dense(c), range)
    }

    /// Backward search for `pattern`: the SA range of suffixes carrying it
    /// as a prefix, matched right to left.
    pub fn bwd_search(&self, pattern: &[u8]) -> SaRange {
        let mut range = 0..self.total_rows();
        for &c in pattern.iter().rev() {
            range = self.continue_bwd_search(range, c);
            if range.start >= range.end {
                break;
            }
        }
        range
    }

    // ---- reverse-text navigation, used for forward extension --------

    fn rev_lookup_sa(&self, i: usize) -> usize {
        recover_sa(&self.rev_wavelet, &self.cum_counts, &self.rev_sampled, i)
    }

    /// Extends a forward-search range by appending `c`.
    pub fn continue_fwd_search(&self, range: SaRange, c: u8) -> SaRange {
        continue_search(&self.rev_wavelet, &self.cum_counts, self.dense(c), range)
    }

    /// Forward search for `pattern`, matched left to right via the reverse
    /// text's backward search. The returned range indexes the reverse
    /// text's suffix array; convert a row to a text offset with
    /// [`Self::fwd_range_to_positions`].
    pub fn fwd_search(&self, pattern: &[u8]) -> SaRange {
        let mut range = 0..self.total_rows();
        for &c in pattern {
            range = self.continue_fwd_search(range, c);
            if range.start >= range.end {
                break;
            }
        }
        range
    }

    /// Converts a `fwd_search` range (rows of the reverse text's SA) for a
    /// pattern of length `pattern_len` into original-text start offsets.
    pub fn fwd_range_to_positions(&self, range: SaRange, pattern_len: usize) -> Vec<usize> {
        range
            .map(|i| {
                let rev_offset = self.rev_lookup_sa(i);
                self.n - rev_offset - pattern_len
            })
            .collect()
    }

    // ---- counting and locating ---------------------------------------

    /// Number of occurrences of `pattern` in the text. The empty pattern
    /// occurs once at every position.
    pub fn count(&self, pattern: &[u8]) -> usize {
        if pattern.is_empty() {
            return self.n;
        }
        let range = self.bwd_search(pattern);
        range.end.saturating_sub(range.start)
    }

    /// The SA range spanning every suffix `>= lo_pat` and `< ` the
    /// successor of `hi_pat` -- i.e. every suffix that has `lo_pat` as a
    /// prefix or sorts after it, up through the last suffix carrying
    /// `hi_pat` as a prefix. Two `bwd_search` calls, one per bound.
    pub fn range_search(&self, lo_pat: &[u8], hi_pat: &[u8]) -> SaRange {
        let lo = self.bwd_search(lo_pat);
        let hi = self.bwd_search(hi_pat);
        lo.start..hi.end
    }

    /// All occurrence offsets of `pattern`, ascending. The empty pattern
    /// occurs once at every position.
    pub fn search(&self, pattern: &[u8]) -> Vec<usize> {
        if pattern.is_empty() {
            return (0..self.n).collect();
        }
        let range = self.bwd_search(pattern);
        let mut hits: Vec<usize> = range.map(|i| self.lookup_sa(i)).collect();
        hits.sort_unstable();
        hits
    }

    /// Occurrence offsets of `pattern`, yielded lazily in suffix-array
    /// order (not sorted by text position). The empty pattern yields
    /// every position once, excluding the sentinel row's own offset `n`.
    pub fn search_iterator<'a>(&'a self, pattern: &[u8]) -> SearchIter<'a> {
        if pattern.is_empty() {
            return SearchIter {
                file: self,
                range: 0..self.total_rows(),
                exclude_offset: Some(self.n),
            };
        }
        let range = self.bwd_search(pattern);
        SearchIter {
            file: self,
            range,
            exclude_offset: None,
        }
    }

    /// Whether offsets `a` and `b` fall in the same record. The core index
    /// has no record boundaries, so this is always `true`;
    /// [`crate::indexed_file::IndexedFile::same_record`] overrides it with
    /// its own record-start array.
    pub fn same_record(&self, _a: usize, _b: usize) -> bool {
        true
    }

    // ---- extraction ----------------------------------------------------

    /// Reads `len` bytes of the original text starting at `start`.
    pub fn extract(&self, start: usize, len: usize) -> Result<Vec<u8>> {
        let end = start.checked_add(len);
        if end.is_none() || end.unwrap() > self.n {
            return Err(SuccinctFileError::RangeOutOfBounds(format!(
                "extract({start}, {len}) exceeds text length {}",
                self.n
            )));
        }
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut j = self.lookup_isa(start + 1);
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            let d = self.wavelet.access(j);
            out.push(self.alphabet[d as usize - 1]);
            j = self.lookup_psi(j);
        }
        Ok(out)
    }

    /// Reads bytes from `start` up to (but excluding) the first occurrence
    /// of `delimiter`, or to the end of the text if none is found.
    pub fn extract_until(&self, start: usize, delimiter: u8) -> Result<Vec<u8>> {
        if start > self.n {
            return Err(SuccinctFileError::RangeOutOfBounds(format!(
                "extract_until start {start} exceeds text length {}",
                self.n
            )));
        }
        if start == self.n {
            return Ok(Vec::new());
        }

        let mut j = self.lookup_isa(start + 1);
        let mut out = Vec::new();
        for _ in 0..(self.n - start) {
            let d = self.wavelet.access(j);
            let byte = self.alphabet[d as usize - 1];
            if byte == delimiter {
                break;
            }
            out.push(byte);
            j = self.lookup_psi(j);
        }
        Ok(out)
    }

    /// The single byte at text offset `p`.
    pub fn char_at(&self, p: usize) -> Result<u8> {
        Ok(self.extract(p, 1)?[0])
    }

    /// Reads a big-endian `u16` starting at byte offset `p`.
    pub fn extract_short(&self, p: usize) -> Result<u16> {
        let bytes = self.extract(p, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a big-endian `u32` starting at byte offset `p`.
    pub fn extract_int(&self, p: usize) -> Result<u32> {
        let bytes = self.extract(p, 4)?;
        Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a big-endian `u64` starting at byte offset `p`.
    pub fn extract_long(&self, p: usize) -> Result<u64> {
        let bytes = self.extract(p, 8)?;
        Ok(u64::from_be_bytes(bytes.try_into().unwrap()))
    }

    /// Lexicographically compares `T[p..]` against `pattern`, treating a
    /// shorter matching prefix as less than a longer one.
    pub fn compare(&self, p: usize, pattern: &[u8]) -> Result<Ordering> {
        if p > self.n {
            return Err(SuccinctFileError::RangeOutOfBounds(format!(
                "compare offset {p} exceeds text length {}",
                self.n
            )));
        }
        let available = self.n - p;
        let take = pattern.len().min(available);
        let slice = self.extract(p, take)?;

        match slice.as_slice().cmp(pattern) {
            Ordering::Equal if available < pattern.len() => Ok(Ordering::Less),
            other => Ok(other),
        }
    }

    // ---- serialization --------------------------------------------------

    /// Serializes the index to its byte-exact wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&(self.n as u64).to_be_bytes());
        out.extend_from_slice(&(self.alphabet.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.alphabet);
        for &c in &self.cum_counts {
            out.extend_from_slice(&c.to_be_bytes());
        }
        out.extend_from_slice(&(self.rate as u32).to_be_bytes());

        self.wavelet.to_bytes(&mut out);
        self.sampled.to_bytes(&mut out);
        self.rev_wavelet.to_bytes(&mut out);
        self.rev_sampled.to_bytes(&mut out);

        out
    }

    /// Reconstructs an index from bytes written by [`Self::to_bytes`].
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut pos = 0usize;

        if buf.len() < MAGIC.len() || &buf[..MAGIC.len()] != MAGIC {
            return Err(SuccinctFileError::Truncated(
                "missing or unrecognized magic header".into(),
            ));
        }
        pos += MAGIC.len();

        let n = read_u64(buf, &mut pos)? as usize;
        let sigma = read_u32(buf, &mut pos)? as usize;

        if pos + sigma > buf.len() {
            return Err(SuccinctFileError::Truncated("alphabet truncated".into()));
        }
        let alphabet = buf[pos..pos + sigma].to_vec();
        pos += sigma;

        // cum_counts covers sigma + 1 dense symbols (sentinel plus the real
        // alphabet), so sigma + 2 prefix-sum entries.
        let mut cum_counts = Vec::with_capacity(sigma + 2);
        for _ in 0..=(sigma + 1) {
            cum_counts.push(read_u64(buf, &mut pos)?);
        }

        let rate = read_u32(buf, &mut pos)? as usize;

        let total_rows = n + 1;
        let sigma_total = (sigma + 1) as u16;
        let wavelet = WaveletTree::from_bytes(buf, &mut pos, sigma_total, total_rows)?;
        let sampled = SampledSuffixArray::from_bytes(buf, &mut pos)?;
        let rev_wavelet = WaveletTree::from_bytes(buf, &mut pos, sigma_total, total_rows)?;
        let rev_sampled = SampledSuffixArray::from_bytes(buf, &mut pos)?;

        Ok(Self {
            n,
            alphabet,
            cum_counts,
            wavelet,
            sampled,
            rev_wavelet,
            rev_sampled,
            rate,
        })
    }
}

/// Lazy, suffix-array-order iterator over occurrence offsets.
pub struct SearchIter<'a> {
    file: &'a SuccinctFile,
    range: SaRange,
    /// The empty-pattern case walks every row, including the sentinel's;
    /// this is the one offset (`n`) to skip when that happens.
    exclude_offset: Option<usize>,
}

impl<'a> Iterator for SearchIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let i = self.range.next()?;
            let offset = self.file.lookup_sa(i);
            if Some(offset) == self.exclude_offset {
                continue;
            }
            return Some(offset);
        }
    }
}

fn dense_of(alphabet: &[u8], byte: u8) -> Option<usize> {
    alphabet.binary_search(&byte).ok()
}

/// Dense-symbol cumulative counts, with symbol `0` reserved for the
/// sentinel (exactly one occurrence) and symbols `1..=sigma` the real
/// alphabet in sorted order.
fn build_cum_counts(text: &[u8], alphabet: &[u8]) -> Vec<u64> {
    let sigma = alphabet.len();
    let mut counts = vec![0u64; sigma];
    for &b in text {
        let d = dense_of(alphabet, b).expect("byte came from text, must be in alphabet");
        counts[d] += 1;
    }

    let mut cum_counts = vec![0u64; sigma + 2];
    cum_counts[1] = 1; // the sentinel occurs exactly once
    for i in 0..sigma {
        cum_counts[i + 2] = cum_counts[i + 1] + counts[i];
    }
    cum_counts
}

/// Builds the wavelet tree over a BWT column, mapping the sentinel marker
/// to dense symbol `0` and real bytes to `1..=alphabet.len()`.
fn build_wavelet(bwt: &[Option<u8>], alphabet: &[u8], sigma: usize) -> WaveletTree {
    let symbols: Vec<u16> = bwt
        .iter()
        .map(|entry| match entry {
            None => 0u16,
            Some(b) => (dense_of(alphabet, *b).expect("BWT byte must be in alphabet") + 1) as u16,
        })
        .collect();
    WaveletTree::build(&symbols, (sigma + 1) as u16)
}

fn lf_step(wavelet: &WaveletTree, cum_counts: &[u64], i: usize) -> usize {
    let c = wavelet.access(i);
    cum_counts[c as usize] as usize + wavelet.rank(c, i)
}

fn psi_step(wavelet: &WaveletTree, cum_counts: &[u64], i: usize) -> usize {
    let c = symbol_of_row(cum_counts, i);
    let offset = i - cum_counts[c as usize] as usize;
    wavelet
        .select(c, offset)
        .expect("psi is well-defined for any valid suffix-array row")
}

/// Finds the dense symbol `c` with `cum_counts[c] <= row < cum_counts[c + 1]`.
fn symbol_of_row(cum_counts: &[u64], row: usize) -> u16 {
    let row = row as u64;
    let mut lo = 0usize;
    let mut hi = cum_counts.len() - 1;
    while lo + 1 < hi {
        let mid = (lo + hi) / 2;
        if cum_counts[mid] <= row {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo as u16
}

fn recover_sa(
    wavelet: &WaveletTree,
    cum_counts: &[u64],
    sampled: &SampledSuffixArray,
    i: usize,
) -> usize {
    if sampled.is_sa_sampled(i) {
        return sampled.sa_sample_at(i);
    }

    let total = wavelet.len();
    let mut cur = i;
    let mut steps = 0usize;
    loop {
        cur = lf_step(wavelet, cum_counts, cur);
        steps += 1;
        if sampled.is_sa_sampled(cur) {
            return (sampled.sa_sample_at(cur) + steps) % total;
        }
        debug_assert!(
            steps <= sampled.rate(),
            "SA recovery exceeded the sample rate bound"
        );
    }
}

fn recover_isa(
    wavelet: &WaveletTree,
    cum_counts: &[u64],
    sampled: &SampledSuffixArray,
    p: usize,
) -> usize {
    let rate = sampled.rate();
    let k = p / rate;
    let steps = p - k * rate;

    let mut cur = sampled.isa_sample(k);
    for _ in 0..steps {
        cur = psi_step(wavelet, cum_counts, cur);
    }
    cur
}

fn continue_search(
    wavelet: &WaveletTree,
    cum_counts: &[u64],
    dense: Option<u16>,
    range: SaRange,
) -> SaRange {
    match dense {
        Some(d) => {
            let base = cum_counts[d as usize] as usize;
            let lo = base + wavelet.rank(d, range.start);
            let hi = base + wavelet.rank(d, range.end);
            lo..hi
        }
        None => 0..0,
    }
}

fn read_u64(buf: &[u8], pos: &mut usize) -> Result<u64> {
    if *pos + 8 > buf.len() {
        return Err(SuccinctFileError::Truncated("expected 8 more bytes".into()));
    }
    let v = u64::from_be_bytes(buf[*pos..*pos + 8].try_into().unwrap());
    *pos += 8;
    Ok(v)
}

fn read_u32(buf: &[u8], pos: &mut usize) -> Result<u32> {
    if *pos + 4 > buf.len() {
        return Err(SuccinctFileError::Truncated("expected 4 more bytes".into()));
    }
    let v = u32::from_be_bytes(buf[*pos..*pos + 4].try_into().unwrap());
    *pos += 4;
    Ok(v)
}
