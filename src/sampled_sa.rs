//! Compressed SA/ISA sampling (spec §4.5).
//!
//! Two different sampling schemes are used for the two lookup directions,
//! both storing roughly `n / rate` entries:
//!
//! * `sampled_isa[k] = ISA[k * rate]`, a direct stride over **text
//!   position**. Looking up `ISA[p]` picks the nearest stored `k * rate`
//!   and walks psi/LF the exactly-known `|p - k*rate| < rate` steps.
//! * SA recovery is the dual problem: given an **array index** `i`, find
//!   the nearest array index reachable by repeated LF steps whose `SA`
//!   value is already known. Rather than re-deriving that index from an
//!   arbitrary stride over array positions (which does not bound the walk
//!   by `rate` in general), positions are marked at construction time by
//!   *text-position* divisibility (`SA[i] % rate == 0`) in a
//!   [`RankSelectDict`], with the actual `SA[i]` values of marked rows
//!   stored densely alongside. Walking LF from any `i` is then guaranteed
//!   to hit a marked row within `rate` steps, since `SA[i], SA[i]-1, ...`
//!   covers `rate` consecutive integers and exactly one is `≡ 0 (mod
//!   rate)`.

use crate::bitpack::BitPackedArray;
use crate::error::{Result, SuccinctFileError};
use crate::rank_select::RankSelectDict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledSuffixArray {
    sampled_isa: BitPackedArray,
    sa_sample_marks: RankSelectDict,
    sa_sample_values: BitPackedArray,
    rate: usize,
}

impl SampledSuffixArray {
    /// Builds the sampled arrays at rate `s` from the full `SA`/`ISA`.
    pub fn build(sa: &[u32], isa: &[u32], rate: usize) -> Self {
        assert!(rate > 0, "sample rate must be positive");

        let n = sa.len();
        let width = BitPackedArray::width_for_max_value(n as u64);

        let num_isa_samples = n.div_ceil(rate);
        let mut sampled_isa = BitPackedArray::new(num_isa_samples, width);
        for k in 0..num_isa_samples {
            sampled_isa.set_val(k, isa[k * rate] as u64);
        }

        let num_words = n.div_ceil(64);
        let mut mark_words = vec![0u64; num_words];
        let mut num_marks = 0usize;

        for (i, &value) in sa.iter().enumerate() {
            if value as usize % rate == 0 {
                mark_words[i / 64] |= 1u64 << (63 - i % 64);
                num_marks += 1;
            }
        }

        let sa_sample_marks = RankSelectDict::new(mark_words, n);

        let mut sa_sample_values = BitPackedArray::new(num_marks, width);
        let mut write_idx = 0;
        for &value in sa.iter() {
            if value as usize % rate == 0 {
                sa_sample_values.set_val(write_idx, value as u64);
                write_idx += 1;
            }
        }

        Self {
            sampled_isa,
            sa_sample_marks,
            sa_sample_values,
            rate,
        }
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    /// `ISA[k * rate]`.
    pub fn isa_sample(&self, k: usize) -> usize {
        self.sampled_isa.get_val(k) as usize
    }

    pub fn num_isa_samples(&self) -> usize {
        self.sampled_isa.len()
    }

    pub fn is_sa_sampled(&self, array_index: usize) -> bool {
        self.sa_sample_marks.get(array_index)
    }

    /// The known `SA` value at a marked array index. Panics if not marked.
    pub fn sa_sample_at(&self, array_index: usize) -> usize {
        debug_assert!(self.is_sa_sampled(array_index));
        let rank = self.sa_sample_marks.rank1(array_index);
        self.sa_sample_values.get_val(rank) as usize
    }

    pub fn sampled_isa_words(&self) -> &BitPackedArray {
        &self.sampled_isa
    }

    pub fn sa_sample_marks(&self) -> &RankSelectDict {
        &self.sa_sample_marks
    }

    pub fn sa_sample_values(&self) -> &BitPackedArray {
        &self.sa_sample_values
    }

    pub fn from_parts(
        sampled_isa: BitPackedArray,
        sa_sample_marks: RankSelectDict,
        sa_sample_values: BitPackedArray,
        rate: usize,
    ) -> Self {
        Self {
            sampled_isa,
            sa_sample_marks,
            sa_sample_values,
            rate,
        }
    }

    pub fn to_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.rate as u64).to_be_bytes());
        write_bit_packed(&self.sampled_isa, out);
        out.extend_from_slice(&(self.sa_sample_marks.len() as u64).to_be_bytes());
        let mark_words = self.sa_sample_marks.raw_words();
        out.extend_from_slice(&(mark_words.len() as u64).to_be_bytes());
        for w in mark_words {
            out.extend_from_slice(&w.to_be_bytes());
        }
        write_bit_packed(&self.sa_sample_values, out);
    }

    pub fn from_bytes(buf: &[u8], pos: &mut usize) -> Result<Self> {
        let rate = read_u64(buf, pos)? as usize;
        let sampled_isa = read_bit_packed(buf, pos)?;

        let mark_len = read_u64(buf, pos)? as usize;
        let num_mark_words = read_u64(buf, pos)? as usize;
        if *pos + num_mark_words * 8 > buf.len() {
            return Err(SuccinctFileError::Truncated(
                "SA sample mark bit vector truncated".into(),
            ));
        }
        let mut mark_words = Vec::with_capacity(num_mark_words);
        for _ in 0..num_mark_words {
            mark_words.push(read_u64(buf, pos)?);
        }
        let sa_sample_marks = RankSelectDict::new(mark_words, mark_len);

        let sa_sample_values = read_bit_packed(buf, pos)?;

        Ok(Self {
            sampled_isa,
            sa_sample_marks,
            sa_sample_values,
            rate,
        })
    }
}

fn write_bit_packed(arr: &BitPackedArray, out: &mut Vec<u8>) {
    out.extend_from_slice(&(arr.len() as u64).to_be_bytes());
    out.extend_from_slice(&arr.width().to_be_bytes());
    let words = arr.raw_words();
    out.extend_from_slice(&(words.len() as u64).to_be_bytes());
    for w in words {
        out.extend_from_slice(&w.to_be_bytes());
    }
}

fn read_bit_packed(buf: &[u8], pos: &mut usize) -> Result<BitPackedArray> {
    let len = read_u64(buf, pos)? as usize;
    let width = read_u32(buf, pos)?;
    let num_words = read_u64(buf, pos)? as usize;
    if *pos + num_words * 8 > buf.len() {
        return Err(SuccinctFileError::Truncated(
            "bit-packed array truncated".into(),
        ));
    }
    let mut words = Vec::with_capacity(num_words);
    for _ in 0..num_words {
        words.push(read_u64(buf, pos)?);
    }
    Ok(BitPackedArray::from_raw_words(words, len, width))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sais;

    #[test]
    fn samples_match_full_arrays() {
        let text = b"mississippi".to_vec();
        let data = sais::build(&text);

        for &rate in &[1usize, 2, 4, 8] {
            let sampled = SampledSuffixArray::build(&data.sa, &data.isa, rate);

            for k in 0..sampled.num_isa_samples() {
                assert_eq!(sampled.isa_sample(k), data.isa[k * rate] as usize);
            }

            for (i, &value) in data.sa.iter().enumerate() {
                if value as usize % rate == 0 {
                    assert!(sampled.is_sa_sampled(i));
                    assert_eq!(sampled.sa_sample_at(i), value as usize);
                }
            }
        }
    }

    #[test]
    fn serialize_roundtrip() {
        let text = b"abracadabra".to_vec();
        let data = sais::build(&text);
        let sampled = SampledSuffixArray::build(&data.sa, &data.isa, 4);

        let mut bytes = Vec::new();
        sampled.to_bytes(&mut bytes);

        let mut pos = 0;
        let restored = SampledSuffixArray::from_bytes(&bytes, &mut pos).unwrap();
        assert_eq!(pos, bytes.len());
        assert_eq!(restored.rate(), 4);

        for i in 0..data.sa.len() {
            assert_eq!(restored.is_sa_sampled(i), sampled.is_sa_sampled(i));
            if restored.is_sa_sampled(i) {
                assert_eq!(restored.sa_sample_at(i), sampled.sa_sample_at(i));
            }
        }
        for k in 0..sampled.num_isa_samples() {
            assert_eq!(restored.isa_sample(k), sampled.isa_sample(k));
        }
    }
}
