//! Two-level rank/select dictionary over a plain bit vector.
//!
//! Superblocks of `SUPERBLOCK_BITS` store absolute popcounts; blocks of
//! `BLOCK_BITS` store popcounts relative to their superblock. The final
//! sub-block scan uses hardware popcount. Space overhead stays close to 25%
//! of the raw bit vector, and both queries are O(1).

const BLOCK_BITS: usize = 512;
const SUPERBLOCK_BITS: usize = 2048;
const WORDS_PER_BLOCK: usize = BLOCK_BITS / 64;

/// A bit vector equipped with O(1) `rank1`/`select1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSelectDict {
    words: Vec<u64>,
    len: usize,
    ones: usize,
    // absolute count of ones before each superblock
    superblock_counts: Vec<u64>,
    // count of ones before each block, relative to its superblock
    block_counts: Vec<u16>,
}

impl RankSelectDict {
    /// Builds the directories over a bit vector of `len` bits, given as
    /// 64-bit words in the same MSB-first convention as [`crate::bitpack`].
    pub fn new(words: Vec<u64>, len: usize) -> Self {
        let num_blocks = len.div_ceil(BLOCK_BITS);
        let num_superblocks = len.div_ceil(SUPERBLOCK_BITS);

        let mut superblock_counts = Vec::with_capacity(num_superblocks + 1);
        let mut block_counts = Vec::with_capacity(num_blocks);

        let mut running_total: u64 = 0;
        let mut running_in_superblock: u64 = 0;

        for block_idx in 0..num_blocks {
            if block_idx % (SUPERBLOCK_BITS / BLOCK_BITS) == 0 {
                superblock_counts.push(running_total);
                running_in_superblock = 0;
            }

            block_counts.push(running_in_superblock as u16);

            let word_start = block_idx * WORDS_PER_BLOCK;
            let word_end = (word_start + WORDS_PER_BLOCK).min(words.len());
            let popcount: u32 = words[word_start..word_end]
                .iter()
                .map(|w| w.count_ones())
                .sum();

            running_total += popcount as u64;
            running_in_superblock += popcount as u64;
        }

        let ones = running_total as usize;

        Self {
            words,
            len,
            ones,
            superblock_counts,
            block_counts,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of set bits.
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Raw backing words, same MSB-first convention as [`crate::bitpack`].
    pub fn raw_words(&self) -> &[u64] {
        &self.words
    }

    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        let word = self.words[i / 64];
        (word >> (63 - i % 64)) & 1 == 1
    }

    /// Number of set bits in `[0, i)`. O(1).
    pub fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len, "rank index out of range");

        if i == 0 {
            return 0;
        }

        let block_idx = (i - 1) / BLOCK_BITS;
        let superblock_idx = block_idx / (SUPERBLOCK_BITS / BLOCK_BITS);

        let mut count =
            self.superblock_counts[superblock_idx] as usize + self.block_counts[block_idx] as usize;

        let block_start_bit = block_idx * BLOCK_BITS;
        let word_start = block_start_bit / 64;
        let full_words = (i - block_start_bit) / 64;

        for w in &self.words[word_start..word_start + full_words] {
            count += w.count_ones() as usize;
        }

        let remaining_bits = (i - block_start_bit) % 64;
        if remaining_bits > 0 {
            let word = self.words[word_start + full_words];
            let mask = !0u64 << (64 - remaining_bits);
            count += (word & mask).count_ones() as usize;
        }

        count
    }

    /// Position of the `k`-th (0-indexed) set bit, or `None` if fewer than
    /// `k + 1` bits are set.
    pub fn select1(&self, k: usize) -> Option<usize> {
        if k >= self.ones {
            return None;
        }

        let target = (k + 1) as u64;

        // binary search over superblocks for the last one with count < target
        let mut lo = 0usize;
        let mut hi = self.superblock_counts.len();
        while lo + 1 < hi {
            let mid = (lo + hi) / 2;
            if self.superblock_counts[mid] < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let superblock_idx = lo;
        let blocks_per_superblock = SUPERBLOCK_BITS / BLOCK_BITS;
        let block_range_start = superblock_idx * blocks_per_superblock;
        let block_range_end = (block_range_start + blocks_per_superblock).min(self.block_counts.len());

        let remaining_in_superblock = target - self.superblock_counts[superblock_idx];

        // linear scan over the (small, constant-size) block directory within the superblock
        let mut block_idx = block_range_start;
        for idx in block_range_start..block_range_end {
            if (self.block_counts[idx] as u64) < remaining_in_superblock {
                block_idx = idx;
            } else {
                break;
            }
        }

        let remaining_in_block = remaining_in_superblock - self.block_counts[block_idx] as u64;

        let block_start_bit = block_idx * BLOCK_BITS;
        let word_start = block_start_bit / 64;
        let word_end = (word_start + WORDS_PER_BLOCK).min(self.words.len());

        let mut remaining = remaining_in_block;
        for (offset, &word) in self.words[word_start..word_end].iter().enumerate() {
            let popcount = word.count_ones() as u64;
            if remaining <= popcount {
                let bit_in_word = select_in_word(word, remaining as u32 - 1);
                return Some((word_start + offset) * 64 + bit_in_word as usize);
            }
            remaining -= popcount;
        }

        None
    }
}

/// Position (0-indexed, MSB-first within the word) of the `k`-th set bit of `word`.
fn select_in_word(word: u64, k: u32) -> u32 {
    let mut remaining = k;
    let mut word = word;
    for bit in 0..64u32 {
        let mask = 1u64 << (63 - bit);
        if word & mask != 0 {
            if remaining == 0 {
                return bit;
            }
            remaining -= 1;
        }
    }
    unreachable!("select index exceeded popcount of word: {word:#018x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_from_bools(bits: &[bool]) -> RankSelectDict {
        let len = bits.len();
        let num_words = len.div_ceil(64);
        let mut words = vec![0u64; num_words];

        for (i, &b) in bits.iter().enumerate() {
            if b {
                words[i / 64] |= 1u64 << (63 - i % 64);
            }
        }

        RankSelectDict::new(words, len)
    }

    #[test]
    fn rank_matches_naive() {
        let bits: Vec<bool> = (0..5000).map(|i| i % 7 == 0 || i % 13 == 0).collect();
        let dict = build_from_bools(&bits);

        let mut running = 0usize;
        for i in 0..=bits.len() {
            assert_eq!(dict.rank1(i), running, "mismatch at i={i}");
            if i < bits.len() && bits[i] {
                running += 1;
            }
        }
    }

    #[test]
    fn select_matches_naive() {
        let bits: Vec<bool> = (0..5000).map(|i| i % 7 == 0 || i % 13 == 0).collect();
        let dict = build_from_bools(&bits);

        let positions: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(i, _)| i)
            .collect();

        for (k, &pos) in positions.iter().enumerate() {
            assert_eq!(dict.select1(k), Some(pos));
        }

        assert_eq!(dict.select1(positions.len()), None);
    }

    #[test]
    fn empty_and_boundary() {
        let dict = build_from_bools(&[]);
        assert_eq!(dict.rank1(0), 0);
        assert_eq!(dict.select1(0), None);

        let all_ones = build_from_bools(&vec![true; 130]);
        assert_eq!(all_ones.rank1(130), 130);
        assert_eq!(all_ones.select1(129), Some(129));
    }

    #[test]
    fn crosses_superblock_boundary() {
        let n = SUPERBLOCK_BITS * 3 + 17;
        let bits: Vec<bool> = (0..n).map(|i| i % 3 == 0).collect();
        let dict = build_from_bools(&bits);

        assert_eq!(dict.rank1(n), bits.iter().filter(|&&b| b).count());
        assert_eq!(dict.rank1(SUPERBLOCK_BITS), (0..SUPERBLOCK_BITS).filter(|i| i % 3 == 0).count());
    }
}
