//! Suffix array construction.
//!
//! Builds `SA`, `ISA`, and the BWT column `L` for a byte text `T` of length
//! `n`, over the `n + 1` suffixes of the sentinel-terminated string `T$`
//! (spec §3). The sentinel is a unique symbol smaller than every byte, kept
//! as an explicit row (never dropped): this is what stops backward search
//! from wrapping past the start of the text and reporting phantom matches
//! that splice the end of `T` to its beginning. Row `0` always holds the
//! sentinel's own (empty) suffix.
//!
//! The algorithm is prefix doubling (Manber & Myers, 1990): `O(n log n)`
//! rounds of rank refinement, each pass's sort done in parallel with
//! `rayon` since the rank comparator is a pure function of two already
//! computed rank arrays -- the same place the teacher crate turns to
//! `rayon` for embarrassingly parallel work during construction.

use rayon::slice::ParallelSliceMut;

/// The suffix array, inverse suffix array, and BWT column, each of length
/// `n + 1` (one row per suffix of the sentinel-terminated text).
pub struct SuffixArrayData {
    /// `SA[0..=n]`, a permutation of `[0, n]`. `SA[0] == n` always (the
    /// sentinel's own suffix sorts first).
    pub sa: Vec<u32>,
    /// `ISA[SA[i]] = i`.
    pub isa: Vec<u32>,
    /// `L[i]` is the byte immediately preceding `SA[i]` in `T`, or `None`
    /// at the one row where that predecessor is the sentinel (`SA[i] == 0`).
    pub bwt: Vec<Option<u8>>,
}

/// Builds the suffix array data for `text`. `text.len()` must fit in `u32`.
pub fn build(text: &[u8]) -> SuffixArrayData {
    let n = text.len();
    assert!(
        n < u32::MAX as usize - 1,
        "text too large for u32-indexed suffix array"
    );

    // augmented alphabet: sentinel maps to 0, byte b maps to b as u32 + 1
    let augmented: Vec<u32> = text.iter().map(|&b| b as u32 + 1).chain([0]).collect();

    let sa = doubling_suffix_array(&augmented);
    debug_assert_eq!(sa[0] as usize, n);

    let mut isa = vec![0u32; n + 1];
    for (i, &p) in sa.iter().enumerate() {
        isa[p as usize] = i as u32;
    }

    let bwt: Vec<Option<u8>> = sa
        .iter()
        .map(|&p| {
            if p == 0 {
                None
            } else {
                Some(text[p as usize - 1])
            }
        })
        .collect();

    SuffixArrayData { sa, isa, bwt }
}

fn doubling_suffix_array(s: &[u32]) -> Vec<u32> {
    let n = s.len();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<i64> = s.iter().map(|&x| x as i64).collect();
    let mut tmp = vec![0i64; n];

    let mut k = 1usize;
    while k < n {
        let cmp_key = |i: usize| -> (i64, i64) {
            let first = rank[i];
            let second = if i + k < n { rank[i + k] } else { -1 };
            (first, second)
        };

        sa.par_sort_by(|&a, &b| {
            cmp_key(a as usize)
                .cmp(&cmp_key(b as usize))
                .then(a.cmp(&b))
        });

        tmp[sa[0] as usize] = 0;
        for i in 1..n {
            let prev_key = cmp_key(sa[i - 1] as usize);
            let cur_key = cmp_key(sa[i] as usize);
            let bump = if prev_key == cur_key { 0 } else { 1 };
            tmp[sa[i] as usize] = tmp[sa[i - 1] as usize] + bump;
        }

        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }

        k *= 2;
    }

    sa
}

/// Computes the suffix array of `text$` by direct comparison,
/// `O(n^2 log n)`. Used only to cross-check [`build`] in tests.
#[cfg(test)]
pub(crate) fn naive_suffix_array(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    let mut order: Vec<u32> = (0..=n as u32).collect();

    order.sort_by(|&a, &b| {
        let sa: Vec<u16> = text[a as usize..]
            .iter()
            .map(|&b| b as u16 + 1)
            .chain([0])
            .collect();
        let sb: Vec<u16> = text[b as usize..]
            .iter()
            .map(|&b| b as u16 + 1)
            .chain([0])
            .collect();
        sa.cmp(&sb)
    });

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_from_str(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[test]
    fn mississippi() {
        let text = text_from_str("mississippi");
        let data = build(&text);

        assert_eq!(data.sa, naive_suffix_array(&text));
        assert_eq!(data.sa[0] as usize, text.len());
    }

    #[test]
    fn isa_is_inverse_of_sa() {
        let text = text_from_str("banana");
        let data = build(&text);

        for i in 0..=text.len() {
            assert_eq!(data.sa[data.isa[i] as usize] as usize, i);
            assert_eq!(data.isa[data.sa[i] as usize] as usize, i);
        }
    }

    #[test]
    fn bwt_matches_definition() {
        let text = text_from_str("abracadabra");
        let data = build(&text);

        for (i, &p) in data.sa.iter().enumerate() {
            let expected = if p == 0 { None } else { Some(text[p as usize - 1]) };
            assert_eq!(data.bwt[i], expected);
        }
    }

    #[test]
    fn sentinel_row_has_no_wraparound_predecessor() {
        // the row for SA[i] == 0 must report `None`, never a real byte
        // borrowed from the end of the text -- that borrowing is exactly
        // the bug that lets backward search wrap past the text boundary.
        let text = text_from_str("ab");
        let data = build(&text);
        let sentinel_row = data.isa[0] as usize;
        assert_eq!(data.bwt[sentinel_row], None);
    }

    #[test]
    fn single_symbol_text() {
        let text = vec![b'a'; 5];
        let data = build(&text);
        assert_eq!(data.sa, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn empty_text() {
        let data = build(&[]);
        assert_eq!(data.sa, vec![0]);
        assert_eq!(data.isa, vec![0]);
        assert_eq!(data.bwt, vec![None]);
    }

    proptest::proptest! {
        #[test]
        fn matches_naive_on_random_text(
            text in proptest::collection::vec(0u8..4, 0..200)
        ) {
            let data = build(&text);
            let expected = naive_suffix_array(&text);
            proptest::prop_assert_eq!(data.sa, expected);
        }
    }
}
