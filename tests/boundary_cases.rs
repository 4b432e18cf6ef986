use std::cmp::Ordering;
use succinct_file::{SuccinctFile, SuccinctFileConfig};

#[test]
fn empty_text_has_no_matches() {
    let index = SuccinctFile::build(b"").unwrap();
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.count(b""), 0);
    assert_eq!(index.count(b"x"), 0);
    assert!(index.search(b"x").is_empty());
}

#[test]
fn empty_pattern_counts_every_position() {
    let index = SuccinctFile::build(b"banana").unwrap();
    assert_eq!(index.count(b""), 6);
}

#[test]
fn pattern_longer_than_text_never_matches() {
    let index = SuccinctFile::build(b"ab").unwrap();
    assert_eq!(index.count(b"abcde"), 0);
}

#[test]
fn single_character_text() {
    let index = SuccinctFile::build(b"x").unwrap();
    assert_eq!(index.count(b"x"), 1);
    assert_eq!(index.search(b"x"), vec![0]);
    assert_eq!(index.extract(0, 1).unwrap(), b"x");
}

#[test]
fn extract_out_of_bounds_errors() {
    let index = SuccinctFile::build(b"abcdef").unwrap();
    assert!(index.extract(5, 5).is_err());
    assert!(index.extract(7, 0).is_err());
    assert!(index.char_at(6).is_err());
}

#[test]
fn rejects_non_power_of_two_sample_rate() {
    let result = SuccinctFileConfig::new().sample_rate(5).build(b"abc");
    assert!(result.is_err());
}

#[test]
fn rejects_zero_sample_rate() {
    let result = SuccinctFileConfig::new().sample_rate(0).build(b"abc");
    assert!(result.is_err());
}

#[test]
fn compare_handles_prefix_and_out_of_bounds() {
    let index = SuccinctFile::build(b"banana").unwrap();
    assert_eq!(index.compare(0, b"ban").unwrap(), Ordering::Equal);
    assert_eq!(index.compare(0, b"banana!").unwrap(), Ordering::Less);
    assert!(index.compare(10, b"x").is_err());
}

#[test]
fn full_alphabet_byte_text() {
    let text: Vec<u8> = (0u8..=255).collect();
    let index = SuccinctFile::build(&text).unwrap();
    assert_eq!(index.count(&[10, 11, 12]), 1);
    assert_eq!(index.search(&[10, 11, 12]), vec![10]);
}

#[test]
fn sample_rate_does_not_change_query_results() {
    let text = b"mississippi river mississippi";
    for &rate in &[1usize, 2, 8, 32] {
        let index = SuccinctFileConfig::new()
            .sample_rate(rate)
            .build(text)
            .unwrap();
        assert_eq!(index.count(b"issi"), 4, "rate={rate}");
        assert_eq!(index.search(b"issi"), vec![1, 4, 19, 22], "rate={rate}");
    }
}
