use succinct_file::{IndexedFile, SuccinctFile, SuccinctFileConfig};
use succinct_file::regex::Regex;

#[test]
fn mississippi_issi() {
    let index = SuccinctFileConfig::new()
        .sample_rate(4)
        .build(b"mississippi")
        .unwrap();

    assert_eq!(index.count(b"issi"), 2);
    assert_eq!(index.search(b"issi"), vec![1, 4]);
}

#[test]
fn abracadabra_a() {
    let index = SuccinctFile::build(b"abracadabra").unwrap();

    assert_eq!(index.count(b"a"), 5);
    assert_eq!(index.search(b"a"), vec![0, 3, 5, 7, 10]);
    assert_eq!(index.extract(7, 4).unwrap(), b"abra");
}

#[test]
fn banana_an_plus_regex() {
    let index = SuccinctFile::build(b"banana").unwrap();
    let pattern = Regex::new("an+").unwrap();

    let matches: Vec<(usize, usize)> = pattern
        .find_all(&index)
        .into_iter()
        .map(|m| (m.start, m.len))
        .collect();

    assert_eq!(matches, vec![(1, 2), (3, 2)]);
}

#[test]
fn aaaaaa_aa() {
    let index = SuccinctFile::build(b"aaaaaa").unwrap();

    assert_eq!(index.count(b"aa"), 5);
    assert_eq!(index.search(b"aa"), vec![0, 1, 2, 3, 4]);
}

#[test]
fn quick_brown_fox() {
    let index = SuccinctFile::build(b"The quick brown fox").unwrap();

    assert_eq!(index.count(b"quick"), 1);
    assert_eq!(index.search(b"quick"), vec![4]);
    assert_eq!(index.extract(4, 5).unwrap(), b"quick");
    assert_eq!(index.extract_until(0, b' ').unwrap(), b"The");
}

#[test]
fn build_serialize_deserialize_reruns_identically() {
    let text: &[u8] = b"mississippi";
    let built = SuccinctFile::build(text).unwrap();
    let bytes = built.to_bytes();
    let restored = SuccinctFile::from_bytes(&bytes).unwrap();

    assert_eq!(restored.count(b"issi"), built.count(b"issi"));
    assert_eq!(restored.search(b"issi"), built.search(b"issi"));

    let original = SuccinctFile::build(b"abracadabra").unwrap();
    let original_bytes = original.to_bytes();
    let restored2 = SuccinctFile::from_bytes(&original_bytes).unwrap();
    assert_eq!(restored2.count(b"a"), 5);
    assert_eq!(restored2.search(b"a"), vec![0, 3, 5, 7, 10]);
    assert_eq!(restored2.extract(7, 4).unwrap(), b"abra");

    let banana = SuccinctFile::build(b"banana").unwrap();
    let banana_bytes = banana.to_bytes();
    let restored3 = SuccinctFile::from_bytes(&banana_bytes).unwrap();
    let pattern = Regex::new("an+").unwrap();
    let matches: Vec<(usize, usize)> = pattern
        .find_all(&restored3)
        .into_iter()
        .map(|m| (m.start, m.len))
        .collect();
    assert_eq!(matches, vec![(1, 2), (3, 2)]);

    let aaaaaa = SuccinctFile::build(b"aaaaaa").unwrap();
    let aaaaaa_bytes = aaaaaa.to_bytes();
    let restored4 = SuccinctFile::from_bytes(&aaaaaa_bytes).unwrap();
    assert_eq!(restored4.count(b"aa"), 5);
    assert_eq!(restored4.search(b"aa"), vec![0, 1, 2, 3, 4]);
}

#[test]
fn indexed_file_record_layer() {
    let text = b"apple\nbanana\napplesauce";
    let file = IndexedFile::build(text, b'\n').unwrap();

    assert_eq!(file.num_records(), 3);
    assert_eq!(file.search_records(b"apple").unwrap(), vec![(0, 0), (2, 0)]);
}
