use succinct_file::IndexedFile;

fn main() {
    // This example shows the record-oriented IndexedFile wrapper, which adds
    // record-boundary bookkeeping on top of a SuccinctFile.

    let text = b"apple\nbanana\napplesauce";
    let file = IndexedFile::build(text, b'\n').unwrap();

    assert_eq!(file.num_records(), 3);

    for (record_id, offset) in file.search_records(b"apple").unwrap() {
        println!("Found \"apple\" in record {record_id} at offset {offset}.");
    }

    assert!(file.same_record(0, 2).unwrap());
    assert!(!file.same_record(0, 10).unwrap());
}
