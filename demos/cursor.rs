use succinct_file::SuccinctFile;

fn main() {
    // This example shows how to extend a backward search one character at a
    // time instead of searching a whole pattern at once.

    let index = SuccinctFile::build(b"GTGTGT").unwrap();

    let mut range = index.bwd_search(b"GT");
    assert_eq!(range.end - range.start, 3);

    // Extend the currently matched query by a symbol to its left.
    range = index.continue_bwd_search(range, b'T');
    assert_eq!(range.end - range.start, 2);

    let mut positions: Vec<usize> = range.map(|i| index.lookup_sa(i)).collect();
    positions.sort_unstable();
    println!("Found \"TGT\" at positions {positions:?}.");
}
