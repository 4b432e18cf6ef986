use succinct_file::SuccinctFileConfig;

fn main() {
    // This example shows how to build and query a succinct full-text index.

    let index = SuccinctFileConfig::new()
        .sample_rate(4)
        .build(b"mississippi")
        .unwrap();

    let query = b"issi";
    assert_eq!(index.count(query), 2);

    for position in index.search(query) {
        println!("Found query at position {position}.");
    }

    let extracted = index.extract(1, 4).unwrap();
    println!("T[1..5) = {}", String::from_utf8_lossy(&extracted));
}
