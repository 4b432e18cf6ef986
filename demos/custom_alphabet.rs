use succinct_file::SuccinctFile;
use succinct_file::regex::Regex;

fn main() {
    // This example shows that the index is derived over the full byte
    // alphabet actually present in the text, and demonstrates regex search.

    let text = b"banana";
    let index = SuccinctFile::build(text).unwrap();
    println!("alphabet: {:?}", index.alphabet());

    let pattern = Regex::new("an+").unwrap();
    for m in pattern.find_all(&index) {
        println!("Found \"an+\" at {}, length {}.", m.start, m.len);
    }
}
