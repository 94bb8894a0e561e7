use std::io::Read;

use maku_cache::GraphRecord;

/// Reads a compact-encoded graph from stdin and prints it in the
/// structured-text form, so a cached graph can be inspected without
/// re-running the evaluator.
fn main() {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .expect("failed to read from stdin");

    match postcard::from_bytes::<GraphRecord>(&buf) {
        Ok(record) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&record).expect("unable to serialize")
            );
        }
        Err(e) => eprintln!("unable to parse graph: {:#?}", e),
    }
}
