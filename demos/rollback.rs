//! Queue a batch with a doomed append, watch the engine put everything
//! back. Run with `cargo run --example rollback`.

use std::fs;

use testyard::logging::LogSink;
use testyard::types::request::WriteOptions;
use testyard::types::rooted::RootedPath;
use testyard::WriteEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempfile::tempdir()?;
    let root = td.path();
    fs::write(root.join("notes.txt"), "hello")?;

    let mut engine = WriteEngine::new(LogSink, LogSink);
    engine.queue_write(
        RootedPath::from_rooted(root, &root.join("fresh.txt"))?,
        "brand new",
        WriteOptions::default(),
    );
    engine.queue_append(
        RootedPath::from_rooted(root, &root.join("notes.txt"))?,
        "-world",
        WriteOptions::default(),
    );
    // This target does not exist, so the whole batch must come undone.
    engine.queue_append(
        RootedPath::from_rooted(root, &root.join("ghost.txt"))?,
        "never",
        WriteOptions::default(),
    );

    match engine.flush() {
        Ok(_) => eprintln!("unexpected: batch committed"),
        Err(e) => eprintln!("batch failed as planned: {e}"),
    }

    assert_eq!(fs::read_to_string(root.join("notes.txt"))?, "hello");
    assert!(!root.join("fresh.txt").exists());
    eprintln!("pre-batch state is intact");
    Ok(())
}
