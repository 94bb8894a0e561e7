//! The structured-text front end.
//!
//! The same flat records as the compact form, written as pretty-printed
//! JSON with two-space indentation so that two encodings of similar
//! graphs diff cleanly. Larger than the compact form, but inspectable
//! with ordinary text tooling.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use maku_eval::{DepGraph, Vars};

use crate::build::build;
use crate::errors::DecodeError;
use crate::flatten::flatten;
use crate::schema::GraphRecord;
use crate::stats;

/// Write the structured-text encoding of `graph` and `vars` to `path`.
pub fn write_text(graph: &DepGraph, vars: &Vars, path: impl AsRef<Path>) -> io::Result<()> {
    let record = flatten(graph, vars);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &record)?;
    writer.flush()
}

/// Load a graph from its structured-text encoding at `path`.
pub fn read_text(path: impl AsRef<Path>) -> Result<(DepGraph, Vars), DecodeError> {
    let reader = BufReader::new(File::open(path)?);
    let record: GraphRecord = serde_json::from_reader(reader)?;
    stats::log_report(&record);
    build(&record)
}
