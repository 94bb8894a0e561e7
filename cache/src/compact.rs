//! The compact binary front end.
//!
//! Carries the flat records through `postcard`: positional, canonical,
//! small, not meant for human eyes. Transport only: the record layout is
//! shared with the text front end and all schema semantics live in
//! [crate::flatten] and [crate::build].

use std::io;
use std::path::Path;

use maku_eval::{DepGraph, Vars};

use crate::build::build;
use crate::errors::DecodeError;
use crate::flatten::flatten;
use crate::schema::GraphRecord;
use crate::stats;

/// Serialize a record to its compact byte form.
pub(crate) fn to_bytes(record: &GraphRecord) -> io::Result<Vec<u8>> {
    postcard::to_allocvec(record).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write the compact encoding of `graph` and `vars` to `path`.
pub fn write_compact(graph: &DepGraph, vars: &Vars, path: impl AsRef<Path>) -> io::Result<()> {
    let bytes = to_bytes(&flatten(graph, vars))?;
    std::fs::write(path, bytes)
}

/// Load a graph from its compact encoding at `path`.
pub fn read_compact(path: impl AsRef<Path>) -> Result<(DepGraph, Vars), DecodeError> {
    let bytes = std::fs::read(path)?;
    let record: GraphRecord = postcard::from_bytes(&bytes)?;
    stats::log_report(&record);
    build(&record)
}
