//! Durable encoding of evaluated dependency graphs.
//!
//! Evaluating a large build description is expensive; this crate persists
//! the fully-evaluated result so a later run can replay it instead. The
//! graph and its variable expressions are flattened into an index-based
//! record form ([GraphRecord]), written through one of two front ends over
//! the same records:
//!
//! - [write_compact] / [read_compact]: compact binary, not human-readable.
//! - [write_text] / [read_text]: structured text, larger but inspectable.
//!
//! [flatten] and [build] expose the record conversion itself. Decoding is
//! all-or-nothing: any [DecodeError] aborts the whole load, since a graph
//! with missing edges or corrupt values is unsafe to build from. Files
//! carry no version header; encodings from incompatible schema revisions
//! must not be mixed.

mod build;
mod compact;
mod errors;
mod expr;
mod flatten;
mod pool;
mod schema;
pub mod stats;
mod text;

#[cfg(test)]
mod tests;

pub use build::build;
pub use compact::{read_compact, write_compact};
pub use errors::DecodeError;
pub use flatten::flatten;
pub use schema::{GraphRecord, NodeRecord, ScopedVarRecord, ValueRecord};
pub use text::{read_text, write_text};
