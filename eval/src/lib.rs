//! Data model of an evaluated Make-style build description.
//!
//! The parser and evaluator populate these structures; this crate only
//! defines them. A [DepGraph] is an arena of [DepNode]s addressed by
//! [NodeId], together with the entry targets in evaluation order. Variable
//! values are [Value] trees, a closed set of expression and variable
//! variants.

pub mod depgraph;
pub mod functions;
pub mod value;
pub mod var;

pub use depgraph::{DepGraph, DepNode, NodeId};
pub use functions::FuncDef;
pub use value::Value;
pub use var::{AssignOp, Origin, Vars};
