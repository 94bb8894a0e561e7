//! Variable assignment operators and value provenance.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// The global variable table of one evaluated build description.
///
/// Every entry must be variable-bearing (see [Value::is_variable]); the
/// evaluator guarantees this on construction and the graph codec enforces
/// it when a table is rebuilt from disk.
pub type Vars = BTreeMap<String, Value>;

/// Assignment operator of a target-specific variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssignOp {
    /// `:=`, value expanded at assignment time.
    Simple,
    /// `=`, value expanded at reference time.
    Recursive,
    /// `+=`, appends to the previous value.
    Append,
    /// `?=`, assigns only if the variable is unset.
    Conditional,
}

impl AssignOp {
    pub fn token(&self) -> &'static str {
        match self {
            AssignOp::Simple => ":=",
            AssignOp::Recursive => "=",
            AssignOp::Append => "+=",
            AssignOp::Conditional => "?=",
        }
    }

    pub fn from_token(token: &str) -> Option<AssignOp> {
        match token {
            ":=" => Some(AssignOp::Simple),
            "=" => Some(AssignOp::Recursive),
            "+=" => Some(AssignOp::Append),
            "?=" => Some(AssignOp::Conditional),
            _ => None,
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How a variable's value was established.
///
/// The vocabulary follows what `$(origin)` reports. Tags outside of it are
/// preserved verbatim in [Origin::Other] rather than rejected, so a graph
/// written by an evaluator with a richer origin set still round-trips.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    Undefined,
    Default,
    Environment,
    EnvironmentOverride,
    File,
    CommandLine,
    Override,
    Automatic,
    Other(String),
}

impl Origin {
    pub fn as_str(&self) -> &str {
        match self {
            Origin::Undefined => "undefined",
            Origin::Default => "default",
            Origin::Environment => "environment",
            Origin::EnvironmentOverride => "environment override",
            Origin::File => "file",
            Origin::CommandLine => "command line",
            Origin::Override => "override",
            Origin::Automatic => "automatic",
            Origin::Other(tag) => tag,
        }
    }

    /// Total; an unknown tag becomes [Origin::Other].
    pub fn from_tag(tag: &str) -> Origin {
        match tag {
            "undefined" => Origin::Undefined,
            "default" => Origin::Default,
            "environment" => Origin::Environment,
            "environment override" => Origin::EnvironmentOverride,
            "file" => Origin::File,
            "command line" => Origin::CommandLine,
            "override" => Origin::Override,
            "automatic" => Origin::Automatic,
            _ => Origin::Other(tag.to_string()),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
