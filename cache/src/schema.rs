//! The flat, index-based record form of a dependency graph.
//!
//! Everything here is plain data with serde derives; both front ends
//! serialize these records as-is. No field is ever skipped during
//! serialization, since the compact front end is positional and must see
//! the same layout the text front end does.

use std::collections::BTreeMap;

use bstr::BString;
use serde::{Deserialize, Serialize};

/// One node of a serialized expression tree: a tag, a scalar payload
/// (`text` and, for variable forms, `origin`), and the encoded children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub tag: String,
    #[serde(with = "text_repr")]
    pub text: BString,
    pub origin: String,
    pub children: Vec<ValueRecord>,
}

impl ValueRecord {
    /// Total payload bytes in this record tree. Diagnostics only.
    pub fn deep_size(&self) -> usize {
        self.tag.len()
            + self.text.len()
            + self.origin.len()
            + self
                .children
                .iter()
                .map(ValueRecord::deep_size)
                .sum::<usize>()
    }
}

/// Text payloads are strings in spirit but not guaranteed UTF-8. Writing
/// them as serde bytes unconditionally would make the text form print
/// every payload as a number array, so emit a string where possible and
/// raw bytes otherwise. `BString`'s own deserializer accepts both shapes.
mod text_repr {
    use bstr::{BString, ByteSlice};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(text: &BString, ser: S) -> Result<S::Ok, S::Error> {
        match text.to_str() {
            Ok(s) => ser.serialize_str(s),
            Err(_) => ser.serialize_bytes(text),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<BString, D::Error> {
        BString::deserialize(de)
    }
}

/// One build rule, with every cross-reference reduced to an index: target
/// references into [GraphRecord::targets], scoped-variable references into
/// [GraphRecord::scoped_vars].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub output: u32,
    pub cmds: Vec<String>,
    pub deps: Vec<u32>,
    pub has_rule: bool,
    pub is_order_only: bool,
    pub is_phony: bool,
    pub actual_inputs: Vec<u32>,
    pub scoped_vars: Vec<u32>,
    pub filename: String,
    pub lineno: u32,
}

/// One slot of the target-specific variable pool. Structurally identical
/// assignments share a slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedVarRecord {
    pub name: String,
    pub value: ValueRecord,
}

/// A whole serialized graph: node records in visit order, the global
/// variable table, the scoped-variable pool, and the target string pool.
///
/// Every index stored anywhere in here must be in range for the pool it
/// references; [crate::build] verifies that and fails with
/// [crate::DecodeError::DanglingReference] otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub nodes: Vec<NodeRecord>,
    pub vars: BTreeMap<String, ValueRecord>,
    pub scoped_vars: Vec<ScopedVarRecord>,
    pub targets: Vec<String>,
}
