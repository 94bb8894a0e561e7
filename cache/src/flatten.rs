//! Flattening: one depth-first walk that turns the node arena into flat
//! records, interning targets and deduplicating scoped variables as it
//! goes.

use std::collections::BTreeMap;

use maku_eval::{DepGraph, NodeId, Value, Vars};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::expr::encode_value;
use crate::pool::TargetPool;
use crate::schema::{GraphRecord, NodeRecord, ScopedVarRecord, ValueRecord};

#[derive(Default)]
struct Flattener {
    nodes: Vec<NodeRecord>,
    targets: TargetPool,
    scoped: Vec<ScopedVarRecord>,
    scoped_ids: FxHashMap<Vec<u8>, u32>,
    emitted: FxHashSet<u32>,
}

impl Flattener {
    /// Pool slot for one (name, assignment) pair. Two assignments share a
    /// slot exactly when their encoded records are byte-identical.
    fn scoped_var(&mut self, name: &str, value: &Value) -> u32 {
        let record = ScopedVarRecord {
            name: name.to_string(),
            value: encode_value(value),
        };
        // The canonical compact encoding doubles as the equality key.
        // Plain data records cannot fail to serialize.
        let key = postcard::to_allocvec(&record).expect("pool record must serialize");
        if let Some(&id) = self.scoped_ids.get(&key) {
            return id;
        }
        let id = self.scoped.len() as u32;
        self.scoped_ids.insert(key, id);
        self.scoped.push(record);
        id
    }

    /// Emit one record per node reachable from `roots`, in depth-first
    /// visit order: a node first, then its dependencies.
    ///
    /// The visited set is keyed by output target, so diamond sharing emits
    /// a single record and a back-edge never re-enters a node; the walk
    /// terminates on any input. An explicit frame stack keeps long
    /// dependency chains off the call stack.
    fn emit(&mut self, graph: &DepGraph) {
        let mut stack: Vec<std::slice::Iter<'_, NodeId>> = vec![graph.roots().iter()];
        while let Some(frame) = stack.last_mut() {
            let Some(&id) = frame.next() else {
                stack.pop();
                continue;
            };
            let node = graph.node(id);
            let output = self.targets.intern(&node.output);
            if !self.emitted.insert(output) {
                continue;
            }

            // Dependencies and inputs are interned even when the target
            // has no node record of its own (a leaf source file).
            let deps = node
                .deps
                .iter()
                .map(|&dep| self.targets.intern(&graph.node(dep).output))
                .collect();
            let actual_inputs = node
                .actual_inputs
                .iter()
                .map(|input| self.targets.intern(input))
                .collect();
            let scoped_vars = node
                .target_vars
                .iter()
                .map(|(name, value)| self.scoped_var(name, value))
                .collect();

            self.nodes.push(NodeRecord {
                output,
                cmds: node.cmds.clone(),
                deps,
                has_rule: node.has_rule,
                is_order_only: node.is_order_only,
                is_phony: node.is_phony,
                actual_inputs,
                scoped_vars,
                filename: node.filename.clone(),
                lineno: node.lineno,
            });
            stack.push(node.deps.iter());
        }
    }
}

/// Flatten a graph and its global variable table into one [GraphRecord].
///
/// Record order is the visit order of the walk; dependency indices may
/// point forward or backward in the node array. Scoped-variable names are
/// taken in the map's lexicographic order, so structurally identical
/// graphs flatten to identical records.
pub fn flatten(graph: &DepGraph, vars: &Vars) -> GraphRecord {
    let mut flattener = Flattener::default();
    flattener.emit(graph);

    let vars: BTreeMap<String, ValueRecord> = vars
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect();

    GraphRecord {
        nodes: flattener.nodes,
        vars,
        scoped_vars: flattener.scoped,
        targets: flattener.targets.into_strings(),
    }
}
