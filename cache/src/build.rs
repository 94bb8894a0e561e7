//! Rebuilding: flat records back into a node arena and variable table.

use maku_eval::{DepGraph, DepNode, NodeId, Value, Vars};
use rustc_hash::FxHashMap;

use crate::errors::DecodeError;
use crate::expr::decode_var;
use crate::schema::GraphRecord;

fn resolve_target<'a>(
    targets: &'a [String],
    index: u32,
    what: &str,
) -> Result<&'a str, DecodeError> {
    targets
        .get(index as usize)
        .map(String::as_str)
        .ok_or_else(|| {
            DecodeError::DanglingReference(format!(
                "{what} index {index} is outside the target pool of {}",
                targets.len()
            ))
        })
}

/// Rebuild the graph and global variable table from one [GraphRecord].
///
/// Nodes are materialized for every record before any dependency edge is
/// wired, so edges may reference records in either direction. A dependency
/// on a target with no node record is a genuine error, not a forward
/// reference, and fails with [DecodeError::DanglingReference].
pub fn build(record: &GraphRecord) -> Result<(DepGraph, Vars), DecodeError> {
    // Decode each pool slot once; every node referencing a slot gets a
    // copy of the same decoded value.
    let scoped: Vec<(String, Value)> = record
        .scoped_vars
        .iter()
        .map(|slot| Ok((slot.name.clone(), decode_var(&slot.value)?)))
        .collect::<Result<_, DecodeError>>()?;

    // First pass: materialize every node and register it by target.
    let mut graph = DepGraph::new();
    let mut ids: Vec<NodeId> = Vec::with_capacity(record.nodes.len());
    let mut by_target: FxHashMap<&str, NodeId> = FxHashMap::default();
    for node_record in &record.nodes {
        let output = resolve_target(&record.targets, node_record.output, "node output")?;

        let mut node = DepNode::new(output);
        node.cmds = node_record.cmds.clone();
        node.has_rule = node_record.has_rule;
        node.is_order_only = node_record.is_order_only;
        node.is_phony = node_record.is_phony;
        node.filename = node_record.filename.clone();
        node.lineno = node_record.lineno;
        for &input in &node_record.actual_inputs {
            node.actual_inputs
                .push(resolve_target(&record.targets, input, "actual input")?.to_string());
        }
        for &slot in &node_record.scoped_vars {
            let (name, value) = scoped.get(slot as usize).ok_or_else(|| {
                DecodeError::DanglingReference(format!(
                    "scoped-variable index {slot} is outside the pool of {}",
                    scoped.len()
                ))
            })?;
            node.target_vars.insert(name.clone(), value.clone());
        }

        let id = graph.add_node(node);
        graph.add_root(id);
        ids.push(id);
        by_target.insert(output, id);
    }

    // Second pass: wire dependency edges through the target lookup built
    // above. This is what makes forward references work.
    for (node_record, &id) in record.nodes.iter().zip(&ids) {
        for &dep in &node_record.deps {
            let target = resolve_target(&record.targets, dep, "dependency")?;
            let dep_id = by_target.get(target).copied().ok_or_else(|| {
                DecodeError::DanglingReference(format!(
                    "dependency target `{target}` has no node record"
                ))
            })?;
            graph.node_mut(id).deps.push(dep_id);
        }
    }

    // Globals decode independently of the node passes.
    let mut vars = Vars::new();
    for (name, value_record) in &record.vars {
        vars.insert(name.clone(), decode_var(value_record)?);
    }

    Ok((graph, vars))
}
