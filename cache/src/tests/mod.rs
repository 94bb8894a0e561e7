//! Whole-pipeline tests: flatten, build, and both front ends over one
//! realistic graph.

use std::fs;

use maku_eval::functions::lookup;
use maku_eval::{AssignOp, DepGraph, DepNode, Origin, Value, Vars};
use pretty_assertions::assert_eq;

use crate::compact::to_bytes;
use crate::{build, flatten, read_compact, read_text, write_compact, write_text};

/// A small but representative graph: a phony `all`, a linked program, two
/// object files sharing a compiler-flag assignment, and leaf sources that
/// exist only as actual inputs. The globals exercise every value variant.
fn sample() -> (DepGraph, Vars) {
    let mut graph = DepGraph::new();

    let cflags = Value::target_scoped(
        AssignOp::Append,
        Value::immediate("-O2 -Wall", Origin::File),
    );

    let mut main_o = DepNode::new("main.o");
    main_o.cmds = vec!["$(CC) $(CFLAGS) -c main.c".to_string()];
    main_o.has_rule = true;
    main_o.actual_inputs = vec!["main.c".to_string(), "util.h".to_string()];
    main_o.target_vars.insert("CFLAGS".to_string(), cflags.clone());
    main_o.filename = "Makefile".to_string();
    main_o.lineno = 14;
    let main_o = graph.add_node(main_o);

    let mut util_o = DepNode::new("util.o");
    util_o.cmds = vec!["$(CC) $(CFLAGS) -c util.c".to_string()];
    util_o.has_rule = true;
    util_o.actual_inputs = vec!["util.c".to_string(), "util.h".to_string()];
    util_o.target_vars.insert("CFLAGS".to_string(), cflags);
    util_o.filename = "Makefile".to_string();
    util_o.lineno = 17;
    let util_o = graph.add_node(util_o);

    let mut prog = DepNode::new("prog");
    prog.cmds = vec!["$(CC) -o $@ $^".to_string()];
    prog.deps = vec![main_o, util_o];
    prog.has_rule = true;
    prog.target_vars.insert(
        "LDFLAGS".to_string(),
        Value::target_scoped(AssignOp::Simple, Value::immediate("-lm", Origin::File)),
    );
    prog.filename = "Makefile".to_string();
    prog.lineno = 10;
    let prog = graph.add_node(prog);

    let mut all = DepNode::new("all");
    all.deps = vec![prog];
    all.is_phony = true;
    all.has_rule = true;
    all.filename = "Makefile".to_string();
    all.lineno = 1;
    let all = graph.add_node(all);

    graph.add_root(all);

    let mut vars = Vars::new();
    vars.insert(
        "CC".to_string(),
        Value::immediate("gcc", Origin::Environment),
    );
    vars.insert(
        "OBJS".to_string(),
        Value::deferred(
            Value::Call {
                func: lookup("patsubst").unwrap(),
                args: vec![
                    Value::literal("%.c"),
                    Value::literal("%.o"),
                    Value::VarRef(Box::new(Value::literal("SRCS"))),
                ],
            },
            Origin::File,
        ),
    );
    vars.insert(
        "LINKLINE".to_string(),
        Value::deferred(
            Value::Concat(vec![
                Value::literal("ld "),
                Value::Substitution {
                    name: Box::new(Value::literal("OBJS")),
                    pattern: Box::new(Value::literal("%.o")),
                    subst: Box::new(Value::literal("%.lo")),
                },
                Value::Scratch((&b" \xffpartial"[..]).into()),
                Value::ParamRef(1),
                Value::EvalAssign {
                    lhs: "seen".to_string(),
                    op: ":=".to_string(),
                    rhs: Box::new(Value::literal("1")),
                },
                Value::Opaque("$(shell date)".to_string()),
            ]),
            Origin::CommandLine,
        ),
    );
    vars.insert(
        "EXTRA".to_string(),
        Value::target_scoped(
            AssignOp::Conditional,
            Value::deferred(Value::literal("-g"), Origin::Override),
        ),
    );

    (graph, vars)
}

#[test]
fn flatten_then_build_preserves_structure() {
    let (graph, vars) = sample();
    let record = flatten(&graph, &vars);

    let (rebuilt, rebuilt_vars) = build(&record).expect("must build");

    assert_eq!(vars, rebuilt_vars);
    // Structural equality via the canonical record form: re-flattening the
    // rebuilt graph must reproduce the records exactly.
    assert_eq!(record, flatten(&rebuilt, &rebuilt_vars));
    assert_eq!(4, rebuilt.len());
}

#[test]
fn reencoding_is_byte_identical() {
    let (graph, vars) = sample();
    let first = to_bytes(&flatten(&graph, &vars)).expect("must serialize");

    let (rebuilt, rebuilt_vars) =
        build(&postcard::from_bytes(&first).expect("must deserialize")).expect("must build");
    let second = to_bytes(&flatten(&rebuilt, &rebuilt_vars)).expect("must serialize");

    assert_eq!(first, second);
}

#[test]
fn compact_file_roundtrip() {
    let (graph, vars) = sample();
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("graph.mk.bin");
    let second = dir.path().join("graph2.mk.bin");

    write_compact(&graph, &vars, &first).expect("must write");
    let (rebuilt, rebuilt_vars) = read_compact(&first).expect("must read");

    assert_eq!(vars, rebuilt_vars);
    assert_eq!(flatten(&graph, &vars), flatten(&rebuilt, &rebuilt_vars));

    write_compact(&rebuilt, &rebuilt_vars, &second).expect("must write");
    assert_eq!(
        fs::read(&first).expect("must read back"),
        fs::read(&second).expect("must read back")
    );
}

#[test]
fn text_file_roundtrip() {
    let (graph, vars) = sample();
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("graph.mk.json");
    let second = dir.path().join("graph2.mk.json");

    write_text(&graph, &vars, &first).expect("must write");
    let (rebuilt, rebuilt_vars) = read_text(&first).expect("must read");

    assert_eq!(vars, rebuilt_vars);
    assert_eq!(flatten(&graph, &vars), flatten(&rebuilt, &rebuilt_vars));

    write_text(&rebuilt, &rebuilt_vars, &second).expect("must write");
    assert_eq!(
        fs::read(&first).expect("must read back"),
        fs::read(&second).expect("must read back")
    );
}

#[test]
fn text_form_is_indented_with_two_spaces() {
    let (graph, vars) = sample();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("graph.mk.json");

    write_text(&graph, &vars, &path).expect("must write");
    let text = fs::read_to_string(&path).expect("must read back");

    assert!(text.starts_with("{\n  \""), "got: {}", &text[..20.min(text.len())]);
    assert!(text.contains("\n  \"targets\""));
}

#[test]
fn both_front_ends_agree() {
    let (graph, vars) = sample();
    let dir = tempfile::tempdir().expect("tempdir");
    let compact = dir.path().join("graph.mk.bin");
    let text = dir.path().join("graph.mk.json");

    write_compact(&graph, &vars, &compact).expect("must write");
    write_text(&graph, &vars, &text).expect("must write");

    let (from_compact, vars_compact) = read_compact(&compact).expect("must read");
    let (from_text, vars_text) = read_text(&text).expect("must read");

    assert_eq!(vars_compact, vars_text);
    assert_eq!(
        flatten(&from_compact, &vars_compact),
        flatten(&from_text, &vars_text)
    );
}

#[test]
fn diamond_scenario_shares_the_rebuilt_node() {
    // a -> [b, c], c -> [b]: three records, pool in first-seen order, and
    // after the rebuild both parents hold the same node for "b".
    let mut graph = DepGraph::new();
    let a = graph.add_node(DepNode::new("a"));
    let b = graph.add_node(DepNode::new("b"));
    let c = graph.add_node(DepNode::new("c"));
    graph.node_mut(a).deps = vec![b, c];
    graph.node_mut(c).deps = vec![b];
    graph.add_root(a);

    let record = flatten(&graph, &Vars::new());
    assert_eq!(3, record.nodes.len());
    assert_eq!(vec!["a", "b", "c"], record.targets);

    let (rebuilt, _) = build(&record).expect("must build");
    let a = rebuilt.roots()[0];
    let c = rebuilt.roots()[2];
    assert_eq!("a", rebuilt.node(a).output);
    assert_eq!(
        vec!["b", "c"],
        rebuilt
            .node(a)
            .deps
            .iter()
            .map(|&d| rebuilt.node(d).output.as_str())
            .collect::<Vec<_>>()
    );
    assert_eq!(rebuilt.node(a).deps[0], rebuilt.node(c).deps[0]);
}

#[test]
fn cyclic_graph_roundtrips() {
    let mut graph = DepGraph::new();
    let a = graph.add_node(DepNode::new("a"));
    let b = graph.add_node(DepNode::new("b"));
    graph.node_mut(a).deps = vec![b];
    graph.node_mut(b).deps = vec![a];
    graph.add_root(a);

    let record = flatten(&graph, &Vars::new());
    let (rebuilt, _) = build(&record).expect("must build");

    let a = rebuilt.roots()[0];
    let b = rebuilt.node(a).deps[0];
    assert_eq!("b", rebuilt.node(b).output);
    assert_eq!(vec![a], rebuilt.node(b).deps);
    assert_eq!(record, flatten(&rebuilt, &Vars::new()));
}
