//! The registry of builtin functions.
//!
//! Function calls in a variable expression carry a reference into this
//! table. It is populated once, read-only afterwards; the codec uses it to
//! recover a [FuncDef] from a serialized function name, the evaluator uses
//! the arity data when expanding a call.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// Descriptor of one builtin function.
#[derive(Debug, PartialEq, Eq)]
pub struct FuncDef {
    pub name: &'static str,
    /// Fewest arguments the function accepts.
    pub min_args: usize,
    /// Most arguments the function accepts; `None` means variadic.
    pub max_args: Option<usize>,
}

const fn fixed(name: &'static str, args: usize) -> FuncDef {
    FuncDef {
        name,
        min_args: args,
        max_args: Some(args),
    }
}

const fn variadic(name: &'static str, min_args: usize) -> FuncDef {
    FuncDef {
        name,
        min_args,
        max_args: None,
    }
}

static FUNCS: &[FuncDef] = &[
    fixed("patsubst", 3),
    fixed("strip", 1),
    fixed("subst", 3),
    fixed("findstring", 2),
    fixed("filter", 2),
    fixed("filter-out", 2),
    fixed("sort", 1),
    fixed("word", 2),
    fixed("wordlist", 3),
    fixed("words", 1),
    fixed("firstword", 1),
    fixed("lastword", 1),
    fixed("join", 2),
    fixed("wildcard", 1),
    fixed("dir", 1),
    fixed("notdir", 1),
    fixed("suffix", 1),
    fixed("basename", 1),
    fixed("addsuffix", 2),
    fixed("addprefix", 2),
    fixed("realpath", 1),
    fixed("abspath", 1),
    FuncDef {
        name: "if",
        min_args: 2,
        max_args: Some(3),
    },
    variadic("and", 1),
    variadic("or", 1),
    fixed("value", 1),
    fixed("eval", 1),
    fixed("shell", 1),
    variadic("call", 1),
    fixed("foreach", 3),
    fixed("origin", 1),
    fixed("flavor", 1),
    fixed("info", 1),
    fixed("warning", 1),
    fixed("error", 1),
];

lazy_static! {
    static ref FUNC_TABLE: FxHashMap<&'static str, &'static FuncDef> =
        FUNCS.iter().map(|f| (f.name, f)).collect();
}

/// Look up a builtin by name.
pub fn lookup(name: &str) -> Option<&'static FuncDef> {
    FUNC_TABLE.get(name).copied()
}
