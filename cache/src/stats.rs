//! Size accounting over flat records, for operator-facing logging.
//!
//! Nothing here is on the correctness path of a load or a store; the
//! report only reads records that already exist.

use std::fmt;

use crate::schema::GraphRecord;

/// Assumed wire cost of one index or number, matching the compact form's
/// order of magnitude. The report is for relative comparison, not exact
/// file sizes.
const INDEX_SIZE: usize = 4;

/// Byte-size breakdown of a serialized graph, by category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeReport {
    pub node_count: usize,
    pub node_outputs: usize,
    pub node_cmds: usize,
    pub node_deps: usize,
    pub node_inputs: usize,
    pub node_scoped_vars: usize,
    pub node_filenames: usize,
    pub node_linenos: usize,

    pub var_count: usize,
    pub var_names: usize,
    pub var_values: usize,

    pub scoped_count: usize,
    pub scoped_names: usize,
    pub scoped_values: usize,

    pub target_count: usize,
    pub targets: usize,
}

impl SizeReport {
    /// Tally one graph record.
    pub fn scan(record: &GraphRecord) -> SizeReport {
        let mut report = SizeReport {
            node_count: record.nodes.len(),
            var_count: record.vars.len(),
            scoped_count: record.scoped_vars.len(),
            target_count: record.targets.len(),
            ..SizeReport::default()
        };

        for node in &record.nodes {
            report.node_outputs += INDEX_SIZE;
            report.node_cmds += node.cmds.iter().map(String::len).sum::<usize>();
            report.node_deps += INDEX_SIZE * node.deps.len();
            report.node_inputs += INDEX_SIZE * node.actual_inputs.len();
            report.node_scoped_vars += INDEX_SIZE * node.scoped_vars.len();
            report.node_filenames += node.filename.len();
            report.node_linenos += INDEX_SIZE;
        }

        for (name, value) in &record.vars {
            report.var_names += name.len();
            report.var_values += value.deep_size();
        }

        for slot in &record.scoped_vars {
            report.scoped_names += slot.name.len();
            report.scoped_values += slot.value.deep_size();
        }

        report.targets = record.targets.iter().map(String::len).sum();
        report
    }

    pub fn node_total(&self) -> usize {
        self.node_outputs
            + self.node_cmds
            + self.node_deps
            + self.node_inputs
            + self.node_scoped_vars
            + self.node_filenames
            + self.node_linenos
    }

    pub fn var_total(&self) -> usize {
        self.var_names + self.var_values
    }

    pub fn scoped_total(&self) -> usize {
        self.scoped_names + self.scoped_values
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} nodes {}",
            self.node_count,
            human(self.node_total())
        )?;
        writeln!(f, " output {}", human(self.node_outputs))?;
        writeln!(f, " command {}", human(self.node_cmds))?;
        writeln!(f, " deps {}", human(self.node_deps))?;
        writeln!(f, " inputs {}", human(self.node_inputs))?;
        writeln!(f, " scoped {}", human(self.node_scoped_vars))?;
        writeln!(f, " filename {}", human(self.node_filenames))?;
        writeln!(f, " lineno {}", human(self.node_linenos))?;
        writeln!(f, "{} vars {}", self.var_count, human(self.var_total()))?;
        writeln!(f, " name {}", human(self.var_names))?;
        writeln!(f, " value {}", human(self.var_values))?;
        writeln!(
            f,
            "{} scoped vars {}",
            self.scoped_count,
            human(self.scoped_total())
        )?;
        writeln!(f, " name {}", human(self.scoped_names))?;
        writeln!(f, " value {}", human(self.scoped_values))?;
        write!(f, "{} targets {}", self.target_count, human(self.targets))
    }
}

/// Decimal units, precise under 10 of the next unit up.
fn human(n: usize) -> String {
    if n >= 10_000_000_000 {
        format!("{:.2}GB", n as f64 / 1e9)
    } else if n >= 10_000_000 {
        format!("{:.2}MB", n as f64 / 1e6)
    } else if n >= 10_000 {
        format!("{:.2}kB", n as f64 / 1e3)
    } else {
        format!("{n}B")
    }
}

/// Log the breakdown of a freshly read record at debug level.
pub(crate) fn log_report(record: &GraphRecord) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("loaded graph size breakdown:\n{}", SizeReport::scan(record));
    }
}
