//! The DC solve pipeline and its result.
//!
//! [`solve`] is the crate's single entry point: flatten the hierarchy,
//! contract wires into nodes, assemble the nodal system, run the direct
//! solve, and compose per-node voltages and per-component currents. Each
//! stage consumes only the previous stage's output; nothing is cached
//! between calls.

use std::collections::BTreeMap;
use std::fmt;

use crate::circuit::{flatten, identify_nodes, Component, ComponentKind, SubcircuitLibrary, Wire};
use crate::error::{Result, SolveWarning};

use super::assemble::assemble;
use super::SolverConfig;

/// A successful DC solve.
///
/// `node_voltages` maps every solved node id (canonical representative
/// terminal id) to volts; the ground node is always present at exactly 0.
/// `component_currents` maps every flattened component id to amps, measured
/// from terminal 0 to terminal 1. Sorted maps keep reports deterministic.
#[derive(Debug, Clone)]
pub struct Solution {
    pub node_voltages: BTreeMap<String, f64>,
    pub component_currents: BTreeMap<String, f64>,
    /// Best-effort degradations (dropped instances or wires). Present only
    /// on success; an error result carries no partial data.
    pub warnings: Vec<SolveWarning>,
}

impl Solution {
    fn empty(warnings: Vec<SolveWarning>) -> Self {
        Self {
            node_voltages: BTreeMap::new(),
            component_currents: BTreeMap::new(),
            warnings,
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node voltages:")?;
        if self.node_voltages.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (node, volts) in &self.node_voltages {
            writeln!(f, "  {:<24} {:>12.6} V", node, volts)?;
        }
        writeln!(f, "Component currents:")?;
        if self.component_currents.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (component, amps) in &self.component_currents {
            writeln!(f, "  {:<24} {:>12.6} A", component, amps)?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Solve a circuit for its DC operating point with default configuration.
///
/// A pure function of its inputs: voltages for every electrically distinct
/// node and currents for every two-terminal component, or the most specific
/// [`SolverError`](crate::SolverError) a stage detects. An empty circuit is
/// a valid trivial success.
pub fn solve(
    components: &[Component],
    wires: &[Wire],
    library: &SubcircuitLibrary,
) -> Result<Solution> {
    solve_with_config(components, wires, library, &SolverConfig::default())
}

/// Solve with an explicit [`SolverConfig`].
pub fn solve_with_config(
    components: &[Component],
    wires: &[Wire],
    library: &SubcircuitLibrary,
    config: &SolverConfig,
) -> Result<Solution> {
    let flat = flatten(components, wires, library)?;
    if flat.components.is_empty() {
        return Ok(Solution::empty(flat.warnings));
    }

    let nodes = identify_nodes(&flat.components, &flat.wires);
    let mut matrix = assemble(&flat.components, &nodes)?;
    matrix.factor(config.pivot_threshold)?;
    matrix.solve(config.pivot_threshold)?;

    let mut node_voltages = BTreeMap::new();
    node_voltages.insert(nodes.ground().to_string(), 0.0);
    for (node, idx) in nodes.indexed_nodes() {
        node_voltages.insert(node.to_string(), matrix.voltage(Some(idx)));
    }

    let mut component_currents = BTreeMap::new();
    for comp in &flat.components {
        let current = match comp.kind {
            ComponentKind::Resistor => {
                let v0 = matrix.voltage(nodes.terminal_index(&comp.id, 0));
                let v1 = matrix.voltage(nodes.terminal_index(&comp.id, 1));
                (v0 - v1) / comp.value
            }
            // The row-substitution model has no branch-current unknown, so
            // source current is reported as 0; open-circuit kinds carry none.
            _ => 0.0,
        };
        component_currents.insert(comp.id.clone(), current);
    }

    Ok(Solution {
        node_voltages,
        component_currents,
        warnings: flat.warnings,
    })
}
