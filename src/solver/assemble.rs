//! Nodal system assembly.
//!
//! Turns a flattened, node-identified circuit into the `G·V = I` system.
//! Resistors stamp conductances; grounded voltage sources pin their
//! non-ground node's row by substitution. Everything else is an open
//! circuit at DC and contributes nothing.

use crate::circuit::{Component, ComponentKind, NodeMap};
use crate::error::{Result, SolverError};

use super::mna::DcMatrix;

/// Assemble the conductance matrix and injection vector.
///
/// Resistors are stamped first so that voltage-source row substitution is
/// final; a substituted row must not be touched again by anything.
pub fn assemble(components: &[Component], nodes: &NodeMap) -> Result<DcMatrix> {
    let mut matrix = DcMatrix::new(nodes.unknowns());

    for comp in components {
        if comp.kind != ComponentKind::Resistor {
            continue;
        }
        if !(comp.value > 0.0) {
            return Err(SolverError::InvalidComponentValue {
                component: comp.id.clone(),
                value: comp.value,
            });
        }
        let n0 = nodes.terminal_index(&comp.id, 0);
        let n1 = nodes.terminal_index(&comp.id, 1);
        matrix.stamp_conductance(n0, n1, 1.0 / comp.value);
    }

    // Which source fixed each row, for conflict reporting.
    let mut fixed_by: Vec<Option<&str>> = vec![None; nodes.unknowns()];

    for comp in components {
        if comp.kind != ComponentKind::VoltageSource {
            continue;
        }
        let at_ground = [nodes.is_ground(&comp.id, 0), nodes.is_ground(&comp.id, 1)];
        match at_ground {
            // Shorted across ground: no row to constrain, contributes nothing.
            [true, true] => {}
            [false, false] => {
                return Err(SolverError::UnsupportedFloatingSource {
                    component: comp.id.clone(),
                });
            }
            _ => {
                // Terminal 0 is positive: pinning it yields +value, pinning
                // the negative terminal 1 yields -value.
                let (terminal, voltage) = if at_ground[1] {
                    (0, comp.value)
                } else {
                    (1, -comp.value)
                };
                if let Some(k) = nodes.terminal_index(&comp.id, terminal) {
                    if let Some(first) = fixed_by[k] {
                        return Err(SolverError::ConflictingVoltageConstraint {
                            first: first.to_string(),
                            second: comp.id.clone(),
                            node: nodes.node(&comp.id, terminal).to_string(),
                        });
                    }
                    matrix.fix_voltage(k, voltage);
                    fixed_by[k] = Some(&comp.id);
                }
            }
        }
    }

    Ok(matrix)
}
