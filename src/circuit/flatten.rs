//! Subcircuit hierarchy flattening.
//!
//! Expands every subcircuit instance into its internal components and wires,
//! prefixing internal ids with the instance id (`"X1.R1"`, nested as
//! `"X1.X2.R1"`) so multiple instances of one definition stay globally
//! unique. Wires that reach an instance's external terminals are rewired to
//! the internal terminals its ports are bound to. Definitions may nest;
//! a definition that transitively instantiates itself fails the solve.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, SolveWarning, SolverError};

use super::types::{Component, ComponentKind, Position, SubcircuitDef, SubcircuitLibrary, TerminalRef, Wire};

/// A fully flattened circuit: no `Subcircuit` kinds remain.
#[derive(Debug, Default)]
pub struct FlatCircuit {
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
    /// Best-effort degradations recorded while flattening.
    pub warnings: Vec<SolveWarning>,
}

/// Flatten a top-level circuit against a subcircuit library.
///
/// Instances referencing a definition missing from the library are dropped
/// together with every wire touching them, and the condition is recorded as
/// a warning; the rest of the circuit still solves.
pub fn flatten(
    components: &[Component],
    wires: &[Wire],
    library: &SubcircuitLibrary,
) -> Result<FlatCircuit> {
    let mut flat = FlatCircuit::default();
    let mut stack = Vec::new();
    expand_level(
        "",
        Position::default(),
        components,
        wires,
        library,
        &mut stack,
        &mut flat,
    )?;
    Ok(flat)
}

/// Expand one hierarchy level into `out`.
///
/// `prefix` is the accumulated instance prefix (empty at top level) and
/// `offset` the accumulated placement translation. `stack` holds the
/// definition ids currently being expanded, for cycle detection.
fn expand_level(
    prefix: &str,
    offset: Position,
    components: &[Component],
    wires: &[Wire],
    library: &SubcircuitLibrary,
    stack: &mut Vec<String>,
    out: &mut FlatCircuit,
) -> Result<()> {
    // Instance id -> definition, for rewiring this level's wires.
    let mut instances: HashMap<&str, &SubcircuitDef> = HashMap::new();
    // Instances dropped because their definition is missing.
    let mut dropped: HashSet<&str> = HashSet::new();

    for comp in components {
        let ComponentKind::Subcircuit { definition } = &comp.kind else {
            let mut cloned = comp.clone();
            cloned.id = format!("{}{}", prefix, comp.id);
            cloned.position = comp.position.offset_by(offset);
            out.components.push(cloned);
            continue;
        };

        let Some(def) = library.get(definition) else {
            out.warnings.push(SolveWarning::UnresolvedSubcircuit {
                instance: format!("{}{}", prefix, comp.id),
                definition: definition.clone(),
            });
            dropped.insert(comp.id.as_str());
            continue;
        };

        if stack.iter().any(|d| d == &def.id) {
            return Err(SolverError::CircularSubcircuitReference {
                definition: def.id.clone(),
            });
        }

        stack.push(def.id.clone());
        expand_level(
            &format!("{}{}.", prefix, comp.id),
            offset.offset_by(comp.position),
            &def.components,
            &def.wires,
            library,
            stack,
            out,
        )?;
        stack.pop();

        instances.insert(comp.id.as_str(), def);
    }

    'wires: for wire in wires {
        let wire_id = format!("{}{}", prefix, wire.id);
        let mut endpoints = [wire.a.clone(), wire.b.clone()];

        for endpoint in &mut endpoints {
            if dropped.contains(endpoint.component.as_str()) {
                continue 'wires;
            }
            if let Some(def) = instances.get(endpoint.component.as_str()) {
                // External terminal: rewire to the bound internal terminal,
                // under the instance's own prefix.
                let Some((path, terminal)) = resolve_port(def, endpoint.terminal, library) else {
                    out.warnings.push(SolveWarning::UnboundPort {
                        wire: wire_id,
                        instance: format!("{}{}", prefix, endpoint.component),
                        terminal: endpoint.terminal,
                    });
                    continue 'wires;
                };
                *endpoint = TerminalRef {
                    component: format!("{}{}.{}", prefix, endpoint.component, path),
                    terminal,
                };
            } else {
                endpoint.component = format!("{}{}", prefix, endpoint.component);
            }
        }

        let [a, b] = endpoints;
        out.wires.push(Wire { id: wire_id, a, b });
    }

    Ok(())
}

/// Follow a definition's port binding down to the concrete internal
/// terminal it stands for, returning the `.`-joined component path relative
/// to the instance.
///
/// Ports may be bound to a nested instance's external terminal; resolution
/// recurses until it reaches a simple component. Returns `None` when the
/// index has no port, the binding names a missing component, or a nested
/// definition is absent from the library. Definition cycles cannot reach
/// this point; expansion has already rejected them.
fn resolve_port(
    def: &SubcircuitDef,
    terminal: usize,
    library: &SubcircuitLibrary,
) -> Option<(String, usize)> {
    let port = def.port(terminal)?;
    let target = def
        .components
        .iter()
        .find(|c| c.id == port.inner.component)?;
    if let ComponentKind::Subcircuit { definition } = &target.kind {
        let inner = library.get(definition)?;
        let (path, t) = resolve_port(inner, port.inner.terminal, library)?;
        Some((format!("{}.{}", target.id, path), t))
    } else {
        Some((target.id.clone(), port.inner.terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::types::Port;

    fn resistor(id: &str, value: f64) -> Component {
        Component::new(id, ComponentKind::Resistor, value)
    }

    fn wire(id: &str, a: (&str, usize), b: (&str, usize)) -> Wire {
        Wire::new(id, TerminalRef::new(a.0, a.1), TerminalRef::new(b.0, b.1))
    }

    fn divider_def() -> SubcircuitDef {
        // Two series resistors; external 0 = top of R1, external 1 = bottom of R2.
        SubcircuitDef {
            id: "DIV".to_string(),
            name: "divider".to_string(),
            components: vec![resistor("R1", 100.0), resistor("R2", 100.0)],
            wires: vec![wire("W1", ("R1", 1), ("R2", 0))],
            inputs: vec![Port::new("in", TerminalRef::new("R1", 0))],
            outputs: vec![Port::new("out", TerminalRef::new("R2", 1))],
        }
    }

    fn library(defs: Vec<SubcircuitDef>) -> SubcircuitLibrary {
        defs.into_iter().map(|d| (d.id.clone(), d)).collect()
    }

    #[test]
    fn instance_internals_are_prefixed_and_translated() {
        let lib = library(vec![divider_def()]);
        let components = vec![Component::new(
            "X1",
            ComponentKind::Subcircuit {
                definition: "DIV".to_string(),
            },
            0.0,
        )
        .at(Position::new(10.0, 20.0))];

        let flat = flatten(&components, &[], &lib).unwrap();

        let ids: Vec<&str> = flat.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["X1.R1", "X1.R2"]);
        assert_eq!(flat.components[0].position, Position::new(10.0, 20.0));
        assert_eq!(flat.wires.len(), 1);
        assert_eq!(flat.wires[0].id, "X1.W1");
        assert_eq!(flat.wires[0].a, TerminalRef::new("X1.R1", 1));
        assert!(flat.warnings.is_empty());
    }

    #[test]
    fn external_wires_are_rewired_through_ports() {
        let lib = library(vec![divider_def()]);
        let components = vec![
            Component::new("V1", ComponentKind::VoltageSource, 10.0),
            Component::new(
                "X1",
                ComponentKind::Subcircuit {
                    definition: "DIV".to_string(),
                },
                0.0,
            ),
        ];
        let wires = vec![
            wire("W1", ("V1", 0), ("X1", 0)),
            wire("W2", ("X1", 1), ("V1", 1)),
        ];

        let flat = flatten(&components, &wires, &lib).unwrap();

        assert_eq!(flat.wires[1].a, TerminalRef::new("V1", 0));
        assert_eq!(flat.wires[1].b, TerminalRef::new("X1.R1", 0));
        assert_eq!(flat.wires[2].a, TerminalRef::new("X1.R2", 1));
        assert_eq!(flat.wires[2].b, TerminalRef::new("V1", 1));
    }

    #[test]
    fn two_instances_of_one_definition_stay_distinct() {
        let lib = library(vec![divider_def()]);
        let sub = |id: &str| {
            Component::new(
                id,
                ComponentKind::Subcircuit {
                    definition: "DIV".to_string(),
                },
                0.0,
            )
        };
        let flat = flatten(&[sub("X1"), sub("X2")], &[], &lib).unwrap();

        let ids: Vec<&str> = flat.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["X1.R1", "X1.R2", "X2.R1", "X2.R2"]);
    }

    #[test]
    fn nested_definitions_compose_prefixes() {
        let inner = divider_def();
        let outer = SubcircuitDef {
            id: "OUTER".to_string(),
            name: "outer".to_string(),
            components: vec![Component::new(
                "X9",
                ComponentKind::Subcircuit {
                    definition: "DIV".to_string(),
                },
                0.0,
            )],
            wires: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        let lib = library(vec![inner, outer]);
        let components = vec![Component::new(
            "X1",
            ComponentKind::Subcircuit {
                definition: "OUTER".to_string(),
            },
            0.0,
        )];

        let flat = flatten(&components, &[], &lib).unwrap();
        let ids: Vec<&str> = flat.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["X1.X9.R1", "X1.X9.R2"]);
    }

    #[test]
    fn ports_bound_through_nested_instances_resolve_transitively() {
        // OUTER's input port is bound to the external terminal 0 of its
        // internal DIV instance, which in turn binds to R1 terminal 0.
        let inner = divider_def();
        let outer = SubcircuitDef {
            id: "OUTER".to_string(),
            name: "outer".to_string(),
            components: vec![Component::new(
                "X9",
                ComponentKind::Subcircuit {
                    definition: "DIV".to_string(),
                },
                0.0,
            )],
            wires: vec![],
            inputs: vec![Port::new("in", TerminalRef::new("X9", 0))],
            outputs: vec![],
        };
        let lib = library(vec![inner, outer]);
        let components = vec![
            resistor("R0", 10.0),
            Component::new(
                "X1",
                ComponentKind::Subcircuit {
                    definition: "OUTER".to_string(),
                },
                0.0,
            ),
        ];
        let wires = vec![wire("W1", ("R0", 1), ("X1", 0))];

        let flat = flatten(&components, &wires, &lib).unwrap();
        assert_eq!(flat.wires[0].b, TerminalRef::new("X1.X9.R1", 0));
        assert!(flat.warnings.is_empty());
    }

    #[test]
    fn unresolved_instance_is_dropped_with_its_wires() {
        let lib = SubcircuitLibrary::new();
        let components = vec![
            resistor("R1", 100.0),
            Component::new(
                "X1",
                ComponentKind::Subcircuit {
                    definition: "MISSING".to_string(),
                },
                0.0,
            ),
        ];
        let wires = vec![
            wire("W1", ("R1", 0), ("X1", 0)),
            wire("W2", ("R1", 0), ("R1", 1)),
        ];

        let flat = flatten(&components, &wires, &lib).unwrap();

        assert_eq!(flat.components.len(), 1);
        assert_eq!(flat.wires.len(), 1);
        assert_eq!(flat.wires[0].id, "W2");
        assert_eq!(
            flat.warnings,
            vec![SolveWarning::UnresolvedSubcircuit {
                instance: "X1".to_string(),
                definition: "MISSING".to_string(),
            }]
        );
    }

    #[test]
    fn out_of_range_external_terminal_drops_the_wire() {
        let lib = library(vec![divider_def()]);
        let components = vec![
            resistor("R9", 50.0),
            Component::new(
                "X1",
                ComponentKind::Subcircuit {
                    definition: "DIV".to_string(),
                },
                0.0,
            ),
        ];
        let wires = vec![wire("W1", ("R9", 0), ("X1", 5))];

        let flat = flatten(&components, &wires, &lib).unwrap();
        assert!(flat.wires.is_empty());
        assert_eq!(
            flat.warnings,
            vec![SolveWarning::UnboundPort {
                wire: "W1".to_string(),
                instance: "X1".to_string(),
                terminal: 5,
            }]
        );
    }

    #[test]
    fn self_referential_definition_is_rejected() {
        let def = SubcircuitDef {
            id: "LOOP".to_string(),
            name: "loop".to_string(),
            components: vec![Component::new(
                "X1",
                ComponentKind::Subcircuit {
                    definition: "LOOP".to_string(),
                },
                0.0,
            )],
            wires: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        let lib = library(vec![def]);
        let components = vec![Component::new(
            "X0",
            ComponentKind::Subcircuit {
                definition: "LOOP".to_string(),
            },
            0.0,
        )];

        let err = flatten(&components, &[], &lib).unwrap_err();
        assert!(matches!(
            err,
            SolverError::CircularSubcircuitReference { definition } if definition == "LOOP"
        ));
    }

    #[test]
    fn mutually_recursive_definitions_are_rejected() {
        let a = SubcircuitDef {
            id: "A".to_string(),
            name: "a".to_string(),
            components: vec![Component::new(
                "XB",
                ComponentKind::Subcircuit {
                    definition: "B".to_string(),
                },
                0.0,
            )],
            wires: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        let b = SubcircuitDef {
            id: "B".to_string(),
            name: "b".to_string(),
            components: vec![Component::new(
                "XA",
                ComponentKind::Subcircuit {
                    definition: "A".to_string(),
                },
                0.0,
            )],
            wires: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        let lib = library(vec![a, b]);
        let components = vec![Component::new(
            "X0",
            ComponentKind::Subcircuit {
                definition: "A".to_string(),
            },
            0.0,
        )];

        assert!(matches!(
            flatten(&components, &[], &lib),
            Err(SolverError::CircularSubcircuitReference { .. })
        ));
    }
}
