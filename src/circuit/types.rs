//! Core types for circuit representation.
//!
//! These are the immutable inputs a schematic editor hands to
//! [`solve`](crate::solve): components, point-to-point wires, and a library
//! of subcircuit definitions. The solver never mutates them; every solve
//! takes a fresh snapshot.

use std::collections::HashMap;
use std::fmt;

/// A placement on the editor canvas.
///
/// The solver only uses positions to translate subcircuit internals by
/// their instance offset; the values themselves never affect the solution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by another position's offset.
    pub fn offset_by(&self, other: Position) -> Position {
        Position {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// The kind of a circuit component.
///
/// A closed set: the assembler and result composer dispatch on this enum,
/// so every kind has a defined stamping and current rule. Only `Resistor`
/// and `VoltageSource` participate in the DC system; the reactive and
/// nonlinear kinds are carried through as open circuits and report 0 A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Resistor,
    VoltageSource,
    Capacitor,
    Inductor,
    Diode,
    Transistor,
    Bulb,
    LogicGate,
    /// A placed instance of a [`SubcircuitDef`], referenced by definition id.
    Subcircuit { definition: String },
}

impl ComponentKind {
    /// Whether this kind contributes entries to the conductance matrix.
    pub fn participates(&self) -> bool {
        matches!(self, ComponentKind::Resistor | ComponentKind::VoltageSource)
    }
}

/// A two-terminal circuit component.
///
/// Terminals are indexed 0 and 1. For voltage sources terminal 0 is the
/// positive terminal and terminal 1 the negative one. `subtype` carries
/// editor-facing detail (gate or transistor flavor) the solver ignores.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    /// Defining value: resistance in ohms, source voltage in volts,
    /// capacitance in farads, and so on per kind.
    pub value: f64,
    pub position: Position,
    pub subtype: Option<String>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind, value: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            position: Position::default(),
            subtype: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// The globally unique id of one of this component's terminals.
    pub fn terminal_id(&self, terminal: usize) -> String {
        terminal_id(&self.id, terminal)
    }
}

/// Build the globally unique terminal id `"<componentId>_<terminalIndex>"`.
pub fn terminal_id(component: &str, terminal: usize) -> String {
    format!("{}_{}", component, terminal)
}

/// One end of a wire: a component terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminalRef {
    pub component: String,
    pub terminal: usize,
}

impl TerminalRef {
    pub fn new(component: impl Into<String>, terminal: usize) -> Self {
        Self {
            component: component.into(),
            terminal,
        }
    }

    /// The terminal id this endpoint resolves to.
    pub fn id(&self) -> String {
        terminal_id(&self.component, self.terminal)
    }
}

impl fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.terminal)
    }
}

/// A zero-resistance electrical short between two terminals.
///
/// Wires carry no current value of their own; current is only reported
/// per component.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub id: String,
    pub a: TerminalRef,
    pub b: TerminalRef,
}

impl Wire {
    pub fn new(id: impl Into<String>, a: TerminalRef, b: TerminalRef) -> Self {
        Self { id: id.into(), a, b }
    }
}

/// A boundary terminal of a subcircuit definition.
///
/// Each port stands for exactly one internal component terminal; wires that
/// reach an instance's external terminal are rewired to `inner` during
/// flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: String,
    pub position: Position,
    pub inner: TerminalRef,
}

impl Port {
    pub fn new(id: impl Into<String>, inner: TerminalRef) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            inner,
        }
    }
}

/// A reusable subcircuit: internal components and wires behind a row of
/// input and output ports.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcircuitDef {
    pub id: String,
    pub name: String,
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl SubcircuitDef {
    /// Resolve an instance's external terminal index positionally:
    /// inputs first, then outputs.
    pub fn port(&self, terminal: usize) -> Option<&Port> {
        if terminal < self.inputs.len() {
            self.inputs.get(terminal)
        } else {
            self.outputs.get(terminal - self.inputs.len())
        }
    }
}

/// Library of subcircuit definitions, keyed by definition id.
///
/// Need not be exhaustive: instances referencing missing definitions are
/// dropped with a recorded warning.
pub type SubcircuitLibrary = HashMap<String, SubcircuitDef>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ids_are_component_scoped() {
        let r = Component::new("R1", ComponentKind::Resistor, 100.0);
        assert_eq!(r.terminal_id(0), "R1_0");
        assert_eq!(r.terminal_id(1), "R1_1");
        assert_eq!(TerminalRef::new("R1", 1).id(), "R1_1");
    }

    #[test]
    fn port_resolution_is_positional_across_inputs_and_outputs() {
        let def = SubcircuitDef {
            id: "DIV".to_string(),
            name: "divider".to_string(),
            components: vec![],
            wires: vec![],
            inputs: vec![Port::new("in", TerminalRef::new("R1", 0))],
            outputs: vec![Port::new("out", TerminalRef::new("R2", 1))],
        };
        assert_eq!(def.port(0).unwrap().inner, TerminalRef::new("R1", 0));
        assert_eq!(def.port(1).unwrap().inner, TerminalRef::new("R2", 1));
        assert!(def.port(2).is_none());
    }

    #[test]
    fn only_resistors_and_sources_participate() {
        assert!(ComponentKind::Resistor.participates());
        assert!(ComponentKind::VoltageSource.participates());
        assert!(!ComponentKind::Capacitor.participates());
        assert!(!ComponentKind::Bulb.participates());
        let sub = ComponentKind::Subcircuit {
            definition: "DIV".to_string(),
        };
        assert!(!sub.participates());
    }
}
