//! # VoltLab Core
//!
//! A DC operating-point solver for interactive schematic editors.
//!
//! Given discrete components connected by point-to-point wires, plus an
//! optional library of reusable subcircuits, the solver computes the
//! steady-state voltage at every electrically distinct node and the current
//! through every two-terminal component.
//!
//! ## Architecture
//!
//! The solve is a fixed pipeline; each stage consumes only the previous
//! stage's output:
//!
//! - [`circuit::flatten`] - expands subcircuit instances into a flat,
//!   uniquely-named component and wire list
//! - [`circuit::identify_nodes`] - contracts wire-connected terminals into
//!   electrical nodes and picks ground
//! - [`solver::assemble`] - builds the conductance matrix and injection
//!   vector, substituting rows for grounded voltage sources
//! - [`solver::DcMatrix`] - LU-factors and solves the linear system
//! - [`solver::solve`] - runs the pipeline and composes the final
//!   [`Solution`]
//!
//! ## Usage
//!
//! ```
//! use voltlab_core::{solve, Component, ComponentKind, SubcircuitLibrary, TerminalRef, Wire};
//!
//! let components = vec![
//!     Component::new("V1", ComponentKind::VoltageSource, 10.0),
//!     Component::new("R1", ComponentKind::Resistor, 100.0),
//! ];
//! let wires = vec![
//!     Wire::new("W1", TerminalRef::new("V1", 0), TerminalRef::new("R1", 0)),
//!     Wire::new("W2", TerminalRef::new("R1", 1), TerminalRef::new("V1", 1)),
//! ];
//!
//! let solution = solve(&components, &wires, &SubcircuitLibrary::new()).unwrap();
//! assert_eq!(solution.component_currents["R1"], 0.1);
//! ```
//!
//! ## Simulation Method
//!
//! The solver implements a deliberately simplified Modified Nodal Analysis:
//! node equations only, with grounded voltage sources folded in by row
//! substitution instead of branch-current unknowns. Reactive and nonlinear
//! kinds (capacitors, inductors, diodes, transistors, bulbs, logic gates)
//! are carried through as open circuits and report 0 A. Unsupported
//! topologies - floating sources, colliding source constraints, islands
//! with no path to ground - fail with a descriptive error rather than
//! returning approximate numbers.

pub mod circuit;
pub mod error;
pub mod netlist;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{
    Component, ComponentKind, Port, Position, SubcircuitDef, SubcircuitLibrary, TerminalRef, Wire,
};
pub use error::{Result, SolveWarning, SolverError};
pub use solver::{solve, solve_with_config, Solution, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;
