//! Error types for the VoltLab circuit solver.
//!
//! This module provides a unified error type [`SolverError`] covering netlist
//! parsing, hierarchy flattening, system assembly, and the linear solve, plus
//! the non-fatal [`SolveWarning`] conditions a best-effort solve records on
//! its result.

use thiserror::Error;

/// Result type alias using [`SolverError`].
pub type Result<T> = std::result::Result<T, SolverError>;

/// Unified error type for all solve failures.
///
/// Every variant is a whole-solve failure: the caller gets either a complete
/// [`Solution`](crate::Solution) or one of these, never both.
#[derive(Error, Debug)]
pub enum SolverError {
    // ============ Assembly Errors ============
    /// A component's defining value is outside its valid domain.
    #[error("Component '{component}' has invalid value {value} (must be > 0)")]
    InvalidComponentValue { component: String, value: f64 },

    /// Subcircuit definitions nest into a cycle.
    #[error("Circular subcircuit reference through definition '{definition}'")]
    CircularSubcircuitReference { definition: String },

    /// A voltage source has neither terminal at ground.
    #[error("Voltage source '{component}' has no terminal at ground; floating sources are not supported")]
    UnsupportedFloatingSource { component: String },

    /// Two voltage sources constrain the same node.
    #[error("Voltage sources '{first}' and '{second}' both constrain node '{node}'")]
    ConflictingVoltageConstraint {
        first: String,
        second: String,
        node: String,
    },

    // ============ Solve Errors ============
    /// The assembled system is singular (disconnected from ground).
    #[error("Network is unsolvable; a node or island has no conductive path to ground")]
    UnsolvableNetwork,

    // ============ Netlist Errors ============
    /// Error parsing a netlist line.
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Duplicate component id in a netlist.
    #[error("Duplicate component id '{id}' at line {line}")]
    DuplicateComponent { id: String, line: usize },

    /// Error reading a circuit file.
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SolverError {
    /// Create a netlist parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

/// A non-fatal condition recorded during a best-effort solve.
///
/// Warnings ride on the success variant; they never accompany an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveWarning {
    /// A subcircuit instance references a definition missing from the
    /// library. The instance and every wire touching it were dropped.
    #[error("Subcircuit instance '{instance}' references missing definition '{definition}'; instance dropped")]
    UnresolvedSubcircuit {
        instance: String,
        definition: String,
    },

    /// A wire names an external terminal the referenced subcircuit
    /// definition cannot resolve to an internal terminal (no such port, or
    /// a dangling port binding). The wire was dropped.
    #[error("Wire '{wire}' targets terminal {terminal} of '{instance}' which does not resolve to an internal terminal; wire dropped")]
    UnboundPort {
        wire: String,
        instance: String,
        terminal: usize,
    },
}
