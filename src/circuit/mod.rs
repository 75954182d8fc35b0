//! Circuit representation, hierarchy flattening, and node identification.
//!
//! This module holds the editor-facing data model ([`Component`], [`Wire`],
//! [`SubcircuitDef`]) and the first two solve stages: [`flatten`] expands
//! subcircuit instances into a flat component/wire list, and
//! [`identify_nodes`] contracts wire-connected terminals into electrical
//! nodes.

mod flatten;
mod nodes;
mod types;

pub use flatten::{flatten, FlatCircuit};
pub use nodes::{identify_nodes, NodeMap};
pub use types::*;
