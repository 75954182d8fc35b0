//! Electrical node identification.
//!
//! Wires declare shorts between component terminals; an electrical node is
//! an equivalence class of shorted terminals. This module contracts the
//! terminal graph with a union-find, picks the ground node, and assigns
//! matrix indices to the remaining unknowns. The union-find is rebuilt from
//! scratch on every solve; nothing here outlives the call.

use std::collections::HashMap;

use super::types::{terminal_id, Component, ComponentKind, Wire};

/// Simple union-find for grouping shorted terminals into circuit nodes.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: Vec::new() }
    }

    fn ensure(&mut self, id: usize) {
        while self.parent.len() <= id {
            let n = self.parent.len();
            self.parent.push(n);
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Keep the earlier-created terminal as the class representative
            // so node ids do not depend on wire endpoint order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// The result of node identification: terminal-to-node contraction, the
/// designated ground node, and the matrix index of every unknown node.
///
/// Node ids are canonical representative terminal ids, so they are stable
/// for a given input and readable in results (`"R1_1"`).
#[derive(Debug)]
pub struct NodeMap {
    /// Terminal id -> canonical node id.
    node_of: HashMap<String, String>,
    /// Node id -> matrix index. Ground and non-participating nodes absent.
    indices: HashMap<String, usize>,
    /// Canonical id of the ground node.
    ground: String,
}

impl NodeMap {
    /// The ground node id.
    pub fn ground(&self) -> &str {
        &self.ground
    }

    /// Number of unknown (non-ground, matrix-indexed) nodes.
    pub fn unknowns(&self) -> usize {
        self.indices.len()
    }

    /// The node a component terminal belongs to.
    ///
    /// Every terminal of every flattened component is known; asking about
    /// anything else is a caller bug.
    pub fn node(&self, component: &str, terminal: usize) -> &str {
        &self.node_of[&terminal_id(component, terminal)]
    }

    /// Matrix index of a node. `None` for ground and for nodes touched by
    /// no matrix-participating component.
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.indices.get(node).copied()
    }

    /// Matrix index of a component terminal's node (`None` for ground).
    pub fn terminal_index(&self, component: &str, terminal: usize) -> Option<usize> {
        self.index_of(self.node(component, terminal))
    }

    /// Whether a component terminal sits on the ground node.
    pub fn is_ground(&self, component: &str, terminal: usize) -> bool {
        self.node(component, terminal) == self.ground
    }

    /// All matrix-indexed nodes with their indices.
    pub fn indexed_nodes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices.iter().map(|(node, &idx)| (node.as_str(), idx))
    }
}

/// Contract wire-connected terminals into electrical nodes and assign
/// matrix indices.
///
/// Ground selection (first match wins):
/// 1. the node holding the first voltage source's terminal 1 (its negative
///    terminal by convention);
/// 2. the node holding the first component's terminal 0.
///
/// Matrix indices are contiguous and zero-based, assigned in the order
/// nodes are first discovered walking components in input order. Only
/// terminals of kinds that stamp the matrix (resistors, voltage sources)
/// receive indices: a node reachable only through open-circuit kinds is not
/// an unknown, which keeps a dangling capacitor or gate from making the
/// system singular.
pub fn identify_nodes(components: &[Component], wires: &[Wire]) -> NodeMap {
    let mut uf = UnionFind::new();
    let mut interned: HashMap<String, usize> = HashMap::new();
    let mut keys: Vec<String> = Vec::new();

    let mut intern = |key: String, uf: &mut UnionFind, keys: &mut Vec<String>| -> usize {
        if let Some(&id) = interned.get(&key) {
            id
        } else {
            let id = keys.len();
            interned.insert(key.clone(), id);
            keys.push(key);
            uf.ensure(id);
            id
        }
    };

    // Every terminal exists as a singleton set even if unconnected.
    for comp in components {
        for terminal in 0..2 {
            intern(comp.terminal_id(terminal), &mut uf, &mut keys);
        }
    }

    // Each wire shorts its two endpoints.
    for wire in wires {
        let a = intern(wire.a.id(), &mut uf, &mut keys);
        let b = intern(wire.b.id(), &mut uf, &mut keys);
        uf.union(a, b);
    }

    // Resolve every terminal to its canonical representative.
    let mut node_of = HashMap::with_capacity(keys.len());
    for (id, key) in keys.iter().enumerate() {
        let root = uf.find(id);
        node_of.insert(key.clone(), keys[root].clone());
    }

    let ground = select_ground(components, &node_of);

    // Assign matrix indices in first-discovery order, ground excluded.
    let mut indices: HashMap<String, usize> = HashMap::new();
    for comp in components {
        if !comp.kind.participates() {
            continue;
        }
        for terminal in 0..2 {
            let node = &node_of[&comp.terminal_id(terminal)];
            if *node != ground && !indices.contains_key(node) {
                indices.insert(node.clone(), indices.len());
            }
        }
    }

    NodeMap {
        node_of,
        indices,
        ground,
    }
}

fn select_ground(components: &[Component], node_of: &HashMap<String, String>) -> String {
    for comp in components {
        if comp.kind == ComponentKind::VoltageSource {
            return node_of[&comp.terminal_id(1)].clone();
        }
    }
    components
        .first()
        .map(|comp| node_of[&comp.terminal_id(0)].clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::types::TerminalRef;

    fn resistor(id: &str) -> Component {
        Component::new(id, ComponentKind::Resistor, 100.0)
    }

    fn wire(id: &str, a: (&str, usize), b: (&str, usize)) -> Wire {
        Wire::new(id, TerminalRef::new(a.0, a.1), TerminalRef::new(b.0, b.1))
    }

    #[test]
    fn wired_terminals_share_a_node() {
        let components = vec![resistor("R1"), resistor("R2")];
        let wires = vec![wire("W1", ("R1", 1), ("R2", 0))];
        let nodes = identify_nodes(&components, &wires);

        assert_eq!(nodes.node("R1", 1), nodes.node("R2", 0));
        assert_ne!(nodes.node("R1", 0), nodes.node("R2", 0));
    }

    #[test]
    fn ground_prefers_first_voltage_source_negative_terminal() {
        let components = vec![
            resistor("R1"),
            Component::new("V1", ComponentKind::VoltageSource, 10.0),
            Component::new("V2", ComponentKind::VoltageSource, 5.0),
        ];
        let nodes = identify_nodes(&components, &[]);
        assert_eq!(nodes.ground(), nodes.node("V1", 1));
        assert_ne!(nodes.ground(), nodes.node("V2", 1));
    }

    #[test]
    fn ground_falls_back_to_first_component_terminal_zero() {
        let components = vec![resistor("R1"), resistor("R2")];
        let nodes = identify_nodes(&components, &[]);
        assert_eq!(nodes.ground(), nodes.node("R1", 0));
    }

    #[test]
    fn isolated_terminals_remain_their_own_nodes() {
        let components = vec![resistor("R1")];
        let nodes = identify_nodes(&components, &[]);
        assert_ne!(nodes.node("R1", 0), nodes.node("R1", 1));
    }

    #[test]
    fn indices_are_contiguous_in_discovery_order() {
        // V1 terminal 1 is ground; discovery walks V1 then R1 then R2.
        let components = vec![
            Component::new("V1", ComponentKind::VoltageSource, 10.0),
            resistor("R1"),
            resistor("R2"),
        ];
        let wires = vec![
            wire("W1", ("V1", 0), ("R1", 0)),
            wire("W2", ("R1", 1), ("R2", 0)),
            wire("W3", ("R2", 1), ("V1", 1)),
        ];
        let nodes = identify_nodes(&components, &wires);

        assert_eq!(nodes.unknowns(), 2);
        assert_eq!(nodes.terminal_index("V1", 0), Some(0));
        assert_eq!(nodes.terminal_index("R1", 1), Some(1));
        assert_eq!(nodes.terminal_index("R2", 1), None);
        assert!(nodes.is_ground("R2", 1));
    }

    #[test]
    fn nodes_touched_only_by_open_kinds_are_not_unknowns() {
        let components = vec![
            Component::new("V1", ComponentKind::VoltageSource, 10.0),
            resistor("R1"),
            Component::new("C1", ComponentKind::Capacitor, 1e-6),
        ];
        let wires = vec![
            wire("W1", ("V1", 0), ("R1", 0)),
            wire("W2", ("R1", 1), ("V1", 1)),
            wire("W3", ("C1", 0), ("R1", 0)),
        ];
        let nodes = identify_nodes(&components, &wires);

        // C1 terminal 0 is shorted onto an indexed node; terminal 1 dangles.
        assert_eq!(nodes.terminal_index("C1", 0), Some(0));
        assert_eq!(nodes.terminal_index("C1", 1), None);
        assert!(!nodes.is_ground("C1", 1));
        assert_eq!(nodes.unknowns(), 1);
    }
}
