//! Line-oriented netlist format for the CLI and WASM surfaces.
//!
//! A minimal, human-editable way to hand the solver a flat circuit without
//! a schematic editor. Subcircuit libraries are an editor concern and have
//! no textual form here.
//!
//! # Grammar Overview
//!
//! ```text
//! circuit     = { line }
//! line        = comment | component | wire | empty
//! comment     = ('#' | ';') { any_char }
//! component   = kind id [value] [subtype]
//! wire        = "wire" endpoint endpoint
//! endpoint    = id '.' terminal
//!
//! kind        = "resistor" | "voltage" | "capacitor" | "inductor"
//!             | "diode" | "transistor" | "bulb" | "gate"
//! terminal    = "0" | "1"
//! value       = number [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Example
//!
//! ```text
//! # 10 V source across a resistive divider
//! voltage  V1 10
//! resistor R1 100
//! resistor R2 100
//! wire V1.0 R1.0
//! wire R1.1 R2.0
//! wire R2.1 V1.1
//! ```

use std::collections::HashSet;

use crate::circuit::{Component, ComponentKind, TerminalRef, Wire};
use crate::error::{Result, SolverError};

/// Parse a netlist string into a flat component and wire list.
pub fn parse(input: &str) -> Result<(Vec<Component>, Vec<Wire>)> {
    let mut components: Vec<Component> = Vec::new();
    let mut wires: Vec<Wire> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') || text.starts_with(';') {
            continue;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens[0] == "wire" {
            if tokens.len() != 3 {
                return Err(SolverError::parse(line, "wire requires two endpoints"));
            }
            let a = parse_endpoint(tokens[1], &seen, line)?;
            let b = parse_endpoint(tokens[2], &seen, line)?;
            wires.push(Wire::new(format!("W{}", wires.len() + 1), a, b));
            continue;
        }

        let kind = match tokens[0] {
            "resistor" => ComponentKind::Resistor,
            "voltage" => ComponentKind::VoltageSource,
            "capacitor" => ComponentKind::Capacitor,
            "inductor" => ComponentKind::Inductor,
            "diode" => ComponentKind::Diode,
            "transistor" => ComponentKind::Transistor,
            "bulb" => ComponentKind::Bulb,
            "gate" => ComponentKind::LogicGate,
            other => {
                return Err(SolverError::parse(
                    line,
                    format!("unknown component kind '{}'", other),
                ));
            }
        };

        let Some(&id) = tokens.get(1) else {
            return Err(SolverError::parse(line, "component requires an id"));
        };
        if !seen.insert(id.to_string()) {
            return Err(SolverError::DuplicateComponent {
                id: id.to_string(),
                line,
            });
        }

        let mut component = Component::new(id, kind, 0.0);
        for extra in &tokens[2..] {
            match parse_value(extra) {
                Some(value) => component.value = value,
                None => component.subtype = Some(extra.to_string()),
            }
        }
        components.push(component);
    }

    Ok((components, wires))
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<(Vec<Component>, Vec<Wire>)> {
    let content = std::fs::read_to_string(path).map_err(|e| SolverError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

fn parse_endpoint(text: &str, seen: &HashSet<String>, line: usize) -> Result<TerminalRef> {
    let Some((component, terminal)) = text.rsplit_once('.') else {
        return Err(SolverError::parse(
            line,
            format!("endpoint '{}' must be '<id>.<terminal>'", text),
        ));
    };
    let terminal: usize = match terminal {
        "0" => 0,
        "1" => 1,
        other => {
            return Err(SolverError::parse(
                line,
                format!("terminal index '{}' must be 0 or 1", other),
            ));
        }
    };
    if !seen.contains(component) {
        return Err(SolverError::parse(
            line,
            format!("wire references unknown component '{}'", component),
        ));
    }
    Ok(TerminalRef::new(component, terminal))
}

/// Parse a numeric value with an optional engineering suffix
/// (`10k` = 10000, `100n` = 1e-7).
pub fn parse_value(text: &str) -> Option<f64> {
    let multiplier = match text.chars().last()? {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' => 1e-6,
        'm' => 1e-3,
        'k' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => return text.parse().ok(),
    };
    let mantissa: f64 = text[..text.len() - 1].parse().ok()?;
    Some(mantissa * multiplier)
}
