//! VoltLab - DC circuit solver
//!
//! Solves a netlist for its DC operating point and prints the per-node
//! voltages and per-component currents.
//!
//! # Usage
//!
//! ```bash
//! voltlab circuit.net
//! ```

use std::path::PathBuf;

use clap::Parser;
use voltlab_core::{
    circuit::SubcircuitLibrary,
    error::Result,
    netlist,
    solver::{solve_with_config, SolverConfig, DEFAULT_PIVOT_THRESHOLD},
};

/// DC circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit netlist file (.net)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Pivot magnitude below which the network is declared unsolvable
    #[arg(long, default_value_t = DEFAULT_PIVOT_THRESHOLD)]
    pivot_threshold: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Parse the netlist
    let (components, wires) = netlist::parse_file(&args.circuit_file)?;

    // The text format carries flat circuits; subcircuits come from editors.
    let library = SubcircuitLibrary::new();

    let config = SolverConfig::new().with_pivot_threshold(args.pivot_threshold);
    let solution = solve_with_config(&components, &wires, &library, &config)?;

    print!("{}", solution);

    Ok(())
}
