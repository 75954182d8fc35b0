//! Conductance matrix storage and the direct linear solve.

use crate::error::{Result, SolverError};

/// The nodal system `G·V = I`.
///
/// Dense row-major storage; N is the number of non-ground nodes, so typical
/// editor circuits stay tiny. The LU buffer and pivot vector live alongside
/// the matrix so a solve allocates once.
#[derive(Debug)]
pub struct DcMatrix {
    /// Conductance matrix G (row-major).
    g: Vec<f64>,
    /// Injection vector I.
    i: Vec<f64>,
    /// Solution vector V.
    x: Vec<f64>,
    /// Matrix dimension.
    size: usize,
    /// LU decomposition of G.
    lu: Vec<f64>,
    /// Pivot indices for the LU decomposition.
    pivots: Vec<usize>,
}

impl DcMatrix {
    /// Create a zeroed N×N system.
    pub fn new(size: usize) -> Self {
        Self {
            g: vec![0.0; size * size],
            i: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Matrix dimension (number of unknowns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.g[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    ///
    /// `None` stands for the ground node: its row and column are not part
    /// of the system, so only the surviving diagonal entry is incremented.
    /// Both-ground stamps vanish entirely.
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Replace row `k` with the identity row and pin its injection entry.
    ///
    /// This is the row-substitution shortcut for a grounded voltage source:
    /// the row's equation degenerates to `V[k] = voltage`. It stands in for
    /// full MNA's extra branch-current unknown and is only sound because
    /// the assembler rejects a second source targeting the same row.
    pub fn fix_voltage(&mut self, k: usize, voltage: f64) {
        for j in 0..self.size {
            self.g[k * self.size + j] = 0.0;
        }
        self.g[k * self.size + k] = 1.0;
        self.i[k] = voltage;
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A pivot whose magnitude falls below `pivot_threshold` means the
    /// system is singular: some node or island has no conductive path to
    /// ground.
    pub fn factor(&mut self, pivot_threshold: f64) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.g);

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < pivot_threshold {
                return Err(SolverError::UnsolvableNetwork);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self, pivot_threshold: f64) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to I
        for i in 0..n {
            self.x[i] = self.i[self.pivots[i]];
        }

        // Forward substitution (L * y = P·I)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag.abs() < pivot_threshold {
                return Err(SolverError::UnsolvableNetwork);
            }
            self.x[i] /= diag;
        }

        Ok(())
    }

    /// Get the solved voltage at a node index (`None` is ground, 0 V).
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(i) => self.x[i],
            None => 0.0,
        }
    }
}
