//! Kuhn-Munkres minimum-cost assignment over rectangular matrices.
//!
//! The solver is a small state machine. Each call to [`Munkres::advance`]
//! runs exactly one step and returns the next one, so tests can observe the
//! path a solve takes.

mod cover_table;
mod pair_table;

pub use cover_table::CoverTable;
pub use pair_table::PairTable;

use crate::score::ScoreMatrix;

/// Solver states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Subtract each column's minimum from that column.
    SubtractColumns,
    /// Star every zero that has no starred zero in its row or column.
    Star,
    /// Cover starred columns; finish once enough columns are covered.
    CoverColumns,
    /// Prime uncovered zeros until one is found in a star-free row.
    Prime,
    /// Flip the alternating prime/star path starting at this primed cell.
    Augment { row: usize, col: usize },
    /// Shift the smallest uncovered value to create a new zero.
    Adjust,
    Done,
}

#[derive(Debug, Clone)]
pub struct Munkres {
    rows: usize,
    cols: usize,
    cost: Vec<f32>,
    stars: PairTable,
    primes: PairTable,
    covers: CoverTable,
    step: Step,
}

impl Munkres {
    /// Prepare a solve. NaN costs are treated as infinitely expensive.
    pub fn new(cost: &ScoreMatrix) -> Self {
        let (rows, cols) = (cost.rows(), cost.cols());
        let mut cost_data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let value = cost.get(i, j);
                cost_data.push(if value.is_nan() { f32::INFINITY } else { value });
            }
        }

        let mut solver = Self {
            rows,
            cols,
            cost: cost_data,
            stars: PairTable::new(rows, cols),
            primes: PairTable::new(rows, cols),
            covers: CoverTable::new(rows, cols),
            step: Step::SubtractColumns,
        };

        solver.step = if rows == 0 || cols == 0 {
            Step::Done
        } else {
            if cols >= rows {
                solver.subtract_row_minima();
            }
            if cols > rows {
                Step::Star
            } else {
                Step::SubtractColumns
            }
        };
        solver
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn stars(&self) -> &PairTable {
        &self.stars
    }

    /// Run the current step and return the one that follows.
    pub fn advance(&mut self) -> Step {
        self.step = match self.step {
            Step::SubtractColumns => {
                self.subtract_column_minima();
                Step::Star
            }
            Step::Star => {
                self.star_free_zeros();
                Step::CoverColumns
            }
            Step::CoverColumns => {
                if self.cover_starred_columns() >= self.rows.min(self.cols) {
                    Step::Done
                } else {
                    Step::Prime
                }
            }
            Step::Prime => match self.prime_uncovered_zeros() {
                Some((row, col)) => Step::Augment { row, col },
                None => Step::Adjust,
            },
            Step::Augment { row, col } => {
                self.augment(row, col);
                Step::CoverColumns
            }
            Step::Adjust => {
                if self.adjust() {
                    Step::Prime
                } else {
                    log::trace!(
                        "munkres: no finite uncovered cost in {}x{} matrix, stopping early",
                        self.rows,
                        self.cols
                    );
                    Step::Done
                }
            }
            Step::Done => Step::Done,
        };
        self.step
    }

    /// Drive the machine to completion and return the starred pairing.
    pub fn run(mut self) -> PairTable {
        while self.step != Step::Done {
            self.advance();
        }
        self.stars
    }

    fn at(&self, row: usize, col: usize) -> f32 {
        self.cost[row * self.cols + col]
    }

    fn subtract_row_minima(&mut self) {
        for row in self.cost.chunks_mut(self.cols) {
            let min = row.iter().copied().fold(f32::INFINITY, f32::min);
            if min.is_finite() {
                row.iter_mut().for_each(|v| *v -= min);
            }
        }
    }

    fn subtract_column_minima(&mut self) {
        for j in 0..self.cols {
            let min = (0..self.rows)
                .map(|i| self.at(i, j))
                .fold(f32::INFINITY, f32::min);
            if min.is_finite() {
                for i in 0..self.rows {
                    self.cost[i * self.cols + j] -= min;
                }
            }
        }
    }

    fn star_free_zeros(&mut self) {
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.at(i, j) == 0.0 && !self.stars.is_row_set(i) && !self.stars.is_col_set(j) {
                    self.stars.set(i, j);
                }
            }
        }
    }

    fn cover_starred_columns(&mut self) -> usize {
        for j in 0..self.cols {
            if self.stars.is_col_set(j) {
                self.covers.cover_col(j);
            }
        }
        self.covers.covered_cols()
    }

    /// Returns the first primed zero whose row has no star, if any.
    fn prime_uncovered_zeros(&mut self) -> Option<(usize, usize)> {
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.at(i, j) != 0.0 || self.covers.is_covered(i, j) {
                    continue;
                }
                self.primes.set(i, j);
                match self.stars.col_for_row(i) {
                    Some(star_col) => {
                        self.covers.cover_row(i);
                        self.covers.uncover_col(star_col);
                    }
                    None => return Some((i, j)),
                }
            }
        }
        None
    }

    fn augment(&mut self, mut row: usize, mut col: usize) {
        while let Some(star_row) = self.stars.row_for_col(col) {
            self.stars.reset(star_row, col);
            self.stars.set(row, col);
            // every row on the path holds a prime once its star is unset
            match self.primes.col_for_row(star_row) {
                Some(prime_col) => {
                    row = star_row;
                    col = prime_col;
                }
                None => break,
            }
        }
        self.stars.set(row, col);
        self.covers.clear();
        self.primes.clear();
    }

    /// Returns false when no finite uncovered value exists.
    fn adjust(&mut self) -> bool {
        let mut min = f32::INFINITY;
        for i in 0..self.rows {
            for j in 0..self.cols {
                if !self.covers.is_covered(i, j) {
                    min = min.min(self.at(i, j));
                }
            }
        }
        if !min.is_finite() {
            return false;
        }

        for i in 0..self.rows {
            if self.covers.is_row_covered(i) {
                for j in 0..self.cols {
                    self.cost[i * self.cols + j] += min;
                }
            }
        }
        for j in 0..self.cols {
            if !self.covers.is_col_covered(j) {
                for i in 0..self.rows {
                    self.cost[i * self.cols + j] -= min;
                }
            }
        }
        true
    }
}

/// Minimum-cost assignment of `cost`; pairs `min(rows, cols)` rows and columns.
pub fn solve(cost: &ScoreMatrix) -> PairTable {
    Munkres::new(cost).run()
}
