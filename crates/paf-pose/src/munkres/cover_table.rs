/// Row and column cover flags for one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverTable {
    rows: Vec<bool>,
    cols: Vec<bool>,
}

impl CoverTable {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            rows: vec![false; nrows],
            cols: vec![false; ncols],
        }
    }

    pub fn cover_row(&mut self, row: usize) {
        self.rows[row] = true;
    }

    pub fn uncover_row(&mut self, row: usize) {
        self.rows[row] = false;
    }

    pub fn cover_col(&mut self, col: usize) {
        self.cols[col] = true;
    }

    pub fn uncover_col(&mut self, col: usize) {
        self.cols[col] = false;
    }

    pub fn is_row_covered(&self, row: usize) -> bool {
        self.rows[row]
    }

    pub fn is_col_covered(&self, col: usize) -> bool {
        self.cols[col]
    }

    /// A cell is covered when its row or its column is.
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.rows[row] || self.cols[col]
    }

    pub fn covered_cols(&self) -> usize {
        self.cols.iter().filter(|&&covered| covered).count()
    }

    pub fn clear(&mut self) {
        self.rows.fill(false);
        self.cols.fill(false);
    }
}
