/// Partial bijection between rows and columns.
///
/// Used by the solver for both the starred and the primed zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable {
    rows: Vec<Option<usize>>,
    cols: Vec<Option<usize>>,
}

impl PairTable {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            rows: vec![None; nrows],
            cols: vec![None; ncols],
        }
    }

    pub fn col_for_row(&self, row: usize) -> Option<usize> {
        self.rows[row]
    }

    pub fn row_for_col(&self, col: usize) -> Option<usize> {
        self.cols[col]
    }

    pub fn is_row_set(&self, row: usize) -> bool {
        self.rows[row].is_some()
    }

    pub fn is_col_set(&self, col: usize) -> bool {
        self.cols[col].is_some()
    }

    pub fn is_pair(&self, row: usize, col: usize) -> bool {
        self.rows[row] == Some(col)
    }

    /// Link `row` and `col` in both directions.
    ///
    /// Earlier partners keep their own link, so several rows may point at one
    /// column. Primed zeros rely on this; starred zeros are only ever set on a
    /// free row and column.
    pub fn set(&mut self, row: usize, col: usize) {
        self.rows[row] = Some(col);
        self.cols[col] = Some(row);
    }

    pub fn reset(&mut self, row: usize, col: usize) {
        self.rows[row] = None;
        self.cols[col] = None;
    }

    pub fn clear(&mut self) {
        self.rows.fill(None);
        self.cols.fill(None);
    }

    pub fn len(&self) -> usize {
        self.rows.iter().filter(|col| col.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, col)` pairs in ascending row order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| (row, col)))
    }
}
