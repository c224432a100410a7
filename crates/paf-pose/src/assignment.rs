use crate::{munkres, score::ScoreMatrix, topology::Limb, PoseError};

/// Accepted limb candidates of one limb type.
///
/// Indices refer to the peak lists of the limb's two part types. Each index
/// on either side appears in at most one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    a_to_b: Vec<Option<usize>>,
    b_to_a: Vec<Option<usize>>,
}

impl Connection {
    pub fn new(count_a: usize, count_b: usize) -> Self {
        Self {
            a_to_b: vec![None; count_a],
            b_to_a: vec![None; count_b],
        }
    }

    /// Build from explicit pairs, rejecting out-of-range or reused indices.
    pub fn from_pairs(
        count_a: usize,
        count_b: usize,
        pairs: &[(usize, usize)],
    ) -> Result<Self, PoseError> {
        let mut connection = Self::new(count_a, count_b);
        for &(a, b) in pairs {
            if a >= count_a || b >= count_b {
                return Err(PoseError::Shape(format!(
                    "pair ({a}, {b}) out of range for {count_a}x{count_b} limb"
                )));
            }
            if connection.a_to_b[a].is_some() || connection.b_to_a[b].is_some() {
                return Err(PoseError::Shape(format!("pair ({a}, {b}) reuses a matched index")));
            }
            connection.link(a, b);
        }
        Ok(connection)
    }

    fn link(&mut self, a: usize, b: usize) {
        self.a_to_b[a] = Some(b);
        self.b_to_a[b] = Some(a);
    }

    pub fn b_for_a(&self, a: usize) -> Option<usize> {
        self.a_to_b.get(a).copied().flatten()
    }

    pub fn a_for_b(&self, b: usize) -> Option<usize> {
        self.b_to_a.get(b).copied().flatten()
    }

    /// `(a, b)` pairs in ascending `a` order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.a_to_b
            .iter()
            .enumerate()
            .filter_map(|(a, b)| b.map(|b| (a, b)))
    }

    pub fn len(&self) -> usize {
        self.a_to_b.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Match the peaks of every limb with a minimum-cost (maximum-score) assignment.
///
/// Matched pairs whose score does not exceed `score_threshold` are discarded.
///
/// Panics if a score matrix does not match `counts` or a count exceeds
/// `max_parts`; both mean the stages were fed inconsistent data.
pub fn assignment(
    score_graph: &[ScoreMatrix],
    topology: &[Limb],
    counts: &[usize],
    score_threshold: f32,
    max_parts: usize,
) -> Vec<Connection> {
    assert_eq!(
        score_graph.len(),
        topology.len(),
        "one score matrix per limb expected"
    );

    topology
        .iter()
        .zip(score_graph)
        .map(|(limb, scores)| {
            let (rows, cols) = (counts[limb.part_a], counts[limb.part_b]);
            assert!(
                scores.rows() == rows && scores.cols() == cols,
                "score matrix {}x{} does not match peak counts {}x{}",
                scores.rows(),
                scores.cols(),
                rows,
                cols
            );
            assert!(
                rows <= max_parts && cols <= max_parts,
                "peak counts {}x{} exceed max_parts {}",
                rows,
                cols,
                max_parts
            );

            let stars = munkres::solve(&scores.map(|score| -score));
            let mut connection = Connection::new(rows, cols);
            for (a, b) in stars.pairs() {
                if scores.get(a, b) > score_threshold {
                    connection.link(a, b);
                }
            }
            connection
        })
        .collect()
}
