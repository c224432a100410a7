use paf_pose::munkres::{solve, Munkres, Step};
use paf_pose::ScoreMatrix;

fn matrix(rows: &[&[f32]]) -> ScoreMatrix {
    let rows: Vec<Vec<f32>> = rows.iter().map(|r| r.to_vec()).collect();
    ScoreMatrix::from_rows(&rows).unwrap()
}

fn total_cost(cost: &ScoreMatrix, pairs: &[(usize, usize)]) -> f32 {
    pairs.iter().map(|&(i, j)| cost.get(i, j)).sum()
}

/// Cheapest cost of matching every row (or every column, whichever is fewer).
fn brute_force(cost: &ScoreMatrix) -> f32 {
    fn recurse(cost: &ScoreMatrix, row: usize, used: &mut Vec<bool>, left: usize) -> f32 {
        if left == 0 {
            return 0.0;
        }
        if row == cost.rows() {
            return f32::INFINITY;
        }
        // skip this row only when there are spare rows
        let mut best = if cost.rows() - row > left {
            recurse(cost, row + 1, used, left)
        } else {
            f32::INFINITY
        };
        for col in 0..cost.cols() {
            if !used[col] {
                used[col] = true;
                best = best.min(cost.get(row, col) + recurse(cost, row + 1, used, left - 1));
                used[col] = false;
            }
        }
        best
    }
    let k = cost.rows().min(cost.cols());
    recurse(cost, 0, &mut vec![false; cost.cols()], k)
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_known_three_by_three_optimum() {
    let cost = matrix(&[&[3.0, 1.0, 3.0], &[3.0, 3.0, 2.0], &[2.0, 3.0, 3.0]]);
    let pairs: Vec<_> = solve(&cost).pairs().collect();
    assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
    assert_eq!(total_cost(&cost, &pairs), 5.0);
    // the identity assignment is the worst one
    assert_eq!(total_cost(&cost, &[(0, 0), (1, 1), (2, 2)]), 9.0);
}

#[test]
fn test_zero_diagonal_terminates_without_priming() {
    let inf = f32::INFINITY;
    let mut solver = Munkres::new(&matrix(&[&[0.0, inf], &[inf, 0.0]]));
    assert_eq!(solver.step(), Step::SubtractColumns);
    assert_eq!(solver.advance(), Step::Star);
    assert_eq!(solver.advance(), Step::CoverColumns);
    assert_eq!(solver.advance(), Step::Done);
    assert!(solver.stars().is_pair(0, 0));
    assert!(solver.stars().is_pair(1, 1));
}

#[test]
fn test_done_is_terminal() {
    let mut solver = Munkres::new(&matrix(&[&[1.0]]));
    while solver.step() != Step::Done {
        solver.advance();
    }
    assert_eq!(solver.advance(), Step::Done);
    assert!(solver.stars().is_pair(0, 0));
}

#[test]
fn test_matches_brute_force_on_random_rectangles() {
    let mut rng = Lcg(7);
    for rows in 1..=4 {
        for cols in 1..=5 {
            for _ in 0..8 {
                let data: Vec<Vec<f32>> = (0..rows)
                    .map(|_| (0..cols).map(|_| (rng.next() % 10) as f32).collect())
                    .collect();
                let cost = ScoreMatrix::from_rows(&data).unwrap();
                let pairs: Vec<_> = solve(&cost).pairs().collect();

                assert_eq!(pairs.len(), rows.min(cols), "{data:?}");
                let mut seen_cols: Vec<usize> = pairs.iter().map(|&(_, j)| j).collect();
                seen_cols.sort_unstable();
                seen_cols.dedup();
                assert_eq!(seen_cols.len(), pairs.len(), "{data:?}");
                assert_eq!(total_cost(&cost, &pairs), brute_force(&cost), "{data:?}");
            }
        }
    }
}

#[test]
fn test_negative_costs_maximize_scores() {
    let scores = matrix(&[&[0.9, 0.8], &[0.85, 0.05]]);
    let pairs: Vec<_> = solve(&scores.map(|s| -s)).pairs().collect();
    assert_eq!(pairs, vec![(0, 1), (1, 0)]);
}
