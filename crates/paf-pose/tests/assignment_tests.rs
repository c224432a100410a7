use paf_pose::{assignment, connect_parts, Connection, Limb, ScoreMatrix};

const TWO_LIMBS: [Limb; 2] = [Limb::new(0, 1, 0, 1), Limb::new(2, 3, 1, 2)];

fn matrix(rows: &[&[f32]]) -> ScoreMatrix {
    let rows: Vec<Vec<f32>> = rows.iter().map(|r| r.to_vec()).collect();
    ScoreMatrix::from_rows(&rows).unwrap()
}

fn assert_matching(connection: &Connection) {
    let pairs: Vec<_> = connection.pairs().collect();
    for (i, &(a, b)) in pairs.iter().enumerate() {
        assert_eq!(connection.b_for_a(a), Some(b));
        assert_eq!(connection.a_for_b(b), Some(a));
        assert!(pairs[i + 1..].iter().all(|&(a2, b2)| a2 != a && b2 != b));
    }
}

#[test]
fn test_maximizes_total_score() {
    let scores = vec![
        matrix(&[&[0.9, 0.8], &[0.85, 0.05]]),
        matrix(&[&[0.5], &[0.6]]),
    ];
    let connections = assignment(&scores, &TWO_LIMBS, &[2, 2, 1], 0.1, 2);
    assert_eq!(connections[0].pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    assert_eq!(connections[1].pairs().collect::<Vec<_>>(), vec![(1, 0)]);
    connections.iter().for_each(assert_matching);
}

#[test]
fn test_pairs_at_or_below_threshold_dropped() {
    let scores = vec![
        matrix(&[&[0.9, 0.0], &[0.0, 0.05]]),
        matrix(&[&[0.1], &[0.1]]),
    ];
    let connections = assignment(&scores, &TWO_LIMBS, &[2, 2, 1], 0.1, 2);
    // (1, 1) is the optimal partner for row 1 but scores too low; it is not rematched
    assert_eq!(connections[0].pairs().collect::<Vec<_>>(), vec![(0, 0)]);
    assert_eq!(connections[0].b_for_a(1), None);
    assert!(connections[1].is_empty());
}

#[test]
fn test_nan_score_never_matched() {
    let scores = vec![
        matrix(&[&[-0.5, f32::NAN]]),
        ScoreMatrix::zeros(2, 0),
    ];
    let connections = assignment(&scores, &TWO_LIMBS, &[1, 2, 0], -1.0, 2);
    assert_eq!(connections[0].pairs().collect::<Vec<_>>(), vec![(0, 0)]);
    assert!(connections[1].is_empty());
}

#[test]
fn test_empty_matrices_give_empty_connections() {
    let scores = vec![ScoreMatrix::zeros(0, 2), ScoreMatrix::zeros(2, 0)];
    let connections = assignment(&scores, &TWO_LIMBS, &[0, 2, 0], 0.1, 2);
    assert_eq!(connections.len(), 2);
    assert!(connections.iter().all(Connection::is_empty));
}

#[test]
fn test_chain_of_matches_connects_into_objects() {
    let scores = vec![
        matrix(&[&[0.9, 0.0], &[0.0, 0.7]]),
        matrix(&[&[0.0, 0.8], &[0.6, 0.0]]),
    ];
    let counts = [2, 2, 2];
    let connections = assignment(&scores, &TWO_LIMBS, &counts, 0.1, 2);
    let skeletons = connect_parts(&connections, &TWO_LIMBS, &counts, 10);
    assert_eq!(skeletons.len(), 2);
    assert_eq!(skeletons[0].parts(), &[Some(0), Some(0), Some(1)]);
    assert_eq!(skeletons[1].parts(), &[Some(1), Some(1), Some(0)]);
}
