use crate::{assignment::Connection, topology::Limb};

/// One assembled person.
///
/// Entry `k` is the index of the person's part-`k` peak, or `None` when that
/// part was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    parts: Vec<Option<usize>>,
}

impl Skeleton {
    pub fn new(num_parts: usize) -> Self {
        Self {
            parts: vec![None; num_parts],
        }
    }

    pub fn from_parts(parts: Vec<Option<usize>>) -> Self {
        Self { parts }
    }

    pub fn part(&self, part: usize) -> Option<usize> {
        self.parts.get(part).copied().flatten()
    }

    pub fn parts(&self) -> &[Option<usize>] {
        &self.parts
    }

    /// Number of parts present.
    pub fn num_present(&self) -> usize {
        self.parts.iter().filter(|p| p.is_some()).count()
    }

    /// Whether every limb with both parts present here is a matched pair in `connections`.
    pub fn is_consistent_with(&self, connections: &[Connection], topology: &[Limb]) -> bool {
        limbs_consistent(&self.parts, connections, topology)
    }

    fn is_disjoint(&self, other: &Skeleton) -> bool {
        self.parts
            .iter()
            .zip(&other.parts)
            .all(|(a, b)| a.is_none() || b.is_none())
    }
}

fn limbs_consistent(
    parts: &[Option<usize>],
    connections: &[Connection],
    topology: &[Limb],
) -> bool {
    topology.iter().zip(connections).all(|(limb, connection)| {
        let a = parts.get(limb.part_a).copied().flatten();
        let b = parts.get(limb.part_b).copied().flatten();
        match (a, b) {
            (Some(a), Some(b)) => connection.b_for_a(a) == Some(b),
            _ => true,
        }
    })
}

/// Skeletons under construction plus the reverse index from peaks to owners.
struct Builder<'a> {
    connections: &'a [Connection],
    topology: &'a [Limb],
    /// `None` once a skeleton has been merged into an earlier one.
    slots: Vec<Option<Skeleton>>,
    owner: Vec<Vec<Option<usize>>>,
    live: usize,
    max_objects: usize,
}

impl<'a> Builder<'a> {
    fn new(
        connections: &'a [Connection],
        topology: &'a [Limb],
        counts: &[usize],
        max_objects: usize,
    ) -> Self {
        Self {
            connections,
            topology,
            slots: Vec::new(),
            owner: counts.iter().map(|&n| vec![None; n]).collect(),
            live: 0,
            max_objects,
        }
    }

    fn skeleton_mut(&mut self, id: usize) -> &mut Skeleton {
        self.slots[id]
            .as_mut()
            .unwrap_or_else(|| panic!("skeleton {id} was merged away but is still referenced"))
    }

    fn start(&mut self, part_a: usize, a: usize, part_b: usize, b: usize) {
        if self.live >= self.max_objects {
            log::trace!(
                "object cap {} reached, dropping limb {}:{} - {}:{}",
                self.max_objects,
                part_a,
                a,
                part_b,
                b
            );
            return;
        }
        let id = self.slots.len();
        let mut skeleton = Skeleton::new(self.owner.len());
        skeleton.parts[part_a] = Some(a);
        skeleton.parts[part_b] = Some(b);
        self.slots.push(Some(skeleton));
        self.owner[part_a][a] = Some(id);
        self.owner[part_b][b] = Some(id);
        self.live += 1;
    }

    fn attach(&mut self, id: usize, part: usize, index: usize) {
        let (connections, topology) = (self.connections, self.topology);
        let skeleton = self.skeleton_mut(id);
        if let Some(existing) = skeleton.parts[part] {
            log::trace!(
                "skeleton {} already has part {} at peak {}, ignoring peak {}",
                id,
                part,
                existing,
                index
            );
            return;
        }

        let mut parts = skeleton.parts.clone();
        parts[part] = Some(index);
        if !limbs_consistent(&parts, connections, topology) {
            log::trace!(
                "peak {} of part {} is not matched to every neighbor in skeleton {}",
                index,
                part,
                id
            );
            return;
        }
        skeleton.parts = parts;
        self.owner[part][index] = Some(id);
    }

    fn merge(&mut self, first: usize, second: usize) {
        let (keep, absorb) = (first.min(second), first.max(second));
        let merged = match (&self.slots[keep], &self.slots[absorb]) {
            (Some(k), Some(a)) if k.is_disjoint(a) => k
                .parts
                .iter()
                .zip(&a.parts)
                .map(|(k, a)| k.or(*a))
                .collect::<Vec<_>>(),
            _ => {
                log::trace!("skeletons {} and {} overlap, not merging", keep, absorb);
                return;
            }
        };
        if !limbs_consistent(&merged, self.connections, self.topology) {
            log::trace!(
                "skeletons {} and {} have unmatched adjacent parts, not merging",
                keep,
                absorb
            );
            return;
        }

        if let Some(absorbed) = self.slots[absorb].take() {
            for (part, index) in absorbed.parts.iter().enumerate() {
                if let Some(index) = *index {
                    self.skeleton_mut(keep).parts[part] = Some(index);
                    self.owner[part][index] = Some(keep);
                }
            }
            self.live -= 1;
        }
    }

    fn finish(self) -> Vec<Skeleton> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Group matched limbs into skeletons.
///
/// Limbs are visited in topology order and pairs in ascending index order.
/// A pair with two unowned peaks starts a new skeleton while fewer than
/// `max_objects` exist; a pair with one owned peak extends that skeleton when
/// the slot is free; a pair joining two skeletons merges the later one into
/// the earlier when they share no part type. An extension or merge is refused
/// when it would make two parts adjacent in `topology` without their pair
/// being in that limb's connection. Peaks without any accepted limb do not
/// produce skeletons.
pub fn connect_parts(
    connections: &[Connection],
    topology: &[Limb],
    counts: &[usize],
    max_objects: usize,
) -> Vec<Skeleton> {
    let mut builder = Builder::new(connections, topology, counts, max_objects);

    for (limb, connection) in topology.iter().zip(connections) {
        let (part_a, part_b) = (limb.part_a, limb.part_b);
        for (a, b) in connection.pairs() {
            match (builder.owner[part_a][a], builder.owner[part_b][b]) {
                (None, None) => builder.start(part_a, a, part_b, b),
                (Some(id), None) => builder.attach(id, part_b, b),
                (None, Some(id)) => builder.attach(id, part_a, a),
                (Some(first), Some(second)) if first == second => {}
                (Some(first), Some(second)) => builder.merge(first, second),
            }
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    // parts 0-1-2 in a chain, part 3 hangs off part 0
    const CHAIN: [Limb; 3] = [
        Limb::new(0, 1, 0, 1),
        Limb::new(2, 3, 1, 2),
        Limb::new(4, 5, 0, 3),
    ];

    fn conn(count_a: usize, count_b: usize, pairs: &[(usize, usize)]) -> Connection {
        Connection::from_pairs(count_a, count_b, pairs).unwrap()
    }

    #[test]
    fn test_chain_forms_one_skeleton() {
        let connections = [conn(1, 1, &[(0, 0)]), conn(1, 1, &[(0, 0)]), conn(1, 1, &[(0, 0)])];
        let skeletons = connect_parts(&connections, &CHAIN, &[1, 1, 1, 1], 10);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].parts(), &[Some(0), Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn test_isolated_peaks_make_no_skeleton() {
        let connections = [conn(2, 1, &[]), conn(1, 1, &[]), conn(2, 0, &[])];
        assert!(connect_parts(&connections, &CHAIN, &[2, 1, 1, 0], 10).is_empty());
    }

    #[test]
    fn test_cap_drops_new_but_extends_existing() {
        // limb 0 pairs (0,0) and (1,1); with a cap of one only the first starts a skeleton
        let connections = [
            conn(2, 2, &[(0, 0), (1, 1)]),
            conn(2, 2, &[(0, 0), (1, 1)]),
            conn(2, 1, &[]),
        ];
        let skeletons = connect_parts(&connections, &CHAIN, &[2, 2, 2, 0], 1);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].parts(), &[Some(0), Some(0), Some(0), None]);
    }

    #[test]
    fn test_disjoint_skeletons_merge() {
        // limb 0-3 first creates {0,3}, limb 1-2 creates {1,2}; a later 0-1 link joins them
        let topology = [
            Limb::new(0, 1, 0, 3),
            Limb::new(2, 3, 1, 2),
            Limb::new(4, 5, 0, 1),
        ];
        let connections = [conn(1, 1, &[(0, 0)]), conn(1, 1, &[(0, 0)]), conn(1, 1, &[(0, 0)])];
        let skeletons = connect_parts(&connections, &topology, &[1, 1, 1, 1], 10);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].num_present(), 4);
    }

    #[test]
    fn test_overlapping_skeletons_stay_apart() {
        // both skeletons already hold a part-2 peak, so the 0-1 link is dropped
        let topology = [
            Limb::new(0, 1, 0, 2),
            Limb::new(2, 3, 1, 2),
            Limb::new(4, 5, 0, 1),
        ];
        let connections = [conn(1, 2, &[(0, 0)]), conn(1, 2, &[(0, 1)]), conn(1, 1, &[(0, 0)])];
        let skeletons = connect_parts(&connections, &topology, &[1, 1, 2], 10);
        assert_eq!(skeletons.len(), 2);
        assert_eq!(skeletons[0].parts(), &[Some(0), None, Some(0)]);
        assert_eq!(skeletons[1].parts(), &[None, Some(0), Some(1)]);
    }

    const TRIANGLE: [Limb; 3] = [
        Limb::new(0, 1, 0, 1),
        Limb::new(2, 3, 1, 2),
        Limb::new(4, 5, 0, 2),
    ];

    #[test]
    fn test_conflicting_cycle_leaves_part_empty() {
        // 1-2 picks part-2 peak 0 while 0-2 picks peak 1; neither fits both neighbors
        let connections = [conn(1, 1, &[(0, 0)]), conn(1, 2, &[(0, 0)]), conn(1, 2, &[(0, 1)])];
        let skeletons = connect_parts(&connections, &TRIANGLE, &[1, 1, 2], 10);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].parts(), &[Some(0), Some(0), None]);
        assert!(skeletons[0].is_consistent_with(&connections, &TRIANGLE));
    }

    #[test]
    fn test_agreeing_cycle_fills_every_part() {
        let connections = [conn(1, 1, &[(0, 0)]), conn(1, 2, &[(0, 1)]), conn(1, 2, &[(0, 1)])];
        let skeletons = connect_parts(&connections, &TRIANGLE, &[1, 1, 2], 10);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].parts(), &[Some(0), Some(0), Some(1)]);
        assert!(skeletons[0].is_consistent_with(&connections, &TRIANGLE));
    }

    #[test]
    fn test_merge_refused_without_connection_between_new_neighbors() {
        // {0,3} and {1,2} joined by 0-1, but the 2-3 limb matched nothing
        let topology = [
            Limb::new(0, 1, 0, 3),
            Limb::new(2, 3, 1, 2),
            Limb::new(4, 5, 0, 1),
            Limb::new(6, 7, 2, 3),
        ];
        let mut connections = vec![
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[]),
        ];
        let skeletons = connect_parts(&connections, &topology, &[1, 1, 1, 1], 10);
        assert_eq!(skeletons.len(), 2);
        assert!(skeletons.iter().all(|s| s.is_consistent_with(&connections, &topology)));

        connections[3] = conn(1, 1, &[(0, 0)]);
        let skeletons = connect_parts(&connections, &topology, &[1, 1, 1, 1], 10);
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].num_present(), 4);
    }

    #[test]
    fn test_merge_frees_a_slot_under_the_cap() {
        let topology = [
            Limb::new(0, 1, 0, 1),
            Limb::new(2, 3, 2, 3),
            Limb::new(4, 5, 1, 2),
            Limb::new(6, 7, 4, 5),
        ];
        let connections = [
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[(0, 0)]),
            conn(1, 1, &[(0, 0)]),
        ];
        let skeletons = connect_parts(&connections, &topology, &[1, 1, 1, 1, 1, 1], 2);
        assert_eq!(skeletons.len(), 2);
        assert_eq!(skeletons[0].num_present(), 4);
        assert_eq!(skeletons[1].parts(), &[None, None, None, None, Some(0), Some(0)]);
    }
}
