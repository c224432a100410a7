/// Number of part types (confidence map channels) in the human body model.
pub const NUM_PARTS: usize = 18;

/// Number of limb types in the human body model; the PAF tensor has twice as many channels.
pub const NUM_LIMBS: usize = 21;

/// One edge of the body graph.
///
/// `paf_y` and `paf_x` are the PAF channels holding the row and column
/// components of the field that points from `part_a` towards `part_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limb {
    pub paf_y: usize,
    pub paf_x: usize,
    pub part_a: usize,
    pub part_b: usize,
}

impl Limb {
    pub const fn new(paf_y: usize, paf_x: usize, part_a: usize, part_b: usize) -> Self {
        Self {
            paf_y,
            paf_x,
            part_a,
            part_b,
        }
    }
}

/// Limb table of the 18-part human model, in matching and merge order.
pub const HUMAN_TOPOLOGY: [Limb; NUM_LIMBS] = [
    Limb::new(0, 1, 15, 13),
    Limb::new(2, 3, 13, 11),
    Limb::new(4, 5, 16, 14),
    Limb::new(6, 7, 14, 12),
    Limb::new(8, 9, 11, 12),
    Limb::new(10, 11, 5, 7),
    Limb::new(12, 13, 6, 8),
    Limb::new(14, 15, 7, 9),
    Limb::new(16, 17, 8, 10),
    Limb::new(18, 19, 1, 2),
    Limb::new(20, 21, 0, 1),
    Limb::new(22, 23, 0, 2),
    Limb::new(24, 25, 1, 3),
    Limb::new(26, 27, 2, 4),
    Limb::new(28, 29, 3, 5),
    Limb::new(30, 31, 4, 6),
    Limb::new(32, 33, 17, 0),
    Limb::new(34, 35, 17, 5),
    Limb::new(36, 37, 17, 6),
    Limb::new(38, 39, 17, 11),
    Limb::new(40, 41, 17, 12),
];

/// Part types of the human model: the 17 COCO keypoints plus neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
    Neck = 17,
}

impl BodyPart {
    pub const ALL: [BodyPart; NUM_PARTS] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
        BodyPart::Neck,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "left_eye",
            BodyPart::RightEye => "right_eye",
            BodyPart::LeftEar => "left_ear",
            BodyPart::RightEar => "right_ear",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftElbow => "left_elbow",
            BodyPart::RightElbow => "right_elbow",
            BodyPart::LeftWrist => "left_wrist",
            BodyPart::RightWrist => "right_wrist",
            BodyPart::LeftHip => "left_hip",
            BodyPart::RightHip => "right_hip",
            BodyPart::LeftKnee => "left_knee",
            BodyPart::RightKnee => "right_knee",
            BodyPart::LeftAnkle => "left_ankle",
            BodyPart::RightAnkle => "right_ankle",
            BodyPart::Neck => "neck",
        }
    }
}

impl From<BodyPart> for usize {
    fn from(part: BodyPart) -> usize {
        part as usize
    }
}

impl TryFrom<usize> for BodyPart {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        BodyPart::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid body part index: {}. Must be in range 0-{}.",
                value,
                NUM_PARTS - 1
            )
        })
    }
}

/// Number of part types referenced by `topology` (highest part index + 1).
pub fn part_count(topology: &[Limb]) -> usize {
    topology
        .iter()
        .map(|limb| limb.part_a.max(limb.part_b) + 1)
        .max()
        .unwrap_or(0)
}

/// Number of PAF channels referenced by `topology` (highest channel index + 1).
pub fn paf_channel_count(topology: &[Limb]) -> usize {
    topology
        .iter()
        .map(|limb| limb.paf_y.max(limb.paf_x) + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_topology_dimensions() {
        assert_eq!(part_count(&HUMAN_TOPOLOGY), NUM_PARTS);
        assert_eq!(paf_channel_count(&HUMAN_TOPOLOGY), 2 * NUM_LIMBS);
    }

    #[test]
    fn test_each_limb_owns_consecutive_channels() {
        for (k, limb) in HUMAN_TOPOLOGY.iter().enumerate() {
            assert_eq!(limb.paf_y, 2 * k);
            assert_eq!(limb.paf_x, 2 * k + 1);
            assert_ne!(limb.part_a, limb.part_b);
        }
    }

    #[test]
    fn test_body_part_round_trip_by_index() {
        for (i, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(usize::from(*part), i);
            assert_eq!(BodyPart::try_from(i), Ok(*part));
        }
        assert!(BodyPart::try_from(NUM_PARTS).is_err());
        assert_eq!(BodyPart::Neck.name(), "neck");
    }
}
