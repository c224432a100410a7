//! Synthetic network outputs: Gaussian part bumps and painted limb fields.
//!
//! Used by the demo binary and by tests that need a frame with known people.

use crate::{
    stream::FrameOutput,
    topology::{paf_channel_count, part_count, Limb, HUMAN_TOPOLOGY, NUM_PARTS},
    PoseError,
};
use paf_base::{Tensor, Vec2};

/// Gaussian spread of a painted part, in pixels.
const SIGMA: f32 = 1.0;
/// Half width of a painted limb, in pixels.
const LIMB_WIDTH: f32 = 1.0;

/// Standing person, pixel `(x, y)` per part with the nose near the origin.
pub const STANDING_POSE: [(f32, f32); NUM_PARTS] = [
    (6.0, 3.0),   // nose
    (7.0, 2.0),   // left eye
    (5.0, 2.0),   // right eye
    (8.0, 3.0),   // left ear
    (4.0, 3.0),   // right ear
    (9.0, 7.0),   // left shoulder
    (3.0, 7.0),   // right shoulder
    (10.0, 12.0), // left elbow
    (2.0, 12.0),  // right elbow
    (11.0, 17.0), // left wrist
    (1.0, 17.0),  // right wrist
    (8.0, 19.0),  // left hip
    (4.0, 19.0),  // right hip
    (8.0, 26.0),  // left knee
    (4.0, 26.0),  // right knee
    (8.0, 33.0),  // left ankle
    (4.0, 33.0),  // right ankle
    (6.0, 6.0),   // neck
];

/// [`STANDING_POSE`] shifted by `offset`, every part present.
pub fn standing_person(offset: Vec2<f32>) -> Vec<Option<Vec2<f32>>> {
    STANDING_POSE
        .iter()
        .map(|&(x, y)| Some(Vec2::new(x, y) + offset))
        .collect()
}

/// Paints people into confidence maps and affinity fields of a fixed size.
#[derive(Debug, Clone)]
pub struct FramePainter {
    height: usize,
    width: usize,
    topology: &'static [Limb],
}

impl FramePainter {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            topology: &HUMAN_TOPOLOGY,
        }
    }

    /// Render `people`, each a per-part list of pixel positions.
    ///
    /// A part at `(x, y)` peaks at pixel row `y`, column `x`. Overlapping
    /// bumps keep the larger value; overlapping limbs keep the later person.
    pub fn paint(&self, people: &[Vec<Option<Vec2<f32>>>]) -> Result<FrameOutput, PoseError> {
        let parts = part_count(self.topology);
        let (h, w) = (self.height, self.width);
        let mut confidence = Tensor::<f32>::zeros(vec![parts, h, w])?;
        let mut affinity = Tensor::<f32>::zeros(vec![paf_channel_count(self.topology), h, w])?;

        for person in people {
            if person.len() != parts {
                return Err(PoseError::Shape(format!(
                    "person has {} parts, topology has {}",
                    person.len(),
                    parts
                )));
            }
            for (part, position) in person.iter().enumerate() {
                if let Some(center) = position {
                    self.paint_bump(&mut confidence.data[part * h * w..(part + 1) * h * w], *center);
                }
            }
            for limb in self.topology {
                if let (Some(a), Some(b)) = (person[limb.part_a], person[limb.part_b]) {
                    self.paint_limb(&mut affinity, limb, a, b);
                }
            }
        }

        Ok(FrameOutput::new(confidence, affinity))
    }

    fn paint_bump(&self, plane: &mut [f32], center: Vec2<f32>) {
        let denom = 2.0 * SIGMA * SIGMA;
        for r in 0..self.height {
            for c in 0..self.width {
                let d = Vec2::new(c as f32, r as f32) - center;
                let value = (-d.length_squared() / denom).exp();
                let cell = &mut plane[r * self.width + c];
                *cell = cell.max(value);
            }
        }
    }

    fn paint_limb(&self, affinity: &mut Tensor<f32>, limb: &Limb, a: Vec2<f32>, b: Vec2<f32>) {
        let half = Vec2::new(0.5, 0.5);
        let (a, b) = (a + half, b + half);
        let ab = b - a;
        let length = ab.length();
        if length == 0.0 {
            return;
        }
        let unit = ab / length;
        let plane_size = self.height * self.width;

        for r in 0..self.height {
            for c in 0..self.width {
                let offset = Vec2::new(c as f32 + 0.5, r as f32 + 0.5) - a;
                let along = offset.dot(unit);
                let across = (offset.x * unit.y - offset.y * unit.x).abs();
                if along < -LIMB_WIDTH || along > length + LIMB_WIDTH || across > LIMB_WIDTH {
                    continue;
                }
                let idx = r * self.width + c;
                affinity.data[limb.paf_y * plane_size + idx] = unit.y;
                affinity.data[limb.paf_x * plane_size + idx] = unit.x;
            }
        }
    }
}
