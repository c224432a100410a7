use crate::{
    topology::{paf_channel_count, part_count, Limb},
    PoseError,
};
use paf_base::{Tensor, Vec2};

const EPS: f32 = 1e-6;

/// Dense row-major matrix of limb scores.
///
/// Rows index the peaks of the limb's first part type, columns those of the
/// second. Either dimension may be zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ScoreMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, PoseError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(PoseError::Shape(format!(
                "row {} has {} entries, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    /// Element-wise map into a new matrix of the same shape.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Score every candidate limb of every topology entry against the PAF tensor.
///
/// `peaks` holds normalized `(x, y)` positions per part type. The returned
/// vector has one matrix per limb, in topology order.
pub fn paf_score_graph(
    paf: &Tensor<f32>,
    topology: &[Limb],
    peaks: &[Vec<Vec2<f32>>],
    num_samples: usize,
) -> Result<Vec<ScoreMatrix>, PoseError> {
    let (channels, height, width) = paf.planes()?;
    let needed = paf_channel_count(topology);
    if channels < needed {
        return Err(PoseError::Shape(format!(
            "topology needs {} PAF channels, tensor has {}",
            needed, channels
        )));
    }
    let parts = part_count(topology);
    if peaks.len() < parts {
        return Err(PoseError::Shape(format!(
            "topology needs {} part types, got peaks for {}",
            parts,
            peaks.len()
        )));
    }

    let graph = topology
        .iter()
        .map(|limb| {
            let field = LimbField {
                y: paf.plane(limb.paf_y),
                x: paf.plane(limb.paf_x),
                height,
                width,
            };
            let peaks_a = &peaks[limb.part_a];
            let peaks_b = &peaks[limb.part_b];

            let mut scores = ScoreMatrix::zeros(peaks_a.len(), peaks_b.len());
            for (a, &pa) in peaks_a.iter().enumerate() {
                for (b, &pb) in peaks_b.iter().enumerate() {
                    scores.set(a, b, field.line_integral(pa, pb, num_samples));
                }
            }
            scores
        })
        .collect();

    Ok(graph)
}

/// The two PAF planes of one limb.
struct LimbField<'a> {
    y: &'a [f32],
    x: &'a [f32],
    height: usize,
    width: usize,
}

impl LimbField<'_> {
    /// Mean projection of the field onto the unit direction from `a` to `b`.
    ///
    /// Samples falling outside the map contribute zero but still count.
    fn line_integral(&self, a: Vec2<f32>, b: Vec2<f32>, samples: usize) -> f32 {
        let a = a.scale_to(self.width as f32, self.height as f32);
        let b = b.scale_to(self.width as f32, self.height as f32);
        let ab = b - a;
        let unit = ab / (ab.length() + EPS);

        let mut integral = 0.0;
        for t in 0..samples {
            let progress = if samples > 1 {
                t as f32 / (samples - 1) as f32
            } else {
                0.0
            };
            let p = a.lerp(b, progress);
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (row, col) = (p.y as usize, p.x as usize);
            if row >= self.height || col >= self.width {
                continue;
            }
            let idx = row * self.width + col;
            integral += Vec2::new(self.x[idx], self.y[idx]).dot(unit);
        }
        integral / samples as f32
    }
}
