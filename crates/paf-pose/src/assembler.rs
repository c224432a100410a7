use crate::{
    assignment::{assignment, Connection},
    config::AssemblyConfig,
    connect::{connect_parts, Skeleton},
    peaks::{counts, find_peaks, refine_peaks, Peak},
    score::{paf_score_graph, ScoreMatrix},
    topology::{paf_channel_count, part_count, Limb, HUMAN_TOPOLOGY},
    PoseError,
};
use paf_base::{Tensor, Vec2};

/// Everything one assembly pass produced, stage by stage.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub peaks: Vec<Vec<Peak>>,
    pub refined: Vec<Vec<Vec2<f32>>>,
    pub counts: Vec<usize>,
    pub scores: Vec<ScoreMatrix>,
    pub connections: Vec<Connection>,
    pub skeletons: Vec<Skeleton>,
}

/// Skeletons of one frame plus the normalized peaks they index into.
#[derive(Debug, Clone, PartialEq)]
pub struct Poses {
    pub skeletons: Vec<Skeleton>,
    /// Normalized `(x, y)` peaks per part type.
    pub peaks: Vec<Vec<Vec2<f32>>>,
    topology: &'static [Limb],
}

impl Poses {
    pub fn len(&self) -> usize {
        self.skeletons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skeletons.is_empty()
    }

    /// Position of `part` in `skeleton`, in normalized coordinates.
    pub fn part_position(&self, skeleton: &Skeleton, part: usize) -> Option<Vec2<f32>> {
        let index = skeleton.part(part)?;
        self.peaks.get(part)?.get(index).copied()
    }

    /// Per-part pixel positions for an image of `width` x `height`.
    pub fn keypoints(&self, skeleton: &Skeleton, width: usize, height: usize) -> Vec<Option<Vec2<f32>>> {
        (0..skeleton.parts().len())
            .map(|part| {
                self.part_position(skeleton, part)
                    .map(|p| p.scale_to(width as f32, height as f32))
            })
            .collect()
    }

    /// Pixel line segments for every limb whose two parts are present.
    pub fn limbs(
        &self,
        skeleton: &Skeleton,
        width: usize,
        height: usize,
    ) -> Vec<(Vec2<f32>, Vec2<f32>)> {
        let (w, h) = (width as f32, height as f32);
        self.topology
            .iter()
            .filter_map(|limb| {
                let a = self.part_position(skeleton, limb.part_a)?;
                let b = self.part_position(skeleton, limb.part_b)?;
                Some((a.scale_to(w, h), b.scale_to(w, h)))
            })
            .collect()
    }
}

/// Turns confidence maps and part affinity fields into skeletons.
#[derive(Debug, Clone)]
pub struct PoseAssembler {
    config: AssemblyConfig,
    topology: &'static [Limb],
}

impl PoseAssembler {
    /// Assembler for the 18-part human model.
    pub fn new(config: AssemblyConfig) -> Result<Self, PoseError> {
        Self::with_topology(config, &HUMAN_TOPOLOGY)
    }

    pub fn with_topology(
        config: AssemblyConfig,
        topology: &'static [Limb],
    ) -> Result<Self, PoseError> {
        config.validate()?;
        log::info!(
            "pose assembler: {} limbs, {} parts, {:?}",
            topology.len(),
            part_count(topology),
            config
        );
        Ok(Self { config, topology })
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Run all stages and keep their intermediate results.
    pub fn run_stages(&self, cmap: &Tensor<f32>, paf: &Tensor<f32>) -> Result<Assembly, PoseError> {
        self.check_inputs(cmap, paf)?;
        let config = &self.config;

        let peaks = find_peaks(
            cmap,
            config.peak_threshold,
            config.window_size,
            config.max_parts_per_type,
        )?;
        let refined = refine_peaks(&peaks, cmap, config.window_size)?;
        let counts = counts(&peaks);
        let scores = paf_score_graph(paf, self.topology, &refined, config.num_integral_samples)?;
        let connections = assignment(
            &scores,
            self.topology,
            &counts,
            config.link_threshold,
            config.max_parts_per_type,
        );
        let skeletons = connect_parts(&connections, self.topology, &counts, config.max_objects);

        log::debug!(
            "assembled {} skeletons from {} peaks and {} limbs",
            skeletons.len(),
            counts.iter().sum::<usize>(),
            connections.iter().map(Connection::len).sum::<usize>()
        );

        Ok(Assembly {
            peaks,
            refined,
            counts,
            scores,
            connections,
            skeletons,
        })
    }

    pub fn assemble(&self, cmap: &Tensor<f32>, paf: &Tensor<f32>) -> Result<Poses, PoseError> {
        let assembly = self.run_stages(cmap, paf)?;
        Ok(Poses {
            skeletons: assembly.skeletons,
            peaks: assembly.refined,
            topology: self.topology,
        })
    }

    fn check_inputs(&self, cmap: &Tensor<f32>, paf: &Tensor<f32>) -> Result<(), PoseError> {
        let (parts, cmap_h, cmap_w) = cmap.planes()?;
        let (fields, paf_h, paf_w) = paf.planes()?;

        let expected_parts = part_count(self.topology);
        if parts != expected_parts {
            return Err(PoseError::Shape(format!(
                "confidence map has {} channels, topology has {} parts",
                parts, expected_parts
            )));
        }
        let expected_fields = paf_channel_count(self.topology);
        if fields != expected_fields {
            return Err(PoseError::Shape(format!(
                "PAF tensor has {} channels, topology needs {}",
                fields, expected_fields
            )));
        }
        if (cmap_h, cmap_w) != (paf_h, paf_w) {
            return Err(PoseError::Shape(format!(
                "confidence map is {}x{} but PAF tensor is {}x{}",
                cmap_h, cmap_w, paf_h, paf_w
            )));
        }
        Ok(())
    }
}
