//! Multi-person pose assembly from part confidence maps and part affinity fields.
//!
//! A frame goes through five stages: peak detection, sub-pixel refinement,
//! limb scoring along the affinity field, per-limb optimal matching and
//! grouping of matched limbs into skeletons. [`PoseAssembler`] runs them in
//! order; [`PoseStream`] does the same for a sequence of frames.

pub mod assembler;
pub mod assignment;
pub mod config;
pub mod connect;
pub mod error;
pub mod interop;
pub mod munkres;
pub mod peaks;
pub mod score;
pub mod stream;
pub mod synth;
pub mod topology;

pub use assembler::{Assembly, PoseAssembler, Poses};
pub use assignment::{assignment, Connection};
pub use config::AssemblyConfig;
pub use connect::{connect_parts, Skeleton};
pub use error::PoseError;
pub use interop::tensor_from_candle;
pub use peaks::{counts, find_peaks, refine_peaks, Peak};
pub use score::{paf_score_graph, ScoreMatrix};
pub use stream::{FrameOutput, PoseStream};
pub use synth::{standing_person, FramePainter, STANDING_POSE};
pub use topology::{BodyPart, Limb, HUMAN_TOPOLOGY, NUM_LIMBS, NUM_PARTS};
