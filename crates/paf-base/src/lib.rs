pub mod logging;
pub mod tensor;
pub mod vec2;

pub use logging::{
    default_level, init_file_logger, init_logger, init_stdout_logger, LineLogger, LogTarget,
};
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use paf_base::log::*
pub use log;
