use paf_base::TensorError;
use std::fmt;

#[derive(Debug)]
pub enum PoseError {
    /// Input tensors do not match the topology or each other.
    Shape(String),
    /// Assembly parameters out of range.
    Config(String),
    Candle(String),
    Io(String),
    Parse(String),
    Runtime(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::Shape(msg) => write!(f, "shape error: {msg}"),
            PoseError::Config(msg) => write!(f, "config error: {msg}"),
            PoseError::Candle(msg) => write!(f, "candle error: {msg}"),
            PoseError::Io(msg) => write!(f, "io error: {msg}"),
            PoseError::Parse(msg) => write!(f, "parse error: {msg}"),
            PoseError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

impl From<TensorError> for PoseError {
    fn from(err: TensorError) -> Self {
        PoseError::Shape(err.to_string())
    }
}

impl From<candle_core::Error> for PoseError {
    fn from(err: candle_core::Error) -> Self {
        PoseError::Candle(err.to_string())
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        PoseError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        PoseError::Parse(err.to_string())
    }
}
