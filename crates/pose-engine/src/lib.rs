//! PoseNet single-pose inference.
//!
//! This crate provides:
//! - Model configuration (architecture, output stride, resolution, precision)
//! - The `PoseEstimator` / `ModelLoader` seams and the ONNX Runtime backend
//! - Heatmap/offset decoding into a single pose
//! - A process-wide model handle that loads exactly once
//! - Rescaling of keypoints back to source image pixels

pub mod config;
pub mod decode;
pub mod error;
pub mod estimator;
pub mod handle;
pub mod posenet;
pub mod preprocess;
pub mod rescale;

pub use config::{Architecture, ModelConfig};
pub use error::{EngineError, EngineResult};
pub use estimator::{EstimateOptions, ModelLoader, PoseEstimator};
pub use handle::ModelHandle;
pub use posenet::{OrtModelLoader, PoseNet};
pub use rescale::{rescale_pose, ScaleFactors};
