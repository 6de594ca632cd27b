//! PoseNet on ONNX Runtime.
//!
//! The exported graph takes an NHWC `[1, R, R, 3]` image and yields a 17
//! channel heatmap tensor and a 34 channel short-range offset tensor. Outputs
//! are matched by shape, so graph output names do not matter.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use pose_media::Canvas;
use pose_models::Pose;
use tracing::{debug, info};

use crate::config::{Architecture, ModelConfig};
use crate::decode::{decode_single_pose, pick_outputs, FeatureMap, Layout};
use crate::error::{EngineError, EngineResult};
use crate::estimator::{EstimateOptions, ModelLoader, PoseEstimator};
use crate::preprocess::to_input_tensor;

/// A raw output tensor copied out of the session.
struct RawOutput {
    dims: Vec<i64>,
    data: Vec<f32>,
}

struct Outputs {
    heatmaps: RawOutput,
    offsets: RawOutput,
    layout: Layout,
}

/// PoseNet single-pose estimator backed by an ONNX Runtime session.
pub struct PoseNet {
    session: Mutex<Session>,
    output_names: Vec<String>,
    architecture: Architecture,
    output_stride: u32,
    square_resolution: u32,
    input_resolution: u32,
}

impl PoseNet {
    /// Load the model file resolved from `config`.
    pub fn load(config: &ModelConfig) -> EngineResult<Self> {
        config.validate()?;

        let model_path = config.resolved_model_path();
        if !model_path.exists() {
            return Err(EngineError::ModelNotFound(model_path));
        }

        let session = create_session(&model_path)?;
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        info!(
            model_path = %model_path.display(),
            architecture = %config.architecture,
            output_stride = config.output_stride,
            square_resolution = config.square_resolution,
            input_resolution = config.input_resolution(),
            quant_bytes = config.quant_bytes,
            outputs = ?output_names,
            "PoseNet session created"
        );

        Ok(Self {
            session: Mutex::new(session),
            output_names,
            architecture: config.architecture,
            output_stride: config.output_stride,
            square_resolution: config.square_resolution,
            input_resolution: config.input_resolution(),
        })
    }

    /// Run the graph and copy out the heatmap and offset tensors.
    fn run(&self, input: Vec<f32>) -> EngineResult<Outputs> {
        let r = self.input_resolution as usize;
        let tensor = Tensor::from_array((vec![1usize, r, r, 3], input.into_boxed_slice()))
            .map_err(|e| EngineError::inference(format!("Failed to create tensor: {e}")))?;

        let mut session = lock_session(&self.session);

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| EngineError::inference(format!("ONNX inference failed: {e}")))?;

        let mut raw = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let Some(value) = outputs.get(name.as_str()) else {
                continue;
            };
            let (shape, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e| EngineError::inference(format!("Failed to extract {name}: {e}")))?;
            raw.push(RawOutput {
                dims: shape.iter().copied().collect(),
                data: data.to_vec(),
            });
        }
        drop(outputs);
        drop(session);

        let shapes: Vec<&[i64]> = raw.iter().map(|o| o.dims.as_slice()).collect();
        let (h, o, layout) = pick_outputs(&shapes).ok_or_else(|| {
            EngineError::inference(format!("model outputs {shapes:?} lack heatmap and offset tensors"))
        })?;

        let mut raw: Vec<Option<RawOutput>> = raw.into_iter().map(Some).collect();
        let heatmaps = raw[h].take().ok_or_else(|| EngineError::inference("heatmap output missing"))?;
        let offsets = raw[o].take().ok_or_else(|| EngineError::inference("offset output missing"))?;
        Ok(Outputs {
            heatmaps,
            offsets,
            layout,
        })
    }
}

impl PoseEstimator for PoseNet {
    fn estimate_single_pose(&self, canvas: &Canvas, options: EstimateOptions) -> EngineResult<Pose> {
        if canvas.side() != self.square_resolution {
            return Err(EngineError::inference(format!(
                "canvas side {} does not match configured resolution {}",
                canvas.side(),
                self.square_resolution
            )));
        }

        let input = to_input_tensor(canvas.pixels(), self.input_resolution, self.architecture);
        let outputs = self.run(input)?;

        let heatmaps = FeatureMap::with_layout(&outputs.heatmaps.dims, &outputs.heatmaps.data, outputs.layout)?;
        let offsets = FeatureMap::with_layout(&outputs.offsets.dims, &outputs.offsets.data, outputs.layout)?;
        let pose = decode_single_pose(&heatmaps, &offsets, self.output_stride)?;

        debug!(score = pose.score, "Single pose decoded");

        Ok(to_canvas_space(
            pose,
            self.input_resolution,
            self.square_resolution,
            options.flip_horizontal,
        ))
    }
}

/// Map a pose from network resolution to canvas pixels, optionally mirrored.
pub fn to_canvas_space(mut pose: Pose, input_resolution: u32, side: u32, flip_horizontal: bool) -> Pose {
    let scale = side as f64 / input_resolution as f64;
    pose.scale(scale, scale);
    if flip_horizontal {
        let max_x = side as f64 - 1.0;
        for keypoint in &mut pose.keypoints {
            keypoint.position.x = max_x - keypoint.position.x;
        }
    }
    pose
}

/// Take the session lock, recovering it if a previous holder panicked.
///
/// The session holds no state between runs, so a poisoned lock still guards
/// a usable session.
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn create_session(model_path: &Path) -> EngineResult<Session> {
    Session::builder()
        .map_err(|e| EngineError::model_load(format!("ORT session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| EngineError::model_load(format!("ORT opt level: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| EngineError::model_load(format!("ORT load model: {e}")))
}

/// Loads `PoseNet` on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrtModelLoader;

#[async_trait]
impl ModelLoader for OrtModelLoader {
    async fn load(&self, config: &ModelConfig) -> EngineResult<Arc<dyn PoseEstimator>> {
        let config = config.clone();
        let model = tokio::task::spawn_blocking(move || PoseNet::load(&config))
            .await
            .map_err(|e| EngineError::model_load(format!("model load task failed: {e}")))??;
        Ok(Arc::new(model))
    }
}
