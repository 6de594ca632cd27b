//! Single-pose decoding from PoseNet heatmaps and short-range offsets.
//!
//! Heatmaps carry one logit channel per part; offsets carry the y offsets for
//! every part followed by the x offsets (`2 * Part::COUNT` channels).

use ndarray::{ArrayView3, ArrayView4, Axis};
use pose_models::{Keypoint, Part, Pose};

use crate::error::{EngineError, EngineResult};

/// Heatmap channel count.
pub const HEATMAP_CHANNELS: usize = Part::COUNT;

/// Offset channel count.
pub const OFFSET_CHANNELS: usize = Part::COUNT * 2;

/// Tensor memory layout of a model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `[1, height, width, channels]`
    Nhwc,
    /// `[1, channels, height, width]`
    Nchw,
}

/// Work out the layout of a 4-D output carrying `channels` channels.
///
/// NHWC wins when both axes match, which only happens for degenerate grids.
pub fn detect_layout(dims: &[i64], channels: usize) -> Option<Layout> {
    if dims.len() != 4 || dims[0] != 1 {
        return None;
    }
    let channels = channels as i64;
    if dims[3] == channels {
        Some(Layout::Nhwc)
    } else if dims[1] == channels {
        Some(Layout::Nchw)
    } else {
        None
    }
}

fn has_layout(dims: &[i64], channels: usize, layout: Layout) -> bool {
    if dims.len() != 4 || dims[0] != 1 {
        return false;
    }
    let channel_axis = match layout {
        Layout::Nhwc => 3,
        Layout::Nchw => 1,
    };
    dims[channel_axis] == channels as i64
}

fn grid(dims: &[i64], layout: Layout) -> (i64, i64) {
    match layout {
        Layout::Nhwc => (dims[1], dims[2]),
        Layout::Nchw => (dims[2], dims[3]),
    }
}

/// Pick the heatmap and offset outputs from a set of output shapes.
///
/// Returns `(heatmap_index, offset_index, layout)`. Both outputs must share a
/// layout and a grid, which resolves shapes such as `[1, 17, 17, 17]` that a
/// lone channel count cannot place.
pub fn pick_outputs(shapes: &[&[i64]]) -> Option<(usize, usize, Layout)> {
    for layout in [Layout::Nhwc, Layout::Nchw] {
        for (o, offsets) in shapes.iter().enumerate() {
            if !has_layout(offsets, OFFSET_CHANNELS, layout) {
                continue;
            }
            let found = shapes.iter().enumerate().find(|&(h, heatmaps)| {
                h != o
                    && has_layout(heatmaps, HEATMAP_CHANNELS, layout)
                    && grid(heatmaps, layout) == grid(offsets, layout)
            });
            if let Some((h, _)) = found {
                return Some((h, o, layout));
            }
        }
    }
    None
}

/// A `[height, width, channels]` view over a model output.
#[derive(Debug, Clone)]
pub struct FeatureMap<'a> {
    view: ArrayView3<'a, f32>,
}

impl<'a> FeatureMap<'a> {
    /// View raw output data as height × width × channels, guessing the layout.
    pub fn from_tensor(dims: &[i64], data: &'a [f32], channels: usize) -> EngineResult<Self> {
        let layout = detect_layout(dims, channels).ok_or_else(|| {
            EngineError::inference(format!(
                "output shape {dims:?} does not carry {channels} channels"
            ))
        })?;
        Self::with_layout(dims, data, layout)
    }

    /// View raw output data stored in a known layout.
    pub fn with_layout(dims: &[i64], data: &'a [f32], layout: Layout) -> EngineResult<Self> {
        if dims.len() != 4 || dims[0] != 1 || dims.iter().any(|&d| d < 0) {
            return Err(EngineError::inference(format!("unexpected output shape {dims:?}")));
        }

        let shape = (
            dims[0] as usize,
            dims[1] as usize,
            dims[2] as usize,
            dims[3] as usize,
        );
        let batch = ArrayView4::from_shape(shape, data)
            .map_err(|e| EngineError::inference(format!("output reshape failed: {e}")))?;
        let first = batch.index_axis_move(Axis(0), 0);

        let view = match layout {
            Layout::Nhwc => first,
            Layout::Nchw => first.permuted_axes([1, 2, 0]),
        };

        Ok(Self { view })
    }

    pub fn height(&self) -> usize {
        self.view.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.view.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.view.shape()[2]
    }

    fn get(&self, y: usize, x: usize, c: usize) -> f32 {
        self.view[[y, x, c]]
    }
}

fn sigmoid(x: f32) -> f64 {
    1.0 / (1.0 + (-(x as f64)).exp())
}

/// Grid cell with the strongest response for `channel`.
fn argmax_cell(heatmaps: &FeatureMap<'_>, channel: usize) -> (usize, usize, f32) {
    let mut best = (0, 0, f32::NEG_INFINITY);
    for y in 0..heatmaps.height() {
        for x in 0..heatmaps.width() {
            let value = heatmaps.get(y, x, channel);
            if value > best.2 {
                best = (y, x, value);
            }
        }
    }
    best
}

/// Decode one pose in model-input pixel space.
///
/// For each part the strongest heatmap cell is refined by its offset vector:
/// `position = cell * output_stride + offset`.
pub fn decode_single_pose(
    heatmaps: &FeatureMap<'_>,
    offsets: &FeatureMap<'_>,
    output_stride: u32,
) -> EngineResult<Pose> {
    if heatmaps.channels() != HEATMAP_CHANNELS {
        return Err(EngineError::inference(format!(
            "expected {HEATMAP_CHANNELS} heatmap channels, got {}",
            heatmaps.channels()
        )));
    }
    if offsets.channels() != OFFSET_CHANNELS {
        return Err(EngineError::inference(format!(
            "expected {OFFSET_CHANNELS} offset channels, got {}",
            offsets.channels()
        )));
    }
    if (heatmaps.height(), heatmaps.width()) != (offsets.height(), offsets.width()) {
        return Err(EngineError::inference(format!(
            "heatmap grid {}x{} does not match offset grid {}x{}",
            heatmaps.height(),
            heatmaps.width(),
            offsets.height(),
            offsets.width()
        )));
    }
    if heatmaps.height() == 0 || heatmaps.width() == 0 {
        return Err(EngineError::inference("empty heatmap grid"));
    }

    let stride = output_stride as f64;
    let keypoints = Part::ALL
        .iter()
        .map(|&part| {
            let k = part.index();
            let (y, x, logit) = argmax_cell(heatmaps, k);
            let offset_y = offsets.get(y, x, k) as f64;
            let offset_x = offsets.get(y, x, k + Part::COUNT) as f64;
            Keypoint::new(
                part,
                sigmoid(logit),
                x as f64 * stride + offset_x,
                y as f64 * stride + offset_y,
            )
        })
        .collect();

    Ok(Pose::from_keypoints(keypoints))
}
