//! Pose model configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Default square side the request image is normalized to.
pub const DEFAULT_SQUARE_RESOLUTION: u32 = 250;

/// Default directory searched for model files.
pub const DEFAULT_MODEL_DIR: &str = "models/posenet";

/// PoseNet backbone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    #[default]
    ResNet50,
    MobileNetV1,
}

impl Architecture {
    /// Output strides the backbone was exported with.
    pub fn supported_output_strides(self) -> &'static [u32] {
        match self {
            Architecture::ResNet50 => &[16, 32],
            Architecture::MobileNetV1 => &[8, 16],
        }
    }

    /// Lowercase identifier used in model file names.
    pub fn slug(self) -> &'static str {
        match self {
            Architecture::ResNet50 => "resnet50",
            Architecture::MobileNetV1 => "mobilenetv1",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::ResNet50 => f.write_str("ResNet50"),
            Architecture::MobileNetV1 => f.write_str("MobileNetV1"),
        }
    }
}

impl FromStr for Architecture {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resnet50" => Ok(Architecture::ResNet50),
            "mobilenetv1" | "mobilenet" => Ok(Architecture::MobileNetV1),
            other => Err(EngineError::invalid_config(format!(
                "unknown architecture '{other}' (expected ResNet50 or MobileNetV1)"
            ))),
        }
    }
}

/// Fixed configuration the model is loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Network backbone
    pub architecture: Architecture,
    /// Output stride of the heatmaps
    pub output_stride: u32,
    /// Side of the square surface requests are normalized to
    pub square_resolution: u32,
    /// Weight precision in bytes (1, 2 or 4)
    pub quant_bytes: u8,
    /// Explicit model file, overriding the resolved default
    pub model_path: Option<PathBuf>,
    /// Directory searched when no explicit path is set
    pub model_dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            architecture: Architecture::ResNet50,
            output_stride: 32,
            square_resolution: DEFAULT_SQUARE_RESOLUTION,
            quant_bytes: 4,
            model_path: None,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

impl ModelConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables fall back to defaults; set but unparseable values are
    /// rejected rather than silently replaced.
    pub fn from_env() -> EngineResult<Self> {
        let defaults = Self::default();

        let architecture = match std::env::var("POSE_ARCHITECTURE") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.architecture,
        };

        let config = Self {
            architecture,
            output_stride: env_number("POSE_OUTPUT_STRIDE")?.unwrap_or(defaults.output_stride),
            square_resolution: env_number("POSE_SQUARE_RESOLUTION")?
                .unwrap_or(defaults.square_resolution),
            quant_bytes: env_number("POSE_QUANT_BYTES")?.unwrap_or(defaults.quant_bytes),
            model_path: std::env::var("POSE_MODEL_PATH").ok().map(PathBuf::from),
            model_dir: std::env::var("POSE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the model cannot be loaded with.
    pub fn validate(&self) -> EngineResult<()> {
        if !self
            .architecture
            .supported_output_strides()
            .contains(&self.output_stride)
        {
            return Err(EngineError::invalid_config(format!(
                "output stride {} is not supported by {} (expected one of {:?})",
                self.output_stride,
                self.architecture,
                self.architecture.supported_output_strides()
            )));
        }

        if !matches!(self.quant_bytes, 1 | 2 | 4) {
            return Err(EngineError::invalid_config(format!(
                "quant bytes must be 1, 2 or 4, got {}",
                self.quant_bytes
            )));
        }

        if self.square_resolution <= self.output_stride {
            return Err(EngineError::invalid_config(format!(
                "square resolution {} must exceed the output stride {}",
                self.square_resolution, self.output_stride
            )));
        }

        Ok(())
    }

    /// Resolution the network actually runs at.
    ///
    /// PoseNet needs `(resolution - 1) % stride == 0`; other sides are snapped
    /// to `floor(side / stride) * stride + 1`.
    pub fn input_resolution(&self) -> u32 {
        let side = self.square_resolution;
        let stride = self.output_stride;
        if (side - 1) % stride == 0 {
            side
        } else {
            (side / stride) * stride + 1
        }
    }

    /// Model file to load.
    pub fn resolved_model_path(&self) -> PathBuf {
        match &self.model_path {
            Some(path) => path.clone(),
            None => self.model_dir.join(format!(
                "posenet-{}-stride{}-q{}.onnx",
                self.architecture.slug(),
                self.output_stride,
                self.quant_bytes
            )),
        }
    }
}

fn env_number<T: FromStr>(key: &str) -> EngineResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::invalid_config(format!("{key} is not a valid number: '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.architecture, Architecture::ResNet50);
        assert_eq!(config.output_stride, 32);
        assert_eq!(config.quant_bytes, 4);
    }

    #[test]
    fn test_architecture_parse() {
        assert_eq!("ResNet50".parse::<Architecture>().unwrap(), Architecture::ResNet50);
        assert_eq!(
            "mobilenetv1".parse::<Architecture>().unwrap(),
            Architecture::MobileNetV1
        );
        assert!("vgg16".parse::<Architecture>().is_err());
    }

    #[test]
    fn test_stride_must_match_architecture() {
        let config = ModelConfig {
            architecture: Architecture::ResNet50,
            output_stride: 8,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let config = ModelConfig {
            architecture: Architecture::MobileNetV1,
            output_stride: 8,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quant_bytes_validated() {
        let config = ModelConfig {
            quant_bytes: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolution_must_exceed_stride() {
        let config = ModelConfig {
            square_resolution: 32,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_input_resolution_snapping() {
        let mut config = ModelConfig::default();

        config.square_resolution = 257;
        assert_eq!(config.input_resolution(), 257);

        config.square_resolution = 250;
        assert_eq!(config.input_resolution(), 225);

        config.square_resolution = 200;
        assert_eq!(config.input_resolution(), 193);

        config.output_stride = 16;
        config.square_resolution = 200;
        assert_eq!(config.input_resolution(), 193);
    }

    #[test]
    fn test_resolved_model_path() {
        let config = ModelConfig::default();
        assert_eq!(
            config.resolved_model_path(),
            PathBuf::from("models/posenet/posenet-resnet50-stride32-q4.onnx")
        );

        let config = ModelConfig {
            model_path: Some(PathBuf::from("/opt/model.onnx")),
            ..Default::default()
        };
        assert_eq!(config.resolved_model_path(), PathBuf::from("/opt/model.onnx"));
    }
}
