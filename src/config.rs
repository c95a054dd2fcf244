use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};

const DEFAULT_MODEL_PATH: &str = "opencv_face_detector.onnx";
const DEFAULT_INPUT_SIZE: u32 = 300;
const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_SINGLE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_BATCH_THRESHOLD: f32 = 0.87;

/// How batch mode reports an image with two or more qualifying faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MultiFacePolicy {
    /// Emit nothing for the image.
    #[default]
    Skip,
    /// Emit the all-zero line on the error stream.
    ZeroLine,
    /// Report the largest face as if it were the only one.
    Largest,
}

impl std::str::FromStr for MultiFacePolicy {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MultiFacePolicy::Skip),
            "zero-line" | "zero_line" => Ok(MultiFacePolicy::ZeroLine),
            "largest" => Ok(MultiFacePolicy::Largest),
            other => Err(LocatorError::Config(format!(
                "unknown multi-face policy '{}' (expected skip, zero-line or largest)",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(LocatorError::Config(format!(
                "unknown output format '{}' (expected tsv or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LocatorConfigFile {
    model: Option<ModelConfigFile>,
    thresholds: Option<ThresholdConfigFile>,
    batch: Option<BatchConfigFile>,
    output: Option<OutputConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelConfigFile {
    path: Option<PathBuf>,
    input_size: Option<u32>,
    mean: Option<[f32; 3]>,
    scale: Option<f32>,
    swap_rb: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ThresholdConfigFile {
    single: Option<f32>,
    batch: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct BatchConfigFile {
    on_multiple: Option<MultiFacePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OutputConfigFile {
    format: Option<OutputFormat>,
}

/// Model file plus the fixed blob preprocessing the detector was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub path: PathBuf,
    /// Square input side in pixels.
    pub input_size: u32,
    /// Per-channel mean subtracted in blob channel order.
    pub mean: [f32; 3],
    pub scale: f32,
    /// Feed RGB instead of BGR.
    pub swap_rb: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            input_size: DEFAULT_INPUT_SIZE,
            mean: [0.0; 3],
            scale: DEFAULT_SCALE,
            swap_rb: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub model: ModelSettings,
    pub single_threshold: f32,
    pub batch_threshold: f32,
    pub on_multiple: MultiFacePolicy,
    pub format: OutputFormat,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            single_threshold: DEFAULT_SINGLE_THRESHOLD,
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            on_multiple: MultiFacePolicy::default(),
            format: OutputFormat::default(),
        }
    }
}

impl LocatorConfig {
    /// Load defaults, then the file named by `path` (or `FACE_LOCATOR_CONFIG`),
    /// then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("FACE_LOCATOR_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let config_path = path.map(Path::to_path_buf).or(env_path);
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: LocatorConfigFile) -> Self {
        let defaults = ModelSettings::default();
        let model = match file.model {
            Some(model) => ModelSettings {
                path: model.path.unwrap_or(defaults.path),
                input_size: model.input_size.unwrap_or(defaults.input_size),
                mean: model.mean.unwrap_or(defaults.mean),
                scale: model.scale.unwrap_or(defaults.scale),
                swap_rb: model.swap_rb.unwrap_or(defaults.swap_rb),
            },
            None => defaults,
        };
        Self {
            model,
            single_threshold: file
                .thresholds
                .as_ref()
                .and_then(|t| t.single)
                .unwrap_or(DEFAULT_SINGLE_THRESHOLD),
            batch_threshold: file
                .thresholds
                .as_ref()
                .and_then(|t| t.batch)
                .unwrap_or(DEFAULT_BATCH_THRESHOLD),
            on_multiple: file
                .batch
                .and_then(|b| b.on_multiple)
                .unwrap_or_default(),
            format: file.output.and_then(|o| o.format).unwrap_or_default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("FACE_LOCATOR_MODEL") {
            if !path.trim().is_empty() {
                self.model.path = PathBuf::from(path);
            }
        }
        if let Ok(value) = std::env::var("FACE_LOCATOR_THRESHOLD_SINGLE") {
            self.single_threshold = parse_threshold("FACE_LOCATOR_THRESHOLD_SINGLE", &value)?;
        }
        if let Ok(value) = std::env::var("FACE_LOCATOR_THRESHOLD_BATCH") {
            self.batch_threshold = parse_threshold("FACE_LOCATOR_THRESHOLD_BATCH", &value)?;
        }
        if let Ok(value) = std::env::var("FACE_LOCATOR_ON_MULTIPLE") {
            if !value.trim().is_empty() {
                self.on_multiple = value.parse()?;
            }
        }
        Ok(())
    }

    /// Check ranges. Called again by the CLI after flags are applied.
    pub fn validate(&self) -> Result<()> {
        validate_threshold("single-image threshold", self.single_threshold)?;
        validate_threshold("batch threshold", self.batch_threshold)?;
        if self.model.input_size == 0 {
            return Err(LocatorError::Config(
                "model input_size must be greater than zero".into(),
            ));
        }
        if !self.model.scale.is_finite() || self.model.mean.iter().any(|m| !m.is_finite()) {
            return Err(LocatorError::Config(
                "model mean and scale must be finite".into(),
            ));
        }
        Ok(())
    }
}

pub fn validate_threshold(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(LocatorError::Config(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn parse_threshold(var: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| LocatorError::Config(format!("{} must be a number", var)))
}

fn read_config_file(path: &Path) -> Result<LocatorConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        LocatorError::Config(format!(
            "failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        LocatorError::Config(format!("invalid config file {}: {}", path.display(), e))
    })
}
