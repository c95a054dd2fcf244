//! detect - report the largest face in an image, or in every file of a directory
//!
//! Single image:  `detect photo.jpg [threshold]`  prints `cx cy size`
//! Directory:     `detect photos/ [threshold]`    prints `cx\tcy\tsize\tpath`
//!                per file with exactly one face, and `0\t0\t0\tpath` on
//!                stderr for files without one.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

#[cfg(feature = "backend-tract")]
use face_locator::detect::TractBackend;
use face_locator::{
    config::validate_threshold, DetectorBackend, Locator, LocatorConfig, LocatorError,
    MultiFacePolicy, OutputFormat, Reporter, StubBackend, Target,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// ONNX face detector via tract.
    Tract,
    /// Reports no faces; exercises decoding and output only.
    Stub,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Report the centroid and size of the largest face in an image or directory"
)]
struct Args {
    /// Image file, or directory whose regular files are all images.
    path: PathBuf,

    /// Confidence threshold (default 0.5 for one image, 0.87 for a directory).
    threshold: Option<f32>,

    /// ONNX model file.
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, env = "FACE_LOCATOR_CONFIG")]
    config: Option<PathBuf>,

    /// What to print for a directory image with several faces.
    #[arg(long, value_enum)]
    on_multiple: Option<MultiFacePolicy>,

    /// Output line format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Inference backend.
    #[arg(long, value_enum, default_value_t = BackendKind::Tract)]
    backend: BackendKind,
}

fn main() -> ExitCode {
    // Zero lines share stderr with logs, so stay quiet unless asked.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let code = err
                .downcast_ref::<LocatorError>()
                .map(LocatorError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = LocatorConfig::load(args.config.as_deref()).context("load configuration")?;
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(policy) = args.on_multiple {
        config.on_multiple = policy;
    }
    if let Some(format) = args.format {
        config.format = format;
    }

    let target = Target::resolve(&args.path)?;
    let threshold = match args.threshold {
        Some(threshold) => positional_threshold(threshold)?,
        None if target.is_directory() => config.batch_threshold,
        None => config.single_threshold,
    };

    let backend = load_backend(args.backend, &config)?;
    backend.warm_up().context("detector warm-up")?;
    let locator = Locator::new(backend, threshold).with_policy(config.on_multiple);
    log::info!(
        "backend={} threshold={:.2} target={}",
        locator.backend_name(),
        locator.threshold(),
        target.path().display()
    );

    let mut reporter = Reporter::stdio(config.format);
    match target {
        Target::SingleImage(path) => {
            locator
                .run_single(&path, &mut reporter)
                .with_context(|| format!("process {}", path.display()))?;
        }
        Target::Directory(dir) => {
            locator.run_batch(&dir, &mut reporter)?;
        }
    }
    Ok(())
}

/// A threshold given on the command line is a usage error when out of range.
fn positional_threshold(value: f32) -> Result<f32, LocatorError> {
    validate_threshold("threshold", value).map_err(|e| match e {
        LocatorError::Config(message) => LocatorError::Usage(message),
        other => other,
    })?;
    Ok(value)
}

fn load_backend(kind: BackendKind, config: &LocatorConfig) -> Result<Box<dyn DetectorBackend>> {
    match kind {
        BackendKind::Stub => {
            log::warn!("stub backend selected; no faces will be reported");
            Ok(Box::new(StubBackend::new()))
        }
        #[cfg(feature = "backend-tract")]
        BackendKind::Tract => {
            let backend = TractBackend::load(&config.model)?;
            Ok(Box::new(backend))
        }
        #[cfg(not(feature = "backend-tract"))]
        BackendKind::Tract => Err(LocatorError::Config(format!(
            "cannot load {}: built without the backend-tract feature",
            config.model.path.display()
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_optional_and_positional() {
        let args = Args::try_parse_from(["detect", "faces/"]).unwrap();
        assert_eq!(args.path, PathBuf::from("faces/"));
        assert!(args.threshold.is_none());
        assert_eq!(args.backend, BackendKind::Tract);

        let args = Args::try_parse_from(["detect", "a.jpg", "0.7", "--on-multiple", "zero-line"])
            .unwrap();
        assert_eq!(args.threshold, Some(0.7));
        assert_eq!(args.on_multiple, Some(MultiFacePolicy::ZeroLine));
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        let err = Args::try_parse_from(["detect"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_threshold_text_is_rejected() {
        assert!(Args::try_parse_from(["detect", "a.jpg", "high"]).is_err());
    }

    #[test]
    fn out_of_range_threshold_is_a_usage_error() {
        let args = Args::try_parse_from(["detect", "a.jpg", "1.5"]).unwrap();
        let err = positional_threshold(args.threshold.unwrap()).unwrap_err();
        assert!(matches!(err, LocatorError::Usage(_)));
        assert_eq!(err.exit_code(), 1);

        assert!(matches!(
            positional_threshold(f32::NAN),
            Err(LocatorError::Usage(_))
        ));
        assert_eq!(positional_threshold(0.0).unwrap(), 0.0);
        assert_eq!(positional_threshold(1.0).unwrap(), 1.0);
    }

    #[test]
    fn run_rejects_out_of_range_threshold_before_detecting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let args = Args::try_parse_from(["detect", path, "2", "--backend", "stub"]).unwrap();

        let err = run(args).unwrap_err();
        let err = err.downcast_ref::<LocatorError>().unwrap();
        assert!(matches!(err, LocatorError::Usage(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
