//! Anura - acoustic survey pipeline for frog call detection.
//!
//! This crate stages classifier training runs, scores field recordings with
//! an exported model, and aggregates per-clip detection scores into survey
//! summary tables.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod recorder;
pub mod scores;
pub mod tracking;

use clap::Parser;
use cli::{AggregateArgs, Cli, Command, PredictArgs, TrainArgs};
use config::{Config, config_file_path, load_config, save_config};
use model::{BundleLearner, OnnxClassifier, TrainSpec};
use pipeline::{AggregateOptions, PredictOptions, TrainOptions};
use recorder::lookup_timezone;
use scores::ThresholdSet;
use std::path::Path;
use tracing::info;
use tracking::{JsonlSession, NullSession, RunInfo, TrackingSession};

pub use error::{Error, Result};

/// Main entry point for the anura CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let config_path = cli.global.config.as_deref();
    match cli.command {
        Command::Train(args) => handle_train(&args, &load_validated_config(config_path)?),
        Command::Predict(args) => handle_predict(
            &args,
            &load_validated_config(config_path)?,
            cli.global.quiet,
        ),
        Command::Aggregate(args) => handle_aggregate(&args, &load_validated_config(config_path)?),
        Command::Config { action } => handle_config_command(action, config_path),
    }
}

/// Load the config file and reject bad values before any stage runs.
fn load_validated_config(path: Option<&Path>) -> Result<Config> {
    let config = load_config(path)?;
    config::validate_config(&config)?;
    Ok(config)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT session logging is suppressed by default; -v raises it together
    // with our own level.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

/// Open the tracking session a stage was asked for.
fn open_session(
    tracking: Option<&Path>,
    project: &str,
    stage: &str,
    run_name: Option<String>,
    comment: Option<String>,
) -> Result<Box<dyn TrackingSession>> {
    let Some(path) = tracking else {
        return Ok(Box::new(NullSession));
    };

    let run = RunInfo {
        project: project.to_string(),
        name: run_name
            .unwrap_or_else(|| format!("{stage}-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"))),
        comment,
    };
    info!("Tracking run '{}' in {}", run.name, path.display());
    Ok(Box::new(JsonlSession::create(path, &run)?))
}

fn handle_train(args: &TrainArgs, config: &Config) -> Result<()> {
    let save_path = args
        .checkpoint_dir
        .clone()
        .or_else(|| config.train.checkpoint_dir.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no checkpoint directory specified (use -o or set train.checkpoint_dir in config)".to_string(),
        })?;

    let spec = TrainSpec {
        architecture: config.train.architecture.clone(),
        classes: config.classes.clone(),
        sample_duration: config.train.sample_duration,
        preprocess: config.train.preprocess.clone(),
        epochs: args.epochs.unwrap_or(config.train.epochs),
        batch_size: args.batch_size.unwrap_or(config.train.batch_size),
        workers: args.workers.unwrap_or(config.train.workers),
        learning_rate: args.learning_rate.unwrap_or(config.train.learning_rate),
        save_path,
        save_interval: config.train.save_interval,
        log_interval: config.train.log_interval,
        validation_interval: config.train.validation_interval,
    };

    let options = TrainOptions {
        train_table: args.train_table.clone(),
        val_table: args.val_table.clone(),
        spec,
    };

    let mut session = open_session(
        args.tracking.as_deref(),
        &config.project.name,
        "train",
        args.run_name.clone(),
        args.comment.clone(),
    )?;

    let report = pipeline::run_train(&mut BundleLearner, &options, session.as_mut())?;
    for artifact in &report.artifacts {
        info!("Artifact: {}", artifact.display());
    }
    Ok(())
}

fn handle_predict(args: &PredictArgs, config: &Config, quiet: bool) -> Result<()> {
    let manifest = args
        .model
        .clone()
        .or_else(|| config.model.manifest.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no model manifest specified (use -m or set model.manifest in config)"
                .to_string(),
        })?;
    let score_dir = args
        .score_dir
        .clone()
        .or_else(|| config.predict.score_dir.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no score directory specified (use -o or set predict.score_dir in config)"
                .to_string(),
        })?;

    info!("Loading model: {}", manifest.display());
    let classifier =
        OnnxClassifier::load(&manifest, args.workers.unwrap_or(config.predict.workers))?;

    let options = PredictOptions {
        dataset_dir: args.dataset.clone(),
        score_dir,
        batch_size: args.batch_size.unwrap_or(config.predict.batch_size),
        card_filter: args
            .card_filter
            .clone()
            .or_else(|| config.predict.card_filter.clone()),
        force: args.force,
        progress: !quiet && !args.no_progress,
    };

    let mut session = open_session(
        args.tracking.as_deref(),
        &config.project.name,
        "predict",
        args.run_name.clone(),
        args.comment.clone(),
    )?;

    pipeline::run_predict(&classifier, &options, session.as_mut())?;
    Ok(())
}

fn handle_aggregate(args: &AggregateArgs, config: &Config) -> Result<()> {
    let score_dir = args
        .scores
        .clone()
        .or_else(|| config.aggregate.score_dir.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no score directory specified (pass one or set aggregate.score_dir in config)".to_string(),
        })?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.aggregate.output_dir.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no output directory specified (use -o or set aggregate.output_dir in config)".to_string(),
        })?;

    let thresholds = ThresholdSet::new(
        args.thresholds
            .clone()
            .unwrap_or_else(|| config.aggregate.thresholds.clone()),
    )?;
    let timezone =
        lookup_timezone(args.timezone.as_deref().unwrap_or(&config.project.timezone))?;

    let mut classes = config.classes.clone();
    if let Some(positive) = &args.positive_class {
        classes.positive.clone_from(positive);
    }
    if let Some(negative) = &args.negative_class {
        classes.negative.clone_from(negative);
    }
    if classes.positive == classes.negative {
        return Err(Error::ConfigValidation {
            message: format!(
                "positive and negative classes must differ, both are '{}'",
                classes.positive
            ),
        });
    }

    let options = AggregateOptions {
        score_dir,
        output_dir,
        thresholds,
        timezone,
        classes,
    };

    let report = pipeline::run_aggregate(&options)?;
    for path in &report.outputs {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_config_command(action: cli::ConfigAction, override_path: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    let target_path = || match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file_path(),
    };

    match action {
        ConfigAction::Init => {
            let path = target_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  set model.manifest and the predict/aggregate stage directories");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(override_path)?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = target_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
