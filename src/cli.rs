use crate::{
    config::Config,
    files, probe,
    pipeline::Pipeline,
    report::DirOutcome,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "scanbind")]
#[command(about = "Batch image-to-PDF binder (width/DPI normalization + per-directory assembly)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./scanbind.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the width/DPI target one directory would be normalized to.
    Probe {
        #[arg(long)]
        input: PathBuf,
    },
    /// Convert a single directory of images into one PDF.
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        delete_sources: bool,
    },
    /// Convert a directory tree: one PDF per directory that contains images.
    Run {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        delete_sources: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Probe { input } => probe_dir(&cfg, input),
        Command::Convert {
            input,
            out_dir,
            delete_sources,
        } => convert(&cfg, input, out_dir.as_deref(), *delete_sources),
        Command::Run {
            input,
            out_dir,
            delete_sources,
        } => run(&cfg, input.as_deref(), out_dir.as_deref(), *delete_sources),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("scanbind.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("scanbind.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file {
        let path = if cfg.logging.file_path.is_empty() {
            PathBuf::from(&cfg.paths.out_dir).join("scanbind.log")
        } else {
            PathBuf::from(&cfg.logging.file_path)
        };
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn probe_dir(cfg: &Config, input: &Path) -> Result<()> {
    validate_dir(input)?;
    let files = files::qualifying_files(input)?;
    let target = probe::derive_target(&files, cfg.conversion.width, cfg.conversion.dpi)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "qualifying_files": files.len(),
            "target": target,
        }))?
    );
    Ok(())
}

fn convert(cfg: &Config, input: &Path, out_override: Option<&Path>, delete_flag: bool) -> Result<()> {
    validate_dir(input)?;
    let out_dir = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    ensure_dir(&out_dir)?;
    let delete_sources = delete_flag || cfg.conversion.delete_sources;

    let pipeline = Pipeline::new(cfg);
    let report = pipeline.convert_dir(input, &out_dir, delete_sources)?;

    if cfg.output.print_summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run(
    cfg: &Config,
    input_override: Option<&Path>,
    out_override: Option<&Path>,
    delete_flag: bool,
) -> Result<()> {
    let root = input_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.source_dir));
    let out_dir = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    ensure_dir(&out_dir)?;
    let delete_sources = delete_flag || cfg.conversion.delete_sources;

    info!(
        "run root={} out={} delete_sources={}",
        root.display(),
        out_dir.display(),
        delete_sources
    );

    let pipeline = Pipeline::new(cfg);
    let report = pipeline.run(&root, &out_dir, delete_sources)?;

    if cfg.output.write_report_json {
        let path = out_dir.join(&cfg.output.report_filename);
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("write report {}", path.display()))?;
    }

    if cfg.output.print_summary {
        let converted = report
            .directories
            .iter()
            .filter(|d| d.outcome == DirOutcome::Converted)
            .count();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "source_root": report.source_root,
                "out_dir": report.out_dir,
                "directories": report.directories.len(),
                "converted": converted,
                "status": "ok",
            }))?
        );
    }
    Ok(())
}

fn validate_dir(input: &Path) -> Result<()> {
    if !input.is_dir() {
        return Err(anyhow!("input is not a directory: {}", input.display()));
    }
    Ok(())
}
