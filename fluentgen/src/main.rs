//! `fluentgen` command-line entry point.
//!
//! Run with: `fluentgen --model model.xml --out-dir src/IoFluently`

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use fluentgen::{GeneratorConfig, generate_from_file};
use fluentgen_codegen::OptionalPropertyMode;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generates fluent properties and extension wrappers for a service contract.
#[derive(Debug, Parser)]
#[command(name = "fluentgen", version, about)]
struct Cli {
    /// XML model document describing the contract.
    #[arg(short, long)]
    model: PathBuf,

    /// Bare or namespace-qualified contract name.
    #[arg(short, long, default_value = "IIoService")]
    contract: String,

    /// XML generator profile; defaults to the IoFluently profile.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the generated files are written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Only check that the generated files are up to date.
    #[arg(long)]
    check: bool,

    /// Overrides how optional-returning properties are emitted.
    #[arg(long, value_enum)]
    optional_properties: Option<PropertyMode>,

    /// Increases log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PropertyMode {
    Unwrap,
    Raw,
}

impl From<PropertyMode> for OptionalPropertyMode {
    fn from(mode: PropertyMode) -> Self {
        match mode {
            PropertyMode::Unwrap => Self::Unwrap,
            PropertyMode::Raw => Self::Raw,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();
    tracing::debug!(?cli, "parsed arguments");

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when `--check` finds stale files.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(mode) = cli.optional_properties {
        config.optional_property_mode = mode.into();
    }

    let sources = generate_from_file(&cli.model, &cli.contract, &config).with_context(|| {
        format!(
            "failed to generate '{}' from {}",
            cli.contract,
            cli.model.display()
        )
    })?;

    if cli.check {
        let stale = sources.check_against(&cli.out_dir, &config)?;
        for path in &stale {
            eprintln!("out of date: {}", path.display());
        }
        return Ok(stale.is_empty());
    }

    sources
        .write_to(&cli.out_dir, &config)
        .with_context(|| format!("failed to write to {}", cli.out_dir.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["fluentgen", "--model", "model.xml"]).expect("parse");
        assert_eq!(cli.contract, "IIoService");
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert!(!cli.check);
        assert!(cli.optional_properties.is_none());
    }

    #[test]
    fn test_cli_raw_mode() {
        let cli = Cli::try_parse_from([
            "fluentgen",
            "-m",
            "model.xml",
            "--optional-properties",
            "raw",
            "-vv",
        ])
        .expect("parse");
        assert!(matches!(cli.optional_properties, Some(PropertyMode::Raw)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_run_writes_and_checks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model = dir.path().join("model.xml");
        std::fs::write(
            &model,
            r#"<model><contract namespace="IoFluently" name="IIoService">
                <method name="Exists">
                    <returns><type namespace="System" name="Boolean"/></returns>
                    <parameter name="path"><type namespace="IoFluently" name="AbsolutePath"/></parameter>
                </method>
            </contract></model>"#,
        )
        .expect("write model");

        let out_dir = dir.path().to_string_lossy().to_string();
        let model_arg = model.to_string_lossy().to_string();

        let check = Cli::try_parse_from(["fluentgen", "-m", model_arg.as_str(), "-o", out_dir.as_str(), "--check"])
            .expect("parse");
        assert!(!run(&check).expect("check"));

        let generate =
            Cli::try_parse_from(["fluentgen", "-m", model_arg.as_str(), "-o", out_dir.as_str()]).expect("parse");
        assert!(run(&generate).expect("generate"));
        assert!(dir.path().join("PartialClasses.g.cs").exists());

        assert!(run(&check).expect("check"));
    }

    #[test]
    fn test_run_missing_contract() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model = dir.path().join("model.xml");
        std::fs::write(&model, "<model/>").expect("write model");
        let model_arg = model.to_string_lossy().to_string();
        let out_dir = dir.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["fluentgen", "-m", model_arg.as_str(), "-o", out_dir.as_str()])
            .expect("parse");
        let err = run(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("IIoService"));
        assert!(!dir.path().join("IoExtensions.g.cs").exists());
    }
}
