use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::commands;
use crate::commands::InputOverrides;
use crate::commands::emit::{EmitOptions, EmitOutcome};
use crate::descriptor::emit::EmitFormat;
use crate::descriptor::model::BuildVariant;
use crate::env_loader::DotenvLoadOutcome;

#[derive(Debug, Parser)]
#[command(name = "build-descriptor")]
#[command(version, about = "Resolve Android build descriptors for a packaging step")]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level unless BUILD_DESCRIPTOR_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// descriptor.toml to read instead of BUILD_DESCRIPTOR_CONFIG or the default lookup.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve and print the full build descriptor.
    Resolve(InputArgs),
    /// Print the manifest placeholders only.
    Placeholders(InputArgs),
    /// Render the descriptor for the packaging step.
    Emit(EmitArgs),
    /// Show the layered configuration before resolution.
    Config(ConfigArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct InputArgs {
    /// Build timestamp in epoch seconds (default: SOURCE_DATE_EPOCH or now).
    #[arg(long, allow_negative_numbers = true)]
    pub now: Option<i64>,
    #[arg(long)]
    pub application_id: Option<String>,
    #[arg(long)]
    pub version_name: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub min_sdk: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub target_sdk: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub compile_sdk: Option<i64>,
    #[arg(long, value_enum)]
    pub variant: Option<BuildVariant>,
    /// Flutter local.properties to read versionName and SDK levels from.
    #[arg(long)]
    pub local_properties: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EmitArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, value_enum, default_value_t = EmitFormat::Properties)]
    pub format: EmitFormat,
    /// Write atomically to this path instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Default)]
pub struct ConfigArgs {
    #[arg(long)]
    pub local_properties: Option<PathBuf>,
}

fn overrides_from(input: &InputArgs, config: Option<PathBuf>) -> InputOverrides {
    InputOverrides {
        config_path: config,
        local_properties: input.local_properties.clone(),
        now: input.now,
        application_id: input.application_id.clone(),
        version_name: input.version_name.clone(),
        min_sdk: input.min_sdk,
        target_sdk: input.target_sdk,
        compile_sdk: input.compile_sdk,
        variant: input.variant,
    }
}

fn print_report(report: &commands::CommandReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("command: {}", report.command);
    println!("ok: {}", report.ok);
    if !report.details.is_empty() {
        println!("details:");
        for detail in &report.details {
            println!("- {detail}");
        }
    }
    if !report.issues.is_empty() {
        println!("issues:");
        for issue in &report.issues {
            println!("- {issue}");
        }
    }
    Ok(())
}

pub fn run(dotenv: DotenvLoadOutcome) -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    tracing::debug!(?dotenv, "dotenv");

    let report = match &cli.command {
        Command::Resolve(args) => {
            commands::resolve::run(&overrides_from(args, cli.config.clone()))?
        }
        Command::Placeholders(args) => {
            commands::placeholders::run(&overrides_from(args, cli.config.clone()))?
        }
        Command::Emit(args) => {
            let overrides = overrides_from(&args.input, cli.config.clone());
            let opts = EmitOptions {
                format: args.format,
                out: args.out.clone(),
            };
            match commands::emit::run(&overrides, &opts)? {
                EmitOutcome::Stdout(text) => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(text.as_bytes())?;
                    stdout.flush()?;
                    return Ok(());
                }
                EmitOutcome::Written(report) => report,
            }
        }
        Command::Config(args) => commands::show_config::run(&InputOverrides {
            config_path: cli.config.clone(),
            local_properties: args.local_properties.clone(),
            ..InputOverrides::default()
        })?,
    };

    print_report(&report, cli.json)?;

    if report.ok {
        Ok(())
    } else {
        std::process::exit(2);
    }
}
