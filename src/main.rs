use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use dprpbuilder::{
    config::{BuildConfig, DEFAULT_CONFIG},
    pack::PackType,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build Minecraft datapacks and resource packs from source folders.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Build configuration. Created with defaults if it does not exist.
    #[arg(short, long, default_value = "./dprpbuilder.ini")]
    config: PathBuf,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dprpbuilder={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).without_time())
        .init();
}

fn run(args: &Args) -> Result<()> {
    if !args.config.exists() {
        println!("No build configs found. Creating build configs...");
        fs::write(&args.config, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", args.config.display()))?;
        println!(
            "Build configs created at {}. Please edit them before running this program again.",
            args.config.display()
        );
        return Ok(());
    }

    let mut config = BuildConfig::defaults().context("Default configuration is invalid")?;
    let user_config = BuildConfig::from_ini_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config.replace_with(user_config);

    build(&config, PackType::Datapack, "Could not find data folder. Skipping datapack build.")?;
    build(
        &config,
        PackType::ResourcePack,
        "Could not find assets folder. Skipping resource pack build.",
    )?;

    Ok(())
}

fn build(config: &BuildConfig, pack_type: PackType, skip_message: &str) -> Result<()> {
    let Some(request) = config.request(pack_type)? else {
        println!("{skip_message}");
        return Ok(());
    };

    let built = request
        .build()
        .with_context(|| format!("Failed to build {}", request.name))?;
    let built = built.canonicalize().unwrap_or(built);
    println!("{} created at {}.", pack_type.display_name(), built.display());

    Ok(())
}
