//! XR Stick Control
//!
//! Drives the transform controller from a scripted XR session so the stick
//! mappings can be exercised without a headset.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xr_stick_control::config::{AppConfig, ConfigWatcher};
use xr_stick_control::scene::{GltfLoader, ModelLoader};
use xr_stick_control::xr::{IdleSession, ScriptedSession, XrPlatform};
use xr_stick_control::App;

/// XR Stick Control - map VR controller sticks to model transforms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, env = "XR_CONFIG")]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Input script to replay (YAML); without one the session has no controllers
    #[arg(short, long)]
    script: Option<String>,

    /// Override the model path from the configuration
    #[arg(short, long)]
    model: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print a summary of the model file and exit
    #[arg(long)]
    inspect_model: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting XR Stick Control v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration, with hot reload when it comes from a file
    let (config_watcher, mut config) = match &args.config {
        Some(path) => {
            info!("Configuration file: {}", path);
            let (watcher, config) = ConfigWatcher::new(path.as_str()).await?;
            (Some(watcher), config)
        }
        None => {
            info!("No configuration file given, using defaults");
            (None, AppConfig::default())
        }
    };

    if let Some(model) = &args.model {
        config.model.url = model.clone();
        config.validate().context("Invalid --model override")?;
    }

    let loader: Arc<dyn ModelLoader> = Arc::new(GltfLoader);

    if args.inspect_model {
        return inspect_model(loader.as_ref(), &config.model.url).await;
    }

    let mut platform: Box<dyn XrPlatform> = match &args.script {
        Some(path) => Box::new(
            ScriptedSession::load(path)
                .await
                .with_context(|| format!("Failed to load input script: {}", path))?,
        ),
        None => {
            info!("No input script given, presenting with no input sources");
            Box::new(IdleSession)
        }
    };

    let app = App::new(config);

    // Loading runs alongside the frame loop; controls are inert until it lands
    let _load = app.start_model_load(loader);

    let app = xr_stick_control::app::run(
        app,
        platform.as_mut(),
        config_watcher,
        args.frames,
        shutdown_signal(),
    )
    .await?;

    app.log_summary();
    info!("XR Stick Control shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn inspect_model(loader: &dyn ModelLoader, url: &str) -> Result<()> {
    use colored::*;

    println!("\n{}", "=== Model Inspection ===".bold().cyan());

    let info = loader
        .load(url)
        .await
        .with_context(|| format!("Failed to inspect model: {}", url))?;

    println!("  File:       {}", info.url.bright_white());
    println!("  Size:       {} bytes", info.byte_length.to_string().green());
    println!(
        "  Generator:  {}",
        info.generator.as_deref().unwrap_or("(unknown)").yellow()
    );
    println!("  Nodes:      {}", info.nodes.to_string().green());
    println!("  Meshes:     {}", info.meshes.to_string().green());
    println!("  Materials:  {}", info.materials.to_string().green());
    println!(
        "  DRACO:      {}",
        if info.draco_compressed {
            "yes (decoder required)".yellow()
        } else {
            "no".green()
        }
    );

    println!("\n{}", "✅ Model inspection complete!".green().bold());
    Ok(())
}
