//! Itchio2D engine entry point.
//!
//! Loads configuration, applies command-line overrides, brings the engine up
//! for the selected game type and runs the frame loop until the window
//! closes or the process is asked to stop.

use anyhow::{anyhow, Result};
use tracing::info;

use itchio_engine::cli::CliArgs;
use itchio_engine::{logging, AppConfig, Engine};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(args).await {
        // Logging may not be up yet when configuration fails.
        eprintln!("❌ Failed to run engine: {:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let mut config = AppConfig::load_from_file(&args.config_path).await?;
    args.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    logging::setup_logging(&config.logging)?;
    display_banner();

    info!(
        "📂 Config: {} | Game type: {} | Systems: {}",
        args.config_path.display(),
        config.engine.game_type,
        config.systems_dir().display()
    );

    let mut engine = Engine::initialize(config)?;
    let reason = engine.run().await?;
    engine.shutdown();

    let stats = engine.stats();
    info!(
        "👋 Exiting ({:?}) after {} frames ({:.2}s simulated)",
        reason, stats.frames, stats.simulated_seconds
    );
    Ok(())
}

fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║             🎮 ITCHIO 2D ENGINE          ║");
    info!("║                  v{:<23}║", version);
    info!("║                                          ║");
    info!("║  Hot-pluggable game systems              ║");
    info!("║  Fixed-timestep frame driver             ║");
    info!("╚══════════════════════════════════════════╝");
}
