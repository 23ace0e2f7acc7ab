use clap::Parser;

use snake_common::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};
use snake_common::{log, logger};
use snake_runner::autopilot::AutopilotKind;
use snake_runner::config::{RunnerConfig, DEFAULT_CONFIG_PATH};
use snake_runner::run::run_session;

#[derive(Parser)]
#[command(name = "snake_runner", about = "Headless single-player snake")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// normal, fast, hard or expert
    #[arg(long)]
    mode: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_ticks: Option<u64>,

    #[arg(long, value_enum)]
    autopilot: Option<AutopilotKind>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> =
        ConfigManager::from_yaml_file(&args.config);
    if config_manager.ensure_exists()? {
        log!("Wrote default config to {}", args.config);
    }

    let config = config_manager
        .get_config()?
        .with_overrides(args.mode.as_deref(), args.seed, args.max_ticks, args.autopilot)?;

    log!(
        "Mode {} on a {}x{} field, autopilot {:?}",
        config.game.mode.name,
        config.game.field_size.width,
        config.game.field_size.height,
        config.autopilot
    );

    let summary = run_session(config).await?;
    if summary.game_over {
        log!("Game over. Final score: {}", summary.score);
    } else {
        log!("Stopped. Score: {}", summary.score);
    }

    Ok(())
}
