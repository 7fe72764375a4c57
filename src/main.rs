use anyhow::Result;
use clap::Parser;

use liminal::cli::Cli;
use liminal::config::AppConfig;
use liminal::{app, headless};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.no_ui { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = AppConfig::resolve(&cli)?;
    log::debug!("{:?}", config);

    if cli.headless {
        headless::render_to_png(&config, cli.frames, &cli.output)
    } else {
        app::run(config)
    }
}
