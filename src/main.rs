//! sniffhash - byte-signature content sniffing and perceptual image hashing

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sniffhash::cli::{self, Cli, OutputFormat};
use sniffhash::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    // JSON logs alongside JSON output, compact otherwise; both on stderr
    let json = cli.output == OutputFormat::Json;
    tracing_subscriber::registry()
        .with((!json).then(|| {
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr)
        }))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with(EnvFilter::from_default_env().add_directive(format!("sniffhash={level}").parse()?))
        .init();

    tracing::debug!("Using config {}", config_path.display());
    cli::commands::run(cli.command, &config, &config_path, cli.output)
}
