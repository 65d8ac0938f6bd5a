use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use vigil_cli::cli::{Cli, Command};
use vigil_cli::{commands, config};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let output = match &cli.command {
        Command::Score(args) => commands::score(args, &load_config(&cli)?)?,
        Command::Check(args) => commands::check(args, &load_config(&cli)?)?,
        Command::Config(command) => commands::config(command, cli.config.as_deref())?,
    };
    print!("{output}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<config::VigilConfig> {
    match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
