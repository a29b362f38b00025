use brrtmvc::cli::{run_cli, Cli};
use brrtmvc::logging::{init_logging_with_config, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging_with_config(&LogConfig::from_env())?;
    let cli = Cli::parse();
    run_cli(cli, &mut std::io::stdout().lock())
}
