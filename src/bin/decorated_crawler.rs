use decorated_crawler::cli::run_cli;
use decorated_crawler::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let _guard = init_logging_with_config(&LogConfig::from_env())?;
    run_cli()
}
