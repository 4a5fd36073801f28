use clap::Parser;
use logsince::{Cli, execute, init_logging};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(e.exit_code());
        }
    };
    init_logging(config.debug);

    if let Err(e) = execute(&config).await {
        eprintln!("ERROR: {}", e);
        process::exit(e.exit_code());
    }
}
