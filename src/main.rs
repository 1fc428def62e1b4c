//! WorkAI command-line client.

use clap::Parser;
use log::error;

use service::config::Config;
use service::logging::Logger;

mod commands;

#[derive(Parser)]
#[command(name = "workai", version, about = "Command-line client for the WorkAI platform")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    Logger::init_logger(&cli.config);

    if let Err(e) = commands::run(cli.config, cli.command).await {
        error!("Command failed: {}", e);
        eprintln!("{}", commands::user_message(&e));
        std::process::exit(1);
    }
}
