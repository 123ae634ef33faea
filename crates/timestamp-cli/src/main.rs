use clap::Parser;
use tracing::info;

mod cli;
pub mod exit_codes;
mod logging;

use cli::args::Cli;

const APP_NAME: &str = "rest-time-client";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.debug, cli.logging) {
        eprintln!("fatal: {e:#}");
        std::process::exit(exit_codes::INTERNAL_ERROR);
    }
    info!(
        app = APP_NAME,
        version = env!("CARGO_PKG_VERSION"),
        "start"
    );

    let code = cli::run(cli).await;
    std::process::exit(code);
}
