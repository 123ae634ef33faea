pub mod args;
pub mod report;

use timestamp_client::{TimestampClient, Verdict};
use tracing::error;

use crate::exit_codes;
use args::Cli;

/// Run the pipeline for the parsed arguments and return the exit code.
pub async fn run(cli: Cli) -> i32 {
    let config = cli.to_config();

    let result = match TimestampClient::new(config) {
        Ok(client) => client.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            print!("{}", report::render(&report));
            if report.verdict == Verdict::Failed && cli.fail_on_untrusted {
                exit_codes::VERIFICATION_FAILED
            } else {
                exit_codes::SUCCESS
            }
        }
        Err(e) => {
            error!(kind = e.kind(), exit_code = e.exit_code(), error = %e, "run failed");
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
