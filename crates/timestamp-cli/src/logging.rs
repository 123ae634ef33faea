//! Process-wide tracing subscriber.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over both flags. `structured` emits one JSON object per
/// line on stderr.
pub fn init(debug: bool, structured: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "info,timestamp_client=debug,rest_time_client=debug"
    } else {
        "info"
    }
}
