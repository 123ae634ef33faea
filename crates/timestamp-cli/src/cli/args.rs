use clap::Parser;
use std::path::PathBuf;

use timestamp_client::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "rest-time-client",
    version,
    about = "Fetch a signed timestamp, verify it, and store data.txt / data.sig",
    override_usage = "rest-time-client [-d] [-l] [-k <PUBLIC_KEY_FILE>] <URL>"
)]
pub struct Cli {
    /// Timestamp endpoint URL
    pub url: Option<String>,

    /// OPTIONAL: enable debug
    #[arg(short, long)]
    pub debug: bool,

    /// OPTIONAL: JSON log lines on stderr (default: plain text)
    #[arg(short, long)]
    pub logging: bool,

    /// OPTIONAL: file with the public key for verification (PEM or DER)
    #[arg(
        short = 'k',
        long = "public-key-file",
        visible_alias = "publicKeyFile",
        env = "TIMESTAMP_CLIENT_PUBLIC_KEY"
    )]
    pub public_key_file: Option<PathBuf>,

    /// Request deadline in seconds
    #[arg(long, env = "TIMESTAMP_CLIENT_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Directory receiving data.txt and data.sig
    #[arg(long, env = "TIMESTAMP_CLIENT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Fail when the producer digest does not match the computed digest
    #[arg(long)]
    pub require_digest_match: bool,

    /// Exit non-zero when the signature is rejected
    #[arg(long)]
    pub fail_on_untrusted: bool,
}

impl Cli {
    pub fn to_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_url(self.url.clone().unwrap_or_default())
            .with_timeout_secs(self.timeout)
            .with_output_dir(self.output_dir.clone())
            .with_require_digest_match(self.require_digest_match);
        if let Some(path) = &self.public_key_file {
            config = config.with_public_key_file(path.clone());
        }
        config
    }
}
