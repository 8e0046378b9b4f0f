use clap::Parser;
use std::path::PathBuf;

/// A terminal client for logging in, signing up, and reviewing account
/// activity
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// The backend to talk to. Only the protocol and domain, e.g.
    /// `https://auth.example.com`.
    #[clap(long, env = "GATEKEEP_SERVER", default_value = "http://localhost:3000")]
    pub server: String,

    /// Where should we store the session and logs?
    #[clap(long, env = "GATEKEEP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// An ipinfo-compatible service for looking up where we're connecting
    /// from.
    #[clap(long, env = "GATEKEEP_IPINFO_URL", default_value = "https://ipinfo.io")]
    pub ipinfo_url: String,

    /// Access token for the lookup service. Lookups work without one, at a
    /// lower rate limit.
    #[clap(long, env = "GATEKEEP_IPINFO_TOKEN")]
    pub ipinfo_token: Option<String>,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("", "", "gatekeep")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
