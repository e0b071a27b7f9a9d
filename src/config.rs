use clap::{Args, Parser, Subcommand};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "data/kickoff.json";

#[derive(Parser, Debug)]
#[command(name = "group-kickoff", version, about = "Group project kick-off coordination")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Print the availability heatmap and goal check for one group
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "KICKOFF_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "KICKOFF_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Database file
    #[arg(long, env = "KICKOFF_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Secret used to sign session tokens
    #[arg(long, env = "KICKOFF_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Directory with a front-end build to serve at `/`
    #[arg(long, env = "KICKOFF_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, env = "KICKOFF_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Join code of the group
    #[arg(long)]
    pub code: String,
}

/// Settings the HTTP server is started with
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub secret: String,
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        let secret = match self.secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                log::warn!("KICKOFF_SECRET not set; generated a one-off secret, sessions end on restart");
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(48)
                    .map(char::from)
                    .collect()
            }
        };

        ServerConfig {
            bind: self.bind.clone(),
            port: self.port,
            secret,
            static_dir: self.static_dir.clone(),
        }
    }
}
