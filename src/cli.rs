use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use camgate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "camgate")]
#[command(about = "HTTP gateway for on-demand motionEye snapshots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP gateway
    Server(ServerArgs),
    /// Print the effective configuration (signature redacted) and exit
    ShowConfig(ConfigArgs),
    /// Capture one snapshot for a camera and exit
    Snap(SnapArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (defaults to $CAMGATE_CONFIG or config/camgate.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Address to bind the HTTP server to (overrides server.bind_addr)
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Document served on GET / (overrides server.index_file)
    #[arg(long)]
    pub index_file: Option<PathBuf>,
}

impl ServerArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(address) = self.address {
            config.server.bind_addr = address;
        }
        if let Some(index_file) = &self.index_file {
            config.server.index_file = index_file.clone();
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct SnapArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Logical camera name, e.g. `lobby`
    pub camera: String,
}
