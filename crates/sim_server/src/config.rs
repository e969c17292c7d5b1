use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use sim_core::dispatch::DispatchMode;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ride_dispatch",
    about = "Ride-hailing dispatch simulation server",
    version
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "DISPATCH_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory served under /static
    #[arg(long, env = "DISPATCH_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Initial dispatch algorithm (balanced, eta_only, fairness_only)
    #[arg(long, env = "DISPATCH_MODE", default_value = "balanced")]
    pub dispatch_mode: DispatchMode,
}
