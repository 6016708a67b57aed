//! PeerLink CLI: run directories and clients, and drive a local client.
//!
//! `directory` and `client` boot a node in-process and run until Ctrl+C.
//! The remaining commands talk to a running client's front endpoint.

mod cli;
mod cmd;
mod ui;

use crate::cli::*;
use clap::Parser;

fn init_tracing_stderr(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = peerlink_kernel::config::load_config(cli.config.as_deref());
    init_tracing_stderr(&config.log_level);

    match cli.command {
        Commands::Directory { listen } => cmd::node::cmd_directory(config, listen),
        Commands::Client {
            api_listen,
            p2p_listen,
            directory,
            advertise,
        } => cmd::node::cmd_client(config, api_listen, p2p_listen, directory, advertise),
        Commands::Register {
            login,
            password,
            address,
            api,
        } => cmd::client::cmd_register(&config, &login, &password, address, api),
        Commands::Send { to, text, api } => cmd::client::cmd_send(&config, &to, &text, api),
        Commands::Conversation { peer, json, api } => {
            cmd::client::cmd_conversation(&config, &peer, json, api)
        }
        Commands::Health { api } => cmd::client::cmd_health(&config, api),
    }
}
