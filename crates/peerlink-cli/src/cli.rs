//! Clap CLI definitions for PeerLink.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const AFTER_HELP: &str = "\
\x1b[1;36mExamples:\x1b[0m
  peerlink directory                      Run a directory on 0.0.0.0:3000
  peerlink client --advertise me:4000     Run a client reachable at me:4000
  peerlink register alice pass            Log the local client in as alice
  peerlink send bob \"hi there\"            Send a message to bob
  peerlink conversation bob               Show the conversation with bob
  peerlink health                         Check that the local client is up";

/// PeerLink: peer-to-peer text messaging with a lightweight directory.
#[derive(Parser)]
#[command(name = "peerlink", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a directory service until interrupted.
    Directory {
        /// Address to listen on (overrides config).
        #[arg(long)]
        listen: Option<String>,
    },
    /// Run a client (front and peer endpoints) until interrupted.
    Client {
        /// Front endpoint address for the local application.
        #[arg(long)]
        api_listen: Option<String>,
        /// Peer endpoint address for inbound messages.
        #[arg(long)]
        p2p_listen: Option<String>,
        /// Directory address.
        #[arg(long)]
        directory: Option<String>,
        /// Address announced to the directory.
        #[arg(long)]
        advertise: Option<String>,
    },
    /// Register the local client with the directory.
    Register {
        login: String,
        password: String,
        /// Address to announce instead of the client's default.
        #[arg(long)]
        address: Option<String>,
        /// Front endpoint of the client to drive.
        #[arg(long)]
        api: Option<String>,
    },
    /// Send a message to another user.
    Send {
        to: String,
        text: String,
        /// Front endpoint of the client to drive.
        #[arg(long)]
        api: Option<String>,
    },
    /// Show the local conversation with a peer.
    Conversation {
        peer: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Front endpoint of the client to drive.
        #[arg(long)]
        api: Option<String>,
    },
    /// Ping a PeerLink endpoint.
    Health {
        /// Endpoint to ping (defaults to the local client's front endpoint).
        #[arg(long)]
        api: Option<String>,
    },
}
