//! `peerlink directory` and `peerlink client`: run a node until Ctrl+C.

use crate::ui;
use peerlink_kernel::{ClientKernel, DirectoryKernel};
use peerlink_types::config::PeerLinkConfig;

async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl+C, stopping now");
    }
}

pub fn cmd_directory(mut config: PeerLinkConfig, listen: Option<String>) {
    if let Some(addr) = listen {
        config.directory.listen_addr = addr;
    }

    super::runtime().block_on(async {
        let kernel = DirectoryKernel::boot(&config.directory)
            .await
            .unwrap_or_else(|e| ui::fail(&e.to_string()));

        ui::section("PeerLink directory");
        ui::kv("Listening", &kernel.local_addr().to_string());
        ui::kv("Accounts", &config.directory.accounts.len().to_string());
        ui::hint("Press Ctrl+C to stop");

        wait_for_interrupt().await;
        kernel.shutdown().await;
    });
}

pub fn cmd_client(
    mut config: PeerLinkConfig,
    api_listen: Option<String>,
    p2p_listen: Option<String>,
    directory: Option<String>,
    advertise: Option<String>,
) {
    let client = &mut config.client;
    if let Some(addr) = api_listen {
        client.api_listen = addr;
    }
    if let Some(addr) = p2p_listen {
        client.p2p_listen = addr;
    }
    if let Some(addr) = directory {
        client.directory_addr = addr;
    }
    if advertise.is_some() {
        client.advertise_addr = advertise;
    }

    super::runtime().block_on(async {
        let kernel = ClientKernel::boot(&config.client)
            .await
            .unwrap_or_else(|e| ui::fail(&e.to_string()));

        ui::section("PeerLink client");
        ui::kv("Front", &kernel.api_addr().to_string());
        ui::kv("Peer", &kernel.p2p_addr().to_string());
        ui::kv("Advertised", kernel.advertise_addr());
        ui::kv("Directory", &config.client.directory_addr);
        ui::hint("Run `peerlink register <login> <password>` to log in");

        wait_for_interrupt().await;
        kernel.shutdown().await;
    });
}
