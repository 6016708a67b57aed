//! One-shot requests against a running client's front endpoint.

use crate::ui;
use peerlink_types::cancel::CancelSignal;
use peerlink_types::config::PeerLinkConfig;
use peerlink_types::message::Message;
use peerlink_wire::{call, WireRequest, WireResponse};
use std::time::Duration;

/// Send one request and return the response, exiting on transport or
/// remote errors.
fn request(config: &PeerLinkConfig, api: Option<String>, req: WireRequest) -> WireResponse {
    let addr = api.unwrap_or_else(|| config.client.api_listen.clone());
    let timeout = Duration::from_secs(config.client.call_timeout_secs);

    let resp = super::runtime().block_on(async {
        let cancel = CancelSignal::with_deadline(timeout);
        call(&addr, None, req, &cancel).await
    });

    match resp {
        Ok(resp) => {
            if let Some(err) = resp.as_error() {
                ui::fail(&format!("{} ({})", err, err.kind()));
            }
            resp
        }
        Err(e) => {
            ui::error(&format!("Could not reach client at {addr}: {e}"));
            ui::hint("Is `peerlink client` running?");
            std::process::exit(1);
        }
    }
}

pub fn cmd_register(
    config: &PeerLinkConfig,
    login: &str,
    password: &str,
    address: Option<String>,
    api: Option<String>,
) {
    request(
        config,
        api,
        WireRequest::RegisterSession {
            login: login.to_string(),
            password: password.to_string(),
            address,
        },
    );
    ui::success(&format!("Registered as {login}"));
}

pub fn cmd_send(config: &PeerLinkConfig, to: &str, text: &str, api: Option<String>) {
    request(
        config,
        api,
        WireRequest::SendMessage {
            to: to.to_string(),
            content: text.to_string(),
        },
    );
    ui::success(&format!("Sent to {to}"));
}

pub fn cmd_conversation(config: &PeerLinkConfig, peer: &str, json: bool, api: Option<String>) {
    let resp = request(
        config,
        api,
        WireRequest::GetConversation {
            with: peer.to_string(),
        },
    );
    let messages: Vec<Message> = match resp {
        WireResponse::Conversation { messages } => messages,
        other => ui::fail(&format!("Unexpected response: {other:?}")),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&messages).unwrap_or_default()
        );
        return;
    }

    ui::section(&format!("Conversation with {peer}"));
    if messages.is_empty() {
        ui::hint("No messages yet");
    }
    for m in &messages {
        ui::chat_line(&m.author, &m.content, m.author != peer);
    }
}

pub fn cmd_health(config: &PeerLinkConfig, api: Option<String>) {
    match request(config, api, WireRequest::Ping) {
        WireResponse::Pong { uptime_secs } => {
            ui::success("Endpoint is up");
            ui::kv("Uptime", &format!("{uptime_secs}s"));
        }
        other => ui::fail(&format!("Unexpected response: {other:?}")),
    }
}
