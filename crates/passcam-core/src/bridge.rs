//! Message protocol between the native shell and the hosted page.
//!
//! Messages are JSON envelopes tagged by a `type` field. Native to page
//! delivery goes through script injection (`window.postMessage`), page to
//! native through the webview's message callback.
//!
//! # Handshake
//!
//! Injection into a page that has not installed its listener yet is lost.
//! Instead of waiting on timers, the channel runs an explicit handshake:
//!
//! 1. On every page load native posts `{"type":"BRIDGE_READY"}`
//! 2. The page answers `{"type":"BRIDGE_ACK"}` once it listens
//! 3. Outbound messages posted before the ack are queued and flushed in
//!    order when it arrives
//!
//! [`BridgeChannel`] is the state machine; it performs no I/O and returns
//! the messages the caller must deliver.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding page messages.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The payload is not valid JSON or not a known envelope.
    #[error("Malformed bridge message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `BRIDGE_ACK` arrived before any `BRIDGE_READY` was sent.
    #[error("Unsolicited bridge acknowledgement")]
    UnexpectedAck,
}

/// Result of a successful upload, forwarded to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub upload_id: String,
    pub image_url: String,
}

/// A generated PDF the page wants saved and shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPayload {
    pub base64_data: String,
    pub filename: String,
}

/// Page to native envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// The page is listening; answers `BRIDGE_READY`.
    BridgeAck,
    OpenCamera,
    DownloadPdf { payload: PdfPayload },
}

impl InboundMessage {
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Native to page envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    BridgeReady,
    UploadComplete { payload: UploadResult },
    PdfDownloadSuccess,
    PdfDownloadError { error: String },
}

impl OutboundMessage {
    pub fn to_json(&self) -> String {
        // Plain string/struct variants always serialize
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Script that delivers this message to the page's `message` listeners.
    ///
    /// The trailing `true;` keeps iOS webviews from reporting a
    /// non-serializable completion value.
    pub fn injection_script(&self) -> String {
        format!("window.postMessage({}, '*'); true;", self.to_json())
    }
}

/// Commands the page can issue once the envelope is understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    OpenCamera,
    DownloadPdf(PdfPayload),
}

/// What the host must do after receiving a page message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The handshake completed; deliver these queued messages in order.
    Acknowledged(Vec<OutboundMessage>),
    Command(PageCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    /// No page loaded yet.
    #[default]
    Idle,
    /// `BRIDGE_READY` sent, waiting for `BRIDGE_ACK`.
    AwaitingAck,
    Open,
}

/// Handshake and queueing state for one webview.
#[derive(Debug, Default)]
pub struct BridgeChannel {
    state: ChannelState,
    pending: VecDeque<OutboundMessage>,
}

impl BridgeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Reset for a freshly loaded page and return the ready signal to inject.
    ///
    /// Messages still queued for the previous document are kept and will be
    /// delivered to the new one once it acknowledges.
    pub fn page_loaded(&mut self) -> OutboundMessage {
        self.state = ChannelState::AwaitingAck;
        OutboundMessage::BridgeReady
    }

    /// Post a message to the page.
    ///
    /// Returns the message back if it can be delivered now, or `None` if it
    /// was queued until the page acknowledges.
    pub fn post(&mut self, message: OutboundMessage) -> Option<OutboundMessage> {
        match self.state {
            ChannelState::Open => Some(message),
            ChannelState::Idle | ChannelState::AwaitingAck => {
                self.pending.push_back(message);
                None
            }
        }
    }

    /// Decode a raw page message and advance the handshake.
    ///
    /// An acknowledgement while `Idle` answers no announcement and is
    /// rejected with `BridgeError::UnexpectedAck`; the channel stays closed.
    pub fn receive(&mut self, raw: &str) -> Result<BridgeEvent, BridgeError> {
        Ok(match InboundMessage::parse(raw)? {
            InboundMessage::BridgeAck => {
                if self.state == ChannelState::Idle {
                    return Err(BridgeError::UnexpectedAck);
                }
                self.state = ChannelState::Open;
                BridgeEvent::Acknowledged(self.pending.drain(..).collect())
            }
            InboundMessage::OpenCamera => BridgeEvent::Command(PageCommand::OpenCamera),
            InboundMessage::DownloadPdf { payload } => {
                BridgeEvent::Command(PageCommand::DownloadPdf(payload))
            }
        })
    }
}
