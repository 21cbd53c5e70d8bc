//! Remote bridge for the LED indicator.
//!
//! This crate connects an [`Indicator`](ledlight_core::Indicator) to an
//! external messaging client:
//! - [`MessagingClient`]: the contract the transport implements
//! - [`RemoteBridge`]: session lifecycle (`Idle → Connecting → Connected`)
//! - [`CommandHandler`]: feeds inbound messages to the command interpreter
//! - [`LedLightElement`]: ties the bridge to host activation/removal
//! - [`LoopbackClient`]: in-memory client for tests and local use

mod client;
mod element;
mod error;
mod handler;
mod loopback;
mod remote;

pub use client::{
    BoxFuture, COMMAND_CHANNEL, ClientFactory, InboundMessage, MessageHandler, MessagingClient,
};
pub use element::LedLightElement;
pub use error::{BridgeError, BridgeResult};
pub use handler::{CommandHandler, SharedIndicator, new_shared_indicator};
pub use loopback::{ConnectBehavior, LoopbackClient};
pub use remote::{
    BridgeConfig, BridgeState, DEFAULT_CONNECT_TIMEOUT, RemoteBridge, command_channel,
};
