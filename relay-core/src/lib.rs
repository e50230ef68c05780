//! # relay-core
//!
//! Core types and traits for the manager relay: identifiers, [`InboundEvent`], [`Transport`],
//! the [`RelayError`] taxonomy, and tracing initialization. Transport-agnostic; used by
//! relay-engine and relay-telegram.

pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use error::{RelayError, Result};
pub use logger::init_tracing;
pub use transport::{Transport, TransportError, TransportResult};
pub use types::{
    ChatId, ClientDisplay, ClientId, ClientMessage, Content, Endpoint, InboundEvent, Keyboard,
    ManagerMessage, MediaKind, MessageRef, SendOptions, ThreadId,
};
