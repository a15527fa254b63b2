//! Inbound adapters translating HTTP and WebSocket traffic into calls on the
//! domain ports.

pub mod http;
pub mod ws;
