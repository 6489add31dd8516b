//! FlashChat real-time chat server library.
//!
//! Connection sessions, room membership, ordered message broadcast with
//! cross-process fan-out, and per-user presence over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod bootstrap;
