//! Request handlers.

mod http;
mod websocket;

pub use http::{get_room_messages, get_user_presence, health_check};
pub use websocket::websocket_handler;
