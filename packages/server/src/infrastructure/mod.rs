//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod dto;
pub mod fanout;
pub mod fixtures;
pub mod identity;
pub mod message_pusher;
pub mod repository;
