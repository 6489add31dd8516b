//! Utilities shared by the FlashChat binaries and libraries.

pub mod logger;
pub mod time;
