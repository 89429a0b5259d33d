// src/commands/mod.rs
pub mod init;
mod api;

pub use api::Engine;

pub use init::{InitReport, ensure_initialized};
