//! Core module - configuration, event data, state, server

pub mod config;
pub mod event;
pub mod server;
pub mod state;

pub use config::{Config, WalletConfig};
pub use event::{EventConfig, EventTable};
pub use server::Server;
pub use state::ServerState;
