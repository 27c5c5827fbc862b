//! External collaborators
//!
//! Thin clients for the systems this server talks to. Each is injected
//! through [`crate::core::ServerState`]; nothing holds a global client.

pub mod email;
pub mod payments;
pub mod storage;
pub mod wallet;

pub use email::EmailService;
pub use payments::{CheckoutParams, PaymentsService, ProviderSession};
pub use storage::StorageService;
pub use wallet::WalletService;
