//! Wallet pass issuance
//!
//! Builds the event-ticket pass for a redeemable ticket. Ownership and
//! status preconditions are enforced by the API handler; this service only
//! checks its own configuration and produces the artifact. Pass signing
//! internals are the platform's concern; the signing material is loaded
//! and validated here, the pass content is what matters to the core.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::core::WalletConfig;
use crate::core::event::EventConfig;
use crate::utils::AppError;
use shared::models::Ticket;

#[derive(Clone)]
pub struct WalletService {
    config: WalletConfig,
}

impl WalletService {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Build the pass artifact for a ticket.
    ///
    /// Missing or undecodable signing material is a configuration error,
    /// not a caller mistake.
    pub fn build_pass(&self, ticket: &Ticket, event: &EventConfig) -> Result<Vec<u8>, AppError> {
        if !self.config.is_configured() {
            return Err(AppError::upstream(
                "Wallet passes are not configured on this server",
            ));
        }

        // Validate the signing material decodes before building anything
        for (name, value) in [
            ("WALLET_SIGNER_CERT", &self.config.signer_cert),
            ("WALLET_SIGNER_KEY", &self.config.signer_key),
            ("WALLET_WWDR", &self.config.wwdr),
        ] {
            let blob = value.as_deref().unwrap_or_default();
            BASE64
                .decode(blob)
                .map_err(|_| AppError::upstream(format!("{name} is not valid base64")))?;
        }

        let org_name = self
            .config
            .org_name
            .as_deref()
            .unwrap_or(event.brand)
            .to_string();
        let table = ticket
            .table_id
            .as_deref()
            .map(shared::util::table_map_key)
            .unwrap_or("sin-mesa");

        let pass = json!({
            "formatVersion": 1,
            "passTypeIdentifier": self.config.pass_type_id,
            "teamIdentifier": self.config.team_id,
            "organizationName": org_name,
            "description": event.event_name,
            "serialNumber": ticket.id.to_string(),
            "barcodes": [{
                "format": "PKBarcodeFormatQR",
                "message": ticket.qr_code,
                "messageEncoding": "iso-8859-1",
            }],
            "eventTicket": {
                "primaryFields": [
                    { "key": "event", "label": "Evento", "value": event.event_name },
                    { "key": "name", "label": "Titular", "value": ticket.cover_name },
                ],
                "secondaryFields": [
                    { "key": "table", "label": "Mesa", "value": table },
                ],
            },
        });

        serde_json::to_vec(&pass)
            .map_err(|e| AppError::internal(format!("Failed to serialize pass: {e}")))
    }
}
