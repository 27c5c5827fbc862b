//! Email delivery (approval notifications)
//!
//! Resend-style JSON API. Delivery is strictly fire-and-forget: if the key
//! is unset this is a silent no-op, and a failed send is logged by the
//! caller. It must never affect the approval it announces.

use std::time::Duration;

use serde_json::json;

use crate::core::Config;
use crate::utils::AppError;

#[derive(Clone)]
pub struct EmailService {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl EmailService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Tell the purchaser their tickets were approved
    pub async fn send_ticket_approved(
        &self,
        to: &str,
        brand: &str,
        event_name: &str,
    ) -> Result<(), AppError> {
        let Some(key) = self.api_key.as_deref() else {
            tracing::debug!("Email not configured, skipping approval notification");
            return Ok(());
        };

        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": format!("Tu ticket está aprobado – {brand}"),
            "html": format!(
                "<p>Hola,</p>\
                 <p>Tu solicitud de tickets para <strong>{event_name}</strong> ha sido aprobada.</p>\
                 <p>Ya puedes ver y usar tus tickets en la sección <strong>Mis Tickets</strong> de la página.</p>\
                 <p>Gracias,<br/><strong>{brand}</strong></p>"
            ),
        });

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Email request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Email delivery returned {status}: {text}"
            )));
        }
        Ok(())
    }
}
