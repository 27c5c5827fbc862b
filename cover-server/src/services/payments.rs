//! Payment provider client (card flow)
//!
//! Talks to a Stripe-style checkout sessions API. Every call carries a
//! request timeout; a timeout surfaces as [`AppError::UpstreamTimeout`],
//! which is retryable, instead of hanging the purchase flow.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::core::Config;
use crate::utils::AppError;

/// Checkout session as returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub id: String,
    /// Hosted checkout URL (present right after creation)
    pub url: Option<String>,
    /// `"paid"` once the payment completed
    pub payment_status: Option<String>,
    /// Total in minor units (centavos)
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Parameters for a new checkout session
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub user_id: String,
    pub table_id: Option<String>,
    pub quantity: i64,
    pub names: Vec<String>,
    /// Total in pesos; sent to the provider in centavos
    pub total_price: f64,
}

#[derive(Clone)]
pub struct PaymentsService {
    client: reqwest::Client,
    api_url: String,
    secret_key: Option<String>,
}

impl PaymentsService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.payment_api_url.clone(),
            secret_key: config.payment_secret_key.clone(),
        }
    }

    /// Whether the card flow is available at all
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn secret(&self) -> Result<&str, AppError> {
        self.secret_key
            .as_deref()
            .ok_or_else(|| AppError::upstream("Card payments are not configured"))
    }

    /// Create a hosted checkout session carrying the purchase metadata.
    ///
    /// The metadata is what the verification step trusts later; the
    /// client never supplies purchase data at verification time.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<ProviderSession, AppError> {
        let secret = self.secret()?;
        let names_json = serde_json::to_string(&params.names)
            .map_err(|e| AppError::internal(format!("Failed to encode names: {e}")))?;
        let unit_amount = (params.total_price * 100.0).round() as i64;
        let product_name = format!(
            "Covers - {} {}",
            params.quantity,
            if params.quantity == 1 { "cover" } else { "covers" }
        );
        let table_label = params.table_id.as_deref().unwrap_or("sin-mesa").to_string();

        let form: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][price_data][currency]", "mxn".to_string()),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            ("line_items[0][price_data][product_data][name]", product_name),
            (
                "line_items[0][price_data][product_data][description]",
                format!("Mesa/área: {table_label}"),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            ("metadata[user_id]", params.user_id.clone()),
            ("metadata[table_id]", table_label),
            ("metadata[quantity]", params.quantity.to_string()),
            ("metadata[names_json]", names_json),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_url))
            .bearer_auth(secret)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        parse_session_response(response).await
    }

    /// Re-fetch a session server-side to verify the payment actually
    /// completed; the client's return to the success page proves nothing.
    pub async fn fetch_checkout_session(&self, session_id: &str) -> Result<ProviderSession, AppError> {
        let secret = self.secret()?;
        let response = self
            .client
            .get(format!("{}/v1/checkout/sessions/{session_id}", self.api_url))
            .bearer_auth(secret)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        parse_session_response(response).await
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::UpstreamTimeout(format!("Payment provider timed out: {e}"))
    } else {
        AppError::Upstream(format!("Payment provider request failed: {e}"))
    }
}

async fn parse_session_response(response: reqwest::Response) -> Result<ProviderSession, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "Payment provider returned {status}: {body}"
        )));
    }
    response
        .json::<ProviderSession>()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid payment provider response: {e}")))
}

impl ProviderSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    /// Derive the human-facing transfer reference from the session id's
    /// trailing digits, falling back to a random code when it has none
    pub fn derived_reference(&self) -> String {
        let digits: String = self
            .id
            .chars()
            .rev()
            .take(9)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            crate::db::repository::purchase_request::generate_reference()
        } else {
            digits
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> ProviderSession {
        ProviderSession {
            id: id.to_string(),
            url: None,
            payment_status: Some("paid".to_string()),
            amount_total: Some(150000),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_derived_reference_uses_trailing_digits() {
        assert_eq!(session("cs_test_a1b2c3d4e5").derived_reference(), "12345");
    }

    #[test]
    fn test_derived_reference_falls_back_to_random() {
        let reference = session("cs_test_abcdef").derived_reference();
        assert_eq!(reference.len(), 5);
        assert!(reference.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_is_paid() {
        assert!(session("cs_1").is_paid());
        let mut unpaid = session("cs_1");
        unpaid.payment_status = Some("unpaid".to_string());
        assert!(!unpaid.is_paid());
    }
}
