//! Purchase Request Model
//!
//! A customer's request to buy N covers, awaiting payment verification.
//! Mutated only by the approval workflow; never deleted.

use serde::{Deserialize, Serialize};

/// Purchase request status
///
/// `pending → approved` and `pending → rejected` are the only transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for PurchaseStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// How the customer paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Bank transfer with an uploaded proof of payment
    Transfer,
    /// Card checkout through the payment provider
    Card,
}

/// Purchase request record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseRequest {
    pub id: i64,
    /// Provider checkout session id, set for card payments (UNIQUE)
    pub checkout_session_id: Option<String>,
    /// Owning user id
    pub user_id: String,
    /// `"mesa-<n>"`, or None for a cover without a table
    pub table_id: Option<String>,
    pub quantity: i64,
    /// Attendee names, one per cover (`names.len() == quantity`)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub names: Vec<String>,
    pub total_price: f64,
    /// Public URL of the uploaded transfer receipt
    pub proof_of_payment_url: Option<String>,
    /// Human-facing 5-digit code for bank reconciliation (UNIQUE)
    pub reference: String,
    pub payment_method: PaymentMethod,
    pub status: PurchaseStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create purchase request payload (repository-level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequestCreate {
    pub user_id: String,
    pub table_id: Option<String>,
    pub quantity: i64,
    pub names: Vec<String>,
    pub total_price: f64,
    pub proof_of_payment_url: Option<String>,
    pub reference: String,
    pub payment_method: PaymentMethod,
    pub checkout_session_id: Option<String>,
}
