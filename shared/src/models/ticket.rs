//! Ticket Model
//!
//! An issued, individually redeemable cover. The QR code is a capability
//! token: globally unique and unguessable.

use serde::{Deserialize, Serialize};

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Approved,
    /// Redeemed at the door; terminal
    Used,
    /// Terminal
    Cancelled,
}

/// Ticket record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    /// Originating purchase request; None for legacy/manually issued tickets
    pub purchase_request_id: Option<i64>,
    /// Owning user id
    pub user_id: String,
    /// Unique QR capability token
    pub qr_code: String,
    /// Attendee display name
    pub cover_name: String,
    /// `"mesa-<n>"`, or None for a cover without a table
    pub table_id: Option<String>,
    pub status: TicketStatus,
    /// Set exactly once, on redemption
    pub scanned_at: Option<i64>,
    /// Identity of the admin who scanned the ticket
    pub scanned_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create ticket payload (issuance engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreate {
    pub purchase_request_id: Option<i64>,
    pub user_id: String,
    pub qr_code: String,
    pub cover_name: String,
    pub table_id: Option<String>,
}
