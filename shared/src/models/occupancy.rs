//! Table Occupancy View
//!
//! Derived from ticket rows on every read and never persisted, so it cannot
//! drift from the tickets it summarizes.

use serde::{Deserialize, Serialize};

/// Occupancy of a single table on the event map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOccupancy {
    /// Bare map key (`"32"`, without the `mesa-` prefix)
    pub id: String,
    pub zone: String,
    /// Display minimum shown on the purchase map
    pub min_covers: i64,
    /// Tickets in `{approved, used}` assigned to this table
    pub count: i64,
    /// `count >= occupancy threshold`
    pub occupied: bool,
}
