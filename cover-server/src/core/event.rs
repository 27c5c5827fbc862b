//! Event configuration
//!
//! Static description of the current event: pricing, bank transfer data,
//! the table map, and the occupancy threshold. Easy to swap out for future
//! events; none of this is core logic, but the occupancy comparison
//! (`count >= threshold`) against it is.

/// One table on the event map
#[derive(Debug, Clone)]
pub struct EventTable {
    /// Bare map key; tickets store `"mesa-<id>"`
    pub id: i64,
    pub zone: &'static str,
    /// Display minimum shown on the purchase map
    pub min_covers: i64,
}

/// Bank transfer details shown during checkout
#[derive(Debug, Clone)]
pub struct TransferDetails {
    pub bank: &'static str,
    pub clabe: &'static str,
    pub holder: &'static str,
}

/// Full event configuration
#[derive(Debug, Clone)]
pub struct EventConfig {
    pub brand: &'static str,
    pub event_name: &'static str,
    /// Online price per cover (MXN)
    pub cover_price: f64,
    /// Per-operation commission, displayed during checkout
    pub commission: f64,
    /// A table is occupied once it holds this many active covers
    pub occupied_threshold: i64,
    pub payment: TransferDetails,
    pub tables: Vec<EventTable>,
}

impl EventConfig {
    /// Current event
    pub fn current() -> Self {
        Self {
            brand: "aftr.",
            event_name: "A NORMAL HALLOWEEN BRUNCH PT.2",
            cover_price: 500.0,
            commission: 30.0,
            occupied_threshold: 5,
            payment: TransferDetails {
                bank: "STP (Sistema de Transferencias y Pagos)",
                clabe: "646021111865217072",
                holder: "Christian Ariel Rosales Rodríguez",
            },
            tables: Self::table_map(),
        }
    }

    /// The venue's table map: two rings around the dance floor
    fn table_map() -> Vec<EventTable> {
        let mut tables = Vec::new();
        let mut ring = |ids: std::ops::RangeInclusive<i64>, zone: &'static str, min: i64| {
            for id in ids {
                tables.push(EventTable {
                    id,
                    zone,
                    min_covers: min,
                });
            }
        };
        ring(10..=16, "Segundo Anillo", 10);
        ring(60..=65, "Segundo Anillo", 10);
        ring(20..=25, "Primer Anillo", 10);
        ring(50..=55, "Primer Anillo", 10);
        ring(31..=36, "Mesas en Pista", 12);
        ring(41..=46, "Mesas en Pista", 12);
        tables
    }

    /// Server-side total for a purchase: unit price times quantity
    pub fn total_price(&self, quantity: i64) -> f64 {
        self.cover_price * quantity as f64
    }

    /// Whether a storage-form table id refers to a table on the map or the
    /// explicit no-table marker
    pub fn is_valid_table_id(&self, table_id: &str) -> bool {
        if table_id == "sin-mesa" {
            return true;
        }
        let key = shared::util::table_map_key(table_id);
        key.parse::<i64>()
            .map(|id| self.tables.iter().any(|t| t.id == id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_price() {
        let event = EventConfig::current();
        assert_eq!(event.total_price(3), 1500.0);
        assert_eq!(event.total_price(1), 500.0);
    }

    #[test]
    fn test_table_id_validation() {
        let event = EventConfig::current();
        assert!(event.is_valid_table_id("mesa-32"));
        assert!(event.is_valid_table_id("10"));
        assert!(event.is_valid_table_id("sin-mesa"));
        assert!(!event.is_valid_table_id("mesa-99"));
        assert!(!event.is_valid_table_id("palco-1"));
    }
}
