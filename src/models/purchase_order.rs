use serde::{Deserialize, Serialize};

use super::{contains_ci, Searchable};

/// One `item` of the purchase order list (EKKO/EKPO join on the SAP side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub po_number: String,
    pub vendor_id: String,
    pub po_date: String,
    pub purch_org: String,
    /// Leading zeros stripped.
    pub material_no: String,
    pub unit: String,
    pub net_price: f64,
    pub delivery_date: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoStatus {
    Open,
    Urgent,
    /// Part of the portal vocabulary; no backend field maps to it yet.
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPurchaseOrder {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub status: PoStatus,
}

impl Searchable for PurchaseOrder {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.po_number, term) || contains_ci(&self.material_no, term)
    }
}

impl Searchable for TrackedPurchaseOrder {
    fn matches(&self, term: &str) -> bool {
        self.order.matches(term)
    }
}

/// Sum of net prices, as shown above the order table.
pub fn total_order_value<'a>(orders: impl IntoIterator<Item = &'a TrackedPurchaseOrder>) -> f64 {
    orders.into_iter().map(|o| o.order.net_price).sum()
}
