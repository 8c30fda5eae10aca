use serde::{Deserialize, Serialize};

use super::{contains_ci, Searchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfq {
    pub vendor_id: String,
    pub rfq_number: String,
    pub rfq_date: String,
    pub material_text: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRfq {
    #[serde(flatten)]
    pub rfq: Rfq,
    /// Whole days since `rfq_date`, rounded up. `0` when the date is unreadable.
    pub days_open: i64,
}

impl Searchable for Rfq {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.rfq_number, term) || contains_ci(&self.material_text, term)
    }
}

impl Searchable for OpenRfq {
    fn matches(&self, term: &str) -> bool {
        self.rfq.matches(term)
    }
}
