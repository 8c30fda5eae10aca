use serde::{Deserialize, Serialize};

use super::{contains_ci, Searchable};

/// Material document line posted against one of the vendor's orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsReceipt {
    pub mat_doc_num: String,
    pub fiscal_year: String,
    pub comp_code: String,
    pub vendor_id: String,
    /// Leading zeros stripped.
    pub material_no: String,
    pub plant: String,
    pub posting_date: String,
}

impl Searchable for GoodsReceipt {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.mat_doc_num, term) || contains_ci(&self.material_no, term)
    }
}
