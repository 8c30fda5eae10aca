mod vendor;
mod purchase_order;
mod rfq;
mod goods_receipt;
mod finance;
mod login;
mod invoice_pdf;

pub use vendor::{VendorId, VendorProfile};
pub use purchase_order::{total_order_value, PoStatus, PurchaseOrder, TrackedPurchaseOrder};
pub use rfq::{OpenRfq, Rfq};
pub use goods_receipt::GoodsReceipt;
pub use finance::{AgedInvoice, DebitCredit, FinanceDoc, FinanceSummary, InvoiceStatus, MemoDoc};
pub use login::{LoginResult, NO_RESPONSE_MESSAGE};
pub use invoice_pdf::{InvoicePdf, MIN_PDF_SIZE, PDF_MAGIC, PDF_MIME_TYPE};

/// Free-text filter used by the portal's list screens.
pub trait Searchable {
    /// Case-insensitive substring match against the record's key columns.
    /// An empty term matches everything.
    fn matches(&self, term: &str) -> bool;
}

pub fn search<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.matches(term)).collect()
}

pub(crate) fn contains_ci(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.trim().to_lowercase())
}
