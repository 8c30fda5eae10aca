use serde::{Deserialize, Serialize};

use super::{contains_ci, Searchable};

/// Open vendor invoice with backend-computed aging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDoc {
    pub vendor_id: String,
    pub invoice_num: String,
    pub posting_date: String,
    pub doc_date: String,
    pub amount: f64,
    pub currency: String,
    pub due_date: String,
    /// Days past due; `0` when missing or not a number.
    pub aging_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Current,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgedInvoice {
    #[serde(flatten)]
    pub invoice: FinanceDoc,
    pub status: InvoiceStatus,
}

/// Posting key side of a memo line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitCredit {
    #[serde(rename = "S")]
    Debit,
    #[serde(rename = "H")]
    Credit,
}

impl DebitCredit {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(DebitCredit::Debit),
            "H" => Some(DebitCredit::Credit),
            _ => None,
        }
    }
}

/// Debit or credit memo. The material fields are only filled for
/// quantity-based memos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoDoc {
    pub vendor_id: String,
    pub memo_num: String,
    pub doc_type: String,
    pub posting_date: String,
    pub amount: f64,
    pub currency: String,
    /// `None` when the indicator is missing or neither `S` nor `H`.
    pub debit_cred_ind: Option<DebitCredit>,
    pub material_no: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_payable: f64,
    pub total_overdue: f64,
    pub invoice_count: usize,
    pub overdue_count: usize,
}

impl FinanceSummary {
    pub fn from_invoices<'a>(invoices: impl IntoIterator<Item = &'a AgedInvoice>) -> Self {
        invoices.into_iter().fold(Self::default(), |mut acc, inv| {
            acc.total_payable += inv.invoice.amount;
            acc.invoice_count += 1;
            if inv.status == InvoiceStatus::Overdue {
                acc.total_overdue += inv.invoice.amount;
                acc.overdue_count += 1;
            }
            acc
        })
    }
}

impl Searchable for FinanceDoc {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.invoice_num, term) || contains_ci(&self.amount.to_string(), term)
    }
}

impl Searchable for AgedInvoice {
    fn matches(&self, term: &str) -> bool {
        self.invoice.matches(term)
    }
}

impl Searchable for MemoDoc {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.memo_num, term)
            || self
                .material_no
                .as_deref()
                .is_some_and(|m| contains_ci(m, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search;

    fn invoice(num: &str, amount: f64, aging_days: i64) -> AgedInvoice {
        AgedInvoice {
            invoice: FinanceDoc {
                vendor_id: "100863".to_string(),
                invoice_num: num.to_string(),
                posting_date: String::new(),
                doc_date: String::new(),
                amount,
                currency: "EUR".to_string(),
                due_date: String::new(),
                aging_days,
            },
            status: if aging_days > 0 {
                InvoiceStatus::Overdue
            } else {
                InvoiceStatus::Current
            },
        }
    }

    #[test]
    fn summary_splits_overdue_amounts() {
        let invoices = vec![invoice("5100000001", 100.0, 0), invoice("5100000002", 250.5, 15)];
        let summary = FinanceSummary::from_invoices(&invoices);

        assert_eq!(summary.total_payable, 350.5);
        assert_eq!(summary.total_overdue, 250.5);
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.overdue_count, 1);
    }

    #[test]
    fn invoice_search_covers_number_and_amount() {
        let invoices = vec![invoice("5100000001", 100.0, 0), invoice("5100000002", 250.5, 15)];

        assert_eq!(search(&invoices, "0002").len(), 1);
        assert_eq!(search(&invoices, "250.5").len(), 1);
        assert_eq!(search(&invoices, "").len(), 2);
    }

    #[test]
    fn memo_search_tolerates_missing_material() {
        let memo = MemoDoc {
            vendor_id: "100863".to_string(),
            memo_num: "1700000042".to_string(),
            doc_type: "RE".to_string(),
            posting_date: "2024-02-01".to_string(),
            amount: 12.0,
            currency: "EUR".to_string(),
            debit_cred_ind: DebitCredit::from_code("H"),
            material_no: None,
            quantity: None,
            unit: None,
        };

        assert!(memo.matches("0042"));
        assert!(!memo.matches("steel"));
        assert_eq!(memo.debit_cred_ind, Some(DebitCredit::Credit));
    }
}
