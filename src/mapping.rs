//! Derived fields applied to decoded records before they reach the caller.
//!
//! Everything here is pure: "now" is always passed in.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::models::{
    AgedInvoice, FinanceDoc, GoodsReceipt, InvoiceStatus, MemoDoc, OpenRfq, PoStatus,
    PurchaseOrder, Rfq, TrackedPurchaseOrder,
};
use crate::utils::{days_between_ceil, parse_sap_date};

/// Drops every leading `0`. An all-zero number becomes empty.
pub fn strip_leading_zeros(material_no: &str) -> String {
    material_no.trim_start_matches('0').to_string()
}

/// `Urgent` once the delivery date has passed, `Open` otherwise (including
/// when the date cannot be read).
pub fn po_status(delivery_date: &str, now: NaiveDateTime) -> PoStatus {
    match parse_sap_date(delivery_date) {
        Some(delivery) if delivery < now => PoStatus::Urgent,
        _ => PoStatus::Open,
    }
}

pub fn invoice_status(aging_days: i64) -> InvoiceStatus {
    if aging_days > 0 {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::Current
    }
}

pub fn days_open(rfq_date: &str, now: NaiveDateTime) -> i64 {
    parse_sap_date(rfq_date)
        .map(|created| days_between_ceil(now, created))
        .unwrap_or(0)
}

pub fn track_purchase_orders(
    orders: Vec<PurchaseOrder>,
    now: NaiveDateTime,
) -> Vec<TrackedPurchaseOrder> {
    orders
        .into_iter()
        .map(|order| {
            let status = po_status(&order.delivery_date, now);
            TrackedPurchaseOrder { order, status }
        })
        .collect()
}

pub fn open_rfqs(rfqs: Vec<Rfq>, now: NaiveDateTime) -> Vec<OpenRfq> {
    rfqs.into_iter()
        .map(|rfq| {
            let days_open = days_open(&rfq.rfq_date, now);
            OpenRfq { rfq, days_open }
        })
        .collect()
}

/// Attaches invoice status and orders by aging, most overdue first.
pub fn age_invoices(invoices: Vec<FinanceDoc>) -> Vec<AgedInvoice> {
    let mut aged: Vec<AgedInvoice> = invoices
        .into_iter()
        .map(|invoice| {
            let status = invoice_status(invoice.aging_days);
            AgedInvoice { invoice, status }
        })
        .collect();
    aged.sort_by(|a, b| b.invoice.aging_days.cmp(&a.invoice.aging_days));
    aged
}

/// Newest posting first; rows with unreadable dates go last.
pub fn sort_memos(memos: &mut [MemoDoc]) {
    memos.sort_by(|a, b| newest_first(&a.posting_date, &b.posting_date));
}

/// Newest posting first; rows with unreadable dates go last.
pub fn sort_goods_receipts(receipts: &mut [GoodsReceipt]) {
    receipts.sort_by(|a, b| newest_first(&a.posting_date, &b.posting_date));
}

fn newest_first(a: &str, b: &str) -> Ordering {
    match (parse_sap_date(a), parse_sap_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
