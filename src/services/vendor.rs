use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::mapping;
use crate::models::{
    AgedInvoice, FinanceSummary, GoodsReceipt, InvoicePdf, LoginResult, MemoDoc, OpenRfq,
    TrackedPurchaseOrder, VendorId, VendorProfile,
};
use crate::services::api::ApiService;
use crate::soap::PdfPayload;

/// Portal-level views over [`ApiService`]: decoded records with their
/// derived fields, sorted the way the portal lists them.
#[derive(Clone)]
pub struct VendorService {
    api_service: ApiService,
    clock: fn() -> NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub purchase_orders: usize,
    pub open_rfqs: usize,
    pub goods_receipts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceOverview {
    pub invoices: Vec<AgedInvoice>,
    pub memos: Vec<MemoDoc>,
    pub summary: FinanceSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfDownload {
    Ready(InvoicePdf),
    /// SAP has no PDF for this invoice, or refused with `reason`.
    Unavailable { reason: Option<String> },
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl VendorService {
    pub fn new(api_service: ApiService) -> Self {
        Self {
            api_service,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used for aging and status derivations.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the vendor id format before asking SAP.
    pub async fn login(&self, vendor_id: &str, password: &str) -> Result<LoginResult> {
        let vendor_id = VendorId::parse(vendor_id)?;
        let result = self.api_service.login(&vendor_id, password).await?;

        info!(vendor_id = %vendor_id, success = result.success, "Login attempt");
        Ok(result)
    }

    pub async fn purchase_orders(&self, vendor_id: &VendorId) -> Result<Vec<TrackedPurchaseOrder>> {
        let orders = self.api_service.fetch_purchase_orders(vendor_id).await?;
        Ok(mapping::track_purchase_orders(orders, (self.clock)()))
    }

    pub async fn rfqs(&self, vendor_id: &VendorId) -> Result<Vec<OpenRfq>> {
        let rfqs = self.api_service.fetch_rfqs(vendor_id).await?;
        Ok(mapping::open_rfqs(rfqs, (self.clock)()))
    }

    /// Newest posting first.
    pub async fn goods_receipts(&self, vendor_id: &VendorId) -> Result<Vec<GoodsReceipt>> {
        let mut receipts = self.api_service.fetch_goods_receipts(vendor_id).await?;
        mapping::sort_goods_receipts(&mut receipts);
        Ok(receipts)
    }

    /// Most overdue first.
    pub async fn invoices(&self, vendor_id: &VendorId) -> Result<Vec<AgedInvoice>> {
        let docs = self.api_service.fetch_finance_docs(vendor_id).await?;
        Ok(mapping::age_invoices(docs))
    }

    /// Newest posting first.
    pub async fn memos(&self, vendor_id: &VendorId) -> Result<Vec<MemoDoc>> {
        let mut memos = self.api_service.fetch_memos(vendor_id).await?;
        mapping::sort_memos(&mut memos);
        Ok(memos)
    }

    /// Invoices and memos fetched concurrently. A memo failure only empties
    /// the memo list; an invoice failure fails the whole overview.
    pub async fn finance_overview(&self, vendor_id: &VendorId) -> Result<FinanceOverview> {
        let (invoices, memos) = tokio::join!(self.invoices(vendor_id), self.memos(vendor_id));

        let invoices = invoices?;
        let memos = memos.unwrap_or_else(|e| {
            warn!(vendor_id = %vendor_id, error = %e, "Memo fetch failed, showing invoices only");
            Vec::new()
        });
        let summary = FinanceSummary::from_invoices(&invoices);

        Ok(FinanceOverview {
            invoices,
            memos,
            summary,
        })
    }

    pub async fn profile(&self, vendor_id: &VendorId) -> Result<VendorProfile> {
        self.api_service.fetch_profile(vendor_id).await
    }

    /// Record counts for the landing page. Each section is fetched
    /// concurrently and a failing section counts as zero.
    pub async fn dashboard(&self, vendor_id: &VendorId) -> DashboardSummary {
        let (orders, rfqs, receipts) = tokio::join!(
            self.api_service.fetch_purchase_orders(vendor_id),
            self.api_service.fetch_rfqs(vendor_id),
            self.api_service.fetch_goods_receipts(vendor_id),
        );

        let count = |section: &str, result: Result<usize>| {
            result.unwrap_or_else(|e| {
                warn!(vendor_id = %vendor_id, section, error = %e, "Dashboard section failed");
                0
            })
        };

        DashboardSummary {
            purchase_orders: count("purchase_orders", orders.map(|v| v.len())),
            open_rfqs: count("rfqs", rfqs.map(|v| v.len())),
            goods_receipts: count("goods_receipts", receipts.map(|v| v.len())),
        }
    }

    /// Fetches, decodes and validates an invoice PDF. A payload that is not
    /// a usable PDF is an [`Error::Validation`](crate::error::Error::Validation).
    pub async fn download_invoice_pdf(
        &self,
        vendor_id: &VendorId,
        invoice_no: &str,
    ) -> Result<PdfDownload> {
        info!(vendor_id = %vendor_id, invoice_no, "Fetching invoice PDF from SAP");

        match self.api_service.fetch_invoice_pdf(vendor_id, invoice_no).await? {
            PdfPayload::Encoded(encoded) => {
                let pdf = InvoicePdf::from_base64(invoice_no, &encoded)?;
                info!(invoice_no, size_kb = pdf.size_kb(), "Invoice PDF ready");
                Ok(PdfDownload::Ready(pdf))
            }
            PdfPayload::Unavailable { reason } => {
                info!(invoice_no, reason = ?reason, "Invoice PDF not available");
                Ok(PdfDownload::Unavailable { reason })
            }
        }
    }
}
