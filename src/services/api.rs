use std::sync::Arc;

use tracing::{debug, error};

use crate::clients::SoapTransport;
use crate::error::{Error, Result};
use crate::models::{
    FinanceDoc, GoodsReceipt, LoginResult, MemoDoc, PurchaseOrder, Rfq, VendorId, VendorProfile,
};
use crate::soap::decode::{
    decode_finance_docs, decode_goods_receipts, decode_login, decode_memos, decode_profile,
    decode_purchase_orders, decode_rfqs,
};
use crate::soap::{extract_pdf_base64, PdfPayload, SoapRequest};

/// One method per SOAP operation: send, then decode. No retries; every call
/// either yields fully decoded records or an error.
#[derive(Clone)]
pub struct ApiService {
    transport: Arc<dyn SoapTransport>,
}

impl ApiService {
    pub fn new(transport: Arc<dyn SoapTransport>) -> Self {
        Self { transport }
    }

    async fn call<T>(
        &self,
        request: SoapRequest,
        decode: impl FnOnce(&str) -> std::result::Result<T, crate::error::DecodeError>,
    ) -> Result<T> {
        let operation = request.operation();
        let body = self.transport.call(&request).await?;

        debug!(
            operation = %operation,
            vendor_id = %request.vendor_id(),
            body_len = body.len(),
            "Decoding SOAP response"
        );

        decode(&body).map_err(|e| {
            error!(operation = %operation, error = %e, "Failed to decode SOAP response");
            Error::from(e)
        })
    }

    pub async fn login(&self, vendor_id: &VendorId, password: &str) -> Result<LoginResult> {
        let request = SoapRequest::Login {
            vendor_id: vendor_id.clone(),
            password: password.to_string(),
        };
        self.call(request, decode_login).await
    }

    pub async fn fetch_purchase_orders(&self, vendor_id: &VendorId) -> Result<Vec<PurchaseOrder>> {
        let request = SoapRequest::PurchaseOrders {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_purchase_orders).await
    }

    pub async fn fetch_rfqs(&self, vendor_id: &VendorId) -> Result<Vec<Rfq>> {
        let request = SoapRequest::Rfqs {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_rfqs).await
    }

    pub async fn fetch_goods_receipts(&self, vendor_id: &VendorId) -> Result<Vec<GoodsReceipt>> {
        let request = SoapRequest::GoodsReceipts {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_goods_receipts).await
    }

    pub async fn fetch_finance_docs(&self, vendor_id: &VendorId) -> Result<Vec<FinanceDoc>> {
        let request = SoapRequest::Finance {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_finance_docs).await
    }

    pub async fn fetch_memos(&self, vendor_id: &VendorId) -> Result<Vec<MemoDoc>> {
        let request = SoapRequest::Memos {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_memos).await
    }

    pub async fn fetch_profile(&self, vendor_id: &VendorId) -> Result<VendorProfile> {
        let request = SoapRequest::Profile {
            vendor_id: vendor_id.clone(),
        };
        self.call(request, decode_profile).await
    }

    /// The base64 text of the invoice PDF, or why there is none.
    pub async fn fetch_invoice_pdf(
        &self,
        vendor_id: &VendorId,
        invoice_no: &str,
    ) -> Result<PdfPayload> {
        let request = SoapRequest::InvoicePdf {
            invoice_no: invoice_no.to_string(),
            vendor_id: vendor_id.clone(),
        };
        self.call(request, |body| Ok(extract_pdf_base64(body))).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::DecodeError;
    use crate::soap::Operation;

    /// Replays a fixed body per operation and records what was asked for.
    #[derive(Default)]
    struct CannedTransport {
        bodies: HashMap<Operation, String>,
        seen: Mutex<Vec<SoapRequest>>,
    }

    impl CannedTransport {
        fn with(mut self, operation: Operation, body: &str) -> Self {
            self.bodies.insert(operation, body.to_string());
            self
        }
    }

    #[async_trait]
    impl SoapTransport for CannedTransport {
        async fn call(&self, request: &SoapRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self
                .bodies
                .get(&request.operation())
                .cloned()
                .unwrap_or_default())
        }
    }

    fn vendor() -> VendorId {
        VendorId::parse("100863").unwrap()
    }

    #[tokio::test]
    async fn finance_docs_decode_from_transport_body() {
        let transport = CannedTransport::default().with(
            Operation::FetchFinance,
            "<r><item><INVOICE_NUM>5100000001</INVOICE_NUM><AGING_DAYS>4</AGING_DAYS></item></r>",
        );
        let api = ApiService::new(Arc::new(transport));

        let docs = api.fetch_finance_docs(&vendor()).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].aging_days, 4);
    }

    #[tokio::test]
    async fn decode_failures_surface_as_errors() {
        let transport = CannedTransport::default().with(Operation::FetchMemos, "<r><item>");
        let api = ApiService::new(Arc::new(transport));

        let err = api.fetch_memos(&vendor()).await.unwrap_err();

        assert!(matches!(err, Error::Decode(DecodeError::Malformed(_))));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn invoice_pdf_request_carries_invoice_and_vendor() {
        let transport = Arc::new(
            CannedTransport::default().with(Operation::FetchInvoicePdf, "<r><EV_BASE64/></r>"),
        );
        let api = ApiService::new(transport.clone());

        let payload = api.fetch_invoice_pdf(&vendor(), "4711").await.unwrap();

        assert_eq!(payload, PdfPayload::Unavailable { reason: None });
        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            seen[0].params(),
            vec![
                ("IV_INVOICE_NO", "0000004711".to_string()),
                ("IV_VENDOR_ID", "100863".to_string()),
            ]
        );
    }
}
