use std::fmt;

use quick_xml::escape::escape;

use crate::models::VendorId;

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const RFC_FUNCTIONS_NS: &str = "urn:sap-com:document:sap:rfc:functions";

const LOGIN_SOAP_ACTION: &str =
    "urn:sap-com:document:sap:rfc:functions:ZRFC_LOGIN_VALIDATE_863:ZFM_LOGIN_VALIDATE_RP_863Request";

/// SAP stores invoice numbers as zero-padded CHAR10.
pub const INVOICE_NUMBER_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    FetchPurchaseOrders,
    FetchRfqs,
    FetchGoodsReceipts,
    FetchFinance,
    FetchMemos,
    FetchProfile,
    FetchInvoicePdf,
}

impl Operation {
    /// Name of the RFC-enabled function module wrapped by the body element.
    pub fn rfc_function(self) -> &'static str {
        match self {
            Operation::Login => "ZFM_LOGIN_863",
            Operation::FetchPurchaseOrders => "ZFM_PO_863",
            Operation::FetchRfqs => "ZFM_RFQ_863",
            Operation::FetchGoodsReceipts => "ZFM_GR_863",
            Operation::FetchFinance => "ZFM_INVOICE_863",
            Operation::FetchMemos => "ZFM_MEMO_863",
            Operation::FetchProfile => "ZFM_PROFILE_863",
            Operation::FetchInvoicePdf => "ZFM_INVOICE_PDF_863",
        }
    }

    pub fn soap_action(self) -> Option<&'static str> {
        match self {
            Operation::Login => Some(LOGIN_SOAP_ACTION),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Login => "login",
            Operation::FetchPurchaseOrders => "purchase_orders",
            Operation::FetchRfqs => "rfqs",
            Operation::FetchGoodsReceipts => "goods_receipts",
            Operation::FetchFinance => "finance",
            Operation::FetchMemos => "memos",
            Operation::FetchProfile => "profile",
            Operation::FetchInvoicePdf => "invoice_pdf",
        };
        f.write_str(name)
    }
}

/// A single SOAP call with its typed parameters.
#[derive(Debug, Clone)]
pub enum SoapRequest {
    Login { vendor_id: VendorId, password: String },
    PurchaseOrders { vendor_id: VendorId },
    Rfqs { vendor_id: VendorId },
    GoodsReceipts { vendor_id: VendorId },
    Finance { vendor_id: VendorId },
    Memos { vendor_id: VendorId },
    Profile { vendor_id: VendorId },
    InvoicePdf { invoice_no: String, vendor_id: VendorId },
}

impl SoapRequest {
    pub fn operation(&self) -> Operation {
        match self {
            SoapRequest::Login { .. } => Operation::Login,
            SoapRequest::PurchaseOrders { .. } => Operation::FetchPurchaseOrders,
            SoapRequest::Rfqs { .. } => Operation::FetchRfqs,
            SoapRequest::GoodsReceipts { .. } => Operation::FetchGoodsReceipts,
            SoapRequest::Finance { .. } => Operation::FetchFinance,
            SoapRequest::Memos { .. } => Operation::FetchMemos,
            SoapRequest::Profile { .. } => Operation::FetchProfile,
            SoapRequest::InvoicePdf { .. } => Operation::FetchInvoicePdf,
        }
    }

    /// Parameter elements in the order the function module signature expects.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            SoapRequest::Login { vendor_id, password } => vec![
                ("IV_PASSWORD", password.clone()),
                ("IV_VENDOR_ID", vendor_id.to_string()),
            ],
            SoapRequest::PurchaseOrders { vendor_id }
            | SoapRequest::Rfqs { vendor_id }
            | SoapRequest::GoodsReceipts { vendor_id }
            | SoapRequest::Finance { vendor_id }
            | SoapRequest::Memos { vendor_id }
            | SoapRequest::Profile { vendor_id } => {
                vec![("IV_VENDOR_ID", vendor_id.to_string())]
            }
            SoapRequest::InvoicePdf { invoice_no, vendor_id } => vec![
                ("IV_INVOICE_NO", pad_invoice_number(invoice_no)),
                ("IV_VENDOR_ID", vendor_id.to_string()),
            ],
        }
    }

    pub fn vendor_id(&self) -> &VendorId {
        match self {
            SoapRequest::Login { vendor_id, .. }
            | SoapRequest::PurchaseOrders { vendor_id }
            | SoapRequest::Rfqs { vendor_id }
            | SoapRequest::GoodsReceipts { vendor_id }
            | SoapRequest::Finance { vendor_id }
            | SoapRequest::Memos { vendor_id }
            | SoapRequest::Profile { vendor_id }
            | SoapRequest::InvoicePdf { vendor_id, .. } => vendor_id,
        }
    }
}

/// Left-pads with `0` to ten characters. Longer input is passed through untouched.
pub fn pad_invoice_number(invoice_no: &str) -> String {
    format!("{:0>width$}", invoice_no.trim(), width = INVOICE_NUMBER_WIDTH)
}

pub fn build_envelope(request: &SoapRequest) -> String {
    let function = request.operation().rfc_function();
    let params: String = request
        .params()
        .into_iter()
        .map(|(name, value)| format!("            <{name}>{}</{name}>\n", escape(value.as_str())))
        .collect();

    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:urn="{RFC_FUNCTIONS_NS}">
    <soapenv:Header/>
    <soapenv:Body>
        <urn:{function}>
{params}        </urn:{function}>
    </soapenv:Body>
</soapenv:Envelope>
"#
    )
}
