//! Response decoders, one per operation.
//!
//! A blank response body is the backend's way of saying "nothing here" and
//! decodes to that operation's empty outcome. Anything else that is not
//! well-formed XML is [`DecodeError::Malformed`].

use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::mapping::strip_leading_zeros;
use crate::models::{
    DebitCredit, FinanceDoc, GoodsReceipt, LoginResult, MemoDoc, PurchaseOrder, Rfq,
    VendorProfile, NO_RESPONSE_MESSAGE,
};
use crate::soap::xml::{field_text, find_all, find_first_of, parse_document, Element};
use crate::soap::Operation;
use crate::utils::{parse_float_lenient, parse_int_lenient};

pub const ITEM_TAG: &str = "item";

/// ABAP boolean truth value.
const ABAP_TRUE: &str = "X";
const LOGIN_SUCCESS_TAGS: [&str; 3] = ["SUCCESS", "IV_SUCCESS", "EV_SUCCESS"];
const LOGIN_MESSAGE_TAGS: [&str; 3] = ["MESSAGE", "IV_MESSAGE", "EV_MESSAGE"];

/// Field access on one record node with the documented defaults.
struct Fields<'a>(&'a Element);

impl Fields<'_> {
    /// Text of `tag`, `""` when absent.
    fn text(&self, tag: &str) -> String {
        field_text(self.0, tag).unwrap_or_default()
    }

    /// Leading number of `tag`, `0.0` when absent or unreadable.
    fn number(&self, tag: &str) -> f64 {
        field_text(self.0, tag)
            .map(|t| parse_float_lenient(&t))
            .unwrap_or(0.0)
    }

    /// Leading base-10 integer of `tag`, `0` when absent or unreadable.
    fn integer(&self, tag: &str) -> i64 {
        field_text(self.0, tag)
            .map(|t| parse_int_lenient(&t))
            .unwrap_or(0)
    }

    /// Text of `tag`, `None` when absent or blank.
    fn optional(&self, tag: &str) -> Option<String> {
        field_text(self.0, tag).filter(|t| !t.trim().is_empty())
    }

    fn material(&self, tag: &str) -> String {
        strip_leading_zeros(&self.text(tag))
    }
}

fn parse(xml: &str, operation: Operation) -> Result<Option<Element>, DecodeError> {
    if xml.trim().is_empty() {
        debug!(operation = %operation, "Empty response body");
        return Ok(None);
    }

    parse_document(xml).map(Some).map_err(|e| {
        warn!(operation = %operation, error = %e, "Unparseable SOAP response");
        e
    })
}

fn decode_list<T>(
    xml: &str,
    operation: Operation,
    map: impl Fn(&Fields<'_>) -> T,
) -> Result<Vec<T>, DecodeError> {
    let Some(root) = parse(xml, operation)? else {
        return Ok(Vec::new());
    };

    let records: Vec<T> = find_all(&root, ITEM_TAG)
        .into_iter()
        .map(|item| map(&Fields(item)))
        .collect();

    debug!(operation = %operation, count = records.len(), "Decoded list response");
    Ok(records)
}

pub fn decode_purchase_orders(xml: &str) -> Result<Vec<PurchaseOrder>, DecodeError> {
    decode_list(xml, Operation::FetchPurchaseOrders, |f| PurchaseOrder {
        po_number: f.text("PO_NUMBER"),
        vendor_id: f.text("VENDOR_ID"),
        po_date: f.text("PO_DATE"),
        purch_org: f.text("PURCH_ORG"),
        material_no: f.material("MATERIAL_NO"),
        unit: f.text("UNIT"),
        net_price: f.number("NET_PRICE"),
        delivery_date: f.text("DELIVERY_DATE"),
        currency: f.text("CURRENCY"),
    })
}

pub fn decode_rfqs(xml: &str) -> Result<Vec<Rfq>, DecodeError> {
    decode_list(xml, Operation::FetchRfqs, |f| Rfq {
        vendor_id: f.text("VENDOR_ID"),
        rfq_number: f.text("RFQ_NUMBER"),
        rfq_date: f.text("RFQ_DATE"),
        material_text: f.text("MATERIAL_TEXT"),
        quantity: f.number("QUANTITY"),
        unit: f.text("UNIT"),
    })
}

pub fn decode_goods_receipts(xml: &str) -> Result<Vec<GoodsReceipt>, DecodeError> {
    decode_list(xml, Operation::FetchGoodsReceipts, |f| GoodsReceipt {
        mat_doc_num: f.text("MAT_DOC_NUM"),
        fiscal_year: f.text("FISCAL_YEAR"),
        comp_code: f.text("COMP_CODE"),
        vendor_id: f.text("VENDOR_ID"),
        material_no: f.material("MATERIAL_NO"),
        plant: f.text("PLANT"),
        posting_date: f.text("POSTING_DATE"),
    })
}

pub fn decode_finance_docs(xml: &str) -> Result<Vec<FinanceDoc>, DecodeError> {
    decode_list(xml, Operation::FetchFinance, |f| FinanceDoc {
        vendor_id: f.text("VENDOR_ID"),
        invoice_num: f.text("INVOICE_NUM"),
        posting_date: f.text("POSTING_DATE"),
        doc_date: f.text("DOC_DATE"),
        amount: f.number("AMOUNT"),
        currency: f.text("CURRENCY"),
        due_date: f.text("DUE_DATE"),
        aging_days: f.integer("AGING_DAYS"),
    })
}

pub fn decode_memos(xml: &str) -> Result<Vec<MemoDoc>, DecodeError> {
    decode_list(xml, Operation::FetchMemos, |f| MemoDoc {
        vendor_id: f.text("VENDOR_ID"),
        memo_num: f.text("MEMO_NUM"),
        doc_type: f.text("DOC_TYPE"),
        posting_date: f.text("POSTING_DATE"),
        amount: f.number("AMOUNT"),
        currency: f.text("CURRENCY"),
        debit_cred_ind: DebitCredit::from_code(&f.text("DEBIT_CRED_IND")),
        material_no: f
            .optional("MATERIAL_NO")
            .map(|m| strip_leading_zeros(&m))
            .filter(|m| !m.is_empty()),
        quantity: f.optional("QUANTITY").map(|q| parse_float_lenient(&q)),
        unit: f.optional("UNIT"),
    })
}

/// First `item` only; the backend may return the vendor master as a list.
pub fn decode_profile(xml: &str) -> Result<VendorProfile, DecodeError> {
    let root = parse(xml, Operation::FetchProfile)?;
    let item = root
        .as_ref()
        .and_then(|root| find_all(root, ITEM_TAG).into_iter().next())
        .ok_or(DecodeError::NotFound("Profile not found"))?;

    let f = Fields(item);
    Ok(VendorProfile {
        vendor_id: f.text("VENDOR_ID"),
        name: f.text("NAME"),
        city: f.text("CITY"),
        country: f.text("COUNTRY"),
        message: f.text("MESSAGE"),
    })
}

pub fn decode_login(xml: &str) -> Result<LoginResult, DecodeError> {
    let Some(root) = parse(xml, Operation::Login)? else {
        return Ok(LoginResult {
            success: false,
            message: NO_RESPONSE_MESSAGE.to_string(),
        });
    };

    let success = find_first_of(&root, &LOGIN_SUCCESS_TAGS)
        .is_some_and(|node| node.text_content() == ABAP_TRUE);
    let message = find_first_of(&root, &LOGIN_MESSAGE_TAGS)
        .map(Element::text_content)
        .unwrap_or_else(|| NO_RESPONSE_MESSAGE.to_string());

    debug!(success, "Decoded login response");
    Ok(LoginResult { success, message })
}
