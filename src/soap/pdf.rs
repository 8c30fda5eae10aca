//! Extraction of the base64 invoice PDF from the `EV_BASE64` export parameter.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::soap::xml::{find_first, parse_document, Element, LOOKUP_ORDER};

pub const BASE64_TAG: &str = "EV_BASE64";

/// Nodes SAP uses to report why no document came back, in priority order.
const ERROR_TAGS: [&str; 3] = ["faultstring", "EV_ERROR", "EV_MESSAGE"];

static EMPTY_BASE64_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:[\w.-]+:)?EV_BASE64\s*/>").expect("static regex")
});

static RAW_BASE64_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:[\w.-]+:)?EV_BASE64(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?EV_BASE64\s*>")
        .expect("static regex")
});

static BASE64_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/=\s]+$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfPayload {
    /// Base64 text with all whitespace removed. Not yet decoded.
    Encoded(String),
    /// No usable document. `reason` carries the SAP message when there was one.
    Unavailable { reason: Option<String> },
}

impl PdfPayload {
    fn unavailable() -> Self {
        PdfPayload::Unavailable { reason: None }
    }

    fn unavailable_because(reason: impl Into<String>) -> Self {
        PdfPayload::Unavailable {
            reason: Some(reason.into()),
        }
    }
}

pub fn extract_pdf_base64(xml: &str) -> PdfPayload {
    if xml.trim().is_empty() {
        debug!("Empty PDF response body");
        return PdfPayload::unavailable();
    }

    if EMPTY_BASE64_TAG.is_match(xml) {
        debug!("EV_BASE64 is empty, no PDF stored for invoice");
        return PdfPayload::unavailable();
    }

    let root = match parse_document(xml) {
        Ok(root) => root,
        Err(e) => {
            warn!(error = %e, "PDF response is not well-formed XML");
            return PdfPayload::unavailable_because(e.to_string());
        }
    };

    if let Some(message) = sap_error_message(&root) {
        warn!(message = %message, "SAP reported an error for the PDF request");
        return PdfPayload::unavailable_because(message);
    }

    let located = LOOKUP_ORDER
        .iter()
        .find_map(|lookup| {
            lookup
                .first(&root, BASE64_TAG)
                .map(|node| (lookup.label, node.text_content()))
        })
        // payload hidden from the tree, e.g. escaped inside CDATA or a comment
        .or_else(|| {
            RAW_BASE64_ELEMENT
                .captures(xml)
                .and_then(|caps| caps.get(1))
                .map(|m| ("raw-text", m.as_str().to_string()))
        });

    let Some((strategy, content)) = located else {
        debug!("No EV_BASE64 element in PDF response");
        return PdfPayload::unavailable();
    };

    let content = content.trim();
    if content.is_empty() {
        debug!(strategy, "EV_BASE64 present but blank");
        return PdfPayload::unavailable();
    }

    if !BASE64_CHARSET.is_match(content) {
        let preview: String = content.chars().take(100).collect();
        warn!(strategy, preview = %preview, "EV_BASE64 contains non-base64 characters");
        return PdfPayload::unavailable_because("Invalid PDF data format");
    }

    let encoded: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    debug!(strategy, length = encoded.len(), "Extracted PDF payload");
    PdfPayload::Encoded(encoded)
}

fn sap_error_message(root: &Element) -> Option<String> {
    ERROR_TAGS.iter().find_map(|tag| {
        find_first(root, tag)
            .map(|node| node.text_content().trim().to_string())
            .filter(|text| !text.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> String {
        format!(
            r#"<soap-env:Envelope xmlns:soap-env="http://schemas.xmlsoap.org/soap/envelope/"><soap-env:Body><n0:ZFM_INVOICE_PDF_863Response xmlns:n0="urn:sap-com:document:sap:rfc:functions">{body}</n0:ZFM_INVOICE_PDF_863Response></soap-env:Body></soap-env:Envelope>"#
        )
    }

    #[test]
    fn empty_tag_means_not_available() {
        assert_eq!(
            extract_pdf_base64(&response("<EV_BASE64/>")),
            PdfPayload::Unavailable { reason: None }
        );
        assert_eq!(
            extract_pdf_base64(&response("<n0:EV_BASE64 />")),
            PdfPayload::Unavailable { reason: None }
        );
    }

    #[test]
    fn blank_content_means_not_available() {
        assert_eq!(
            extract_pdf_base64(&response("<EV_BASE64>  \n </EV_BASE64>")),
            PdfPayload::Unavailable { reason: None }
        );
    }

    #[test]
    fn malformed_document_propagates_reason() {
        match extract_pdf_base64("<soap-env:Envelope><EV_BASE64>JVBE") {
            PdfPayload::Unavailable { reason: Some(reason) } => {
                assert!(reason.contains("malformed"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sap_message_wins_over_payload() {
        let xml = response("<EV_BASE64>JVBERi0=</EV_BASE64><EV_MESSAGE>Invoice not posted</EV_MESSAGE>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Unavailable {
                reason: Some("Invoice not posted".to_string())
            }
        );
    }

    #[test]
    fn blank_sap_message_is_ignored() {
        let xml = response("<EV_BASE64>JVBERi0=</EV_BASE64><EV_MESSAGE> </EV_MESSAGE>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Encoded("JVBERi0=".to_string())
        );
    }

    #[test]
    fn soap_fault_is_reported() {
        let xml = r#"<soap-env:Envelope xmlns:soap-env="http://schemas.xmlsoap.org/soap/envelope/"><soap-env:Body><soap-env:Fault><faultcode>soap-env:Client</faultcode><faultstring xml:lang="en">Vendor not authorized</faultstring></soap-env:Fault></soap-env:Body></soap-env:Envelope>"#;
        assert_eq!(
            extract_pdf_base64(xml),
            PdfPayload::Unavailable {
                reason: Some("Vendor not authorized".to_string())
            }
        );
    }

    #[test]
    fn strips_whitespace_from_payload() {
        let xml = response("<n0:EV_BASE64>\n  JVBERi0x\n  LjQK\n</n0:EV_BASE64>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Encoded("JVBERi0xLjQK".to_string())
        );
    }

    #[test]
    fn finds_payload_under_foreign_prefix() {
        let xml = response("<ns7:EV_BASE64>JVBERi0xLjQK</ns7:EV_BASE64>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Encoded("JVBERi0xLjQK".to_string())
        );
    }

    #[test]
    fn rejects_non_base64_characters() {
        let xml = response("<EV_BASE64>JVBER#i0x!</EV_BASE64>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Unavailable {
                reason: Some("Invalid PDF data format".to_string())
            }
        );
    }

    #[test]
    fn missing_element_is_not_available() {
        assert_eq!(
            extract_pdf_base64(&response("<EV_OTHER>1</EV_OTHER>")),
            PdfPayload::Unavailable { reason: None }
        );
    }

    #[test]
    fn blank_body_is_plainly_unavailable() {
        assert_eq!(extract_pdf_base64(""), PdfPayload::Unavailable { reason: None });
        assert_eq!(extract_pdf_base64(" \n "), PdfPayload::Unavailable { reason: None });
    }

    #[test]
    fn falls_back_to_raw_text_when_tree_has_no_element() {
        let xml = response("<EV_DATA><![CDATA[<EV_BASE64>JVBE\nRi0x</EV_BASE64>]]></EV_DATA>");
        assert_eq!(
            extract_pdf_base64(&xml),
            PdfPayload::Encoded("JVBERi0x".to_string())
        );
    }

    #[test]
    fn raw_element_pattern_tolerates_attributes() {
        let captured = RAW_BASE64_ELEMENT
            .captures("<x><n0:EV_BASE64 a=\"1\">QUJD\nRA==</n0:EV_BASE64 ></x>")
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        assert_eq!(captured.as_deref(), Some("QUJD\nRA=="));
    }
}
