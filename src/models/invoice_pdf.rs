use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::{debug, warn};

use crate::error::{Result, ValidationFailure};

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";
/// Anything smaller cannot be a real rendered invoice.
pub const MIN_PDF_SIZE: usize = 100;

// SAP sometimes drops the trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded, checked invoice PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePdf {
    pub invoice_no: String,
    pub bytes: Vec<u8>,
}

impl InvoicePdf {
    /// Decodes the base64 text returned by the PDF operation and checks that
    /// the result looks like a PDF file.
    pub fn from_base64(
        invoice_no: &str,
        encoded: &str,
    ) -> std::result::Result<Self, ValidationFailure> {
        let clean: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = LENIENT_BASE64.decode(clean.as_bytes()).map_err(|e| {
            warn!(invoice_no, error = %e, "PDF payload is not valid base64");
            ValidationFailure::InvalidBase64
        })?;

        if !bytes.starts_with(PDF_MAGIC) {
            let head = String::from_utf8_lossy(&bytes[..bytes.len().min(20)]).into_owned();
            warn!(invoice_no, head = %head, "Decoded payload is not a PDF");
            return Err(ValidationFailure::MissingPdfMarker);
        }

        if bytes.len() < MIN_PDF_SIZE {
            warn!(invoice_no, size = bytes.len(), "PDF payload is implausibly small");
            return Err(ValidationFailure::Undersized { size: bytes.len() });
        }

        debug!(invoice_no, size = bytes.len(), "PDF payload validated");

        Ok(Self {
            invoice_no: invoice_no.to_string(),
            bytes,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    pub fn file_name(&self) -> String {
        format!("Invoice_{}.pdf", self.invoice_no)
    }

    /// Writes the PDF into `dir` under [`file_name`](Self::file_name).
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(self.file_name());
        tokio::fs::write(&path, &self.bytes).await?;

        debug!(path = %path.display(), size = self.bytes.len(), "Saved invoice PDF");
        Ok(path)
    }
}
