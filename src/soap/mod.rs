pub mod envelope;
pub mod xml;
pub mod decode;
pub mod pdf;

pub use envelope::{build_envelope, pad_invoice_number, Operation, SoapRequest};
pub use pdf::{extract_pdf_base64, PdfPayload};
