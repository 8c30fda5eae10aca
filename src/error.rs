use thiserror::Error;
use http::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("SAP endpoint returned status {status}")]
    Status { status: StatusCode, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid vendor id {0:?}: expected 6 digits")]
    InvalidVendorId(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),
}

impl Error {
    /// True for failures that happened before a response body reached the decoder.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("{0}")]
    NotFound(&'static str),
}

/// Content was found but failed a format check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Invalid PDF data format")]
    InvalidBase64,

    #[error("Invalid PDF file format")]
    MissingPdfMarker,

    #[error("PDF file is too small or corrupted ({size} bytes)")]
    Undersized { size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_and_status_count_as_transport() {
        let status = Error::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert!(status.is_transport());

        let io = Error::from(std::io::Error::other("disk full"));
        assert!(!io.is_transport());
        assert!(!Error::from(DecodeError::NotFound("Profile not found")).is_transport());
        assert!(!Error::from(ValidationFailure::MissingPdfMarker).is_transport());
    }
}
