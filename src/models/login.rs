use serde::{Deserialize, Serialize};

pub const NO_RESPONSE_MESSAGE: &str = "No response message";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Set only when SAP answered with the ABAP truth value `X`.
    pub success: bool,
    pub message: String,
}
