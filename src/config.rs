use serde::Deserialize;
use config::{Config, ConfigError};
use tracing::debug;

use crate::soap::Operation;

pub const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub sap: SapConfig,
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SapConfig {
    pub base_url: String,
    /// Value of the `sap-client` query parameter appended to every endpoint.
    pub client: String,
    pub user: String,
    pub password: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub login: String,
    pub purchase_orders: String,
    pub rfqs: String,
    pub goods_receipts: String,
    pub finance: String,
    pub memos: String,
    pub profile: String,
    pub invoice_pdf: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            login: "/sap/bc/srt/scs/sap/ZRFC_LOGIN_VALIDATE_863".to_string(),
            purchase_orders: "/sap/bc/srt/scs/sap/ZRFC_PO_Vendor_863".to_string(),
            rfqs: "/sap/bc/srt/scs/sap/ZRFC_RFQ_VENDOR_863".to_string(),
            goods_receipts: "/sap/bc/srt/scs/sap/ZRFC_GR_VENDOR_863".to_string(),
            finance: "/sap/bc/srt/scs/sap/ZRFC_INVOICE_VENDOR_863".to_string(),
            memos: "/sap/bc/srt/scs/sap/ZRFC_MEMO_VENDOR_863".to_string(),
            profile: "/sap/bc/srt/scs/sap/ZRFC_PROFILE_VENDOR_863".to_string(),
            invoice_pdf: "/sap/bc/srt/scs/sap/ZRFC_INVOICE_PDF_863".to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn path_for(&self, operation: Operation) -> &str {
        match operation {
            Operation::Login => &self.login,
            Operation::FetchPurchaseOrders => &self.purchase_orders,
            Operation::FetchRfqs => &self.rfqs,
            Operation::FetchGoodsReceipts => &self.goods_receipts,
            Operation::FetchFinance => &self.finance,
            Operation::FetchMemos => &self.memos,
            Operation::FetchProfile => &self.profile,
            Operation::FetchInvoicePdf => &self.invoice_pdf,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Loads `path` (any format the `config` crate recognises) and then
    /// `APP_`-prefixed environment overrides, e.g. `APP_SAP__PASSWORD`.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let endpoints = EndpointConfig::default();
        let builder = Config::builder()
            .set_default("sap.client", "100")?
            .set_default("sap.timeout_secs", 30_i64)?
            .set_default("endpoints.login", endpoints.login)?
            .set_default("endpoints.purchase_orders", endpoints.purchase_orders)?
            .set_default("endpoints.rfqs", endpoints.rfqs)?
            .set_default("endpoints.goods_receipts", endpoints.goods_receipts)?
            .set_default("endpoints.finance", endpoints.finance)?
            .set_default("endpoints.memos", endpoints.memos)?
            .set_default("endpoints.profile", endpoints.profile)?
            .set_default("endpoints.invoice_pdf", endpoints.invoice_pdf)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            base_url = %settings.sap.base_url,
            sap_client = %settings.sap.client,
            timeout_secs = settings.sap.timeout_secs,
            "Loaded SAP settings"
        );

        Ok(settings)
    }

    /// Settings pointing at `base_url` with default endpoint paths.
    pub fn with_base_url(base_url: &str, user: &str, password: &str) -> Self {
        Self {
            sap: SapConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                client: "100".to_string(),
                user: user.to_string(),
                password: password.to_string(),
                timeout_secs: 30,
            },
            endpoints: EndpointConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "sap:\n  base_url: \"http://sap.local:8000\"\n  user: \"portal\"\n  password: \"secret\"\n  client: \"200\"\nendpoints:\n  rfqs: \"/custom/rfq\""
        )
        .unwrap();

        let settings = Settings::from_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(settings.sap.base_url, "http://sap.local:8000");
        assert_eq!(settings.sap.client, "200");
        assert_eq!(settings.sap.timeout_secs, 30);
        assert_eq!(settings.endpoints.rfqs, "/custom/rfq");
        assert_eq!(
            settings.endpoints.path_for(Operation::FetchPurchaseOrders),
            "/sap/bc/srt/scs/sap/ZRFC_PO_Vendor_863"
        );
    }

    #[test]
    fn environment_overrides_file_password() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "sap:\n  base_url: \"http://sap.local:8000\"\n  user: \"portal\"\n  password: \"\""
        )
        .unwrap();

        // only this test touches APP_* variables
        unsafe { std::env::set_var("APP_SAP__PASSWORD", "from_env") };
        let settings = Settings::from_file(file.path().to_str().unwrap());
        unsafe { std::env::remove_var("APP_SAP__PASSWORD") };

        let settings = settings.unwrap();
        assert_eq!(settings.sap.password, "from_env");
        assert_eq!(settings.sap.user, "portal");
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let result = Settings::from_file("does/not/exist");
        assert!(result.is_err());
    }
}
