use std::time::Duration;

use async_trait::async_trait;
use http::header::HeaderMap;
use rquest::Client;
use tracing::{debug, error};

use crate::clients::credentials::Credentials;
use crate::config::{EndpointConfig, Settings};
use crate::error::{Error, Result};
use crate::soap::{build_envelope, Operation, SoapRequest};

/// Seam between the portal service and the wire; tests swap in canned responses.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// Sends `request` and returns the raw response body.
    async fn call(&self, request: &SoapRequest) -> Result<String>;
}

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
    base_url: String,
    sap_client: String,
    endpoints: EndpointConfig,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let headers = Credentials::from_config(&settings.sap).headers()?;

        debug!(
            base_url = %settings.sap.base_url,
            user = %settings.sap.user,
            timeout_secs = settings.sap.timeout_secs,
            "Creating SAP HTTP client"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.sap.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            headers,
            base_url: settings.sap.base_url.trim_end_matches('/').to_string(),
            sap_client: settings.sap.client.clone(),
            endpoints: settings.endpoints.clone(),
        })
    }

    pub fn endpoint_url(&self, endpoint_path: &str) -> String {
        let separator = if endpoint_path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}sap-client={}",
            self.base_url, endpoint_path, separator, self.sap_client
        )
    }

    pub fn endpoint_for(&self, operation: Operation) -> &str {
        self.endpoints.path_for(operation)
    }

    /// POSTs `envelope` and returns the body as text. Any non-2xx answer is
    /// an [`Error::Status`]; an empty 2xx body is returned as-is.
    pub async fn send(
        &self,
        envelope: String,
        endpoint_path: &str,
        soap_action: Option<&str>,
    ) -> Result<String> {
        let url = self.endpoint_url(endpoint_path);

        let mut request = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .body(envelope);
        if let Some(action) = soap_action {
            request = request.header("SOAPAction", action);
        }

        debug!(url = %url, soap_action = ?soap_action, "Sending SOAP request");

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "SOAP transport failure");
            Error::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        debug!(
            status = status.as_u16(),
            url = %url,
            body_len = body.len(),
            "SOAP response received"
        );

        if !status.is_success() {
            error!(status = status.as_u16(), url = %url, "SAP endpoint rejected request");
            return Err(Error::Status { status, body });
        }

        Ok(body)
    }
}

#[async_trait]
impl SoapTransport for HttpClient {
    async fn call(&self, request: &SoapRequest) -> Result<String> {
        let operation = request.operation();
        let envelope = build_envelope(request);
        self.send(envelope, self.endpoint_for(operation), operation.soap_action())
            .await
    }
}
