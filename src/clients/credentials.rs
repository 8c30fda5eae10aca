use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::SapConfig;
use crate::error::{Error, Result};

pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Technical SAP user shared by every request. Vendors never authenticate
/// at the transport level; their password only travels in the login body.
#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &SapConfig) -> Self {
        Self::new(&config.user, &config.password)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn basic_auth(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("Basic {token}")
    }

    /// Sets basic auth and the SOAP content type on `headers`, replacing any
    /// previous values.
    pub fn inject(&self, headers: &mut HeaderMap) -> Result<()> {
        let mut auth = HeaderValue::from_str(&self.basic_auth())
            .map_err(|_| Error::InvalidHeader("Authorization"))?;
        auth.set_sensitive(true);

        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE));
        Ok(())
    }

    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        self.inject(&mut headers)?;
        Ok(headers)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
