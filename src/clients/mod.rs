pub mod credentials;
pub mod http;

pub use credentials::Credentials;
pub use http::{HttpClient, SoapTransport};
